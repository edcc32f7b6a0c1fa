//! # Recast Validation
//!
//! The post-rewrite validation pass and the recovery machinery the whole
//! pipeline leans on:
//!
//! - five sub-reports over the rewritten files, with threshold-driven issues
//!   and recommendations (validation is informative, never fatal);
//! - error classification by message text, mapped to recovery strategies;
//! - a generic exponential-backoff retry primitive;
//! - the per-stage state machine (READY → RUNNING → SUCCEEDED /
//!   FAILED_TRANSIENT → RUNNING / FAILED_FATAL).

mod classify;
mod report;
mod retry;
mod state;

pub use classify::{
    classify_error, fallback_chunk, strategy_for, truncate_chunks, ErrorClass, RecoveryStrategy,
    BACKOFF_BASE, MAX_RETRIES, RATE_LIMIT_DELAY, RESOURCE_CHUNK_LIMIT,
};
pub use report::{
    validate_migration_results, CodeQualityReport, ConfigurationReport, DependencyReport,
    FunctionalityReport, TestingReport, ValidationReport,
};
pub use retry::retry_with_backoff;
pub use state::{run_stage, StageFailure, StageMachine, StageState};
