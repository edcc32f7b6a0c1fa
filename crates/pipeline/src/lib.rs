//! # Recast Pipeline
//!
//! The migration orchestrator. One operation, six stages, strictly in order:
//!
//! ```text
//! process_migration(request)
//!     1. validate          request fields + indexed-chunk count
//!     2. analyze           session aggregate statistics
//!     3. retrieve          ranked chunks (recast-retrieval)
//!     4. plan              LLM plan synthesis (recast-planner)
//!     5. rewrite           per-chunk rewrites (recast-rewrite)
//!     6. validate results  report pass (recast-validation)
//! ```
//!
//! Every dependency comes in through the capability bundle; the pipeline
//! itself owns no provider clients and mutates no persistent state. Stage
//! failures become `{success: false, error, step}` reports instead of
//! panics or partial commits.

mod capabilities;
mod clock;
mod config;
mod error;
mod pipeline;
mod report;
mod request;

pub use capabilities::Capabilities;
pub use clock::{Clock, SystemClock};
pub use config::RuntimeConfig;
pub use error::{PipelineError, Result};
pub use pipeline::MigrationPipeline;
pub use report::{FailureReport, MigrationReport, MigrationStep, ReportStatistics, SuccessReport};
pub use request::MigrationRequest;
