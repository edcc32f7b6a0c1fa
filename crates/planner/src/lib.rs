//! # Recast Planner
//!
//! Synthesizes a migration plan by prompting the LLM with the command, the
//! retrieved chunks and the target-technology profile, then normalizing
//! whatever comes back into the eight required sections:
//!
//! ```text
//! prompt ──> LLM ──> first balanced {...} as JSON
//!                        │ parse failed
//!                        ├──> labelled-section scan (ANALYSIS:, STRATEGY:, ...)
//!                        │
//!                        └──> field-wise defaults naming the target
//!                                 │
//!                                 └──> metadata + timeline + risk level
//! ```
//!
//! Malformed LLM output is never fatal here; it degrades to defaults.

mod error;
mod parse;
mod plan;
mod prompt;
mod synthesizer;
mod timeline;

pub use error::{PlanError, Result};
pub use parse::{extract_json_object, fill_defaults, parse_plan_sections};
pub use plan::{MigrationPlan, PlanMetadata, PlanSections, RiskLevel, Timeline, TimelinePhase};
pub use prompt::build_plan_prompt;
pub use synthesizer::PlanSynthesizer;
pub use timeline::derive_timeline;
