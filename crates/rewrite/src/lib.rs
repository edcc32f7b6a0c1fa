//! # Recast Rewrite
//!
//! Executes a migration plan chunk by chunk:
//!
//! ```text
//! chunks ──> group by file ──> order by kind priority, then complexity
//!                                  │
//!                                  ├──> per-chunk prompt ──> LLM ──> code
//!                                  ├──> static checks (checks::validate_chunk)
//!                                  └──> file assembly (imports, bodies, exports)
//! ```
//!
//! Files rewrite concurrently; chunks inside one file stay sequential so the
//! emitted order honours dependency priority. A failed chunk never aborts its
//! file, and a failed file never aborts the migration.

mod checks;
mod context;
mod engine;
mod error;
mod prompt;
mod result;

pub use checks::{validate_chunk, ChunkValidation};
pub use context::{build_file_context, FileContext};
pub use engine::RewriteEngine;
pub use error::{Result, RewriteError};
pub use prompt::build_rewrite_prompt;
pub use result::{
    ChunkRewrite, FileError, FileResult, FileStats, MigrationResult, MigrationStatistics,
};
