use crate::checks::ChunkValidation;
use recast_chunk_model::ChunkKind;
use serde::{Deserialize, Serialize};

/// Outcome of rewriting a single chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRewrite {
    pub chunk_id: String,
    pub chunk_name: String,
    pub kind: ChunkKind,
    pub original_code: String,

    /// LLM output; empty when the rewrite failed
    pub migrated_code: String,

    pub validation: ChunkValidation,
    pub time_ms: u64,

    /// Failure description when the LLM call itself failed
    pub error: Option<String>,
}

/// Per-file counters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    pub chunks_total: usize,
    pub chunks_valid: usize,
    pub time_ms: u64,
}

/// Outcome of rewriting all chunks of one file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    pub file_path: String,
    pub success: bool,

    /// Chunk outputs, in dependency-priority order
    pub chunks: Vec<ChunkRewrite>,

    /// The assembled migrated file
    pub content: String,

    pub stats: FileStats,
}

/// A file that could not be processed at all
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileError {
    pub file_path: String,
    pub error: String,
}

/// Aggregates over the whole migration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MigrationStatistics {
    pub total_chunks: usize,
    pub files_processed: usize,

    /// Fraction of files that rewrote successfully, in [0, 1]
    pub success_rate: f64,

    pub average_time_per_chunk_ms: f64,
}

/// Everything the rewrite engine produced for one migration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResult {
    pub migration_id: String,
    pub session_id: String,
    pub user_id: String,
    pub results: Vec<FileResult>,
    pub errors: Vec<FileError>,
    pub execution_time_ms: u64,
    pub statistics: MigrationStatistics,
}
