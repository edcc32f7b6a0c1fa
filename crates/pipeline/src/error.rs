use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Pipeline-level failures, one variant per condition the caller can act on.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing required fields: {0}")]
    InvalidRequest(String),

    #[error("No indexed code found for this session. Please index your project first.")]
    NoIndexedCode,

    #[error("Store error: {0}")]
    Store(#[from] recast_chunk_store::StoreError),
}
