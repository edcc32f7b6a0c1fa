use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChunkModelError>;

#[derive(Error, Debug)]
pub enum ChunkModelError {
    #[error("Invalid chunk '{id}': {reason}")]
    InvalidChunk { id: String, reason: String },

    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("Invalid embedding for chunk '{chunk_id}': {reason}")]
    InvalidEmbedding { chunk_id: String, reason: String },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("{0}")]
    Other(String),
}
