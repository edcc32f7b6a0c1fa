use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    // "connection" in the display text routes this into the reconnect-style
    // retry path of the recovery layer's text classifier.
    #[error("Store unavailable (connection failed): {0}")]
    Unavailable(String),

    #[error("Store consistency violation: {0}")]
    Consistency(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Chunk model error: {0}")]
    ChunkModel(#[from] recast_chunk_model::ChunkModelError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
