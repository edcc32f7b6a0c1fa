use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Provider error: {0}")]
    Provider(#[from] recast_providers::ProviderError),

    #[error("Store error: {0}")]
    Store(#[from] recast_chunk_store::StoreError),

    #[error("Chunk model error: {0}")]
    ChunkModel(#[from] recast_chunk_model::ChunkModelError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
