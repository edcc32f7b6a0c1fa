use thiserror::Error;

pub type Result<T> = std::result::Result<T, RetrievalError>;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Provider error: {0}")]
    Provider(#[from] recast_providers::ProviderError),

    #[error("Store error: {0}")]
    Store(#[from] recast_chunk_store::StoreError),

    #[error("{0}")]
    Other(String),
}
