use thiserror::Error;

pub type Result<T> = std::result::Result<T, RewriteError>;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("Provider error: {0}")]
    Provider(#[from] recast_providers::ProviderError),

    #[error("{0}")]
    Other(String),
}
