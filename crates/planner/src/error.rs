use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Provider error: {0}")]
    Provider(#[from] recast_providers::ProviderError),

    #[error("Malformed plan response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Other(String),
}
