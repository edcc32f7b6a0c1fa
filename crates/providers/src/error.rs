use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProviderError>;

#[derive(Error, Debug)]
pub enum ProviderError {
    // Display texts double as classification input for the recovery layer,
    // which matches on message substrings ("api", "timeout", "parse", ...).
    #[error("API rate limited: {message}")]
    RateLimited {
        message: String,
        /// Seconds to wait before retrying, when the provider said so
        retry_after: Option<u64>,
    },

    #[error("Provider quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Provider unavailable (network error): {0}")]
    Unavailable(String),

    #[error("Provider timeout after {0} ms")]
    Timeout(u64),

    #[error("Failed to parse provider response: {0}")]
    MalformedResponse(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Map an HTTP status and response body to the matching error variant.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::AuthenticationFailed(body.to_string()),
            402 => Self::QuotaExceeded(body.to_string()),
            429 => Self::RateLimited {
                message: body.to_string(),
                retry_after: None,
            },
            500..=599 => Self::Unavailable(format!("HTTP {status}: {body}")),
            _ => Self::Other(format!("HTTP {status}: {body}")),
        }
    }

    /// Whether the recovery layer is allowed to retry this failure.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Unavailable(_) | Self::Timeout(_) | Self::Http(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_http_statuses() {
        assert!(matches!(
            ProviderError::from_status(401, "bad key"),
            ProviderError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            ProviderError::from_status(429, "slow down"),
            ProviderError::RateLimited { .. }
        ));
        assert!(matches!(
            ProviderError::from_status(503, "overloaded"),
            ProviderError::Unavailable(_)
        ));
    }

    #[test]
    fn transient_errors_are_retryable() {
        assert!(ProviderError::Timeout(1000).is_transient());
        assert!(ProviderError::Unavailable("down".into()).is_transient());
        assert!(!ProviderError::MalformedResponse("bad json".into()).is_transient());
        assert!(!ProviderError::AuthenticationFailed("bad key".into()).is_transient());
    }
}
