use recast_chunk_model::{ChunkKind, CodeChunk};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// How long a rate-limited provider is left alone
pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(60);

/// Base delay for exponential backoff on network failures
pub const BACKOFF_BASE: Duration = Duration::from_secs(5);

/// Retries granted to retry-capable failures
pub const MAX_RETRIES: u32 = 3;

/// Candidate-list size after a resource-exhaustion recovery
pub const RESOURCE_CHUNK_LIMIT: usize = 10;

/// Failure classes recognized by the recovery layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClass {
    ApiError,
    NetworkError,
    ParseError,
    ValidationError,
    DatabaseError,
    ResourceError,
    UnknownError,
}

/// What the recovery layer does about a classified failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStrategy {
    RetryWithDelay,
    RetryWithBackoff,
    RetryWithFixedData,
    RetryWithFixedChunks,
    RetryAfterReconnect,
    RetryWithReducedResources,
    ManualIntervention,
}

impl RecoveryStrategy {
    /// Whether the stage state machine may transition to FAILED_TRANSIENT
    /// and retry, rather than failing fatally.
    #[must_use]
    pub const fn is_retry_capable(self) -> bool {
        !matches!(self, Self::ManualIntervention)
    }

    /// Delay before the retry. Backoff strategies grow with the attempt
    /// count; data-fixing strategies retry immediately once the caller has
    /// applied the fix.
    #[must_use]
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::RetryWithDelay => RATE_LIMIT_DELAY,
            Self::RetryWithBackoff => BACKOFF_BASE * 2u32.saturating_pow(attempt),
            Self::RetryAfterReconnect => BACKOFF_BASE,
            Self::RetryWithFixedData
            | Self::RetryWithFixedChunks
            | Self::RetryWithReducedResources => Duration::ZERO,
            Self::ManualIntervention => Duration::ZERO,
        }
    }
}

/// Classify an error by its message text. Matching is case-insensitive and
/// first-match-wins down a fixed priority list.
#[must_use]
pub fn classify_error(message: &str) -> ErrorClass {
    let lowered = message.to_lowercase();
    let matches_any = |needles: &[&str]| needles.iter().any(|needle| lowered.contains(needle));

    if matches_any(&["api", "key"]) {
        ErrorClass::ApiError
    } else if matches_any(&["timeout", "network"]) {
        ErrorClass::NetworkError
    } else if matches_any(&["parse", "json"]) {
        ErrorClass::ParseError
    } else if matches_any(&["validation", "invalid"]) {
        ErrorClass::ValidationError
    } else if matches_any(&["database", "connection"]) {
        ErrorClass::DatabaseError
    } else if matches_any(&["memory", "limit"]) {
        ErrorClass::ResourceError
    } else {
        ErrorClass::UnknownError
    }
}

/// The strategy applied to each failure class.
#[must_use]
pub const fn strategy_for(class: ErrorClass) -> RecoveryStrategy {
    match class {
        ErrorClass::ApiError => RecoveryStrategy::RetryWithDelay,
        ErrorClass::NetworkError => RecoveryStrategy::RetryWithBackoff,
        ErrorClass::ParseError => RecoveryStrategy::RetryWithFixedData,
        ErrorClass::ValidationError => RecoveryStrategy::RetryWithFixedChunks,
        ErrorClass::DatabaseError => RecoveryStrategy::RetryAfterReconnect,
        ErrorClass::ResourceError => RecoveryStrategy::RetryWithReducedResources,
        ErrorClass::UnknownError => RecoveryStrategy::ManualIntervention,
    }
}

/// Synthesize a minimal stand-in chunk after a validation failure: a fresh
/// id and neutral field values, so downstream stages have something well
/// formed to work with.
#[must_use]
pub fn fallback_chunk(session_id: &str, user_id: &str) -> CodeChunk {
    CodeChunk::new(
        Uuid::new_v4().to_string(),
        session_id,
        "unknown",
        ChunkKind::Block,
        "unnamed",
        "",
    )
    .user_id(user_id)
    .language("javascript")
    .complexity(1)
}

/// Resource-exhaustion recovery: keep only the first
/// [`RESOURCE_CHUNK_LIMIT`] candidates.
pub fn truncate_chunks<T>(chunks: &mut Vec<T>) {
    chunks.truncate(RESOURCE_CHUNK_LIMIT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classification_follows_the_priority_list() {
        assert_eq!(classify_error("Invalid API key"), ErrorClass::ApiError);
        assert_eq!(classify_error("request timeout"), ErrorClass::NetworkError);
        assert_eq!(classify_error("network unreachable"), ErrorClass::NetworkError);
        assert_eq!(classify_error("failed to parse JSON"), ErrorClass::ParseError);
        assert_eq!(classify_error("invalid chunk shape"), ErrorClass::ValidationError);
        assert_eq!(classify_error("database connection refused"), ErrorClass::DatabaseError);
        assert_eq!(classify_error("out of memory"), ErrorClass::ResourceError);
        assert_eq!(classify_error("something odd"), ErrorClass::UnknownError);
    }

    #[test]
    fn api_beats_network_when_both_match() {
        // "api" sits higher in the priority list than "timeout".
        assert_eq!(classify_error("api timeout"), ErrorClass::ApiError);
    }

    #[test]
    fn strategies_map_one_to_one() {
        assert_eq!(strategy_for(ErrorClass::ApiError), RecoveryStrategy::RetryWithDelay);
        assert_eq!(strategy_for(ErrorClass::NetworkError), RecoveryStrategy::RetryWithBackoff);
        assert_eq!(strategy_for(ErrorClass::ParseError), RecoveryStrategy::RetryWithFixedData);
        assert_eq!(
            strategy_for(ErrorClass::ValidationError),
            RecoveryStrategy::RetryWithFixedChunks
        );
        assert_eq!(
            strategy_for(ErrorClass::DatabaseError),
            RecoveryStrategy::RetryAfterReconnect
        );
        assert_eq!(
            strategy_for(ErrorClass::ResourceError),
            RecoveryStrategy::RetryWithReducedResources
        );
        assert_eq!(
            strategy_for(ErrorClass::UnknownError),
            RecoveryStrategy::ManualIntervention
        );
    }

    #[test]
    fn delays_match_the_policies() {
        assert_eq!(
            RecoveryStrategy::RetryWithDelay.delay(0),
            Duration::from_secs(60)
        );
        assert_eq!(
            RecoveryStrategy::RetryWithBackoff.delay(0),
            Duration::from_secs(5)
        );
        assert_eq!(
            RecoveryStrategy::RetryWithBackoff.delay(2),
            Duration::from_secs(20)
        );
        assert_eq!(RecoveryStrategy::RetryWithFixedData.delay(1), Duration::ZERO);
    }

    #[test]
    fn only_manual_intervention_is_not_retryable() {
        assert!(!RecoveryStrategy::ManualIntervention.is_retry_capable());
        assert!(RecoveryStrategy::RetryWithDelay.is_retry_capable());
        assert!(RecoveryStrategy::RetryWithReducedResources.is_retry_capable());
    }

    #[test]
    fn fallback_chunk_is_neutral_and_fresh() {
        let a = fallback_chunk("s1", "u1");
        let b = fallback_chunk("s1", "u1");
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "unnamed");
        assert_eq!(a.file_path, "unknown");
        assert_eq!(a.code, "");
        assert_eq!(a.language, "javascript");
        assert_eq!(a.complexity, 1);
    }

    #[test]
    fn truncation_keeps_the_first_ten() {
        let mut chunks: Vec<usize> = (0..25).collect();
        truncate_chunks(&mut chunks);
        assert_eq!(chunks.len(), RESOURCE_CHUNK_LIMIT);
        assert_eq!(chunks[0], 0);
        assert_eq!(chunks[9], 9);
    }
}
