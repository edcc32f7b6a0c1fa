use std::future::Future;
use std::time::Duration;

/// Generic retry with exponential backoff: the delay before attempt `n + 1`
/// is `base · 2^n`. The final error is re-raised once attempts are exhausted.
pub async fn retry_with_backoff<T, E, F, Fut>(
    mut operation: F,
    max_retries: u32,
    base_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= max_retries {
                    return Err(error);
                }
                let delay = base_delay * 2u32.saturating_pow(attempt);
                log::warn!(
                    "Attempt {} failed ({error}), retrying in {:?}",
                    attempt + 1,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_inner = calls.clone();

        let result = retry_with_backoff(
            move || {
                let calls = calls_inner.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("transient".to_string())
                    } else {
                        Ok(42)
                    }
                }
            },
            3,
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn reraises_after_final_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_inner = calls.clone();

        let result: Result<(), String> = retry_with_backoff(
            move || {
                let calls = calls_inner.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("always broken".to_string())
                }
            },
            2,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(result, Err("always broken".to_string()));
        // Initial attempt plus two retries.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn delays_double_per_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_inner = calls.clone();
        let started = tokio::time::Instant::now();

        let _: Result<(), String> = retry_with_backoff(
            move || {
                let calls = calls_inner.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("nope".to_string())
                }
            },
            2,
            Duration::from_secs(1),
        )
        .await;

        // 1s + 2s of virtual sleep.
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }
}
