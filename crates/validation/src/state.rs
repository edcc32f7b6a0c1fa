use crate::classify::{classify_error, strategy_for, ErrorClass, MAX_RETRIES};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Lifecycle of one pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageState {
    Ready,
    Running,
    Succeeded,
    FailedTransient,
    FailedFatal,
}

impl StageState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::FailedFatal)
    }
}

/// Why a stage ended in FAILED_FATAL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: String,
    pub error: String,
    pub class: ErrorClass,
    pub attempts: u32,
}

impl std::fmt::Display for StageFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "stage '{}' failed after {} attempt(s): {}",
            self.stage, self.attempts, self.error
        )
    }
}

/// The per-stage state machine. Transitions:
///
/// ```text
/// READY ──start──> RUNNING ──complete──> SUCCEEDED
///                     │
///                     ├─ retry-capable error, attempt < max ─> FAILED_TRANSIENT
///                     │                                            │ (delay)
///                     │                                            └──retry──> RUNNING
///                     └─ otherwise ─────────────────────────────> FAILED_FATAL
/// ```
#[derive(Debug)]
pub struct StageMachine {
    name: String,
    state: StageState,
    attempts: u32,
    max_attempts: u32,
}

impl StageMachine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: StageState::Ready,
            attempts: 0,
            max_attempts: MAX_RETRIES,
        }
    }

    /// Builder: override the retry budget
    #[must_use]
    pub const fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub const fn state(&self) -> StageState {
        self.state
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// READY or FAILED_TRANSIENT → RUNNING
    pub fn start(&mut self) {
        debug_assert!(matches!(
            self.state,
            StageState::Ready | StageState::FailedTransient
        ));
        self.state = StageState::Running;
        self.attempts += 1;
    }

    /// RUNNING → SUCCEEDED
    pub fn complete(&mut self) {
        debug_assert_eq!(self.state, StageState::Running);
        self.state = StageState::Succeeded;
    }

    /// RUNNING → FAILED_TRANSIENT or FAILED_FATAL, depending on whether the
    /// classified error's strategy is retry-capable and attempts remain.
    /// Returns the classified class.
    pub fn fail(&mut self, error: &str) -> ErrorClass {
        debug_assert_eq!(self.state, StageState::Running);
        let class = classify_error(error);
        let strategy = strategy_for(class);

        if strategy.is_retry_capable() && self.attempts < self.max_attempts {
            log::warn!(
                "Stage '{}' failed transiently ({class:?}, attempt {}): {error}",
                self.name,
                self.attempts
            );
            self.state = StageState::FailedTransient;
        } else {
            log::error!(
                "Stage '{}' failed fatally ({class:?}, attempt {}): {error}",
                self.name,
                self.attempts
            );
            self.state = StageState::FailedFatal;
        }
        class
    }
}

/// Drive an operation through the stage state machine: run, classify
/// failures, wait out the strategy's delay, and retry until the stage
/// reaches a terminal state.
pub async fn run_stage<T, F, Fut>(
    name: &str,
    max_attempts: u32,
    mut operation: F,
) -> Result<T, StageFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, String>>,
{
    let mut machine = StageMachine::new(name).max_attempts(max_attempts);

    loop {
        machine.start();
        match operation().await {
            Ok(value) => {
                machine.complete();
                return Ok(value);
            }
            Err(error) => {
                let class = machine.fail(&error);
                match machine.state() {
                    StageState::FailedTransient => {
                        let delay = strategy_for(class).delay(machine.attempts() - 1);
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                    }
                    _ => {
                        return Err(StageFailure {
                            stage: name.to_string(),
                            error,
                            class,
                            attempts: machine.attempts(),
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn happy_path_transitions() {
        let mut machine = StageMachine::new("retrieve");
        assert_eq!(machine.state(), StageState::Ready);

        machine.start();
        assert_eq!(machine.state(), StageState::Running);
        assert!(!machine.state().is_terminal());

        machine.complete();
        assert_eq!(machine.state(), StageState::Succeeded);
        assert!(machine.state().is_terminal());
    }

    #[test]
    fn transient_failure_allows_retry() {
        let mut machine = StageMachine::new("plan").max_attempts(3);
        machine.start();
        let class = machine.fail("network unreachable");
        assert_eq!(class, ErrorClass::NetworkError);
        assert_eq!(machine.state(), StageState::FailedTransient);

        machine.start();
        machine.complete();
        assert_eq!(machine.state(), StageState::Succeeded);
        assert_eq!(machine.attempts(), 2);
    }

    #[test]
    fn unknown_errors_fail_fatally_at_once() {
        let mut machine = StageMachine::new("plan");
        machine.start();
        machine.fail("something inexplicable");
        assert_eq!(machine.state(), StageState::FailedFatal);
        assert!(machine.state().is_terminal());
    }

    #[test]
    fn exhausted_retries_fail_fatally() {
        let mut machine = StageMachine::new("plan").max_attempts(2);
        machine.start();
        machine.fail("timeout");
        assert_eq!(machine.state(), StageState::FailedTransient);

        machine.start();
        machine.fail("timeout");
        assert_eq!(machine.state(), StageState::FailedFatal);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stage_retries_rate_limits_with_the_delay_policy() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_inner = calls.clone();
        let started = tokio::time::Instant::now();

        let result = run_stage("embed", 3, move || {
            let calls = calls_inner.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("api rate limit".to_string())
                } else {
                    Ok("embedded")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("embedded"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // One rate-limit wait of 60 s.
        assert_eq!(started.elapsed(), std::time::Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn run_stage_surfaces_fatal_failures() {
        let result: Result<(), StageFailure> =
            run_stage("plan", 2, || async { Err("weird failure".to_string()) }).await;

        let failure = result.unwrap_err();
        assert_eq!(failure.class, ErrorClass::UnknownError);
        assert_eq!(failure.attempts, 1);
        assert!(failure.to_string().contains("plan"));
    }
}
