//! Operation polling with exponential backoff, a wait budget, and
//! cancellation.
//!
//! The provider's operation handle only carries a completion flag, so the
//! flow has to re-fetch status until `done` is set. The loop grows its
//! delay exponentially (clamped), gives up when the total wait budget is
//! exhausted, and honors a [`CancellationToken`] at every suspension point.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::{Operation, VeoApiError, VeoBackend};

/// Tunable parameters for the polling strategy.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the first status re-fetch.
    pub initial_interval: Duration,
    /// Upper bound on the delay between re-fetches.
    pub max_interval: Duration,
    /// Factor by which the delay grows after each re-fetch.
    pub multiplier: f64,
    /// Hard ceiling on the cumulative time spent waiting.
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(10),
            max_interval: Duration::from_secs(60),
            multiplier: 1.5,
            max_wait: Duration::from_secs(30 * 60),
        }
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`PollConfig::max_interval`].
pub fn next_delay(current: Duration, config: &PollConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_interval)
}

/// Failures of the polling loop itself.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The wait budget ran out before the operation completed.
    #[error("Operation did not complete within {}s", .waited.as_secs())]
    TimedOut {
        /// Total time spent waiting before giving up.
        waited: Duration,
    },

    /// The cancellation token fired at a suspension point.
    #[error("Operation polling was cancelled")]
    Cancelled,

    /// A status re-fetch failed, or the completed operation carried a
    /// provider-side error.
    #[error(transparent)]
    Api(#[from] VeoApiError),
}

/// Poll `operation` until its completion flag is set.
///
/// Performs no status check if the handle is already done. Otherwise
/// sleeps, re-fetches, and repeats -- exactly one status check per
/// wake-up, so an operation that completes after N polls sees N checks.
pub async fn run_to_completion<B: VeoBackend + ?Sized>(
    backend: &B,
    key: &str,
    mut operation: Operation,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<Operation, PollError> {
    let mut delay = config.initial_interval;
    let mut waited = Duration::ZERO;
    let mut checks = 0u32;

    while !operation.done {
        if waited >= config.max_wait {
            tracing::warn!(
                operation = %operation.name,
                checks,
                waited_secs = waited.as_secs(),
                "Polling budget exhausted",
            );
            return Err(PollError::TimedOut { waited });
        }

        // Never sleep past the budget.
        let sleep_for = delay.min(config.max_wait - waited);
        tokio::select! {
            _ = cancel.cancelled() => return Err(PollError::Cancelled),
            _ = tokio::time::sleep(sleep_for) => {}
        }
        waited += sleep_for;

        tokio::select! {
            _ = cancel.cancelled() => return Err(PollError::Cancelled),
            result = backend.refresh(key, &operation.name) => {
                operation = result?;
            }
        }
        checks += 1;

        delay = next_delay(delay, config);
    }

    // A completed operation can still carry a provider-side failure.
    if let Some(status) = &operation.error {
        return Err(PollError::Api(VeoApiError::Api {
            status: status.code.unwrap_or(500),
            code: status.status.clone(),
            message: status
                .message
                .clone()
                .unwrap_or_else(|| "operation failed".to_string()),
        }));
    }

    tracing::info!(operation = %operation.name, checks, "Operation completed");
    Ok(operation)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;
    use crate::api::GenerationRequest;

    /// Backend whose operation completes after a fixed number of polls.
    struct CountingBackend {
        polls_needed: u32,
        polls_seen: AtomicU32,
    }

    impl CountingBackend {
        fn new(polls_needed: u32) -> Self {
            Self {
                polls_needed,
                polls_seen: AtomicU32::new(0),
            }
        }

        fn pending_operation() -> Operation {
            serde_json::from_str(r#"{ "name": "operations/op-1", "done": false }"#).unwrap()
        }
    }

    #[async_trait]
    impl VeoBackend for CountingBackend {
        async fn submit(
            &self,
            _key: &str,
            _request: &GenerationRequest,
        ) -> Result<Operation, VeoApiError> {
            Ok(Self::pending_operation())
        }

        async fn refresh(&self, _key: &str, name: &str) -> Result<Operation, VeoApiError> {
            let seen = self.polls_seen.fetch_add(1, Ordering::SeqCst) + 1;
            let done = seen >= self.polls_needed;
            let body = if done {
                format!(
                    r#"{{ "name": "{name}", "done": true,
                         "response": {{ "generatedVideos": [
                             {{ "video": {{ "uri": "https://cdn.example/video.mp4" }} }}
                         ] }} }}"#
                )
            } else {
                format!(r#"{{ "name": "{name}", "done": false }}"#)
            };
            Ok(serde_json::from_str(&body).unwrap())
        }
    }

    #[test]
    fn next_delay_grows_and_clamps() {
        let config = PollConfig::default();
        let d = next_delay(Duration::from_secs(10), &config);
        assert_eq!(d, Duration::from_secs(15));

        let d = next_delay(Duration::from_secs(50), &config);
        assert_eq!(d, Duration::from_secs(60), "clamped to max_interval");

        let d = next_delay(Duration::from_secs(60), &config);
        assert_eq!(d, Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn completes_after_exactly_n_checks() {
        let backend = CountingBackend::new(3);
        let cancel = CancellationToken::new();

        let operation = run_to_completion(
            &backend,
            "key",
            CountingBackend::pending_operation(),
            &PollConfig::default(),
            &cancel,
        )
        .await
        .expect("operation should complete");

        assert!(operation.done);
        assert_eq!(backend.polls_seen.load(Ordering::SeqCst), 3);
        assert_eq!(operation.result_uri(), Some("https://cdn.example/video.mp4"));
    }

    #[tokio::test(start_paused = true)]
    async fn already_done_operation_performs_no_checks() {
        let backend = CountingBackend::new(1);
        let cancel = CancellationToken::new();

        let done: Operation =
            serde_json::from_str(r#"{ "name": "operations/op-1", "done": true }"#).unwrap();
        let operation =
            run_to_completion(&backend, "key", done, &PollConfig::default(), &cancel)
                .await
                .expect("operation should pass through");

        assert!(operation.done);
        assert_eq!(backend.polls_seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn budget_exhaustion_times_out() {
        // Operation that never completes.
        let backend = CountingBackend::new(u32::MAX);
        let cancel = CancellationToken::new();
        let config = PollConfig {
            initial_interval: Duration::from_secs(10),
            max_interval: Duration::from_secs(10),
            multiplier: 1.0,
            max_wait: Duration::from_secs(35),
        };

        let result = run_to_completion(
            &backend,
            "key",
            CountingBackend::pending_operation(),
            &config,
            &cancel,
        )
        .await;

        assert_matches!(result, Err(PollError::TimedOut { waited }) if waited >= config.max_wait);
        // 10s intervals against a 35s budget: checks at 10, 20, 30, 35.
        assert_eq!(backend.polls_seen.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_polling() {
        let backend = CountingBackend::new(u32::MAX);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = run_to_completion(
            &backend,
            "key",
            CountingBackend::pending_operation(),
            &PollConfig::default(),
            &cancel,
        )
        .await;

        assert_matches!(result, Err(PollError::Cancelled));
        assert_eq!(backend.polls_seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn completed_operation_with_error_status_fails() {
        struct FailingBackend;

        #[async_trait]
        impl VeoBackend for FailingBackend {
            async fn submit(
                &self,
                _key: &str,
                _request: &GenerationRequest,
            ) -> Result<Operation, VeoApiError> {
                unreachable!("submit is not exercised here")
            }

            async fn refresh(&self, _key: &str, name: &str) -> Result<Operation, VeoApiError> {
                let body = format!(
                    r#"{{ "name": "{name}", "done": true,
                         "error": {{ "code": 500, "message": "render failed",
                                     "status": "INTERNAL" }} }}"#
                );
                Ok(serde_json::from_str(&body).unwrap())
            }
        }

        let cancel = CancellationToken::new();
        let result = run_to_completion(
            &FailingBackend,
            "key",
            CountingBackend::pending_operation(),
            &PollConfig::default(),
            &cancel,
        )
        .await;

        assert_matches!(
            result,
            Err(PollError::Api(VeoApiError::Api { status: 500, .. }))
        );
    }
}
