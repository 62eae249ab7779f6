//! Bounded retry with backoff and cooperative cancellation.

use std::future::Future;
use tracing::{debug, warn};
use warden_core::{CancelToken, RetryConfig, RetryError, Transient};

/// Runs a fallible operation up to `max_attempts` times, pausing between
/// attempts per the configured backoff.
///
/// Non-transient errors abort immediately with [`RetryError::Permanent`].
/// If the caller's token fires while a backoff pause is in progress, `run`
/// returns [`RetryError::Cancelled`] right away instead of completing the
/// remaining attempts.
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Get the retry configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute `op`, retrying transient failures.
    pub async fn run<T, E, F, Fut>(
        &self,
        cancel: &dyn CancelToken,
        mut op: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + Transient,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(RetryError::Cancelled);
            }

            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_transient() => {
                    debug!(error = %err, "non-retryable failure, giving up");
                    return Err(RetryError::Permanent(err));
                }
                Err(err) if attempt >= max_attempts => {
                    warn!(attempts = max_attempts, error = %err, "retries exhausted");
                    return Err(RetryError::Exhausted {
                        attempts: max_attempts,
                        last_error: err,
                    });
                }
                Err(err) => {
                    let pause = self.config.backoff_for(attempt);
                    debug!(
                        attempt,
                        pause_ms = pause.as_millis() as u64,
                        error = %err,
                        "transient failure, backing off"
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(RetryError::Cancelled),
                        _ = tokio::time::sleep(pause) => {}
                    }
                }
            }

            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use thiserror::Error;
    use warden_core::{ManualCancel, NeverCancel};

    #[derive(Debug, Clone, Error, PartialEq, Eq)]
    enum FakeError {
        #[error("transient")]
        Transient,
        #[error("terminal")]
        Terminal,
    }

    impl Transient for FakeError {
        fn is_transient(&self) -> bool {
            matches!(self, FakeError::Transient)
        }
    }

    fn executor(max_attempts: u32) -> RetryExecutor {
        RetryExecutor::new(RetryConfig::fixed(max_attempts, Duration::from_millis(1)))
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, RetryError<FakeError>> = executor(3)
            .run(&NeverCancel, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, RetryError<FakeError>> = executor(5)
            .run(&NeverCancel, || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(FakeError::Transient)
                    } else {
                        Ok(7)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_after_exactly_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, RetryError<FakeError>> = executor(3)
            .run(&NeverCancel, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FakeError::Transient) }
            })
            .await;

        assert_eq!(
            result.unwrap_err(),
            RetryError::Exhausted {
                attempts: 3,
                last_error: FakeError::Transient,
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, RetryError<FakeError>> = executor(3)
            .run(&NeverCancel, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FakeError::Terminal) }
            })
            .await;

        assert_eq!(result.unwrap_err(), RetryError::Permanent(FakeError::Terminal));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_all_attempts() {
        let token = ManualCancel::new();
        token.cancel();

        let calls = AtomicU32::new(0);
        let result: Result<u32, RetryError<FakeError>> = executor(3)
            .run(&token, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FakeError::Transient) }
            })
            .await;

        assert_eq!(result.unwrap_err(), RetryError::Cancelled);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_during_backoff_returns_promptly() {
        let token = Arc::new(ManualCancel::new());
        let executor =
            RetryExecutor::new(RetryConfig::fixed(3, Duration::from_secs(3600)));

        let canceller = {
            let token = Arc::clone(&token);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                token.cancel();
            })
        };

        let calls = AtomicU32::new(0);
        let result: Result<u32, RetryError<FakeError>> = executor
            .run(token.as_ref(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FakeError::Transient) }
            })
            .await;

        canceller.await.unwrap();
        assert_eq!(result.unwrap_err(), RetryError::Cancelled);
        // Cancelled during the first backoff pause, not after more attempts.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
