//! Retry policy for transient failures of outbound calls.
//!
//! A policy is a maximum number of attempts plus a backoff function mapping
//! the index of the attempt that just failed (1-based) to the delay before
//! the next one. The same policy is applied to registry structure fetches
//! and prediction calls; it does not look at the error type.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Backoff function: failed attempt index (1-based) -> delay.
pub type Backoff = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

    /// Policy with a custom backoff function. `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self { max_attempts: max_attempts.max(1), backoff }
    }

    /// Linear backoff: the delay after failed attempt `k` is `k * base`,
    /// saturating at `Duration::MAX`.
    pub fn linear(max_attempts: u32, base: Duration) -> Self {
        Self::new(max_attempts, Arc::new(move |failed: u32| base.saturating_mul(failed)))
    }

    /// Single attempt, never waits.
    pub fn no_retry() -> Self {
        Self::new(1, Arc::new(|_: u32| Duration::ZERO))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay applied after attempt `failed_attempt` fails.
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        (self.backoff)(failed_attempt)
    }

    /// Run `operation` until it succeeds or the attempts are used up.
    /// The error of the last attempt is returned unchanged.
    pub async fn run<T, E, F, Fut>(&self, operation_name: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(
                            operation = operation_name,
                            attempt,
                            "Operation succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(err) if attempt >= self.max_attempts => {
                    tracing::warn!(
                        operation = operation_name,
                        attempts = attempt,
                        error = %err,
                        "Retries exhausted"
                    );
                    return Err(err);
                }
                Err(err) => {
                    let delay = self.delay_after(attempt);
                    tracing::info!(
                        operation = operation_name,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retry attempt failed, retrying..."
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::linear(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_BASE_DELAY)
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[test]
    fn test_linear_backoff_grows_with_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.max_attempts(), 3);
    }

    #[test]
    fn test_huge_base_delay_saturates() {
        let policy = RetryPolicy::linear(3, Duration::from_millis(u64::MAX));
        assert_eq!(policy.delay_after(2), Duration::MAX);
    }

    #[test]
    fn test_zero_attempts_is_clamped() {
        assert_eq!(RetryPolicy::linear(0, Duration::from_millis(5)).max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_first_success_does_not_retry() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = RetryPolicy::default()
            .run("op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(7) }
            })
            .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_after_three_attempts_with_linear_delays() {
        let start = Instant::now();
        let stamps = Mutex::new(Vec::new());

        let result: Result<(), String> = RetryPolicy::default()
            .run("op", || {
                let mut stamps = stamps.lock().unwrap();
                stamps.push(start.elapsed());
                let n = stamps.len();
                async move { Err(format!("failure {}", n)) }
            })
            .await;

        // Last error propagated verbatim
        assert_eq!(result, Err("failure 3".to_string()));

        let stamps = stamps.into_inner().unwrap();
        assert_eq!(stamps.len(), 3);
        assert_eq!(stamps[0], Duration::ZERO);
        assert_eq!(stamps[1], Duration::from_secs(1));
        assert_eq!(stamps[2], Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_on_second_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, &str> = RetryPolicy::default()
            .run("op", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { if n == 0 { Err("transient") } else { Ok("done") } }
            })
            .await;
        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_custom_backoff_function_is_used() {
        let policy = RetryPolicy::new(4, Arc::new(|k: u32| Duration::from_millis(u64::from(k) * 10)));
        assert_eq!(policy.delay_after(3), Duration::from_millis(30));
        assert_eq!(policy.max_attempts(), 4);
    }
}
