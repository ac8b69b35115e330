use crate::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry parameters: total attempts (including the first) and the base
/// backoff delay, which doubles after each failed attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
        }
    }

    /// Backoff after the `attempt`-th failure (1-based):
    /// `base_delay * 2^(attempt - 1)`.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
        let ms = (self.base_delay.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(ms)
    }
}

/// Runs a single-call action with bounded retries and exponential backoff.
///
/// Every failure is retried the same way regardless of cause; after the last
/// attempt the final error is returned unchanged. Backoff waits suspend the
/// task, never the runtime.
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub async fn run<T, F, Fut>(&self, mut action: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.policy.attempts;
        let mut attempt = 1u32;
        loop {
            match action().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < attempts => {
                    let delay = self.policy.backoff_delay(attempt);
                    warn!(
                        attempt,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    fn policy(attempts: u32, base_ms: u64) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::from_millis(base_ms))
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let p = policy(4, 100);
        assert_eq!(p.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(p.backoff_delay(2), Duration::from_millis(200));
        assert_eq!(p.backoff_delay(3), Duration::from_millis(400));
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        assert_eq!(policy(0, 100).attempts, 1);
    }

    #[tokio::test]
    async fn test_success_on_first_attempt_makes_one_call() {
        let calls = Arc::new(AtomicU32::new(0));
        let executor = RetryExecutor::new(policy(3, 1));
        let counter = Arc::clone(&calls);
        let result = executor
            .run(|| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Error>(42)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let executor = RetryExecutor::new(policy(3, 1));
        let counter = Arc::clone(&calls);
        let result = executor
            .run(|| {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 3 {
                        Err(Error::runtime("transient"))
                    } else {
                        Ok("recovered")
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let executor = RetryExecutor::new(policy(3, 1));
        let counter = Arc::clone(&calls);
        let result: Result<()> = executor
            .run(|| {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    Err(Error::runtime(format!("failure {}", n)))
                }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(result.unwrap_err().to_string().contains("failure 3"));
    }

    #[tokio::test]
    async fn test_backoff_delays_are_non_decreasing() {
        let executor = RetryExecutor::new(policy(3, 20));
        let starts = Arc::new(std::sync::Mutex::new(Vec::<Instant>::new()));
        let recorder = Arc::clone(&starts);
        let _: Result<()> = executor
            .run(|| {
                let recorder = Arc::clone(&recorder);
                async move {
                    recorder.lock().unwrap().push(Instant::now());
                    Err(Error::runtime("always"))
                }
            })
            .await;
        let starts = starts.lock().unwrap();
        assert_eq!(starts.len(), 3);
        let first_gap = starts[1] - starts[0];
        let second_gap = starts[2] - starts[1];
        assert!(first_gap >= Duration::from_millis(20));
        assert!(second_gap >= Duration::from_millis(40));
        assert!(second_gap >= first_gap);
    }
}
