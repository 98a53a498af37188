use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(30_000);

/// Exponential backoff: the delay before retry `i` is `min(base * 2^i, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn delay_for(&self, retry_index: u32) -> Duration {
        let factor = 2u32.checked_pow(retry_index).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Runs `op` until it succeeds or the retries are spent, sleeping between
    /// attempts. The last error is returned.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut retry_index = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if retry_index < self.max_retries => {
                    let delay = self.delay_for(retry_index);
                    tracing::warn!(
                        retry = retry_index + 1,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retry_index += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(4), Duration::from_millis(16000));
        assert_eq!(policy.delay_for(5), Duration::from_millis(30000));
        assert_eq!(policy.delay_for(40), Duration::from_millis(30000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_exhausts_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let result: Result<(), String> = RetryPolicy::default()
            .run(|| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("500 Internal Server Error".to_string())
                }
            })
            .await;

        assert_eq!(result.unwrap_err(), "500 Internal Server Error");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // 1000 + 2000 + 4000
        assert_eq!(start.elapsed(), Duration::from_millis(7000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_recovers() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let result = RetryPolicy::default()
            .run(|| {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(format!("attempt {} failed", n))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(2));
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn test_no_retry_fails_once() {
        let calls = AtomicU32::new(0);
        let result: Result<(), &str> = RetryPolicy::no_retry()
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("boom") }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
