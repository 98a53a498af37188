use std::time::Duration;
use tokio::time::Instant;

/// Outcome of one fetch together with the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T, E> {
    pub result: Result<T, E>,
    pub updated_at: Instant,
}

impl<T, E> CacheEntry<T, E> {
    pub fn new(result: Result<T, E>) -> Self {
        Self {
            result,
            updated_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.updated_at.elapsed()
    }

    /// Errors are never fresh.
    pub fn is_fresh(&self, stale_time: Duration) -> bool {
        self.result.is_ok() && self.age() < stale_time
    }
}
