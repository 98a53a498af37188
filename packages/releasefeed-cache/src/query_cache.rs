use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::entry::CacheEntry;

pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// In-memory store of query outcomes keyed by resource. Freshness is decided
/// by the caller through [`QueryCache::get_fresh`] or [`CacheEntry::is_fresh`].
pub struct QueryCache<T, E> {
    entries: RwLock<HashMap<String, CacheEntry<T, E>>>,
}

impl<T, E> Default for QueryCache<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> QueryCache<T, E> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn set(&self, key: &str, result: Result<T, E>) {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), CacheEntry::new(result));
    }

    pub async fn remove(&self, key: &str) -> bool {
        let mut entries = self.entries.write().await;
        entries.remove(key).is_some()
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<T: Clone, E: Clone> QueryCache<T, E> {
    pub async fn get(&self, key: &str) -> Option<CacheEntry<T, E>> {
        let entries = self.entries.read().await;
        entries.get(key).cloned()
    }

    /// Returns the cached value only while it is within `stale_time`.
    pub async fn get_fresh(&self, key: &str, stale_time: Duration) -> Option<T> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if !entry.is_fresh(stale_time) {
            tracing::debug!(key, age_ms = entry.age().as_millis() as u64, "cache entry stale");
            return None;
        }
        entry.result.as_ref().ok().cloned()
    }
}
