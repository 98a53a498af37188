use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use releasefeed_cache::{QueryCache, DEFAULT_STALE_TIME};
use releasefeed_config::FeedConfig;
use releasefeed_provider::{FeedError, GitHubReleases, RawRelease, ReleaseSource};
use releasefeed_utils::RetryPolicy;

use crate::release::{process_releases, ProcessedRelease};

pub type Releases = Arc<Vec<ProcessedRelease>>;

type RawCache = QueryCache<Arc<Vec<RawRelease>>, Arc<FeedError>>;

/// Observable state of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Never requested.
    Idle,
    Loading,
    /// Retries are spent; `refetch` tries again.
    Error { message: String },
    Success(T),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            QueryState::Error { message } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub stale_time: Duration,
    pub retry: RetryPolicy,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
            retry: RetryPolicy::default(),
        }
    }
}

/// Fetches, caches and processes the release feed of one source.
///
/// Every `fetch`/`refetch` call takes a new generation; a completion whose
/// generation has been superseded is dropped without touching the cache or
/// the published state, so the most recent call always wins.
pub struct ReleaseQuery<S> {
    source: S,
    options: QueryOptions,
    cache: RawCache,
    state: RwLock<QueryState<Releases>>,
    generation: AtomicU64,
}

impl ReleaseQuery<GitHubReleases> {
    pub fn from_config(config: &FeedConfig) -> Self {
        let mut source =
            GitHubReleases::new(&config.owner, &config.repo).with_api_url(&config.api_url);
        if let Some(rules) = &config.reverse_proxy {
            source = source.with_reverse_proxy(rules);
        }
        let options = QueryOptions {
            stale_time: config.stale_time(),
            retry: config.retry.policy(),
        };
        Self::new(source, options)
    }
}

impl<S: ReleaseSource> ReleaseQuery<S> {
    pub fn new(source: S, options: QueryOptions) -> Self {
        Self {
            source,
            options,
            cache: QueryCache::new(),
            state: RwLock::new(QueryState::Idle),
            generation: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub async fn state(&self) -> QueryState<Releases> {
        self.state.read().await.clone()
    }

    /// Serves the cached feed while it is fresh, otherwise goes to the source.
    pub async fn fetch(&self) -> QueryState<Releases> {
        let key = self.source.cache_key();
        if let Some(raw) = self.cache.get_fresh(&key, self.options.stale_time).await {
            tracing::debug!(key = key.as_str(), "serving releases from cache");
            let generation = self.next_generation();
            let state = QueryState::Success(Arc::new(process_releases(&raw)));
            let mut current = self.state.write().await;
            if self.is_current(generation) {
                *current = state.clone();
            }
            return current.clone();
        }
        self.run(&key).await
    }

    /// Manual retry: always goes to the source.
    pub async fn refetch(&self) -> QueryState<Releases> {
        let key = self.source.cache_key();
        self.run(&key).await
    }

    pub async fn invalidate(&self) {
        self.cache.remove(&self.source.cache_key()).await;
    }

    /// The release flagged latest in the current successful state.
    pub async fn latest(&self) -> Option<ProcessedRelease> {
        let state = self.state.read().await;
        state
            .data()
            .and_then(|releases| releases.iter().find(|r| r.is_latest).cloned())
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn run(&self, key: &str) -> QueryState<Releases> {
        let generation = self.next_generation();
        {
            let mut current = self.state.write().await;
            if self.is_current(generation) {
                *current = QueryState::Loading;
            }
        }

        let result = self
            .options
            .retry
            .run(|| self.source.fetch_releases())
            .await;

        // Hold the state lock so a newer call cannot slip in between the
        // generation check and the write.
        let mut current = self.state.write().await;
        if !self.is_current(generation) {
            tracing::debug!(key, generation, "discarding superseded release fetch");
            return current.clone();
        }

        let state = match result {
            Ok(raw) => {
                tracing::info!(key, count = raw.len(), "release feed updated");
                let raw = Arc::new(raw);
                let processed = process_releases(&raw);
                self.cache.set(key, Ok(raw)).await;
                QueryState::Success(Arc::new(processed))
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "release feed unavailable");
                let message = e.to_string();
                self.cache.set(key, Err(Arc::new(e))).await;
                QueryState::Error { message }
            }
        };
        *current = state.clone();
        state
    }
}
