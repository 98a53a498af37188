pub mod entry;
pub mod query_cache;

pub use entry::CacheEntry;
pub use query_cache::{QueryCache, DEFAULT_STALE_TIME};
