//! releasefeed - the changelog feed of a GitHub-hosted command-line tool.
//!
//! Raw releases are fetched from the GitHub REST API with retry and a
//! freshness-window cache, then turned into display-ready changelog entries.

pub use releasefeed_cache as cache;
pub use releasefeed_config as config;
pub use releasefeed_core as core;
pub use releasefeed_provider as provider;
pub use releasefeed_utils as utils;

// Re-export commonly used types for convenience
pub use releasefeed_config::FeedConfig;
pub use releasefeed_core::{
    process_releases, ProcessedRelease, QueryOptions, QueryState, ReleaseKind, ReleaseQuery,
};
pub use releasefeed_provider::{FeedError, GitHubReleases, RawRelease, ReleaseSource};
