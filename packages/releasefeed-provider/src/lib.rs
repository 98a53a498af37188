pub mod data;
pub mod error;
pub mod github;
pub mod source;

// Re-export common types
pub use data::{RawAsset, RawRelease};
pub use error::FeedError;
pub use github::{GitHubReleases, DEFAULT_OWNER, DEFAULT_REPO, GITHUB_API_URL};
pub use source::ReleaseSource;
