//! Release feed of a GitHub-hosted command-line tool: fetching with retry and
//! caching, and the transformation of raw releases into changelog entries.

pub mod query;
pub mod release;

pub use query::{QueryOptions, QueryState, ReleaseQuery, Releases};
pub use release::{
    parse_change_notes, process_releases, release_date, total_downloads, ProcessedRelease,
    ReleaseKind, NO_DETAILED_RELEASE_NOTES, NO_RELEASE_NOTES,
};
