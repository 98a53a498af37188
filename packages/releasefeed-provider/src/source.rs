use async_trait::async_trait;

use crate::data::RawRelease;
use crate::error::Result;

/// Something that can list the raw releases of one repository.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Identifies the resource; results are cached under this key.
    fn cache_key(&self) -> String;

    async fn fetch_releases(&self) -> Result<Vec<RawRelease>>;
}
