use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of the GitHub "list releases" payload. Fields not listed here are
/// ignored; `null` and missing values fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRelease {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// ISO-8601; GitHub reports `null` for drafts.
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prerelease: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub draft: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub html_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<RawAsset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAsset {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub download_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub browser_download_url: String,
}
