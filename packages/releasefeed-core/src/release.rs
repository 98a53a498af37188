use once_cell::sync::Lazy;
use regex::Regex;
use releasefeed_provider::{RawAsset, RawRelease};
use serde::{Deserialize, Serialize};
use std::fmt;

static VERSION_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v?([0-9]+)\.([0-9]+)\.([0-9]+)").unwrap());

static BULLET_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*+]\s").unwrap());

static NUMBERED_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.\s").unwrap());

pub const NO_RELEASE_NOTES: &str = "No release notes available";
pub const NO_DETAILED_RELEASE_NOTES: &str = "No detailed release notes available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    Major,
    Minor,
    Patch,
}

impl ReleaseKind {
    /// `x.0.0` is major, `x.y.0` is minor, anything else (including tags that
    /// are not version-shaped at all) is patch. Suffixes after the patch
    /// number are ignored.
    pub fn from_tag(tag: &str) -> Self {
        let Some(caps) = VERSION_TAG_REGEX.captures(tag) else {
            return ReleaseKind::Patch;
        };
        match (&caps[2], &caps[3]) {
            ("0", "0") => ReleaseKind::Major,
            (_, "0") => ReleaseKind::Minor,
            _ => ReleaseKind::Patch,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseKind::Major => "major",
            ReleaseKind::Minor => "minor",
            ReleaseKind::Patch => "patch",
        }
    }
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-ready view of one published release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedRelease {
    pub version: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: ReleaseKind,
    pub description: String,
    pub changes: Vec<String>,
    pub downloads: u64,
    pub is_latest: bool,
    pub html_url: String,
    pub prerelease: bool,
}

impl ProcessedRelease {
    pub fn from_raw(raw: &RawRelease, is_latest: bool) -> Self {
        let description = match raw.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Release {}", raw.tag_name),
        };
        ProcessedRelease {
            version: raw.tag_name.clone(),
            date: raw
                .published_at
                .as_deref()
                .map(release_date)
                .unwrap_or_default()
                .to_string(),
            kind: ReleaseKind::from_tag(&raw.tag_name),
            description,
            changes: parse_change_notes(raw.body.as_deref()),
            downloads: total_downloads(&raw.assets),
            is_latest,
            html_url: raw.html_url.clone(),
            prerelease: raw.prerelease,
        }
    }
}

/// Date part of an ISO-8601 timestamp.
pub fn release_date(published_at: &str) -> &str {
    published_at
        .split_once('T')
        .map_or(published_at, |(date, _)| date)
}

pub fn total_downloads(assets: &[RawAsset]) -> u64 {
    assets.iter().map(|asset| asset.download_count).sum()
}

/// Splits a Markdown release body into change notes. Never returns an empty
/// list: bodies without usable lines yield a single placeholder note.
pub fn parse_change_notes(body: Option<&str>) -> Vec<String> {
    let body = match body {
        Some(body) if !body.is_empty() => body,
        _ => return vec![NO_RELEASE_NOTES.to_string()],
    };
    // `str::trim` does not count a byte order mark as whitespace
    let body = body.strip_prefix('\u{feff}').unwrap_or(body);

    let mut changes = Vec::new();
    for line in body.split('\n') {
        let trimmed = line.trim();
        // Headings and blank lines
        if trimmed.is_empty() || line.starts_with('#') {
            continue;
        }

        if BULLET_MARKER_REGEX.is_match(line) {
            changes.push(BULLET_MARKER_REGEX.replace(line, "").trim().to_string());
        } else if NUMBERED_MARKER_REGEX.is_match(line) {
            changes.push(NUMBERED_MARKER_REGEX.replace(line, "").trim().to_string());
        } else if !line.starts_with("##") {
            changes.push(trimmed.to_string());
        }
    }

    if changes.is_empty() {
        vec![NO_DETAILED_RELEASE_NOTES.to_string()]
    } else {
        changes
    }
}

/// Drops drafts and converts the rest, keeping the source order. The first
/// remaining release is flagged as latest; the upstream order is trusted.
pub fn process_releases(releases: &[RawRelease]) -> Vec<ProcessedRelease> {
    releases
        .iter()
        .filter(|release| !release.draft)
        .enumerate()
        .map(|(index, release)| ProcessedRelease::from_raw(release, index == 0))
        .collect()
}
