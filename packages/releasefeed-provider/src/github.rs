use async_trait::async_trait;
use hyper::Uri;
use regex::Regex;
use std::collections::HashMap;

use crate::data::RawRelease;
use crate::error::{FeedError, Result};
use crate::source::ReleaseSource;

use releasefeed_utils::http::get;

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_OWNER: &str = "MaximilianLS98";
pub const DEFAULT_REPO: &str = "MaxCLI";

const USER_AGENT: &str = concat!("releasefeed/", env!("CARGO_PKG_VERSION"));

/// Release listing of a single GitHub repository, fetched anonymously.
#[derive(Debug, Clone)]
pub struct GitHubReleases {
    owner: String,
    repo: String,
    api_url: String,
    reverse_proxy: Option<String>,
}

impl Default for GitHubReleases {
    fn default() -> Self {
        Self::new(DEFAULT_OWNER, DEFAULT_REPO)
    }
}

impl GitHubReleases {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        GitHubReleases {
            owner: owner.into(),
            repo: repo.into(),
            api_url: GITHUB_API_URL.to_string(),
            reverse_proxy: None,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Rewrite rules, one `<prefix> -> <replacement>` per line. A prefix
    /// starting with `regex:` is matched as a regular expression.
    pub fn with_reverse_proxy(mut self, rules: impl Into<String>) -> Self {
        let rules = rules.into();
        self.reverse_proxy = (!rules.trim().is_empty()).then_some(rules);
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn releases_url(&self) -> String {
        let url = format!(
            "{}/repos/{}/{}/releases",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.repo
        );
        self.replace_proxy_url(&url)
    }

    fn url_proxy_map(&self) -> Vec<(String, String)> {
        let Some(rules) = &self.reverse_proxy else {
            return Vec::new();
        };
        rules
            .lines()
            .filter_map(|line| {
                let (url_prefix, proxy_url) = line.split_once("->")?;
                let (url_prefix, proxy_url) = (url_prefix.trim(), proxy_url.trim());
                (!url_prefix.is_empty() && !proxy_url.is_empty())
                    .then(|| (url_prefix.to_string(), proxy_url.to_string()))
            })
            .collect()
    }

    fn replace_proxy_url(&self, url: &str) -> String {
        let mut result_url = url.to_string();
        for (url_prefix, proxy_url) in self.url_proxy_map() {
            if let Some(pattern) = url_prefix.strip_prefix("regex:") {
                match Regex::new(pattern.trim()) {
                    Ok(re) => {
                        result_url = re.replace_all(&result_url, proxy_url.as_str()).to_string()
                    }
                    Err(e) => tracing::warn!(pattern, error = %e, "ignoring invalid proxy rule"),
                }
            } else {
                result_url = result_url.replace(&url_prefix, &proxy_url);
            }
        }
        result_url
    }
}

#[async_trait]
impl ReleaseSource for GitHubReleases {
    fn cache_key(&self) -> String {
        format!("github-releases/{}/{}", self.owner, self.repo)
    }

    async fn fetch_releases(&self) -> Result<Vec<RawRelease>> {
        let url = self.releases_url();
        let uri: Uri = url
            .parse()
            .map_err(|e| FeedError::Transport(Box::new(e)))?;
        let header_map = HashMap::from([("User-Agent".to_string(), USER_AGENT.to_string())]);

        let rsp = get(uri, &header_map).await.map_err(FeedError::Transport)?;
        if !rsp.is_success() {
            tracing::warn!(%url, status = rsp.status, "release listing request failed");
            return Err(FeedError::Fetch {
                status: rsp.status,
                status_text: rsp.status_text,
            });
        }

        let releases: Vec<RawRelease> = serde_json::from_slice(&rsp.body)?;
        tracing::debug!(%url, count = releases.len(), "fetched releases");
        Ok(releases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[test]
    fn test_github_releases_url() {
        let source = GitHubReleases::default();
        assert_eq!(
            source.releases_url(),
            "https://api.github.com/repos/MaximilianLS98/MaxCLI/releases"
        );
        assert_eq!(source.cache_key(), "github-releases/MaximilianLS98/MaxCLI");

        let source = GitHubReleases::new("rust-lang", "rust").with_api_url("http://localhost:1/");
        assert_eq!(
            source.releases_url(),
            "http://localhost:1/repos/rust-lang/rust/releases"
        );
    }

    #[test]
    fn test_github_proxy_rules() {
        let source = GitHubReleases::default()
            .with_reverse_proxy("https://api.github.com -> https://mirror.example.org");
        assert_eq!(
            source.releases_url(),
            "https://mirror.example.org/repos/MaximilianLS98/MaxCLI/releases"
        );

        let source = GitHubReleases::default()
            .with_reverse_proxy("regex:^https://api\\.github\\.com/repos -> http://127.0.0.1:8080/gh");
        assert_eq!(
            source.releases_url(),
            "http://127.0.0.1:8080/gh/MaximilianLS98/MaxCLI/releases"
        );

        // Malformed lines and blank rule sets are ignored
        let source = GitHubReleases::default().with_reverse_proxy("no arrow here\n -> \n");
        assert_eq!(
            source.releases_url(),
            "https://api.github.com/repos/MaximilianLS98/MaxCLI/releases"
        );
        let source = GitHubReleases::default().with_reverse_proxy("   ");
        assert!(source.reverse_proxy.is_none());
    }

    #[tokio::test]
    async fn test_github_fetch_releases() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/repos/MaximilianLS98/MaxCLI/releases")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": 2, "tag_name": "v2.0.1", "name": "Bug fixes", "body": "- a",
                     "published_at": "2024-06-08T12:00:00Z", "prerelease": false, "draft": false,
                     "html_url": "https://github.com/MaximilianLS98/MaxCLI/releases/tag/v2.0.1",
                     "assets": [{"id": 1, "name": "a.tgz", "download_count": 3,
                                 "browser_download_url": "https://example.invalid/a.tgz"}]},
                    {"id": 1, "tag_name": "v2.0.0", "name": "", "body": "",
                     "published_at": "2024-05-15T09:30:00Z", "prerelease": false, "draft": false,
                     "html_url": "https://github.com/MaximilianLS98/MaxCLI/releases/tag/v2.0.0",
                     "assets": []}
                ]"#,
            )
            .create_async()
            .await;

        let source = GitHubReleases::default().with_api_url(server.url());
        let releases = source.fetch_releases().await.unwrap();

        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].tag_name, "v2.0.1");
        assert_eq!(releases[0].assets[0].download_count, 3);
        assert_eq!(releases[1].name.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_github_fetch_server_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/repos/MaximilianLS98/MaxCLI/releases")
            .with_status(500)
            .create_async()
            .await;

        let source = GitHubReleases::default().with_api_url(server.url());
        let err = source.fetch_releases().await.unwrap_err();

        match &err {
            FeedError::Fetch {
                status,
                status_text,
            } => {
                assert_eq!(*status, 500);
                assert_eq!(status_text, "Internal Server Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("500 Internal Server Error"));
    }

    #[tokio::test]
    async fn test_github_fetch_malformed_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/repos/MaximilianLS98/MaxCLI/releases")
            .with_status(200)
            .with_body(r#"{"message": "not a list"}"#)
            .create_async()
            .await;

        let source = GitHubReleases::default().with_api_url(server.url());
        let err = source.fetch_releases().await.unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));
    }

    #[tokio::test]
    async fn test_github_fetch_invalid_url() {
        let source = GitHubReleases::default().with_api_url("not a url");
        let err = source.fetch_releases().await.unwrap_err();
        assert!(matches!(err, FeedError::Transport(_)));
    }
}
