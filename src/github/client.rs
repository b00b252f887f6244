use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};

use crate::http::HttpClient;
use crate::release::ReleaseInfo;

use super::RepoId;
use super::types::Release;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Source of the latest release shown on the download page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseFetcher: Send + Sync {
    async fn fetch_latest_release(&self) -> Result<ReleaseInfo>;
}

/// Fetches the latest release of one repository from the GitHub REST API.
pub struct GitHubReleases {
    http_client: HttpClient,
    api_url: String,
    repo: RepoId,
}

impl GitHubReleases {
    pub fn new(http_client: HttpClient, repo: RepoId, api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            repo,
        }
    }

    fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url, self.repo.owner, self.repo.repo
        )
    }
}

#[async_trait]
impl ReleaseFetcher for GitHubReleases {
    #[tracing::instrument(skip(self))]
    async fn fetch_latest_release(&self) -> Result<ReleaseInfo> {
        let url = self.latest_release_url();
        debug!("Fetching latest release from {}...", url);

        let release: Release = self.http_client.get_json(&url).await?;
        info!(
            "Latest release of {} is {} with {} assets",
            self.repo,
            release.tag_name,
            release.assets.len()
        );

        Ok(release.into())
    }
}
