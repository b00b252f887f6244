//! Settings shared by the `serve` and `render` commands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use log::debug;

use crate::github::{DEFAULT_REPO, GitHubReleases, RepoId};
use crate::http::{HttpClient, build_client};
use crate::i18n::Dictionaries;
use crate::service::DownloadService;

/// Seconds a fetched release is served before it is refetched.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Repository whose latest release is shown, as "owner/repo"
    #[arg(
        long,
        env = "FREESM_REPO",
        value_name = "OWNER/REPO",
        default_value = DEFAULT_REPO,
        global = true
    )]
    pub repo: RepoId,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", env = "FREESM_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Token used to authenticate against the GitHub API
    #[arg(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub github_token: Option<String>,

    /// Seconds before a fetched release is considered stale
    #[arg(
        long = "cache-ttl",
        env = "FREESM_CACHE_TTL",
        value_name = "SECONDS",
        default_value_t = DEFAULT_CACHE_TTL_SECS,
        global = true
    )]
    pub cache_ttl: u64,
}

impl Settings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Wire up the GitHub fetcher, the built-in dictionaries and the cache.
    pub fn build_service(&self) -> Result<DownloadService> {
        let token = self.github_token.as_deref().filter(|t| !t.is_empty());
        if token.is_some() {
            debug!("Using GitHub token for authentication");
        }

        let client = build_client(token)?;
        let fetcher = GitHubReleases::new(
            HttpClient::new(client),
            self.repo.clone(),
            self.api_url.clone(),
        );
        let dictionaries = Dictionaries::builtin().context("Failed to load dictionaries")?;

        Ok(DownloadService::new(
            Arc::new(fetcher),
            dictionaries,
            self.cache_ttl(),
        ))
    }
}
