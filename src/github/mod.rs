//! GitHub release API access.

mod client;
mod types;

use anyhow::Result;
use std::fmt;
use std::str::FromStr;

pub use client::{DEFAULT_API_URL, GitHubReleases, ReleaseFetcher};
#[cfg(test)]
pub use client::MockReleaseFetcher;

/// Repository whose releases feed the download page.
pub const DEFAULT_REPO: &str = "FreesmTeam/FreesmLauncher";

/// Repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            [owner, repo] if !owner.is_empty() && !repo.is_empty() => Ok(RepoId {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => anyhow::bail!("Invalid repository format. Expected 'owner/repo'."),
        }
    }
}
