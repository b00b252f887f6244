use serde::Deserialize;

use crate::release::{ReleaseAsset, ReleaseInfo};

/// Asset entry of a GitHub release response.
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

/// Subset of `GET /repos/{owner}/{repo}/releases/latest` the page needs.
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct Release {
    #[serde(default)]
    pub tag_name: String,
    pub name: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl From<Release> for ReleaseInfo {
    fn from(release: Release) -> Self {
        ReleaseInfo {
            tag: release.tag_name,
            name: release.name.unwrap_or_default(),
            assets: release
                .assets
                .into_iter()
                .map(|a| ReleaseAsset {
                    filename: a.name,
                    download_url: a.browser_download_url,
                })
                .collect(),
        }
    }
}
