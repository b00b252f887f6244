use serde::{Deserialize, Serialize};

/// A downloadable file attached to a release, or an external download page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub filename: String,
    pub download_url: String,
}

impl ReleaseAsset {
    pub fn new(filename: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            download_url: download_url.into(),
        }
    }
}

/// The latest release as shown on the download page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReleaseInfo {
    /// Version tag (e.g., "1.0.0")
    #[serde(default)]
    pub tag: String,
    /// Release title in the "LauncherName CodeName SemVer" format
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseInfo {
    pub fn build_name(&self) -> BuildName<'_> {
        BuildName::parse(&self.name)
    }
}

/// Code name and version taken from a release title.
///
/// Titles look like `Freesm Launcher Sequoia 1.0.0`: the last word is the
/// version and the one before it the code name. Titles with fewer than two
/// words yield neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildName<'a> {
    pub code_name: Option<&'a str>,
    pub version: Option<&'a str>,
}

impl<'a> BuildName<'a> {
    pub fn parse(name: &'a str) -> Self {
        let words: Vec<&str> = name.split(' ').collect();
        match words.as_slice() {
            [.., code_name, version] => Self {
                code_name: Some(*code_name).filter(|w| !w.is_empty()),
                version: Some(*version).filter(|w| !w.is_empty()),
            },
            _ => Self::default(),
        }
    }

    /// Heading text: code name and version separated by a space.
    pub fn heading(&self) -> String {
        format!(
            "{} {}",
            self.code_name.unwrap_or_default(),
            self.version.unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}
