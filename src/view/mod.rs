//! The download view: what to show for a platform given the release fetch state.
//!
//! [`build_view`] turns inputs into a [`DownloadsView`]; the `html` and
//! `text` renderers turn that into output. Locale and translations are
//! passed in explicitly.

pub mod html;
pub mod text;

use crate::asset::{self, FormattedAssetName};
use crate::i18n::Dictionary;
use crate::locale::Locale;
use crate::platform::{Platform, PlatformSelection, WINDOWS_PLATFORMS, WindowsArch};
use crate::query::QueryState;
use crate::release::{ReleaseAsset, ReleaseInfo};

pub const VC_REDIST: &str = "Visual C++ Redistributable";

/// Resolved locale and its translations.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub locale: Locale,
    pub dictionary: &'a Dictionary,
}

impl<'a> ViewContext<'a> {
    pub fn new(locale: Locale, dictionary: &'a Dictionary) -> Self {
        Self { locale, dictionary }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadsView {
    DetectingPlatform {
        message: String,
    },
    Loading {
        message: String,
    },
    Failed {
        prefix: String,
        message: String,
        hint: String,
    },
    Release(ReleaseView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseView {
    /// Code name and version, e.g. "Sequoia 1.0.0"
    pub heading: String,
    pub links: ReleaseLinks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseLinks {
    /// Linux and macOS: one vertical list.
    List(Vec<DownloadLink>),
    /// Windows: one column per architecture.
    Columns(Vec<ArchColumn>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchColumn {
    pub arch: WindowsArch,
    pub links: Vec<DownloadLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub url: String,
    pub display_name: String,
    pub extension: String,
    /// Marks the recommended build.
    pub starred: bool,
    /// Second line under the link, e.g. a runtime requirement.
    pub note: Option<String>,
}

impl ReleaseLinks {
    /// Every link in display order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &DownloadLink> + '_> {
        match self {
            ReleaseLinks::List(links) => Box::new(links.iter()),
            ReleaseLinks::Columns(columns) => Box::new(columns.iter().flat_map(|c| c.links.iter())),
        }
    }
}

/// Decide what the download area shows.
///
/// The placeholder platform wins over any fetch state; after that the
/// fetch decides between loading, error and the release itself.
pub fn build_view(
    platform: PlatformSelection,
    state: &QueryState<ReleaseInfo>,
    ctx: &ViewContext<'_>,
) -> DownloadsView {
    let text = ctx.dictionary.downloads();

    let platform = match platform {
        PlatformSelection::Placeholder => {
            return DownloadsView::DetectingPlatform {
                message: text.getting_platform.clone(),
            };
        }
        PlatformSelection::Known(platform) => platform,
    };

    match state {
        QueryState::Pending => DownloadsView::Loading {
            message: text.loading.clone(),
        },
        QueryState::Failed(error) => DownloadsView::Failed {
            prefix: text.error.clone(),
            message: error.message().to_string(),
            hint: text.try_to_refresh.clone(),
        },
        QueryState::Ready(release) => DownloadsView::Release(release_view(release, platform, ctx)),
    }
}

fn release_view(release: &ReleaseInfo, platform: Platform, ctx: &ViewContext<'_>) -> ReleaseView {
    let builds = asset::classify(&release.assets, platform);

    let links = match platform {
        Platform::Linux | Platform::MacOs => ReleaseLinks::List(
            builds
                .iter()
                .filter_map(|build| {
                    let name = asset::format_name(&build.filename, ctx.dictionary.assets())?;
                    let starred = name.display_name.contains("Universal")
                        || name.extension.contains(".AppImage");
                    Some(link(build, name, starred, None))
                })
                .collect(),
        ),
        Platform::Windows => ReleaseLinks::Columns(
            WINDOWS_PLATFORMS
                .iter()
                .map(|&arch| ArchColumn {
                    arch,
                    links: windows_links(&builds, arch, ctx),
                })
                .collect(),
        ),
    };

    ReleaseView {
        heading: release.build_name().heading(),
        links,
    }
}

fn windows_links(builds: &[ReleaseAsset], arch: WindowsArch, ctx: &ViewContext<'_>) -> Vec<DownloadLink> {
    let requires = &ctx.dictionary.downloads().requires;

    asset::windows_column(builds, arch)
        .into_iter()
        .filter_map(|build| {
            let name = asset::format_name(&build.filename, ctx.dictionary.assets())?;
            let installer_type = name.installer_type.clone().unwrap_or_default();

            if installer_type.contains("msvc") {
                let note = format!("({} {})", requires, VC_REDIST);
                return Some(link(build, name, false, Some(note)));
            }

            let starred = arch == WindowsArch::X64 && installer_type.contains("MSVC - setup");
            Some(link(build, name, starred, None))
        })
        .collect()
}

fn link(build: &ReleaseAsset, name: FormattedAssetName, starred: bool, note: Option<String>) -> DownloadLink {
    DownloadLink {
        url: build.download_url.clone(),
        display_name: name.display_name,
        extension: name.extension,
        starred,
        note,
    }
}
