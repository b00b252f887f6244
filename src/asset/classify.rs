use crate::platform::{Platform, WindowsArch};
use crate::release::ReleaseAsset;

/// Package-manager pages listed ahead of the Linux release files, in display order.
pub const LINUX_PACKAGE_LINKS: [(&str, &str); 3] = [
    (
        "pkgbuild - Debian",
        "https://github.com/FreesmTeam/freesm-deb-pkgbuild",
    ),
    (
        "pkgbuild - Arch Linux (-bin)",
        "https://aur.archlinux.org/packages/freesmlauncher-bin",
    ),
    (
        "pkgbuild - Arch Linux",
        "https://aur.archlinux.org/packages/freesmlauncher",
    ),
];

/// Whether an asset filename names the given platform (case-insensitive).
pub fn matches_platform(filename: &str, platform: Platform) -> bool {
    filename.to_lowercase().contains(platform.asset_keyword())
}

/// Assets to offer for `platform`, in the order they are shown.
///
/// Linux additionally gets the package-manager pages in front of the
/// release files.
pub fn classify(assets: &[ReleaseAsset], platform: Platform) -> Vec<ReleaseAsset> {
    let matching = assets
        .iter()
        .filter(|a| matches_platform(&a.filename, platform))
        .cloned();

    match platform {
        Platform::Linux => LINUX_PACKAGE_LINKS
            .iter()
            .map(|(name, url)| ReleaseAsset::new(*name, *url))
            .chain(matching)
            .collect(),
        Platform::MacOs | Platform::Windows => matching.collect(),
    }
}

/// The Windows builds that belong in `arch`'s column.
pub fn windows_column<'a>(assets: &'a [ReleaseAsset], arch: WindowsArch) -> Vec<&'a ReleaseAsset> {
    assets.iter().filter(|a| arch.matches(&a.filename)).collect()
}
