//! Display names for release assets.
//!
//! Release files follow `<Product>-<OS>[-<variant>...][-<version>].<ext>`,
//! e.g. `FreesmLauncher-Windows-MSVC-arm64-Setup-1.0.0.exe`. The variant
//! words are turned into a short localized label; the OS and version are
//! already shown elsewhere on the page and are left out.

use crate::i18n::AssetLabels;
use crate::platform::Platform;

/// Prefix of the package-manager entries added for Linux.
const PACKAGE_PREFIX: &str = "pkgbuild - ";

/// Known file extensions, in canonical spelling.
const EXTENSIONS: [&str; 10] = [
    ".AppImage", ".tar.gz", ".tar.xz", ".flatpak", ".zip", ".exe", ".msi", ".dmg", ".deb", ".rpm",
];

/// How an asset is labelled on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedAssetName {
    pub display_name: String,
    pub extension: String,
    /// Build family of a Windows asset, e.g. `MSVC - setup`.
    ///
    /// Installers that bundle the Visual C++ runtime are tagged `MSVC`;
    /// builds that need the Redistributable installed separately are tagged
    /// with a lowercase `msvc`.
    pub installer_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toolchain {
    Msvc,
    MinGw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Packaging {
    Setup,
    Portable,
}

#[derive(Debug, Default)]
struct Variant<'a> {
    os: Option<Platform>,
    toolchain: Option<Toolchain>,
    packaging: Option<Packaging>,
    legacy: bool,
    qt: Option<&'a str>,
    arch: Option<&'static str>,
    other: Vec<&'a str>,
}

/// Label an asset for display, or `None` when it should not be offered
/// (checksums, signatures, update metadata, source archives).
pub fn format_name(filename: &str, labels: &AssetLabels) -> Option<FormattedAssetName> {
    if let Some(distro) = filename.strip_prefix(PACKAGE_PREFIX) {
        return Some(FormattedAssetName {
            display_name: format!("{} - {}", labels.package, distro),
            extension: String::new(),
            installer_type: None,
        });
    }

    let (stem, extension) = split_extension(filename)?;
    let variant = parse_variant(stem);
    let os = variant.os?;

    let packaging = variant.packaging.or(match extension {
        ".exe" | ".msi" => Some(Packaging::Setup),
        ".zip" | ".tar.gz" | ".tar.xz" => Some(Packaging::Portable),
        _ => None,
    });

    let mut words: Vec<String> = Vec::new();
    match os {
        Platform::Linux => {
            if extension == ".AppImage" {
                words.push("AppImage".to_string());
            } else if let Some(p) = variant.packaging {
                words.push(packaging_label(p, labels).to_string());
            }
            if variant.legacy {
                words.push(labels.legacy.clone());
            }
            if let Some(qt) = variant.qt {
                words.push(qt.to_string());
            }
            if let Some(arch) = variant.arch {
                words.push(arch.to_string());
            }
        }
        Platform::MacOs => {
            if variant.legacy {
                words.push(labels.legacy.clone());
            } else {
                words.push("Universal".to_string());
            }
        }
        Platform::Windows => {
            if let Some(toolchain) = variant.toolchain {
                words.push(toolchain_name(toolchain).to_string());
            }
            if variant.legacy {
                words.push(labels.legacy.clone());
            }
            if let Some(p) = packaging {
                words.push(packaging_label(p, labels).to_string());
            }
        }
    }
    words.extend(variant.other.iter().map(|w| w.to_string()));

    if words.is_empty() {
        words.push(os_name(os).to_string());
    }

    let installer_type = match os {
        Platform::Windows => installer_type(variant.toolchain, packaging, variant.legacy),
        Platform::Linux | Platform::MacOs => None,
    };

    Some(FormattedAssetName {
        display_name: words.join(" "),
        extension: extension.to_string(),
        installer_type,
    })
}

/// Split off a known extension, matching it case-insensitively.
fn split_extension(filename: &str) -> Option<(&str, &'static str)> {
    EXTENSIONS.iter().find_map(|ext| {
        let start = filename.len().checked_sub(ext.len())?;
        let tail = filename.get(start..)?;
        tail.eq_ignore_ascii_case(ext)
            .then(|| (&filename[..start], *ext))
    })
}

fn parse_variant(stem: &str) -> Variant<'_> {
    let mut words: Vec<&str> = stem.split('-').filter(|w| !w.is_empty()).skip(1).collect();
    if words
        .last()
        .is_some_and(|w| w.starts_with(|c: char| c.is_ascii_digit()))
    {
        words.pop();
    }

    let mut variant = Variant::default();
    for word in words {
        match word.to_ascii_lowercase().as_str() {
            "linux" => variant.os = Some(Platform::Linux),
            "macos" | "mac" | "osx" => variant.os = Some(Platform::MacOs),
            "windows" | "win" => variant.os = Some(Platform::Windows),
            "msvc" => variant.toolchain = Some(Toolchain::Msvc),
            "mingw" => variant.toolchain = Some(Toolchain::MinGw),
            "setup" | "installer" => variant.packaging = Some(Packaging::Setup),
            "portable" => variant.packaging = Some(Packaging::Portable),
            "legacy" => variant.legacy = true,
            "qt5" => variant.qt = Some("Qt 5"),
            "qt6" => variant.qt = Some("Qt 6"),
            "x86_64" | "amd64" | "x64" => variant.arch = Some("x86_64"),
            "arm64" | "aarch64" => variant.arch = Some("ARM64"),
            // Part of the toolchain name ("MinGW-w64") or implied by the extension.
            "w64" | "appimage" | "universal" => {}
            _ => variant.other.push(word),
        }
    }
    variant
}

fn installer_type(
    toolchain: Option<Toolchain>,
    packaging: Option<Packaging>,
    legacy: bool,
) -> Option<String> {
    let kind = match packaging? {
        Packaging::Setup => "setup",
        Packaging::Portable => "portable",
    };
    let kind = if legacy {
        format!("legacy {}", kind)
    } else {
        kind.to_string()
    };

    let tag = match (toolchain, packaging) {
        (Some(Toolchain::Msvc), Some(Packaging::Setup)) => "MSVC",
        (Some(Toolchain::Msvc), _) => "msvc",
        (Some(Toolchain::MinGw), _) => "MinGW",
        (None, _) => return Some(kind),
    };
    Some(format!("{} - {}", tag, kind))
}

fn packaging_label(packaging: Packaging, labels: &AssetLabels) -> &str {
    match packaging {
        Packaging::Setup => &labels.installer,
        Packaging::Portable => &labels.portable,
    }
}

fn toolchain_name(toolchain: Toolchain) -> &'static str {
    match toolchain {
        Toolchain::Msvc => "MSVC",
        Toolchain::MinGw => "MinGW",
    }
}

fn os_name(os: Platform) -> &'static str {
    match os {
        Platform::Linux => "Linux",
        Platform::MacOs => "macOS",
        Platform::Windows => "Windows",
    }
}
