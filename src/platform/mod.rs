//! Target platforms of the download page.
//!
//! The page shows downloads for one operating system at a time. Before the
//! visitor's platform is known, the page is in a placeholder state that is
//! rendered without looking at release data.

mod detection;

use std::fmt;

pub use detection::detect_from_user_agent;

/// Sentinel platform string meaning "platform not yet detected".
pub const PLACEHOLDER_OS: &str = "placeholder-os";

pub const WINDOWS_X64: &str = "x64";
pub const WINDOWS_ARM64: &str = "ARM64";

/// Windows architecture columns, in display order.
pub const WINDOWS_PLATFORMS: [WindowsArch; 2] = [WindowsArch::X64, WindowsArch::Arm64];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Linux, Platform::MacOs, Platform::Windows];

    /// Match a platform string case-insensitively.
    ///
    /// Anything that is neither `linux` nor `macos` is treated as Windows.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            _ => Platform::Windows,
        }
    }

    /// Path segment used in URLs.
    pub const fn slug(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
        }
    }

    /// Lowercase substring that release asset filenames for this platform contain.
    pub const fn asset_keyword(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "mac",
            Platform::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Platform requested by the caller, or the placeholder before detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformSelection {
    Placeholder,
    Known(Platform),
}

impl PlatformSelection {
    pub fn parse(value: &str) -> Self {
        if value == PLACEHOLDER_OS {
            PlatformSelection::Placeholder
        } else {
            PlatformSelection::Known(Platform::from_name(value))
        }
    }

    pub fn platform(&self) -> Option<Platform> {
        match self {
            PlatformSelection::Placeholder => None,
            PlatformSelection::Known(platform) => Some(*platform),
        }
    }
}

impl From<Platform> for PlatformSelection {
    fn from(platform: Platform) -> Self {
        PlatformSelection::Known(platform)
    }
}

/// Windows architectures that get their own download column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowsArch {
    X64,
    Arm64,
}

impl WindowsArch {
    pub const fn label(&self) -> &'static str {
        match self {
            WindowsArch::X64 => WINDOWS_X64,
            WindowsArch::Arm64 => WINDOWS_ARM64,
        }
    }

    /// Whether an asset filename belongs to this architecture's column.
    ///
    /// ARM64 builds carry `arm64` in their filename; every other Windows
    /// build is an x64 build. Each architecture states its own rule here so
    /// a new variant cannot silently inherit the x64 bucket.
    pub fn matches(&self, filename: &str) -> bool {
        let is_arm64 = filename.to_lowercase().contains("arm64");
        match self {
            WindowsArch::Arm64 => is_arm64,
            WindowsArch::X64 => !is_arm64,
        }
    }
}

impl fmt::Display for WindowsArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
