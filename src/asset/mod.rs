//! Choosing and labelling the release assets offered for a platform.

mod classify;
mod name;

pub use classify::{LINUX_PACKAGE_LINKS, classify, matches_platform, windows_column};
pub use name::{FormattedAssetName, format_name};
