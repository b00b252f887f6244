use super::{Platform, PlatformSelection};

/// Guess the visitor's operating system from a User-Agent header.
///
/// Returns the placeholder selection when the header names no known OS, so
/// the page asks the visitor to pick a platform instead of guessing.
pub fn detect_from_user_agent(user_agent: &str) -> PlatformSelection {
    let ua = user_agent.to_ascii_lowercase();

    // Android and iOS user agents mention Linux and Mac OS X respectively.
    if ua.contains("android") || ua.contains("iphone") || ua.contains("ipad") {
        return PlatformSelection::Placeholder;
    }

    if ua.contains("windows") || ua.contains("win64") || ua.contains("win32") {
        PlatformSelection::Known(Platform::Windows)
    } else if ua.contains("mac") || ua.contains("darwin") {
        PlatformSelection::Known(Platform::MacOs)
    } else if ua.contains("linux") || ua.contains("x11") {
        PlatformSelection::Known(Platform::Linux)
    } else {
        PlatformSelection::Placeholder
    }
}
