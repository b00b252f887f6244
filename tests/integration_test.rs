use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::Server;
use predicates::prelude::*;

const RELEASE_PATH: &str = "/repos/FreesmTeam/FreesmLauncher/releases/latest";

fn release_body(url: &str) -> String {
    format!(
        r#"{{
            "tag_name": "1.0.0",
            "name": "Freesm Launcher Sequoia 1.0.0",
            "assets": [
                {{ "name": "FreesmLauncher-Linux-x86_64.AppImage",
                   "browser_download_url": "{url}/FreesmLauncher-Linux-x86_64.AppImage" }},
                {{ "name": "FreesmLauncher-Linux-x86_64.AppImage.zsync",
                   "browser_download_url": "{url}/FreesmLauncher-Linux-x86_64.AppImage.zsync" }},
                {{ "name": "FreesmLauncher-macOS-1.0.0.zip",
                   "browser_download_url": "{url}/FreesmLauncher-macOS-1.0.0.zip" }},
                {{ "name": "FreesmLauncher-Windows-MSVC-Setup-1.0.0.exe",
                   "browser_download_url": "{url}/FreesmLauncher-Windows-MSVC-Setup-1.0.0.exe" }},
                {{ "name": "FreesmLauncher-Windows-MSVC-Portable-1.0.0.zip",
                   "browser_download_url": "{url}/FreesmLauncher-Windows-MSVC-Portable-1.0.0.zip" }},
                {{ "name": "FreesmLauncher-Windows-MSVC-arm64-Setup-1.0.0.exe",
                   "browser_download_url": "{url}/FreesmLauncher-Windows-MSVC-arm64-Setup-1.0.0.exe" }}
            ]
        }}"#
    )
}

fn render_cmd(api_url: &str) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("freesm-downloads"));
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("FREESM_REPO")
        .env("RUST_LOG", "warn")
        .arg("--api-url")
        .arg(api_url)
        .arg("render");
    cmd
}

#[test]
fn test_render_linux_text() {
    let mut server = Server::new();
    let url = server.url();
    let mock = server
        .mock("GET", RELEASE_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(release_body(&url))
        .create();

    render_cmd(&url)
        .args(["--platform", "Linux"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Sequoia 1.0.0\n"))
        .stdout(predicate::str::contains(
            "  Package - Debian  https://github.com/FreesmTeam/freesm-deb-pkgbuild",
        ))
        .stdout(predicate::str::contains("★ AppImage x86_64 .AppImage"))
        .stdout(predicate::str::contains("zsync").not())
        .stdout(predicate::str::contains("macOS").not());

    mock.assert();
}

#[test]
fn test_render_windows_columns_in_russian() {
    let mut server = Server::new();
    let url = server.url();
    let _mock = server
        .mock("GET", RELEASE_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(release_body(&url))
        .create();

    render_cmd(&url)
        .args(["--platform", "windows", "--locale", "ru"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x64]"))
        .stdout(predicate::str::contains("[ARM64]"))
        .stdout(predicate::str::contains("★ MSVC Установщик .exe"))
        .stdout(predicate::str::contains(
            "(требуется Visual C++ Redistributable)",
        ));
}

#[test]
fn test_render_html_page() {
    let mut server = Server::new();
    let url = server.url();
    let _mock = server
        .mock("GET", RELEASE_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(release_body(&url))
        .create();

    render_cmd(&url)
        .args(["--platform", "macos", "--format", "html"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("⭐ Universal"));
}

#[test]
fn test_render_missing_release_fails() {
    let mut server = Server::new();
    let url = server.url();
    let mock = server
        .mock("GET", RELEASE_PATH)
        .with_status(404)
        .expect(1)
        .create();

    render_cmd(&url)
        .args(["--platform", "linux"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Failed to load releases: Not found: no published release. Try refreshing the page.",
        ))
        .stderr(predicate::str::contains("Failed to fetch the latest release"));

    mock.assert();
}

#[test]
fn test_render_placeholder_ignores_fetch_failure() {
    let mut server = Server::new();
    let url = server.url();
    let _mock = server.mock("GET", RELEASE_PATH).with_status(404).create();

    render_cmd(&url)
        .args(["--platform", "placeholder-os"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Detecting your platform..."))
        .stderr(predicate::str::contains("Failed to fetch the latest release").not());
}

#[test]
fn test_render_placeholder_does_not_list_links() {
    let mut server = Server::new();
    let url = server.url();
    let _mock = server
        .mock("GET", RELEASE_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(release_body(&url))
        .create();

    render_cmd(&url)
        .args(["--platform", "placeholder-os", "--locale", "es"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http").not());
}
