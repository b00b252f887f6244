//! Plain-text rendering of the download view for terminals.

use std::fmt::Write;

use super::{DownloadLink, DownloadsView, ReleaseLinks};

const STAR: char = '\u{2605}';

pub fn render(view: &DownloadsView) -> String {
    match view {
        DownloadsView::DetectingPlatform { message } | DownloadsView::Loading { message } => {
            format!("{}\n", message)
        }
        DownloadsView::Failed {
            prefix,
            message,
            hint,
        } => format!("{} {}. {}\n", prefix, message, hint),
        DownloadsView::Release(release) => {
            let mut out = String::new();
            if !release.heading.is_empty() {
                let _ = writeln!(out, "{}\n", release.heading);
            }
            match &release.links {
                ReleaseLinks::List(links) => {
                    for link in links {
                        write_link(&mut out, link, "");
                    }
                }
                ReleaseLinks::Columns(columns) => {
                    for (i, column) in columns.iter().enumerate() {
                        if i > 0 {
                            out.push('\n');
                        }
                        let _ = writeln!(out, "[{}]", column.arch);
                        for link in &column.links {
                            write_link(&mut out, link, "  ");
                        }
                    }
                }
            }
            out
        }
    }
}

fn write_link(out: &mut String, link: &DownloadLink, indent: &str) {
    let marker = if link.starred { STAR } else { ' ' };
    let label = format!("{} {}", link.display_name, link.extension);
    let _ = writeln!(out, "{indent}{marker} {}  {}", label.trim_end(), link.url);
    if let Some(note) = &link.note {
        let _ = writeln!(out, "{indent}  {}", note);
    }
}
