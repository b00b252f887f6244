//! HTML rendering of the download view.

use std::fmt::Write;

use crate::locale::Locale;
use crate::platform::{Platform, PlatformSelection};

use super::{ArchColumn, DownloadLink, DownloadsView, ReleaseLinks, ViewContext};

/// Seconds before a loading page reloads itself.
pub const LOADING_REFRESH_SECS: u32 = 2;

const STAR: &str = "\u{2B50}";

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Path of the page for a platform selection.
pub fn page_path(selection: PlatformSelection) -> String {
    match selection {
        PlatformSelection::Placeholder => "/downloads".to_string(),
        PlatformSelection::Known(platform) => format!("/downloads/{}", platform.slug()),
    }
}

/// The download area on its own, without the surrounding page.
pub fn render_fragment(view: &DownloadsView) -> String {
    match view {
        DownloadsView::DetectingPlatform { message } | DownloadsView::Loading { message } => {
            format!(r#"<div class="downloads-status">{}</div>"#, escape(message))
        }
        DownloadsView::Failed {
            prefix,
            message,
            hint,
        } => format!(
            r#"<div class="downloads-status downloads-error">{} {}. {}</div>"#,
            escape(prefix),
            escape(message),
            escape(hint)
        ),
        DownloadsView::Release(release) => {
            let links = match &release.links {
                ReleaseLinks::List(links) => {
                    let mut out = String::from(r#"<div class="downloads-list">"#);
                    for link in links {
                        out.push_str(&link_html(link));
                    }
                    out.push_str("</div>");
                    out
                }
                ReleaseLinks::Columns(columns) => {
                    let mut out = String::from(r#"<div class="downloads-columns">"#);
                    for column in columns {
                        out.push_str(&column_html(column));
                    }
                    out.push_str("</div>");
                    out
                }
            };
            format!(
                r#"<div class="downloads"><p class="downloads-heading">{}</p>{}</div>"#,
                escape(&release.heading),
                links
            )
        }
    }
}

fn column_html(column: &ArchColumn) -> String {
    let mut out = format!(
        r#"<div class="downloads-column"><p class="downloads-arch">{}</p>"#,
        escape(column.arch.label())
    );
    for link in &column.links {
        out.push_str(&link_html(link));
    }
    out.push_str("</div>");
    out
}

fn link_html(link: &DownloadLink) -> String {
    let label = format!(
        r#"{} <span class="muted">{}</span>"#,
        escape(&link.display_name),
        escape(&link.extension)
    );

    match &link.note {
        Some(note) => format!(
            r#"<a class="download-link two-line" target="_blank" rel="noopener" href="{}"><p>{}</p><p class="muted note">{}</p></a>"#,
            escape(&link.url),
            label,
            escape(note)
        ),
        None => format!(
            r#"<a class="download-link" target="_blank" rel="noopener" href="{}">{}{}</a>"#,
            escape(&link.url),
            if link.starred {
                format!("{} ", STAR)
            } else {
                String::new()
            },
            label
        ),
    }
}

fn platform_tabs(selection: PlatformSelection, ctx: &ViewContext<'_>) -> String {
    let names = &ctx.dictionary.downloads().platforms;
    let mut tabs = String::new();
    for platform in Platform::ALL {
        let name = match platform {
            Platform::Linux => &names.linux,
            Platform::MacOs => &names.macos,
            Platform::Windows => &names.windows,
        };
        let class = if selection.platform() == Some(platform) {
            "tab active"
        } else {
            "tab"
        };
        let _ = write!(
            tabs,
            r#"<a class="{class}" href="{path}?locale={locale}">{name}</a>"#,
            path = page_path(platform.into()),
            locale = ctx.locale,
            name = escape(name),
        );
    }
    tabs
}

fn locale_links(selection: PlatformSelection, current: Locale) -> String {
    let path = page_path(selection);
    let mut links = String::new();
    for locale in Locale::ALL {
        let class = if locale == current { "locale active" } else { "locale" };
        let _ = write!(
            links,
            r#"<a class="{class}" href="{path}?locale={locale}">{code}</a>"#,
            code = locale.code().to_uppercase(),
        );
    }
    links
}

/// A complete HTML document around the download area.
pub fn render_page(view: &DownloadsView, selection: PlatformSelection, ctx: &ViewContext<'_>) -> String {
    let title = escape(&ctx.dictionary.downloads().title);
    let refresh = if matches!(view, DownloadsView::Loading { .. }) {
        format!(
            r#"<meta http-equiv="refresh" content="{}">"#,
            LOADING_REFRESH_SECS
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}
<title>{title}</title>
<style>
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}
  body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
         color: #e0e0e0; background: #0d1117; line-height: 1.6; }}
  .container {{ max-width: 800px; margin: 0 auto; padding: 2rem 1rem;
               display: flex; flex-direction: column; align-items: center; gap: 1.5rem; }}
  h1 {{ font-size: 2rem; color: #f0f0f0; text-align: center; }}
  a {{ color: #e0e0e0; text-decoration: none; }}
  .muted {{ color: #9ca3af; }}
  .locales, .tabs {{ display: flex; gap: 0.75rem; justify-content: center; }}
  .tab {{ padding: 0.4rem 1rem; border-radius: 8px; border: 1px solid #30363d; }}
  .tab.active, .locale.active {{ background: #161b22; color: #58a6ff; }}
  .locale {{ font-size: 0.8rem; color: #9ca3af; }}
  .downloads, .downloads-list, .downloads-column {{ display: flex; flex-direction: column;
                                                  align-items: center; gap: 1rem; }}
  .downloads-heading {{ font-size: 1.5rem; font-weight: 600; color: #9ca3af; }}
  .downloads-status {{ color: #9ca3af; text-align: center; }}
  .downloads-columns {{ display: flex; flex-wrap: wrap; gap: 2rem; align-items: flex-start; width: 100%; }}
  .downloads-column {{ flex: 1; }}
  .downloads-arch {{ font-size: 1.25rem; color: #9ca3af; }}
  .download-link {{ border-bottom: 1px solid transparent; padding-bottom: 0.25rem; text-align: center; }}
  .download-link:hover {{ border-color: #ffffff; }}
  .download-link.two-line {{ display: flex; flex-direction: column; }}
  .note {{ font-size: 0.85rem; }}
</style>
</head>
<body>
<div class="container">
  <nav class="locales">{locales}</nav>
  <h1>{title}</h1>
  <nav class="tabs">{tabs}</nav>
  {content}
</div>
</body>
</html>"#,
        lang = ctx.locale,
        locales = locale_links(selection, ctx.locale),
        tabs = platform_tabs(selection, ctx),
        content = render_fragment(view),
    )
}
