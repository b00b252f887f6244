//! HTTP routes serving the download page.

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use log::debug;
use serde::Deserialize;

use crate::locale::{COOKIE_LOCALE_KEY, Locale};
use crate::platform::{PlatformSelection, detect_from_user_agent};
use crate::service::DownloadService;
use crate::view::ViewContext;
use crate::view::html::render_page;

/// Seconds a locale picked through `?locale=` is remembered.
const LOCALE_COOKIE_MAX_AGE: u32 = 365 * 24 * 60 * 60;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: DownloadService,
}

impl AppState {
    pub fn new(service: DownloadService) -> Self {
        Self { service }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub locale: Option<String>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/downloads", get(detected_downloads))
        .route("/downloads/{platform}", get(platform_downloads))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// `GET /`
async fn root() -> Redirect {
    Redirect::temporary("/downloads")
}

/// `GET /healthz`
async fn healthz() -> &'static str {
    "ok"
}

/// `GET /downloads` - platform taken from the User-Agent.
async fn detected_downloads(
    headers: HeaderMap,
    Query(params): Query<PageParams>,
    State(state): State<AppState>,
) -> Response {
    let user_agent = header_str(&headers, header::USER_AGENT.as_str()).unwrap_or("");
    let selection = detect_from_user_agent(user_agent);
    debug!("Detected {:?} from user agent '{}'", selection, user_agent);
    downloads_page(&state, selection, &headers, &params)
}

/// `GET /downloads/{platform}`
async fn platform_downloads(
    Path(platform): Path<String>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
    State(state): State<AppState>,
) -> Response {
    downloads_page(&state, PlatformSelection::parse(&platform), &headers, &params)
}

fn downloads_page(
    state: &AppState,
    selection: PlatformSelection,
    headers: &HeaderMap,
    params: &PageParams,
) -> Response {
    let locale = resolve_locale(params, headers);
    let view = state.service.page_view(selection, locale);
    let ctx = ViewContext::new(locale, state.service.dictionary(locale));
    let page = Html(render_page(&view, selection, &ctx));

    let chosen = params.locale.as_deref().and_then(|l| l.parse::<Locale>().ok());
    match chosen {
        Some(locale) => (
            [(
                header::SET_COOKIE,
                format!(
                    "{}={}; Path=/; Max-Age={}; SameSite=Lax",
                    COOKIE_LOCALE_KEY, locale, LOCALE_COOKIE_MAX_AGE
                ),
            )],
            page,
        )
            .into_response(),
        None => page.into_response(),
    }
}

/// Locale from the query string, then the cookie, then `Accept-Language`.
pub fn resolve_locale(params: &PageParams, headers: &HeaderMap) -> Locale {
    let from_header = header_str(headers, header::ACCEPT_LANGUAGE.as_str())
        .and_then(Locale::from_accept_language)
        .map(|l| l.code());

    Locale::resolve([
        params.locale.as_deref(),
        cookie_value(headers, COOKIE_LOCALE_KEY),
        from_header,
    ])
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}
