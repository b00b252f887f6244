//! Ties the release fetcher, the query cache and the dictionaries together.

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::github::ReleaseFetcher;
use crate::i18n::{Dictionaries, Dictionary};
use crate::locale::Locale;
use crate::platform::PlatformSelection;
use crate::query::{QueryCache, QueryState};
use crate::release::ReleaseInfo;
use crate::view::{self, DownloadsView, ViewContext};

/// Cache key of the latest release.
pub const RELEASES_QUERY_KEY: &str = "github-releases";

#[derive(Clone)]
pub struct DownloadService {
    fetcher: Arc<dyn ReleaseFetcher>,
    cache: QueryCache<ReleaseInfo>,
    dictionaries: Arc<Dictionaries>,
}

impl DownloadService {
    pub fn new(
        fetcher: Arc<dyn ReleaseFetcher>,
        dictionaries: Dictionaries,
        stale_after: Duration,
    ) -> Self {
        Self {
            fetcher,
            cache: QueryCache::new(stale_after),
            dictionaries: Arc::new(dictionaries),
        }
    }

    pub fn dictionary(&self, locale: Locale) -> &Dictionary {
        self.dictionaries.get(locale)
    }

    /// Current state of the latest-release query, starting a fetch if needed.
    pub fn release_state(&self) -> QueryState<ReleaseInfo> {
        let fetcher = Arc::clone(&self.fetcher);
        self.cache.query(RELEASES_QUERY_KEY, move || async move {
            fetcher.fetch_latest_release().await
        })
    }

    /// Start fetching the latest release if nothing usable is cached.
    ///
    /// Leaves an unseen failure in place for the next page that shows the
    /// fetch state.
    pub fn prefetch_release(&self) {
        let fetcher = Arc::clone(&self.fetcher);
        self.cache.prefetch(RELEASES_QUERY_KEY, move || async move {
            fetcher.fetch_latest_release().await
        });
    }

    /// Wait until the latest-release query settles.
    pub async fn settled_release_state(&self) -> QueryState<ReleaseInfo> {
        let fetcher = Arc::clone(&self.fetcher);
        self.cache
            .fetch(RELEASES_QUERY_KEY, move || async move {
                fetcher.fetch_latest_release().await
            })
            .await
            .into()
    }

    /// View for a page request.
    ///
    /// While the platform is unknown the fetch state is not shown, so the
    /// release is only prefetched.
    pub fn page_view(&self, selection: PlatformSelection, locale: Locale) -> DownloadsView {
        let state = match selection {
            PlatformSelection::Placeholder => {
                self.prefetch_release();
                QueryState::Pending
            }
            PlatformSelection::Known(_) => self.release_state(),
        };
        self.view(selection, &state, locale)
    }

    /// Build the view for a platform from an already obtained query state.
    pub fn view(
        &self,
        selection: PlatformSelection,
        state: &QueryState<ReleaseInfo>,
        locale: Locale,
    ) -> DownloadsView {
        debug!("Rendering downloads for {:?} in '{}'", selection, locale);
        let ctx = ViewContext::new(locale, self.dictionary(locale));
        view::build_view(selection, state, &ctx)
    }
}
