//! Keyed cache for asynchronous fetches.
//!
//! Each key holds at most one in-flight fetch; concurrent callers share it.
//! A caller can either peek at the current state without waiting
//! ([`QueryCache::query`]) or wait for the fetch to settle
//! ([`QueryCache::fetch`]).

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Why a fetch failed, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FetchError {}

impl From<anyhow::Error> for FetchError {
    fn from(error: anyhow::Error) -> Self {
        FetchError::new(format!("{:#}", error))
    }
}

/// What a caller sees for a key at a given moment.
#[derive(Debug, Clone)]
pub enum QueryState<T> {
    Pending,
    Failed(FetchError),
    Ready(Arc<T>),
}

impl<T> From<Result<Arc<T>, FetchError>> for QueryState<T> {
    fn from(result: Result<Arc<T>, FetchError>) -> Self {
        match result {
            Ok(value) => QueryState::Ready(value),
            Err(error) => QueryState::Failed(error),
        }
    }
}

type Outcome<T> = Result<Arc<T>, FetchError>;
type SharedFetch<T> = Shared<BoxFuture<'static, Outcome<T>>>;

struct Settled<T> {
    outcome: Outcome<T>,
    at: Instant,
}

struct Entry<T> {
    settled: Option<Settled<T>>,
    in_flight: Option<SharedFetch<T>>,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            settled: None,
            in_flight: None,
        }
    }
}

/// Cache of fetch results keyed by string.
///
/// Successful values stay fresh for `stale_after`; a stale value is still
/// returned while a refetch runs in the background, and a failed refetch
/// keeps it for another `stale_after`. A failure with nothing to fall back
/// on is handed out once by [`QueryCache::query`] and then forgotten, so the
/// next caller starts a new fetch.
pub struct QueryCache<T> {
    entries: Arc<Mutex<HashMap<String, Entry<T>>>>,
    stale_after: Duration,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            stale_after: self.stale_after,
        }
    }
}

impl<T> QueryCache<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            stale_after,
        }
    }

    /// Current state for `key`, starting a fetch if none is running and no
    /// fresh value exists. Never waits for the fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn query<F, Fut>(&self, key: &str, fetch: F) -> QueryState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let mut entries = self.lock();
        let entry = entries.entry(key.to_string()).or_default();

        match entry.settled.take() {
            Some(Settled {
                outcome: Ok(value),
                at,
            }) => {
                let stale = at.elapsed() >= self.stale_after;
                entry.settled = Some(Settled {
                    outcome: Ok(Arc::clone(&value)),
                    at,
                });
                if stale && entry.in_flight.is_none() {
                    debug!("Query '{}' is stale, refetching in the background", key);
                    entry.in_flight = Some(self.spawn_fetch(key, fetch));
                }
                QueryState::Ready(value)
            }
            // Reported once; the next query starts over.
            Some(Settled {
                outcome: Err(error),
                ..
            }) => QueryState::Failed(error),
            None => {
                if entry.in_flight.is_none() {
                    entry.in_flight = Some(self.spawn_fetch(key, fetch));
                }
                QueryState::Pending
            }
        }
    }

    /// Start a fetch for `key` if nothing usable is cached, without taking
    /// a failure that has not been handed out yet.
    ///
    /// Must be called from within a tokio runtime.
    pub fn prefetch<F, Fut>(&self, key: &str, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let mut entries = self.lock();
        let entry = entries.entry(key.to_string()).or_default();
        if entry.in_flight.is_some() {
            return;
        }

        let needed = match &entry.settled {
            None => true,
            Some(Settled { outcome: Ok(_), at }) => at.elapsed() >= self.stale_after,
            Some(Settled { outcome: Err(_), .. }) => false,
        };
        if needed {
            entry.in_flight = Some(self.spawn_fetch(key, fetch));
        }
    }

    /// Wait for the result for `key`.
    ///
    /// Returns a fresh cached value immediately, otherwise joins the running
    /// fetch or starts one.
    pub async fn fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Arc<T>, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let shared = {
            let mut entries = self.lock();
            let entry = entries.entry(key.to_string()).or_default();

            if let Some(Settled { outcome: Ok(value), at }) = &entry.settled {
                if at.elapsed() < self.stale_after {
                    return Ok(Arc::clone(value));
                }
            }

            match &entry.in_flight {
                Some(shared) => shared.clone(),
                None => {
                    let shared = self.spawn_fetch(key, fetch);
                    entry.in_flight = Some(shared.clone());
                    shared
                }
            }
        };

        let outcome = shared.clone().await;
        Self::record(&self.entries, key, &shared, outcome.clone());
        outcome
    }

    fn spawn_fetch<F, Fut>(&self, key: &str, fetch: F) -> SharedFetch<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        debug!("Starting fetch for query '{}'", key);

        let shared = fetch()
            .map(|result| result.map(Arc::new).map_err(FetchError::from))
            .boxed()
            .shared();

        let entries = Arc::clone(&self.entries);
        let key = key.to_string();
        let handle = shared.clone();
        let driver = shared.clone();
        tokio::spawn(async move {
            let outcome = driver.await;
            Self::record(&entries, &key, &handle, outcome);
        });

        shared
    }

    /// Store the outcome of `fetch` unless it has already been stored.
    ///
    /// Both the spawned driver and a caller awaiting [`QueryCache::fetch`]
    /// record the outcome, so it is visible as soon as either sees it.
    fn record(
        entries: &Mutex<HashMap<String, Entry<T>>>,
        key: &str,
        fetch: &SharedFetch<T>,
        outcome: Outcome<T>,
    ) {
        let mut entries = entries.lock().unwrap_or_else(|e| e.into_inner());
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        if !entry.in_flight.as_ref().is_some_and(|f| f.ptr_eq(fetch)) {
            return;
        }
        entry.in_flight = None;

        if let Err(e) = &outcome {
            warn!("Query '{}' failed: {}", key, e);
        }

        // A failed refresh keeps the previous value and waits a full
        // `stale_after` before trying again.
        let refresh_failed = outcome.is_err()
            && matches!(entry.settled, Some(Settled { outcome: Ok(_), .. }));
        if refresh_failed {
            if let Some(previous) = entry.settled.as_mut() {
                previous.at = Instant::now();
            }
        } else {
            entry.settled = Some(Settled {
                outcome,
                at: Instant::now(),
            });
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry<T>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    const KEY: &str = "github-releases";

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        value: &'static str,
    ) -> impl FnOnce() -> BoxFuture<'static, anyhow::Result<String>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(value.to_string()) }.boxed()
        }
    }

    fn failing_fetch(
        calls: &Arc<AtomicUsize>,
    ) -> impl FnOnce() -> BoxFuture<'static, anyhow::Result<String>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(anyhow::anyhow!("rate limited")) }.boxed()
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_value() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        let value = cache.fetch(KEY, counting_fetch(&calls, "v1")).await.unwrap();

        assert_eq!(value.as_str(), "v1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_request() {
        let cache: QueryCache<String> = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel::<()>();

        let first = {
            let calls = Arc::clone(&calls);
            cache.fetch(KEY, move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    let _ = rx.await;
                    Ok("shared".to_string())
                }
            })
        };
        let second = cache.fetch(KEY, counting_fetch(&calls, "other"));
        let third = cache.fetch(KEY, counting_fetch(&calls, "other"));

        let _ = tx.send(());
        let (a, b, c) = tokio::join!(first, second, third);

        assert_eq!(a.unwrap().as_str(), "shared");
        assert_eq!(b.unwrap().as_str(), "shared");
        assert_eq!(c.unwrap().as_str(), "shared");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_query_is_pending_then_ready() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        let state = cache.query(KEY, counting_fetch(&calls, "v1"));
        assert!(matches!(state, QueryState::Pending));

        // A second query while the first is in flight does not start another fetch.
        let state = cache.query(KEY, counting_fetch(&calls, "v2"));
        assert!(matches!(state, QueryState::Pending));

        cache.fetch(KEY, counting_fetch(&calls, "v3")).await.unwrap();
        wait_until_settled(&cache).await;
        match cache.query(KEY, counting_fetch(&calls, "v4")) {
            QueryState::Ready(value) => assert_eq!(value.as_str(), "v1"),
            other => panic!("expected ready, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_reported_once_then_refetched() {
        let cache: QueryCache<String> = QueryCache::new(Duration::from_secs(60));

        let result = cache
            .fetch(KEY, || async { Err(anyhow::anyhow!("Network Error")) })
            .await;
        assert_eq!(result.unwrap_err().message(), "Network Error");

        wait_until_settled(&cache).await;

        match cache.query(KEY, || async { Ok("unused".to_string()) }) {
            QueryState::Failed(e) => assert_eq!(e.to_string(), "Network Error"),
            other => panic!("expected failure, got {:?}", other),
        }

        let value = cache
            .fetch(KEY, || async { Ok("recovered".to_string()) })
            .await
            .unwrap();
        assert_eq!(value.as_str(), "recovered");
    }

    #[tokio::test]
    async fn test_stale_value_is_served_while_refetching() {
        let cache = QueryCache::new(Duration::ZERO);
        let calls = Arc::new(AtomicUsize::new(0));

        cache.fetch(KEY, counting_fetch(&calls, "old")).await.unwrap();
        wait_until_settled(&cache).await;

        match cache.query(KEY, counting_fetch(&calls, "new")) {
            QueryState::Ready(value) => assert_eq!(value.as_str(), "old"),
            other => panic!("expected ready, got {:?}", other),
        }

        let value = cache.fetch(KEY, counting_fetch(&calls, "unused")).await.unwrap();
        assert_eq!(value.as_str(), "new");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_value() {
        let cache: QueryCache<String> = QueryCache::new(Duration::ZERO);

        cache
            .fetch(KEY, || async { Ok("old".to_string()) })
            .await
            .unwrap();
        wait_until_settled(&cache).await;

        let refresh = cache
            .fetch(KEY, || async { Err(anyhow::anyhow!("rate limited")) })
            .await;
        assert!(refresh.is_err());
        wait_until_settled(&cache).await;

        match cache.query(KEY, || async { Ok("next".to_string()) }) {
            QueryState::Ready(value) => assert_eq!(value.as_str(), "old"),
            other => panic!("expected ready, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_refresh_waits_before_retrying() {
        let stale_after = Duration::from_millis(200);
        let cache: QueryCache<String> = QueryCache::new(stale_after);
        let calls = Arc::new(AtomicUsize::new(0));

        cache.fetch(KEY, counting_fetch(&calls, "old")).await.unwrap();
        wait_until_settled(&cache).await;
        tokio::time::sleep(stale_after + Duration::from_millis(50)).await;

        for _ in 0..10 {
            match cache.query(KEY, failing_fetch(&calls)) {
                QueryState::Ready(value) => assert_eq!(value.as_str(), "old"),
                other => panic!("expected ready, got {:?}", other),
            }
            wait_until_settled(&cache).await;
        }

        // One fetch for the value, one failed refresh.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_prefetch_leaves_failure_for_query() {
        let cache: QueryCache<String> = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        cache.prefetch(KEY, failing_fetch(&calls));
        wait_until_settled(&cache).await;
        cache.prefetch(KEY, failing_fetch(&calls));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        match cache.query(KEY, counting_fetch(&calls, "unused")) {
            QueryState::Failed(e) => assert_eq!(e.message(), "rate limited"),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prefetch_reuses_fresh_value() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        cache.prefetch(KEY, counting_fetch(&calls, "v1"));
        cache.prefetch(KEY, counting_fetch(&calls, "v2"));
        wait_until_settled(&cache).await;
        cache.prefetch(KEY, counting_fetch(&calls, "v3"));

        match cache.query(KEY, counting_fetch(&calls, "v4")) {
            QueryState::Ready(value) => assert_eq!(value.as_str(), "v1"),
            other => panic!("expected ready, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fetch_error_keeps_context_chain() {
        let error = anyhow::anyhow!("connection refused").context("Failed to send request");
        let fetch_error = FetchError::from(error);
        assert_eq!(
            fetch_error.message(),
            "Failed to send request: connection refused"
        );
    }

    async fn wait_until_settled<T: Send + Sync + 'static>(cache: &QueryCache<T>) {
        for _ in 0..100 {
            {
                let entries = cache.lock();
                if entries
                    .get(KEY)
                    .is_some_and(|e| e.in_flight.is_none() && e.settled.is_some())
                {
                    return;
                }
            }
            tokio::task::yield_now().await;
        }
        panic!("query never settled");
    }
}
