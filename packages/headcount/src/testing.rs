//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the headcount
//! library without making real network calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{FetchError, FetchResult};
use crate::traits::adapter::SourceAdapter;
use crate::traits::fetcher::{FetchedPage, Fetcher};
use crate::types::observation::{CompanyQuery, Observation, SourceKind};

/// Mock fetcher for testing.
///
/// Serves canned pages by exact URL, fails or panics for configured URLs
/// and prefixes, and records every call.
///
/// # Example
///
/// ```rust
/// use headcount::testing::MockFetcher;
///
/// let fetcher = MockFetcher::new()
///     .with_html("https://www.linkedin.com/company/acme", "<p>120 employees</p>")
///     .with_failing_prefix("https://www.glassdoor.sg");
/// ```
#[derive(Default, Clone)]
pub struct MockFetcher {
    /// Canned pages indexed by URL
    pages: Arc<RwLock<HashMap<String, FetchedPage>>>,
    /// URLs that fail
    failures: Arc<RwLock<HashSet<String>>>,
    /// URL prefixes that fail
    failing_prefixes: Arc<RwLock<Vec<String>>>,
    /// URL prefixes that panic inside fetch
    panicking_prefixes: Arc<RwLock<Vec<String>>>,
    /// Simulated latency per fetch
    latency: Option<Duration>,
    /// Track calls for verification
    calls: Arc<RwLock<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page that will be returned for its URL.
    pub fn add_page(&self, page: FetchedPage) {
        self.pages.write().unwrap().insert(page.url.clone(), page);
    }

    /// Serve a canned page (builder pattern).
    pub fn with_page(self, page: FetchedPage) -> Self {
        self.add_page(page);
        self
    }

    /// Serve plain text for a URL.
    pub fn with_text(self, url: impl Into<String>, content: impl Into<String>) -> Self {
        self.with_page(FetchedPage::new(url, content).with_content_type("text/plain"))
    }

    /// Serve HTML for a URL.
    pub fn with_html(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.with_page(FetchedPage::new(url, html).with_content_type("text/html; charset=utf-8"))
    }

    /// Fail requests for this exact URL.
    pub fn with_failure(self, url: impl Into<String>) -> Self {
        self.failures.write().unwrap().insert(url.into());
        self
    }

    /// Fail requests for every URL starting with `prefix`.
    pub fn with_failing_prefix(self, prefix: impl Into<String>) -> Self {
        self.failing_prefixes.write().unwrap().push(prefix.into());
        self
    }

    /// Panic inside `fetch` for every URL starting with `prefix`.
    pub fn with_panic_prefix(self, prefix: impl Into<String>) -> Self {
        self.panicking_prefixes.write().unwrap().push(prefix.into());
        self
    }

    /// Sleep this long inside every fetch.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// URLs requested so far, in call order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn fetch_call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Highest number of fetches observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Clear all recorded calls.
    pub fn reset_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn matches_prefix(prefixes: &RwLock<Vec<String>>, url: &str) -> bool {
        prefixes
            .read()
            .unwrap()
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()))
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> FetchResult<FetchedPage> {
        self.calls.write().unwrap().push(url.to_string());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if Self::matches_prefix(&self.panicking_prefixes, url) {
            panic!("simulated transport panic for {}", url);
        }

        if self.failures.read().unwrap().contains(url)
            || Self::matches_prefix(&self.failing_prefixes, url)
        {
            return Err(FetchError::Http("simulated transport failure".into()));
        }

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: url.to_string(),
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Adapter that returns a fixed answer without fetching.
#[derive(Clone)]
pub struct FixedAdapter {
    kind: SourceKind,
    observation: Option<Observation>,
    calls: Arc<AtomicUsize>,
}

impl FixedAdapter {
    /// Always report `observation`.
    pub fn found(observation: Observation) -> Self {
        Self {
            kind: observation.source,
            observation: Some(observation),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Never find anything.
    pub fn empty(kind: SourceKind) -> Self {
        Self {
            kind,
            observation: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times `find` ran.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceAdapter for FixedAdapter {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn candidates(&self, _company: &CompanyQuery) -> Vec<String> {
        Vec::new()
    }

    async fn find(&self, _company: &CompanyQuery, _fetcher: &dyn Fetcher) -> Option<Observation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.observation.clone()
    }
}

/// Adapter that panics, for failure-isolation tests.
pub struct PanickingAdapter {
    kind: SourceKind,
}

impl PanickingAdapter {
    pub fn new(kind: SourceKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl SourceAdapter for PanickingAdapter {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn candidates(&self, _company: &CompanyQuery) -> Vec<String> {
        Vec::new()
    }

    async fn find(&self, company: &CompanyQuery, _fetcher: &dyn Fetcher) -> Option<Observation> {
        panic!("adapter {} blew up researching {}", self.kind, company);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_mock_serves_and_records() {
        let fetcher = MockFetcher::new()
            .with_text("https://example.com/a", "Page A")
            .with_failure("https://example.com/b");

        let page = fetcher.fetch("https://example.com/a", TIMEOUT).await.unwrap();
        assert_eq!(page.content, "Page A");
        assert!(fetcher.fetch("https://example.com/b", TIMEOUT).await.is_err());
        assert!(matches!(
            fetcher.fetch("https://example.com/c", TIMEOUT).await,
            Err(FetchError::NotFound { .. })
        ));

        assert_eq!(
            fetcher.fetch_calls(),
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c"
            ]
        );
        fetcher.reset_calls();
        assert_eq!(fetcher.fetch_call_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_prefix_beats_canned_page() {
        let fetcher = MockFetcher::new()
            .with_text("https://down.example/page", "unreachable")
            .with_failing_prefix("https://down.example");

        assert!(fetcher
            .fetch("https://down.example/page", TIMEOUT)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let fetcher = MockFetcher::new();
        let clone = fetcher.clone();
        clone.add_page(FetchedPage::new("https://example.com", "shared"));

        assert!(fetcher.fetch("https://example.com", TIMEOUT).await.is_ok());
        assert_eq!(clone.fetch_call_count(), 1);
    }
}
