//! Fetcher trait: the injected transport capability.
//!
//! Source adapters never talk to the network directly. They receive a
//! `&dyn Fetcher` and treat every failure as "this candidate produced
//! nothing".
//!
//! # Usage
//!
//! ```rust,ignore
//! use headcount::{Fetcher, HttpFetcher};
//! use std::time::Duration;
//!
//! let fetcher = HttpFetcher::new()?;
//! let page = fetcher
//!     .fetch("https://www.linkedin.com/company/acme", Duration::from_secs(10))
//!     .await?;
//! println!("{}", page.text());
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::error::FetchResult;
use crate::text::html_to_text;

/// Raw content returned by a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL the content was requested from
    pub url: String,

    /// Raw body (HTML or plain text)
    pub content: String,

    /// MIME type from the response, if any
    pub content_type: Option<String>,

    /// HTTP status code
    pub status: u16,

    /// When the content was fetched
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    /// Create a page with status 200 and no content type.
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
            content_type: None,
            status: 200,
            fetched_at: Utc::now(),
        }
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Check if this page has content.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// Whether the body looks like HTML.
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            Some(ct) => ct.contains("html"),
            None => {
                let head = self.content.trim_start();
                head.starts_with('<') && head.contains('>')
            }
        }
    }

    /// Visible text of the page.
    pub fn text(&self) -> String {
        if self.is_html() {
            html_to_text(&self.content)
        } else {
            self.content.clone()
        }
    }
}

/// Transport capability used by source adapters.
///
/// Implementations:
/// - `HttpFetcher` - reqwest with retry/backoff
/// - `RateLimitedFetcher` - governor wrapper around any fetcher
/// - `MockFetcher` - canned responses for tests
///
/// Implementations must be safe to share across workers.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch one URL. `timeout` bounds each request attempt, not retries or queueing.
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchResult<FetchedPage>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchResult<FetchedPage> {
        (**self).fetch(url, timeout).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetched_page_builder() {
        let page = FetchedPage::new("https://example.com", "Hello")
            .with_content_type("text/plain")
            .with_status(203);

        assert_eq!(page.url, "https://example.com");
        assert_eq!(page.status, 203);
        assert!(page.has_content());
        assert!(!page.is_html());
        assert_eq!(page.text(), "Hello");
    }

    #[test]
    fn test_html_detection_without_content_type() {
        let page = FetchedPage::new("https://example.com", "<p>1,200 employees</p>");
        assert!(page.is_html());
        assert_eq!(page.text(), "1,200 employees");
    }

    #[test]
    fn test_empty_content_detection() {
        assert!(!FetchedPage::new("https://example.com", "  \n ").has_content());
    }
}
