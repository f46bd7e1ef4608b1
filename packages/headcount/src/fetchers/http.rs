//! HTTP fetcher implementation.
//!
//! Plain GET requests with a browser-like user agent, a per-request
//! timeout, and exponential backoff on transient failures.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{FetchedPage, Fetcher};

/// Browser user agents rotated across requests.
const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
];

/// HTTP fetcher backed by `reqwest`.
///
/// # Example
///
/// ```rust,ignore
/// use headcount::fetchers::HttpFetcher;
/// use std::time::Duration;
///
/// let fetcher = HttpFetcher::new()?
///     .with_max_retries(3)
///     .with_backoff(Duration::from_millis(250));
/// ```
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agents: Vec<String>,
    max_retries: u32,
    backoff: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with default settings: 2 retries, 500ms base backoff.
    pub fn new() -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        Ok(Self {
            client,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            max_retries: 2,
            backoff: Duration::from_millis(500),
        })
    }

    /// Pin a single user agent instead of rotating.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agents = vec![user_agent.into()];
        self
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Retries after the first attempt for transient failures.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Delay before the first retry; doubles on each subsequent one.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }

    fn user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(DEFAULT_USER_AGENTS[0])
    }

    async fn fetch_once(&self, url: &Url, timeout: Duration) -> FetchResult<FetchedPage> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, self.user_agent())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let content = response
            .text()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        let mut page = FetchedPage::new(url.as_str(), content).with_status(status.as_u16());
        if let Some(ct) = content_type {
            page = page.with_content_type(ct);
        }
        Ok(page)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchResult<FetchedPage> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let mut attempt = 0;
        loop {
            debug!(url = %url, attempt, "HTTP fetch starting");
            match self.fetch_once(&parsed, timeout).await {
                Ok(page) => {
                    debug!(url = %url, status = page.status, bytes = page.content.len(), "HTTP fetch complete");
                    return Ok(page);
                }
                Err(e) if attempt < self.max_retries && e.is_retryable() => {
                    let delay = self.backoff_for(attempt);
                    debug!(url = %url, error = %e, delay_ms = delay.as_millis() as u64, "Retrying fetch");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(url = %url, error = %e, attempts = attempt + 1, "HTTP fetch failed");
                    return Err(e);
                }
            }
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
