//! Typed errors for the headcount library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that abort research for a single company.
///
/// Per-candidate fetch failures never surface here; adapters absorb them.
/// These are the faults that turn a company's result into an error entry.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Company name was empty after trimming
    #[error("invalid company name: {reason}")]
    InvalidCompany { reason: String },

    /// Operation was cancelled
    #[error("operation cancelled")]
    Cancelled,

    /// The pipeline panicked
    #[error("research panicked: {0}")]
    Panicked(String),

    /// The spawned research task could not be joined
    #[error("research task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors that can occur while fetching a candidate URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success status after retries were exhausted
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Per-fetch timeout elapsed
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// No canned response (mock transport)
    #[error("not found: {url}")]
    NotFound { url: String },
}

impl FetchError {
    /// Whether another attempt at the same URL might succeed.
    ///
    /// 429 and 5xx responses are transient, as are transport failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(_) => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::InvalidUrl { .. } | FetchError::Timeout { .. } | FetchError::NotFound { .. } => {
                false
            }
        }
    }
}

/// Errors raised while building a count extractor.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// Pattern failed to compile
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Pattern must expose exactly one capture group holding the number
    #[error("pattern {pattern:?} must have exactly one capture group, found {groups}")]
    CaptureGroups { pattern: String, groups: usize },

    /// Extractor needs at least one pattern
    #[error("no patterns supplied")]
    Empty,
}

/// Result type alias for research operations.
pub type Result<T> = std::result::Result<T, ResearchError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
