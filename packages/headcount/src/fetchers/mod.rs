//! Fetcher implementations.
//!
//! - `HttpFetcher` - GET over `reqwest` with retries and user-agent rotation
//! - `RateLimitedFetcher` - Wrapper that caps the shared request rate
//! - `MockFetcher` (in [`crate::testing`]) - Canned pages for tests

mod http;
mod rate_limited;

pub use http::HttpFetcher;
pub use rate_limited::{FetcherExt, RateLimitedFetcher};

// Re-export from traits for convenience
pub use crate::traits::fetcher::{FetchedPage, Fetcher};
