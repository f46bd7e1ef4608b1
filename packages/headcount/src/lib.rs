//! Multi-Source Employee Headcount Library
//!
//! Estimates how many people a company employs in a region by querying
//! several public sources, extracting a count from each, and reconciling
//! the observations into one best estimate with provenance.
//!
//! # Usage
//!
//! ```rust,ignore
//! use headcount::{BatchResearcher, HttpFetcher, ResearchConfig};
//! use std::sync::Arc;
//!
//! let config = ResearchConfig::default();
//! let researcher = BatchResearcher::from_config(Arc::new(HttpFetcher::new()?), &config);
//!
//! for result in researcher.research_batch(["Acme Pte Ltd", "Globex"]).await {
//!     println!("{}", serde_json::to_string(&result)?);
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Transport and source seams (Fetcher, SourceAdapter)
//! - [`types`] - Observations, results, and configuration
//! - [`pipeline`] - Extraction, orchestration, reconciliation, batching
//! - [`sources`] - The five source adapters
//! - [`fetchers`] - HTTP and rate-limited transports
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod fetchers;
pub mod pipeline;
pub mod sources;
pub mod testing;
pub mod text;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ExtractorError, FetchError, FetchResult, ResearchError, Result};
pub use traits::{
    adapter::SourceAdapter,
    fetcher::{FetchedPage, Fetcher},
};
pub use types::{
    config::{AdapterScheduling, Pacing, Region, ResearchConfig, StopPolicy},
    observation::{CompanyQuery, Observation, SourceKind},
    result::{Estimate, ReconciledResult},
};

// Re-export pipeline components
pub use pipeline::{
    normalize_count, reconcile, reconcile_outcome, BatchResearcher, CountExtractor, CountMatch,
    Orchestrator,
};

// Re-export sources
pub use sources::{default_adapters, SourceSettings};

// Re-export fetchers
pub use fetchers::{FetcherExt, HttpFetcher, RateLimitedFetcher};

// Re-export testing utilities
pub use testing::MockFetcher;
