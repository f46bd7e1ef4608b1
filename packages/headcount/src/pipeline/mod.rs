//! Research pipeline.
//!
//! The pipeline runs, per company:
//! - Source adapters in canonical order (orchestrate)
//! - Count extraction over each fetched page (extract)
//! - Band filtering and regional preference (reconcile)
//!
//! and, across companies, bounded-concurrency batching (batch).

pub mod batch;
pub mod extract;
pub mod orchestrate;
pub mod reconcile;

pub use batch::BatchResearcher;
pub use extract::{normalize_count, CountExtractor, CountMatch, DEFAULT_PATTERNS};
pub use orchestrate::Orchestrator;
pub use reconcile::{reconcile, reconcile_outcome, BAND_TOLERANCE};
