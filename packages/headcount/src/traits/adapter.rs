//! Source adapter trait.

use async_trait::async_trait;

use crate::traits::fetcher::Fetcher;
use crate::types::observation::{CompanyQuery, Observation, SourceKind};

/// Turns a company name into at most one observation from one source.
///
/// Adapters hold no mutable state, so one instance may serve many
/// companies concurrently. Fetch failures and extraction misses are
/// absorbed: `find` returns `None` rather than an error.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// The source this adapter reports as.
    fn kind(&self) -> SourceKind;

    /// Candidate URLs in the order they are tried.
    fn candidates(&self, company: &CompanyQuery) -> Vec<String>;

    /// Try candidates in order and stop at the first extracted count.
    async fn find(&self, company: &CompanyQuery, fetcher: &dyn Fetcher) -> Option<Observation>;
}
