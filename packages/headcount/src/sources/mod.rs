//! Source adapter implementations.
//!
//! One adapter per source kind, all sharing the same candidate loop:
//! fetch each candidate URL in order, run the count extractor over the
//! page (or a narrowed excerpt), and stop at the first hit.
//!
//! # Available Adapters
//!
//! - `LinkedInAdapter` - company profile pages
//! - `WebSearchAdapter` - region-qualified search results (snippets only)
//! - `JobBoardAdapter` - regional job-board company listings
//! - `ReviewSiteAdapter` - employer review overview pages
//! - `CompanySiteAdapter` - the company's own "about" pages
//!
//! # Example
//!
//! ```rust,ignore
//! use headcount::sources::{default_adapters, SourceSettings};
//!
//! let adapters = default_adapters(&SourceSettings::default());
//! for adapter in &adapters {
//!     if let Some(observation) = adapter.find(&company, &fetcher).await {
//!         println!("{}: {}", observation.source, observation.count);
//!     }
//! }
//! ```

mod company_site;
mod job_board;
pub mod keys;
mod linkedin;
mod review_site;
mod web_search;

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::pipeline::extract::CountExtractor;
use crate::text::context_window;
use crate::traits::adapter::SourceAdapter;
use crate::traits::fetcher::{FetchedPage, Fetcher};
use crate::types::config::{Region, ResearchConfig};
use crate::types::observation::{Observation, SourceKind};

pub use company_site::CompanySiteAdapter;
pub use job_board::JobBoardAdapter;
pub use keys::CompanyKeys;
pub use linkedin::LinkedInAdapter;
pub use review_site::ReviewSiteAdapter;
pub use web_search::{snippet_text, WebSearchAdapter};

/// Bytes on each side of a match searched for region markers.
pub const DEFAULT_CONTEXT_RADIUS: usize = 200;

/// Settings shared by every adapter.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub extractor: Arc<CountExtractor>,
    pub region: Region,
    pub fetch_timeout: Duration,
    pub context_radius: usize,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self::from_config(&ResearchConfig::default())
    }
}

impl SourceSettings {
    pub fn from_config(config: &ResearchConfig) -> Self {
        Self {
            extractor: Arc::new(CountExtractor::new()),
            region: config.region.clone(),
            fetch_timeout: config.fetch_timeout(),
            context_radius: DEFAULT_CONTEXT_RADIUS,
        }
    }

    /// Use a custom extractor.
    pub fn with_extractor(mut self, extractor: CountExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }
}

/// The canonical adapter set, in canonical order.
pub fn default_adapters(settings: &SourceSettings) -> Vec<Arc<dyn SourceAdapter>> {
    vec![
        Arc::new(LinkedInAdapter::new(settings.clone())),
        Arc::new(WebSearchAdapter::new(settings.clone())),
        Arc::new(JobBoardAdapter::new(settings.clone())),
        Arc::new(ReviewSiteAdapter::new(settings.clone())),
        Arc::new(CompanySiteAdapter::new(settings.clone())),
    ]
}

/// How an adapter decides `is_regional`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RegionalFlag {
    /// The source itself is region-scoped (regional site or qualified query).
    Always,
    /// A region marker appears near the matched phrase.
    Detect,
}

/// Which part of a fetched page the extractor sees.
#[derive(Debug, Clone)]
pub(crate) enum Excerpt {
    /// All visible text.
    PageText,
    /// Search-result snippets, falling back to lines mentioning the hint.
    SearchSnippets { hint: String },
}

impl Excerpt {
    fn apply(&self, page: &FetchedPage) -> String {
        match self {
            Excerpt::PageText => page.text(),
            Excerpt::SearchSnippets { hint } => snippet_text(page, hint),
        }
    }
}

/// The candidate loop shared by all adapters.
pub(crate) struct CandidateSearch<'a> {
    pub kind: SourceKind,
    pub regional: RegionalFlag,
    pub excerpt: Excerpt,
    pub settings: &'a SourceSettings,
}

impl CandidateSearch<'_> {
    pub async fn run(&self, candidates: Vec<String>, fetcher: &dyn Fetcher) -> Option<Observation> {
        let settings = self.settings;

        for url in candidates {
            debug!(source = %self.kind, url = %url, "Trying candidate");

            // The transport bounds each attempt; retries and rate limiting sit outside that bound
            let page = match fetcher.fetch(&url, settings.fetch_timeout).await {
                Ok(page) => page,
                Err(e) => {
                    debug!(source = %self.kind, url = %url, error = %e, "Candidate fetch failed");
                    continue;
                }
            };

            if !page.has_content() {
                debug!(source = %self.kind, url = %url, "Candidate returned empty body");
                continue;
            }

            let text = self.excerpt.apply(&page);
            let Some(found) = settings.extractor.find(&text) else {
                debug!(source = %self.kind, url = %url, "No count in candidate");
                continue;
            };

            let is_regional = match self.regional {
                RegionalFlag::Always => true,
                RegionalFlag::Detect => settings.region.is_mentioned_in(context_window(
                    &text,
                    found.start,
                    found.end,
                    settings.context_radius,
                )),
            };

            info!(
                source = %self.kind,
                url = %url,
                count = found.count,
                is_regional,
                "Observation found"
            );
            return Some(Observation::new(found.count, self.kind, url).regional(is_regional));
        }

        debug!(source = %self.kind, "Candidates exhausted");
        None
    }
}
