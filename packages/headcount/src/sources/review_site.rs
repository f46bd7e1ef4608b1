//! Employer review-site overview adapter.

use async_trait::async_trait;

use super::{CandidateSearch, CompanyKeys, Excerpt, RegionalFlag, SourceSettings};
use crate::traits::adapter::SourceAdapter;
use crate::traits::fetcher::Fetcher;
use crate::types::observation::{CompanyQuery, Observation, SourceKind};

const OVERVIEW_BASE: &str = "https://www.glassdoor.sg/Overview/Working-at";

pub struct ReviewSiteAdapter {
    settings: SourceSettings,
}

impl ReviewSiteAdapter {
    pub fn new(settings: SourceSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SourceAdapter for ReviewSiteAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::ReviewSite
    }

    fn candidates(&self, company: &CompanyQuery) -> Vec<String> {
        CompanyKeys::derive(company, &self.settings.region)
            .slugs()
            .into_iter()
            .map(|slug| format!("{}-{}", OVERVIEW_BASE, slug))
            .collect()
    }

    async fn find(&self, company: &CompanyQuery, fetcher: &dyn Fetcher) -> Option<Observation> {
        CandidateSearch {
            kind: self.kind(),
            regional: RegionalFlag::Detect,
            excerpt: Excerpt::PageText,
            settings: &self.settings,
        }
        .run(self.candidates(company), fetcher)
        .await
    }
}
