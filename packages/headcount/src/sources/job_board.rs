//! Regional job-board company listing adapter.

use async_trait::async_trait;

use super::{CandidateSearch, CompanyKeys, Excerpt, RegionalFlag, SourceSettings};
use crate::traits::adapter::SourceAdapter;
use crate::traits::fetcher::Fetcher;
use crate::types::observation::{CompanyQuery, Observation, SourceKind};

const LISTING_BASE: &str = "https://www.jobstreet.com.sg/en/companies";

/// Reads "company size" from a job-board listing.
///
/// The board only lists employers operating in the region, so every
/// observation it produces is regional.
pub struct JobBoardAdapter {
    settings: SourceSettings,
}

impl JobBoardAdapter {
    pub fn new(settings: SourceSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SourceAdapter for JobBoardAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::JobBoard
    }

    fn candidates(&self, company: &CompanyQuery) -> Vec<String> {
        CompanyKeys::derive(company, &self.settings.region)
            .slugs()
            .into_iter()
            .map(|slug| format!("{}/{}", LISTING_BASE, slug))
            .collect()
    }

    async fn find(&self, company: &CompanyQuery, fetcher: &dyn Fetcher) -> Option<Observation> {
        CandidateSearch {
            kind: self.kind(),
            regional: RegionalFlag::Always,
            excerpt: Excerpt::PageText,
            settings: &self.settings,
        }
        .run(self.candidates(company), fetcher)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    #[tokio::test]
    async fn test_listing_is_always_regional() {
        let company = CompanyQuery::parse("Acme Holdings").unwrap();
        let fetcher = MockFetcher::new().with_html(
            "https://www.jobstreet.com.sg/en/companies/acme-holdings",
            "<div class=\"size\">Company size: 1,001-5,000 employees</div>",
        );
        let adapter = JobBoardAdapter::new(SourceSettings::default());

        let observation = adapter.find(&company, &fetcher).await.unwrap();

        assert_eq!(observation.count, 5000);
        assert!(observation.is_regional);
        assert_eq!(fetcher.fetch_call_count(), 1);
    }
}
