//! LinkedIn-style company profile adapter.

use async_trait::async_trait;

use super::{keys::dedup, CandidateSearch, CompanyKeys, Excerpt, RegionalFlag, SourceSettings};
use crate::traits::adapter::SourceAdapter;
use crate::traits::fetcher::Fetcher;
use crate::types::observation::{CompanyQuery, Observation, SourceKind};

const PROFILE_BASE: &str = "https://www.linkedin.com/company";

/// Reads the headcount from a company's profile page.
///
/// Tries the full slug, the slug without corporate suffixes, then the
/// region-coded slug (`acme-sg`), since regional subsidiaries often
/// publish separate pages.
pub struct LinkedInAdapter {
    settings: SourceSettings,
}

impl LinkedInAdapter {
    pub fn new(settings: SourceSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SourceAdapter for LinkedInAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::LinkedIn
    }

    fn candidates(&self, company: &CompanyQuery) -> Vec<String> {
        let keys = CompanyKeys::derive(company, &self.settings.region);
        let mut slugs = keys.slugs();
        slugs.push(keys.code_slug.clone());
        dedup(slugs)
            .into_iter()
            .map(|slug| format!("{}/{}", PROFILE_BASE, slug))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    fn company(name: &str) -> CompanyQuery {
        CompanyQuery::parse(name).unwrap()
    }

    #[test]
    fn test_candidates() {
        let adapter = LinkedInAdapter::new(SourceSettings::default());
        assert_eq!(
            adapter.candidates(&company("Acme Pte Ltd")),
            vec![
                "https://www.linkedin.com/company/acme-pte-ltd",
                "https://www.linkedin.com/company/acme",
                "https://www.linkedin.com/company/acme-sg",
            ]
        );
    }

    #[tokio::test]
    async fn test_falls_back_to_stripped_slug() {
        let fetcher = MockFetcher::new().with_html(
            "https://www.linkedin.com/company/acme",
            "<html><body><dl><dt>Company size</dt><dd>201-500 employees</dd>\
             <dt>Headquarters</dt><dd>Singapore, Singapore</dd></dl></body></html>",
        );
        let adapter = LinkedInAdapter::new(SourceSettings::default());

        let observation = adapter
            .find(&company("Acme Pte Ltd"), &fetcher)
            .await
            .unwrap();

        assert_eq!(observation.source, SourceKind::LinkedIn);
        assert_eq!(observation.count, 500);
        assert_eq!(observation.url, "https://www.linkedin.com/company/acme");
        assert!(observation.is_regional);
    }
}
