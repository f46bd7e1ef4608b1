//! Company website adapter.

use async_trait::async_trait;

use super::{keys::dedup, CandidateSearch, CompanyKeys, Excerpt, RegionalFlag, SourceSettings};
use crate::traits::adapter::SourceAdapter;
use crate::traits::fetcher::Fetcher;
use crate::types::observation::{CompanyQuery, Observation, SourceKind};

/// Guesses the company's domain from its name and reads the about page.
///
/// The regional TLD (`.com.sg`) is tried before `.com`.
pub struct CompanySiteAdapter {
    settings: SourceSettings,
}

impl CompanySiteAdapter {
    pub fn new(settings: SourceSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SourceAdapter for CompanySiteAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::CompanySite
    }

    fn candidates(&self, company: &CompanyQuery) -> Vec<String> {
        let keys = CompanyKeys::derive(company, &self.settings.region);
        if keys.compact.is_empty() {
            return Vec::new();
        }

        let code = self.settings.region.code.to_lowercase();
        let mut urls = Vec::new();
        if !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric()) {
            urls.push(format!("https://www.{}.com.{}/about-us", keys.compact, code));
        }
        urls.push(format!("https://www.{}.com/about-us", keys.compact));
        urls.push(format!("https://www.{}.com/about", keys.compact));
        dedup(urls)
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

    #[test]
    fn test_candidates_prefer_regional_domain() {
        let adapter = CompanySiteAdapter::new(SourceSettings::default());
        let company = CompanyQuery::parse("Acme Pte Ltd").unwrap();
        assert_eq!(
            adapter.candidates(&company),
            vec![
                "https://www.acme.com.sg/about-us",
                "https://www.acme.com/about-us",
                "https://www.acme.com/about",
            ]
        );
    }

    #[test]
    fn test_no_candidates_without_ascii_name() {
        let adapter = CompanySiteAdapter::new(SourceSettings::default());
        let company = CompanyQuery::parse("株式会社").unwrap();
        assert!(adapter.candidates(&company).is_empty());
    }

    #[tokio::test]
    async fn test_about_page_team_size() {
        let company = CompanyQuery::parse("Acme").unwrap();
        let fetcher = MockFetcher::new().with_html(
            "https://www.acme.com/about",
            "<h2>Who we are</h2><p>From our Singapore HQ, a team of 85 builds Acme.</p>",
        );
        let adapter = CompanySiteAdapter::new(SourceSettings::default());

        let observation = adapter.find(&company, &fetcher).await.unwrap();

        assert_eq!(observation.count, 85);
        assert!(observation.is_regional);
        assert_eq!(observation.url, "https://www.acme.com/about");
        assert_eq!(fetcher.fetch_call_count(), 3);
    }
}
