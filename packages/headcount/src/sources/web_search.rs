//! General web search adapter.
//!
//! Only result snippets are scanned. A search page is full of unrelated
//! numbers (result counts, ads, dates) that would otherwise win.

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::{CandidateSearch, CompanyKeys, Excerpt, RegionalFlag, SourceSettings};
use crate::traits::adapter::SourceAdapter;
use crate::traits::fetcher::{FetchedPage, Fetcher};
use crate::types::observation::{CompanyQuery, Observation, SourceKind};

const SEARCH_ENDPOINT: &str = "https://www.google.com/search";

/// Sites whose listings carry a headcount.
const SITE_FILTER: &str = "site:linkedin.com OR site:glassdoor.com OR site:jobstreet.com.sg";

static SNIPPET_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".VwiC3b, .st, .b_caption, .result__snippet, .snippet").unwrap()
});

/// Searches for "<company> <region> number of employees".
///
/// The query itself is region-qualified, so every hit is regional.
pub struct WebSearchAdapter {
    settings: SourceSettings,
}

impl WebSearchAdapter {
    pub fn new(settings: SourceSettings) -> Self {
        Self { settings }
    }

    fn query_for(&self, name: &str) -> String {
        format!(
            "{} {} number of employees {}",
            name,
            self.settings.region.name.to_lowercase(),
            SITE_FILTER
        )
    }
}

#[async_trait]
impl SourceAdapter for WebSearchAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::WebSearch
    }

    fn candidates(&self, company: &CompanyQuery) -> Vec<String> {
        CompanyKeys::derive(company, &self.settings.region)
            .names()
            .iter()
            .filter_map(|name| {
                url::Url::parse_with_params(SEARCH_ENDPOINT, &[("q", self.query_for(name))]).ok()
            })
            .map(String::from)
            .collect()
    }

    async fn find(&self, company: &CompanyQuery, fetcher: &dyn Fetcher) -> Option<Observation> {
        let hint = CompanyKeys::derive(company, &self.settings.region).hint();
        CandidateSearch {
            kind: self.kind(),
            regional: RegionalFlag::Always,
            excerpt: Excerpt::SearchSnippets { hint },
            settings: &self.settings,
        }
        .run(self.candidates(company), fetcher)
        .await
    }
}

/// Text of the search-result snippets on a page.
///
/// Falls back to lines mentioning `hint` when the page has no recognizable
/// snippet containers (plain-text transports, unfamiliar layouts).
pub fn snippet_text(page: &FetchedPage, hint: &str) -> String {
    if page.is_html() {
        let document = Html::parse_document(&page.content);
        let snippets: Vec<String> = document
            .select(&SNIPPET_SELECTOR)
            .map(|el| {
                el.text()
                    .flat_map(str::split_whitespace)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|s| !s.is_empty())
            .collect();
        if !snippets.is_empty() {
            return snippets.join("\n");
        }
    }

    let hint = hint.to_lowercase();
    page.text()
        .lines()
        .filter(|line| hint.is_empty() || line.to_lowercase().contains(&hint))
        .collect::<Vec<_>>()
        .join("\n")
}
