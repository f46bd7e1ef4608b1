//! Observations: one source's claim about a company's headcount.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ResearchError, Result};

/// The company being researched.
///
/// Always trimmed and non-empty. Construct with [`CompanyQuery::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CompanyQuery(String);

impl CompanyQuery {
    /// Trim the raw name and reject it if nothing is left.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ResearchError::InvalidCompany {
                reason: "company name is empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The trimmed company name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CompanyQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The kind of source an observation came from.
///
/// Serialized as the human-facing label of the concrete site each adapter
/// targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// LinkedIn-style company profile
    #[serde(rename = "LinkedIn")]
    LinkedIn,
    /// General web search results
    #[serde(rename = "Google Search")]
    WebSearch,
    /// Job-board company listing
    #[serde(rename = "JobStreet")]
    JobBoard,
    /// Employer review-site listing
    #[serde(rename = "Glassdoor")]
    ReviewSite,
    /// The company's own website
    #[serde(rename = "Company Website")]
    CompanySite,
}

impl SourceKind {
    /// Every source kind, in canonical adapter order.
    pub const ALL: [SourceKind; 5] = [
        SourceKind::LinkedIn,
        SourceKind::WebSearch,
        SourceKind::JobBoard,
        SourceKind::ReviewSite,
        SourceKind::CompanySite,
    ];

    /// Label used in serialized output.
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::LinkedIn => "LinkedIn",
            SourceKind::WebSearch => "Google Search",
            SourceKind::JobBoard => "JobStreet",
            SourceKind::ReviewSite => "Glassdoor",
            SourceKind::CompanySite => "Company Website",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One source's claim about a company's employee count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    /// Extracted headcount
    pub count: u64,

    /// Where the claim came from
    pub source: SourceKind,

    /// The URL (or search query URL) that produced the claim
    pub url: String,

    /// Whether the evidence pertains to the target region
    pub is_regional: bool,
}

impl Observation {
    /// Create a non-regional observation.
    pub fn new(count: u64, source: SourceKind, url: impl Into<String>) -> Self {
        Self {
            count,
            source,
            url: url.into(),
            is_regional: false,
        }
    }

    /// Set the regional flag.
    pub fn regional(mut self, is_regional: bool) -> Self {
        self.is_regional = is_regional;
        self
    }

    /// Regionally-flagged LinkedIn evidence outranks count ordering.
    pub fn is_authoritative(&self) -> bool {
        self.source == SourceKind::LinkedIn && self.is_regional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_query_trims() {
        let company = CompanyQuery::parse("  Acme Pte Ltd \n").unwrap();
        assert_eq!(company.as_str(), "Acme Pte Ltd");
    }

    #[test]
    fn test_company_query_rejects_blank() {
        assert!(CompanyQuery::parse("   ").is_err());
        assert!(CompanyQuery::parse("").is_err());
    }

    #[test]
    fn test_source_kind_serializes_as_label() {
        let json = serde_json::to_string(&SourceKind::WebSearch).unwrap();
        assert_eq!(json, "\"Google Search\"");
        for kind in SourceKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.label()));
        }
    }

    #[test]
    fn test_authoritative_requires_both() {
        let url = "https://example.com";
        assert!(Observation::new(1, SourceKind::LinkedIn, url)
            .regional(true)
            .is_authoritative());
        assert!(!Observation::new(1, SourceKind::LinkedIn, url).is_authoritative());
        assert!(!Observation::new(1, SourceKind::ReviewSite, url)
            .regional(true)
            .is_authoritative());
    }
}
