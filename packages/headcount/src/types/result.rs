//! Reconciled results: the terminal output for one company.

use serde::{Serialize, Serializer};

use crate::types::observation::{CompanyQuery, Observation};

/// The best estimate for a company, or why there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Estimate {
    /// At least one source produced a count
    Found(Observation),

    /// Every source was tried and none produced a count
    NotFound,

    /// Research failed before observations could be gathered
    Error(String),
}

/// One company's reconciled headcount with provenance and alternates.
///
/// `alternates` never contains `best`. Built once by the reconciler and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledResult {
    pub company: CompanyQuery,
    pub best: Estimate,
    pub alternates: Vec<Observation>,
}

impl ReconciledResult {
    /// Result for a company where no source produced a count.
    pub fn not_found(company: CompanyQuery) -> Self {
        Self {
            company,
            best: Estimate::NotFound,
            alternates: Vec::new(),
        }
    }

    /// Result for a company whose research failed.
    pub fn error(company: CompanyQuery, cause: impl Into<String>) -> Self {
        Self {
            company,
            best: Estimate::Error(cause.into()),
            alternates: Vec::new(),
        }
    }

    /// The chosen observation, if any.
    pub fn best_observation(&self) -> Option<&Observation> {
        match &self.best {
            Estimate::Found(observation) => Some(observation),
            _ => None,
        }
    }

    /// The chosen headcount, if any.
    pub fn count(&self) -> Option<u64> {
        self.best_observation().map(|o| o.count)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.best, Estimate::Error(_))
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum EmployeeCount {
    Count(u64),
    Label(&'static str),
}

#[derive(Serialize)]
struct AlternateView<'a> {
    count: u64,
    source: &'a str,
    is_regional: bool,
}

#[derive(Serialize)]
struct ResultView<'a> {
    company: &'a str,
    employee_count: EmployeeCount,
    is_regional: bool,
    source: &'a str,
    url: &'a str,
    other_sources: Vec<AlternateView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Serialize for ReconciledResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let other_sources = self
            .alternates
            .iter()
            .map(|o| AlternateView {
                count: o.count,
                source: o.source.label(),
                is_regional: o.is_regional,
            })
            .collect();

        let view = match &self.best {
            Estimate::Found(best) => ResultView {
                company: self.company.as_str(),
                employee_count: EmployeeCount::Count(best.count),
                is_regional: best.is_regional,
                source: best.source.label(),
                url: &best.url,
                other_sources,
                error: None,
            },
            Estimate::NotFound => ResultView {
                company: self.company.as_str(),
                employee_count: EmployeeCount::Label("Not found"),
                is_regional: false,
                source: "None",
                url: "#",
                other_sources,
                error: None,
            },
            Estimate::Error(cause) => ResultView {
                company: self.company.as_str(),
                employee_count: EmployeeCount::Label("Error"),
                is_regional: false,
                source: "Error",
                url: "#",
                other_sources,
                error: Some(cause),
            },
        };

        view.serialize(serializer)
    }
}
