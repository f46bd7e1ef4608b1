//! Batch coordination: research many companies with bounded concurrency.
//!
//! Each company runs in its own spawned task so a panic inside one
//! pipeline becomes an error result for that company alone. Results are
//! returned in completion order.

use futures::stream::{self, StreamExt};
use indexmap::IndexSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::orchestrate::{panic_message, Orchestrator};
use super::reconcile::reconcile_outcome;
use crate::error::ResearchError;
use crate::traits::fetcher::Fetcher;
use crate::types::config::{Pacing, ResearchConfig};
use crate::types::observation::CompanyQuery;
use crate::types::result::ReconciledResult;

/// Researches a list of companies, at most `concurrency` at a time.
pub struct BatchResearcher {
    orchestrator: Arc<Orchestrator>,
    concurrency: usize,
    max_batch_size: usize,
    completion_pacing: Pacing,
}

impl BatchResearcher {
    pub fn new(orchestrator: Orchestrator, config: &ResearchConfig) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            concurrency: config.concurrency.max(1),
            max_batch_size: config.max_batch_size,
            completion_pacing: config.completion_pacing,
        }
    }

    /// Batch researcher over the canonical adapters.
    pub fn from_config(fetcher: Arc<dyn Fetcher>, config: &ResearchConfig) -> Self {
        Self::new(Orchestrator::new(fetcher, config), config)
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Normalize raw names: trim, drop blanks, drop duplicates, cap the count.
    pub fn accept<I, S>(&self, companies: I) -> Vec<CompanyQuery>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique = IndexSet::new();
        for raw in companies {
            match CompanyQuery::parse(raw.as_ref()) {
                Ok(company) => {
                    unique.insert(company);
                }
                Err(_) => debug!("Skipping blank company name"),
            }
        }

        if unique.len() > self.max_batch_size {
            warn!(
                requested = unique.len(),
                max = self.max_batch_size,
                "Batch truncated"
            );
        }

        unique.into_iter().take(self.max_batch_size).collect()
    }

    /// Research every accepted company; one result per company.
    pub async fn research_batch<I, S>(&self, companies: I) -> Vec<ReconciledResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.research_batch_with_cancel(companies, CancellationToken::new())
            .await
    }

    /// Research with cancellation support.
    ///
    /// Companies still pending when `cancel` fires produce error results.
    /// Dropping the returned future cancels the spawned per-company tasks
    /// without cancelling `cancel` itself.
    pub async fn research_batch_with_cancel<I, S>(
        &self,
        companies: I,
        cancel: CancellationToken,
    ) -> Vec<ReconciledResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accepted = self.accept(companies);
        let total = accepted.len();

        let cancel = cancel.child_token();
        let _abandoned = cancel.clone().drop_guard();

        info!(
            companies = total,
            concurrency = self.concurrency,
            "Batch research starting"
        );

        let mut completions = stream::iter(accepted.into_iter().map(|company| {
            let orchestrator = Arc::clone(&self.orchestrator);
            let cancel = cancel.clone();
            async move { research_isolated(orchestrator, company, cancel).await }
        }))
        .buffer_unordered(self.concurrency);

        let mut results = Vec::with_capacity(total);
        while let Some(result) = completions.next().await {
            debug!(
                company = %result.company,
                count = ?result.count(),
                done = results.len() + 1,
                total,
                "Company finished"
            );
            results.push(result);

            if results.len() < total && !self.completion_pacing.is_none() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = self.completion_pacing.pause() => {}
                }
            }
        }

        let errors = results.iter().filter(|r| r.is_error()).count();
        info!(
            companies = results.len(),
            errors,
            "Batch research complete"
        );
        results
    }
}

async fn research_isolated(
    orchestrator: Arc<Orchestrator>,
    company: CompanyQuery,
    cancel: CancellationToken,
) -> ReconciledResult {
    let task_company = company.clone();
    let handle = tokio::spawn(async move {
        let outcome = orchestrator
            .research_with_cancel(&task_company, &cancel)
            .await;
        reconcile_outcome(&task_company, outcome)
    });

    match handle.await {
        Ok(result) => result,
        Err(e) => {
            let failure = if e.is_panic() {
                ResearchError::Panicked(panic_message(&*e.into_panic()))
            } else {
                ResearchError::Task(e)
            };
            error!(company = %company, error = %failure, "Research task failed");
            ReconciledResult::error(company, failure.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedAdapter, MockFetcher, PanickingAdapter};
    use crate::traits::adapter::SourceAdapter;
    use crate::types::observation::{Observation, SourceKind};
    use crate::types::result::Estimate;
    use std::time::Duration;

    fn config() -> ResearchConfig {
        ResearchConfig::default().without_pacing()
    }

    fn researcher_with(adapters: Vec<Arc<dyn SourceAdapter>>, config: &ResearchConfig) -> BatchResearcher {
        let orchestrator =
            Orchestrator::with_adapters(Arc::new(MockFetcher::new()), adapters, config);
        BatchResearcher::new(orchestrator, config)
    }

    #[test]
    fn test_accept_trims_dedupes_and_caps() {
        let researcher = researcher_with(Vec::new(), &config().with_max_batch_size(3));

        let accepted = researcher.accept(["  Acme ", "", "Acme", "Beta", "   ", "Gamma", "Delta"]);

        let names: Vec<_> = accepted.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Beta", "Gamma"]);
    }

    #[tokio::test]
    async fn test_one_result_per_company_despite_failures() {
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(PanickingAdapter::new(SourceKind::LinkedIn)),
            Arc::new(FixedAdapter::found(
                Observation::new(75, SourceKind::JobBoard, "https://jobs.example/acme").regional(true),
            )),
        ];
        let researcher = researcher_with(adapters, &config());

        let results = researcher.research_batch(["Acme", "Beta", "Gamma"]).await;

        assert_eq!(results.len(), 3);
        let mut names: Vec<_> = results.iter().map(|r| r.company.as_str().to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["Acme", "Beta", "Gamma"]);
        assert!(results.iter().all(|r| r.count() == Some(75)));
    }

    #[tokio::test]
    async fn test_batch_is_capped() {
        let researcher = researcher_with(
            vec![Arc::new(FixedAdapter::empty(SourceKind::ReviewSite))],
            &config(),
        );
        let companies: Vec<String> = (0..60).map(|i| format!("Company {}", i)).collect();

        let results = researcher.research_batch(&companies).await;

        assert_eq!(results.len(), 50);
        assert!(results.iter().all(|r| r.best == Estimate::NotFound));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let fetcher = MockFetcher::new().with_latency(Duration::from_millis(20));
        let config = config().with_concurrency(2);
        let researcher =
            BatchResearcher::from_config(Arc::new(fetcher.clone()), &config);
        let companies: Vec<String> = (0..6).map(|i| format!("Firm {}", i)).collect();

        let results = researcher.research_batch(&companies).await;

        assert_eq!(results.len(), 6);
        assert!(fetcher.max_in_flight() >= 1);
        assert!(fetcher.max_in_flight() <= 2);
    }

    #[tokio::test]
    async fn test_cancelled_batch_yields_error_results() {
        let researcher = researcher_with(
            vec![Arc::new(FixedAdapter::empty(SourceKind::WebSearch))],
            &config(),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        let results = researcher
            .research_batch_with_cancel(["Acme", "Beta"], cancel)
            .await;

        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|r| r.best == Estimate::Error("operation cancelled".to_string())));
    }

    #[tokio::test]
    async fn test_dropped_batch_stops_spawned_tasks() {
        let fetcher = MockFetcher::new().with_latency(Duration::from_millis(40));
        let researcher = BatchResearcher::from_config(Arc::new(fetcher.clone()), &config());
        let caller = CancellationToken::new();

        let batch = researcher.research_batch_with_cancel(["Acme", "Beta"], caller.clone());
        let finished = tokio::time::timeout(Duration::from_millis(60), batch).await;
        assert!(finished.is_err());

        tokio::time::sleep(Duration::from_millis(100)).await;
        let after_drop = fetcher.fetch_call_count();
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(after_drop > 0);
        assert_eq!(fetcher.fetch_call_count(), after_drop);
        assert!(!caller.is_cancelled());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let researcher = researcher_with(Vec::new(), &config());
        let results = researcher.research_batch(Vec::<String>::new()).await;
        assert!(results.is_empty());
    }
}
