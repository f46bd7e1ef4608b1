//! Per-company orchestration: run every source adapter, collect observations.

use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{ResearchError, Result};
use crate::sources::{default_adapters, SourceSettings};
use crate::traits::{adapter::SourceAdapter, fetcher::Fetcher};
use crate::types::config::{AdapterScheduling, Pacing, ResearchConfig, StopPolicy};
use crate::types::observation::{CompanyQuery, Observation};

/// Runs a fixed, ordered set of adapters for one company.
///
/// Adapter failures are isolated: a panicking adapter is logged and
/// skipped, and the remaining adapters still run.
pub struct Orchestrator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    fetcher: Arc<dyn Fetcher>,
    pacing: Pacing,
    stop_policy: StopPolicy,
    scheduling: AdapterScheduling,
}

impl Orchestrator {
    /// Orchestrator over the canonical adapter set.
    pub fn new(fetcher: Arc<dyn Fetcher>, config: &ResearchConfig) -> Self {
        let adapters = default_adapters(&SourceSettings::from_config(config));
        Self::with_adapters(fetcher, adapters, config)
    }

    /// Orchestrator over a custom adapter list (order is preserved).
    pub fn with_adapters(
        fetcher: Arc<dyn Fetcher>,
        adapters: Vec<Arc<dyn SourceAdapter>>,
        config: &ResearchConfig,
    ) -> Self {
        Self {
            adapters,
            fetcher,
            pacing: config.adapter_pacing,
            stop_policy: config.stop_policy,
            scheduling: config.scheduling,
        }
    }

    pub fn adapters(&self) -> &[Arc<dyn SourceAdapter>] {
        &self.adapters
    }

    /// Collect every observation the adapters produce for `company`.
    pub async fn research(&self, company: &CompanyQuery) -> Vec<Observation> {
        info!(
            company = %company,
            adapters = self.adapters.len(),
            fetcher = self.fetcher.name(),
            "Researching company"
        );

        let observations = match self.scheduling {
            AdapterScheduling::Sequential => self.research_sequential(company).await,
            AdapterScheduling::Concurrent => self.research_concurrent(company).await,
        };

        info!(
            company = %company,
            observations = observations.len(),
            "Research complete"
        );
        observations
    }

    /// Research with cancellation support.
    ///
    /// Dropping the pipeline on cancellation drops any in-flight fetch.
    pub async fn research_with_cancel(
        &self,
        company: &CompanyQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<Observation>> {
        if cancel.is_cancelled() {
            return Err(ResearchError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ResearchError::Cancelled),
            observations = self.research(company) => Ok(observations),
        }
    }

    async fn research_sequential(&self, company: &CompanyQuery) -> Vec<Observation> {
        let mut observations = Vec::new();

        for (i, adapter) in self.adapters.iter().enumerate() {
            if i > 0 {
                self.pacing.pause().await;
            }

            if let Some(observation) = self.run_adapter(adapter.as_ref(), company).await {
                observations.push(observation);
            }

            if self.stop_policy == StopPolicy::FirstRegional
                && observations.iter().any(|o| o.is_regional)
            {
                debug!(company = %company, "Regional signal found, skipping remaining adapters");
                break;
            }
        }

        observations
    }

    async fn research_concurrent(&self, company: &CompanyQuery) -> Vec<Observation> {
        join_all(
            self.adapters
                .iter()
                .map(|adapter| self.run_adapter(adapter.as_ref(), company)),
        )
        .await
        .into_iter()
        .flatten()
        .collect()
    }

    async fn run_adapter(
        &self,
        adapter: &dyn SourceAdapter,
        company: &CompanyQuery,
    ) -> Option<Observation> {
        let kind = adapter.kind();
        match AssertUnwindSafe(adapter.find(company, self.fetcher.as_ref()))
            .catch_unwind()
            .await
        {
            Ok(found) => {
                if found.is_none() {
                    debug!(company = %company, source = %kind, "No signal from source");
                }
                found
            }
            Err(panic) => {
                warn!(
                    company = %company,
                    source = %kind,
                    error = %panic_message(&*panic),
                    "Source adapter panicked"
                );
                None
            }
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedAdapter, MockFetcher, PanickingAdapter};
    use crate::types::observation::SourceKind;

    fn config() -> ResearchConfig {
        ResearchConfig::default().without_pacing()
    }

    fn company() -> CompanyQuery {
        CompanyQuery::parse("Acme Pte Ltd").unwrap()
    }

    fn obs(count: u64, source: SourceKind, regional: bool) -> Observation {
        Observation::new(count, source, format!("https://{}.example", count)).regional(regional)
    }

    #[tokio::test]
    async fn test_collects_all_in_adapter_order() {
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(FixedAdapter::found(obs(300, SourceKind::LinkedIn, true))),
            Arc::new(FixedAdapter::empty(SourceKind::WebSearch)),
            Arc::new(FixedAdapter::found(obs(100, SourceKind::JobBoard, true))),
        ];
        let orchestrator =
            Orchestrator::with_adapters(Arc::new(MockFetcher::new()), adapters, &config());

        let observations = orchestrator.research(&company()).await;

        let counts: Vec<_> = observations.iter().map(|o| o.count).collect();
        assert_eq!(counts, vec![300, 100]);
    }

    #[tokio::test]
    async fn test_panicking_adapter_is_isolated() {
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(PanickingAdapter::new(SourceKind::LinkedIn)),
            Arc::new(FixedAdapter::found(obs(42, SourceKind::ReviewSite, false))),
        ];
        let orchestrator =
            Orchestrator::with_adapters(Arc::new(MockFetcher::new()), adapters, &config());

        let observations = orchestrator.research(&company()).await;

        assert_eq!(observations, vec![obs(42, SourceKind::ReviewSite, false)]);
    }

    #[tokio::test]
    async fn test_first_regional_short_circuits() {
        let first = FixedAdapter::found(obs(10, SourceKind::WebSearch, false));
        let second = FixedAdapter::found(obs(20, SourceKind::JobBoard, true));
        let third = FixedAdapter::found(obs(30, SourceKind::CompanySite, true));
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(first.clone()),
            Arc::new(second.clone()),
            Arc::new(third.clone()),
        ];
        let orchestrator = Orchestrator::with_adapters(
            Arc::new(MockFetcher::new()),
            adapters,
            &config().with_stop_policy(StopPolicy::FirstRegional),
        );

        let observations = orchestrator.research(&company()).await;

        assert_eq!(observations.len(), 2);
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 1);
        assert_eq!(third.call_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_scheduling_keeps_adapter_order() {
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(FixedAdapter::found(obs(7, SourceKind::LinkedIn, false))),
            Arc::new(PanickingAdapter::new(SourceKind::WebSearch)),
            Arc::new(FixedAdapter::found(obs(5, SourceKind::JobBoard, true))),
        ];
        let orchestrator = Orchestrator::with_adapters(
            Arc::new(MockFetcher::new()),
            adapters,
            &config().with_scheduling(AdapterScheduling::Concurrent),
        );

        let counts: Vec<_> = orchestrator
            .research(&company())
            .await
            .iter()
            .map(|o| o.count)
            .collect();

        assert_eq!(counts, vec![7, 5]);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let orchestrator = Orchestrator::new(Arc::new(MockFetcher::new()), &config());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = orchestrator.research_with_cancel(&company(), &cancel).await;

        assert!(matches!(outcome, Err(ResearchError::Cancelled)));
    }

    #[tokio::test]
    async fn test_fetch_panic_in_one_source_spares_others() {
        let fetcher = MockFetcher::new()
            .with_panic_prefix("https://www.linkedin.com")
            .with_html(
                "https://www.jobstreet.com.sg/en/companies/acme-pte-ltd",
                "<p>Company size: 250 employees</p>",
            );
        let orchestrator = Orchestrator::new(Arc::new(fetcher), &config());

        let observations = orchestrator.research(&company()).await;

        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].source, SourceKind::JobBoard);
        assert_eq!(observations[0].count, 250);
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*boxed), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(&*boxed), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(&*boxed), "unknown panic");
    }
}
