//! Configuration types for research and batching.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The region whose evidence is preferred during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region name as it appears in text and search queries (e.g. "Singapore")
    pub name: String,

    /// Short code used in slugs and as a marker (e.g. "sg")
    pub code: String,
}

impl Default for Region {
    fn default() -> Self {
        Self::singapore()
    }
}

impl Region {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    pub fn singapore() -> Self {
        Self::new("Singapore", "sg")
    }

    /// Lower-cased marker terms.
    pub fn markers(&self) -> [String; 2] {
        [self.name.to_lowercase(), self.code.to_lowercase()]
    }

    /// Case-insensitive substring test for any marker term.
    pub fn is_mentioned_in(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.markers()
            .iter()
            .any(|marker| !marker.is_empty() && haystack.contains(marker.as_str()))
    }

    /// Lower-cased name for slugs and queries.
    pub fn slug_name(&self) -> String {
        self.name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
    }
}

/// A bounded, randomized delay range in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Pacing {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn is_none(&self) -> bool {
        self.max_ms == 0
    }

    /// Draw a delay uniformly from the range.
    pub fn sample(&self) -> Duration {
        if self.is_none() {
            return Duration::ZERO;
        }
        let (low, high) = (self.min_ms.min(self.max_ms), self.min_ms.max(self.max_ms));
        Duration::from_millis(rand::thread_rng().gen_range(low..=high))
    }

    /// Sleep for a sampled delay.
    pub async fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Whether the orchestrator keeps running adapters once it has signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopPolicy {
    /// Run every adapter and collect everything (canonical).
    #[default]
    Exhaustive,

    /// Stop as soon as any regional observation has been collected.
    FirstRegional,
}

/// How the orchestrator schedules adapters for one company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterScheduling {
    /// One adapter at a time, paced (canonical).
    #[default]
    Sequential,

    /// All adapters at once, results merged in adapter order.
    Concurrent,
}

/// Configuration for the research pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Region whose evidence is preferred.
    pub region: Region,

    /// Per-fetch timeout in seconds.
    ///
    /// Default: 10.
    pub fetch_timeout_secs: u64,

    /// Delay between adapter invocations for one company.
    ///
    /// Default: 1-2 seconds.
    pub adapter_pacing: Pacing,

    /// Early-exit policy for the orchestrator.
    #[serde(default)]
    pub stop_policy: StopPolicy,

    /// Adapter scheduling within one company.
    #[serde(default)]
    pub scheduling: AdapterScheduling,

    /// Companies researched in parallel.
    ///
    /// Default: 5.
    pub concurrency: usize,

    /// Companies accepted per batch; extra entries are dropped.
    ///
    /// Default: 50.
    pub max_batch_size: usize,

    /// Delay applied after each completed company.
    ///
    /// Default: 0.5-1.5 seconds.
    pub completion_pacing: Pacing,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            region: Region::singapore(),
            fetch_timeout_secs: 10,
            adapter_pacing: Pacing::new(1000, 2000),
            stop_policy: StopPolicy::Exhaustive,
            scheduling: AdapterScheduling::Sequential,
            concurrency: 5,
            max_batch_size: 50,
            completion_pacing: Pacing::new(500, 1500),
        }
    }
}

impl ResearchConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Set the target region.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Set the per-fetch timeout.
    pub fn with_fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs.max(1);
        self
    }

    /// Set the batch worker count.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the batch size cap.
    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = max;
        self
    }

    pub fn with_stop_policy(mut self, policy: StopPolicy) -> Self {
        self.stop_policy = policy;
        self
    }

    pub fn with_scheduling(mut self, scheduling: AdapterScheduling) -> Self {
        self.scheduling = scheduling;
        self
    }

    /// Disable both pacing delays (tests, offline runs).
    pub fn without_pacing(mut self) -> Self {
        self.adapter_pacing = Pacing::none();
        self.completion_pacing = Pacing::none();
        self
    }
}
