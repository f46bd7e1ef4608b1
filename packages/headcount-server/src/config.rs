use anyhow::{Context, Result};
use dotenvy::dotenv;
use headcount::ResearchConfig;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub concurrency: usize,
    pub max_batch_size: usize,
    pub fetch_timeout_secs: u64,
    /// Shared outbound request budget; unlimited when unset
    pub requests_per_second: Option<u32>,
    /// Skip the randomized pauses between sources and completions
    pub disable_pacing: bool,
}

impl Default for Config {
    fn default() -> Self {
        let research = ResearchConfig::default();
        Self {
            port: 5000,
            concurrency: research.concurrency,
            max_batch_size: research.max_batch_size,
            fetch_timeout_secs: research.fetch_timeout_secs,
            requests_per_second: None,
            disable_pacing: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            concurrency: parse_or(&lookup, "HEADCOUNT_CONCURRENCY", defaults.concurrency)?,
            max_batch_size: parse_or(&lookup, "HEADCOUNT_MAX_BATCH", defaults.max_batch_size)?,
            fetch_timeout_secs: parse_or(
                &lookup,
                "HEADCOUNT_FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout_secs,
            )?,
            requests_per_second: lookup("HEADCOUNT_REQUESTS_PER_SECOND")
                .map(|v| v.trim().parse::<u32>())
                .transpose()
                .context("HEADCOUNT_REQUESTS_PER_SECOND must be a valid number")?,
            disable_pacing: lookup("HEADCOUNT_DISABLE_PACING")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.disable_pacing),
        })
    }

    /// Research engine settings derived from this configuration.
    pub fn research_config(&self) -> ResearchConfig {
        let config = ResearchConfig::default()
            .with_concurrency(self.concurrency)
            .with_max_batch_size(self.max_batch_size)
            .with_fetch_timeout_secs(self.fetch_timeout_secs);

        if self.disable_pacing {
            config.without_pacing()
        } else {
            config
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}
