// Application setup and router configuration

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use headcount::{BatchResearcher, Fetcher, FetcherExt, HttpFetcher};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::server::routes::{health_handler, search_handler};

#[derive(Clone)]
pub struct AppState {
    pub researcher: Arc<BatchResearcher>,
}

/// Build the batch researcher over live HTTP transport.
pub fn build_researcher(config: &Config) -> Result<BatchResearcher> {
    let http = HttpFetcher::new().context("Failed to create HTTP client")?;

    let fetcher: Arc<dyn Fetcher> = match config.requests_per_second {
        Some(rps) => {
            tracing::info!(requests_per_second = rps, "Outbound rate limit enabled");
            Arc::new(http.rate_limited(rps))
        }
        None => Arc::new(http),
    };

    Ok(BatchResearcher::from_config(fetcher, &config.research_config()))
}

pub fn build_app(researcher: BatchResearcher) -> Router {
    let state = AppState {
        researcher: Arc::new(researcher),
    };

    Router::new()
        .route("/search", post(search_handler))
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
