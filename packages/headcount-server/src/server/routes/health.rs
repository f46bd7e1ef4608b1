use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: &'static str,
    max_batch_size: usize,
}

/// Health check endpoint
///
/// The service has no backing store, so it is healthy whenever it answers.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION"),
        max_batch_size: state.researcher.max_batch_size(),
    })
}
