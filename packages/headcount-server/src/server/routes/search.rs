use axum::{extract::Extension, Json};
use headcount::ReconciledResult;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub companies: Vec<String>,
}

/// Research a batch of companies.
///
/// Returns one result per accepted company, in completion order. If the
/// client goes away mid-batch, the dropped handler cancels the remaining
/// research.
pub async fn search_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<Vec<ReconciledResult>> {
    tracing::info!(companies = request.companies.len(), "Search request received");

    if request.companies.is_empty() {
        return Json(Vec::new());
    }

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let results = state
        .researcher
        .research_batch_with_cancel(&request.companies, cancel)
        .await;

    Json(results)
}
