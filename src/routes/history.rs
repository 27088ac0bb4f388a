use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::models::HistoryRecord;
use crate::{ApiError, AppState};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/history", get(handler))
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    count: usize,
    records: Vec<HistoryRecord>,
}

/// Full read-back of the history log, oldest first.
async fn handler(State(state): State<AppState>) -> Result<Json<HistoryResponse>, ApiError> {
    // ---
    let history = state.history.clone();
    let records = tokio::task::spawn_blocking(move || history.read_all()).await??;
    tracing::debug!("GET /api/history - {} records", records.len());

    Ok(Json(HistoryResponse {
        count: records.len(),
        records,
    }))
}
