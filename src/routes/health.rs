// src/routes/health.rs
//! Health check endpoint.
//!
//! Exports a `/health` subrouter to the gateway (`mod.rs`). The response
//! reports how much reference data was loaded at startup, which is enough
//! for an orchestrator to tell a healthy instance from one serving an empty
//! catalog. It never calls the model server.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    crop_profiles: usize,
    market_prices: usize,
}

/// Handle `GET /health`.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        crop_profiles: state.catalog.profiles.len(),
        market_prices: state.catalog.prices.len(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
