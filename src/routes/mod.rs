use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;

use crate::AppState;

mod detect;
mod health;
mod history;
mod locale;
mod recommend;

// ---

pub fn router(state: AppState) -> Router {
    // ---
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(recommend::router())
        .merge(detect::router())
        .merge(history::router())
        .merge(locale::router())
        .merge(health::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Treat a missing or blank optional form/query value the same way.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
