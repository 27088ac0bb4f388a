//! Static lookup views the UI needs before calling `/api/recommend`: the
//! state list with each state's zone and default language, and the string
//! bundle for a language.

use std::collections::BTreeMap;

use axum::{extract::Path, routing::get, Json, Router};
use serde::Serialize;

use crate::localization::{self, StateInfo, UiStrings, STATES};
use crate::models::{Language, WaterNeed};
use crate::{ApiError, AppState};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/states", get(states))
        .route("/api/i18n/{lang}", get(bundle))
}

#[derive(Serialize)]
struct StatesResponse {
    states: &'static [StateInfo],
}

#[derive(Serialize)]
struct BundleResponse {
    language: Language,
    name: &'static str,
    labels: &'static UiStrings,
    /// Canonical water category to its label in this language
    water_labels: BTreeMap<&'static str, &'static str>,
}

async fn states() -> Json<StatesResponse> {
    Json(StatesResponse { states: &STATES })
}

async fn bundle(Path(lang): Path<String>) -> Result<Json<BundleResponse>, ApiError> {
    // ---
    let language: Language = lang.parse().map_err(ApiError::BadRequest)?;
    let water_labels = WaterNeed::ALL
        .into_iter()
        .map(|w| (w.as_str(), localization::water_label(w, language)))
        .collect();

    Ok(Json(BundleResponse {
        language,
        name: language.native_name(),
        labels: localization::ui_strings(language),
        water_labels,
    }))
}
