use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::localization::{self, UiStrings};
use crate::models::{ClimateZone, Language, Season, WaterNeed};
use crate::recommender::{self, Conditions};
use crate::{ApiError, AppState};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/recommend", get(handler))
}

/// Query parameters for a crop recommendation.
///
/// `water` accepts the canonical label or any localized label; `lang`
/// defaults to the state's language and `season` to the current month's.
#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    state: String,
    ph: f64,
    water: String,
    lang: Option<String>,
    season: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecommendResponse {
    state: &'static str,
    climate_zone: ClimateZone,
    season: Season,
    language: Language,
    ph: f64,
    water: WaterNeed,
    labels: &'static UiStrings,
    crops: Vec<CropView>,
    /// Same rows as `crops`, reduced to what a bar chart needs
    chart: Vec<ChartPoint>,
    /// Localized "no match" text when `crops` is empty
    message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct CropView {
    crop: String,
    name: String,
    profit_index: f64,
    water: &'static str,
    carbon_footprint: String,
    sowing_months: String,
    fertilizer: String,
}

#[derive(Debug, Serialize)]
struct ChartPoint {
    label: String,
    profit_index: f64,
}

async fn handler(
    query: Result<Query<RecommendQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<RecommendResponse>, ApiError> {
    // ---
    let Query(params) = query.map_err(|r| ApiError::BadRequest(r.body_text()))?;
    info!("GET /api/recommend - {:?}", params);

    let state_info = localization::lookup_state(&params.state)
        .ok_or_else(|| ApiError::UnknownState(params.state.clone()))?;

    if !(0.0..=14.0).contains(&params.ph) {
        return Err(ApiError::BadRequest(format!(
            "Soil pH must be between 0 and 14, got {}",
            params.ph
        )));
    }

    let water = WaterNeed::from_label(&params.water).ok_or_else(|| {
        ApiError::BadRequest(format!("Unknown water availability '{}'", params.water))
    })?;

    let language = match super::non_blank(params.lang.as_deref()) {
        Some(code) => code.parse::<Language>().map_err(ApiError::BadRequest)?,
        None => state_info.default_language,
    };

    let season = match super::non_blank(params.season.as_deref()) {
        Some(s) => s.parse::<Season>().map_err(ApiError::BadRequest)?,
        None => Season::for_month(chrono::Local::now().month()),
    };

    let conditions = Conditions {
        ph: params.ph,
        water,
        zone: state_info.climate_zone,
        season,
    };
    let ranked = recommender::recommend(&state.catalog, &conditions);
    let labels = localization::ui_strings(language);

    let crops: Vec<CropView> = ranked
        .iter()
        .map(|r| {
            let p = &r.profile;
            CropView {
                crop: p.crop.clone(),
                name: p.localized_name(language).to_string(),
                profit_index: r.profit_index,
                water: localization::water_label(p.water_need, language),
                carbon_footprint: p.carbon_footprint.clone(),
                sowing_months: p.sowing_months.clone().unwrap_or_else(|| "N/A".to_string()),
                fertilizer: p.fertilizer.clone().unwrap_or_else(|| "N/A".to_string()),
            }
        })
        .collect();

    let chart = crops
        .iter()
        .map(|c| ChartPoint {
            label: c.name.clone(),
            profit_index: c.profit_index,
        })
        .collect();

    let message = crops.is_empty().then_some(labels.no_match);
    info!(
        "Recommended {} crops for {} ({}, {})",
        crops.len(),
        state_info.state,
        conditions.zone,
        season
    );

    Ok(Json(RecommendResponse {
        state: state_info.state,
        climate_zone: state_info.climate_zone,
        season,
        language,
        ph: params.ph,
        water,
        labels,
        crops,
        chart,
        message,
    }))
}
