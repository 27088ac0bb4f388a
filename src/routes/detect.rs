use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::detector::DiseasePrediction;
use crate::models::Language;
use crate::{ApiError, AppState};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/detect", post(handler))
}

#[derive(Debug, Default)]
struct DetectForm {
    farmer: Option<String>,
    lang: Option<String>,
    image: Option<Vec<u8>>,
}

#[derive(Debug, Serialize)]
struct DetectResponse {
    farmer: String,
    language: Language,
    prediction: PredictionView,
    /// Present when classification failed; `prediction` is then the sentinel
    failure: Option<FailureView>,
    history_saved: bool,
    warning: Option<String>,
}

#[derive(Debug, Serialize)]
struct PredictionView {
    class_index: Option<usize>,
    disease: String,
    disease_label: String,
    crop: String,
    confidence: f32,
    confidence_percent: String,
    remedy: String,
    precautions: String,
    remedy_found: bool,
}

#[derive(Debug, Serialize)]
struct FailureView {
    kind: &'static str,
    message: String,
}

impl PredictionView {
    fn new(p: &DiseasePrediction, lang: Language) -> Self {
        // ---
        Self {
            class_index: p.class_index,
            disease: p.disease.clone(),
            disease_label: p.display_label(),
            crop: p.crop.clone(),
            confidence: p.confidence,
            confidence_percent: format!("{:.2}%", p.confidence * 100.0),
            remedy: p.remedy_text(lang).to_string(),
            precautions: p.precautions_text(lang).to_string(),
            remedy_found: p.remedy_found,
        }
    }
}

/// Keep the size cap distinguishable from a malformed body.
fn multipart_error(e: MultipartError) -> ApiError {
    // ---
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("Upload exceeds the size limit: {}", e.body_text()))
    } else {
        ApiError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
    }
}

async fn read_form(mut multipart: Multipart) -> Result<DetectForm, ApiError> {
    // ---
    let mut form = DetectForm::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "farmer" => form.farmer = Some(field.text().await.map_err(multipart_error)?),
            "lang" => form.lang = Some(field.text().await.map_err(multipart_error)?),
            "image" => form.image = Some(field.bytes().await.map_err(multipart_error)?.to_vec()),
            other => warn!("POST /api/detect - ignoring unknown field '{}'", other),
        }
    }
    Ok(form)
}

async fn handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectResponse>, ApiError> {
    // ---
    let multipart = multipart.map_err(|r| ApiError::BadRequest(r.body_text()))?;
    let form = read_form(multipart).await?;

    let farmer = form
        .farmer
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Please enter your name to proceed.".to_string()))?
        .to_string();

    let language = match super::non_blank(form.lang.as_deref()) {
        Some(code) => code.parse::<Language>().map_err(ApiError::BadRequest)?,
        None => Language::En,
    };

    let image = form
        .image
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| ApiError::BadRequest("A leaf image is required".to_string()))?;

    info!(
        "POST /api/detect - farmer='{}' lang={} image={} bytes",
        farmer,
        language,
        image.len()
    );

    let (prediction, failure) = match state.detector.classify(image).await {
        Ok(p) => (p, None),
        Err(e) => {
            warn!("Classification failed ({}): {}", e.kind(), e);
            let failure = FailureView {
                kind: e.kind(),
                message: e.to_string(),
            };
            (DiseasePrediction::failed(&e), Some(failure))
        }
    };

    let (history_saved, warning) = if failure.is_some() {
        (false, None)
    } else {
        let history = state.history.clone();
        let record = prediction.to_history_record(&farmer);
        let saved = tokio::task::spawn_blocking(move || history.append(&record))
            .await
            .map_err(|e| e.to_string())
            .and_then(|r| r.map_err(|e| e.to_string()));

        match saved {
            Ok(()) => (true, None),
            Err(e) => {
                warn!("Failed to save history for '{}': {}", farmer, e);
                (false, Some(format!("Prediction was not saved to history: {}", e)))
            }
        }
    };

    Ok(Json(DetectResponse {
        prediction: PredictionView::new(&prediction, language),
        farmer,
        language,
        failure,
        history_saved,
        warning,
    }))
}
