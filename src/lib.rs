//! `agrisaarthi`: crop recommendation and leaf disease detection service.
//!
//! The library is the gateway for every module (EMBP): `main.rs` and the
//! integration tests only see what is re-exported here.
//!
//! - [`data`] and [`schema`] load the static crop and price tables
//! - [`recommender`] ranks crops for a set of growing conditions
//! - [`detector`] wraps the external leaf disease model and remedy table
//! - [`history`] appends predictions to a flat CSV log
//! - [`localization`] holds the state, language, and UI string tables
//! - [`routes`] mounts the HTTP views
use std::sync::Arc;

pub mod config;
pub mod data;
pub mod detector;
pub mod error;
pub mod history;
pub mod localization;
pub mod models;
pub mod recommender;
pub mod routes;
pub mod schema;

pub use config::Config;
pub use data::CropCatalog;
pub use detector::{DiseaseDetector, DiseasePrediction, ModelClient, RemedyTable};
pub use error::{ApiError, DataError, HistoryError};
pub use history::HistoryLog;
pub use models::{ClimateZone, HistoryRecord, Language, Season, WaterNeed};

// ---

/// Shared, read-only application state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CropCatalog>,
    pub detector: Arc<DiseaseDetector>,
    pub history: Arc<HistoryLog>,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}
