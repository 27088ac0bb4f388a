//! Error types for data loading, history persistence, and the HTTP surface.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

// ---

/// Failure to load one of the static reference tables. Fatal at startup.
#[derive(Error, Debug)]
pub enum DataError {
    /// File could not be opened or read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Malformed JSON
    #[error("Failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Header row lacks required columns
    #[error("{path} is missing required columns: {}", columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    /// A cell could not be converted to its column type
    #[error("{path} row {row}: invalid {column} value '{value}': {reason}")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    /// The same crop appears twice in the price table
    #[error("{path}: duplicate price for crop '{crop}'")]
    DuplicatePrice { path: PathBuf, crop: String },
}

/// Failure to append to or read the disease history log.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("History log CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Unknown state: {0}")]
    UnknownState(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::UnknownState(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_STATE"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code,
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Task join error: {}", e))
    }
}

impl From<HistoryError> for ApiError {
    fn from(e: HistoryError) -> Self {
        ApiError::Internal(e.to_string())
    }
}
