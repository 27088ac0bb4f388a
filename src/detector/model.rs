//! Client for the pre-trained leaf disease model.
//!
//! The model itself is an external artifact served over the TensorFlow
//! Serving REST protocol. [`ModelClient`] is the seam the detector calls
//! through, so tests can substitute a fixed score vector.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::preprocess::ImageTensor;

// ---

/// Inference failure.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected model response: {0}")]
    Response(String),
}

/// Anything that can score a preprocessed leaf image.
///
/// Implementations are shared across request tasks and must support
/// concurrent calls.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Raw per-class scores for the single image in `input`.
    async fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>, ModelError>;
}

/// TensorFlow Serving `:predict` endpoint client.
#[derive(Debug, Clone)]
pub struct TfServingClient {
    url: String,
    http_client: Client,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    /// Already carries the batch dimension
    instances: &'a ImageTensor,
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<Vec<f32>>,
}

impl TfServingClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ModelError> {
        // ---
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            http_client,
        })
    }
}

#[async_trait]
impl ModelClient for TfServingClient {
    async fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>, ModelError> {
        // ---
        tracing::debug!("POST {} shape={:?}", self.url, input.shape());

        let response = self
            .http_client
            .post(&self.url)
            .json(&PredictRequest { instances: input })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ModelError::Status { status, body });
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Response(e.to_string()))?;

        body.predictions
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Response("empty predictions array".to_string()))
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::detector::preprocess::{encode_png, image_to_tensor};

    #[test]
    fn test_request_body_matches_serving_format() {
        // ---
        let tensor = image_to_tensor(&encode_png(1, 1, [255, 255, 255]), 1).unwrap();
        let body = serde_json::to_value(PredictRequest { instances: &tensor }).unwrap();
        assert_eq!(body, serde_json::json!({ "instances": [[[[1.0, 1.0, 1.0]]]] }));
    }

    /// Serves canned `:predict` responses on an ephemeral local port.
    async fn serving_stub() -> String {
        // ---
        use axum::{http::StatusCode, routing::post, Json, Router};

        let app = Router::new()
            .route(
                "/ok",
                post(|| async { Json(serde_json::json!({ "predictions": [[0.25, 0.75]] })) }),
            )
            .route(
                "/empty",
                post(|| async { Json(serde_json::json!({ "predictions": [] })) }),
            )
            .route(
                "/down",
                post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model not loaded") }),
            )
            .route(
                "/garbled",
                post(|| async { "not json at all" }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn tensor() -> ImageTensor {
        image_to_tensor(&encode_png(2, 2, [10, 200, 30]), 2).unwrap()
    }

    fn client(base: &str, path: &str) -> TfServingClient {
        TfServingClient::new(format!("{}{}", base, path), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_predict_returns_first_score_vector() {
        // ---
        let base = serving_stub().await;
        let scores = client(&base, "/ok").predict(&tensor()).await.unwrap();
        assert_eq!(scores, vec![0.25, 0.75]);
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_code_and_body() {
        // ---
        let base = serving_stub().await;
        match client(&base, "/down").predict(&tensor()).await.unwrap_err() {
            ModelError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "model not loaded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_predictions_are_a_response_error() {
        // ---
        let base = serving_stub().await;
        let err = client(&base, "/empty").predict(&tensor()).await.unwrap_err();
        assert!(matches!(err, ModelError::Response(ref m) if m.contains("empty predictions")));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_a_response_error() {
        // ---
        let base = serving_stub().await;
        let err = client(&base, "/garbled").predict(&tensor()).await.unwrap_err();
        assert!(matches!(err, ModelError::Response(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_request_error() {
        // ---
        // Bind then drop to get a port nothing is listening on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr), "/ok")
            .predict(&tensor())
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Request(_)));
    }

    #[test]
    fn test_response_takes_first_prediction() {
        // ---
        let body: PredictResponse =
            serde_json::from_str(r#"{"predictions": [[0.1, 0.9]]}"#).unwrap();
        assert_eq!(body.predictions[0], vec![0.1, 0.9]);
    }
}
