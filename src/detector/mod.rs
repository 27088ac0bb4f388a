//! Leaf disease classification.
//!
//! Wraps the external model: preprocess the upload, score it, resolve the
//! class label, and attach remedy text from the static remedy table.
//! Failures are returned as a typed [`ClassifyError`] rather than folded into
//! the prediction's content fields; [`DiseasePrediction::failed`] builds the
//! sentinel a view can render in their place.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::localization::{localize, LocalizedText};
use crate::models::{HistoryRecord, Language};

pub mod labels;
pub mod model;
pub mod preprocess;
pub mod remedies;

pub use model::{ModelClient, ModelError, TfServingClient};
pub use preprocess::{ImageTensor, INPUT_SIZE};
pub use remedies::{RemedyEntry, RemedyTable};

// ---

pub const NO_REMEDY: &str = "No remedy found in database.";
pub const NO_PRECAUTIONS: &str = "No precautions available.";
pub const UNKNOWN_CROP: &str = "Unknown";
pub const ERROR_DISEASE: &str = "Error";

/// Why a classification produced no prediction.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Error processing image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),

    #[error("Image preprocessing task failed: {0}")]
    Preprocess(#[from] tokio::task::JoinError),
}

impl ClassifyError {
    /// Stable identifier for API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ImageDecode(_) => "image_decode",
            Self::Model(_) => "model",
            Self::InvalidOutput(_) => "invalid_output",
            Self::Preprocess(_) => "preprocess",
        }
    }
}

/// Result of one classification call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseasePrediction {
    // ---
    /// `None` only for the failure sentinel.
    pub class_index: Option<usize>,
    /// Canonical `<Crop>___<Condition>` label.
    pub disease: String,
    pub crop: String,
    /// Probability of the predicted class, in `[0, 1]`.
    pub confidence: f32,
    pub remedy: LocalizedText,
    pub precautions: LocalizedText,
    /// False when the remedy table has no entry agreeing with the label.
    pub remedy_found: bool,
    /// Set only on the failure sentinel.
    pub error: Option<String>,
}

impl DiseasePrediction {
    /// Sentinel shown in place of a prediction when classification failed.
    pub fn failed(err: &ClassifyError) -> Self {
        // ---
        Self {
            class_index: None,
            disease: ERROR_DISEASE.to_string(),
            crop: UNKNOWN_CROP.to_string(),
            confidence: 0.0,
            remedy: LocalizedText::default(),
            precautions: LocalizedText::default(),
            remedy_found: false,
            error: Some(err.to_string()),
        }
    }

    pub fn display_label(&self) -> String {
        labels::display_label(&self.disease)
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Remedy in `lang`, falling back to English independently of precautions.
    pub fn remedy_text(&self, lang: Language) -> &str {
        match (self.remedy_found, self.is_failure()) {
            (true, _) => localize(&self.remedy, lang),
            (false, false) => NO_REMEDY,
            (false, true) => "",
        }
    }

    /// Precautions in `lang`, falling back to English independently of remedy.
    pub fn precautions_text(&self, lang: Language) -> &str {
        match (self.remedy_found, self.is_failure()) {
            (true, _) => localize(&self.precautions, lang),
            (false, false) => NO_PRECAUTIONS,
            (false, true) => "",
        }
    }

    /// Flatten into a history row with the raw text for every language.
    pub fn to_history_record(&self, farmer: &str) -> HistoryRecord {
        // ---
        let (r, p) = (&self.remedy, &self.precautions);
        HistoryRecord {
            farmer: farmer.to_string(),
            crop: self.crop.clone(),
            disease: self.display_label(),
            remedy_en: r.en.clone(),
            precautions_en: p.en.clone(),
            remedy_hi: r.hi.clone(),
            precautions_hi: p.hi.clone(),
            remedy_ta: r.ta.clone(),
            precautions_ta: p.ta.clone(),
            remedy_te: r.te.clone(),
            precautions_te: p.te.clone(),
            remedy_ml: r.ml.clone(),
            precautions_ml: p.ml.clone(),
        }
    }
}

/// Classifier plus remedy lookup. Cheap to share behind an `Arc`.
pub struct DiseaseDetector {
    model: Arc<dyn ModelClient>,
    remedies: RemedyTable,
}

impl DiseaseDetector {
    pub fn new(model: Arc<dyn ModelClient>, remedies: RemedyTable) -> Self {
        Self { model, remedies }
    }

    /// Classify an uploaded leaf image.
    ///
    /// Decoding and resizing run on the blocking pool; only the model call
    /// is awaited on the runtime.
    pub async fn classify(&self, image_bytes: Vec<u8>) -> Result<DiseasePrediction, ClassifyError> {
        // ---
        let tensor = tokio::task::spawn_blocking(move || {
            preprocess::image_to_tensor(&image_bytes, INPUT_SIZE)
        })
        .await??;
        let scores = self.model.predict(&tensor).await?;
        let (class_index, confidence) = top_class(&scores)?;
        let label = labels::label_for(class_index);

        tracing::info!(
            "Predicted class {} ({}) with confidence {:.4}",
            class_index,
            label,
            confidence
        );

        let prediction = match self.remedies.lookup(class_index, &label) {
            Some(entry) => DiseasePrediction {
                class_index: Some(class_index),
                disease: label.into_owned(),
                crop: entry.crop.clone(),
                confidence,
                remedy: entry.remedy.clone(),
                precautions: entry.precautions.clone(),
                remedy_found: true,
                error: None,
            },
            None => DiseasePrediction {
                class_index: Some(class_index),
                disease: label.into_owned(),
                crop: UNKNOWN_CROP.to_string(),
                confidence,
                remedy: LocalizedText::default(),
                precautions: LocalizedText::default(),
                remedy_found: false,
                error: None,
            },
        };
        Ok(prediction)
    }
}

/// Arg-max class and its probability.
///
/// Scores past [`labels::CLASS_COUNT`] are ignored. Scores that are not
/// already a probability distribution are passed through softmax first.
fn top_class(scores: &[f32]) -> Result<(usize, f32), ClassifyError> {
    // ---
    let scores = &scores[..scores.len().min(labels::CLASS_COUNT)];
    if scores.is_empty() {
        return Err(ClassifyError::InvalidOutput("empty score vector".to_string()));
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(ClassifyError::InvalidOutput("non-finite score".to_string()));
    }

    let probs = if is_distribution(scores) {
        scores.to_vec()
    } else {
        softmax(scores)
    };

    // First maximum wins
    let (index, confidence) = probs
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::MIN), |best, (i, p)| if p > best.1 { (i, p) } else { best });

    Ok((index, confidence.clamp(0.0, 1.0)))
}

fn is_distribution(scores: &[f32]) -> bool {
    let sum: f32 = scores.iter().sum();
    scores.iter().all(|s| (0.0..=1.0).contains(s)) && (sum - 1.0).abs() <= 1e-3
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    // ---
    let max = scores.iter().copied().fold(f32::MIN, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
