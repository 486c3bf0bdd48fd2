//! Scoring module
//!
//! The two pretrained models are black boxes behind traits:
//!
//! - `FeatureScaler`: raw feature row to scaled row
//! - `Reconstructor`: scaled row to its reconstruction (autoencoder)
//! - `NoveltyDetector`: scaled row to inlier/outlier (density model)
//!
//! `fusion` combines both signals into a per-row anomaly decision.
//! Implementations must be `Send + Sync`; rows are scored in parallel.

pub mod fusion;
pub mod scaler;

pub use fusion::{fuse_scores, reconstruction_error, RowScore};
pub use scaler::StandardScaler;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label produced by the novelty model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoveltyLabel {
    Inlier,
    Outlier,
}

impl NoveltyLabel {
    /// Map the conventional `+1` / `-1` prediction encoding.
    pub fn from_prediction(prediction: i32) -> Self {
        if prediction < 0 {
            NoveltyLabel::Outlier
        } else {
            NoveltyLabel::Inlier
        }
    }
}

#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("Scaler failed: {0}")]
    Scaler(String),

    #[error("Reconstruction failed: {0}")]
    Reconstruction(String),

    #[error("Novelty detection failed: {0}")]
    Novelty(String),

    #[error("{stage} width mismatch: expected {expected}, got {actual}")]
    WidthMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to load scorer parameters: {0}")]
    Load(String),
}

/// Applies the fitted feature scaling to one raw row.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ScorerError>;
}

/// Reconstruction model: returns its approximation of a scaled row.
pub trait Reconstructor: Send + Sync {
    fn reconstruct(&self, scaled: &[f64]) -> Result<Vec<f64>, ScorerError>;
}

/// Novelty model: classifies a scaled row against the nominal training data.
pub trait NoveltyDetector: Send + Sync {
    fn label(&self, scaled: &[f64]) -> Result<NoveltyLabel, ScorerError>;
}
