//! Fitted standard scaler: `(x - mean) / scale` per column.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{FeatureScaler, ScorerError};

/// Column-wise affine scaling exported from the training run.
///
/// A column with a zero scale (constant in training) is only centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ScorerError> {
        let scaler = Self { mean, scale };
        scaler.check()?;
        Ok(scaler)
    }

    /// Zero mean, unit scale: `transform` returns its input.
    pub fn identity(width: usize) -> Self {
        Self {
            mean: vec![0.0; width],
            scale: vec![1.0; width],
        }
    }

    /// Parse `{"mean": [...], "scale": [...]}`.
    pub fn from_json_str(contents: &str) -> Result<Self, ScorerError> {
        let scaler: Self =
            serde_json::from_str(contents).map_err(|e| ScorerError::Load(e.to_string()))?;
        scaler.check()?;
        Ok(scaler)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ScorerError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ScorerError::Load(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&contents)
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    fn check(&self) -> Result<(), ScorerError> {
        if self.mean.len() != self.scale.len() {
            return Err(ScorerError::Load(format!(
                "mean has {} columns but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(ScorerError::Load("scaler parameters must be finite".to_string()));
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ScorerError> {
        if row.len() != self.width() {
            return Err(ScorerError::WidthMismatch {
                stage: "scaler",
                expected: self.width(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}
