//! Feature manifest - the column order the scoring models were trained on.
//!
//! Unlike the thresholds there is no fallback: a manifest must be supplied
//! and must name each of the 14 features exactly once.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::{defaults::FEATURE_COUNT, ConfigError};
use crate::types::{FeatureName, FeatureVector};

/// Ordered list of feature names defining the scaled matrix layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureManifest {
    names: Vec<FeatureName>,
}

impl FeatureManifest {
    /// Build a manifest from raw names, rejecting unknown, duplicate or
    /// missing features.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        if names.len() != FEATURE_COUNT {
            return Err(ConfigError::Manifest(format!(
                "expected {FEATURE_COUNT} feature names, got {}",
                names.len()
            )));
        }

        let mut seen = HashSet::with_capacity(FEATURE_COUNT);
        let mut parsed = Vec::with_capacity(FEATURE_COUNT);
        for raw in names {
            let name: FeatureName = raw.as_ref().parse().map_err(ConfigError::Manifest)?;
            if !seen.insert(name) {
                return Err(ConfigError::Manifest(format!("duplicate feature name '{name}'")));
            }
            parsed.push(name);
        }

        Ok(Self { names: parsed })
    }

    /// Parse a `feature_names.json` document (a JSON array of strings).
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let names: Vec<String> =
            serde_json::from_str(contents).map_err(|e| ConfigError::Json(None, e))?;
        Self::from_names(&names)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_json_str(&contents).map_err(|e| match e {
            ConfigError::Json(None, inner) => ConfigError::Json(Some(path.to_path_buf()), inner),
            other => other,
        })
    }

    /// The training order: `FeatureName::ALL`.
    pub fn canonical() -> Self {
        Self {
            names: FeatureName::ALL.to_vec(),
        }
    }

    pub fn names(&self) -> &[FeatureName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Lay a feature vector out in manifest order.
    pub fn project(&self, vector: &FeatureVector) -> Vec<f64> {
        self.names.iter().map(|&name| vector.get(name)).collect()
    }
}

impl TryFrom<Vec<String>> for FeatureManifest {
    type Error = ConfigError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_names(&names)
    }
}

impl From<FeatureManifest> for Vec<String> {
    fn from(manifest: FeatureManifest) -> Self {
        manifest.names.iter().map(|n| n.as_str().to_string()).collect()
    }
}
