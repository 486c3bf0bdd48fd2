//! Feature vector types: FeatureName, FeatureVector, FeatureRow

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Names of the 14 engineered features understood by the scoring models.
///
/// The serialized form matches the names in the model bundle's
/// `feature_names.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    Current,
    Temperature,
    CurrentRollMean,
    CurrentRollStd,
    CurrentRollMin,
    CurrentRollMax,
    TempRollMean,
    TempRollStd,
    CurrentRate,
    TempRate,
    #[serde(rename = "current_lag1")]
    CurrentLag1,
    #[serde(rename = "temp_lag1")]
    TempLag1,
    CurrentTempRatio,
    CurrentTempProduct,
}

impl FeatureName {
    /// Every feature, in the order the models were originally trained with.
    pub const ALL: [FeatureName; 14] = [
        FeatureName::Current,
        FeatureName::Temperature,
        FeatureName::CurrentRollMean,
        FeatureName::CurrentRollStd,
        FeatureName::CurrentRollMin,
        FeatureName::CurrentRollMax,
        FeatureName::TempRollMean,
        FeatureName::TempRollStd,
        FeatureName::CurrentRate,
        FeatureName::TempRate,
        FeatureName::CurrentLag1,
        FeatureName::TempLag1,
        FeatureName::CurrentTempRatio,
        FeatureName::CurrentTempProduct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::Current => "current",
            FeatureName::Temperature => "temperature",
            FeatureName::CurrentRollMean => "current_roll_mean",
            FeatureName::CurrentRollStd => "current_roll_std",
            FeatureName::CurrentRollMin => "current_roll_min",
            FeatureName::CurrentRollMax => "current_roll_max",
            FeatureName::TempRollMean => "temp_roll_mean",
            FeatureName::TempRollStd => "temp_roll_std",
            FeatureName::CurrentRate => "current_rate",
            FeatureName::TempRate => "temp_rate",
            FeatureName::CurrentLag1 => "current_lag1",
            FeatureName::TempLag1 => "temp_lag1",
            FeatureName::CurrentTempRatio => "current_temp_ratio",
            FeatureName::CurrentTempProduct => "current_temp_product",
        }
    }
}

impl std::fmt::Display for FeatureName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown feature name '{s}'"))
    }
}

/// A complete set of engineered features for one sample.
///
/// Only constructed when every field is defined and finite; rows with
/// missing rate, lag or window data never become a `FeatureVector`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub current: f64,
    pub temperature: f64,
    pub current_roll_mean: f64,
    pub current_roll_std: f64,
    pub current_roll_min: f64,
    pub current_roll_max: f64,
    pub temp_roll_mean: f64,
    pub temp_roll_std: f64,
    pub current_rate: f64,
    pub temp_rate: f64,
    pub current_lag1: f64,
    pub temp_lag1: f64,
    pub current_temp_ratio: f64,
    pub current_temp_product: f64,
}

impl FeatureVector {
    pub fn get(&self, name: FeatureName) -> f64 {
        match name {
            FeatureName::Current => self.current,
            FeatureName::Temperature => self.temperature,
            FeatureName::CurrentRollMean => self.current_roll_mean,
            FeatureName::CurrentRollStd => self.current_roll_std,
            FeatureName::CurrentRollMin => self.current_roll_min,
            FeatureName::CurrentRollMax => self.current_roll_max,
            FeatureName::TempRollMean => self.temp_roll_mean,
            FeatureName::TempRollStd => self.temp_roll_std,
            FeatureName::CurrentRate => self.current_rate,
            FeatureName::TempRate => self.temp_rate,
            FeatureName::CurrentLag1 => self.current_lag1,
            FeatureName::TempLag1 => self.temp_lag1,
            FeatureName::CurrentTempRatio => self.current_temp_ratio,
            FeatureName::CurrentTempProduct => self.current_temp_product,
        }
    }
}

/// One row of the raw (unscaled) feature matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Timestamp of the originating sample
    pub timestamp: i64,
    /// Feature values in manifest order
    pub values: Vec<f64>,
    /// Raw current of the originating sample (severity thresholds)
    pub current: f64,
    /// Raw temperature of the originating sample (severity thresholds)
    pub temperature: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip_through_from_str() {
        for name in FeatureName::ALL {
            assert_eq!(name.as_str().parse::<FeatureName>(), Ok(name));
        }
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for name in FeatureName::ALL {
            let json = serde_json::to_string(&name).expect("serialize");
            assert_eq!(json, format!("\"{}\"", name.as_str()));
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert!("voltage".parse::<FeatureName>().is_err());
    }
}
