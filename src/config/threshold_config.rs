//! Threshold Configuration - Severity tiers, window size and normalizer policy
//!
//! Every value the pipeline needs beyond the feature manifest lives here.
//! Each struct implements `Default` with the values shipped alongside the
//! original model bundle, so a missing key never changes behaviour.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Immutable thresholds for one pipeline deployment.
///
/// Load with `ThresholdConfig::load()` which searches:
/// 1. `$BATTERY_HEALTH_CONFIG` env var
/// 2. `./battery_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Rolling window size (samples)
    #[serde(default = "default_roll_win")]
    pub roll_win: usize,

    /// Reconstruction error above which a row is anomalous
    #[serde(default = "default_autoencoder_threshold")]
    pub autoencoder_threshold: f64,

    /// Charge current severity tiers (A)
    #[serde(default)]
    pub current_thresholds: CurrentThresholds,

    /// Pack temperature severity tiers (°C)
    #[serde(default)]
    pub temperature_thresholds: TemperatureThresholds,

    /// Raw record handling
    #[serde(default)]
    pub normalizer: NormalizerConfig,
}

fn default_roll_win() -> usize { defaults::DEFAULT_ROLL_WIN }
fn default_autoencoder_threshold() -> f64 { defaults::DEFAULT_AUTOENCODER_THRESHOLD }

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            roll_win: default_roll_win(),
            autoencoder_threshold: default_autoencoder_threshold(),
            current_thresholds: CurrentThresholds::default(),
            temperature_thresholds: TemperatureThresholds::default(),
            normalizer: NormalizerConfig::default(),
        }
    }
}

impl ThresholdConfig {
    /// Load configuration using the standard search order:
    /// 1. `$BATTERY_HEALTH_CONFIG` environment variable
    /// 2. `./battery_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), roll_win = config.roll_win, "Loaded threshold config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load threshold config, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(roll_win = config.roll_win, "Loaded threshold config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No threshold config found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific file path.
    ///
    /// Files ending in `.json` are read as a model-bundle `config.json`;
    /// anything else is parsed as TOML.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_bundle_json(&contents)
                .map_err(|e| match e {
                    ConfigError::Json(None, inner) => ConfigError::Json(Some(path.to_path_buf()), inner),
                    other => other,
                })
        } else {
            Self::from_toml_str(&contents).map_err(|e| match e {
                ConfigError::Parse(None, inner) => ConfigError::Parse(Some(path.to_path_buf()), inner),
                other => other,
            })
        }
    }

    /// Parse and validate a TOML document, warning on unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let typo_warnings = super::validation::validate_unknown_keys(contents);
        for w in &typo_warnings {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse(None, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate the `config.json` shipped with a model bundle.
    ///
    /// The bundle nests the window size under `hyperparameters` and may carry
    /// unrelated keys (device lists, endpoints) which are ignored.
    pub fn from_bundle_json(contents: &str) -> Result<Self, ConfigError> {
        let bundle: BundleConfig =
            serde_json::from_str(contents).map_err(|e| ConfigError::Json(None, e))?;
        let config = Self {
            roll_win: bundle.hyperparameters.roll_win,
            autoencoder_threshold: bundle.autoencoder_threshold,
            current_thresholds: bundle.current_thresholds,
            temperature_thresholds: bundle.temperature_thresholds,
            normalizer: bundle.normalizer,
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - Each band escalates: lower_warning <= upper_warning <= upper_critical
    /// - Every threshold is finite
    /// - roll_win >= 1
    /// - autoencoder_threshold is finite and non-negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        Self::check_escalation(&self.current_thresholds.band(), "current_thresholds", &mut errors);
        Self::check_escalation(&self.temperature_thresholds.band(), "temperature_thresholds", &mut errors);

        if self.roll_win == 0 {
            errors.push("roll_win must be >= 1".to_string());
        }

        if !self.autoencoder_threshold.is_finite() {
            errors.push(format!(
                "autoencoder_threshold must be finite (got {})",
                self.autoencoder_threshold
            ));
        } else if self.autoencoder_threshold < 0.0 {
            errors.push(format!(
                "autoencoder_threshold ({:.4}) cannot be negative",
                self.autoencoder_threshold
            ));
        }

        let n = &self.normalizer;
        if !n.default_current.is_finite() || !n.default_temperature.is_finite() {
            errors.push("normalizer defaults must be finite numbers".to_string());
        }
        if n.recency_window_minutes == Some(0) {
            errors.push("normalizer.recency_window_minutes must be > 0 when set".to_string());
        }

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_escalation(band: &Band, name: &str, errors: &mut Vec<String>) {
        let Band { upper_critical, upper_warning, lower_warning } = *band;
        // NaN comparisons silently pass, catch them explicitly
        if !upper_critical.is_finite() || !upper_warning.is_finite() || !lower_warning.is_finite() {
            errors.push(format!(
                "{name}: values must be finite (got lower_warning={lower_warning}, upper_warning={upper_warning}, upper_critical={upper_critical})"
            ));
            return;
        }
        if upper_warning < lower_warning {
            errors.push(format!(
                "{name}: upper_warning ({upper_warning:.3}) must be >= lower_warning ({lower_warning:.3})"
            ));
        }
        if upper_critical < upper_warning {
            errors.push(format!(
                "{name}: upper_critical ({upper_critical:.3}) must be >= upper_warning ({upper_warning:.3})"
            ));
        }
    }
}

// ============================================================================
// Model Bundle Shape
// ============================================================================

#[derive(Debug, Deserialize)]
struct BundleConfig {
    #[serde(default)]
    hyperparameters: BundleHyperparameters,
    #[serde(default = "default_autoencoder_threshold")]
    autoencoder_threshold: f64,
    #[serde(default)]
    current_thresholds: CurrentThresholds,
    #[serde(default)]
    temperature_thresholds: TemperatureThresholds,
    #[serde(default)]
    normalizer: NormalizerConfig,
}

#[derive(Debug, Deserialize)]
struct BundleHyperparameters {
    #[serde(default = "default_roll_win")]
    roll_win: usize,
}

impl Default for BundleHyperparameters {
    fn default() -> Self {
        Self { roll_win: default_roll_win() }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error{}: {}", display_path(.0), .1)]
    Parse(Option<PathBuf>, toml::de::Error),

    #[error("Config JSON error{}: {}", display_path(.0), .1)]
    Json(Option<PathBuf>, serde_json::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed:\n{}", list_errors(.0))]
    Validation(Vec<String>),

    #[error("Feature manifest invalid: {0}")]
    Manifest(String),
}

fn list_errors(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}

// ============================================================================
// Severity Bands
// ============================================================================

/// One quantity's tier boundaries, checked strictly descending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub upper_critical: f64,
    pub upper_warning: f64,
    pub lower_warning: f64,
}

/// Charge current tiers (A).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentThresholds {
    #[serde(default = "default_current_upper_critical")]
    pub upper_critical: f64,

    #[serde(default = "default_current_upper_warning")]
    pub upper_warning: f64,

    /// Zero means every anomalous sample is at least medium.
    #[serde(default = "default_current_lower_warning")]
    pub lower_warning: f64,
}

fn default_current_upper_critical() -> f64 { defaults::CURRENT_UPPER_CRITICAL }
fn default_current_upper_warning() -> f64 { defaults::CURRENT_UPPER_WARNING }
fn default_current_lower_warning() -> f64 { defaults::CURRENT_LOWER_WARNING }

impl Default for CurrentThresholds {
    fn default() -> Self {
        Self {
            upper_critical: default_current_upper_critical(),
            upper_warning: default_current_upper_warning(),
            lower_warning: default_current_lower_warning(),
        }
    }
}

impl CurrentThresholds {
    pub fn band(&self) -> Band {
        Band {
            upper_critical: self.upper_critical,
            upper_warning: self.upper_warning,
            lower_warning: self.lower_warning,
        }
    }
}

/// Pack temperature tiers (°C).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureThresholds {
    #[serde(default = "default_temperature_upper_critical")]
    pub upper_critical: f64,

    #[serde(default = "default_temperature_upper_warning")]
    pub upper_warning: f64,

    #[serde(default = "default_temperature_lower_warning")]
    pub lower_warning: f64,
}

fn default_temperature_upper_critical() -> f64 { defaults::TEMPERATURE_UPPER_CRITICAL }
fn default_temperature_upper_warning() -> f64 { defaults::TEMPERATURE_UPPER_WARNING }
fn default_temperature_lower_warning() -> f64 { defaults::TEMPERATURE_LOWER_WARNING }

impl Default for TemperatureThresholds {
    fn default() -> Self {
        Self {
            upper_critical: default_temperature_upper_critical(),
            upper_warning: default_temperature_upper_warning(),
            lower_warning: default_temperature_lower_warning(),
        }
    }
}

impl TemperatureThresholds {
    pub fn band(&self) -> Band {
        Band {
            upper_critical: self.upper_critical,
            upper_warning: self.upper_warning,
            lower_warning: self.lower_warning,
        }
    }
}

// ============================================================================
// Normalizer Policy
// ============================================================================

/// What to do with a record that has a timestamp but lacks current or
/// temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Fill the gap with the configured default reading.
    #[default]
    Substitute,
    /// Discard the record.
    Drop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    #[serde(default)]
    pub missing_field_policy: MissingFieldPolicy,

    /// Current used by `Substitute` (A)
    #[serde(default = "default_missing_current")]
    pub default_current: f64,

    /// Temperature used by `Substitute` (°C)
    #[serde(default = "default_missing_temperature")]
    pub default_temperature: f64,

    /// When set, device reports only keep samples this recent (minutes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recency_window_minutes: Option<u64>,
}

fn default_missing_current() -> f64 { defaults::MISSING_CURRENT }
fn default_missing_temperature() -> f64 { defaults::MISSING_TEMPERATURE }

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            missing_field_policy: MissingFieldPolicy::default(),
            default_current: default_missing_current(),
            default_temperature: default_missing_temperature(),
            recency_window_minutes: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
