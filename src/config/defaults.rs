//! System-wide default constants.
//!
//! Centralises the values used when a threshold config or a raw record
//! leaves something unspecified. Grouped by subsystem for easy discovery.

// ============================================================================
// Config Loading
// ============================================================================

/// Environment variable naming the threshold config file.
pub const CONFIG_ENV_VAR: &str = "BATTERY_HEALTH_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const LOCAL_CONFIG_FILE: &str = "battery_config.toml";

// ============================================================================
// Feature Builder
// ============================================================================

/// Rolling window size (samples) for the windowed statistics.
pub const DEFAULT_ROLL_WIN: usize = 5;

/// Number of engineered features the scoring models expect.
pub const FEATURE_COUNT: usize = 14;

// ============================================================================
// Scoring
// ============================================================================

/// Reconstruction error above which a row is anomalous.
///
/// 0.0 flags any non-zero error; real bundles ship a fitted value.
pub const DEFAULT_AUTOENCODER_THRESHOLD: f64 = 0.0;

// ============================================================================
// Severity Thresholds
// ============================================================================

/// Charge current at or above which an anomaly is critical (A).
pub const CURRENT_UPPER_CRITICAL: f64 = 100.0;
/// Charge current at or above which an anomaly is high (A).
pub const CURRENT_UPPER_WARNING: f64 = 2.0;
/// Charge current at or above which an anomaly is medium (A).
pub const CURRENT_LOWER_WARNING: f64 = 0.0;

/// Pack temperature at or above which an anomaly is critical (°C).
pub const TEMPERATURE_UPPER_CRITICAL: f64 = 80.0;
/// Pack temperature at or above which an anomaly is high (°C).
pub const TEMPERATURE_UPPER_WARNING: f64 = 70.0;
/// Pack temperature at or above which an anomaly is medium (°C).
pub const TEMPERATURE_LOWER_WARNING: f64 = 40.0;

// ============================================================================
// Status Escalation
// ============================================================================

/// More than this many high samples escalates straight to immediate action.
pub const IMMEDIATE_ACTION_HIGH_COUNT: usize = 3;

/// More than this many medium samples escalates to accelerating degradation.
pub const DEGRADATION_MEDIUM_COUNT: usize = 5;

// ============================================================================
// Normalizer
// ============================================================================

/// Current substituted when a record carries no current reading (A).
pub const MISSING_CURRENT: f64 = 0.0;

/// Temperature substituted when a record carries no temperature reading (°C).
pub const MISSING_TEMPERATURE: f64 = 50.0;

/// Recency window used by the device report when one is enabled (minutes).
pub const RECENCY_WINDOW_MINUTES: u64 = 25;
