//! Battery Health: telemetry anomaly pipeline
//!
//! Turns irregular-interval battery telemetry into one device status.
//!
//! ## Architecture
//!
//! - **Acquisition**: raw records (flat or nested OCPP-style payloads) to an
//!   ordered `(timestamp, current, temperature)` sequence
//! - **Features**: rolling-window statistics, rates, lags and ratios per sample
//! - **Scoring**: reconstruction error and novelty label from injected models,
//!   fused into one anomaly flag per row
//! - **Classification**: per-sample severity tiers and the batch status

pub mod acquisition;
pub mod classification;
pub mod config;
pub mod features;
pub mod pipeline;
pub mod scoring;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, FeatureManifest, ThresholdConfig};

// Re-export commonly used types
pub use types::{
    BatchClassification, DeviceStatus, FeatureName, FeatureRow, FeatureVector, HealthReport,
    Severity, SeverityCounts, TelemetrySample,
};

// Re-export the pipeline and its collaborators
pub use pipeline::{BatteryPipeline, PipelineError};
pub use scoring::{
    FeatureScaler, NoveltyDetector, NoveltyLabel, Reconstructor, ScorerError, StandardScaler,
};
