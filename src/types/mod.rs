//! Shared data structures for the battery anomaly pipeline
//!
//! This module defines the core types passed between pipeline stages:
//! - Stage 1: TelemetrySample (normalized current/temperature readings)
//! - Stage 2: FeatureName, FeatureRow (rolling-window feature vectors)
//! - Stage 3-4: Severity, SeverityCounts (per-sample classification)
//! - Stage 5: DeviceStatus, BatchClassification, HealthReport (batch outputs)

mod telemetry;
mod features;
mod severity;
mod report;

pub use telemetry::*;
pub use features::*;
pub use severity::*;
pub use report::*;
