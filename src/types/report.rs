//! Batch outputs: BatchClassification, HealthReport

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DeviceStatus, Severity, SeverityCounts};

/// Result of classifying one batch of telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchClassification {
    /// Severity of every feature row, in timestamp order
    pub per_sample_severity: Vec<Severity>,
    /// Samples per severity level
    pub counts: SeverityCounts,
    /// Aggregated device status
    pub overall_status: DeviceStatus,
}

/// Device-facing health report: status, explanation and suggested actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub device_id: String,
    pub status: DeviceStatus,
    pub summary: String,
    pub anomalies: SeverityCounts,
    pub recommended_actions: Vec<String>,
    pub generated_at: DateTime<Utc>,
    /// Raw records received, before normalization and windowing
    pub data_points: usize,
}
