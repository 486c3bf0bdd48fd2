//! Severity and status types: Severity, SeverityCounts, DeviceStatus

use serde::{Deserialize, Serialize};

/// Per-sample anomaly severity, ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Number of samples at each severity level.
///
/// All four levels are always present when serialized, zeros included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

impl FromIterator<Severity> for SeverityCounts {
    fn from_iter<I: IntoIterator<Item = Severity>>(iter: I) -> Self {
        let mut counts = SeverityCounts::default();
        for severity in iter {
            counts.record(severity);
        }
        counts
    }
}

/// Overall device health for one batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceStatus {
    #[serde(rename = "Stable")]
    Stable = 0,
    #[serde(rename = "Moderate Irregularities")]
    ModerateIrregularities = 1,
    #[serde(rename = "Degradation Accelerating")]
    DegradationAccelerating = 2,
    #[serde(rename = "Immediate Action Required")]
    ImmediateActionRequired = 3,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Stable => "Stable",
            DeviceStatus::ModerateIrregularities => "Moderate Irregularities",
            DeviceStatus::DegradationAccelerating => "Degradation Accelerating",
            DeviceStatus::ImmediateActionRequired => "Immediate Action Required",
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_counts_from_iter() {
        let counts: SeverityCounts = [
            Severity::Low,
            Severity::High,
            Severity::Low,
            Severity::Critical,
        ]
        .into_iter()
        .collect();
        assert_eq!(counts.low, 2);
        assert_eq!(counts.high, 1);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.medium, 0);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_counts_serialize_all_levels() {
        let json = serde_json::to_value(SeverityCounts::default()).expect("serialize");
        for key in ["critical", "high", "medium", "low"] {
            assert_eq!(json[key], 0, "missing {key}");
        }
    }

    #[test]
    fn test_status_serializes_display_label() {
        let json = serde_json::to_string(&DeviceStatus::ImmediateActionRequired).expect("serialize");
        assert_eq!(json, "\"Immediate Action Required\"");
    }
}
