//! Per-status summary text and recommended actions

use crate::types::{DeviceStatus, SeverityCounts};

fn status_text(status: DeviceStatus) -> (&'static str, &'static [&'static str]) {
    match status {
        DeviceStatus::ImmediateActionRequired => (
            "Multiple high-severity anomalies were detected during this charging session. \
             The battery is exhibiting behavior that requires immediate attention.",
            &[
                "Stop using the vehicle for high-load trips until a detailed inspection is done.",
                "Schedule a battery health diagnostic with a certified service center.",
                "Avoid fast charging until the issue is investigated.",
            ],
        ),
        DeviceStatus::DegradationAccelerating => (
            "Anomaly patterns suggest that battery degradation is accelerating. \
             While the battery is still usable, its long-term health is at risk.",
            &[
                "Reduce exposure to high temperatures during charging and operation.",
                "Avoid frequent fast-charging sessions in a short duration.",
                "Plan a preventive battery checkup within the next few weeks.",
            ],
        ),
        DeviceStatus::ModerateIrregularities => (
            "Some irregularities were detected, but they are not yet critical. \
             Battery health should be monitored over upcoming sessions.",
            &[
                "Monitor future charging sessions with regular diagnostics.",
                "Avoid charging immediately after high-load driving when the pack is hot.",
            ],
        ),
        DeviceStatus::Stable => (
            "No significant anomalies detected in this session. \
             The battery behavior appears consistent with healthy operation.",
            &[
                "Continue using standard charging practices.",
                "Re-run diagnostics periodically to track long-term health.",
            ],
        ),
    }
}

/// Summary sentence (with the anomaly counts appended) and the recommended
/// actions for a device status.
pub fn summarize(status: DeviceStatus, counts: &SeverityCounts) -> (String, Vec<String>) {
    let (text, actions) = status_text(status);
    let summary = format!(
        "{text} (Anomaly counts: Critical: {}, High: {}, Medium: {}, Low: {}.)",
        counts.critical, counts.high, counts.medium, counts.low
    );
    (summary, actions.iter().map(|a| (*a).to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_appended() {
        let counts = SeverityCounts {
            critical: 1,
            high: 2,
            medium: 3,
            low: 4,
        };
        let (summary, _) = summarize(DeviceStatus::ImmediateActionRequired, &counts);
        assert!(summary.starts_with("Multiple high-severity anomalies"));
        assert!(summary.ends_with("(Anomaly counts: Critical: 1, High: 2, Medium: 3, Low: 4.)"));
    }

    #[test]
    fn test_every_status_has_actions() {
        for status in [
            DeviceStatus::Stable,
            DeviceStatus::ModerateIrregularities,
            DeviceStatus::DegradationAccelerating,
            DeviceStatus::ImmediateActionRequired,
        ] {
            let (summary, actions) = summarize(status, &SeverityCounts::default());
            assert!(!summary.is_empty());
            assert!(!actions.is_empty());
        }
    }

    #[test]
    fn test_stable_text() {
        let (summary, actions) = summarize(DeviceStatus::Stable, &SeverityCounts::default());
        assert!(summary.contains("healthy operation."));
        assert_eq!(actions.len(), 2);
    }
}
