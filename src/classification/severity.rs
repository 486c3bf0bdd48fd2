//! Severity classifier
//!
//! Ordered rule list, first match wins:
//!
//! 1. not anomalous: `Low`, whatever the readings
//! 2. temperature or current at/above `upper_critical`: `Critical`
//! 3. at/above `upper_warning`: `High`
//! 4. at/above `lower_warning`: `Medium`
//! 5. otherwise `Low`

use crate::config::{Band, ThresholdConfig};
use crate::types::Severity;

/// Tier reached by one quantity, if any.
fn tier(value: f64, band: &Band) -> Option<Severity> {
    if value >= band.upper_critical {
        Some(Severity::Critical)
    } else if value >= band.upper_warning {
        Some(Severity::High)
    } else if value >= band.lower_warning {
        Some(Severity::Medium)
    } else {
        None
    }
}

/// Classify one scored sample.
///
/// The reconstruction error does not affect the tier; it is kept in the
/// signature so callers pass the full score.
pub fn classify_severity(
    _reconstruction_error: f64,
    is_anomalous: bool,
    current: f64,
    temperature: f64,
    config: &ThresholdConfig,
) -> Severity {
    if !is_anomalous {
        return Severity::Low;
    }

    let by_temperature = tier(temperature, &config.temperature_thresholds.band());
    let by_current = tier(current, &config.current_thresholds.band());

    // OR of the two quantities: the higher tier wins
    by_temperature.max(by_current).unwrap_or(Severity::Low)
}
