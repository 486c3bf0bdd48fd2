//! Status aggregator: severity counts to one device status.

use crate::config::defaults::{DEGRADATION_MEDIUM_COUNT, IMMEDIATE_ACTION_HIGH_COUNT};
use crate::types::{DeviceStatus, SeverityCounts};

/// Reduce a batch's severity counts to the overall device status.
///
/// A single critical sample escalates immediately; high samples need to
/// exceed `IMMEDIATE_ACTION_HIGH_COUNT`. Low counts never matter.
pub fn aggregate_status(counts: &SeverityCounts) -> DeviceStatus {
    if counts.critical > 0 || counts.high > IMMEDIATE_ACTION_HIGH_COUNT {
        DeviceStatus::ImmediateActionRequired
    } else if counts.high > 0 || counts.medium > DEGRADATION_MEDIUM_COUNT {
        DeviceStatus::DegradationAccelerating
    } else if counts.medium > 0 {
        DeviceStatus::ModerateIrregularities
    } else {
        DeviceStatus::Stable
    }
}
