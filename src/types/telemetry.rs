//! Canonical telemetry sample

use serde::{Deserialize, Serialize};

/// One normalized battery reading.
///
/// Produced by the acquisition normalizer; sequences of samples are always
/// sorted ascending by `timestamp` and `current` is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Epoch seconds (UTC)
    pub timestamp: i64,
    /// Charge current magnitude (A), clipped at 0
    pub current: f64,
    /// Pack temperature (°C)
    pub temperature: f64,
}

impl TelemetrySample {
    pub fn new(timestamp: i64, current: f64, temperature: f64) -> Self {
        Self {
            timestamp,
            current,
            temperature,
        }
    }
}

/// Seconds elapsed since the previous sample for every index of `samples`.
///
/// The first entry has no predecessor and is `None`. A delta of exactly zero
/// is also `None`: duplicate timestamps carry no rate information. A delta
/// that overflows `i64` is `None` as well.
pub fn time_deltas(samples: &[TelemetrySample]) -> Vec<Option<f64>> {
    let mut deltas = Vec::with_capacity(samples.len());
    for (i, sample) in samples.iter().enumerate() {
        let delta = if i == 0 {
            None
        } else {
            sample
                .timestamp
                .checked_sub(samples[i - 1].timestamp)
                .filter(|dt| *dt != 0)
                .map(|dt| dt as f64)
        };
        deltas.push(delta);
    }
    deltas
}
