//! Telemetry acquisition module
//!
//! Turns raw records from any source adapter into the canonical, time-ordered
//! sample sequence used by the feature builder.
//!
//! - `envelope`: unwraps API response documents into record lists
//! - `adapters`: flat-field and nested-payload record shapes

pub mod adapters;
pub mod envelope;

pub use adapters::{adapt_record, DropReason, RecordAdapter};
pub use envelope::extract_records;

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::NormalizerConfig;
use crate::pipeline::PipelineError;
use crate::types::TelemetrySample;

/// Normalize a batch of raw records.
///
/// Unusable records are dropped individually. The result is sorted ascending
/// by timestamp (stable for duplicates) and current is clipped at zero.
///
/// Fails with `NoData` when the batch is empty or no record survives.
pub fn normalize(
    records: &[Value],
    policy: &NormalizerConfig,
) -> Result<Vec<TelemetrySample>, PipelineError> {
    if records.is_empty() {
        return Err(PipelineError::NoData("input batch is empty".to_string()));
    }

    let mut samples = Vec::with_capacity(records.len());
    let mut dropped: HashMap<DropReason, usize> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        match adapt_record(record, policy) {
            Ok(sample) => samples.push(sample),
            Err(reason) => {
                debug!(index, reason = %reason, "Dropping raw record");
                *dropped.entry(reason).or_default() += 1;
            }
        }
    }

    if samples.is_empty() {
        return Err(PipelineError::NoData(format!(
            "none of {} records yielded timestamp, current and temperature",
            records.len()
        )));
    }

    samples.sort_by_key(|s| s.timestamp);
    for sample in &mut samples {
        sample.current = sample.current.max(0.0);
    }

    info!(
        received = records.len(),
        accepted = samples.len(),
        dropped = records.len() - samples.len(),
        "Normalized telemetry batch"
    );
    if !dropped.is_empty() {
        debug!(?dropped, "Drop reasons");
    }

    Ok(samples)
}

/// Keep only samples inside `[now - minutes, now]`.
///
/// Samples stamped after `now` are dropped along with stale ones.
pub fn retain_recent(
    samples: Vec<TelemetrySample>,
    now: DateTime<Utc>,
    minutes: u64,
) -> Vec<TelemetrySample> {
    let window = i64::try_from(minutes.saturating_mul(60)).unwrap_or(i64::MAX);
    let upper = now.timestamp();
    let cutoff = upper.saturating_sub(window);
    samples
        .into_iter()
        .filter(|s| (cutoff..=upper).contains(&s.timestamp))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_empty_batch_is_no_data() {
        let result = normalize(&[], &NormalizerConfig::default());
        assert!(matches!(result, Err(PipelineError::NoData(_))));
    }

    #[test]
    fn test_all_records_dropped_is_no_data() {
        let records = vec![json!({"current": 1.0}), json!("garbage")];
        let result = normalize(&records, &NormalizerConfig::default());
        assert!(matches!(result, Err(PipelineError::NoData(_))));
    }

    #[test]
    fn test_sorted_and_clipped() {
        let records = vec![
            json!({"ts": 30, "current": -4.0, "temperature": 30.0}),
            json!({"ts": 10, "current": 2.0, "temperature": 31.0}),
            json!({"ts": 20, "current": "bad", "temperature": 31.0}),
            json!({"ts": 20, "current": 1.5, "temperature": 32.0}),
        ];
        let samples = normalize(&records, &NormalizerConfig::default()).expect("normalizes");
        let timestamps: Vec<i64> = samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![10, 20, 30]);
        assert_eq!(samples[2].current, 0.0);
    }

    #[test]
    fn test_retain_recent_window() {
        let now = Utc.timestamp_opt(10_000, 0).single().expect("valid timestamp");
        let samples = vec![
            TelemetrySample::new(10_000 - 25 * 60 - 1, 1.0, 30.0),
            TelemetrySample::new(10_000 - 25 * 60, 1.0, 30.0),
            TelemetrySample::new(9_999, 1.0, 30.0),
        ];
        let kept = retain_recent(samples, now, 25);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].timestamp, 10_000 - 25 * 60);
    }

    #[test]
    fn test_retain_recent_drops_future_samples() {
        let now = Utc.timestamp_opt(10_000, 0).single().expect("valid timestamp");
        let samples = vec![
            TelemetrySample::new(9_990, 1.0, 30.0),
            TelemetrySample::new(10_000, 1.0, 30.0),
            TelemetrySample::new(10_001, 1.0, 30.0),
        ];
        let kept: Vec<i64> = retain_recent(samples, now, 25)
            .iter()
            .map(|s| s.timestamp)
            .collect();
        assert_eq!(kept, vec![9_990, 10_000]);
    }
}
