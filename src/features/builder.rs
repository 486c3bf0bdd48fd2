//! Feature builder
//!
//! Rolling statistics are computed over the full ordered sequence, then rows
//! with any undefined feature are excluded. Undefined means: no complete
//! window, no predecessor, a zero time delta, a zero temperature for the
//! ratio, or any non-finite value. Partial rows never reach the scorers.

use tracing::{debug, info};

use super::rolling::{trailing_stats, WindowStats};
use crate::config::FeatureManifest;
use crate::pipeline::PipelineError;
use crate::types::{time_deltas, FeatureName, FeatureRow, FeatureVector, TelemetrySample};

/// Complete feature vector for every sample where one is defined.
///
/// Output is aligned with `samples`.
pub fn feature_vectors(samples: &[TelemetrySample], roll_win: usize) -> Vec<Option<FeatureVector>> {
    let currents: Vec<f64> = samples.iter().map(|s| s.current).collect();
    let temps: Vec<f64> = samples.iter().map(|s| s.temperature).collect();
    let current_stats = trailing_stats(&currents, roll_win);
    let temp_stats = trailing_stats(&temps, roll_win);
    let deltas = time_deltas(samples);

    (0..samples.len())
        .map(|i| {
            vector_at(
                samples,
                i,
                deltas[i],
                current_stats[i].as_ref(),
                temp_stats[i].as_ref(),
            )
        })
        .collect()
}

fn vector_at(
    samples: &[TelemetrySample],
    i: usize,
    delta: Option<f64>,
    current_window: Option<&WindowStats>,
    temp_window: Option<&WindowStats>,
) -> Option<FeatureVector> {
    let dt = delta?;
    let cw = current_window?;
    let tw = temp_window?;
    let prev = samples.get(i.checked_sub(1)?)?;
    let sample = &samples[i];

    if sample.temperature == 0.0 {
        return None;
    }

    let vector = FeatureVector {
        current: sample.current,
        temperature: sample.temperature,
        current_roll_mean: cw.mean,
        current_roll_std: cw.std,
        current_roll_min: cw.min,
        current_roll_max: cw.max,
        temp_roll_mean: tw.mean,
        temp_roll_std: tw.std,
        current_rate: (sample.current - prev.current) / dt,
        temp_rate: (sample.temperature - prev.temperature) / dt,
        current_lag1: prev.current,
        temp_lag1: prev.temperature,
        current_temp_ratio: sample.current / sample.temperature,
        current_temp_product: sample.current * sample.temperature,
    };

    let complete = FeatureName::ALL
        .iter()
        .all(|name| vector.get(*name).is_finite());
    complete.then_some(vector)
}

/// Build the manifest-ordered feature rows for a normalized sequence.
///
/// Each row keeps the raw current and temperature of its sample for the
/// severity thresholds. Fails with `InsufficientData` if no row is complete.
pub fn build_features(
    samples: &[TelemetrySample],
    roll_win: usize,
    manifest: &FeatureManifest,
) -> Result<Vec<FeatureRow>, PipelineError> {
    let rows: Vec<FeatureRow> = samples
        .iter()
        .zip(feature_vectors(samples, roll_win))
        .filter_map(|(sample, vector)| {
            vector.map(|v| FeatureRow {
                timestamp: sample.timestamp,
                values: manifest.project(&v),
                current: sample.current,
                temperature: sample.temperature,
            })
        })
        .collect();

    let excluded = samples.len() - rows.len();
    debug!(excluded, roll_win, "Excluded samples with undefined features");

    if rows.is_empty() {
        return Err(PipelineError::InsufficientData {
            samples: samples.len(),
            roll_win,
        });
    }

    info!(
        samples = samples.len(),
        rows = rows.len(),
        excluded,
        roll_win,
        "Built feature rows"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<TelemetrySample> {
        (0..n)
            .map(|i| TelemetrySample::new(1_000 + 10 * i as i64, 1.0 + i as f64, 30.0 + i as f64))
            .collect()
    }

    #[test]
    fn test_first_window_minus_one_rows_excluded() {
        let rows = build_features(&ramp(8), 5, &FeatureManifest::canonical()).expect("rows");
        // indices 0..=3 lack a full window
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].timestamp, 1_040);
    }

    #[test]
    fn test_first_sample_excluded_even_with_unit_window() {
        let rows = build_features(&ramp(3), 1, &FeatureManifest::canonical()).expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp, 1_010);
    }

    #[test]
    fn test_feature_values() {
        let vectors = feature_vectors(&ramp(3), 2);
        let v = vectors[2].expect("complete row");
        assert_eq!(v.current, 3.0);
        assert_eq!(v.current_lag1, 2.0);
        assert_eq!(v.current_rate, 0.1);
        assert_eq!(v.temp_rate, 0.1);
        assert_eq!(v.current_roll_mean, 2.5);
        assert_eq!(v.current_roll_min, 2.0);
        assert_eq!(v.current_roll_max, 3.0);
        assert_eq!(v.temp_roll_mean, 31.5);
        assert_eq!(v.current_temp_product, 96.0);
        assert_eq!(v.current_temp_ratio, 3.0 / 32.0);
    }

    #[test]
    fn test_zero_delta_sample_excluded() {
        let mut samples = ramp(6);
        samples[4].timestamp = samples[3].timestamp;
        let vectors = feature_vectors(&samples, 2);
        assert!(vectors[4].is_none());
        assert!(vectors[3].is_some());
        assert!(vectors[5].is_some());
    }

    #[test]
    fn test_extreme_epochs_do_not_overflow() {
        let records = vec![
            serde_json::json!({"ts": i64::MIN, "current": 1.0, "temperature": 30.0}),
            serde_json::json!({"ts": i64::MAX, "current": 2.0, "temperature": 31.0}),
        ];
        let samples = crate::acquisition::normalize(&records, &crate::config::NormalizerConfig::default())
            .expect("both records parse");
        let vectors = feature_vectors(&samples, 1);
        assert!(vectors.iter().all(Option::is_none));
    }

    #[test]
    fn test_zero_temperature_excluded() {
        let mut samples = ramp(4);
        samples[3].temperature = 0.0;
        let vectors = feature_vectors(&samples, 2);
        assert!(vectors[3].is_none());
    }

    #[test]
    fn test_manifest_order_preserved() {
        let mut names: Vec<&str> = FeatureName::ALL.iter().map(FeatureName::as_str).collect();
        names.reverse();
        let manifest = FeatureManifest::from_names(&names).expect("valid manifest");
        let rows = build_features(&ramp(3), 1, &manifest).expect("rows");
        let last = rows.last().expect("row");
        assert_eq!(last.values[0], 3.0 * 32.0);
        assert_eq!(last.values[13], 3.0);
    }

    #[test]
    fn test_short_sequence_is_insufficient() {
        let result = build_features(&ramp(3), 5, &FeatureManifest::canonical());
        assert!(matches!(
            result,
            Err(PipelineError::InsufficientData { samples: 3, roll_win: 5 })
        ));
    }

    #[test]
    fn test_rows_carry_raw_readings() {
        let rows = build_features(&ramp(4), 2, &FeatureManifest::canonical()).expect("rows");
        for row in &rows {
            assert_eq!(row.values.len(), 14);
            assert_eq!(row.temperature - row.current, 29.0);
        }
    }
}
