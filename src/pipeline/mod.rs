//! Battery Health Pipeline
//!
//! ```text
//! STAGE 1: Normalize raw records   (acquisition)
//! STAGE 2: Build feature rows      (features)
//! STAGE 3: Scale + fused scoring   (scoring)
//! STAGE 4: Per-sample severity     (classification::severity)
//! STAGE 5: Device status           (classification::status)
//! ```
//!
//! Each stage consumes its predecessor fully. Nothing is kept between
//! invocations except the injected models and the caller's config.

mod error;

pub use error::PipelineError;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::acquisition::{normalize, retain_recent};
use crate::classification::{aggregate_status, classify_severity, summarize};
use crate::config::{FeatureManifest, ThresholdConfig};
use crate::features::build_features;
use crate::scoring::{fuse_scores, FeatureScaler, NoveltyDetector, Reconstructor, ScorerError};
use crate::types::{BatchClassification, FeatureRow, HealthReport, SeverityCounts, TelemetrySample};

/// Owns the injected scoring collaborators and runs batches through every
/// stage.
#[derive(Clone)]
pub struct BatteryPipeline {
    manifest: FeatureManifest,
    scaler: Arc<dyn FeatureScaler>,
    reconstructor: Arc<dyn Reconstructor>,
    novelty: Arc<dyn NoveltyDetector>,
}

impl std::fmt::Debug for BatteryPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatteryPipeline")
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}

impl BatteryPipeline {
    pub fn new(
        manifest: FeatureManifest,
        scaler: Arc<dyn FeatureScaler>,
        reconstructor: Arc<dyn Reconstructor>,
        novelty: Arc<dyn NoveltyDetector>,
    ) -> Self {
        Self {
            manifest,
            scaler,
            reconstructor,
            novelty,
        }
    }

    pub fn manifest(&self) -> &FeatureManifest {
        &self.manifest
    }

    /// Classify one batch of raw records.
    ///
    /// Fails with `ConfigInvalid` before touching the data if `config` does
    /// not validate.
    pub fn classify_batch(
        &self,
        raw: &[Value],
        config: &ThresholdConfig,
    ) -> Result<BatchClassification, PipelineError> {
        config.validate()?;
        let samples = normalize(raw, &config.normalizer)?;
        self.classify_samples(&samples, config)
    }

    /// Run stages 2-5 on an already normalized sequence.
    pub fn classify_samples(
        &self,
        samples: &[TelemetrySample],
        config: &ThresholdConfig,
    ) -> Result<BatchClassification, PipelineError> {
        let rows = build_features(samples, config.roll_win, &self.manifest)?;
        let scaled = self.scale(&rows)?;
        let scores = fuse_scores(
            &scaled,
            self.reconstructor.as_ref(),
            self.novelty.as_ref(),
            config.autoencoder_threshold,
        )?;

        let per_sample_severity: Vec<_> = rows
            .iter()
            .zip(&scores)
            .map(|(row, score)| {
                classify_severity(
                    score.reconstruction_error,
                    score.is_anomalous,
                    row.current,
                    row.temperature,
                    config,
                )
            })
            .collect();

        let counts: SeverityCounts = per_sample_severity.iter().copied().collect();
        let overall_status = aggregate_status(&counts);

        info!(
            rows = rows.len(),
            critical = counts.critical,
            high = counts.high,
            medium = counts.medium,
            low = counts.low,
            status = %overall_status,
            "Classified battery telemetry batch"
        );

        Ok(BatchClassification {
            per_sample_severity,
            counts,
            overall_status,
        })
    }

    /// Full device report: classification plus summary and recommended
    /// actions.
    ///
    /// When `normalizer.recency_window_minutes` is set, only samples that
    /// recent relative to `now` are analyzed.
    pub fn analyze(
        &self,
        device_id: &str,
        raw: &[Value],
        config: &ThresholdConfig,
        now: DateTime<Utc>,
    ) -> Result<HealthReport, PipelineError> {
        config.validate()?;
        let mut samples = normalize(raw, &config.normalizer)?;

        if let Some(minutes) = config.normalizer.recency_window_minutes {
            let before = samples.len();
            samples = retain_recent(samples, now, minutes);
            if samples.is_empty() {
                warn!(device_id, minutes, before, "No samples inside recency window");
                return Err(PipelineError::NoData(format!(
                    "no samples in the last {minutes} minutes"
                )));
            }
        }

        let classification = self.classify_samples(&samples, config)?;
        let (summary, recommended_actions) =
            summarize(classification.overall_status, &classification.counts);

        info!(
            device_id,
            status = %classification.overall_status,
            data_points = raw.len(),
            "Generated device health report"
        );

        Ok(HealthReport {
            device_id: device_id.to_string(),
            status: classification.overall_status,
            summary,
            anomalies: classification.counts,
            recommended_actions,
            generated_at: now,
            data_points: raw.len(),
        })
    }

    fn scale(&self, rows: &[FeatureRow]) -> Result<Vec<Vec<f64>>, ScorerError> {
        rows.par_iter()
            .map(|row| self.scaler.transform(&row.values))
            .collect()
    }
}
