//! Scoring fusion: reconstruction error OR novelty outlier.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{NoveltyDetector, NoveltyLabel, Reconstructor, ScorerError};

/// Fused score for one scaled feature row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowScore {
    /// Mean squared difference between the row and its reconstruction
    pub reconstruction_error: f64,
    pub novelty: NoveltyLabel,
    pub is_anomalous: bool,
}

/// Mean squared difference between a scaled row and its reconstruction.
///
/// Fails if the reconstruction does not have the row's width.
pub fn reconstruction_error(scaled: &[f64], reconstructed: &[f64]) -> Result<f64, ScorerError> {
    if scaled.len() != reconstructed.len() {
        return Err(ScorerError::WidthMismatch {
            stage: "reconstruction",
            expected: scaled.len(),
            actual: reconstructed.len(),
        });
    }
    if scaled.is_empty() {
        return Ok(0.0);
    }

    let sum: f64 = scaled
        .iter()
        .zip(reconstructed)
        .map(|(a, b)| (a - b).powi(2))
        .sum();
    Ok(sum / scaled.len() as f64)
}

fn score_row(
    scaled: &[f64],
    reconstructor: &dyn Reconstructor,
    novelty: &dyn NoveltyDetector,
    threshold: f64,
) -> Result<RowScore, ScorerError> {
    let reconstructed = reconstructor.reconstruct(scaled)?;
    let error = reconstruction_error(scaled, &reconstructed)?;
    if !error.is_finite() {
        return Err(ScorerError::Reconstruction(format!(
            "non-finite reconstruction error {error}"
        )));
    }
    let label = novelty.label(scaled)?;

    // Either model flagging the row is enough
    let is_anomalous = error > threshold || label == NoveltyLabel::Outlier;

    Ok(RowScore {
        reconstruction_error: error,
        novelty: label,
        is_anomalous,
    })
}

/// Score every scaled row with both models and fuse the results.
///
/// Rows are independent and scored in parallel; output order matches input.
/// Any single failure fails the whole batch.
pub fn fuse_scores(
    scaled_rows: &[Vec<f64>],
    reconstructor: &dyn Reconstructor,
    novelty: &dyn NoveltyDetector,
    threshold: f64,
) -> Result<Vec<RowScore>, ScorerError> {
    let scores = scaled_rows
        .par_iter()
        .map(|row| score_row(row, reconstructor, novelty, threshold))
        .collect::<Result<Vec<_>, _>>()?;

    let anomalies = scores.iter().filter(|s| s.is_anomalous).count();
    let outliers = scores
        .iter()
        .filter(|s| s.novelty == NoveltyLabel::Outlier)
        .count();
    info!(
        rows = scores.len(),
        anomalies,
        novelty_outliers = outliers,
        threshold,
        "Fused anomaly scores"
    );

    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;

    impl Reconstructor for Identity {
        fn reconstruct(&self, scaled: &[f64]) -> Result<Vec<f64>, ScorerError> {
            Ok(scaled.to_vec())
        }
    }

    struct Zeros;

    impl Reconstructor for Zeros {
        fn reconstruct(&self, scaled: &[f64]) -> Result<Vec<f64>, ScorerError> {
            Ok(vec![0.0; scaled.len()])
        }
    }

    struct Truncating;

    impl Reconstructor for Truncating {
        fn reconstruct(&self, scaled: &[f64]) -> Result<Vec<f64>, ScorerError> {
            Ok(scaled[1..].to_vec())
        }
    }

    struct FixedLabel(NoveltyLabel);

    impl NoveltyDetector for FixedLabel {
        fn label(&self, _scaled: &[f64]) -> Result<NoveltyLabel, ScorerError> {
            Ok(self.0)
        }
    }

    struct Failing;

    impl NoveltyDetector for Failing {
        fn label(&self, _scaled: &[f64]) -> Result<NoveltyLabel, ScorerError> {
            Err(ScorerError::Novelty("model offline".to_string()))
        }
    }

    #[test]
    fn test_identity_reconstruction_has_zero_error() {
        let rows = vec![vec![1.0, -2.0, 3.5], vec![0.0, 0.0, 0.0], vec![9.0, 1e6, -4.0]];
        let scores =
            fuse_scores(&rows, &Identity, &FixedLabel(NoveltyLabel::Inlier), 0.0).expect("scores");
        assert!(scores.iter().all(|s| s.reconstruction_error == 0.0));
        assert!(scores.iter().all(|s| !s.is_anomalous));
    }

    #[test]
    fn test_mse_against_zero_reconstruction() {
        let error = reconstruction_error(&[1.0, 3.0], &[0.0, 0.0]).expect("same width");
        assert_eq!(error, 5.0);
    }

    #[test]
    fn test_error_above_threshold_is_anomalous() {
        let rows = vec![vec![1.0, 1.0]];
        let scores =
            fuse_scores(&rows, &Zeros, &FixedLabel(NoveltyLabel::Inlier), 0.5).expect("scores");
        assert!(scores[0].is_anomalous);

        let scores =
            fuse_scores(&rows, &Zeros, &FixedLabel(NoveltyLabel::Inlier), 1.0).expect("scores");
        assert!(!scores[0].is_anomalous, "error equal to threshold is not anomalous");
    }

    #[test]
    fn test_outlier_alone_is_anomalous() {
        let rows = vec![vec![2.0, 2.0]];
        let scores =
            fuse_scores(&rows, &Identity, &FixedLabel(NoveltyLabel::Outlier), 0.0).expect("scores");
        assert!(scores[0].is_anomalous);
        assert_eq!(scores[0].reconstruction_error, 0.0);
    }

    #[test]
    fn test_wrong_width_reconstruction_fails_batch() {
        let rows = vec![vec![1.0, 2.0, 3.0]];
        let result = fuse_scores(&rows, &Truncating, &FixedLabel(NoveltyLabel::Inlier), 0.0);
        assert!(matches!(result, Err(ScorerError::WidthMismatch { .. })));
    }

    #[test]
    fn test_detector_failure_fails_batch() {
        let rows = vec![vec![1.0], vec![2.0]];
        let result = fuse_scores(&rows, &Identity, &Failing, 0.0);
        assert!(matches!(result, Err(ScorerError::Novelty(_))));
    }
}
