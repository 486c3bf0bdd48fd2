//! Pipeline error taxonomy

use thiserror::Error;

use crate::config::ConfigError;
use crate::scoring::ScorerError;

/// Terminal failure of one `classify_batch` invocation.
///
/// There is no internal retry: every variant aborts the batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No usable telemetry: {0}")]
    NoData(String),

    #[error("Insufficient data: {samples} samples produced no complete feature row (roll_win = {roll_win})")]
    InsufficientData { samples: usize, roll_win: usize },

    #[error("Scoring unavailable: {0}")]
    ScoringUnavailable(#[from] ScorerError),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(#[from] ConfigError),
}
