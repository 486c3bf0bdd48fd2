//! Trailing rolling-window statistics

use statrs::statistics::Statistics;

/// Summary of one trailing window `[i - w + 1, i]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); 0 for a single value
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl WindowStats {
    fn of(window: &[f64]) -> Self {
        let std = if window.len() < 2 {
            0.0
        } else {
            Statistics::std_dev(window.iter())
        };
        Self {
            mean: Statistics::mean(window.iter()),
            std,
            min: Statistics::min(window.iter()),
            max: Statistics::max(window.iter()),
        }
    }
}

/// Statistics of the trailing window ending at each index.
///
/// Indices with fewer than `window` values before them (inclusive) have no
/// complete window and yield `None`. A zero window yields `None` everywhere.
pub fn trailing_stats(values: &[f64], window: usize) -> Vec<Option<WindowStats>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| (i + 1 >= window).then(|| WindowStats::of(&values[i + 1 - window..=i])))
        .collect()
}
