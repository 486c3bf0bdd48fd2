//! Threshold Configuration Module
//!
//! Provides the severity thresholds, window size and normalizer policy
//! loaded from TOML (or a model bundle's `config.json`), plus the mandatory
//! feature manifest.
//!
//! ## Loading Order
//!
//! 1. `BATTERY_HEALTH_CONFIG` environment variable (path to config file)
//! 2. `battery_config.toml` in the current working directory
//! 3. Built-in defaults (the values shipped with the model bundle)
//!
//! ## Usage
//!
//! The config is immutable once loaded. Either pass it explicitly or
//! install it process-wide once at startup:
//!
//! ```ignore
//! config::init(ThresholdConfig::load());
//!
//! let status = pipeline.classify_batch(&records, config::get().ok_or(...)?)?;
//! ```

mod threshold_config;
mod manifest;
pub mod defaults;
pub mod validation;

pub use manifest::FeatureManifest;
pub use threshold_config::*;

use std::sync::OnceLock;

/// Process-wide threshold configuration, initialized once at startup.
static THRESHOLD_CONFIG: OnceLock<ThresholdConfig> = OnceLock::new();

/// Install the process-wide threshold configuration.
///
/// Only the first call takes effect; later calls are logged and ignored.
pub fn init(config: ThresholdConfig) {
    if THRESHOLD_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// The process-wide configuration, if `init()` has been called.
pub fn get() -> Option<&'static ThresholdConfig> {
    THRESHOLD_CONFIG.get()
}

pub fn is_initialized() -> bool {
    THRESHOLD_CONFIG.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_first_write_wins() {
        let mut first = ThresholdConfig::default();
        first.roll_win = 3;
        init(first);
        let mut second = ThresholdConfig::default();
        second.roll_win = 9;
        init(second);

        assert!(is_initialized());
        assert_eq!(get().map(|c| c.roll_win), Some(3));
    }
}
