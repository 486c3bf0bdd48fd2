//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for ThresholdConfig.
///
/// Maintained manually to match the struct hierarchy in threshold_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        "roll_win",
        "autoencoder_threshold",
        // [current_thresholds]
        "current_thresholds",
        "current_thresholds.upper_critical",
        "current_thresholds.upper_warning",
        "current_thresholds.lower_warning",
        // [temperature_thresholds]
        "temperature_thresholds",
        "temperature_thresholds.upper_critical",
        "temperature_thresholds.upper_warning",
        "temperature_thresholds.lower_warning",
        // [normalizer]
        "normalizer",
        "normalizer.missing_field_policy",
        "normalizer.default_current",
        "normalizer.default_temperature",
        "normalizer.recency_window_minutes",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties go to the lexicographically smaller key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed ThresholdConfig.
///
/// Returns (errors, warnings). Errors are impossible values that must be
/// rejected; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::ThresholdConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Current is a magnitude: a negative tier can never be "reached from below"
    let c = &config.current_thresholds;
    for (name, value) in [
        ("upper_critical", c.upper_critical),
        ("upper_warning", c.upper_warning),
        ("lower_warning", c.lower_warning),
    ] {
        if value < 0.0 {
            errors.push(format!(
                "current_thresholds.{name} = {value:.2} cannot be negative (current is clipped at 0)"
            ));
        }
    }

    // Li-ion packs operate roughly between -40 and 150 °C
    let t = &config.temperature_thresholds;
    for (name, value) in [
        ("upper_critical", t.upper_critical),
        ("upper_warning", t.upper_warning),
        ("lower_warning", t.lower_warning),
    ] {
        if !(-40.0..=150.0).contains(&value) {
            warnings.push(ValidationWarning {
                field: format!("temperature_thresholds.{name}"),
                message: format!(
                    "temperature_thresholds.{name} = {value:.1} is outside typical range (-40 to 150 °C)"
                ),
                suggestion: None,
            });
        }
    }

    if config.roll_win > 1_000 {
        warnings.push(ValidationWarning {
            field: "roll_win".to_string(),
            message: format!(
                "roll_win = {} is unusually large, most batches will produce no feature rows",
                config.roll_win
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
