//! Raw record adapters
//!
//! Source systems deliver telemetry in two shapes:
//!
//! - **Flat field**: `{"ts": 1700000000, "current": 12.5, "temperature": 31.2}`
//!   (numbers may arrive as strings or decimals)
//! - **Nested payload**: a charger `payload` list of `{"Key", "Value"}`
//!   entries; readings live under `meterValue` → `sampledValue`, each sampled
//!   entry carrying a `measurand` and a string `value`
//!
//! The adapter is picked by probing for the `payload` list. Every adapter
//! yields either the canonical reading pair or a drop reason; unknown shapes
//! are dropped, never fatal.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::config::{MissingFieldPolicy, NormalizerConfig};
use crate::types::TelemetrySample;

/// Timestamp fields, in priority order.
pub mod timestamp_fields {
    /// Epoch seconds (number or numeric string)
    pub const EPOCH: &str = "ts";
    /// ISO-8601 creation time
    pub const CREATED_AT: &str = "createdat";
    /// ISO-8601 fallback
    pub const DATE: &str = "date";
}

/// Measurand substrings in nested charger payloads.
pub mod measurands {
    pub const CURRENT: &str = "Current.Import";
    pub const TEMPERATURE: &str = "Temperature";
}

/// Why a raw record did not become a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// The record is not a JSON object
    NotAnObject,
    /// None of the timestamp fields parsed
    NoTimestamp,
    /// A current/temperature value was present but not a finite number
    UnparseableReading,
    /// A reading was absent and the policy is `Drop`
    MissingReading,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::NotAnObject => write!(f, "record is not an object"),
            DropReason::NoTimestamp => write!(f, "no usable timestamp"),
            DropReason::UnparseableReading => write!(f, "unparseable current/temperature"),
            DropReason::MissingReading => write!(f, "missing current/temperature"),
        }
    }
}

/// Current/temperature as found in a record, before defaulting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Readings {
    pub current: Option<f64>,
    pub temperature: Option<f64>,
}

/// The closed set of supported record shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAdapter {
    FlatField,
    NestedPayload,
}

impl RecordAdapter {
    /// Select the adapter for a record by probing for known keys.
    pub fn probe(record: &Map<String, Value>) -> Self {
        match record.get("payload") {
            Some(Value::Array(_)) => RecordAdapter::NestedPayload,
            _ => RecordAdapter::FlatField,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordAdapter::FlatField => "flat_field",
            RecordAdapter::NestedPayload => "nested_payload",
        }
    }

    /// Extract current/temperature using this adapter's layout.
    pub fn readings(&self, record: &Map<String, Value>) -> Result<Readings, DropReason> {
        match self {
            RecordAdapter::FlatField => flat_readings(record),
            RecordAdapter::NestedPayload => nested_readings(record),
        }
    }
}

/// Convert one raw record into a sample, or say why it was dropped.
pub fn adapt_record(raw: &Value, policy: &NormalizerConfig) -> Result<TelemetrySample, DropReason> {
    let record = raw.as_object().ok_or(DropReason::NotAnObject)?;
    let timestamp = extract_timestamp(record).ok_or(DropReason::NoTimestamp)?;
    let readings = RecordAdapter::probe(record).readings(record)?;

    let (current, temperature) = match (readings.current, readings.temperature, policy.missing_field_policy) {
        (Some(c), Some(t), _) => (c, t),
        (c, t, MissingFieldPolicy::Substitute) => (
            c.unwrap_or(policy.default_current),
            t.unwrap_or(policy.default_temperature),
        ),
        (_, _, MissingFieldPolicy::Drop) => return Err(DropReason::MissingReading),
    };

    Ok(TelemetrySample::new(timestamp, current, temperature))
}

// ============================================================================
// Timestamps
// ============================================================================

/// Epoch seconds from `ts`, else `createdat`, else `date`.
///
/// A field that is present but unparseable falls through to the next one.
pub fn extract_timestamp(record: &Map<String, Value>) -> Option<i64> {
    record
        .get(timestamp_fields::EPOCH)
        .and_then(epoch_seconds)
        .or_else(|| record.get(timestamp_fields::CREATED_AT).and_then(iso_seconds))
        .or_else(|| record.get(timestamp_fields::DATE).and_then(iso_seconds))
}

fn epoch_seconds(value: &Value) -> Option<i64> {
    let secs = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?,
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?
        }
        _ => return None,
    };
    Some(secs)
}

/// ISO-8601 to epoch seconds. Strings without an offset are read as UTC.
fn iso_seconds(value: &Value) -> Option<i64> {
    let s = value.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().timestamp());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc).timestamp())
}

// ============================================================================
// Numeric Values
// ============================================================================

/// `Ok(None)` for absent values (null, empty string); `Err` for anything
/// present that is not a finite number.
fn reading_value(value: Option<&Value>) -> Result<Option<f64>, DropReason> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or(DropReason::UnparseableReading)
}

fn flat_readings(record: &Map<String, Value>) -> Result<Readings, DropReason> {
    Ok(Readings {
        current: reading_value(record.get("current"))?,
        temperature: reading_value(record.get("temperature"))?,
    })
}

// ============================================================================
// Nested Payload Walk
// ============================================================================

fn tagged<'a>(entry: &'a Value, key: &str) -> Option<&'a Value> {
    let obj = entry.as_object()?;
    (obj.get("Key")?.as_str()? == key).then(|| obj.get("Value")).flatten()
}

fn nested_readings(record: &Map<String, Value>) -> Result<Readings, DropReason> {
    let mut readings = Readings::default();
    let Some(Value::Array(payload)) = record.get("payload") else {
        return Ok(readings);
    };

    // Later meterValue entries overwrite earlier ones
    for meter_value in payload.iter().filter_map(|entry| tagged(entry, "meterValue")) {
        let Some(Value::Array(first)) = meter_value.as_array().and_then(|mv| mv.first()) else {
            continue;
        };
        for sampled in first.iter().filter_map(|field| tagged(field, "sampledValue")) {
            let Some(samples) = sampled.as_array() else {
                continue;
            };
            for sample in samples.iter().filter_map(Value::as_array) {
                apply_sample(sample, &mut readings)?;
            }
        }
    }

    Ok(readings)
}

fn apply_sample(fields: &[Value], readings: &mut Readings) -> Result<(), DropReason> {
    let mut measurand: Option<&str> = None;
    let mut value: Option<&Value> = None;
    for field in fields {
        if let Some(m) = tagged(field, "measurand") {
            measurand = m.as_str();
        } else if let Some(v) = tagged(field, "value") {
            value = Some(v);
        }
    }

    // Other measurands (SoC, Voltage, Energy) are ignored, parseable or not
    let slot = match measurand {
        Some(m) if m.contains(measurands::CURRENT) => &mut readings.current,
        Some(m) if m.contains(measurands::TEMPERATURE) => &mut readings.temperature,
        _ => return Ok(()),
    };
    if let Some(parsed) = reading_value(value)? {
        *slot = Some(parsed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn charger_record(current: &str, temperature: &str) -> Value {
        json!({
            "createdat": "2024-03-01T10:00:00Z",
            "payload": [
                {"Key": "connectorId", "Value": 1},
                {"Key": "meterValue", "Value": [[
                    {"Key": "timestamp", "Value": "2024-03-01T10:00:00Z"},
                    {"Key": "sampledValue", "Value": [
                        [
                            {"Key": "value", "Value": current},
                            {"Key": "measurand", "Value": "Current.Import"},
                            {"Key": "unit", "Value": "A"}
                        ],
                        [
                            {"Key": "measurand", "Value": "Temperature"},
                            {"Key": "value", "Value": temperature}
                        ],
                        [
                            {"Key": "measurand", "Value": "Energy.Active.Import.Register"},
                            {"Key": "value", "Value": "1520.0"}
                        ]
                    ]}
                ]]}
            ]
        })
    }

    #[test]
    fn test_probe_selects_adapter() {
        let flat = json!({"ts": 1, "current": 1.0});
        let nested = charger_record("1.0", "30.0");
        assert_eq!(RecordAdapter::probe(flat.as_object().expect("object")), RecordAdapter::FlatField);
        assert_eq!(RecordAdapter::probe(nested.as_object().expect("object")), RecordAdapter::NestedPayload);
    }

    #[test]
    fn test_flat_record_with_string_numbers() {
        let raw = json!({"ts": "1700000000", "current": " 12.5 ", "temperature": 31});
        let sample = adapt_record(&raw, &NormalizerConfig::default()).expect("valid record");
        assert_eq!(sample, TelemetrySample::new(1_700_000_000, 12.5, 31.0));
    }

    #[test]
    fn test_nested_payload_extracts_measurands() {
        let raw = charger_record("16.2", "41.5");
        let sample = adapt_record(&raw, &NormalizerConfig::default()).expect("valid record");
        assert_eq!(sample.timestamp, 1_709_287_200);
        assert_eq!(sample.current, 16.2);
        assert_eq!(sample.temperature, 41.5);
    }

    #[test]
    fn test_nested_unparseable_value_drops_record() {
        let raw = charger_record("sixteen", "41.5");
        assert_eq!(
            adapt_record(&raw, &NormalizerConfig::default()),
            Err(DropReason::UnparseableReading)
        );
    }

    #[test]
    fn test_unparseable_unrelated_measurand_is_ignored() {
        let raw = json!({
            "ts": 1_709_287_200,
            "payload": [{"Key": "meterValue", "Value": [[
                {"Key": "sampledValue", "Value": [
                    [{"Key": "measurand", "Value": "Current.Import"}, {"Key": "value", "Value": "12.0"}],
                    [{"Key": "measurand", "Value": "SoC"}, {"Key": "value", "Value": "N/A"}],
                    [{"Key": "measurand", "Value": "Temperature"}, {"Key": "value", "Value": "31.0"}]
                ]}
            ]]}]
        });
        let sample = adapt_record(&raw, &NormalizerConfig::default()).expect("valid readings kept");
        assert_eq!(sample, TelemetrySample::new(1_709_287_200, 12.0, 31.0));
    }

    #[test]
    fn test_missing_readings_substituted_by_default() {
        let raw = json!({"ts": 100});
        let sample = adapt_record(&raw, &NormalizerConfig::default()).expect("substituted");
        assert_eq!(sample.current, 0.0);
        assert_eq!(sample.temperature, 50.0);
    }

    #[test]
    fn test_missing_readings_dropped_under_drop_policy() {
        let policy = NormalizerConfig {
            missing_field_policy: MissingFieldPolicy::Drop,
            ..NormalizerConfig::default()
        };
        let raw = json!({"ts": 100, "current": 3.0});
        assert_eq!(adapt_record(&raw, &policy), Err(DropReason::MissingReading));
    }

    #[test]
    fn test_timestamp_priority_and_fallback() {
        let both = json!({"ts": 42, "createdat": "2024-03-01T10:00:00Z"});
        assert_eq!(extract_timestamp(both.as_object().expect("object")), Some(42));

        let bad_epoch = json!({"ts": "soon", "date": "2024-03-01T10:00:00+00:00"});
        assert_eq!(extract_timestamp(bad_epoch.as_object().expect("object")), Some(1_709_287_200));

        let naive = json!({"createdat": "2024-03-01 10:00:00"});
        assert_eq!(extract_timestamp(naive.as_object().expect("object")), Some(1_709_287_200));

        let none = json!({"createdat": "yesterday"});
        assert_eq!(extract_timestamp(none.as_object().expect("object")), None);
    }

    #[test]
    fn test_iso_offset_converted_to_utc() {
        let raw = json!({"date": "2024-03-01T15:30:00+05:30"});
        assert_eq!(extract_timestamp(raw.as_object().expect("object")), Some(1_709_287_200));
    }

    #[test]
    fn test_non_object_dropped() {
        assert_eq!(
            adapt_record(&json!([1, 2, 3]), &NormalizerConfig::default()),
            Err(DropReason::NotAnObject)
        );
    }

    #[test]
    fn test_nan_string_is_unparseable() {
        let raw = json!({"ts": 1, "current": "NaN", "temperature": 30.0});
        assert_eq!(
            adapt_record(&raw, &NormalizerConfig::default()),
            Err(DropReason::UnparseableReading)
        );
    }
}
