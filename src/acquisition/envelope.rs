//! Response envelope unwrapping
//!
//! Telemetry APIs wrap their record lists differently (`data`, `Items`,
//! `records`, `result`, or a bare array). This turns any fetched document
//! into the flat record list the normalizer consumes.

use serde_json::Value;

/// Envelope keys checked before falling back to the first list-valued key.
const ENVELOPE_KEYS: [&str; 3] = ["data", "Items", "records"];

/// Extract the record list from a fetched JSON document.
///
/// - a top-level array is returned as-is
/// - an object yields the first of `data`/`Items`/`records` holding a list,
///   then `result` (a single object is wrapped), then the first list-valued
///   key, and finally the object itself as a single record
/// - any other scalar becomes a single record, which the normalizer drops
pub fn extract_records(document: Value) -> Vec<Value> {
    match document {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in ENVELOPE_KEYS {
                if matches!(map.get(key), Some(Value::Array(_))) {
                    if let Some(Value::Array(items)) = map.remove(key) {
                        return items;
                    }
                }
            }

            if let Some(result) = map.remove("result") {
                return match result {
                    Value::Array(items) => items,
                    other => vec![other],
                };
            }

            let first_list = map
                .iter()
                .find(|(_, v)| v.is_array())
                .map(|(k, _)| k.clone());
            if let Some(key) = first_list {
                tracing::debug!(key = %key, "Using first list-valued key as record list");
                if let Some(Value::Array(items)) = map.remove(&key) {
                    return items;
                }
            }

            vec![Value::Object(map)]
        }
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array_passthrough() {
        let records = extract_records(json!([{"ts": 1}, {"ts": 2}]));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_data_envelope() {
        let records = extract_records(json!({"status": "ok", "data": [{"ts": 1}]}));
        assert_eq!(records, vec![json!({"ts": 1})]);
    }

    #[test]
    fn test_dynamo_items_envelope() {
        let records = extract_records(json!({"Items": [{"ts": 1}, {"ts": 2}], "Count": 2}));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_single_result_is_wrapped() {
        let records = extract_records(json!({"result": {"ts": 5}}));
        assert_eq!(records, vec![json!({"ts": 5})]);
    }

    #[test]
    fn test_data_that_is_not_a_list_is_skipped() {
        let records = extract_records(json!({"data": {"total": 3}, "rows": [{"ts": 1}]}));
        assert_eq!(records, vec![json!({"ts": 1})]);
    }

    #[test]
    fn test_plain_object_is_single_record() {
        let records = extract_records(json!({"ts": 9, "current": 1.0}));
        assert_eq!(records, vec![json!({"ts": 9, "current": 1.0})]);
    }
}
