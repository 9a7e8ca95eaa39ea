// ABOUTME: Defensive coercion of untrusted JSON values produced by AI collaborators
// ABOUTME: Non-finite or malformed numbers collapse to zero, labels are trimmed and lower-cased
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! Vision and text models return loosely typed JSON. Nothing from them reaches
//! the engine without passing through these helpers, which never fail: a value
//! that cannot be read as the expected shape degrades to a safe default.

use serde_json::Value;

/// Read a JSON value as a finite number, defaulting to `0.0`
///
/// Numbers and numeric strings are accepted; booleans count as `1`/`0`.
/// Everything else (null, arrays, objects, `NaN`, infinities, junk strings)
/// yields `0.0`.
#[must_use]
pub fn number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Read an optional field as a finite number, defaulting to `0.0`
#[must_use]
pub fn number_field(object: &Value, key: &str) -> f64 {
    object.get(key).map_or(0.0, number)
}

/// Read a field as text; numbers and booleans are stringified, absent values yield `None`
#[must_use]
pub fn text_field(object: &Value, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Read a field as a list of labels
///
/// Non-string elements are dropped. Remaining labels are trimmed,
/// lower-cased and empty ones discarded. A missing or non-array field is an
/// empty list.
#[must_use]
pub fn label_list(object: &Value, key: &str) -> Vec<String> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|label| label.trim().to_lowercase())
                .filter(|label| !label.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Read a field as a list of free-text strings, keeping case
#[must_use]
pub fn string_list(object: &Value, key: &str) -> Vec<String> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_accepts_numbers_and_numeric_strings() {
        assert!((number(&json!(12.5)) - 12.5).abs() < f64::EPSILON);
        assert!((number(&json!(" 42 ")) - 42.0).abs() < f64::EPSILON);
        assert!((number(&json!(true)) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_number_defaults_garbage_to_zero() {
        assert!(number(&json!("lots")).abs() < f64::EPSILON);
        assert!(number(&json!(null)).abs() < f64::EPSILON);
        assert!(number(&json!([1, 2])).abs() < f64::EPSILON);
        assert!(number(&json!("NaN")).abs() < f64::EPSILON);
        assert!(number(&json!("inf")).abs() < f64::EPSILON);
    }

    #[test]
    fn test_label_list_normalises_and_drops_non_strings() {
        let payload = json!({ "laggingMuscles": [" Chest ", 7, "", "REAR_DELTS", null] });
        assert_eq!(
            label_list(&payload, "laggingMuscles"),
            vec!["chest".to_owned(), "rear_delts".to_owned()]
        );
        assert!(label_list(&payload, "strongMuscles").is_empty());
    }
}
