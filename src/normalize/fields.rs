use std::collections::HashSet;

use serde_json::{Map, Value};

/// Presence test behind every alias lookup: null, false, zero and the empty
/// string count as absent. Empty arrays and objects are present.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns the value of the first key in `keys` holding a present value.
pub fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| is_present(value))
}

/// Returns the value of the first key in `keys` that is set and not null.
pub fn first_non_null<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

/// Text form of a scalar. Arrays, objects and null have none.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn text_field(object: &Map<String, Value>, keys: &[&str]) -> String {
    first_present(object, keys)
        .and_then(scalar_text)
        .unwrap_or_default()
}

/// Flattens a list-ish value into distinct, non-empty strings in first-seen order.
///
/// Sequences are taken element by element, keyed mappings (grouped entities
/// such as `{"person": [..], "place": [..]}`) contribute each value or each
/// element of a sequence value, and a bare scalar becomes a single entry.
pub fn string_list(value: &Value) -> Vec<String> {
    let mut flat: Vec<&Value> = Vec::new();
    match value {
        Value::Array(items) => flat.extend(items),
        Value::Object(groups) => {
            for group in groups.values() {
                match group {
                    Value::Array(items) => flat.extend(items),
                    other => flat.push(other),
                }
            }
        }
        scalar => flat.push(scalar),
    }

    let mut seen = HashSet::new();
    flat.into_iter()
        .filter(|v| is_present(v))
        .filter_map(scalar_text)
        .filter(|s| !s.trim().is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Answer options keep their order and duplicates; only unusable entries are dropped.
pub fn option_list(value: &Value) -> Vec<String> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(choices) => choices.values().collect(),
        scalar => vec![scalar],
    };

    items
        .into_iter()
        .filter_map(scalar_text)
        .filter(|s| !s.trim().is_empty())
        .collect()
}
