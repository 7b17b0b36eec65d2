use serde_json::{Map, Value};

use crate::models::{GeneratedAt, HistoryEntry};

use super::fields::{first_non_null, is_present, text_field};
use super::timestamp::{canonicalize_millis, canonicalize_timestamp};

// Consulted only when neither `date_generated` nor `date_generated_ms` is set.
const FALLBACK_TIMESTAMP_KEYS: &[&str] = &[
    "generated_at",
    "date_created",
    "created_at",
    "timestamp",
    "createdAt",
];

const CANONICAL_KEYS: &[&str] = &["id", "title", "url", "date_generated"];

/// Normalizes a history listing, keeping the service's order.
///
/// Anything other than a JSON array yields an empty list.
pub fn normalize_history_list(raw: &Value) -> Vec<HistoryEntry> {
    let Some(items) = raw.as_array() else {
        tracing::debug!("History payload is not a list, treating as empty");
        return Vec::new();
    };

    items.iter().map(normalize_history_entry).collect()
}

fn normalize_history_entry(raw: &Value) -> HistoryEntry {
    let empty = Map::new();
    let object = raw.as_object().unwrap_or(&empty);

    let extra = object
        .iter()
        .filter(|(key, _)| !CANONICAL_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    HistoryEntry {
        id: object.get("id").and_then(integer_value).unwrap_or(0),
        title: text_field(object, &["title"]),
        url: text_field(object, &["url"]),
        date_generated: resolve_timestamp(object),
        extra,
    }
}

/// `date_generated` wins when present, then `date_generated_ms` read as
/// milliseconds. The remaining aliases are taken as-is unless null, so an
/// empty string there still means no date.
fn resolve_timestamp(object: &Map<String, Value>) -> GeneratedAt {
    if let Some(value) = object.get("date_generated").filter(|v| is_present(v)) {
        return canonicalize_timestamp(Some(value));
    }
    if let Some(value) = object.get("date_generated_ms").filter(|v| is_present(v)) {
        return canonicalize_millis(Some(value));
    }
    canonicalize_timestamp(first_non_null(object, FALLBACK_TIMESTAMP_KEYS))
}

fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
