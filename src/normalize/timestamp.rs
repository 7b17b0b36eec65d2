use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::models::GeneratedAt;

/// Epoch values below this are seconds, at or above it milliseconds.
const SECONDS_THRESHOLD: f64 = 1e12;

/// Largest epoch offset a date may carry, ±100,000,000 days.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

// Naive date-times from the service are UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Canonicalizes a timestamp whose unit is unknown.
///
/// Only null and blank strings are missing. Zero is the epoch itself.
pub fn canonicalize_timestamp(raw: Option<&Value>) -> GeneratedAt {
    canonicalize_with(raw, from_epoch)
}

/// Canonicalizes a timestamp known to hold epoch milliseconds.
pub fn canonicalize_millis(raw: Option<&Value>) -> GeneratedAt {
    canonicalize_with(raw, from_epoch_millis)
}

fn canonicalize_with(
    raw: Option<&Value>,
    epoch: fn(f64) -> Option<DateTime<Utc>>,
) -> GeneratedAt {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return GeneratedAt::Missing;
    };

    let parsed = match raw {
        Value::Number(n) => n.as_f64().and_then(epoch),
        Value::String(s) if s.trim().is_empty() => return GeneratedAt::Missing,
        Value::String(s) => parse_text(s.trim(), epoch),
        _ => None,
    };

    match parsed {
        Some(at) => GeneratedAt::At(at),
        None => {
            let raw_text = match raw {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            tracing::debug!("Unparseable timestamp {:?}, keeping raw value", raw_text);
            GeneratedAt::Raw(raw_text)
        }
    }
}

/// Interprets an epoch number, seconds or milliseconds by magnitude.
pub fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if value < SECONDS_THRESHOLD {
        from_epoch_millis(value * 1000.0)
    } else {
        from_epoch_millis(value)
    }
}

pub fn from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }

    let millis = millis.trunc();
    if millis.abs() > MAX_EPOCH_MILLIS {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

fn parse_text(text: &str, epoch: fn(f64) -> Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    if text.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(at) = text.parse::<u64>().ok().and_then(|n| epoch(n as f64)) {
            return Some(at);
        }
    }
    parse_date_string(text)
}

fn parse_date_string(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_rfc2822(text) {
        return Some(at.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(at) = DateTime::parse_from_str(text, format) {
            return Some(at.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> GeneratedAt {
        GeneratedAt::At(Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
    }

    #[test]
    fn test_seconds_and_millis_agree() {
        let secs = canonicalize_timestamp(Some(&json!(1700000000)));
        let millis = canonicalize_timestamp(Some(&json!(1700000000000_i64)));
        assert_eq!(secs, millis);
        assert_eq!(secs, at(2023, 11, 14, 22, 13, 20));
    }

    #[test]
    fn test_threshold_is_exact() {
        // Just below the threshold is still seconds, far in the future
        let below = from_epoch(999_999_999_999.0).unwrap();
        assert_eq!(below.timestamp(), 999_999_999_999);

        // At the threshold it is milliseconds, September 2001
        let at_threshold = from_epoch(1e12).unwrap();
        assert_eq!(at_threshold.timestamp(), 1_000_000_000);
    }

    #[test]
    fn test_digit_strings_are_epochs() {
        assert_eq!(
            canonicalize_timestamp(Some(&json!("1700000000"))),
            at(2023, 11, 14, 22, 13, 20)
        );
        assert_eq!(
            canonicalize_timestamp(Some(&json!("1700000000000"))),
            at(2023, 11, 14, 22, 13, 20)
        );
    }

    #[test]
    fn test_fractional_epoch_truncates() {
        let parsed = canonicalize_timestamp(Some(&json!(1700000000.5)));
        let expected = Utc.timestamp_millis_opt(1_700_000_000_500).unwrap();
        assert_eq!(parsed, GeneratedAt::At(expected));
    }

    #[test]
    fn test_iso_strings() {
        assert_eq!(
            canonicalize_timestamp(Some(&json!("2024-01-15T10:00:00Z"))),
            at(2024, 1, 15, 10, 0, 0)
        );
        assert_eq!(
            canonicalize_timestamp(Some(&json!("2024-01-15T12:00:00+02:00"))),
            at(2024, 1, 15, 10, 0, 0)
        );
        // Python isoformat() of a naive UTC datetime
        let naive = canonicalize_timestamp(Some(&json!("2024-01-15T10:00:00.123456")));
        assert_eq!(
            naive.instant().unwrap(),
            Utc.timestamp_micros(1_705_312_800_123_456).unwrap()
        );
        assert_eq!(
            canonicalize_timestamp(Some(&json!("2024-01-15 10:00:00"))),
            at(2024, 1, 15, 10, 0, 0)
        );
        assert_eq!(
            canonicalize_timestamp(Some(&json!("2024-01-15"))),
            at(2024, 1, 15, 0, 0, 0)
        );
    }

    #[test]
    fn test_rfc2822() {
        assert_eq!(
            canonicalize_timestamp(Some(&json!("Mon, 15 Jan 2024 10:00:00 +0000"))),
            at(2024, 1, 15, 10, 0, 0)
        );
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(canonicalize_timestamp(None), GeneratedAt::Missing);
        assert_eq!(canonicalize_timestamp(Some(&Value::Null)), GeneratedAt::Missing);
        assert_eq!(canonicalize_timestamp(Some(&json!(""))), GeneratedAt::Missing);
        assert_eq!(canonicalize_timestamp(Some(&json!("   "))), GeneratedAt::Missing);
    }

    #[test]
    fn test_zero_is_the_epoch() {
        assert_eq!(canonicalize_timestamp(Some(&json!(0))), at(1970, 1, 1, 0, 0, 0));
        assert_eq!(
            canonicalize_timestamp(Some(&json!(false))),
            GeneratedAt::Raw("false".to_string())
        );
    }

    #[test]
    fn test_millis_skip_the_threshold() {
        let parsed = canonicalize_millis(Some(&json!(999_999_999_999_i64)));
        assert_eq!(
            parsed.instant().unwrap(),
            Utc.timestamp_millis_opt(999_999_999_999).unwrap()
        );
        assert_eq!(
            canonicalize_millis(Some(&json!(1700000000000_i64))),
            at(2023, 11, 14, 22, 13, 20)
        );
        assert_eq!(canonicalize_millis(Some(&Value::Null)), GeneratedAt::Missing);
        assert_eq!(
            canonicalize_millis(Some(&json!(1e300))),
            GeneratedAt::Raw("1e+300".to_string())
        );
    }

    #[test]
    fn test_unparseable_falls_back_to_raw() {
        assert_eq!(
            canonicalize_timestamp(Some(&json!("not-a-date"))),
            GeneratedAt::Raw("not-a-date".to_string())
        );
        assert_eq!(
            canonicalize_timestamp(Some(&json!("99999999999999999999"))),
            GeneratedAt::Raw("99999999999999999999".to_string())
        );
        assert_eq!(
            canonicalize_timestamp(Some(&json!(1e300))),
            GeneratedAt::Raw("1e+300".to_string())
        );
        assert_eq!(
            canonicalize_timestamp(Some(&json!({"when": "now"}))),
            GeneratedAt::Raw(r#"{"when":"now"}"#.to_string())
        );
    }
}
