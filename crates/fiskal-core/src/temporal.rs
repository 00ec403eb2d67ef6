//! # Temporal Codec
//!
//! Converts receipt moments into the scaled-integer timestamp wire shape.
//!
//! ```text
//! "2021-01-01T00:00:00Z"  →  { value: 1609459200000, scale: 4, kind: 2 }
//!                                     │                  │         │
//!                       epoch milliseconds ──────────────┘         │
//!                       scale 4 = value is in milliseconds         │
//!                       kind 2 = absolute instant, no tz shift ────┘
//! ```
//!
//! `scale` and `kind` are constants of the wire format, not knobs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire `scale`: the value is expressed in milliseconds.
pub const TIMESTAMP_SCALE_MILLISECONDS: i32 = 4;

/// Wire `kind` for an absolute instant.
pub const TIMESTAMP_KIND: i32 = 2;

/// Scaled-integer timestamp as the signing service expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTimestamp {
    pub value: i64,
    pub scale: i32,
    pub kind: i32,
}

/// Encodes an instant.
#[inline]
pub fn encode(moment: DateTime<Utc>) -> WireTimestamp {
    WireTimestamp {
        value: moment.timestamp_millis(),
        scale: TIMESTAMP_SCALE_MILLISECONDS,
        kind: TIMESTAMP_KIND,
    }
}

/// Encodes an optional instant; absent stays absent.
#[inline]
pub fn encode_opt(moment: Option<DateTime<Utc>>) -> Option<WireTimestamp> {
    moment.map(encode)
}

// =============================================================================
// Parsing
// =============================================================================

/// Resolves a document value to an instant.
///
/// ## Accepted Forms
/// | JSON value                    | Read as                          |
/// |-------------------------------|----------------------------------|
/// | `null`, `""`                  | absent                           |
/// | `"2021-01-01T10:00:00+01:00"` | RFC 3339, offset applied         |
/// | `"2021-01-01T09:00:00.250"`   | naive date-time, taken as UTC    |
/// | `"2021-01-01"`                | midnight UTC                     |
/// | `1609459200000`               | epoch milliseconds               |
///
/// `Err` carries a reason suitable for a `DocumentMalformed` error.
pub fn parse_moment(value: &Value) -> Result<Option<DateTime<Utc>>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_moment_text(s.trim()).map(Some),
        Value::Number(n) => {
            let millis: i64 = n
                .to_string()
                .parse()
                .map_err(|_| format!("'{}' is not an integer millisecond timestamp", n))?;
            DateTime::<Utc>::from_timestamp_millis(millis)
                .map(Some)
                .ok_or_else(|| format!("{} is out of range", millis))
        }
        other => Err(format!("expected a date-time, got {}", other)),
    }
}

fn parse_moment_text(text: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(moment) = DateTime::parse_from_rfc3339(text) {
        return Ok(moment.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{}' is not a date-time", text))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> DateTime<Utc> {
        parse_moment(&value).unwrap().unwrap()
    }

    #[test]
    fn test_encode_new_year_2021() {
        let wire = encode(parse(json!("2021-01-01T00:00:00Z")));
        assert_eq!(
            wire,
            WireTimestamp {
                value: 1_609_459_200_000,
                scale: 4,
                kind: 2,
            }
        );
    }

    #[test]
    fn test_offset_is_applied() {
        let wire = encode(parse(json!("2021-01-01T01:00:00+01:00")));
        assert_eq!(wire.value, 1_609_459_200_000);
    }

    #[test]
    fn test_naive_and_date_only_read_as_utc() {
        assert_eq!(encode(parse(json!("2021-01-01T00:00:00.250"))).value, 1_609_459_200_250);
        assert_eq!(encode(parse(json!("2021-01-01"))).value, 1_609_459_200_000);
    }

    #[test]
    fn test_epoch_millis_number() {
        assert_eq!(encode(parse(json!(1_609_459_200_000_i64))).value, 1_609_459_200_000);
    }

    #[test]
    fn test_absent_stays_absent() {
        assert_eq!(parse_moment(&Value::Null).unwrap(), None);
        assert_eq!(parse_moment(&json!("")).unwrap(), None);
        assert_eq!(encode_opt(None), None);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(parse_moment(&json!("yesterday")).is_err());
        assert!(parse_moment(&json!(true)).is_err());
        assert!(parse_moment(&json!(1.5)).is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(encode(parse(json!("2021-01-01T00:00:00Z")))).unwrap();
        assert_eq!(json, json!({ "value": 1_609_459_200_000_i64, "scale": 4, "kind": 2 }));
    }
}
