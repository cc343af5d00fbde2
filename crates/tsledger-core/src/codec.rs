//! Value codec: typed observation values to and from their on-disk text.
//!
//! Numeric values use the shortest decimal text that parses back to the same
//! `f64`, so any value representable as an `f64` round-trips exactly. Decimal
//! inputs with more precision than an `f64` holds are rounded on the way in;
//! that loss is accepted, not a bug.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};

use crate::errors::{TempoError, TempoResult};
use crate::models::{SeriesValue, ValueKind};

/// Encode a value to its stored text.
pub fn encode(value: &SeriesValue) -> String {
    match value {
        SeriesValue::Text(s) => s.clone(),
        SeriesValue::Numeric(v) => v.to_string(),
    }
}

/// Decode stored text under a declared kind.
pub fn decode(text: &str, kind: ValueKind) -> TempoResult<SeriesValue> {
    match kind {
        ValueKind::Text => Ok(SeriesValue::Text(text.to_string())),
        ValueKind::Numeric => text
            .trim()
            .parse::<f64>()
            .map(SeriesValue::Numeric)
            .map_err(|_| TempoError::TypeMismatch {
                expected: ValueKind::Numeric.to_string(),
                found: format!("non-numeric text '{text}'"),
            }),
    }
}

/// Parse a persisted `value_kind` tag.
pub fn parse_kind(tag: &str) -> TempoResult<ValueKind> {
    match tag {
        "text" => Ok(ValueKind::Text),
        "numeric" => Ok(ValueKind::Numeric),
        other => Err(TempoError::TypeMismatch {
            expected: "text|numeric".to_string(),
            found: format!("value kind tag '{other}'"),
        }),
    }
}

/// Decode stored text under a persisted kind tag.
pub fn decode_tagged(text: &str, tag: &str) -> TempoResult<SeriesValue> {
    decode(text, parse_kind(tag)?)
}

/// Years with a four-digit RFC 3339 rendering. Outside this range chrono
/// emits a sign and extra digits, which breaks text ordering.
pub const ENCODABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Fixed-width UTC text: lexicographic order equals chronological order.
/// Precision is truncated to microseconds. Years outside
/// [`ENCODABLE_YEARS`] are `InvalidInput`.
pub fn encode_timestamp(ts: DateTime<Utc>) -> TempoResult<String> {
    if !ENCODABLE_YEARS.contains(&ts.year()) {
        return Err(TempoError::InvalidInput(format!(
            "timestamp {ts} is outside years 0000-9999"
        )));
    }
    Ok(ts.to_rfc3339_opts(SecondsFormat::Micros, true))
}

pub fn decode_timestamp(text: &str) -> TempoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TempoError::TypeMismatch {
            expected: "RFC 3339 timestamp".to_string(),
            found: format!("'{text}' ({e})"),
        })
}
