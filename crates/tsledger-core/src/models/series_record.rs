//! The bitemporal fact and its tagged value.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{TempoError, TempoResult};

/// Declared interpretation of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Opaque text, stored and returned unchanged.
    Text,
    /// Decimal number, stored as its canonical decimal text.
    Numeric,
}

impl ValueKind {
    /// Stable tag persisted in the `value_kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Numeric => "numeric",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An observation value carrying its own kind tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SeriesValue {
    Text(String),
    Numeric(f64),
}

impl SeriesValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SeriesValue::Text(_) => ValueKind::Text,
            SeriesValue::Numeric(_) => ValueKind::Numeric,
        }
    }

    /// The numeric value. Fails on a text value rather than parsing it.
    pub fn as_numeric(&self) -> TempoResult<f64> {
        match self {
            SeriesValue::Numeric(v) => Ok(*v),
            SeriesValue::Text(s) => Err(TempoError::TypeMismatch {
                expected: ValueKind::Numeric.to_string(),
                found: format!("text value '{s}'"),
            }),
        }
    }

    /// The text value. Fails on a numeric value rather than formatting it.
    pub fn as_text(&self) -> TempoResult<&str> {
        match self {
            SeriesValue::Text(s) => Ok(s),
            SeriesValue::Numeric(v) => Err(TempoError::TypeMismatch {
                expected: ValueKind::Text.to_string(),
                found: format!("numeric value {v}"),
            }),
        }
    }
}

impl From<f64> for SeriesValue {
    fn from(v: f64) -> Self {
        SeriesValue::Numeric(v)
    }
}

impl From<&str> for SeriesValue {
    fn from(v: &str) -> Self {
        SeriesValue::Text(v.to_string())
    }
}

impl From<String> for SeriesValue {
    fn from(v: String) -> Self {
        SeriesValue::Text(v)
    }
}

/// One bitemporal fact.
///
/// `(series_id, effective_ts, version_ts)` is unique in the log. Records are
/// immutable once committed: re-asserting an effective time under a new
/// version time creates a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub series_id: String,
    /// What the observation is about.
    pub effective_ts: DateTime<Utc>,
    /// When the observation was asserted.
    pub version_ts: DateTime<Utc>,
    pub value: SeriesValue,
    pub metadata: serde_json::Value,
    /// Physical insertion time, set by the store. `None` before insert.
    pub created_at: Option<DateTime<Utc>>,
}

impl SeriesRecord {
    pub fn new(
        series_id: impl Into<String>,
        effective_ts: DateTime<Utc>,
        version_ts: DateTime<Utc>,
        value: impl Into<SeriesValue>,
    ) -> Self {
        Self {
            series_id: series_id.into(),
            effective_ts,
            version_ts,
            value: value.into(),
            metadata: serde_json::Value::Null,
            created_at: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}
