//! Time bucket reference data and aggregation types.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{TempoError, TempoResult};

/// Named bucketing granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Second,
    Minute,
    Hour,
    Day,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Second,
        Granularity::Minute,
        Granularity::Hour,
        Granularity::Day,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Second => "second",
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
            Granularity::Day => "day",
        }
    }

    /// Pattern seeded into `time_bucket_mask` for this granularity.
    pub fn default_pattern(&self) -> &'static str {
        match self {
            Granularity::Second => "%Y-%m-%dT%H:%M:%SZ",
            Granularity::Minute => "%Y-%m-%dT%H:%M:00Z",
            Granularity::Hour => "%Y-%m-%dT%H:00:00Z",
            Granularity::Day => "%Y-%m-%dT00:00:00Z",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = TempoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "second" => Ok(Granularity::Second),
            "minute" => Ok(Granularity::Minute),
            "hour" => Ok(Granularity::Hour),
            "day" => Ok(Granularity::Day),
            other => Err(TempoError::InvalidInput(format!(
                "unknown granularity '{other}' (expected second|minute|hour|day)"
            ))),
        }
    }
}

/// Read-only mapping from a granularity to the pattern that rounds a
/// timestamp down to its bucket label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucketMask {
    pub granularity: Granularity,
    pub pattern: String,
}

impl TimeBucketMask {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            pattern: granularity.default_pattern().to_string(),
        }
    }

    /// Format `ts` with this mask's pattern.
    pub fn bucket(&self, ts: DateTime<Utc>) -> TempoResult<String> {
        let items: Vec<Item<'_>> = StrftimeItems::new(&self.pattern).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return Err(TempoError::InvalidInput(format!(
                "invalid bucket pattern '{}' for granularity {}",
                self.pattern, self.granularity
            )));
        }

        let mut label = String::new();
        write!(label, "{}", ts.format_with_items(items.into_iter())).map_err(|_| {
            TempoError::InvalidInput(format!("cannot format {ts} with '{}'", self.pattern))
        })?;
        Ok(label)
    }
}

/// Aggregation applied to the numeric values that fall in one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggFunc {
    Min,
    Max,
    Avg,
    /// Value with the earliest effective time in the bucket.
    First,
    /// Value with the latest effective time in the bucket.
    Last,
}

/// One aggregated bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketPoint {
    pub bucket: String,
    pub value: f64,
    /// Number of points folded into this bucket.
    pub count: usize,
}
