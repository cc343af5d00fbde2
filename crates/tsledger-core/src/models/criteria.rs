//! Declarative filter / order / pagination criteria for typed log queries.
//!
//! Criteria carry column names as plain strings; the storage layer checks
//! them against the target row type's column list before building SQL.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comparison used by a single-value filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// A literal compared against a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Timestamp(DateTime<Utc>),
}

impl FilterValue {
    /// Ordering between two literals of the same variant. `None` when the
    /// variants differ or a float is NaN.
    pub fn partial_cmp_same(&self, other: &FilterValue) -> Option<Ordering> {
        match (self, other) {
            (FilterValue::Text(a), FilterValue::Text(b)) => Some(a.cmp(b)),
            (FilterValue::Integer(a), FilterValue::Integer(b)) => Some(a.cmp(b)),
            (FilterValue::Real(a), FilterValue::Real(b)) => a.partial_cmp(b),
            (FilterValue::Timestamp(a), FilterValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Integer(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Real(v)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(v: DateTime<Utc>) -> Self {
        FilterValue::Timestamp(v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    Compare { op: CompareOp, value: FilterValue },
    /// Inclusive on both ends.
    Between { low: FilterValue, high: FilterValue },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    pub predicate: Predicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// Filters are ANDed; ordering keys apply in the order they were added.
/// Integer and real literals are only accepted on numeric columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub filters: Vec<Filter>,
    pub order: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of one series at or after `since`, newest effective time first.
    /// This is the scan both reconstruction algorithms start from.
    pub fn series_since(series_id: &str, since: DateTime<Utc>) -> Self {
        Self::new()
            .eq("series_id", series_id)
            .gte("effective_ts", since)
            .order_by("effective_ts", Direction::Desc)
            .order_by("version_ts", Direction::Desc)
    }

    fn compare(mut self, column: &str, op: CompareOp, value: FilterValue) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            predicate: Predicate::Compare { op, value },
        });
        self
    }

    pub fn eq(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.compare(column, CompareOp::Eq, value.into())
    }

    pub fn gt(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.compare(column, CompareOp::Gt, value.into())
    }

    pub fn gte(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.compare(column, CompareOp::Gte, value.into())
    }

    pub fn lt(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.compare(column, CompareOp::Lt, value.into())
    }

    pub fn lte(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.compare(column, CompareOp::Lte, value.into())
    }

    pub fn between(
        mut self,
        column: &str,
        low: impl Into<FilterValue>,
        high: impl Into<FilterValue>,
    ) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            predicate: Predicate::Between {
                low: low.into(),
                high: high.into(),
            },
        });
        self
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order.push(OrderBy {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}
