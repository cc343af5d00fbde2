//! Criteria → parameterized SQL for any `TableRow`.
//!
//! Column names are spliced into SQL only after matching the row type's
//! column list; every literal is bound as a parameter.

use std::cmp::Ordering;

use rusqlite::types::Value;
use rusqlite::Connection;

use tsledger_core::codec::encode_timestamp;
use tsledger_core::models::{Filter, FilterValue, Predicate};
use tsledger_core::{Criteria, TempoError, TempoResult};

use crate::row::TableRow;
use crate::sqlite_errors::map_sqlite_err;

/// SQL text plus positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

fn bind<T: TableRow>(column: &str, value: &FilterValue) -> TempoResult<Value> {
    let numeric = matches!(value, FilterValue::Integer(_) | FilterValue::Real(_));
    if numeric && T::TEXT_COLUMNS.contains(&column) {
        return Err(TempoError::QueryError(format!(
            "numeric literal {value:?} on text column '{column}' would compare as text"
        )));
    }
    Ok(match value {
        FilterValue::Text(s) => Value::Text(s.clone()),
        FilterValue::Integer(i) => Value::Integer(*i),
        FilterValue::Real(f) => Value::Real(*f),
        FilterValue::Timestamp(ts) => Value::Text(
            encode_timestamp(*ts).map_err(|e| TempoError::QueryError(e.to_string()))?,
        ),
    })
}

fn check_column<T: TableRow>(column: &str) -> TempoResult<()> {
    if T::COLUMNS.contains(&column) {
        Ok(())
    } else {
        Err(TempoError::QueryError(format!(
            "unknown column '{column}' for {} (expected one of {:?})",
            T::TABLE,
            T::COLUMNS
        )))
    }
}

fn where_clause<T: TableRow>(filters: &[Filter], params: &mut Vec<Value>) -> TempoResult<String> {
    let mut clauses = Vec::with_capacity(filters.len());
    for filter in filters {
        check_column::<T>(&filter.column)?;
        match &filter.predicate {
            Predicate::Compare { op, value } => {
                params.push(bind::<T>(&filter.column, value)?);
                clauses.push(format!("{} {} ?{}", filter.column, op.as_sql(), params.len()));
            }
            Predicate::Between { low, high } => {
                match low.partial_cmp_same(high) {
                    Some(Ordering::Greater) => {
                        return Err(TempoError::QueryError(format!(
                            "inverted range on '{}': low is greater than high",
                            filter.column
                        )))
                    }
                    None => {
                        return Err(TempoError::QueryError(format!(
                            "range bounds on '{}' are not comparable",
                            filter.column
                        )))
                    }
                    Some(_) => {}
                }
                params.push(bind::<T>(&filter.column, low)?);
                params.push(bind::<T>(&filter.column, high)?);
                clauses.push(format!(
                    "{} BETWEEN ?{} AND ?{}",
                    filter.column,
                    params.len() - 1,
                    params.len()
                ));
            }
        }
    }
    Ok(if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    })
}

/// Build `SELECT <columns> FROM <table> ...` for `criteria`.
pub fn build_select<T: TableRow>(criteria: &Criteria) -> TempoResult<BoundQuery> {
    let mut params = Vec::new();
    let mut sql = format!("SELECT {} FROM {}", T::COLUMNS.join(", "), T::TABLE);
    sql.push_str(&where_clause::<T>(&criteria.filters, &mut params)?);

    if !criteria.order.is_empty() {
        let mut keys = Vec::with_capacity(criteria.order.len());
        for order in &criteria.order {
            check_column::<T>(&order.column)?;
            keys.push(format!("{} {}", order.column, order.direction.as_sql()));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&keys.join(", "));
    }

    for (name, bound) in [("limit", criteria.limit), ("offset", criteria.offset)] {
        if bound.is_some_and(|n| n > i64::MAX as u64) {
            return Err(TempoError::QueryError(format!(
                "{name} exceeds {}",
                i64::MAX
            )));
        }
    }

    match (criteria.limit, criteria.offset) {
        (Some(0), _) => {
            return Err(TempoError::QueryError("limit must be at least 1".to_string()));
        }
        (Some(limit), offset) => {
            sql.push_str(&format!(" LIMIT {limit} OFFSET {}", offset.unwrap_or(0)));
        }
        (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
        (None, None) => {}
    }

    Ok(BoundQuery { sql, params })
}

/// Count of rows `build_select` would return, pagination included.
pub fn build_count<T: TableRow>(criteria: &Criteria) -> TempoResult<BoundQuery> {
    let inner = build_select::<T>(criteria)?;
    Ok(BoundQuery {
        sql: format!("SELECT COUNT(*) FROM ({})", inner.sql),
        params: inner.params,
    })
}

pub fn query_rows<T: TableRow>(conn: &Connection, criteria: &Criteria) -> TempoResult<Vec<T>> {
    let query = build_select::<T>(criteria)?;
    let mut stmt = conn.prepare(&query.sql).map_err(map_sqlite_err)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(query.params.iter()), |row| {
            Ok(T::from_row(row))
        })
        .map_err(map_sqlite_err)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(map_sqlite_err)??);
    }
    Ok(results)
}

pub fn count_rows<T: TableRow>(conn: &Connection, criteria: &Criteria) -> TempoResult<u64> {
    let query = build_count::<T>(criteria)?;
    let n: i64 = conn
        .query_row(
            &query.sql,
            rusqlite::params_from_iter(query.params.iter()),
            |row| row.get(0),
        )
        .map_err(map_sqlite_err)?;
    Ok(n.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tsledger_core::models::Direction;
    use tsledger_core::SeriesRecord;

    #[test]
    fn empty_criteria_selects_everything() {
        let q = build_select::<SeriesRecord>(&Criteria::new()).unwrap();
        assert!(q.sql.starts_with("SELECT series_id, effective_ts"));
        assert!(!q.sql.contains("WHERE"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn filters_are_bound_in_order() {
        let since = Utc.timestamp_opt(10, 0).unwrap();
        let q = build_select::<SeriesRecord>(&Criteria::series_since("s1", since).limit(5)).unwrap();
        assert!(q.sql.contains("WHERE series_id = ?1 AND effective_ts >= ?2"));
        assert!(q.sql.ends_with("ORDER BY effective_ts DESC, version_ts DESC LIMIT 5 OFFSET 0"));
        assert_eq!(q.params[0], Value::Text("s1".into()));
        assert_eq!(q.params[1], Value::Text("1970-01-01T00:00:10.000000Z".into()));
    }

    #[test]
    fn between_uses_two_parameters() {
        let q = build_select::<SeriesRecord>(
            &Criteria::new().eq("series_id", "x").between("value", "a", "m"),
        )
        .unwrap();
        assert!(q.sql.contains("value BETWEEN ?2 AND ?3"));
        assert_eq!(q.params.len(), 3);
    }

    #[test]
    fn unknown_filter_column_is_query_error() {
        let err = build_select::<SeriesRecord>(&Criteria::new().eq("nope", 1i64)).unwrap_err();
        assert!(matches!(err, TempoError::QueryError(_)));
    }

    #[test]
    fn unknown_order_column_is_query_error() {
        let err = build_select::<SeriesRecord>(
            &Criteria::new().order_by("id; DROP TABLE series_log", Direction::Asc),
        )
        .unwrap_err();
        assert!(matches!(err, TempoError::QueryError(_)));
    }

    #[test]
    fn inverted_or_mixed_between_is_query_error() {
        let inverted = Criteria::new().between("series_id", "m", "a");
        assert!(matches!(
            build_select::<SeriesRecord>(&inverted),
            Err(TempoError::QueryError(_))
        ));
        let mixed = Criteria::new().between("effective_ts", 1i64, "z");
        assert!(matches!(
            build_select::<SeriesRecord>(&mixed),
            Err(TempoError::QueryError(_))
        ));
    }

    #[test]
    fn oversized_pagination_is_query_error() {
        let too_big = i64::MAX as u64 + 1;
        for criteria in [Criteria::new().limit(too_big), Criteria::new().offset(too_big)] {
            assert!(matches!(
                build_select::<SeriesRecord>(&criteria),
                Err(TempoError::QueryError(_))
            ));
        }
        let q = build_select::<SeriesRecord>(&Criteria::new().limit(i64::MAX as u64)).unwrap();
        assert!(q.sql.ends_with(&format!("LIMIT {} OFFSET 0", i64::MAX)));
    }

    #[test]
    fn numeric_literal_on_text_column_is_query_error() {
        for criteria in [
            Criteria::new().gt("value", 5.0),
            Criteria::new().eq("series_id", 7i64),
            Criteria::new().between("value", 1i64, 9i64),
        ] {
            assert!(matches!(
                build_select::<SeriesRecord>(&criteria),
                Err(TempoError::QueryError(_))
            ));
        }
        assert!(build_select::<SeriesRecord>(&Criteria::new().gt("value", "5")).is_ok());
    }

    #[test]
    fn out_of_range_timestamp_literal_is_query_error() {
        let far = Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            build_select::<SeriesRecord>(&Criteria::new().gte("effective_ts", far)),
            Err(TempoError::QueryError(_))
        ));
    }

    #[test]
    fn zero_limit_is_query_error() {
        assert!(matches!(
            build_select::<SeriesRecord>(&Criteria::new().limit(0)),
            Err(TempoError::QueryError(_))
        ));
    }

    #[test]
    fn offset_without_limit() {
        let q = build_select::<SeriesRecord>(&Criteria::new().offset(3)).unwrap();
        assert!(q.sql.ends_with("LIMIT -1 OFFSET 3"));
        let c = build_count::<SeriesRecord>(&Criteria::new().offset(3)).unwrap();
        assert!(c.sql.starts_with("SELECT COUNT(*) FROM (SELECT"));
    }
}
