//! Bucketed aggregation of a reconstructed view.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tsledger_core::models::BucketPoint;
use tsledger_core::{AggFunc, SeriesRecord, TempoResult, TimeBucketMask};

/// Running state for one bucket.
#[derive(Debug, Clone, Copy)]
struct Acc {
    min: f64,
    max: f64,
    sum: f64,
    count: usize,
    first: (DateTime<Utc>, DateTime<Utc>, f64),
    last: (DateTime<Utc>, DateTime<Utc>, f64),
}

impl Acc {
    fn new(effective: DateTime<Utc>, version: DateTime<Utc>, value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
            first: (effective, version, value),
            last: (effective, version, value),
        }
    }

    fn push(&mut self, effective: DateTime<Utc>, version: DateTime<Utc>, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
        // Equal effective times: newer version wins both ends.
        if (effective, std::cmp::Reverse(version)) < (self.first.0, std::cmp::Reverse(self.first.1)) {
            self.first = (effective, version, value);
        }
        if (effective, version) > (self.last.0, self.last.1) {
            self.last = (effective, version, value);
        }
    }

    fn finish(&self, func: AggFunc) -> f64 {
        match func {
            AggFunc::Min => self.min,
            AggFunc::Max => self.max,
            AggFunc::Avg => self.sum / self.count as f64,
            AggFunc::First => self.first.2,
            AggFunc::Last => self.last.2,
        }
    }
}

/// Group numeric points by `mask` label and fold each group with `func`.
/// Output is ordered by bucket label descending. A text value anywhere in
/// `points` is a `TypeMismatch`.
pub fn aggregate_buckets(
    points: &[SeriesRecord],
    mask: &TimeBucketMask,
    func: AggFunc,
) -> TempoResult<Vec<BucketPoint>> {
    let mut buckets: BTreeMap<String, Acc> = BTreeMap::new();
    for point in points {
        let value = point.value.as_numeric()?;
        let label = mask.bucket(point.effective_ts)?;
        buckets
            .entry(label)
            .and_modify(|acc| acc.push(point.effective_ts, point.version_ts, value))
            .or_insert_with(|| Acc::new(point.effective_ts, point.version_ts, value));
    }

    Ok(buckets
        .into_iter()
        .rev()
        .map(|(bucket, acc)| BucketPoint {
            bucket,
            value: acc.finish(func),
            count: acc.count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tsledger_core::{Granularity, TempoError};

    fn rec(eff: i64, ver: i64, v: f64) -> SeriesRecord {
        SeriesRecord::new(
            "s",
            Utc.timestamp_opt(eff, 0).unwrap(),
            Utc.timestamp_opt(ver, 0).unwrap(),
            v,
        )
    }

    fn hourly() -> TimeBucketMask {
        TimeBucketMask::new(Granularity::Hour)
    }

    #[test]
    fn averages_per_hour() {
        let points = vec![rec(0, 1, 1.0), rec(1800, 1, 3.0), rec(3600, 1, 10.0)];
        let out = aggregate_buckets(&points, &hourly(), AggFunc::Avg).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].bucket, "1970-01-01T01:00:00Z");
        assert_eq!(out[0].value, 10.0);
        assert_eq!(out[1].bucket, "1970-01-01T00:00:00Z");
        assert_eq!(out[1].value, 2.0);
        assert_eq!(out[1].count, 2);
    }

    #[test]
    fn first_and_last_follow_effective_time() {
        // Deliberately out of order.
        let points = vec![rec(1200, 1, 5.0), rec(60, 1, 7.0), rec(2400, 1, 1.0)];
        let first = aggregate_buckets(&points, &hourly(), AggFunc::First).unwrap();
        let last = aggregate_buckets(&points, &hourly(), AggFunc::Last).unwrap();
        assert_eq!(first[0].value, 7.0);
        assert_eq!(last[0].value, 1.0);
    }

    #[test]
    fn min_max_per_day() {
        let points = vec![rec(10, 1, -4.0), rec(50_000, 1, 12.5), rec(86_400, 1, 0.0)];
        let mask = TimeBucketMask::new(Granularity::Day);
        let max = aggregate_buckets(&points, &mask, AggFunc::Max).unwrap();
        let min = aggregate_buckets(&points, &mask, AggFunc::Min).unwrap();
        assert_eq!(max[1].value, 12.5);
        assert_eq!(min[1].value, -4.0);
        assert_eq!(max[0].bucket, "1970-01-02T00:00:00Z");
    }

    #[test]
    fn text_values_are_rejected() {
        let points = vec![
            rec(0, 1, 1.0),
            SeriesRecord::new("s", Utc.timestamp_opt(5, 0).unwrap(), Utc.timestamp_opt(1, 0).unwrap(), "n/a"),
        ];
        let err = aggregate_buckets(&points, &hourly(), AggFunc::Avg).unwrap_err();
        assert!(matches!(err, TempoError::TypeMismatch { .. }));
    }

    #[test]
    fn empty_input() {
        assert!(aggregate_buckets(&[], &hourly(), AggFunc::Max).unwrap().is_empty());
    }
}
