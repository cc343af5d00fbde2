//! ISeriesLog — the append/scan surface reconstruction needs from storage.

use chrono::{DateTime, Utc};

use crate::errors::TempoResult;
use crate::models::{Granularity, SeriesRecord, TimeBucketMask};

/// Append-only bitemporal log.
///
/// Implementations never update or delete committed records.
pub trait ISeriesLog: Send + Sync {
    /// Insert all records atomically. A duplicate
    /// `(series_id, effective_ts, version_ts)` rejects the whole batch.
    fn append(&self, records: &[SeriesRecord]) -> TempoResult<()>;

    /// Every record of `series_id` with `effective_ts >= since`, ordered by
    /// effective time then version time, both descending.
    fn scan_series(&self, series_id: &str, since: DateTime<Utc>) -> TempoResult<Vec<SeriesRecord>>;

    /// Bucket pattern for `granularity`. Stores with a reference table
    /// override this; the default is the built-in pattern.
    fn bucket_mask(&self, granularity: Granularity) -> TempoResult<TimeBucketMask> {
        Ok(TimeBucketMask::new(granularity))
    }
}
