//! ReconstructionEngine: runs the reconstruction algorithms over an
//! `ISeriesLog` scan.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use tsledger_core::models::{BucketPoint, ReconstructionMode, ReconstructionQuery, VersionCoverage};
use tsledger_core::traits::{ISeriesLog, ISeriesReconstruction};
use tsledger_core::{AggFunc, Granularity, SeriesRecord, TempoResult};

use crate::query;

/// Read-only views over one log. Holds the log by `Arc` so several engines
/// (or other readers) can share a store.
pub struct ReconstructionEngine<L: ISeriesLog + ?Sized> {
    log: Arc<L>,
}

impl<L: ISeriesLog + ?Sized> ReconstructionEngine<L> {
    pub fn new(log: Arc<L>) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &Arc<L> {
        &self.log
    }

    fn scan(&self, series_id: &str, since: DateTime<Utc>) -> TempoResult<Vec<SeriesRecord>> {
        let rows = self.log.scan_series(series_id, since)?;
        debug!(series_id, %since, rows = rows.len(), "scanned series");
        Ok(rows)
    }

    /// Windows each version owns in the continuous scenario for this scan.
    pub fn version_coverage(
        &self,
        series_id: &str,
        since: DateTime<Utc>,
    ) -> TempoResult<Vec<VersionCoverage>> {
        Ok(query::version_coverage(&self.scan(series_id, since)?))
    }

    /// Reconstruct with `mode`, then aggregate per `granularity` bucket.
    pub fn bucketed(
        &self,
        series_id: &str,
        since: DateTime<Utc>,
        mode: ReconstructionMode,
        granularity: Granularity,
        func: AggFunc,
    ) -> TempoResult<Vec<BucketPoint>> {
        let mask = self.log.bucket_mask(granularity)?;
        let view = query::reconstruct(&self.scan(series_id, since)?, mode);
        let buckets = query::aggregate_buckets(&view, &mask, func)?;
        debug!(series_id, %granularity, points = view.len(), buckets = buckets.len(), "aggregated view");
        Ok(buckets)
    }
}

impl<L: ISeriesLog + ?Sized> ISeriesReconstruction for ReconstructionEngine<L> {
    fn snapshot_as_of(
        &self,
        series_id: &str,
        since: DateTime<Utc>,
    ) -> TempoResult<Vec<SeriesRecord>> {
        Ok(query::snapshot_as_of(&self.scan(series_id, since)?))
    }

    fn continuous_scenario(
        &self,
        series_id: &str,
        since: DateTime<Utc>,
    ) -> TempoResult<Vec<SeriesRecord>> {
        Ok(query::continuous_scenario(&self.scan(series_id, since)?))
    }

    fn reconstruct(&self, q: &ReconstructionQuery) -> TempoResult<Vec<SeriesRecord>> {
        let rows = self.scan(&q.series_id, q.since)?;
        Ok(query::reconstruct(&rows, q.mode))
    }
}
