//! ISeriesReconstruction — single-valued views over the bitemporal log.

use chrono::{DateTime, Utc};

use crate::errors::TempoResult;
use crate::models::{ReconstructionQuery, SeriesRecord};

/// Both views are read-only, scoped to one series per call, and ordered by
/// effective time descending. An unknown series yields an empty result.
pub trait ISeriesReconstruction: Send + Sync {
    /// Latest known value per effective time.
    fn snapshot_as_of(&self, series_id: &str, since: DateTime<Utc>)
        -> TempoResult<Vec<SeriesRecord>>;

    /// Each version's timeline, superseded only where a newer version starts.
    fn continuous_scenario(
        &self,
        series_id: &str,
        since: DateTime<Utc>,
    ) -> TempoResult<Vec<SeriesRecord>>;

    /// Dispatch on `query.mode`.
    fn reconstruct(&self, query: &ReconstructionQuery) -> TempoResult<Vec<SeriesRecord>>;
}
