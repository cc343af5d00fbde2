//! Reconstruction query types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which single-valued view to build from the bitemporal log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconstructionMode {
    /// Latest known value per effective time.
    SnapshotAsOf,
    /// Each version's timeline, owned until a newer version's knowledge begins.
    ContinuousScenario,
}

/// Reconstruct one series from `since` (inclusive, effective time) onward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionQuery {
    pub series_id: String,
    pub since: DateTime<Utc>,
    pub mode: ReconstructionMode,
}

impl ReconstructionQuery {
    pub fn snapshot_as_of(series_id: impl Into<String>, since: DateTime<Utc>) -> Self {
        Self {
            series_id: series_id.into(),
            since,
            mode: ReconstructionMode::SnapshotAsOf,
        }
    }

    pub fn continuous_scenario(series_id: impl Into<String>, since: DateTime<Utc>) -> Self {
        Self {
            series_id: series_id.into(),
            since,
            mode: ReconstructionMode::ContinuousScenario,
        }
    }
}

/// The effective-time span a version owns in a continuous scenario:
/// `[coverage_start, coverage_end)`, with `None` as +infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCoverage {
    pub version_ts: DateTime<Utc>,
    pub coverage_start: DateTime<Utc>,
    pub coverage_end: Option<DateTime<Utc>>,
}

impl VersionCoverage {
    pub fn contains(&self, effective_ts: DateTime<Utc>) -> bool {
        effective_ts >= self.coverage_start
            && self.coverage_end.map_or(true, |end| effective_ts < end)
    }

    /// True when a newer version starts at or before this one, leaving it nothing.
    pub fn is_empty(&self) -> bool {
        self.coverage_end
            .is_some_and(|end| end <= self.coverage_start)
    }
}
