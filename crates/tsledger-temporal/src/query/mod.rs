//! Reconstruction algorithms. All are pure functions over the rows of one
//! series; the engine feeds them from an `ISeriesLog` scan.

pub mod bucket;
pub mod scenario;
pub mod snapshot;

pub use bucket::aggregate_buckets;
pub use scenario::{continuous_scenario, version_coverage};
pub use snapshot::snapshot_as_of;

use tsledger_core::models::ReconstructionMode;
use tsledger_core::SeriesRecord;

/// Route scanned rows to the algorithm for `mode`.
pub fn reconstruct(rows: &[SeriesRecord], mode: ReconstructionMode) -> Vec<SeriesRecord> {
    match mode {
        ReconstructionMode::SnapshotAsOf => snapshot_as_of(rows),
        ReconstructionMode::ContinuousScenario => continuous_scenario(rows),
    }
}
