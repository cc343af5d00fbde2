//! Continuous-scenario reconstruction.
//!
//! Each version owns effective times from its own earliest row up to (not
//! including) the earliest row of the next newer version. The newest version
//! owns everything from its start onward. Windows are computed from the
//! rows handed in, so a `since` cutoff on the scan moves them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tsledger_core::models::VersionCoverage;
use tsledger_core::SeriesRecord;

/// Per-version windows, newest version first.
pub fn version_coverage(rows: &[SeriesRecord]) -> Vec<VersionCoverage> {
    let mut starts: BTreeMap<DateTime<Utc>, DateTime<Utc>> = BTreeMap::new();
    for row in rows {
        starts
            .entry(row.version_ts)
            .and_modify(|start| *start = (*start).min(row.effective_ts))
            .or_insert(row.effective_ts);
    }

    let mut coverage = Vec::with_capacity(starts.len());
    let mut newer_start: Option<DateTime<Utc>> = None;
    for (version_ts, coverage_start) in starts.into_iter().rev() {
        coverage.push(VersionCoverage {
            version_ts,
            coverage_start,
            coverage_end: newer_start,
        });
        newer_start = Some(coverage_start);
    }
    coverage
}

/// Rows inside their version's window, ordered by effective time then
/// version time, both descending.
///
/// Overlapping versions follow the start rule strictly: an older version
/// whose window is empty contributes nothing, and an older version's rows
/// after its window are dropped even where no newer row replaces them.
pub fn continuous_scenario(rows: &[SeriesRecord]) -> Vec<SeriesRecord> {
    let windows: BTreeMap<DateTime<Utc>, VersionCoverage> = version_coverage(rows)
        .into_iter()
        .map(|c| (c.version_ts, c))
        .collect();

    let mut kept: Vec<SeriesRecord> = rows
        .iter()
        .filter(|row| {
            windows
                .get(&row.version_ts)
                .is_some_and(|w| w.contains(row.effective_ts))
        })
        .cloned()
        .collect();
    kept.sort_by(|a, b| {
        b.effective_ts
            .cmp(&a.effective_ts)
            .then_with(|| b.version_ts.cmp(&a.version_ts))
    });
    kept
}
