//! Snapshot-as-of: the latest known value for every effective time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tsledger_core::codec::encode;
use tsledger_core::SeriesRecord;

/// `a` beats `b` when it is newer knowledge. Equal versions fall back to
/// the smaller encoded value so the result never depends on input order.
fn supersedes(a: &SeriesRecord, b: &SeriesRecord) -> bool {
    match a.version_ts.cmp(&b.version_ts) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => encode(&a.value) < encode(&b.value),
    }
}

/// One row per distinct `effective_ts`, the one with the greatest
/// `version_ts`, ordered by effective time descending. Input order is
/// irrelevant.
pub fn snapshot_as_of(rows: &[SeriesRecord]) -> Vec<SeriesRecord> {
    let mut latest: BTreeMap<DateTime<Utc>, &SeriesRecord> = BTreeMap::new();
    for row in rows {
        latest
            .entry(row.effective_ts)
            .and_modify(|best| {
                if supersedes(row, best) {
                    *best = row;
                }
            })
            .or_insert(row);
    }
    latest.into_values().rev().cloned().collect()
}
