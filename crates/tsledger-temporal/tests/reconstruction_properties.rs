//! Property tests for the pure reconstruction algorithms.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use test_fixtures::numeric;
use tsledger_core::SeriesRecord;
use tsledger_temporal::query::{continuous_scenario, snapshot_as_of, version_coverage};

fn history() -> impl Strategy<Value = Vec<SeriesRecord>> {
    prop::collection::btree_set((0i64..40, 0i64..6), 0..40).prop_map(|keys| {
        keys.into_iter()
            .map(|(eff, ver)| numeric("p", eff, ver, (eff * 10 + ver) as f64))
            .collect()
    })
}

proptest! {
    #[test]
    fn snapshot_one_row_per_effective_time_at_max_version(rows in history()) {
        let mut max_version = BTreeMap::new();
        for r in &rows {
            let v = max_version.entry(r.effective_ts).or_insert(r.version_ts);
            if r.version_ts > *v {
                *v = r.version_ts;
            }
        }

        let out = snapshot_as_of(&rows);
        prop_assert_eq!(out.len(), max_version.len());
        for r in &out {
            prop_assert_eq!(Some(&r.version_ts), max_version.get(&r.effective_ts));
        }
        for pair in out.windows(2) {
            prop_assert!(pair[0].effective_ts > pair[1].effective_ts);
        }
    }

    #[test]
    fn snapshot_ignores_input_order(rows in history(), seed in any::<u64>()) {
        let mut shuffled = rows.clone();
        // Deterministic rotate stands in for a shuffle.
        if !shuffled.is_empty() {
            let k = (seed as usize) % shuffled.len();
            shuffled.rotate_left(k);
            shuffled.reverse();
        }
        prop_assert_eq!(snapshot_as_of(&rows), snapshot_as_of(&shuffled));
    }

    #[test]
    fn scenario_is_ordered_subset_inside_windows(rows in history()) {
        let input: BTreeSet<_> = rows.iter().map(|r| (r.effective_ts, r.version_ts)).collect();
        let windows: BTreeMap<_, _> = version_coverage(&rows)
            .into_iter()
            .map(|w| (w.version_ts, w))
            .collect();

        let out = continuous_scenario(&rows);
        for r in &out {
            prop_assert!(input.contains(&(r.effective_ts, r.version_ts)));
            prop_assert!(windows[&r.version_ts].contains(r.effective_ts));
        }
        for pair in out.windows(2) {
            let a = (pair[0].effective_ts, pair[0].version_ts);
            let b = (pair[1].effective_ts, pair[1].version_ts);
            prop_assert!(a > b);
        }
    }

    #[test]
    fn newest_version_is_kept_whole(rows in history()) {
        prop_assume!(!rows.is_empty());
        let newest = rows.iter().map(|r| r.version_ts).max().unwrap();
        let expected = rows.iter().filter(|r| r.version_ts == newest).count();
        let kept = continuous_scenario(&rows)
            .iter()
            .filter(|r| r.version_ts == newest)
            .count();
        prop_assert_eq!(kept, expected);
    }
}
