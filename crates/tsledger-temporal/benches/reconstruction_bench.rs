//! Reconstruction benchmarks: pure algorithms over synthetic revision
//! histories, and the full store-backed path.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use test_fixtures::{fresh_store, numeric, ts};
use tsledger_core::traits::ISeriesReconstruction;
use tsledger_core::{AggFunc, Granularity, SeriesRecord, TimeBucketMask};
use tsledger_temporal::query::{aggregate_buckets, continuous_scenario, snapshot_as_of};
use tsledger_temporal::ReconstructionEngine;

/// `runs` forecast runs of `points` each, every run starting one step later.
fn forecast_history(runs: i64, points: i64) -> Vec<SeriesRecord> {
    (0..runs)
        .flat_map(|run| {
            (0..points).map(move |i| {
                let eff = (run + i) * 60;
                numeric("bench", eff, run, (run * 1000 + i) as f64)
            })
        })
        .collect()
}

fn bench_snapshot_10k(c: &mut Criterion) {
    let rows = forecast_history(100, 100);
    c.bench_function("snapshot_as_of_10k_rows", |b| {
        b.iter(|| snapshot_as_of(black_box(&rows)))
    });
}

fn bench_scenario_10k(c: &mut Criterion) {
    let rows = forecast_history(100, 100);
    c.bench_function("continuous_scenario_10k_rows", |b| {
        b.iter(|| continuous_scenario(black_box(&rows)))
    });
}

fn bench_hourly_avg(c: &mut Criterion) {
    let rows = snapshot_as_of(&forecast_history(100, 100));
    let mask = TimeBucketMask::new(Granularity::Hour);
    c.bench_function("aggregate_hourly_avg", |b| {
        b.iter(|| aggregate_buckets(black_box(&rows), &mask, AggFunc::Avg).unwrap())
    });
}

fn bench_store_snapshot(c: &mut Criterion) {
    let store = fresh_store();
    store.append(&forecast_history(20, 50)).unwrap();
    let engine = ReconstructionEngine::new(Arc::new(store));
    c.bench_function("store_snapshot_1k_rows", |b| {
        b.iter(|| engine.snapshot_as_of("bench", ts(0)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_snapshot_10k,
    bench_scenario_10k,
    bench_hourly_avg,
    bench_store_snapshot,
);
criterion_main!(benches);
