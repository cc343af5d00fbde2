//! Shared fixtures for tsledger tests: timestamp shorthands, record
//! builders, canned revision histories, and ready-migrated stores.
//!
//! Helpers panic on failure; they only run under test.

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use tsledger_core::config::StorageConfig;
use tsledger_core::SeriesRecord;
use tsledger_storage::{SchemaRegistry, SeriesStore};

/// Seconds since the epoch as a UTC timestamp.
pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or_else(|| panic!("timestamp {secs} out of range"))
}

/// Parse an RFC 3339 literal.
pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap_or_else(|e| panic!("bad fixture timestamp '{rfc3339}': {e}"))
        .with_timezone(&Utc)
}

pub fn numeric(series_id: &str, effective: i64, version: i64, value: f64) -> SeriesRecord {
    SeriesRecord::new(series_id, ts(effective), ts(version), value)
}

pub fn text(series_id: &str, effective: i64, version: i64, value: &str) -> SeriesRecord {
    SeriesRecord::new(series_id, ts(effective), ts(version), value)
}

/// One series revised twice: effective 10 known at versions 1 and 2,
/// effective 20 known only at version 1.
pub fn revised_readings(series_id: &str) -> Vec<SeriesRecord> {
    vec![
        numeric(series_id, 10, 1, 1.0),
        numeric(series_id, 10, 2, 1.5),
        numeric(series_id, 20, 1, 2.0),
    ]
}

/// Two forecast runs. Run 1 (version 1) covers effective {0, 3, 6};
/// run 2 (version 2) covers {1, 4, 7}.
pub fn forecast_runs(series_id: &str) -> Vec<SeriesRecord> {
    vec![
        numeric(series_id, 0, 1, 100.0),
        numeric(series_id, 3, 1, 103.0),
        numeric(series_id, 6, 1, 106.0),
        numeric(series_id, 1, 2, 201.0),
        numeric(series_id, 4, 2, 204.0),
        numeric(series_id, 7, 2, 207.0),
    ]
}

/// Migrated in-memory store with the built-in kinds.
pub fn fresh_store() -> SeriesStore {
    SeriesStore::open_in_memory(&SchemaRegistry::builtin())
        .unwrap_or_else(|e| panic!("in-memory store failed to open: {e}"))
}

/// In-memory store preloaded with `records` in one batch.
pub fn store_with(records: &[SeriesRecord]) -> SeriesStore {
    let store = fresh_store();
    store
        .append(records)
        .unwrap_or_else(|e| panic!("fixture append failed: {e}"));
    store
}

/// File-backed store in a fresh temp directory. Keep the `TempDir` alive
/// for as long as the store is used.
pub fn file_store(registry: &SchemaRegistry) -> (TempDir, SeriesStore) {
    let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let store = SeriesStore::open(&dir.path().join("ledger.db"), &StorageConfig::default(), registry)
        .unwrap_or_else(|e| panic!("file store failed to open: {e}"));
    (dir, store)
}
