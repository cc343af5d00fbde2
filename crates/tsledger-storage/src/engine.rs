//! SeriesStore: owns the connection and runs every operation in a
//! scoped transaction.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{debug, info};

use tsledger_core::config::StorageConfig;
use tsledger_core::traits::ISeriesLog;
use tsledger_core::{
    Criteria, Granularity, SeriesIdentity, SeriesRecord, StorageError, TempoError, TempoResult,
    TimeBucketMask,
};

use crate::migrations::{run_migrations, MigrationReport};
use crate::pragmas::configure_connection;
use crate::queries::{criteria_sql, lookup_ops, series_ops};
use crate::registry::SchemaRegistry;
use crate::row::TableRow;
use crate::sqlite_errors::map_sqlite_err;

/// Handle to one store database.
///
/// A single connection sits behind a mutex, so every operation on one
/// handle is serialized. Two handles writing the same file concurrently
/// rely on SQLite's own locking and may see `DbBusy`; coordinating them is
/// the caller's job.
pub struct SeriesStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
    migration: MigrationReport,
}

impl SeriesStore {
    /// Open (or create) a file-backed store and migrate it.
    pub fn open(path: &Path, config: &StorageConfig, registry: &SchemaRegistry) -> TempoResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| crate::to_storage_err(format!("open {}: {e}", path.display())))?;
        configure_connection(&conn, config, true)?;
        let store = Self::from_connection(conn, Some(path.to_path_buf()), registry)?;
        info!(path = %path.display(), kinds = store.migration.kinds, "opened series store");
        Ok(store)
    }

    /// Private in-memory store, gone when the handle is dropped.
    pub fn open_in_memory(registry: &SchemaRegistry) -> TempoResult<Self> {
        let conn = Connection::open_in_memory().map_err(map_sqlite_err)?;
        configure_connection(&conn, &StorageConfig::default(), false)?;
        let store = Self::from_connection(conn, None, registry)?;
        debug!(kinds = store.migration.kinds, "opened in-memory series store");
        Ok(store)
    }

    fn from_connection(
        conn: Connection,
        path: Option<PathBuf>,
        registry: &SchemaRegistry,
    ) -> TempoResult<Self> {
        let migration = run_migrations(&conn, registry)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
            migration,
        })
    }

    /// Release the connection, surfacing any close error.
    pub fn close(self) -> TempoResult<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|e| TempoError::StorageError(StorageError::LockPoisoned(e.to_string())))?;
        conn.close().map_err(|(_, e)| map_sqlite_err(e))?;
        if let Some(path) = &self.path {
            info!(path = %path.display(), "closed series store");
        }
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// What the migrator did when this handle was opened.
    pub fn migration_report(&self) -> MigrationReport {
        self.migration
    }

    fn in_transaction<F, T>(&self, behavior: TransactionBehavior, f: F) -> TempoResult<T>
    where
        F: FnOnce(&Connection) -> TempoResult<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| TempoError::StorageError(StorageError::LockPoisoned(e.to_string())))?;
        let tx = Transaction::new_unchecked(&conn, behavior).map_err(map_sqlite_err)?;
        let out = f(&tx)?;
        tx.commit().map_err(map_sqlite_err)?;
        Ok(out)
    }

    /// Run `f` in a read transaction.
    pub fn with_reader<F, T>(&self, f: F) -> TempoResult<T>
    where
        F: FnOnce(&Connection) -> TempoResult<T>,
    {
        self.in_transaction(TransactionBehavior::Deferred, f)
    }

    /// Run `f` in a write transaction: committed when `f` returns `Ok`,
    /// rolled back otherwise.
    pub fn with_writer<F, T>(&self, f: F) -> TempoResult<T>
    where
        F: FnOnce(&Connection) -> TempoResult<T>,
    {
        self.in_transaction(TransactionBehavior::Immediate, f)
    }

    /// Append a batch atomically. The first duplicate triple aborts the
    /// whole batch with `UniquenessViolation`.
    pub fn append(&self, records: &[SeriesRecord]) -> TempoResult<()> {
        if records.is_empty() {
            return Err(TempoError::InvalidInput(
                "append requires at least one record".to_string(),
            ));
        }
        let n = self.with_writer(|conn| series_ops::insert_batch(conn, records))?;
        info!(records = n, "appended batch");
        Ok(())
    }

    pub fn append_one(&self, record: &SeriesRecord) -> TempoResult<()> {
        self.append(std::slice::from_ref(record))
    }

    pub fn query<T: TableRow>(&self, criteria: &Criteria) -> TempoResult<Vec<T>> {
        self.with_reader(|conn| criteria_sql::query_rows::<T>(conn, criteria))
    }

    pub fn count<T: TableRow>(&self, criteria: &Criteria) -> TempoResult<u64> {
        self.with_reader(|conn| criteria_sql::count_rows::<T>(conn, criteria))
    }

    pub fn series_identity(&self, series_id: &str) -> TempoResult<SeriesIdentity> {
        self.with_reader(|conn| lookup_ops::get_series_identity(conn, series_id))
    }

    pub fn bucket_mask(&self, granularity: Granularity) -> TempoResult<TimeBucketMask> {
        self.with_reader(|conn| lookup_ops::get_bucket_mask(conn, granularity))
    }

    pub fn list_series(&self) -> TempoResult<Vec<String>> {
        self.with_reader(series_ops::list_series)
    }
}

impl ISeriesLog for SeriesStore {
    fn append(&self, records: &[SeriesRecord]) -> TempoResult<()> {
        SeriesStore::append(self, records)
    }

    fn scan_series(&self, series_id: &str, since: DateTime<Utc>) -> TempoResult<Vec<SeriesRecord>> {
        self.query::<SeriesRecord>(&Criteria::series_since(series_id, since))
    }

    fn bucket_mask(&self, granularity: Granularity) -> TempoResult<TimeBucketMask> {
        SeriesStore::bucket_mask(self, granularity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tsledger_core::{SeriesValue, ValueKind};

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn store() -> SeriesStore {
        SeriesStore::open_in_memory(&SchemaRegistry::builtin()).unwrap()
    }

    #[test]
    fn append_then_scan() {
        let store = store();
        store
            .append(&[
                SeriesRecord::new("s", ts(1), ts(1), 1.5),
                SeriesRecord::new("s", ts(2), ts(1), "two"),
            ])
            .unwrap();

        let rows = store.scan_series("s", ts(0)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].effective_ts, ts(2));
        assert_eq!(rows[0].value, SeriesValue::Text("two".into()));
        assert_eq!(rows[1].value, SeriesValue::Numeric(1.5));
        assert!(rows.iter().all(|r| r.created_at.is_some()));
    }

    #[test]
    fn empty_batch_is_invalid_input() {
        assert!(matches!(store().append(&[]), Err(TempoError::InvalidInput(_))));
    }

    #[test]
    fn duplicate_rolls_back_whole_batch() {
        let store = store();
        store.append_one(&SeriesRecord::new("s", ts(5), ts(5), 1.0)).unwrap();

        let err = store
            .append(&[
                SeriesRecord::new("s", ts(6), ts(5), 2.0),
                SeriesRecord::new("s", ts(5), ts(5), 9.0),
            ])
            .unwrap_err();
        match err {
            TempoError::UniquenessViolation {
                series_id,
                effective_ts,
                ..
            } => {
                assert_eq!(series_id, "s");
                assert_eq!(effective_ts, "1970-01-01T00:00:05.000000Z");
            }
            other => panic!("expected UniquenessViolation, got {other:?}"),
        }
        assert_eq!(store.count::<SeriesRecord>(&Criteria::new()).unwrap(), 1);
    }

    #[test]
    fn bucket_masks_are_seeded() {
        let store = store();
        let mask = store.bucket_mask(Granularity::Hour).unwrap();
        assert_eq!(mask.pattern, "%Y-%m-%dT%H:00:00Z");
        assert_eq!(store.count::<TimeBucketMask>(&Criteria::new()).unwrap(), 4);
    }

    #[test]
    fn declared_identity_is_readable() {
        let registry = SchemaRegistry::builtin().with_series(
            SeriesIdentity::new("temp", ValueKind::Numeric).with_unit("degC"),
        );
        let store = SeriesStore::open_in_memory(&registry).unwrap();
        let identity = store.series_identity("temp").unwrap();
        assert_eq!(identity.unit.as_deref(), Some("degC"));
        assert!(matches!(
            store.series_identity("missing"),
            Err(TempoError::NotFound { .. })
        ));
    }

    #[test]
    fn writer_error_rolls_back() {
        let store = store();
        let result: TempoResult<()> = store.with_writer(|conn| {
            series_ops::insert_record(conn, &SeriesRecord::new("s", ts(1), ts(1), 1.0))?;
            Err(TempoError::InvalidInput("abort".into()))
        });
        assert!(result.is_err());
        assert!(store.list_series().unwrap().is_empty());
    }
}
