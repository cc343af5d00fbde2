//! SQLite PRAGMA configuration for store connections.
//!
//! Must be called on every connection immediately after opening.

use rusqlite::Connection;
use tsledger_core::config::StorageConfig;
use tsledger_core::{TempoError, TempoResult};

use crate::sqlite_errors::map_sqlite_err;

const SYNCHRONOUS_MODES: [&str; 4] = ["OFF", "NORMAL", "FULL", "EXTRA"];

/// Configure a connection from `StorageConfig`.
///
/// WAL is only requested for file-backed databases; in-memory databases
/// always report `memory`.
pub fn configure_connection(
    conn: &Connection,
    config: &StorageConfig,
    file_backed: bool,
) -> TempoResult<()> {
    let synchronous = config.synchronous.to_ascii_uppercase();
    if !SYNCHRONOUS_MODES.contains(&synchronous.as_str()) {
        return Err(TempoError::ConfigError(format!(
            "storage.synchronous must be one of {SYNCHRONOUS_MODES:?}, got '{}'",
            config.synchronous
        )));
    }

    let journal = if config.wal && file_backed { "WAL" } else { "DELETE" };
    let batch = format!(
        "
        PRAGMA journal_mode = {journal};
        PRAGMA synchronous = {synchronous};
        PRAGMA busy_timeout = {busy};
        PRAGMA cache_size = -{cache};
        PRAGMA temp_store = MEMORY;
        ",
        busy = config.busy_timeout_ms,
        cache = config.cache_size_kib,
    );
    conn.execute_batch(&batch).map_err(map_sqlite_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_busy_timeout_and_cache() {
        let conn = Connection::open_in_memory().unwrap();
        configure_connection(&conn, &StorageConfig::default(), false).unwrap();

        let timeout: i64 = conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .unwrap();
        assert_eq!(timeout, 5000);

        let cache: i64 = conn
            .pragma_query_value(None, "cache_size", |row| row.get(0))
            .unwrap();
        assert_eq!(cache, -8000);
    }

    #[test]
    fn file_backed_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("wal.db")).unwrap();
        configure_connection(&conn, &StorageConfig::default(), true).unwrap();

        let mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn rejects_unknown_synchronous_mode() {
        let conn = Connection::open_in_memory().unwrap();
        let config = StorageConfig {
            synchronous: "SOMETIMES".to_string(),
            ..StorageConfig::default()
        };
        let err = configure_connection(&conn, &config, false).unwrap_err();
        assert!(matches!(err, TempoError::ConfigError(_)));
    }
}
