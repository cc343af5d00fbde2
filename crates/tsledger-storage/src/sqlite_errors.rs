//! Typed classification of rusqlite failures.
//!
//! Decisions are made on SQLite result codes, never on message text.

use rusqlite::ffi;
use tsledger_core::{StorageError, TempoError};

/// A PRIMARY KEY or UNIQUE constraint rejected the statement.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(
            ffi::Error {
                code: ffi::ErrorCode::ConstraintViolation,
                extended_code,
            },
            _,
        ) if *extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            || *extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Lock contention (SQLITE_BUSY / SQLITE_LOCKED).
pub fn is_busy(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(
            ffi::Error {
                code: ffi::ErrorCode::DatabaseBusy | ffi::ErrorCode::DatabaseLocked,
                ..
            },
            _,
        )
    )
}

/// Generic SQLITE_ERROR, which is what SQLite raises for a DDL statement
/// whose target already has the requested shape.
pub fn is_generic_sql_error(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(
            ffi::Error {
                code: ffi::ErrorCode::Unknown,
                ..
            },
            _,
        )
    )
}

/// Map a rusqlite error into the store's error type.
pub fn map_sqlite_err(e: rusqlite::Error) -> TempoError {
    if is_busy(&e) {
        TempoError::StorageError(StorageError::DbBusy)
    } else {
        crate::to_storage_err(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn conn_with_pk() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (a TEXT NOT NULL, b TEXT NOT NULL, PRIMARY KEY (a, b));
             CREATE TABLE u (x TEXT UNIQUE);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn primary_key_conflict_is_unique_violation() {
        let conn = conn_with_pk();
        conn.execute("INSERT INTO t VALUES ('1', '2')", []).unwrap();
        let err = conn.execute("INSERT INTO t VALUES ('1', '2')", []).unwrap_err();
        assert!(is_unique_violation(&err), "{err:?}");
        assert!(!is_busy(&err));
    }

    #[test]
    fn unique_index_conflict_is_unique_violation() {
        let conn = conn_with_pk();
        conn.execute("INSERT INTO u VALUES ('x')", []).unwrap();
        let err = conn.execute("INSERT INTO u VALUES ('x')", []).unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn not_null_is_not_unique_violation() {
        let conn = conn_with_pk();
        let err = conn.execute("INSERT INTO t VALUES (NULL, '2')", []).unwrap_err();
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn duplicate_column_is_generic_sql_error() {
        let conn = conn_with_pk();
        let err = conn.execute_batch("ALTER TABLE t ADD COLUMN a TEXT").unwrap_err();
        assert!(is_generic_sql_error(&err));
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn busy_maps_to_retryable() {
        let err = rusqlite::Error::SqliteFailure(
            ffi::Error {
                code: ffi::ErrorCode::DatabaseBusy,
                extended_code: ffi::SQLITE_BUSY,
            },
            None,
        );
        assert!(map_sqlite_err(err).is_retryable());
    }
}
