//! # tsledger-storage
//!
//! SQLite persistence layer for the tsledger bitemporal store.
//! Schema registry + idempotent migrator, the append-only `series_log`
//! table, typed row materialization, and criteria → SQL translation.
//! One connection per store, every operation inside a scoped transaction.

pub mod engine;
pub mod kinds;
pub mod migrations;
pub mod pragmas;
pub mod queries;
pub mod registry;
pub mod row;
pub mod sqlite_errors;

pub use engine::SeriesStore;
pub use migrations::{run_migrations, MigrationReport};
pub use registry::{MigrationStep, RecordKind, SchemaRegistry, SeedStatement};
pub use row::TableRow;

/// Helper to convert a string message into a TempoError::StorageError.
pub fn to_storage_err(msg: String) -> tsledger_core::TempoError {
    tsledger_core::TempoError::StorageError(tsledger_core::StorageError::SqliteError {
        message: msg,
    })
}
