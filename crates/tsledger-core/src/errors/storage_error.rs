/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("database busy (another connection holds the write lock)")]
    DbBusy,

    #[error("connection lock poisoned: {0}")]
    LockPoisoned(String),
}
