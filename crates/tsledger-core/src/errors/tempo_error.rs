use super::StorageError;

/// Top-level error type for the tsledger store.
/// Subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum TempoError {
    #[error("schema migration failed for kind '{kind}' at step `{step}`: {reason}")]
    SchemaMigrationFailure {
        kind: String,
        step: String,
        reason: String,
    },

    #[error("fact already recorded: series '{series_id}' at {effective_ts} (version {version_ts})")]
    UniquenessViolation {
        series_id: String,
        effective_ts: String,
        version_ts: String,
    },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("malformed query: {0}")]
    QueryError(String),

    #[error("{kind} not found: {key}")]
    NotFound { kind: String, key: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(String),
}

impl TempoError {
    /// Whether the failure is transient lock contention.
    ///
    /// The store never retries on its own; callers that want backoff use this
    /// to decide whether another attempt can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TempoError::StorageError(StorageError::DbBusy))
    }
}

/// Convenience type alias.
pub type TempoResult<T> = Result<T, TempoError>;
