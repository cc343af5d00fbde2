//! Storage subsystem configuration.

use serde::{Deserialize, Serialize};

/// SQLite connection settings applied when a store is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// How long a statement waits on a locked database before failing with busy.
    pub busy_timeout_ms: u32,
    /// Page cache size in KiB.
    pub cache_size_kib: u32,
    /// Use write-ahead logging. Ignored for in-memory stores.
    pub wal: bool,
    /// `PRAGMA synchronous` level: OFF, NORMAL, FULL or EXTRA.
    pub synchronous: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5000,
            cache_size_kib: 8000,
            wal: true,
            synchronous: "NORMAL".to_string(),
        }
    }
}
