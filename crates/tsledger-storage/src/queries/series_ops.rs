//! Raw SQL operations on `series_log`.

use chrono::Utc;
use rusqlite::{params, Connection};

use tsledger_core::codec::{encode, encode_timestamp};
use tsledger_core::{SeriesRecord, TempoError, TempoResult};

use crate::sqlite_errors::{is_unique_violation, map_sqlite_err};

/// Insert one record. A primary-key conflict becomes `UniquenessViolation`
/// naming the triple. `created_at` comes from the engine clock, encoded like
/// every other timestamp so range filters on it compare correctly.
pub fn insert_record(conn: &Connection, record: &SeriesRecord) -> TempoResult<()> {
    let effective_ts = encode_timestamp(record.effective_ts)?;
    let version_ts = encode_timestamp(record.version_ts)?;
    let created_at = encode_timestamp(Utc::now())?;
    let metadata = if record.metadata.is_null() {
        None
    } else {
        Some(serde_json::to_string(&record.metadata)?)
    };

    conn.execute(
        "INSERT INTO series_log
            (series_id, effective_ts, version_ts, value, value_kind, metadata, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.series_id,
            effective_ts,
            version_ts,
            encode(&record.value),
            record.value.kind().as_str(),
            metadata,
            created_at,
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            TempoError::UniquenessViolation {
                series_id: record.series_id.clone(),
                effective_ts: effective_ts.clone(),
                version_ts: version_ts.clone(),
            }
        } else {
            map_sqlite_err(e)
        }
    })?;
    Ok(())
}

/// Insert every record in order. Stops at the first
/// failure; the caller's transaction decides what survives.
pub fn insert_batch(conn: &Connection, records: &[SeriesRecord]) -> TempoResult<usize> {
    for record in records {
        insert_record(conn, record)?;
    }
    Ok(records.len())
}

/// Distinct series ids present in the log, ascending.
pub fn list_series(conn: &Connection) -> TempoResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT series_id FROM series_log ORDER BY series_id")
        .map_err(map_sqlite_err)?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(map_sqlite_err)?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row.map_err(map_sqlite_err)?);
    }
    Ok(ids)
}
