//! Typed row materialization.

use rusqlite::Row;

use tsledger_core::codec::{decode_tagged, decode_timestamp};
use tsledger_core::{SeriesIdentity, SeriesRecord, TempoResult, TimeBucketMask};

use crate::to_storage_err;

/// A table whose rows the query layer can select and materialize.
///
/// `COLUMNS` is both the select list (in `from_row` index order) and the
/// whitelist criteria columns are checked against. `TEXT_COLUMNS` lists the
/// columns with TEXT affinity; numeric literals are refused on them because
/// SQLite would compare as text.
pub trait TableRow: Sized {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const TEXT_COLUMNS: &'static [&'static str] = &[];

    fn from_row(row: &Row<'_>) -> TempoResult<Self>;
}

fn col<T: rusqlite::types::FromSql>(row: &Row<'_>, idx: usize) -> TempoResult<T> {
    row.get(idx).map_err(|e| to_storage_err(e.to_string()))
}

impl TableRow for SeriesRecord {
    const TABLE: &'static str = "series_log";
    const COLUMNS: &'static [&'static str] = &[
        "series_id",
        "effective_ts",
        "version_ts",
        "value",
        "value_kind",
        "metadata",
        "created_at",
    ];
    const TEXT_COLUMNS: &'static [&'static str] = Self::COLUMNS;

    fn from_row(row: &Row<'_>) -> TempoResult<Self> {
        let series_id: String = col(row, 0)?;
        let effective_ts: String = col(row, 1)?;
        let version_ts: String = col(row, 2)?;
        let value: String = col(row, 3)?;
        let value_kind: String = col(row, 4)?;
        let metadata: Option<String> = col(row, 5)?;
        let created_at: Option<String> = col(row, 6)?;

        let metadata = match metadata {
            Some(text) => serde_json::from_str(&text)?,
            None => serde_json::Value::Null,
        };

        Ok(SeriesRecord {
            series_id,
            effective_ts: decode_timestamp(&effective_ts)?,
            version_ts: decode_timestamp(&version_ts)?,
            value: decode_tagged(&value, &value_kind)?,
            metadata,
            created_at: created_at.as_deref().map(decode_timestamp).transpose()?,
        })
    }
}

impl TableRow for SeriesIdentity {
    const TABLE: &'static str = "series_identity";
    const COLUMNS: &'static [&'static str] =
        &["series_id", "display_name", "unit", "value_kind", "description"];
    const TEXT_COLUMNS: &'static [&'static str] = Self::COLUMNS;

    fn from_row(row: &Row<'_>) -> TempoResult<Self> {
        let value_kind: String = col(row, 3)?;
        Ok(SeriesIdentity {
            series_id: col(row, 0)?,
            display_name: col(row, 1)?,
            unit: col(row, 2)?,
            value_kind: tsledger_core::codec::parse_kind(&value_kind)?,
            description: col(row, 4)?,
        })
    }
}

impl TableRow for TimeBucketMask {
    const TABLE: &'static str = "time_bucket_mask";
    const COLUMNS: &'static [&'static str] = &["granularity", "pattern"];
    const TEXT_COLUMNS: &'static [&'static str] = Self::COLUMNS;

    fn from_row(row: &Row<'_>) -> TempoResult<Self> {
        let granularity: String = col(row, 0)?;
        Ok(TimeBucketMask {
            granularity: granularity.parse()?,
            pattern: col(row, 1)?,
        })
    }
}
