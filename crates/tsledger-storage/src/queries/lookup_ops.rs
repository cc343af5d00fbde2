//! Single-row lookups on the reference tables.

use rusqlite::Connection;

use tsledger_core::{Criteria, Granularity, SeriesIdentity, TempoError, TempoResult, TimeBucketMask};

use super::criteria_sql::query_rows;

pub fn get_series_identity(conn: &Connection, series_id: &str) -> TempoResult<SeriesIdentity> {
    query_rows::<SeriesIdentity>(conn, &Criteria::new().eq("series_id", series_id).limit(1))?
        .pop()
        .ok_or_else(|| TempoError::NotFound {
            kind: "series identity".to_string(),
            key: series_id.to_string(),
        })
}

pub fn get_bucket_mask(conn: &Connection, granularity: Granularity) -> TempoResult<TimeBucketMask> {
    query_rows::<TimeBucketMask>(
        conn,
        &Criteria::new()
            .eq("granularity", granularity.as_str())
            .limit(1),
    )?
    .pop()
    .ok_or_else(|| TempoError::NotFound {
        kind: "time bucket mask".to_string(),
        key: granularity.to_string(),
    })
}
