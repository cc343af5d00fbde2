use rusqlite::types::Value;
use tsledger_core::Granularity;

use crate::registry::{RecordKind, SeedStatement};

/// Granularity → bucket pattern reference table, one seeded row per granularity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeBucketMaskKind;

impl RecordKind for TimeBucketMaskKind {
    fn name(&self) -> &str {
        "time_bucket_mask"
    }

    fn table(&self) -> &str {
        "time_bucket_mask"
    }

    fn create_sql(&self) -> String {
        "CREATE TABLE IF NOT EXISTS time_bucket_mask (
            granularity TEXT PRIMARY KEY,
            pattern     TEXT NOT NULL
        );"
        .to_string()
    }

    fn seeds(&self) -> Vec<SeedStatement> {
        Granularity::ALL
            .iter()
            .map(|g| {
                SeedStatement::new(
                    "INSERT INTO time_bucket_mask (granularity, pattern) VALUES (?1, ?2)",
                    vec![
                        Value::Text(g.as_str().to_string()),
                        Value::Text(g.default_pattern().to_string()),
                    ],
                )
            })
            .collect()
    }
}
