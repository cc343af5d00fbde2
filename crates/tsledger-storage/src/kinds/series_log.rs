use crate::registry::{MigrationStep, RecordKind};

/// The append-only bitemporal log.
///
/// `value_kind` is part of the base layout and also declared as an additive
/// column so logs created before typed values existed pick it up on open.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesLogKind;

impl RecordKind for SeriesLogKind {
    fn name(&self) -> &str {
        "series_log"
    }

    fn table(&self) -> &str {
        "series_log"
    }

    fn create_sql(&self) -> String {
        "CREATE TABLE IF NOT EXISTS series_log (
            series_id    TEXT NOT NULL,
            effective_ts TEXT NOT NULL,
            version_ts   TEXT NOT NULL,
            value        TEXT NOT NULL,
            value_kind   TEXT NOT NULL DEFAULT 'text',
            metadata     TEXT,
            created_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%f000Z', 'now')),
            PRIMARY KEY (series_id, effective_ts, version_ts)
        ) WITHOUT ROWID;"
            .to_string()
    }

    fn migrations(&self) -> Vec<MigrationStep> {
        vec![
            MigrationStep::add_column("value_kind", "TEXT NOT NULL DEFAULT 'text'"),
            MigrationStep::create_index(
                "idx_series_log_version",
                &["series_id", "version_ts"],
                false,
            ),
        ]
    }
}
