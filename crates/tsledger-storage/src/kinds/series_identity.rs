use rusqlite::types::Value;
use tsledger_core::SeriesIdentity;

use crate::registry::{RecordKind, SeedStatement};

/// Optional descriptive registry of series. Rows come only from identities
/// declared on the `SchemaRegistry`.
#[derive(Debug, Clone, Default)]
pub struct SeriesIdentityKind {
    declared: Vec<SeriesIdentity>,
}

impl SeriesIdentityKind {
    pub fn declare(&mut self, identity: SeriesIdentity) {
        self.declared.push(identity);
    }
}

fn opt_text(v: &Option<String>) -> Value {
    v.as_ref().map_or(Value::Null, |s| Value::Text(s.clone()))
}

impl RecordKind for SeriesIdentityKind {
    fn name(&self) -> &str {
        "series_identity"
    }

    fn table(&self) -> &str {
        "series_identity"
    }

    fn create_sql(&self) -> String {
        "CREATE TABLE IF NOT EXISTS series_identity (
            series_id    TEXT PRIMARY KEY,
            display_name TEXT,
            unit         TEXT,
            value_kind   TEXT NOT NULL DEFAULT 'text',
            description  TEXT
        );"
        .to_string()
    }

    fn seeds(&self) -> Vec<SeedStatement> {
        self.declared
            .iter()
            .map(|id| {
                SeedStatement::new(
                    "INSERT INTO series_identity
                        (series_id, display_name, unit, value_kind, description)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    vec![
                        Value::Text(id.series_id.clone()),
                        opt_text(&id.display_name),
                        opt_text(&id.unit),
                        Value::Text(id.value_kind.as_str().to_string()),
                        opt_text(&id.description),
                    ],
                )
            })
            .collect()
    }
}
