//! Schema declaration: record kinds, typed migration steps, seed rows, and
//! the ordered registry the migrator walks on every open.

use std::fmt;

use rusqlite::types::Value;
use tsledger_core::{SeriesIdentity, TempoError, TempoResult};

use crate::kinds::{SeriesIdentityKind, SeriesLogKind, TimeBucketMaskKind};

/// A persisted record kind: one table, its base layout, its additive
/// migrations, and optional seed rows.
///
/// `create_sql` must be create-if-absent. `migrations` are re-run on every
/// open and must only add shape (columns, indexes).
pub trait RecordKind: Send + Sync {
    fn name(&self) -> &str;

    fn table(&self) -> &str;

    fn create_sql(&self) -> String;

    fn migrations(&self) -> Vec<MigrationStep> {
        Vec::new()
    }

    fn seeds(&self) -> Vec<SeedStatement> {
        Vec::new()
    }
}

/// One additive schema change against a kind's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationStep {
    /// `ALTER TABLE <table> ADD COLUMN <column> <definition>`.
    AddColumn { column: String, definition: String },
    /// `CREATE [UNIQUE] INDEX <name> ON <table> (<columns>)`.
    CreateIndex {
        name: String,
        columns: Vec<String>,
        unique: bool,
    },
    /// Raw SQL. Any failure is fatal; the statement must be idempotent itself.
    Statement(String),
}

impl MigrationStep {
    pub fn add_column(column: &str, definition: &str) -> Self {
        MigrationStep::AddColumn {
            column: column.to_string(),
            definition: definition.to_string(),
        }
    }

    pub fn create_index(name: &str, columns: &[&str], unique: bool) -> Self {
        MigrationStep::CreateIndex {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            unique,
        }
    }

    /// Check every identifier the step splices into SQL.
    pub fn validate(&self) -> TempoResult<()> {
        match self {
            MigrationStep::AddColumn { column, .. } => validate_identifier(column),
            MigrationStep::CreateIndex { name, columns, .. } => {
                validate_identifier(name)?;
                if columns.is_empty() {
                    return Err(TempoError::InvalidInput(format!(
                        "index '{name}' names no columns"
                    )));
                }
                columns.iter().try_for_each(|c| validate_identifier(c))
            }
            MigrationStep::Statement(_) => Ok(()),
        }
    }

    /// Render against `table`. Callers validate first.
    pub fn to_sql(&self, table: &str) -> String {
        match self {
            MigrationStep::AddColumn { column, definition } => {
                format!("ALTER TABLE {table} ADD COLUMN {column} {definition}")
            }
            MigrationStep::CreateIndex {
                name,
                columns,
                unique,
            } => format!(
                "CREATE {}INDEX {name} ON {table} ({})",
                if *unique { "UNIQUE " } else { "" },
                columns.join(", ")
            ),
            MigrationStep::Statement(sql) => sql.clone(),
        }
    }
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationStep::AddColumn { column, .. } => write!(f, "add column {column}"),
            MigrationStep::CreateIndex { name, .. } => write!(f, "create index {name}"),
            MigrationStep::Statement(sql) => {
                let head: String = sql.split_whitespace().take(6).collect::<Vec<_>>().join(" ");
                write!(f, "statement `{head}`")
            }
        }
    }
}

/// Parameterized insert of one reference row.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SeedStatement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Short label for logs and error reports.
    pub fn describe(&self) -> String {
        match self.params.first() {
            Some(Value::Text(key)) => format!("seed '{key}'"),
            Some(Value::Integer(key)) => format!("seed {key}"),
            _ => "seed".to_string(),
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn validate_identifier(ident: &str) -> TempoResult<()> {
    let mut chars = ident.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(TempoError::InvalidInput(format!(
            "'{ident}' is not a valid SQL identifier"
        )))
    }
}

/// Ordered set of record kinds. Built-ins come first, then caller kinds in
/// the order they were added.
pub struct SchemaRegistry {
    series_log: SeriesLogKind,
    identities: SeriesIdentityKind,
    bucket_masks: TimeBucketMaskKind,
    extra: Vec<Box<dyn RecordKind>>,
}

impl SchemaRegistry {
    pub fn builtin() -> Self {
        Self {
            series_log: SeriesLogKind,
            identities: SeriesIdentityKind::default(),
            bucket_masks: TimeBucketMaskKind,
            extra: Vec::new(),
        }
    }

    /// Register a caller kind. Kind names and table names must be unique.
    pub fn with_kind(mut self, kind: Box<dyn RecordKind>) -> TempoResult<Self> {
        validate_identifier(kind.table())?;
        if let Some(existing) = self
            .kinds()
            .into_iter()
            .find(|k| k.name() == kind.name() || k.table() == kind.table())
        {
            return Err(TempoError::InvalidInput(format!(
                "record kind '{}' (table '{}') collides with registered kind '{}' (table '{}')",
                kind.name(),
                kind.table(),
                existing.name(),
                existing.table()
            )));
        }
        self.extra.push(kind);
        Ok(self)
    }

    /// Declare a series identity row, seeded on migration.
    pub fn with_series(mut self, identity: SeriesIdentity) -> Self {
        self.identities.declare(identity);
        self
    }

    /// All kinds in migration order.
    pub fn kinds(&self) -> Vec<&dyn RecordKind> {
        let mut kinds: Vec<&dyn RecordKind> = Vec::with_capacity(3 + self.extra.len());
        kinds.push(&self.series_log);
        kinds.push(&self.identities);
        kinds.push(&self.bucket_masks);
        for kind in &self.extra {
            kinds.push(kind.as_ref());
        }
        kinds
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.kinds().into_iter().map(|k| k.name()))
            .finish()
    }
}
