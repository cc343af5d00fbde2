//! Migration runner: create-if-absent layouts, additive steps, seed rows.
//!
//! There is no applied-migrations ledger. Every open re-runs every step of
//! every kind inside one transaction, and a step that fails because its
//! shape already exists counts as applied. The decision is made from SQLite
//! result codes plus schema introspection, never from error text.

use rusqlite::{params_from_iter, Connection};
use tracing::{debug, info, warn};

use tsledger_core::{TempoError, TempoResult};

use crate::registry::{MigrationStep, RecordKind, SchemaRegistry};
use crate::sqlite_errors::{is_generic_sql_error, is_unique_violation, map_sqlite_err};

/// What one migration run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub kinds: usize,
    pub applied: usize,
    pub already_applied: usize,
    pub seeds_inserted: usize,
    pub seeds_skipped: usize,
}

/// Outcome of a failed step once classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepFailure {
    AlreadyApplied,
    Fatal,
}

fn failure(kind: &dyn RecordKind, step: impl ToString, reason: impl ToString) -> TempoError {
    TempoError::SchemaMigrationFailure {
        kind: kind.name().to_string(),
        step: step.to_string(),
        reason: reason.to_string(),
    }
}

/// Bring every registered kind up to date.
///
/// All-or-nothing: any fatal step rolls back the whole run.
pub fn run_migrations(conn: &Connection, registry: &SchemaRegistry) -> TempoResult<MigrationReport> {
    let kinds = registry.kinds();
    let tx = conn.unchecked_transaction().map_err(map_sqlite_err)?;
    let mut report = MigrationReport::default();

    for kind in &kinds {
        tx.execute_batch(&kind.create_sql())
            .map_err(|e| failure(*kind, "create base layout", e))?;
    }

    for kind in &kinds {
        for step in kind.migrations() {
            step.validate()
                .map_err(|e| failure(*kind, &step, e))?;

            match tx.execute_batch(&step.to_sql(kind.table())) {
                Ok(()) => {
                    debug!(kind = kind.name(), %step, "applied migration step");
                    report.applied += 1;
                }
                Err(e) => match classify_step_failure(&tx, kind.table(), &step, &e)? {
                    StepFailure::AlreadyApplied => {
                        debug!(kind = kind.name(), %step, "step already applied, skipping");
                        report.already_applied += 1;
                    }
                    StepFailure::Fatal => {
                        warn!(kind = kind.name(), %step, error = %e, "migration step failed, rolling back");
                        return Err(failure(*kind, &step, e));
                    }
                },
            }
        }

        for seed in kind.seeds() {
            match tx.execute(&seed.sql, params_from_iter(seed.params.iter())) {
                Ok(n) => report.seeds_inserted += n,
                Err(e) if is_unique_violation(&e) => {
                    debug!(kind = kind.name(), seed = %seed.describe(), "seed row already present");
                    report.seeds_skipped += 1;
                }
                Err(e) => {
                    warn!(kind = kind.name(), seed = %seed.describe(), error = %e, "seed failed, rolling back");
                    return Err(failure(*kind, seed.describe(), e));
                }
            }
        }

        report.kinds += 1;
    }

    tx.commit().map_err(map_sqlite_err)?;

    info!(
        kinds = report.kinds,
        applied = report.applied,
        already_applied = report.already_applied,
        seeds_inserted = report.seeds_inserted,
        seeds_skipped = report.seeds_skipped,
        "schema migrations complete"
    );
    Ok(report)
}

/// A typed step failing with a generic SQL error is a no-op only when the
/// schema already has the shape it asked for.
fn classify_step_failure(
    conn: &Connection,
    table: &str,
    step: &MigrationStep,
    err: &rusqlite::Error,
) -> TempoResult<StepFailure> {
    if !is_generic_sql_error(err) {
        return Ok(StepFailure::Fatal);
    }
    let exists = match step {
        MigrationStep::AddColumn { column, .. } => column_exists(conn, table, column)?,
        MigrationStep::CreateIndex { name, .. } => index_exists(conn, table, name)?,
        MigrationStep::Statement(_) => false,
    };
    Ok(if exists {
        StepFailure::AlreadyApplied
    } else {
        StepFailure::Fatal
    })
}

pub fn column_exists(conn: &Connection, table: &str, column: &str) -> TempoResult<bool> {
    conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        [table, column],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n > 0)
    .map_err(map_sqlite_err)
}

pub fn index_exists(conn: &Connection, table: &str, index: &str) -> TempoResult<bool> {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND tbl_name = ?1 AND name = ?2",
        [table, index],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n > 0)
    .map_err(map_sqlite_err)
}
