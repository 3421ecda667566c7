//! Keeps declared tables in step with the tables present in the database.
//!
//! [`classify`] is a pure diff of a declared table against its
//! `PRAGMA table_info` rows; [`sync_table`] runs the statements the
//! resulting [`SyncPlan`] calls for.
//!
//! Column order is never a mismatch. Columns are matched by exact
//! (case-sensitive) name. A common column that changed nullability,
//! DEFAULT presence or primary-key membership cannot be altered in place
//! and forces the table to be dropped and recreated.

use std::fmt;

use tabula_core::schema::{ColumnInfo, TableSchema};
use tracing::{info, warn};

use crate::dialect::SqliteDialect;
use crate::error::Result;
use crate::introspect::{table_exists, table_info, IntrospectedColumn};
use crate::statement::execute_batch;

const SAVEPOINT: &str = "tabula_sync";

/// Outcome of synchronizing one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncSchemaResult {
    /// The table did not exist and was created.
    NewTableCreated,
    /// Nothing had to change.
    AlreadyInSync,
    /// Columns absent from the declaration were removed, keeping data.
    OldColumnsRemoved,
    /// Declared columns missing from the table were added.
    NewColumnsAdded,
    /// Both of the above.
    NewColumnsAddedAndOldColumnsRemoved,
    /// The table was dropped and created again; its rows are lost.
    DroppedAndRecreated,
}

impl fmt::Display for SyncSchemaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NewTableCreated => "new table created",
            Self::AlreadyInSync => "table and storage are already in sync",
            Self::OldColumnsRemoved => "old excess columns removed",
            Self::NewColumnsAdded => "new columns added",
            Self::NewColumnsAddedAndOldColumnsRemoved => {
                "old excess columns removed and new columns added"
            }
            Self::DroppedAndRecreated => "old table dropped and recreated",
        };
        f.write_str(text)
    }
}

/// What [`sync_table`] will do for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    /// The classification.
    pub result: SyncSchemaResult,
    /// Declared columns missing from the database, in declaration order.
    pub columns_to_add: Vec<String>,
    /// Database columns absent from the declaration, in table order.
    pub columns_to_remove: Vec<String>,
}

fn differs(declared: &ColumnInfo, is_key: bool, existing: &IntrospectedColumn) -> bool {
    declared.not_null != existing.not_null
        || declared.has_default() != existing.default_value.is_some()
        || is_key != existing.is_primary_key()
}

fn cannot_be_added(declared: &ColumnInfo, is_key: bool) -> bool {
    (declared.not_null && !declared.has_default()) || is_key || declared.unique.is_some()
}

/// Diffs `declared` against the introspected columns of its table.
///
/// `introspected` is `None` (or empty) when the table does not exist.
/// `preserve` selects backup-copy-rename over drop-and-recreate when the
/// database has columns the declaration no longer has.
#[must_use]
pub fn classify(
    declared: &dyn TableSchema,
    introspected: Option<&[IntrospectedColumn]>,
    preserve: bool,
) -> SyncPlan {
    let existing = match introspected {
        Some(columns) if !columns.is_empty() => columns,
        _ => {
            return SyncPlan {
                result: SyncSchemaResult::NewTableCreated,
                columns_to_add: vec![],
                columns_to_remove: vec![],
            }
        }
    };

    let declared_columns = declared.column_infos();
    let mut recreate = false;
    let mut columns_to_add = Vec::new();

    for column in &declared_columns {
        let is_key = declared.is_primary_key(&column.name);
        match existing.iter().find(|e| e.name == column.name) {
            Some(found) => recreate |= differs(column, is_key, found),
            None => {
                recreate |= cannot_be_added(column, is_key);
                columns_to_add.push(column.name.clone());
            }
        }
    }

    let columns_to_remove: Vec<String> = existing
        .iter()
        .filter(|e| !declared_columns.iter().any(|c| c.name == e.name))
        .map(|e| e.name.clone())
        .collect();
    if !columns_to_remove.is_empty() && !preserve {
        recreate = true;
    }

    let result = if recreate {
        SyncSchemaResult::DroppedAndRecreated
    } else {
        match (columns_to_add.is_empty(), columns_to_remove.is_empty()) {
            (true, true) => SyncSchemaResult::AlreadyInSync,
            (false, true) => SyncSchemaResult::NewColumnsAdded,
            (true, false) => SyncSchemaResult::OldColumnsRemoved,
            (false, false) => SyncSchemaResult::NewColumnsAddedAndOldColumnsRemoved,
        }
    };

    SyncPlan {
        result,
        columns_to_add,
        columns_to_remove,
    }
}

/// Introspects `table` and returns the plan without running any DDL.
///
/// # Errors
///
/// Returns [`Error::Engine`](crate::Error::Engine) if introspection fails.
pub fn plan_table(
    conn: &rusqlite::Connection,
    table: &dyn TableSchema,
    preserve: bool,
) -> Result<SyncPlan> {
    let existing = if table_exists(conn, table.name())? {
        Some(table_info(conn, table.name())?)
    } else {
        None
    };
    Ok(classify(table, existing.as_deref(), preserve))
}

/// Synchronizes one table and reports what was done.
///
/// # Errors
///
/// Returns the first failing statement's error. DDL outside the
/// backup-copy-rename sequence is not rolled back.
pub fn sync_table(
    conn: &rusqlite::Connection,
    dialect: SqliteDialect,
    table: &dyn TableSchema,
    preserve: bool,
) -> Result<SyncSchemaResult> {
    let plan = plan_table(conn, table, preserve)?;
    let name = table.name();

    match plan.result {
        SyncSchemaResult::AlreadyInSync => {}
        SyncSchemaResult::NewTableCreated => {
            execute_batch(conn, &dialect.create_table_sql(table, name, &[]))?;
        }
        SyncSchemaResult::DroppedAndRecreated => {
            warn!(
                table = %name,
                added = ?plan.columns_to_add,
                removed = ?plan.columns_to_remove,
                "Dropping and recreating table, existing rows are lost"
            );
            execute_batch(conn, &dialect.drop_table_sql(name))?;
            execute_batch(conn, &dialect.create_table_sql(table, name, &[]))?;
        }
        SyncSchemaResult::NewColumnsAdded => {
            add_columns(conn, dialect, table, &plan.columns_to_add)?;
        }
        SyncSchemaResult::OldColumnsRemoved
        | SyncSchemaResult::NewColumnsAddedAndOldColumnsRemoved => {
            rebuild_without_removed(conn, dialect, table, &plan.columns_to_add)?;
            add_columns(conn, dialect, table, &plan.columns_to_add)?;
        }
    }

    info!(table = %name, result = %plan.result, "Synchronized table schema");
    Ok(plan.result)
}

fn add_columns(
    conn: &rusqlite::Connection,
    dialect: SqliteDialect,
    table: &dyn TableSchema,
    names: &[String],
) -> Result<()> {
    for name in names {
        if let Some(column) = table.find_column(name) {
            execute_batch(conn, &dialect.add_column_sql(table.name(), column))?;
        }
    }
    Ok(())
}

/// Returns the first free name among `<table>_backup`, `<table>_backup1`,
/// `<table>_backup2`, ...
///
/// # Errors
///
/// Returns [`Error::Engine`](crate::Error::Engine) if a probe fails.
pub fn backup_table_name(conn: &rusqlite::Connection, table: &str) -> Result<String> {
    let base = format!("{table}_backup");
    if !table_exists(conn, &base)? {
        return Ok(base);
    }
    let mut suffix = 1_u32;
    loop {
        let candidate = format!("{base}{suffix}");
        if !table_exists(conn, &candidate)? {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

fn rebuild_without_removed(
    conn: &rusqlite::Connection,
    dialect: SqliteDialect,
    table: &dyn TableSchema,
    to_add: &[String],
) -> Result<()> {
    let name = table.name();
    let backup = backup_table_name(conn, name)?;

    execute_batch(conn, &format!("SAVEPOINT {SAVEPOINT}"))?;
    match copy_through_backup(conn, dialect, table, &backup, to_add) {
        Ok(()) => execute_batch(conn, &format!("RELEASE {SAVEPOINT}")),
        Err(err) => {
            if let Err(rollback) =
                execute_batch(conn, &format!("ROLLBACK TO {SAVEPOINT}; RELEASE {SAVEPOINT}"))
            {
                warn!(table = %name, error = %rollback, "Failed to roll back table rebuild");
            }
            Err(err)
        }
    }
}

/// Creates the shadow table with the declared columns minus `to_add`,
/// copies the common columns, drops the original and renames the shadow.
fn copy_through_backup(
    conn: &rusqlite::Connection,
    dialect: SqliteDialect,
    table: &dyn TableSchema,
    backup: &str,
    to_add: &[String],
) -> Result<()> {
    let name = table.name();
    let skip: Vec<&str> = to_add.iter().map(String::as_str).collect();
    let common: Vec<&str> = table
        .column_infos()
        .into_iter()
        .map(|c| c.name.as_str())
        .filter(|c| !skip.contains(c))
        .collect();

    execute_batch(conn, &dialect.create_table_sql(table, backup, &skip))?;
    execute_batch(conn, &dialect.copy_rows_sql(name, backup, &common))?;
    execute_batch(conn, &dialect.drop_table_sql(name))?;
    execute_batch(conn, &dialect.rename_table_sql(backup, name))
}
