//! Reads the schema actually present in a database file.

use tabula_core::{FromSqlValue, SqlValue};

use crate::error::Result;
use crate::statement::{query_all, query_scalar};

/// One row of `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectedColumn {
    /// Column position.
    pub cid: i64,
    /// Column name.
    pub name: String,
    /// Declared type text, as written in the DDL.
    pub type_name: String,
    /// Whether the column is NOT NULL.
    pub not_null: bool,
    /// DEFAULT expression text, if any.
    pub default_value: Option<String>,
    /// 1-based position in the primary key; 0 when not part of it.
    pub pk: i64,
}

impl IntrospectedColumn {
    /// Returns `true` if the column is part of the primary key.
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.pk > 0
    }

    fn from_row(row: Vec<SqlValue>) -> Result<Self> {
        let mut values = row.into_iter();
        let mut next = || values.next().unwrap_or(SqlValue::Null);
        Ok(Self {
            cid: i64::from_sql_value(next())?,
            name: String::from_sql_value(next())?,
            type_name: Option::<String>::from_sql_value(next())?.unwrap_or_default(),
            not_null: i64::from_sql_value(next())? != 0,
            default_value: Option::<String>::from_sql_value(next())?,
            pk: i64::from_sql_value(next())?,
        })
    }
}

fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Returns `true` if a table named `name` exists.
///
/// # Errors
///
/// Returns [`Error::Engine`](crate::Error::Engine) on query failure.
pub fn table_exists(conn: &rusqlite::Connection, name: &str) -> Result<bool> {
    let count = query_scalar(
        conn,
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
        &[SqlValue::Text(name.to_string())],
    )?;
    Ok(i64::from_sql_value(count)? > 0)
}

/// Returns the columns of `table` in table order; empty when the table
/// does not exist.
///
/// # Errors
///
/// Returns [`Error::Engine`](crate::Error::Engine) on query failure.
pub fn table_info(conn: &rusqlite::Connection, table: &str) -> Result<Vec<IntrospectedColumn>> {
    let sql = format!("PRAGMA table_info({})", quote_literal(table));
    query_all(conn, &sql, &[])?
        .into_iter()
        .map(IntrospectedColumn::from_row)
        .collect()
}

/// Returns the names of all user tables, sorted.
///
/// # Errors
///
/// Returns [`Error::Engine`](crate::Error::Engine) on query failure.
pub fn table_names(conn: &rusqlite::Connection) -> Result<Vec<String>> {
    query_all(
        conn,
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        &[],
    )?
    .into_iter()
    .map(|row| {
        let value = row.into_iter().next().unwrap_or(SqlValue::Null);
        Ok(String::from_sql_value(value)?)
    })
    .collect()
}
