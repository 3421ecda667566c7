//! Statement preparation, binding and row iteration.

use tabula_core::SqlValue;
use tracing::debug;

use crate::bridge::{bind_all, read_row};
use crate::error::{Error, Result};

/// Prepares `sql` on `conn`.
///
/// # Errors
///
/// Returns [`Error::StatementIsNull`] for empty or whitespace-only SQL and
/// [`Error::Engine`] when the engine rejects the text.
pub fn prepare<'c>(conn: &'c rusqlite::Connection, sql: &str) -> Result<rusqlite::Statement<'c>> {
    if sql.trim().is_empty() {
        return Err(Error::StatementIsNull);
    }
    debug!(sql = %sql, "Executing SQL");
    Ok(conn.prepare(sql)?)
}

/// Runs a statement that returns no rows and reports the number of changed
/// rows.
///
/// # Errors
///
/// See [`prepare`]; binding and stepping errors are returned as
/// [`Error::Engine`].
pub fn execute(conn: &rusqlite::Connection, sql: &str, params: &[SqlValue]) -> Result<usize> {
    let mut stmt = prepare(conn, sql)?;
    bind_all(&mut stmt, params)?;
    Ok(stmt.raw_execute()?)
}

/// Runs one or more `;`-separated statements without parameters.
///
/// # Errors
///
/// Returns [`Error::Engine`] for the first failing statement.
pub fn execute_batch(conn: &rusqlite::Connection, sql: &str) -> Result<()> {
    if sql.trim().is_empty() {
        return Err(Error::StatementIsNull);
    }
    debug!(sql = %sql, "Executing SQL");
    Ok(conn.execute_batch(sql)?)
}

/// Runs a query and hands every row to `f`, stopping at the first error.
///
/// # Errors
///
/// Returns engine errors and whatever `f` returns.
pub fn query_each<F>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[SqlValue],
    mut f: F,
) -> Result<()>
where
    F: FnMut(Vec<SqlValue>) -> Result<()>,
{
    let mut stmt = prepare(conn, sql)?;
    bind_all(&mut stmt, params)?;
    let width = stmt.column_count();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        f(read_row(row, width)?)?;
    }
    Ok(())
}

/// Runs a query and collects all rows.
///
/// # Errors
///
/// See [`query_each`].
pub fn query_all(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[SqlValue],
) -> Result<Vec<Vec<SqlValue>>> {
    let mut rows = Vec::new();
    query_each(conn, sql, params, |row| {
        rows.push(row);
        Ok(())
    })?;
    Ok(rows)
}

/// Runs a query and returns its first row, if any.
///
/// # Errors
///
/// See [`query_each`].
pub fn query_first(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[SqlValue],
) -> Result<Option<Vec<SqlValue>>> {
    let mut stmt = prepare(conn, sql)?;
    bind_all(&mut stmt, params)?;
    let width = stmt.column_count();
    let mut rows = stmt.raw_query();
    match rows.next()? {
        Some(row) => Ok(Some(read_row(row, width)?)),
        None => Ok(None),
    }
}

/// Runs a query expected to produce one value and returns the first
/// column of the first row, or NULL for an empty result.
///
/// # Errors
///
/// See [`query_each`].
pub fn query_scalar(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[SqlValue],
) -> Result<SqlValue> {
    Ok(query_first(conn, sql, params)?
        .and_then(|row| row.into_iter().next())
        .unwrap_or(SqlValue::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> rusqlite::Connection {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (a INTEGER, b TEXT)").unwrap();
        conn
    }

    #[test]
    fn test_empty_sql_is_rejected() {
        let conn = conn();
        assert!(matches!(prepare(&conn, "   "), Err(Error::StatementIsNull)));
        assert!(matches!(execute_batch(&conn, ""), Err(Error::StatementIsNull)));
    }

    #[test]
    fn test_execute_and_query() {
        let conn = conn();
        let changed = execute(
            &conn,
            "INSERT INTO t (a, b) VALUES (?, ?)",
            &[SqlValue::Int(1), SqlValue::Text("x".into())],
        )
        .unwrap();
        assert_eq!(changed, 1);

        let rows = query_all(&conn, "SELECT a, b FROM t", &[]).unwrap();
        assert_eq!(rows, vec![vec![SqlValue::Int(1), SqlValue::Text("x".into())]]);
    }

    #[test]
    fn test_query_scalar_on_empty_result() {
        let conn = conn();
        let value =
            query_scalar(&conn, "SELECT a FROM t WHERE a = ?", &[SqlValue::Int(5)]).unwrap();
        assert_eq!(value, SqlValue::Null);
    }

    #[test]
    fn test_callback_error_stops_iteration() {
        let conn = conn();
        conn.execute_batch("INSERT INTO t VALUES (1, 'a'); INSERT INTO t VALUES (2, 'b');")
            .unwrap();

        let mut seen = 0;
        let result = query_each(&conn, "SELECT a FROM t", &[], |_| {
            seen += 1;
            Err(Error::HandleIsNull)
        });
        assert!(matches!(result, Err(Error::HandleIsNull)));
        assert_eq!(seen, 1);
    }
}
