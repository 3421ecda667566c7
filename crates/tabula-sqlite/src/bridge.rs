//! Moves [`SqlValue`]s across the engine boundary.
//!
//! Binding dispatches on the value kind to the engine's integer, double,
//! text, blob or null binding. Extraction reads a result column by its
//! storage class; conversion into a field type is left to the column
//! descriptor.

use rusqlite::types::{Null, ValueRef};
use tabula_core::SqlValue;

use crate::error::{Error, Result};

/// Binds `value` to the 1-based parameter `index`.
///
/// # Errors
///
/// Returns [`Error::Engine`] when the index is out of range.
pub fn bind_value(
    stmt: &mut rusqlite::Statement<'_>,
    index: usize,
    value: &SqlValue,
) -> Result<()> {
    match value {
        SqlValue::Null => stmt.raw_bind_parameter(index, Null)?,
        SqlValue::Bool(b) => stmt.raw_bind_parameter(index, i64::from(*b))?,
        SqlValue::Int(n) => stmt.raw_bind_parameter(index, *n)?,
        SqlValue::Float(f) => stmt.raw_bind_parameter(index, *f)?,
        SqlValue::Text(s) => stmt.raw_bind_parameter(index, s.as_str())?,
        SqlValue::Blob(b) => stmt.raw_bind_parameter(index, b.as_slice())?,
    }
    Ok(())
}

/// Binds `values` to parameters `1..=values.len()`.
///
/// # Errors
///
/// See [`bind_value`].
pub fn bind_all(stmt: &mut rusqlite::Statement<'_>, values: &[SqlValue]) -> Result<()> {
    for (i, value) in values.iter().enumerate() {
        bind_value(stmt, i + 1, value)?;
    }
    Ok(())
}

/// Reads the 0-based result column `index` of `row`.
///
/// # Errors
///
/// Returns [`Error::Engine`] when the index is out of range or a TEXT value
/// is not valid UTF-8.
pub fn read_value(row: &rusqlite::Row<'_>, index: usize) -> Result<SqlValue> {
    Ok(match row.get_ref(index)? {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(n) => SqlValue::Int(n),
        ValueRef::Real(f) => SqlValue::Float(f),
        ValueRef::Text(bytes) => SqlValue::Text(
            std::str::from_utf8(bytes)
                .map_err(|e| Error::Engine {
                    code: -1,
                    message: format!("invalid UTF-8 in column {index}: {e}"),
                })?
                .to_string(),
        ),
        ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
    })
}

/// Reads the first `width` columns of `row`.
///
/// # Errors
///
/// See [`read_value`].
pub fn read_row(row: &rusqlite::Row<'_>, width: usize) -> Result<Vec<SqlValue>> {
    (0..width).map(|i| read_value(row, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_then_read_each_kind() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT ?, ?, ?, ?, ?, ?").unwrap();
        let values = vec![
            SqlValue::Null,
            SqlValue::Bool(true),
            SqlValue::Int(-4),
            SqlValue::Float(1.5),
            SqlValue::Text("héllo".into()),
            SqlValue::Blob(vec![0, 255]),
        ];
        bind_all(&mut stmt, &values).unwrap();

        let mut rows = stmt.raw_query();
        let row = rows.next().unwrap().unwrap();
        let read = read_row(row, 6).unwrap();

        assert_eq!(
            read,
            vec![
                SqlValue::Null,
                SqlValue::Int(1),
                SqlValue::Int(-4),
                SqlValue::Float(1.5),
                SqlValue::Text("héllo".into()),
                SqlValue::Blob(vec![0, 255]),
            ]
        );
    }

    #[test]
    fn test_bind_out_of_range() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT ?").unwrap();
        assert!(bind_value(&mut stmt, 2, &SqlValue::Int(1)).is_err());
    }
}
