//! Typed table descriptors.

use std::any::Any;
use std::fmt;

use super::column::{Column, ColumnInfo};
use super::TableSchema;
use crate::ast::TableKey;
use crate::error::{Error, Result};
use crate::value::SqlValue;

/// A table mapped to the Rust type `T`.
///
/// Columns keep their declaration order, which is also the SQL column order
/// used by CREATE TABLE, INSERT and row extraction.
///
/// ```rust
/// use tabula_core::schema::{Column, Table};
///
/// #[derive(Default)]
/// struct Membership {
///     user_id: i64,
///     group_id: i64,
///     role: String,
/// }
///
/// let table = Table::<Membership>::new("memberships")
///     .column(Column::new("user_id", |m: &Membership| &m.user_id, |m, v| m.user_id = v))
///     .column(Column::new("group_id", |m: &Membership| &m.group_id, |m, v| m.group_id = v))
///     .column(Column::new("role", |m: &Membership| &m.role, |m, v| m.role = v))
///     .primary_key(&["user_id", "group_id"]);
///
/// assert_eq!(table.key_columns().len(), 2);
/// ```
pub struct Table<T> {
    name: String,
    columns: Vec<Column<T>>,
    primary_key: Vec<String>,
}

impl<T: 'static> Table<T> {
    /// Creates an empty table named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: vec![],
            primary_key: vec![],
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: Column<T>) -> Self {
        self.columns.push(column);
        self
    }

    /// Declares a table-level (possibly composite) primary key.
    #[must_use]
    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column_named(&self, name: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Returns the primary-key columns, in key order.
    #[must_use]
    pub fn key_columns(&self) -> Vec<&Column<T>> {
        self.primary_key_names()
            .into_iter()
            .filter_map(|name| self.column_named(name))
            .collect()
    }

    /// Returns the columns that are not part of the primary key, in
    /// declaration order.
    #[must_use]
    pub fn non_key_columns(&self) -> Vec<&Column<T>> {
        self.columns
            .iter()
            .filter(|c| !self.is_primary_key(c.name()))
            .collect()
    }

    /// Returns the primary-key columns, failing when there are none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPrimaryKey`] for a table without a key.
    pub fn require_key_columns(&self) -> Result<Vec<&Column<T>>> {
        let keys = self.key_columns();
        if keys.is_empty() {
            return Err(Error::MissingPrimaryKey(self.name.clone()));
        }
        Ok(keys)
    }

    /// Builds an object from the values of one row, in column order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnCountMismatch`] when the row width differs from
    /// the column count, or the conversion error of the first column whose
    /// value does not fit its field.
    pub fn object_from_row(&self, values: Vec<SqlValue>) -> Result<T>
    where
        T: Default,
    {
        if values.len() != self.columns.len() {
            return Err(Error::ColumnCountMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        let mut object = T::default();
        for (column, value) in self.columns.iter().zip(values) {
            column.extract(&mut object, value)?;
        }
        Ok(object)
    }
}

impl<T: 'static> TableSchema for Table<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> TableKey {
        TableKey::of::<T>()
    }

    fn column_infos(&self) -> Vec<&ColumnInfo> {
        self.columns.iter().map(Column::info).collect()
    }

    fn table_primary_key(&self) -> &[String] {
        &self.primary_key
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("columns", &self.columns)
            .field("primary_key", &self.primary_key)
            .finish()
    }
}
