//! Single-object CRUD.
//!
//! Object values always travel as bound parameters, in the column order
//! the generated statement names them.

use tabula_core::schema::{Column, Table, TableSchema};
use tabula_core::{Error as CoreError, SqlValue, ToSqlValue};

use super::Storage;
use crate::error::Result;
use crate::statement::{execute, query_first};

fn names<'a, T>(columns: &[&'a Column<T>]) -> Vec<&'a str> {
    columns.iter().map(|c| c.name()).collect()
}

fn bind_columns<T>(columns: &[&Column<T>], object: &T) -> Vec<SqlValue> {
    columns.iter().map(|c| c.bind(object)).collect()
}

fn check_key_count<T: 'static>(table: &Table<T>, keys: &[SqlValue]) -> Result<()> {
    let expected = table.require_key_columns()?.len();
    if keys.len() != expected {
        return Err(CoreError::ColumnCountMismatch {
            expected,
            actual: keys.len(),
        }
        .into());
    }
    Ok(())
}

impl Storage {
    /// Inserts `object`, letting the engine assign the primary key, and
    /// returns the new row id.
    ///
    /// Primary-key columns are not written; use [`replace`](Self::replace)
    /// to store caller-chosen keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`](crate::Error::Core) if `T` is not mapped and
    /// [`Error::Engine`](crate::Error::Engine) on constraint violations.
    pub fn insert<T: 'static>(&self, object: &T) -> Result<i64> {
        let table = self.table::<T>()?;
        let columns = table.non_key_columns();
        let sql = self
            .dialect()
            .insert_sql(table.name(), &names(&columns), false);
        let params = bind_columns(&columns, object);
        self.with_connection(|conn| {
            execute(conn, &sql, &params)?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Inserts every object of `objects` using one connection acquisition
    /// and returns their row ids in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing insert; earlier rows stay inserted.
    pub fn insert_range<'a, T: 'static>(
        &self,
        objects: impl IntoIterator<Item = &'a T>,
    ) -> Result<Vec<i64>> {
        let table = self.table::<T>()?;
        let columns = table.non_key_columns();
        let sql = self
            .dialect()
            .insert_sql(table.name(), &names(&columns), false);
        self.with_connection(|conn| {
            objects
                .into_iter()
                .map(|object| {
                    execute(conn, &sql, &bind_columns(&columns, object))?;
                    Ok(conn.last_insert_rowid())
                })
                .collect()
        })
    }

    /// Writes every column of `object`, primary key included, with
    /// `REPLACE INTO`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`](crate::Error::Core) if `T` is not mapped and
    /// [`Error::Engine`](crate::Error::Engine) on constraint violations.
    pub fn replace<T: 'static>(&self, object: &T) -> Result<()> {
        self.replace_range([object])
    }

    /// [`replace`](Self::replace) for every object, with one connection
    /// acquisition.
    ///
    /// # Errors
    ///
    /// Stops at the first failing statement.
    pub fn replace_range<'a, T: 'static>(
        &self,
        objects: impl IntoIterator<Item = &'a T>,
    ) -> Result<()> {
        let table = self.table::<T>()?;
        let columns: Vec<&Column<T>> = table.columns().iter().collect();
        let sql = self
            .dialect()
            .insert_sql(table.name(), &names(&columns), true);
        self.with_connection(|conn| {
            for object in objects {
                execute(conn, &sql, &bind_columns(&columns, object))?;
            }
            Ok(())
        })
    }

    /// Writes the non-key columns of `object` to the row with its key.
    ///
    /// A table whose columns are all part of the key has nothing to update
    /// and the call is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`](crate::Error::Core) wrapping
    /// `MissingPrimaryKey` for a table without a key.
    pub fn update<T: 'static>(&self, object: &T) -> Result<()> {
        let table = self.table::<T>()?;
        let keys = table.require_key_columns()?;
        let columns = table.non_key_columns();
        if columns.is_empty() {
            return Ok(());
        }
        let sql = self
            .dialect()
            .update_sql(table.name(), &names(&columns), &names(&keys));
        let mut params = bind_columns(&columns, object);
        params.extend(bind_columns(&keys, object));
        self.execute_with(&sql, &params).map(|_| ())
    }

    /// Deletes the row with the key of `object`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`](crate::Error::Core) wrapping
    /// `MissingPrimaryKey` for a table without a key.
    pub fn delete<T: 'static>(&self, object: &T) -> Result<()> {
        let table = self.table::<T>()?;
        let keys = table.require_key_columns()?;
        let params = bind_columns(&keys, object);
        self.delete_by_keys::<T>(&params)
    }

    /// Deletes the row of `T` whose single-column key equals `key`.
    ///
    /// # Errors
    ///
    /// See [`delete_by_keys`](Self::delete_by_keys).
    pub fn delete_by_id<T: 'static>(&self, key: impl ToSqlValue) -> Result<()> {
        self.delete_by_keys::<T>(&[key.to_sql_value()])
    }

    /// Deletes the row of `T` whose key columns equal `keys`, in key order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`](crate::Error::Core) wrapping
    /// `ColumnCountMismatch` when `keys` does not match the key width.
    pub fn delete_by_keys<T: 'static>(&self, keys: &[SqlValue]) -> Result<()> {
        let table = self.table::<T>()?;
        check_key_count(table, keys)?;
        let key_names = table.primary_key_names();
        let sql = self.dialect().delete_sql(table.name(), &key_names);
        self.execute_with(&sql, keys).map(|_| ())
    }

    /// Fetches the row of `T` whose single-column key equals `key`.
    ///
    /// # Errors
    ///
    /// See [`get_by_keys`](Self::get_by_keys).
    pub fn get<T: Default + 'static>(&self, key: impl ToSqlValue) -> Result<Option<T>> {
        self.get_by_keys(&[key.to_sql_value()])
    }

    /// Fetches the row of `T` whose key columns equal `keys`, in key order.
    /// Returns the first matching row, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`](crate::Error::Core) wrapping
    /// `ColumnCountMismatch` when `keys` does not match the key width, or a
    /// conversion error when a stored value does not fit its field.
    pub fn get_by_keys<T: Default + 'static>(&self, keys: &[SqlValue]) -> Result<Option<T>> {
        let table = self.table::<T>()?;
        check_key_count(table, keys)?;
        let columns: Vec<&str> = table.columns().iter().map(Column::name).collect();
        let key_names = table.primary_key_names();
        let sql = self
            .dialect()
            .select_by_keys_sql(table.name(), &columns, &key_names);
        let row = self.with_connection(|conn| query_first(conn, &sql, keys))?;
        row.map(|values| Ok(table.object_from_row(values)?))
            .transpose()
    }
}
