//! Table metadata and the schema registry.
//!
//! Tables are declared per mapped type as a [`Table<T>`] of [`Column<T>`]s
//! and collected in a [`Schema`]. Code that does not know `T` (the
//! serializer, the synchronizer, DDL generation) works through the
//! object-safe [`TableSchema`] trait; typed code recovers the concrete table
//! with [`Schema::table`].

mod column;
mod table;

use std::any::Any;
use std::collections::HashSet;

pub use column::{Column, ColumnInfo, Conflict, PrimaryKey, Unique};
pub use table::Table;

use crate::ast::TableKey;
use crate::error::{Error, Result};
use crate::serializer::SchemaLookup;
use crate::value::SqlType;

/// Type-erased view of a table.
pub trait TableSchema: Any {
    /// Table name.
    fn name(&self) -> &str;

    /// Identity of the mapped type.
    fn key(&self) -> TableKey;

    /// Column descriptions in declaration order.
    fn column_infos(&self) -> Vec<&ColumnInfo>;

    /// Table-level primary key column names (empty when keys are declared
    /// on columns).
    fn table_primary_key(&self) -> &[String];

    /// Upcast used to recover the concrete [`Table<T>`].
    fn as_any(&self) -> &dyn Any;

    /// Primary-key column names: the table-level key when declared,
    /// otherwise every column carrying a column-level key.
    fn primary_key_names(&self) -> Vec<&str> {
        let composite = self.table_primary_key();
        if composite.is_empty() {
            self.column_infos()
                .into_iter()
                .filter(|c| c.is_primary_key())
                .map(|c| c.name.as_str())
                .collect()
        } else {
            composite.iter().map(String::as_str).collect()
        }
    }

    /// Returns `true` if `column` is part of the primary key.
    fn is_primary_key(&self, column: &str) -> bool {
        self.primary_key_names().contains(&column)
    }

    /// Looks up a column description by name (case-sensitive).
    fn find_column(&self, name: &str) -> Option<&ColumnInfo> {
        self.column_infos().into_iter().find(|c| c.name == name)
    }

    /// Checks the declaration for constraints SQLite would reject.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConstraintBuilder`] describing the first
    /// problem found.
    fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConstraintBuilder(message));
        let columns = self.column_infos();
        if columns.is_empty() {
            return invalid(format!("table `{}` declares no columns", self.name()));
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return invalid(format!(
                    "column `{}` declared twice in table `{}`",
                    column.name,
                    self.name()
                ));
            }
        }

        let column_keys = columns.iter().filter(|c| c.is_primary_key()).count();
        let composite = self.table_primary_key();
        if !composite.is_empty() && column_keys > 0 {
            return invalid(format!(
                "table `{}` mixes a table-level primary key with column-level keys",
                self.name()
            ));
        }
        if column_keys > 1 {
            return invalid(format!(
                "table `{}` declares PRIMARY KEY on several columns; use a table-level key",
                self.name()
            ));
        }
        for name in composite {
            if !seen.contains(name.as_str()) {
                return invalid(format!(
                    "primary key column `{name}` is not declared in table `{}`",
                    self.name()
                ));
            }
        }
        for column in &columns {
            if column.is_autoincrement() && column.sql_type != SqlType::Integer {
                return invalid(format!(
                    "AUTOINCREMENT column `{}` must be INTEGER",
                    column.name
                ));
            }
        }
        Ok(())
    }
}

/// The set of mapped tables a storage works with.
#[derive(Default)]
pub struct Schema {
    tables: Vec<Box<dyn TableSchema>>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table.
    #[must_use]
    pub fn table<T: 'static>(mut self, table: Table<T>) -> Self {
        self.tables.push(Box::new(table));
        self
    }

    /// Returns the typed table mapped to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeNotMapped`] when no table maps `T`.
    pub fn table_of<T: 'static>(&self) -> Result<&Table<T>> {
        self.find(TableKey::of::<T>())
            .and_then(|table| table.as_any().downcast_ref::<Table<T>>())
            .ok_or(Error::TypeNotMapped(std::any::type_name::<T>()))
    }

    /// Finds a table by mapped type.
    #[must_use]
    pub fn find(&self, key: TableKey) -> Option<&dyn TableSchema> {
        self.tables
            .iter()
            .find(|t| t.key() == key)
            .map(AsRef::as_ref)
    }

    /// Finds a table by name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&dyn TableSchema> {
        self.tables
            .iter()
            .find(|t| t.name() == name)
            .map(AsRef::as_ref)
    }

    /// Iterates over the tables in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn TableSchema> {
        self.tables.iter().map(AsRef::as_ref)
    }

    /// Number of registered tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if no table is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Validates every table and checks that names and mapped types are
    /// unique across the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConstraintBuilder`] for the first problem.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        let mut keys = HashSet::new();
        for table in &self.tables {
            table.validate()?;
            if !names.insert(table.name()) {
                return Err(Error::InvalidConstraintBuilder(format!(
                    "table `{}` registered twice",
                    table.name()
                )));
            }
            if !keys.insert(table.key()) {
                return Err(Error::InvalidConstraintBuilder(format!(
                    "type `{}` mapped to several tables",
                    table.key().type_name()
                )));
            }
        }
        Ok(())
    }
}

impl SchemaLookup for Schema {
    fn find_table(&self, key: TableKey) -> Option<&dyn TableSchema> {
        self.find(key)
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tables.iter().map(|t| t.name()))
            .finish()
    }
}
