//! SQL text generation for DDL and single-row CRUD.
//!
//! SQLite cannot add PRIMARY KEY or UNIQUE columns with `ALTER TABLE`, so
//! those changes go through table recreation (see [`crate::sync`]).

use tabula_core::schema::{ColumnInfo, TableSchema};
use tabula_core::serializer::quote_identifier;

/// SQLite statement generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Quotes an identifier.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        quote_identifier(name)
    }

    fn quote_list<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> String {
        names
            .into_iter()
            .map(|n| self.quote_identifier(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Generates a column definition.
    #[must_use]
    pub fn column_definition(&self, column: &ColumnInfo) -> String {
        let mut parts = vec![
            self.quote_identifier(&column.name),
            column.sql_type.as_str().to_string(),
        ];

        if let Some(pk) = &column.primary_key {
            parts.push("PRIMARY KEY".to_string());
            if let Some(order) = pk.order {
                parts.push(order.as_str().to_string());
            }
            if let Some(conflict) = pk.conflict {
                parts.push(format!("ON CONFLICT {}", conflict.as_str()));
            }
            if pk.autoincrement {
                parts.push("AUTOINCREMENT".to_string());
            }
        }

        if column.not_null {
            parts.push("NOT NULL".to_string());
            if let Some(conflict) = column.not_null_conflict {
                parts.push(format!("ON CONFLICT {}", conflict.as_str()));
            }
        }

        if let Some(unique) = &column.unique {
            parts.push("UNIQUE".to_string());
            if let Some(conflict) = unique.conflict {
                parts.push(format!("ON CONFLICT {}", conflict.as_str()));
            }
        }

        if let Some(default) = &column.default {
            parts.push(format!("DEFAULT {}", default.to_sql_inline()));
        }

        parts.join(" ")
    }

    /// Generates `CREATE TABLE name (...)` for `table`, leaving out the
    /// columns named in `skip`.
    #[must_use]
    pub fn create_table_sql(&self, table: &dyn TableSchema, name: &str, skip: &[&str]) -> String {
        let mut defs: Vec<String> = table
            .column_infos()
            .into_iter()
            .filter(|c| !skip.contains(&c.name.as_str()))
            .map(|c| self.column_definition(c))
            .collect();

        let composite = table.table_primary_key();
        if !composite.is_empty() {
            defs.push(format!(
                "PRIMARY KEY ({})",
                self.quote_list(
                    composite
                        .iter()
                        .map(String::as_str)
                        .filter(|c| !skip.contains(c))
                )
            ));
        }

        format!(
            "CREATE TABLE {} ({})",
            self.quote_identifier(name),
            defs.join(", ")
        )
    }

    /// Generates `ALTER TABLE ... ADD COLUMN ...`.
    #[must_use]
    pub fn add_column_sql(&self, table: &str, column: &ColumnInfo) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_identifier(table),
            self.column_definition(column)
        )
    }

    /// Generates `DROP TABLE ...`.
    #[must_use]
    pub fn drop_table_sql(&self, name: &str) -> String {
        format!("DROP TABLE {}", self.quote_identifier(name))
    }

    /// Generates `ALTER TABLE ... RENAME TO ...`.
    #[must_use]
    pub fn rename_table_sql(&self, old_name: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {}",
            self.quote_identifier(old_name),
            self.quote_identifier(new_name)
        )
    }

    /// Generates the copy step of a table recreation.
    #[must_use]
    pub fn copy_rows_sql(&self, from: &str, to: &str, columns: &[&str]) -> String {
        let list = self.quote_list(columns.iter().copied());
        format!(
            "INSERT INTO {} ({list}) SELECT {list} FROM {}",
            self.quote_identifier(to),
            self.quote_identifier(from)
        )
    }

    /// Generates `INSERT INTO` (or `REPLACE INTO`) with one placeholder per
    /// column, or `DEFAULT VALUES` when `columns` is empty.
    #[must_use]
    pub fn insert_sql(&self, table: &str, columns: &[&str], replace: bool) -> String {
        let verb = if replace { "REPLACE" } else { "INSERT" };
        if columns.is_empty() {
            return format!("{verb} INTO {} DEFAULT VALUES", self.quote_identifier(table));
        }
        let placeholders = vec!["?"; columns.len()].join(", ");
        format!(
            "{verb} INTO {} ({}) VALUES ({placeholders})",
            self.quote_identifier(table),
            self.quote_list(columns.iter().copied())
        )
    }

    fn key_filter(&self, keys: &[&str]) -> String {
        keys.iter()
            .map(|k| format!("{} = ?", self.quote_identifier(k)))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Generates `UPDATE ... SET a = ?, ... WHERE key = ? AND ...`.
    #[must_use]
    pub fn update_sql(&self, table: &str, columns: &[&str], keys: &[&str]) -> String {
        let set = columns
            .iter()
            .map(|c| format!("{} = ?", self.quote_identifier(c)))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {set} WHERE {}",
            self.quote_identifier(table),
            self.key_filter(keys)
        )
    }

    /// Generates `DELETE FROM ... WHERE key = ? AND ...`.
    #[must_use]
    pub fn delete_sql(&self, table: &str, keys: &[&str]) -> String {
        format!(
            "DELETE FROM {} WHERE {}",
            self.quote_identifier(table),
            self.key_filter(keys)
        )
    }

    /// Generates `SELECT a, b, ... FROM table`.
    #[must_use]
    pub fn select_sql(&self, table: &str, columns: &[&str]) -> String {
        format!(
            "SELECT {} FROM {}",
            self.quote_list(columns.iter().copied()),
            self.quote_identifier(table)
        )
    }

    /// Generates `SELECT ... FROM table WHERE key = ? AND ...`.
    #[must_use]
    pub fn select_by_keys_sql(&self, table: &str, columns: &[&str], keys: &[&str]) -> String {
        format!(
            "{} WHERE {}",
            self.select_sql(table, columns),
            self.key_filter(keys)
        )
    }
}
