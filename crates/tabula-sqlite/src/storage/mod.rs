//! The typed storage facade.
//!
//! A [`Storage`] pairs a [`Schema`] with a database file. Every operation
//! acquires the connection for its own duration, so a file database is
//! opened and closed per call unless it is pinned (in-memory databases,
//! `open_forever`) or a transaction is in progress.
//!
//! ```rust
//! use tabula_core::schema::{Column, Schema, Table};
//! use tabula_sqlite::Storage;
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! let schema = Schema::new().table(
//!     Table::<User>::new("users")
//!         .column(Column::new("id", |u: &User| &u.id, |u, v| u.id = v).primary_key())
//!         .column(Column::new("name", |u: &User| &u.name, |u, v| u.name = v)),
//! );
//! let storage = Storage::open(":memory:", schema).unwrap();
//! storage.sync_schema(false).unwrap();
//!
//! let id = storage.insert(&User { id: 0, name: "Ada".into() }).unwrap();
//! let user: Option<User> = storage.get(id).unwrap();
//! assert_eq!(user.unwrap().name, "Ada");
//! ```

mod aggregate;
mod crud;
mod query;
mod transaction;

use std::cell::Cell;
use std::collections::BTreeMap;

use tabula_core::schema::{Schema, Table};
use tabula_core::serializer::SerializeContext;
use tabula_core::{FromSqlValue, SqlValue};
use tracing::{info, warn};

use crate::connection::{is_in_memory, ConnectionHolder};
use crate::dialect::SqliteDialect;
use crate::error::Result;
use crate::introspect;
use crate::options::StorageOptions;
use crate::statement::{execute, execute_batch, query_scalar};
use crate::sync::{plan_table, sync_table, SyncSchemaResult};

/// Typed access to one database file.
///
/// Not `Sync`: the connection and its retain count live in `Cell`s.
#[derive(Debug)]
pub struct Storage {
    schema: Schema,
    holder: ConnectionHolder,
    dialect: SqliteDialect,
    pinned: bool,
    in_transaction: Cell<bool>,
}

impl Storage {
    /// Opens a storage with default options.
    ///
    /// `""` and `":memory:"` open a private in-memory database, which stays
    /// open until the storage is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`](crate::Error::Core) for an invalid schema and
    /// [`Error::Engine`](crate::Error::Engine) if a pinned database cannot
    /// be opened.
    pub fn open(filename: impl Into<String>, schema: Schema) -> Result<Self> {
        Self::with_options(filename, schema, StorageOptions::new())
    }

    /// Opens a storage with explicit options.
    ///
    /// # Errors
    ///
    /// See [`Storage::open`].
    pub fn with_options(
        filename: impl Into<String>,
        schema: Schema,
        options: StorageOptions,
    ) -> Result<Self> {
        schema.validate()?;
        let filename = filename.into();
        let pinned = is_in_memory(&filename) || options.is_open_forever();
        let holder = ConnectionHolder::new(filename, options);
        if pinned {
            if let Err(err) = holder.retain() {
                holder.release_quietly();
                return Err(err);
            }
        }
        Ok(Self {
            schema,
            holder,
            dialect: SqliteDialect::new(),
            pinned,
            in_transaction: Cell::new(false),
        })
    }

    /// The mapped schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Database filename.
    #[must_use]
    pub fn filename(&self) -> &str {
        self.holder.filename()
    }

    /// The connection holder, for callers that manage retains themselves.
    #[must_use]
    pub const fn connection_holder(&self) -> &ConnectionHolder {
        &self.holder
    }

    /// Returns `true` while the native handle is open.
    #[must_use]
    pub fn is_opened(&self) -> bool {
        self.holder.is_open()
    }

    /// Returns `true` between `begin_transaction` and `commit`/`rollback`.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.in_transaction.get()
    }

    pub(crate) fn table<T: 'static>(&self) -> Result<&Table<T>> {
        Ok(self.schema.table_of::<T>()?)
    }

    pub(crate) fn context(&self) -> SerializeContext<'_> {
        SerializeContext::new(&self.schema)
    }

    pub(crate) const fn dialect(&self) -> SqliteDialect {
        self.dialect
    }

    /// Runs `f` with the connection retained for the call.
    ///
    /// # Errors
    ///
    /// Returns the open error or whatever `f` returns.
    pub fn with_connection<R>(
        &self,
        f: impl FnOnce(&rusqlite::Connection) -> Result<R>,
    ) -> Result<R> {
        let guard = self.holder.acquire()?;
        let conn = guard.connection()?;
        f(&conn)
    }

    /// Runs raw SQL without parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`](crate::Error::Engine) on failure.
    pub fn execute_raw(&self, sql: &str) -> Result<()> {
        self.with_connection(|conn| execute_batch(conn, sql))
    }

    /// Returns `true` if a table named `name` exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`](crate::Error::Engine) on failure.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        self.with_connection(|conn| introspect::table_exists(conn, name))
    }

    /// Returns the names of all user tables, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`](crate::Error::Engine) on failure.
    pub fn table_names(&self) -> Result<Vec<String>> {
        self.with_connection(introspect::table_names)
    }

    /// Drops the table `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`](crate::Error::Engine) if it does not exist.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let sql = self.dialect.drop_table_sql(name);
        self.with_connection(|conn| execute_batch(conn, &sql))
    }

    /// Renames the table `old_name` to `new_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`](crate::Error::Engine) on failure.
    pub fn rename_table(&self, old_name: &str, new_name: &str) -> Result<()> {
        let sql = self.dialect.rename_table_sql(old_name, new_name);
        self.with_connection(|conn| execute_batch(conn, &sql))
    }

    /// Row id of the most recent successful INSERT on this connection.
    ///
    /// Only meaningful while the connection stays open between the insert
    /// and this call (pinned databases, transactions).
    ///
    /// # Errors
    ///
    /// Returns the open error, if any.
    pub fn last_insert_rowid(&self) -> Result<i64> {
        self.with_connection(|conn| Ok(conn.last_insert_rowid()))
    }

    /// Number of rows changed by the most recent statement on this
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns the open error, if any.
    pub fn changes(&self) -> Result<i64> {
        self.with_connection(|conn| {
            let value = query_scalar(conn, "SELECT changes()", &[])?;
            Ok(i64::from_sql_value(value)?)
        })
    }

    /// Reads `PRAGMA user_version`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`](crate::Error::Engine) on failure.
    pub fn user_version(&self) -> Result<i64> {
        self.with_connection(|conn| {
            let value = query_scalar(conn, "PRAGMA user_version", &[])?;
            Ok(i64::from_sql_value(value)?)
        })
    }

    /// Writes `PRAGMA user_version`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`](crate::Error::Engine) on failure.
    pub fn set_user_version(&self, version: i64) -> Result<()> {
        let sql = format!("PRAGMA user_version = {version}");
        self.with_connection(|conn| execute_batch(conn, &sql))
    }

    /// Brings every declared table in line with the declaration, one table
    /// at a time in registration order.
    ///
    /// With `preserve`, tables that have columns the declaration dropped are
    /// rebuilt keeping their rows; otherwise they are dropped and recreated.
    ///
    /// # Errors
    ///
    /// Returns the first failure. Tables already processed keep their new
    /// shape.
    pub fn sync_schema(&self, preserve: bool) -> Result<BTreeMap<String, SyncSchemaResult>> {
        info!(filename = %self.filename(), preserve, "Synchronizing schema");
        self.with_connection(|conn| {
            let mut results = BTreeMap::new();
            for table in self.schema.iter() {
                let result = sync_table(conn, self.dialect, table, preserve)?;
                results.insert(table.name().to_string(), result);
            }
            Ok(results)
        })
    }

    /// Reports what [`sync_schema`](Self::sync_schema) would do without
    /// changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`](crate::Error::Engine) if introspection
    /// fails.
    pub fn sync_schema_simulate(
        &self,
        preserve: bool,
    ) -> Result<BTreeMap<String, SyncSchemaResult>> {
        self.with_connection(|conn| {
            let mut results = BTreeMap::new();
            for table in self.schema.iter() {
                let plan = plan_table(conn, table, preserve)?;
                results.insert(table.name().to_string(), plan.result);
            }
            Ok(results)
        })
    }

    pub(crate) fn execute_with(&self, sql: &str, params: &[SqlValue]) -> Result<usize> {
        self.with_connection(|conn| execute(conn, sql, params))
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        if self.in_transaction.get() {
            warn!(
                filename = %self.filename(),
                "Storage dropped inside a transaction, rolling back"
            );
            self.with_connection(|conn| execute_batch(conn, "ROLLBACK"))
                .unwrap_or_else(|err| warn!(error = %err, "Rollback on drop failed"));
            self.holder.release_quietly();
        }
        if self.pinned {
            self.holder.release_quietly();
        }
    }
}
