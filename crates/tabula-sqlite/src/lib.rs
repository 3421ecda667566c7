//! # tabula-sqlite
//!
//! SQLite driver for `tabula-core`.
//!
//! This crate turns a [`Schema`](tabula_core::Schema) into a working
//! database:
//! - [`Storage`]: typed CRUD, bulk updates and deletes, ad-hoc SELECTs,
//!   aggregates and transactions over mapped structs
//! - Schema synchronization that compares each declared table with what
//!   `PRAGMA table_info` reports and adds, rebuilds or recreates it
//! - A reference-counted [`ConnectionHolder`] that opens the database
//!   lazily and closes it when the last user releases it
//!
//! # Connection lifetime
//!
//! File databases are opened for each operation and closed afterwards.
//! In-memory databases (`""` or `":memory:"`) and storages opened with
//! [`StorageOptions::open_forever`] keep a permanent retain, so their
//! content survives between calls. A transaction adds a retain of its own
//! until it is committed or rolled back.
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::builder::{col, set, where_};
//! use tabula_core::schema::{Column, Schema, Table};
//! use tabula_sqlite::Storage;
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Worker {
//!     id: i64,
//!     name: String,
//!     age: i64,
//!     salary: f64,
//! }
//!
//! let schema = Schema::new().table(
//!     Table::<Worker>::new("workers")
//!         .column(Column::new("id", |w: &Worker| &w.id, |w, v| w.id = v).primary_key())
//!         .column(Column::new("name", |w: &Worker| &w.name, |w, v| w.name = v))
//!         .column(Column::new("age", |w: &Worker| &w.age, |w, v| w.age = v))
//!         .column(Column::new("salary", |w: &Worker| &w.salary, |w, v| w.salary = v)),
//! );
//!
//! let storage = Storage::open(":memory:", schema).unwrap();
//! storage.sync_schema(false).unwrap();
//! storage
//!     .insert(&Worker { id: 0, name: "Paul".into(), age: 32, salary: 20000.0 })
//!     .unwrap();
//!
//! let changed = storage
//!     .update_all(
//!         &set([col::<Worker>("salary").assign(25000.0)]),
//!         &[where_(col::<Worker>("age").lt(40))],
//!     )
//!     .unwrap();
//! assert_eq!(changed, 1);
//! ```

pub mod bridge;
pub mod connection;
pub mod dialect;
mod error;
pub mod introspect;
mod options;
pub mod statement;
mod storage;
pub mod sync;

pub use connection::{ConnectionGuard, ConnectionHolder};
pub use dialect::SqliteDialect;
pub use error::{Error, Result};
pub use introspect::IntrospectedColumn;
pub use options::StorageOptions;
pub use storage::Storage;
pub use sync::SyncSchemaResult;

pub use tabula_core;
