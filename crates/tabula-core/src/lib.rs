//! # tabula-core
//!
//! Driver-agnostic core of the tabula ORM.
//!
//! This crate provides:
//! - A value model and the capability traits a field type implements to be
//!   mapped to a column
//! - Table and column metadata built from explicit getter/setter pairs
//! - A closed expression AST with a context-sensitive SQL serializer
//!
//! It has no engine dependency; `tabula-sqlite` executes what this crate
//! describes.
//!
//! ## Declaring tables
//!
//! ```rust
//! use tabula_core::schema::{Column, Schema, Table};
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     id: i64,
//!     name: String,
//!     email: Option<String>,
//! }
//!
//! let schema = Schema::new().table(
//!     Table::<User>::new("users")
//!         .column(Column::new("id", |u: &User| &u.id, |u, v| u.id = v).primary_key())
//!         .column(Column::new("name", |u: &User| &u.name, |u, v| u.name = v))
//!         .column(Column::new("email", |u: &User| &u.email, |u, v| u.email = v).unique()),
//! );
//! assert!(schema.validate().is_ok());
//! ```
//!
//! ## Building expressions
//!
//! ```rust
//! use tabula_core::builder::{col, lit};
//! # struct User;
//!
//! // users."age" >= 18 AND users."name" LIKE 'A%'
//! let filter = col::<User>("age").gt_eq(18).and(col::<User>("name").like("A%"));
//! # let _ = (filter, lit(1));
//! ```
//!
//! Literal values are inlined with SQL quoting. Values written by the CRUD
//! operations of the driver always travel as bound parameters.

pub mod ast;
pub mod builder;
pub mod error;
pub mod row;
pub mod schema;
pub mod serializer;
pub mod value;

pub use ast::{Clause, Expr, Select};
pub use builder::col;
pub use error::{Error, Result};
pub use row::FromRow;
pub use schema::{Column, ColumnInfo, Schema, Table, TableSchema};
pub use serializer::{serialize, SerializeContext, SerializeSql};
pub use value::{FieldType, FromSqlValue, SqlType, SqlValue, ToSqlValue};
