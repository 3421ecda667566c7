//! Error types for mapping, serialization and value conversion.

use thiserror::Error;

/// Errors raised by the driver-agnostic layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An operation targets a type that has no registered table.
    #[error("type `{0}` is not mapped to any table")]
    TypeNotMapped(&'static str),

    /// An expression references a column the table does not declare.
    #[error("column `{column}` not found in table `{table}`")]
    ColumnNotFound {
        /// Table the lookup was performed on.
        table: String,
        /// Column name that was not found.
        column: String,
    },

    /// A NULL was read into a non-optional field.
    #[error("unexpected NULL for a non-optional field")]
    ValueIsNull,

    /// A stored value cannot be converted into the requested field type.
    #[error("cannot read {found} as {expected}")]
    UnknownFieldType {
        /// The field type that was requested.
        expected: &'static str,
        /// What was actually found.
        found: &'static str,
    },

    /// A row does not have the shape the caller expected.
    #[error("column count mismatch: expected {expected}, got {actual}")]
    ColumnCountMismatch {
        /// Expected number of columns.
        expected: usize,
        /// Actual number of columns.
        actual: usize,
    },

    /// The operation needs a primary key and the table has none.
    #[error("table `{0}` has no primary key")]
    MissingPrimaryKey(String),

    /// A table declaration or statement fragment is malformed.
    #[error("invalid constraint: {0}")]
    InvalidConstraintBuilder(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
