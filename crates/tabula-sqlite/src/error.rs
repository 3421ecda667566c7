//! Error types for the SQLite driver.

use thiserror::Error;

/// Errors raised by storage, connection and schema-sync operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Mapping, serialization or value conversion failure.
    #[error(transparent)]
    Core(#[from] tabula_core::Error),

    /// The engine rejected an operation.
    ///
    /// `code` is the extended SQLite result code, or `-1` when the failure
    /// did not originate in the engine itself (for example a type conversion
    /// inside the binding layer).
    #[error("sqlite error {code}: {message}")]
    Engine {
        /// Extended result code.
        code: i32,
        /// Engine message.
        message: String,
    },

    /// An operation needed an open connection and none was available.
    #[error("connection handle is not open")]
    HandleIsNull,

    /// A statement could not be prepared from empty SQL text.
    #[error("statement is empty")]
    StatementIsNull,
}

impl Error {
    /// Returns the extended SQLite result code of an engine error.
    #[must_use]
    pub const fn engine_code(&self) -> Option<i32> {
        match self {
            Self::Engine { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, message) => Self::Engine {
                code: failure.extended_code,
                message: message.unwrap_or_else(|| failure.to_string()),
            },
            other => Self::Engine {
                code: -1,
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, Error>;
