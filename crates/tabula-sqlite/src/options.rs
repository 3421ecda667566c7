//! Storage configuration.

use std::fmt;
use std::time::Duration;

use crate::error::Result;

type OnOpen = Box<dyn Fn(&rusqlite::Connection) -> Result<()>>;

/// Options applied every time the native handle is opened.
///
/// ```rust
/// use std::time::Duration;
/// use tabula_sqlite::StorageOptions;
///
/// let options = StorageOptions::new()
///     .open_forever(true)
///     .busy_timeout(Duration::from_secs(2))
///     .foreign_keys(true)
///     .on_open(|conn| {
///         conn.execute_batch("PRAGMA journal_mode=WAL")?;
///         Ok(())
///     });
/// assert!(options.is_open_forever());
/// ```
#[derive(Default)]
pub struct StorageOptions {
    open_forever: bool,
    busy_timeout: Option<Duration>,
    foreign_keys: Option<bool>,
    on_open: Option<OnOpen>,
}

impl StorageOptions {
    /// Creates options with every setting left at the engine default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps a file database open for the storage's whole lifetime instead
    /// of opening it per operation.
    #[must_use]
    pub const fn open_forever(mut self, enabled: bool) -> Self {
        self.open_forever = enabled;
        self
    }

    /// Sets the busy timeout.
    #[must_use]
    pub const fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = Some(timeout);
        self
    }

    /// Enables or disables foreign key enforcement.
    #[must_use]
    pub const fn foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = Some(enabled);
        self
    }

    /// Runs `callback` right after each open, before any statement.
    #[must_use]
    pub fn on_open<F>(mut self, callback: F) -> Self
    where
        F: Fn(&rusqlite::Connection) -> Result<()> + 'static,
    {
        self.on_open = Some(Box::new(callback));
        self
    }

    /// Returns `true` if the storage keeps the handle open.
    #[must_use]
    pub const fn is_open_forever(&self) -> bool {
        self.open_forever
    }

    pub(crate) fn apply(&self, conn: &rusqlite::Connection) -> Result<()> {
        if let Some(timeout) = self.busy_timeout {
            conn.busy_timeout(timeout)?;
        }
        if let Some(enabled) = self.foreign_keys {
            conn.execute_batch(if enabled {
                "PRAGMA foreign_keys = ON"
            } else {
                "PRAGMA foreign_keys = OFF"
            })?;
        }
        if let Some(callback) = &self.on_open {
            callback(conn)?;
        }
        Ok(())
    }
}

impl fmt::Debug for StorageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageOptions")
            .field("open_forever", &self.open_forever)
            .field("busy_timeout", &self.busy_timeout)
            .field("foreign_keys", &self.foreign_keys)
            .field("on_open", &self.on_open.is_some())
            .finish()
    }
}
