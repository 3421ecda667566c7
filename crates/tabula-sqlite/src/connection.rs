//! Reference-counted ownership of the native connection handle.
//!
//! A [`ConnectionHolder`] opens the database when its retain count goes
//! from 0 to 1 and closes it when the count drops back to 0. Operations
//! hold a count for their duration through a [`ConnectionGuard`];
//! transactions and pinned databases hold one across calls.

use std::cell::{Cell, Ref, RefCell};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::options::StorageOptions;

/// Returns `true` for filenames that denote a private in-memory database.
#[must_use]
pub fn is_in_memory(filename: &str) -> bool {
    filename.is_empty() || filename == ":memory:"
}

/// Owns zero or one open `rusqlite::Connection` and its retain count.
#[derive(Debug)]
pub struct ConnectionHolder {
    filename: String,
    options: StorageOptions,
    handle: RefCell<Option<rusqlite::Connection>>,
    retain_count: Cell<usize>,
}

impl ConnectionHolder {
    /// Creates a holder for `filename` without opening it.
    #[must_use]
    pub fn new(filename: impl Into<String>, options: StorageOptions) -> Self {
        Self {
            filename: filename.into(),
            options,
            handle: RefCell::new(None),
            retain_count: Cell::new(0),
        }
    }

    /// Database filename as given by the caller.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Options applied on each open.
    #[must_use]
    pub const fn options(&self) -> &StorageOptions {
        &self.options
    }

    /// Current retain count.
    #[must_use]
    pub fn retain_count(&self) -> usize {
        self.retain_count.get()
    }

    /// Returns `true` while the native handle is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.try_borrow().is_ok_and(|h| h.is_some())
    }

    /// Increments the retain count, opening the handle on 0 to 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] if the open or one of the configured
    /// options fails. The count stays incremented in that case; callers
    /// that need balanced counts use [`acquire`](Self::acquire).
    pub fn retain(&self) -> Result<()> {
        let count = self.retain_count.get() + 1;
        self.retain_count.set(count);
        if count == 1 {
            self.open()?;
        }
        Ok(())
    }

    /// Decrements the retain count, closing the handle on 1 to 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] if closing fails.
    pub fn release(&self) -> Result<()> {
        let count = self.retain_count.get();
        if count == 0 {
            warn!(filename = %self.filename, "Release without a matching retain");
            return Ok(());
        }
        self.retain_count.set(count - 1);
        if count == 1 {
            self.close()?;
        }
        Ok(())
    }

    /// Like [`release`](Self::release) but logs close errors instead of
    /// returning them.
    pub fn release_quietly(&self) {
        if let Err(err) = self.release() {
            warn!(
                filename = %self.filename,
                error = %err,
                "Ignoring error while closing connection"
            );
        }
    }

    /// Retains the connection for the lifetime of the returned guard.
    ///
    /// # Errors
    ///
    /// Returns the open error after giving back the count it took.
    pub fn acquire(&self) -> Result<ConnectionGuard<'_>> {
        if let Err(err) = self.retain() {
            self.release_quietly();
            return Err(err);
        }
        Ok(ConnectionGuard { holder: self })
    }

    fn open(&self) -> Result<()> {
        let conn = if is_in_memory(&self.filename) {
            rusqlite::Connection::open_in_memory()?
        } else {
            rusqlite::Connection::open(&self.filename)?
        };
        self.options.apply(&conn)?;
        let mut handle = self
            .handle
            .try_borrow_mut()
            .map_err(|_| Error::HandleIsNull)?;
        *handle = Some(conn);
        info!(filename = %self.filename, "Opened database connection");
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let conn = self
            .handle
            .try_borrow_mut()
            .map_err(|_| Error::HandleIsNull)?
            .take();
        if let Some(conn) = conn {
            conn.close().map_err(|(_, err)| Error::from(err))?;
            info!(filename = %self.filename, "Closed database connection");
        }
        Ok(())
    }
}

/// Keeps the connection retained until dropped.
#[derive(Debug)]
pub struct ConnectionGuard<'a> {
    holder: &'a ConnectionHolder,
}

impl ConnectionGuard<'_> {
    /// Borrows the live connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HandleIsNull`] if the handle is not open.
    pub fn connection(&self) -> Result<Ref<'_, rusqlite::Connection>> {
        let handle = self
            .holder
            .handle
            .try_borrow()
            .map_err(|_| Error::HandleIsNull)?;
        Ref::filter_map(handle, Option::as_ref).map_err(|_| Error::HandleIsNull)
    }
}

impl Drop for ConnectionGuard<'_> {
    fn drop(&mut self) {
        self.holder.release_quietly();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn counting_holder(path: &str) -> (ConnectionHolder, Rc<Cell<usize>>) {
        let opens = Rc::new(Cell::new(0));
        let counter = Rc::clone(&opens);
        let options = StorageOptions::new().on_open(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        (ConnectionHolder::new(path, options), opens)
    }

    #[test]
    fn test_open_once_per_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refcount.db");
        let (holder, opens) = counting_holder(path.to_str().unwrap());

        holder.retain().unwrap();
        holder.retain().unwrap();
        assert_eq!(opens.get(), 1);
        assert_eq!(holder.retain_count(), 2);

        holder.release().unwrap();
        assert!(holder.is_open());
        holder.release().unwrap();
        assert!(!holder.is_open());

        holder.retain().unwrap();
        assert_eq!(opens.get(), 2);
        holder.release().unwrap();
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let (holder, _) = counting_holder(":memory:");
        {
            let guard = holder.acquire().unwrap();
            let conn = guard.connection().unwrap();
            let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0)).unwrap();
            assert_eq!(one, 1);
        }
        assert_eq!(holder.retain_count(), 0);
        assert!(!holder.is_open());
    }

    #[test]
    fn test_failed_acquire_leaves_count_balanced() {
        let options = StorageOptions::new().on_open(|_| {
            Err(Error::Engine {
                code: 1,
                message: "refused".into(),
            })
        });
        let holder = ConnectionHolder::new(":memory:", options);

        assert!(holder.acquire().is_err());
        assert_eq!(holder.retain_count(), 0);
        assert!(!holder.is_open());
    }

    #[test]
    fn test_failed_retain_keeps_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested.db");
        let holder = ConnectionHolder::new(path.to_str().unwrap(), StorageOptions::new());

        assert!(matches!(holder.retain(), Err(Error::Engine { .. })));
        assert_eq!(holder.retain_count(), 1);
        holder.release().unwrap();
        assert_eq!(holder.retain_count(), 0);
    }

    #[test]
    fn test_release_without_retain_is_ignored() {
        let holder = ConnectionHolder::new(":memory:", StorageOptions::new());
        holder.release().unwrap();
        assert_eq!(holder.retain_count(), 0);
    }

    #[test]
    fn test_in_memory_names() {
        assert!(is_in_memory(""));
        assert!(is_in_memory(":memory:"));
        assert!(!is_in_memory("data.db"));
    }
}
