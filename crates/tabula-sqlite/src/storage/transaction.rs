//! Explicit transactions.
//!
//! A transaction holds an extra retain on the connection so that the
//! statements inside it run on one handle even for file databases.

use tracing::{debug, warn};

use super::Storage;
use crate::error::Result;
use crate::statement::execute_batch;

impl Storage {
    /// Retains the connection and runs `BEGIN TRANSACTION`.
    ///
    /// # Errors
    ///
    /// Returns the open error or [`Error::Engine`](crate::Error::Engine) if
    /// BEGIN fails (for example when a transaction is already open). The
    /// retain is undone on failure.
    pub fn begin_transaction(&self) -> Result<()> {
        if let Err(err) = self.holder.retain() {
            self.holder.release_quietly();
            return Err(err);
        }
        if let Err(err) = self.with_connection(|conn| execute_batch(conn, "BEGIN TRANSACTION")) {
            self.holder.release_quietly();
            return Err(err);
        }
        self.in_transaction.set(true);
        debug!(filename = %self.filename(), "Transaction started");
        Ok(())
    }

    /// Runs `COMMIT` and drops the transaction's retain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`](crate::Error::Engine) if COMMIT fails; the
    /// retain is dropped either way.
    pub fn commit(&self) -> Result<()> {
        self.finish("COMMIT")
    }

    /// Runs `ROLLBACK` and drops the transaction's retain.
    ///
    /// # Errors
    ///
    /// See [`commit`](Self::commit).
    pub fn rollback(&self) -> Result<()> {
        self.finish("ROLLBACK")
    }

    /// Runs `f` inside a transaction.
    ///
    /// `Ok(true)` commits, `Ok(false)` rolls back. An error from `f` rolls
    /// back and is returned. The returned flag tells whether the work was
    /// committed.
    ///
    /// # Errors
    ///
    /// Returns the first of: the BEGIN error, the error of `f`, the
    /// COMMIT/ROLLBACK error.
    pub fn transaction<F>(&self, f: F) -> Result<bool>
    where
        F: FnOnce(&Self) -> Result<bool>,
    {
        self.begin_transaction()?;
        match f(self) {
            Ok(true) => self.commit().map(|()| true),
            Ok(false) => self.rollback().map(|()| false),
            Err(err) => {
                if let Err(rollback_err) = self.rollback() {
                    warn!(error = %rollback_err, "Rollback after failed transaction body failed");
                }
                Err(err)
            }
        }
    }

    fn finish(&self, sql: &str) -> Result<()> {
        let result = self.with_connection(|conn| execute_batch(conn, sql));
        if self.in_transaction.replace(false) {
            self.holder.release()?;
        } else {
            warn!(statement = sql, "No transaction in progress");
        }
        debug!(filename = %self.filename(), statement = sql, "Transaction finished");
        result
    }
}

#[cfg(test)]
mod tests {
    use tabula_core::schema::{Column, Schema, Table};
    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Note {
        id: i64,
        body: String,
    }

    fn schema() -> Schema {
        Schema::new().table(
            Table::<Note>::new("notes")
                .column(Column::new("id", |n: &Note| &n.id, |n, v| n.id = v).primary_key())
                .column(Column::new("body", |n: &Note| &n.body, |n, v| n.body = v)),
        )
    }

    fn file_storage(dir: &TempDir) -> Storage {
        let path = dir.path().join("notes.db");
        let storage = Storage::open(path.to_string_lossy(), schema()).unwrap();
        storage.sync_schema(false).unwrap();
        storage
    }

    #[test]
    fn test_transaction_keeps_file_connection_open() {
        let dir = TempDir::new().unwrap();
        let storage = file_storage(&dir);
        assert!(!storage.is_opened());

        storage.begin_transaction().unwrap();
        assert!(storage.is_opened());
        assert!(storage.in_transaction());
        storage.commit().unwrap();

        assert!(!storage.is_opened());
        assert!(!storage.in_transaction());
        assert_eq!(storage.connection_holder().retain_count(), 0);
    }

    #[test]
    fn test_rollback_discards_inserts() {
        let dir = TempDir::new().unwrap();
        let storage = file_storage(&dir);

        storage.begin_transaction().unwrap();
        storage.insert(&Note { id: 0, body: "draft".into() }).unwrap();
        storage.rollback().unwrap();

        assert_eq!(storage.count::<Note>(&[]).unwrap(), 0);
    }

    #[test]
    fn test_nested_begin_fails_and_stays_balanced() {
        let storage = Storage::open(":memory:", schema()).unwrap();
        storage.begin_transaction().unwrap();
        let before = storage.connection_holder().retain_count();

        assert!(storage.begin_transaction().is_err());
        assert_eq!(storage.connection_holder().retain_count(), before);

        storage.rollback().unwrap();
    }

    #[test]
    fn test_transaction_closure_error_rolls_back() {
        let storage = Storage::open(":memory:", schema()).unwrap();
        storage.sync_schema(false).unwrap();

        let result = storage.transaction(|s| {
            s.insert(&Note { id: 0, body: "lost".into() })?;
            s.execute_raw("INSERT INTO missing VALUES (1)")?;
            Ok(true)
        });

        assert!(result.is_err());
        assert!(!storage.in_transaction());
        assert_eq!(storage.count::<Note>(&[]).unwrap(), 0);
    }
}
