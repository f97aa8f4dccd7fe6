//! Transaction helpers.
//!
//! Every multi-step write in the program stores runs inside an IMMEDIATE
//! transaction so the write lock is taken up front.

use rusqlite::{Transaction, TransactionBehavior};

use crate::error::{Error, Result};

use super::connection::Database;

impl Database {
    /// Starts an IMMEDIATE transaction.
    ///
    /// Dropping the returned transaction without committing rolls it back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if another writer holds the database
    /// for longer than the busy timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// use frontdesk::database::Database;
    ///
    /// let mut db = Database::open_in_memory().unwrap();
    /// let tx = db.begin_transaction().unwrap();
    /// tx.execute("DELETE FROM students", []).unwrap();
    /// tx.commit().unwrap();
    /// ```
    pub fn begin_transaction(&mut self) -> Result<Transaction<'_>> {
        let seconds = self.config.busy_timeout.as_secs();
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| on_busy(e, seconds))
    }
}

/// Maps `SQLITE_BUSY`/`SQLITE_LOCKED` to [`Error::LockTimeout`].
pub(crate) fn on_busy(err: rusqlite::Error, seconds: u64) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) =>
        {
            Error::LockTimeout { seconds }
        }
        _ => Error::from(err),
    }
}
