//! Atomic capacity counters and exclusive status flags.
//!
//! Seats on a trip, units of stock, a book on the shelf and a car in the
//! lot are all the same shape: a number (or a two-state flag) that must
//! never be handed out twice. Every function here is a single conditional
//! `UPDATE`, so the check and the write cannot be separated by another
//! writer. Callers run them inside an immediate transaction together with
//! the insert or delete of the allocation row; if that row violates a
//! UNIQUE index the whole transaction is dropped and rolled back.
//!
//! # Examples
//!
//! ```
//! use frontdesk::capacity::{claim, release, Counter};
//! use rusqlite::Connection;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! conn.execute_batch(
//!     "CREATE TABLE shelf (id TEXT PRIMARY KEY, left_over INTEGER, total INTEGER);
//!      INSERT INTO shelf VALUES ('A', 2, 2);",
//! ).unwrap();
//!
//! let counter = Counter::new("shelf", "id", "left_over", "shelf");
//! assert_eq!(claim(&conn, &counter, "A", 2).unwrap(), 0);
//! assert!(claim(&conn, &counter, "A", 1).is_err());
//! assert_eq!(release(&conn, &counter, "A", 5, Some("total")).unwrap(), 2);
//! ```

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{is_unique_index_violation, Error, Result};

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

/// Describes an integer capacity column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    /// Table holding the counter.
    pub table: &'static str,
    /// Primary key column used to find the row.
    pub key_column: &'static str,
    /// The counter column.
    pub count_column: &'static str,
    /// Human name of the row kind, used in error messages.
    pub entity: &'static str,
}

impl Counter {
    /// Creates a counter descriptor.
    #[must_use]
    pub const fn new(
        table: &'static str,
        key_column: &'static str,
        count_column: &'static str,
        entity: &'static str,
    ) -> Self {
        Self {
            table,
            key_column,
            count_column,
            entity,
        }
    }
}

/// Describes a two-state status column acting as a counter of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flag {
    /// Table holding the flag.
    pub table: &'static str,
    /// Primary key column used to find the row.
    pub key_column: &'static str,
    /// The status column.
    pub flag_column: &'static str,
    /// Value meaning "free to take".
    pub free: &'static str,
    /// Value meaning "taken".
    pub taken: &'static str,
    /// Human name of the row kind, used in error messages.
    pub entity: &'static str,
}

fn ensure_amount(amount: i64) -> Result<()> {
    if amount <= 0 {
        return Err(Error::validation(
            "amount",
            format!("must be greater than 0, got {amount}"),
        ));
    }
    Ok(())
}

fn row_exists(conn: &Connection, table: &str, key_column: &str, key: &str) -> Result<bool> {
    let sql = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE {key_column} = ?1)");
    Ok(conn.query_row(&sql, [key], |row| row.get(0))?)
}

/// Takes `amount` from the counter and returns what is left.
///
/// The decrement only happens when at least `amount` remains.
///
/// # Errors
///
/// - [`Error::NotFound`] when no row has `key`
/// - [`Error::CapacityExhausted`] when fewer than `amount` remain
/// - [`Error::Validation`] when `amount` is not positive
pub fn claim(conn: &Connection, counter: &Counter, key: &str, amount: i64) -> Result<i64> {
    ensure_amount(amount)?;
    let Counter {
        table,
        key_column,
        count_column,
        entity,
    } = *counter;

    let sql = format!(
        "UPDATE {table} SET {count_column} = {count_column} - ?1 \
         WHERE {key_column} = ?2 AND {count_column} >= ?1 \
         RETURNING {count_column}"
    );
    let remaining: Option<i64> = conn
        .query_row(&sql, params![amount, key], |row| row.get(0))
        .optional()?;

    match remaining {
        Some(left) => {
            log::debug!("claimed {amount} from {entity} '{key}', {left} left");
            Ok(left)
        }
        None if row_exists(conn, table, key_column, key)? => Err(Error::CapacityExhausted {
            resource: format!("{entity} '{key}'"),
        }),
        None => Err(Error::not_found(entity, key)),
    }
}

/// Gives `amount` back to the counter and returns the new value.
///
/// When `ceiling` names a column, the counter is clamped to that column's
/// value so a double release can never push it past the total.
///
/// # Errors
///
/// - [`Error::NotFound`] when no row has `key`
/// - [`Error::LimitExceeded`] when the counter would overflow
/// - [`Error::Validation`] when `amount` is not positive
pub fn release(
    conn: &Connection,
    counter: &Counter,
    key: &str,
    amount: i64,
    ceiling: Option<&str>,
) -> Result<i64> {
    ensure_amount(amount)?;
    let Counter {
        table,
        key_column,
        count_column,
        entity,
    } = *counter;

    let new_value = match ceiling {
        Some(ceiling_column) => {
            format!("MIN({count_column} + ?1, {ceiling_column})")
        }
        None => format!("{count_column} + ?1"),
    };
    let sql = format!(
        "UPDATE {table} SET {count_column} = {new_value} \
         WHERE {key_column} = ?2 AND {count_column} <= ?3 - ?1 \
         RETURNING {count_column}"
    );
    let updated: Option<i64> = conn
        .query_row(&sql, params![amount, key, i64::MAX], |row| row.get(0))
        .optional()?;

    match updated {
        Some(value) => {
            log::debug!("released {amount} to {entity} '{key}', now {value}");
            Ok(value)
        }
        None if row_exists(conn, table, key_column, key)? => Err(Error::LimitExceeded {
            details: format!("{entity} '{key}' cannot hold {amount} more"),
        }),
        None => Err(Error::not_found(entity, key)),
    }
}

/// Flips the flag from `free` to `taken`.
///
/// # Errors
///
/// - [`Error::NotFound`] when no row has `key`
/// - [`Error::Conflict`] when the flag is not currently `free`
pub fn acquire_flag(conn: &Connection, flag: &Flag, key: &str) -> Result<()> {
    swap_flag(conn, flag, key, flag.free, flag.taken)
}

/// Flips the flag from `taken` back to `free`.
///
/// # Errors
///
/// - [`Error::NotFound`] when no row has `key`
/// - [`Error::Conflict`] when the flag is not currently `taken`
pub fn release_flag(conn: &Connection, flag: &Flag, key: &str) -> Result<()> {
    swap_flag(conn, flag, key, flag.taken, flag.free)
}

fn swap_flag(conn: &Connection, flag: &Flag, key: &str, from: &str, to: &str) -> Result<()> {
    let Flag {
        table,
        key_column,
        flag_column,
        entity,
        ..
    } = *flag;

    let sql = format!(
        "UPDATE {table} SET {flag_column} = ?1 WHERE {key_column} = ?2 AND {flag_column} = ?3"
    );
    let changed = conn.execute(&sql, params![to, key, from])?;
    if changed == 1 {
        log::debug!("{entity} '{key}' is now {to}");
        return Ok(());
    }

    if !row_exists(conn, table, key_column, key)? {
        return Err(Error::not_found(entity, key));
    }
    let current: String = conn.query_row(
        &format!("SELECT {flag_column} FROM {table} WHERE {key_column} = ?1"),
        [key],
        |row| row.get(0),
    )?;
    Err(Error::conflict(format!(
        "{entity} '{key}' is {current}, expected {from}"
    )))
}

/// Turns a UNIQUE index violation on an allocation row into
/// [`Error::AlreadyAllocated`]; every other error passes through.
///
/// Primary key violations are not matched, so a duplicate allocation id is
/// still reported by the caller as a duplicate.
#[must_use]
pub fn map_allocation_conflict(err: rusqlite::Error, resource: &str, slot: &str) -> Error {
    if is_unique_index_violation(&err) {
        Error::AlreadyAllocated {
            resource: resource.to_string(),
            slot: slot.to_string(),
        }
    } else {
        Error::from(err)
    }
}
