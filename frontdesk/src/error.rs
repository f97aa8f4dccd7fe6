//! Error types for the frontdesk library.
//!
//! Every program module reports failures through the single [`Error`] enum
//! so that menus can print one message and return to the prompt.

use thiserror::Error;

/// Result type alias for operations that may fail with a frontdesk error.
///
/// # Examples
///
/// ```
/// use frontdesk::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the frontdesk library.
#[derive(Debug, Error)]
pub enum Error {
    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A field failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A record with the same primary key already exists.
    #[error("{entity} '{key}' already exists")]
    Duplicate {
        /// The kind of record.
        entity: String,
        /// The conflicting key.
        key: String,
    },

    /// The requested record was not found.
    #[error("{entity} '{key}' not found")]
    NotFound {
        /// The kind of record.
        entity: String,
        /// The key that was looked up.
        key: String,
    },

    /// A capacity counter has nothing left to hand out.
    #[error("no capacity left: {resource}")]
    CapacityExhausted {
        /// The exhausted resource.
        resource: String,
    },

    /// A specific sub-resource (seat, slot) is already allocated.
    #[error("{slot} is already allocated for {resource}")]
    AlreadyAllocated {
        /// The parent resource.
        resource: String,
        /// The sub-resource that is taken.
        slot: String,
    },

    /// The operation conflicts with the current state of a record.
    #[error("conflict: {details}")]
    Conflict {
        /// Details about the conflict.
        details: String,
    },

    /// A balance or limit rule would be violated.
    #[error("limit exceeded: {details}")]
    LimitExceeded {
        /// Details about the violated limit.
        details: String,
    },

    /// A line in a flat file could not be parsed.
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord {
        /// One-based line number.
        line: usize,
        /// Why the line was rejected.
        reason: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },

    /// A database lock timeout occurred.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },
}

impl Error {
    /// Shorthand for a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a not-found error.
    #[must_use]
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Shorthand for a duplicate-key error.
    #[must_use]
    pub fn duplicate(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Duplicate {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Shorthand for a conflict error.
    #[must_use]
    pub fn conflict(details: impl Into<String>) -> Self {
        Self::Conflict {
            details: details.into(),
        }
    }

    /// Check if error indicates a missing record.
    ///
    /// # Examples
    ///
    /// ```
    /// use frontdesk::Error;
    ///
    /// let err = Error::not_found("student", "S-1");
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error indicates a duplicate primary key.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Converts a UNIQUE/PRIMARY KEY violation into [`Error::Duplicate`].
    ///
    /// Any other error is passed through unchanged.
    #[must_use]
    pub fn on_unique_violation(err: rusqlite::Error, entity: &str, key: &str) -> Self {
        if is_unique_violation(&err) {
            Self::duplicate(entity, key)
        } else {
            Self::from(err)
        }
    }
}

fn constraint_code(err: &rusqlite::Error) -> Option<std::os::raw::c_int> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

/// True for a UNIQUE or PRIMARY KEY constraint failure.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    is_primary_key_violation(err) || is_unique_index_violation(err)
}

/// True for a PRIMARY KEY constraint failure only.
pub(crate) fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    constraint_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
}

/// True for a UNIQUE column or UNIQUE index failure, excluding the primary key.
pub(crate) fn is_unique_index_violation(err: &rusqlite::Error) -> bool {
    constraint_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
}
