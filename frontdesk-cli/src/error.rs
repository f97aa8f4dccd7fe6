//! Errors that end a `frontdesk` run, and the exit code for each.
//!
//! Errors inside a menu are printed and the menu carries on. Only startup
//! failures and the non-interactive commands reach this type.

use frontdesk::Error as LibError;
use std::fmt;

/// Why the command stopped.
#[derive(Debug)]
pub enum CliError {
    /// The library refused or failed.
    Library(LibError),

    /// A flag value clap accepted but the command cannot use.
    InvalidArguments(String),

    /// Reading or writing outside the database failed.
    Io(std::io::Error),

    /// Another process held the database longer than the busy timeout.
    Timeout {
        /// Seconds waited.
        seconds: u64,
    },

    /// No database yet and `--disable-autoinit` forbids creating one.
    NoDataDirectory,

    /// `config.yaml` or a `FRONTDESK_*` variable could not be used.
    Config(String),
}

/// True for errors where a business rule said no rather than something
/// breaking: a full trip, a taken seat or slot, a record still in use, or
/// a balance floor.
fn refused_by_rule(err: &LibError) -> bool {
    matches!(
        err,
        LibError::CapacityExhausted { .. }
            | LibError::AlreadyAllocated { .. }
            | LibError::Conflict { .. }
            | LibError::LimitExceeded { .. }
    )
}

impl CliError {
    /// Process exit code.
    ///
    /// | code | meaning                                   |
    /// |------|-------------------------------------------|
    /// | 1    | a business rule refused the action        |
    /// | 2    | database lock timeout                     |
    /// | 3    | no database and auto-init disabled        |
    /// | 4    | invalid arguments                         |
    /// | 5    | I/O error                                 |
    /// | 6    | any other library error                   |
    /// | 7    | configuration error                       |
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(e) if refused_by_rule(e) => 1,
            CliError::Library(LibError::Io(_)) | CliError::Io(_) => 5,
            CliError::Library(LibError::Configuration(_)) | CliError::Config(_) => 7,
            CliError::Library(_) => 6,
            CliError::Timeout { .. } => 2,
            CliError::NoDataDirectory => 3,
            CliError::InvalidArguments(_) => 4,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Timeout { seconds } => write!(
                f,
                "Database stayed locked by another frontdesk process for {seconds}s"
            ),
            CliError::NoDataDirectory => write!(
                f,
                "Database not found (run `frontdesk init` or drop --disable-autoinit)"
            ),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        match e {
            LibError::LockTimeout { seconds } => CliError::Timeout { seconds },
            other => CliError::Library(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
