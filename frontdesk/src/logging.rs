//! Stderr logging for the frontdesk programs.
//!
//! Program stores report state changes (bookings, balance moves, flag
//! flips) through `log::debug!`. [`Logger::install`] routes those records
//! to stderr at the verbosity picked by [`init_logger`].

use std::env;
use std::fmt;

use crate::error::Result;
use crate::validate::one_of;

/// Environment variable read by [`init_logger`] when no flag is given.
pub const LOG_MODE_VAR: &str = "FRONTDESK_LOG_MODE";

/// How much the programs say on stderr, from least to most.
///
/// ```
/// use frontdesk::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Nothing at all.
    Quiet,
    /// Errors and warnings, such as skipped lines in a data file.
    Normal,
    /// Everything, including every state change.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Quiet => "quiet",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
        })
    }
}

impl LogLevel {
    /// Reads `quiet`, `normal` or `verbose` in any case.
    ///
    /// # Errors
    ///
    /// Returns a validation error for any other word.
    ///
    /// ```
    /// use frontdesk::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("chatty").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        Ok(match one_of("log_mode", s, &["quiet", "normal", "verbose"])? {
            "quiet" => Self::Quiet,
            "normal" => Self::Normal,
            _ => Self::Verbose,
        })
    }

    /// The most verbose `log` level that passes at this setting.
    #[must_use]
    pub const fn level_filter(self) -> log::LevelFilter {
        match self {
            Self::Quiet => log::LevelFilter::Off,
            Self::Normal => log::LevelFilter::Warn,
            Self::Verbose => log::LevelFilter::Debug,
        }
    }
}

/// Writes tagged lines to stderr when the level allows it.
///
/// ```
/// use frontdesk::{Logger, LogLevel};
///
/// let logger = Logger::new(LogLevel::Normal);
/// logger.warn("stock is running low");
/// logger.debug("not printed at Normal");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// A logger at `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// The level this logger was built with.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    fn emit(&self, needs: LogLevel, tag: &str, message: &str) {
        if self.level >= needs {
            eprintln!("{tag}: {message}");
        }
    }

    /// Prints `ERROR: message` unless quiet.
    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Normal, "ERROR", message);
    }

    /// Prints `WARN: message` unless quiet.
    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Normal, "WARN", message);
    }

    /// Prints `INFO: message` when verbose.
    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Verbose, "INFO", message);
    }

    /// Prints `DEBUG: message` when verbose.
    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Verbose, "DEBUG", message);
    }

    /// Makes this logger the process-wide `log` backend.
    ///
    /// The first call wins; later calls change nothing.
    pub fn install(self) {
        if log::set_boxed_logger(Box::new(self)).is_ok() {
            log::set_max_level(self.level.level_filter());
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.level.level_filter()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        match record.level() {
            log::Level::Error => self.error(&message),
            log::Level::Warn => self.warn(&message),
            log::Level::Info => self.info(&message),
            // Debug lines name the program module they came from
            log::Level::Debug | log::Level::Trace => {
                self.debug(&format!("[{}] {message}", record.target()));
            }
        }
    }

    fn flush(&self) {}
}

/// Picks the level from the flags, then [`LOG_MODE_VAR`], then Normal.
///
/// `verbose` wins over `quiet`. An unreadable `FRONTDESK_LOG_MODE` is
/// ignored.
///
/// ```
/// use frontdesk::{init_logger, LogLevel};
///
/// assert_eq!(init_logger(true, false).level(), LogLevel::Verbose);
/// ```
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    let level = if verbose {
        LogLevel::Verbose
    } else if quiet {
        LogLevel::Quiet
    } else {
        env::var(LOG_MODE_VAR)
            .ok()
            .and_then(|mode| LogLevel::parse(&mode).ok())
            .unwrap_or(LogLevel::Normal)
    };
    Logger::new(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;
    use serial_test::serial;

    #[test]
    fn test_parse_and_display_agree() {
        for level in [LogLevel::Quiet, LogLevel::Normal, LogLevel::Verbose] {
            assert_eq!(LogLevel::parse(&level.to_string()).unwrap(), level);
        }
        assert_eq!(LogLevel::parse(" Normal ").unwrap(), LogLevel::Normal);
        assert!(LogLevel::parse("").unwrap_err().to_string().contains("log_mode"));
    }

    #[test]
    fn test_record_filtering_follows_level() {
        let warn = log::Metadata::builder().level(log::Level::Warn).build();
        let debug = log::Metadata::builder().level(log::Level::Debug).build();

        let normal = Logger::default();
        assert!(normal.enabled(&warn));
        assert!(!normal.enabled(&debug));

        assert!(Logger::new(LogLevel::Verbose).enabled(&debug));
        assert!(!Logger::new(LogLevel::Quiet).enabled(&warn));
    }

    #[test]
    fn test_flags_beat_each_other_in_order() {
        assert_eq!(init_logger(true, false).level(), LogLevel::Verbose);
        assert_eq!(init_logger(false, true).level(), LogLevel::Quiet);
        assert_eq!(init_logger(true, true).level(), LogLevel::Verbose);
    }

    #[test]
    #[serial]
    fn test_log_mode_variable() {
        let saved = env::var(LOG_MODE_VAR).ok();

        env::set_var(LOG_MODE_VAR, "quiet");
        assert_eq!(init_logger(false, false).level(), LogLevel::Quiet);
        assert_eq!(init_logger(true, false).level(), LogLevel::Verbose);

        env::set_var(LOG_MODE_VAR, "shouty");
        assert_eq!(init_logger(false, false).level(), LogLevel::Normal);

        match saved {
            Some(val) => env::set_var(LOG_MODE_VAR, val),
            None => env::remove_var(LOG_MODE_VAR),
        }
    }
}
