//! Utility functions shared by CLI commands.
//!
//! Resolves the data directory, loads configuration and opens the
//! database the same way for every command.

use crate::error::CliError;
use chrono::{Local, NaiveDate};
use frontdesk::database::DATABASE_FILE_NAME;
use frontdesk::{Config, ConfigBuilder, Database, DatabaseConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the lock wait (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Resolve the data directory: `--data-dir` first, then the library default.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match &global.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => frontdesk::database::resolve_data_dir()
            .map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load layered configuration from the data directory and environment.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;
    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open the database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE_NAME);

    if !db_path.exists() && global.disable_autoinit {
        return Err(CliError::NoDataDirectory);
    }

    let busy_timeout = busy_timeout(global, config)?;
    Database::open(DatabaseConfig::new(db_path).with_busy_timeout(busy_timeout))
        .map_err(CliError::from)
}

/// Open the database for commands that only read.
///
/// An existing database is opened read-only. A missing one goes through
/// [`open_database`], so auto-init still applies.
pub fn open_database_for_reading(
    global: &GlobalOptions,
    config: &Config,
) -> Result<Database, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE_NAME);
    if !db_path.exists() {
        return open_database(global, config);
    }

    let busy_timeout = busy_timeout(global, config)?;
    Database::open(
        DatabaseConfig::new(db_path)
            .with_busy_timeout(busy_timeout)
            .read_only(),
    )
    .map_err(CliError::from)
}

fn busy_timeout(global: &GlobalOptions, config: &Config) -> Result<Duration, CliError> {
    match global.busy_timeout {
        Some(0) => Err(CliError::InvalidArguments(
            "--busy-timeout must be greater than 0".to_string(),
        )),
        Some(seconds) => Ok(Duration::from_secs(seconds.into())),
        None => Ok(config.lock_wait()),
    }
}

/// The local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
