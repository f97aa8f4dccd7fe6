//! Explicit data directory initialization.
//!
//! Creates the data directory and the shared database, and optionally
//! writes a `config.yaml` holding every default so it can be edited.

use std::fs;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE_NAME};
use crate::database::DATABASE_FILE_NAME;
use crate::error::{Error, Result};
use crate::{Database, DatabaseConfig};

/// Options for initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing database.
    pub overwrite: bool,
    /// Write a default configuration file.
    pub create_config: bool,
}

impl InitOptions {
    /// Options for `data_dir` that neither overwrite nor write a config.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
        }
    }

    /// Sets whether to replace an existing database.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to write a default configuration file.
    #[must_use]
    pub fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }
}

/// What initialization did.
#[derive(Debug)]
pub struct InitResult {
    /// The data directory had to be created.
    pub data_dir_created: bool,
    /// The database was created or recreated.
    pub database_created: bool,
    /// A configuration file was written.
    pub config_created: bool,
    /// The initialized directory.
    pub data_dir: PathBuf,
}

const CONFIG_HEADER: &str = "# Frontdesk configuration\n\
    # Environment variables (FRONTDESK_*) override these values.\n";

/// The text written by `--with-config`.
///
/// # Errors
///
/// Returns a configuration error if the defaults cannot be serialized.
pub fn default_config_text() -> Result<String> {
    let body = serde_yaml::to_string(&Config::filled_defaults())?;
    Ok(format!("{CONFIG_HEADER}{body}"))
}

/// Initializes the data directory and database.
///
/// # Errors
///
/// Returns a validation error when the database exists and `overwrite` is
/// off, or an I/O or database error if anything cannot be created.
///
/// # Examples
///
/// ```no_run
/// use frontdesk::init::{init_data_dir, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/frontdesk-demo")).with_create_config(true);
/// let result = init_data_dir(&options).unwrap();
/// assert!(result.database_created);
/// ```
pub fn init_data_dir(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE_NAME);
    if db_path.exists() {
        if !options.overwrite {
            return Err(Error::validation(
                "database",
                format!(
                    "database already exists at {}; use --overwrite to replace it",
                    db_path.display()
                ),
            ));
        }
        fs::remove_file(&db_path)?;
        log::info!("removed existing database {}", db_path.display());
    }

    Database::open(DatabaseConfig::new(&db_path))?;
    result.database_created = true;

    if options.create_config {
        let config_path = options.data_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            fs::write(&config_path, default_config_text()?)?;
            result.config_created = true;
        }
    }

    Ok(result)
}
