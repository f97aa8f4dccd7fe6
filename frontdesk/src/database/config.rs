//! Database configuration and path resolution.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// File name of the shared `SQLite` database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "frontdesk.db";

/// Configuration for database connections.
///
/// # Examples
///
/// ```
/// use frontdesk::database::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("/tmp/frontdesk.db")
///     .with_busy_timeout(Duration::from_secs(10));
/// assert_eq!(config.busy_timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// How long to wait on a locked database before giving up.
    pub busy_timeout: Duration,
    /// Whether to create the database (and its directory) when missing.
    pub auto_create: bool,
    /// Whether to open the database in read-only mode.
    pub read_only: bool,
}

impl DatabaseConfig {
    /// Creates a configuration with a 5 second busy timeout, auto-create on,
    /// read-write access.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            read_only: false,
        }
    }

    /// Sets the busy timeout duration.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Disables creation of a missing database file.
    #[must_use]
    pub fn without_auto_create(mut self) -> Self {
        self.auto_create = false;
        self
    }

    /// Opens the database read-only. Implies no auto-create.
    ///
    /// ```
    /// use frontdesk::database::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::new("/tmp/frontdesk.db").read_only();
    /// assert!(config.read_only);
    /// assert!(!config.auto_create);
    /// ```
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.auto_create = false;
        self
    }
}

/// Returns the default data directory, `~/.frontdesk`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    let home = home::home_dir()
        .ok_or_else(|| Error::validation("home_directory", "cannot determine home directory"))?;
    Ok(home.join(".frontdesk"))
}

/// Resolves the data directory.
///
/// `FRONTDESK_DATA_DIR` wins when set, otherwise [`default_data_dir`].
///
/// # Errors
///
/// Returns an error if the home directory is needed and cannot be determined.
pub fn resolve_data_dir() -> Result<PathBuf> {
    match std::env::var("FRONTDESK_DATA_DIR") {
        Ok(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => default_data_dir(),
    }
}

/// Resolves the database path: `<data dir>/frontdesk.db`.
///
/// # Errors
///
/// Returns an error if the data directory cannot be resolved.
///
/// # Examples
///
/// ```no_run
/// use frontdesk::database::resolve_database_path;
///
/// let db_path = resolve_database_path().unwrap();
/// println!("Database path: {}", db_path.display());
/// ```
pub fn resolve_database_path() -> Result<PathBuf> {
    Ok(resolve_data_dir()?.join(DATABASE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_new() {
        let config = DatabaseConfig::new("/tmp/test.db");
        assert_eq!(config.path, PathBuf::from("/tmp/test.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(5000));
        assert!(config.auto_create);
        assert!(!config.read_only);
    }

    #[test]
    fn test_config_without_auto_create() {
        let config = DatabaseConfig::new("/tmp/test.db").without_auto_create();
        assert!(!config.auto_create);
        assert!(!config.read_only);
    }

    #[test]
    fn test_config_read_only() {
        let config = DatabaseConfig::new("/tmp/test.db").read_only();
        assert!(config.read_only);
        assert!(!config.auto_create);
    }

    #[test]
    #[serial]
    fn test_resolve_database_path() {
        let saved = std::env::var("FRONTDESK_DATA_DIR").ok();

        std::env::set_var("FRONTDESK_DATA_DIR", "/custom/data");
        assert_eq!(
            resolve_database_path().unwrap(),
            PathBuf::from("/custom/data/frontdesk.db")
        );

        std::env::remove_var("FRONTDESK_DATA_DIR");
        if home::home_dir().is_some() {
            let dir = resolve_data_dir().unwrap();
            assert!(dir.ends_with(".frontdesk"));
        }

        if let Some(val) = saved {
            std::env::set_var("FRONTDESK_DATA_DIR", val);
        }
    }
}
