//! Shared helpers for database-backed unit tests.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};

/// Creates a file-backed test database in a temporary directory.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Keep the directory alive for the rest of the test
    std::mem::forget(dir);

    db
}
