//! Common helpers for frontdesk integration tests.

use chrono::{NaiveDate, NaiveTime};
use frontdesk::database::{Database, DatabaseConfig};
use frontdesk::programs::transport::Trip;
use frontdesk::Money;
use std::path::PathBuf;
use tempfile::TempDir;

/// A database file in a fresh temporary directory.
///
/// The directory lives as long as the returned `TempDir`.
#[allow(dead_code)]
pub fn temp_database() -> (TempDir, PathBuf, Database) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frontdesk.db");
    let db = Database::open(DatabaseConfig::new(&path)).unwrap();
    (dir, path, db)
}

/// Opens a second connection to an existing database file.
#[allow(dead_code)]
pub fn reopen(path: &PathBuf) -> Database {
    Database::open(DatabaseConfig::new(path)).unwrap()
}

/// A trip on 2025-06-01 at 07:30 with `seats` seats and a 450.00 fare.
#[allow(dead_code)]
pub fn trip(id: &str, seats: i64) -> Trip {
    Trip::new(
        id,
        "Lahore - Islamabad",
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        seats,
        Money::from_units(450),
    )
    .unwrap()
}

/// Shorthand for a calendar date.
#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
