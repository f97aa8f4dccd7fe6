//! `SQLite` storage shared by all SQL-backed programs.
//!
//! One database file holds every program's tables. This module opens it
//! with the right pragmas, versions the schema and hands out immediate
//! transactions; the program modules own their queries.
//!
//! # Examples
//!
//! ```no_run
//! use frontdesk::database::{resolve_database_path, Database, DatabaseConfig};
//!
//! let path = resolve_database_path().unwrap();
//! let mut db = Database::open(DatabaseConfig::new(path)).unwrap();
//! for student in db.students().list().unwrap() {
//!     println!("{}", student.student_id);
//! }
//! ```

mod config;
mod connection;
pub mod migrations;
mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig,
    DATABASE_FILE_NAME,
};
pub use connection::Database;
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
pub use schema::CURRENT_SCHEMA_VERSION;
