#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # frontdesk
//!
//! Record keeping for twelve small front-desk programs: student grades,
//! inventory, hospital admissions, bank accounts, a shopping cart, staff
//! records, smart-home devices, transport bookings, clinic appointments,
//! car rentals, a quiz and a library.
//!
//! Ten of the programs share one `SQLite` database; the smart-home
//! controller and the quiz keep pipe-delimited text files.
//!
//! ## Core Types
//!
//! - [`Database`] and [`DatabaseConfig`]: storage, with one store per program
//! - [`Config`] and [`ConfigBuilder`]: layered settings
//! - [`Money`]: amounts in integer cents
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use frontdesk::Money;
//!
//! let fare: Money = "450".parse().unwrap();
//! assert_eq!(fare.to_string(), "450.00");
//! assert_eq!(fare.percent_of(120).to_string(), "540.00");
//! ```

pub mod capacity;
pub mod config;
pub mod database;
pub mod error;
pub mod flatfile;
pub mod init;
pub mod logging;
pub mod money;
pub mod programs;
pub mod validate;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use money::Money;
