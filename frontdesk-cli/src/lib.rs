//! Library exports for frontdesk-cli.
//!
//! The binary is a thin wrapper over these modules; exposing them lets the
//! menus be driven from tests with scripted input.

pub mod cli;
pub mod commands;
pub mod console;
pub mod error;
pub mod utils;

pub use cli::Cli;
