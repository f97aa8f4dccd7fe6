//! CLI structure and command definitions.
//!
//! Defines the global options and one subcommand per program, plus the
//! non-interactive helpers.

use crate::commands::{
    BankCommand, CartCommand, ClinicCommand, CompletionsCommand, HospitalCommand, InitCommand,
    InventoryCommand, LibraryCommand, ListCommand, PersonnelCommand, QuizCommand, RentalCommand,
    ShowDataDirCommand, SmartHomeCommand, StudentsCommand, TransportCommand,
};
use crate::utils::GlobalOptions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Menu-driven record keeping for small front-desk programs.
#[derive(Parser)]
#[command(name = "frontdesk")]
#[command(version, about = "Menu-driven front-desk record keeping", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "FRONTDESK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(
        long,
        value_name = "SECONDS",
        global = true,
        env = "FRONTDESK_BUSY_TIMEOUT"
    )]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "FRONTDESK_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The options every command shares.
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            verbose: self.verbose,
            quiet: self.quiet,
            data_dir: self.data_dir.clone(),
            busy_timeout: self.busy_timeout,
            disable_autoinit: self.disable_autoinit,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Student records: add, search, update and report by course
    Students(StudentsCommand),

    /// Product inventory with stock movements and low-stock report
    Inventory(InventoryCommand),

    /// Hospital admissions and discharges
    Hospital(HospitalCommand),

    /// Savings and checking accounts
    Bank(BankCommand),

    /// Shopping cart with category discounts
    Cart(CartCommand),

    /// Teachers, students and administrative staff
    Personnel(PersonnelCommand),

    /// Smart-home devices, saved to a text file
    SmartHome(SmartHomeCommand),

    /// Bus trips and seat reservations
    Transport(TransportCommand),

    /// Clinic doctors, patients and appointments
    Clinic(ClinicCommand),

    /// Car rentals
    Rental(RentalCommand),

    /// Multiple-choice quiz with instructor reports
    Quiz(QuizCommand),

    /// Library books and loans
    Library(LibraryCommand),

    /// List the records of one program
    List(ListCommand),

    /// Initialize the data directory and database
    Init(InitCommand),

    /// Show the resolved data directory path
    ShowDataDir(ShowDataDirCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "frontdesk",
            "list",
            "books",
            "--data-dir",
            "/tmp/fd",
            "--busy-timeout",
            "3",
        ])
        .unwrap();
        let global = cli.global_options();
        assert_eq!(global.data_dir, Some(PathBuf::from("/tmp/fd")));
        assert_eq!(global.busy_timeout, Some(3));
        assert!(matches!(cli.command, Command::List(_)));
    }

    #[test]
    fn test_smart_home_is_kebab_case() {
        let cli = Cli::try_parse_from(["frontdesk", "smart-home"]).unwrap();
        assert!(matches!(cli.command, Command::SmartHome(_)));
    }
}
