//! Main entry point for the frontdesk CLI.
//!
//! Each program runs as its own subcommand, e.g. `frontdesk library`;
//! `frontdesk list <entity>` prints records without a menu.

use clap::Parser;
use frontdesk_cli::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    frontdesk::init_logger(cli.verbose, cli.quiet).install();

    let global = cli.global_options();

    let result = match cli.command {
        Command::Students(cmd) => cmd.execute(&global),
        Command::Inventory(cmd) => cmd.execute(&global),
        Command::Hospital(cmd) => cmd.execute(&global),
        Command::Bank(cmd) => cmd.execute(&global),
        Command::Cart(cmd) => cmd.execute(&global),
        Command::Personnel(cmd) => cmd.execute(&global),
        Command::SmartHome(cmd) => cmd.execute(&global),
        Command::Transport(cmd) => cmd.execute(&global),
        Command::Clinic(cmd) => cmd.execute(&global),
        Command::Rental(cmd) => cmd.execute(&global),
        Command::Quiz(cmd) => cmd.execute(&global),
        Command::Library(cmd) => cmd.execute(&global),
        Command::List(cmd) => cmd.execute(&global),
        Command::Init(cmd) => cmd.execute(&global),
        Command::ShowDataDir(cmd) => cmd.execute(&global),
        Command::Completions(cmd) => cmd.execute(),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
