//! Build script for frontdesk-cli.
//!
//! Renders a man page into `OUT_DIR/man/frontdesk.1` with `clap_mangen`.
//!
//! The command tree is declared here by hand because a build script cannot
//! depend on the crate it builds; keep it in step with src/cli.rs.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::io;
use std::path::PathBuf;

fn build_cli() -> Command {
    let programs = [
        ("students", "Student records: add, search, update and report by course"),
        ("inventory", "Product inventory with stock movements and low-stock report"),
        ("hospital", "Hospital admissions and discharges"),
        ("bank", "Savings and checking accounts"),
        ("cart", "Shopping cart with category discounts"),
        ("personnel", "Teachers, students and administrative staff"),
        ("smart-home", "Smart-home devices, saved to a text file"),
        ("transport", "Bus trips and seat reservations"),
        ("clinic", "Clinic doctors, patients and appointments"),
        ("rental", "Car rentals"),
        ("quiz", "Multiple-choice quiz with instructor reports"),
        ("library", "Library books and loans"),
        ("list", "List the records of one program"),
        ("init", "Initialize the data directory and database"),
        ("show-data-dir", "Show the resolved data directory path"),
        ("completions", "Generate shell completion scripts"),
    ];

    Command::new("frontdesk")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Menu-driven front-desk record keeping")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("FRONTDESK_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("FRONTDESK_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(ArgAction::SetTrue)
                .env("FRONTDESK_DISABLE_AUTOINIT"),
        )
        .subcommands(
            programs
                .into_iter()
                .map(|(name, about)| Command::new(name).about(about)),
        )
}

fn main() -> io::Result<()> {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "OUT_DIR is not set")
    })?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("frontdesk.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
