//! CLI command implementations.
//!
//! Interactive menus, one per program:
//! - `students`, `inventory`, `hospital`, `bank`, `cart`, `personnel`
//! - `smart_home`, `transport`, `clinic`, `rental`, `quiz`, `library`
//!
//! And the non-interactive commands:
//! - `list`: print a program's records as a table, JSON, CSV or TSV
//! - `init`: create the data directory and database
//! - `show_data_dir`: print the resolved data directory
//! - `completions`: generate shell completion scripts

pub mod bank;
pub mod cart;
pub mod clinic;
pub mod completions;
pub mod hospital;
pub mod init;
pub mod inventory;
pub mod library;
pub mod list;
pub mod personnel;
pub mod quiz;
pub mod rental;
pub mod show_data_dir;
pub mod smart_home;
pub mod students;
pub mod transport;

pub use bank::BankCommand;
pub use cart::CartCommand;
pub use clinic::ClinicCommand;
pub use completions::CompletionsCommand;
pub use hospital::HospitalCommand;
pub use init::InitCommand;
pub use inventory::InventoryCommand;
pub use library::LibraryCommand;
pub use list::ListCommand;
pub use personnel::PersonnelCommand;
pub use quiz::QuizCommand;
pub use rental::RentalCommand;
pub use show_data_dir::ShowDataDirCommand;
pub use smart_home::SmartHomeCommand;
pub use students::StudentsCommand;
pub use transport::TransportCommand;
