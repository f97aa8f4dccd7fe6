//! Car rental menus.

use crate::console::{finish, stdio_console, ActionResult, Console};
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use frontdesk::programs::rental::{Car, CarKind, Customer, RentalRequest};
use frontdesk::Database;
use std::io::{BufRead, Write};

/// Manage cars, customers and rentals interactively.
#[derive(Args)]
pub struct RentalCommand {}

impl RentalCommand {
    /// Execute the rental menu on stdin/stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        finish(run(&mut stdio_console(), &mut db))
    }
}

/// Runs the top-level rental menu until "Exit" or end of input.
pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, db: &mut Database) -> ActionResult {
    console.run_menu(
        "Car Rental System",
        &["Manage Cars", "Manage Customers", "Manage Rentals", "Exit"],
        |console, choice| match choice {
            1 => cars_menu(console, db),
            2 => customers_menu(console, db),
            _ => rentals_menu(console, db),
        },
    )
}

fn cars_menu<R: BufRead, W: Write>(console: &mut Console<R, W>, db: &mut Database) -> ActionResult {
    console.run_menu(
        "Manage Cars",
        &["Add Car", "View Cars", "Delete Car", "Back"],
        |console, choice| {
            match choice {
                1 => {
                    let plate = console.ask("Plate number: ")?;
                    let model = console.ask("Model: ")?;
                    let kind: CarKind = console.ask_parsed("Type (Economy/SUV/Luxury): ")?;
                    let rate = console.ask_money("daily_rate", "Daily rate: ")?;
                    db.rental().add_car(&Car::new(&plate, &model, kind, rate)?)?;
                    console.say("Car added.")?;
                }
                2 => {
                    let cars = db.rental().cars()?;
                    console.show_all(&cars, "No cars in the fleet.")?;
                }
                _ => {
                    let plate = console.ask("Plate number: ")?;
                    db.rental().delete_car(&plate)?;
                    console.say("Car deleted.")?;
                }
            }
            Ok(())
        },
    )
}

fn customers_menu<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    db: &mut Database,
) -> ActionResult {
    console.run_menu(
        "Manage Customers",
        &["Add Customer", "View Customers", "Back"],
        |console, choice| {
            if choice == 1 {
                let id = console.ask("Customer ID: ")?;
                let name = console.ask("Full name: ")?;
                let license = console.ask("License number: ")?;
                let contact = console.ask("Contact: ")?;
                db.rental()
                    .add_customer(&Customer::new(&id, &name, &license, &contact)?)?;
                console.say("Customer added.")?;
            } else {
                let customers = db.rental().customers()?;
                console.show_all(&customers, "No customers registered.")?;
            }
            Ok(())
        },
    )
}

fn rentals_menu<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    db: &mut Database,
) -> ActionResult {
    console.run_menu(
        "Manage Rentals",
        &["Rent Car", "Return Car", "View Rentals", "Back"],
        |console, choice| {
            match choice {
                1 => {
                    let rental_id = console.ask("Rental ID: ")?;
                    let customer_id = console.ask("Customer ID: ")?;
                    let plate = console.ask("Plate number: ")?;
                    let start = console.ask_date("start_date", "Start date (YYYY-MM-DD): ")?;
                    let end = console.ask_date("end_date", "End date (YYYY-MM-DD): ")?;
                    let request = RentalRequest::new(&rental_id, &customer_id, &plate, start, end)?;
                    let rental = db.rental().rent(&request)?;
                    console.say(format!(
                        "Car rented for {} day(s). Total fee: {}",
                        rental.days(),
                        rental.total_fee
                    ))?;
                }
                2 => {
                    let rental_id = console.ask("Rental ID: ")?;
                    let rental = db.rental().return_car(&rental_id)?;
                    console.say(format!("Car {} returned.", rental.plate))?;
                }
                _ => {
                    let rentals = db.rental().rentals()?;
                    console.show_all(&rentals, "No active rentals.")?;
                }
            }
            Ok(())
        },
    )
}
