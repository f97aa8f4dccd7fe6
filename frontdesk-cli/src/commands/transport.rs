//! Transport reservation menus for passengers and administrators.

use crate::console::{finish, stdio_console, ActionResult, Console};
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use frontdesk::programs::transport::{PaymentStatus, Reservation, Trip};
use frontdesk::Database;
use std::io::{BufRead, Write};

/// Book and manage bus trips interactively.
#[derive(Args)]
pub struct TransportCommand {}

impl TransportCommand {
    /// Execute the transport menu on stdin/stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        finish(run(&mut stdio_console(), &mut db))
    }
}

/// Runs the top-level transport menu until "Exit" or end of input.
pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, db: &mut Database) -> ActionResult {
    console.run_menu(
        "Transport Reservation System",
        &["Passenger Menu", "Admin Menu", "Exit"],
        |console, choice| match choice {
            1 => passenger_menu(console, db),
            _ => admin_menu(console, db),
        },
    )
}

fn passenger_menu<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    db: &mut Database,
) -> ActionResult {
    console.run_menu(
        "Passenger Menu",
        &[
            "View Available Trips",
            "Book a Seat",
            "Cancel Reservation",
            "Back",
        ],
        |console, choice| {
            match choice {
                1 => {
                    let trips = db.transport().trips_with_available_seats()?;
                    console.show_all(&trips, "No trips with free seats.")?;
                }
                2 => {
                    let reservation_id = console.ask("Reservation ID: ")?;
                    let name = console.ask("Passenger name: ")?;
                    let contact = console.ask("Contact number: ")?;
                    let trip_id = console.ask("Trip ID: ")?;
                    let seat_no = console.ask_number("seat_no", "Seat number: ")?;
                    let payment: PaymentStatus = console.ask_parsed("Payment (Paid/Unpaid): ")?;
                    let ticket = db.transport().book(&Reservation::new(
                        &reservation_id,
                        &name,
                        &contact,
                        &trip_id,
                        seat_no,
                        payment,
                    )?)?;
                    console.say(ticket)?;
                }
                _ => {
                    let reservation_id = console.ask("Reservation ID: ")?;
                    let cancelled = db.transport().cancel(&reservation_id)?;
                    console.say(format!(
                        "Reservation {} cancelled. Seat {} on trip {} is free again.",
                        cancelled.reservation_id, cancelled.seat_no, cancelled.trip_id
                    ))?;
                }
            }
            Ok(())
        },
    )
}

fn admin_menu<R: BufRead, W: Write>(console: &mut Console<R, W>, db: &mut Database) -> ActionResult {
    console.run_menu(
        "Admin Menu",
        &[
            "Add Trip",
            "View All Trips",
            "Delete Trip",
            "View Reservations for Trip",
            "Search Reservations",
            "Back",
        ],
        |console, choice| {
            match choice {
                1 => {
                    let trip_id = console.ask("Trip ID: ")?;
                    let route = console.ask("Route: ")?;
                    let date = console.ask_date("date", "Date (YYYY-MM-DD): ")?;
                    let time = console.ask_time("time", "Time (HH:MM): ")?;
                    let seats = console.ask_number("total_seats", "Total seats: ")?;
                    let fare = console.ask_money("fare", "Fare: ")?;
                    db.transport()
                        .add_trip(&Trip::new(&trip_id, &route, date, time, seats, fare)?)?;
                    console.say("Trip added.")?;
                }
                2 => {
                    let trips = db.transport().trips()?;
                    console.show_all(&trips, "No trips scheduled.")?;
                }
                3 => {
                    let trip_id = console.ask("Trip ID: ")?;
                    db.transport().delete_trip(&trip_id)?;
                    console.say("Trip deleted.")?;
                }
                4 => {
                    let trip_id = console.ask("Trip ID: ")?;
                    let reservations = db.transport().reservations_for_trip(&trip_id)?;
                    console.show_all(&reservations, "No reservations for this trip.")?;
                }
                _ => {
                    let term = console.ask("Reservation ID or passenger name: ")?;
                    let found = db.transport().search_reservations(&term)?;
                    console.show_all(&found, "No matching reservations.")?;
                }
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const ADD_TRIP: &str = "2\n1\nT1\nManila-Baguio\n2025-06-01\n08:30\n2\n550\n6\n";

    fn run_script(db: &mut Database, script: &str) -> String {
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        finish(run(&mut console, db)).unwrap();
        String::from_utf8(console.output().clone()).unwrap()
    }

    #[test]
    fn test_booking_prints_ticket() {
        let mut db = Database::open_in_memory().unwrap();
        let script = format!("{ADD_TRIP}1\n2\nR1\nAna\n09171234567\nT1\n1\npaid\n1\n4\n3\n");
        let out = run_script(&mut db, &script);
        assert!(out.contains("--- Transport Reservation Ticket ---"));
        assert!(out.contains("Trip: Manila-Baguio"));
        assert!(out.contains("Payment: Paid"));
        assert!(out.contains("T1 | Manila-Baguio | 2025-06-01 08:30 | Seats: 1/2 | Fare: 550.00"));
    }

    #[test]
    fn test_taken_seat_and_full_trip() {
        let mut db = Database::open_in_memory().unwrap();
        let script = format!(
            "{ADD_TRIP}1\n2\nR1\nAna\n0917\nT1\n1\nPaid\n\
             2\nR2\nBen\n0918\nT1\n1\nPaid\n\
             2\nR3\nCora\n0919\nT1\n2\nUnpaid\n\
             2\nR4\nDan\n0920\nT1\n2\nPaid\n4\n3\n"
        );
        let out = run_script(&mut db, &script);
        assert!(out.contains("is already allocated"));
        assert!(out.contains("Error: no capacity left"));
        assert_eq!(db.transport().reservations().unwrap().len(), 2);
    }

    #[test]
    fn test_trip_with_reservations_cannot_be_deleted() {
        let mut db = Database::open_in_memory().unwrap();
        let script = format!(
            "{ADD_TRIP}1\n2\nR1\nAna\n0917\nT1\n1\nPaid\n4\n2\n3\nT1\n4\nT1\n6\n3\n"
        );
        let out = run_script(&mut db, &script);
        assert!(out.contains("Error: conflict: trip 'T1' still has 1 reservation(s)"));
        assert!(out.contains("R1 | Ana | Trip: T1 | Seat: 1 | Status: Paid"));
    }

    #[test]
    fn test_cancel_frees_seat() {
        let mut db = Database::open_in_memory().unwrap();
        let script = format!("{ADD_TRIP}1\n2\nR1\nAna\n0917\nT1\n1\nPaid\n3\nR1\n4\n3\n");
        let out = run_script(&mut db, &script);
        assert!(out.contains("Reservation R1 cancelled."));
        assert_eq!(db.transport().get_trip("T1").unwrap().available_seats, 2);
    }
}
