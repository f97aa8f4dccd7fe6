//! Booking and cancellation against a real database file.
//!
//! These tests open several connections to the same file to check that
//! capacity counters hold up when writers interleave.

mod common;

use common::{date, reopen, temp_database, trip};
use frontdesk::programs::inventory::Product;
use frontdesk::programs::library::Book;
use frontdesk::programs::transport::{PaymentStatus, Reservation};
use frontdesk::{Error, Money};
use std::collections::HashSet;
use std::thread;

fn reservation(id: &str, trip_id: &str, seat: i64) -> Reservation {
    Reservation::new(id, "Passenger", "03001234567", trip_id, seat, PaymentStatus::Paid).unwrap()
}

#[test]
fn test_bookings_survive_reopen() {
    let (_dir, path, mut db) = temp_database();
    db.transport().add_trip(&trip("T1", 3)).unwrap();
    db.transport().book(&reservation("R1", "T1", 2)).unwrap();
    drop(db);

    let mut db = reopen(&path);
    let trip = db.transport().get_trip("T1").unwrap();
    assert_eq!(trip.available_seats, 2);
    assert_eq!(db.transport().reservations_for_trip("T1").unwrap().len(), 1);
}

#[test]
fn test_concurrent_bookers_never_oversell() {
    let (_dir, path, mut db) = temp_database();
    db.transport().add_trip(&trip("T1", 4)).unwrap();
    drop(db);

    // Ten passengers race for four seats, each on its own connection.
    let handles: Vec<_> = (1..=10)
        .map(|i| {
            let path = path.clone();
            thread::spawn(move || {
                let mut db = reopen(&path);
                let seat = (i - 1) % 4 + 1;
                db.transport()
                    .book(&reservation(&format!("R{i}"), "T1", seat))
                    .map(|ticket| ticket.reservation.seat_no)
            })
        })
        .collect();

    let mut seats = HashSet::new();
    for handle in handles {
        match handle.join().unwrap() {
            Ok(seat) => assert!(seats.insert(seat), "seat {seat} sold twice"),
            Err(Error::CapacityExhausted { .. } | Error::AlreadyAllocated { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let mut db = reopen(&path);
    let trip = db.transport().get_trip("T1").unwrap();
    let sold = i64::try_from(seats.len()).unwrap();
    assert_eq!(trip.available_seats, 4 - sold);
    assert_eq!(
        db.transport().reservations_for_trip("T1").unwrap().len(),
        seats.len()
    );
}

#[test]
fn test_cancel_then_rebook_same_seat() {
    let (_dir, _path, mut db) = temp_database();
    db.transport().add_trip(&trip("T1", 1)).unwrap();
    db.transport().book(&reservation("R1", "T1", 1)).unwrap();

    let err = db.transport().book(&reservation("R2", "T1", 1)).unwrap_err();
    assert!(matches!(err, Error::CapacityExhausted { .. }));

    db.transport().cancel("R1").unwrap();
    let ticket = db.transport().book(&reservation("R2", "T1", 1)).unwrap();
    assert_eq!(ticket.seats_left, 0);
}

#[test]
fn test_stock_withdrawals_from_two_connections() {
    let (_dir, path, mut db) = temp_database();
    db.inventory()
        .add(&Product::new("P1", "Pen", "Stationery", 10, Money::from_units(2)).unwrap())
        .unwrap();

    let mut other = reopen(&path);
    assert_eq!(db.inventory().withdraw_stock("P1", 6).unwrap(), 4);
    let err = other.inventory().withdraw_stock("P1", 6).unwrap_err();
    assert!(matches!(err, Error::CapacityExhausted { .. }));
    assert_eq!(other.inventory().withdraw_stock("P1", 4).unwrap(), 0);
}

#[test]
fn test_book_loaned_once_across_connections() {
    let (_dir, path, mut db) = temp_database();
    db.library()
        .add_book(&Book::new("B1", "Dune", "Frank Herbert", 1965).unwrap())
        .unwrap();

    let mut other = reopen(&path);
    db.library().borrow("B1", "Ana", date(2025, 3, 1)).unwrap();
    let err = other
        .library()
        .borrow("B1", "Ben", date(2025, 3, 2))
        .unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));

    let loan = other.library().return_book("B1", date(2025, 3, 5)).unwrap();
    assert_eq!(loan.borrower, "Ana");
    assert_eq!(loan.returned_on, Some(date(2025, 3, 5)));
}
