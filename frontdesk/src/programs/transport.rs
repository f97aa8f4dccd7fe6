//! Bus and ferry trips with seat reservations.
//!
//! Booking claims a seat from the trip's counter and inserts the
//! reservation in one immediate transaction. The `(trip_id, seat_no)`
//! UNIQUE constraint backs the seat check, so a second writer racing for
//! the same seat fails and rolls back instead of double-booking.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{allocation_insert_error, collect_rows, time_column};
use crate::capacity::{self, Counter};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::money::Money;
use crate::validate::{digits_only, in_range, non_negative, positive, required, TIME_FORMAT};

const SEATS: Counter = Counter::new("transport_trips", "trip_id", "available_seats", "trip");

text_enum! {
    /// Whether the fare was paid at booking.
    pub enum PaymentStatus as "payment" {
        /// Paid.
        Paid => "Paid",
        /// Pay on boarding.
        Unpaid => "Unpaid",
    }
}

/// A scheduled trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trip {
    /// Unique trip code.
    pub trip_id: String,
    /// Route description, e.g. `Manila - Baguio`.
    pub route: String,
    /// Departure day.
    pub date: NaiveDate,
    /// Departure time.
    #[serde(serialize_with = "super::serialize_time")]
    pub time: NaiveTime,
    /// Seats on the vehicle.
    pub total_seats: i64,
    /// Seats not yet reserved.
    pub available_seats: i64,
    /// Fare per seat.
    pub fare: Money,
}

impl Trip {
    /// Builds a trip with every seat available.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text, no seats or a negative
    /// fare.
    pub fn new(
        trip_id: &str,
        route: &str,
        date: NaiveDate,
        time: NaiveTime,
        total_seats: i64,
        fare: Money,
    ) -> Result<Self> {
        let total_seats = positive("total_seats", total_seats)?;
        Ok(Self {
            trip_id: required("trip_id", trip_id)?,
            route: required("route", route)?,
            date,
            time,
            total_seats,
            available_seats: total_seats,
            fare: non_negative("fare", fare)?,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            trip_id: row.get(0)?,
            route: row.get(1)?,
            date: row.get(2)?,
            time: time_column(row, 3)?,
            total_seats: row.get(4)?,
            available_seats: row.get(5)?,
            fare: Money::from_cents(row.get(6)?),
        })
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} {} | Seats: {}/{} | Fare: {}",
            self.trip_id,
            self.route,
            self.date,
            self.time.format(TIME_FORMAT),
            self.available_seats,
            self.total_seats,
            self.fare
        )
    }
}

/// One booked seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    /// Unique reservation code.
    pub reservation_id: String,
    /// Passenger name.
    pub passenger_name: String,
    /// Contact number, digits only.
    pub contact: String,
    /// Trip booked.
    pub trip_id: String,
    /// Seat number, 1 up to the trip's total.
    pub seat_no: i64,
    /// Payment state.
    pub payment: PaymentStatus,
}

impl Reservation {
    /// Builds a validated reservation request. The seat's upper bound is
    /// checked against the trip when booking.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text, a non-digit contact or a
    /// seat below 1.
    pub fn new(
        reservation_id: &str,
        passenger_name: &str,
        contact: &str,
        trip_id: &str,
        seat_no: i64,
        payment: PaymentStatus,
    ) -> Result<Self> {
        Ok(Self {
            reservation_id: required("reservation_id", reservation_id)?,
            passenger_name: required("passenger_name", passenger_name)?,
            contact: digits_only("contact", contact)?,
            trip_id: required("trip_id", trip_id)?,
            seat_no: positive("seat_no", seat_no)?,
            payment,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            reservation_id: row.get(0)?,
            passenger_name: row.get(1)?,
            contact: row.get(2)?,
            trip_id: row.get(3)?,
            seat_no: row.get(4)?,
            payment: row.get(5)?,
        })
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | Trip: {} | Seat: {} | Status: {}",
            self.reservation_id, self.passenger_name, self.trip_id, self.seat_no, self.payment
        )
    }
}

/// What a passenger gets after a successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    /// The stored reservation.
    pub reservation: Reservation,
    /// Route of the trip.
    pub route: String,
    /// Departure day.
    pub date: NaiveDate,
    /// Departure time.
    #[serde(serialize_with = "super::serialize_time")]
    pub time: NaiveTime,
    /// Fare charged.
    pub fare: Money,
    /// Seats left on the trip after this booking.
    pub seats_left: i64,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Transport Reservation Ticket ---")?;
        writeln!(f, "ReservationID: {}", self.reservation.reservation_id)?;
        writeln!(f, "Passenger: {}", self.reservation.passenger_name)?;
        writeln!(f, "Trip: {}", self.route)?;
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "Time: {}", self.time.format(TIME_FORMAT))?;
        writeln!(f, "Seat: {}", self.reservation.seat_no)?;
        writeln!(f, "Fare: {}", self.fare)?;
        writeln!(f, "Payment: {}", self.reservation.payment)?;
        write!(f, "------------------------------------")
    }
}

const TRIP_COLUMNS: &str =
    "trip_id, route, trip_date, trip_time, total_seats, available_seats, fare_cents";
const RESERVATION_COLUMNS: &str =
    "reservation_id, passenger_name, contact, trip_id, seat_no, payment";

/// Transport operations over the shared database.
#[derive(Debug)]
pub struct TransportStore<'a> {
    db: &'a mut Database,
}

impl Database {
    /// Trips and seat reservations.
    pub fn transport(&mut self) -> TransportStore<'_> {
        TransportStore { db: self }
    }
}

impl TransportStore<'_> {
    /// Adds a trip.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when the trip code is taken.
    pub fn add_trip(&mut self, trip: &Trip) -> Result<()> {
        self.db
            .connection()
            .execute(
                &format!(
                    "INSERT INTO transport_trips ({TRIP_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                ),
                params![
                    trip.trip_id,
                    trip.route,
                    trip.date,
                    trip.time.format(TIME_FORMAT).to_string(),
                    trip.total_seats,
                    trip.available_seats,
                    trip.fare.cents()
                ],
            )
            .map_err(|e| Error::on_unique_violation(e, "trip", &trip.trip_id))?;
        log::debug!("added trip '{}' with {} seats", trip.trip_id, trip.total_seats);
        Ok(())
    }

    /// Every trip, by date, time and code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn trips(&self) -> Result<Vec<Trip>> {
        collect_rows(
            self.db.connection(),
            &format!(
                "SELECT {TRIP_COLUMNS} FROM transport_trips ORDER BY trip_date, trip_time, trip_id"
            ),
            [],
            Trip::from_row,
        )
    }

    /// Trips with at least one free seat.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn trips_with_available_seats(&self) -> Result<Vec<Trip>> {
        collect_rows(
            self.db.connection(),
            &format!(
                "SELECT {TRIP_COLUMNS} FROM transport_trips WHERE available_seats > 0 \
                 ORDER BY trip_date, trip_time, trip_id"
            ),
            [],
            Trip::from_row,
        )
    }

    /// Looks up one trip.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown code.
    pub fn get_trip(&self, trip_id: &str) -> Result<Trip> {
        let trip_id = trip_id.trim();
        self.db
            .connection()
            .query_row(
                &format!("SELECT {TRIP_COLUMNS} FROM transport_trips WHERE trip_id = ?1"),
                [trip_id],
                Trip::from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("trip", trip_id))
    }

    /// Removes a trip that has no reservations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] while reservations exist, or
    /// [`Error::NotFound`].
    pub fn delete_trip(&mut self, trip_id: &str) -> Result<()> {
        let trip_id = trip_id.trim();
        let tx = self.db.begin_transaction()?;
        let booked: i64 = tx.query_row(
            "SELECT COUNT(*) FROM transport_reservations WHERE trip_id = ?1",
            [trip_id],
            |row| row.get(0),
        )?;
        if booked > 0 {
            return Err(Error::conflict(format!(
                "trip '{trip_id}' still has {booked} reservation(s)"
            )));
        }
        if tx.execute("DELETE FROM transport_trips WHERE trip_id = ?1", [trip_id])? == 0 {
            return Err(Error::not_found("trip", trip_id));
        }
        tx.commit()?;
        Ok(())
    }

    /// Books a seat.
    ///
    /// Either the seat counter drops by one and the reservation is stored,
    /// or nothing changes.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] for an unknown trip
    /// - [`Error::Validation`] for a seat beyond the trip's total
    /// - [`Error::CapacityExhausted`] when the trip is full
    /// - [`Error::AlreadyAllocated`] when the seat is taken
    /// - [`Error::Duplicate`] when the reservation code is taken
    pub fn book(&mut self, reservation: &Reservation) -> Result<Ticket> {
        let tx = self.db.begin_transaction()?;
        let trip = tx
            .query_row(
                &format!("SELECT {TRIP_COLUMNS} FROM transport_trips WHERE trip_id = ?1"),
                [&reservation.trip_id],
                Trip::from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("trip", &reservation.trip_id))?;
        in_range("seat_no", reservation.seat_no, 1, trip.total_seats)?;

        let seats_left = capacity::claim(&tx, &SEATS, &trip.trip_id, 1)?;
        tx.execute(
            &format!(
                "INSERT INTO transport_reservations ({RESERVATION_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
            ),
            params![
                reservation.reservation_id,
                reservation.passenger_name,
                reservation.contact,
                reservation.trip_id,
                reservation.seat_no,
                reservation.payment
            ],
        )
        .map_err(|e| {
            allocation_insert_error(
                e,
                &format!("trip '{}'", trip.trip_id),
                &format!("seat {}", reservation.seat_no),
                "reservation",
                &reservation.reservation_id,
            )
        })?;
        tx.commit()?;

        log::debug!(
            "booked seat {} on trip '{}' as '{}'",
            reservation.seat_no,
            trip.trip_id,
            reservation.reservation_id
        );
        Ok(Ticket {
            reservation: reservation.clone(),
            route: trip.route,
            date: trip.date,
            time: trip.time,
            fare: trip.fare,
            seats_left,
        })
    }

    /// Cancels a reservation and frees its seat. Returns the cancelled
    /// reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown reservation code.
    pub fn cancel(&mut self, reservation_id: &str) -> Result<Reservation> {
        let reservation_id = reservation_id.trim();
        let tx = self.db.begin_transaction()?;
        let reservation = tx
            .query_row(
                &format!(
                    "DELETE FROM transport_reservations WHERE reservation_id = ?1 \
                     RETURNING {RESERVATION_COLUMNS}"
                ),
                [reservation_id],
                Reservation::from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("reservation", reservation_id))?;
        capacity::release(&tx, &SEATS, &reservation.trip_id, 1, Some("total_seats"))?;
        tx.commit()?;

        log::debug!(
            "cancelled '{reservation_id}', seat {} on trip '{}' is free",
            reservation.seat_no,
            reservation.trip_id
        );
        Ok(reservation)
    }

    /// Reservations on one trip, by seat.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown trip.
    pub fn reservations_for_trip(&self, trip_id: &str) -> Result<Vec<Reservation>> {
        let trip = self.get_trip(trip_id)?;
        collect_rows(
            self.db.connection(),
            &format!(
                "SELECT {RESERVATION_COLUMNS} FROM transport_reservations \
                 WHERE trip_id = ?1 ORDER BY seat_no"
            ),
            [&trip.trip_id],
            Reservation::from_row,
        )
    }

    /// Reservations whose code equals `term` or whose passenger name
    /// contains it.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search_reservations(&self, term: &str) -> Result<Vec<Reservation>> {
        collect_rows(
            self.db.connection(),
            &format!(
                "SELECT {RESERVATION_COLUMNS} FROM transport_reservations \
                 WHERE reservation_id = ?1 OR passenger_name LIKE '%' || ?1 || '%' \
                 ORDER BY reservation_id"
            ),
            [term.trim()],
            Reservation::from_row,
        )
    }

    /// Every reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn reservations(&self) -> Result<Vec<Reservation>> {
        collect_rows(
            self.db.connection(),
            &format!(
                "SELECT {RESERVATION_COLUMNS} FROM transport_reservations \
                 ORDER BY trip_id, seat_no"
            ),
            [],
            Reservation::from_row,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(id: &str, seats: i64) -> Trip {
        Trip::new(
            id,
            "Manila - Baguio",
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            seats,
            "450".parse().unwrap(),
        )
        .unwrap()
    }

    fn reservation(id: &str, trip_id: &str, seat: i64) -> Reservation {
        Reservation::new(id, "Ana Cruz", "09171234567", trip_id, seat, PaymentStatus::Paid).unwrap()
    }

    fn seeded(seats: i64) -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.transport().add_trip(&trip("T1", seats)).unwrap();
        db
    }

    #[test]
    fn test_trip_round_trip() {
        let mut db = seeded(3);
        let t = trip("T1", 3);
        assert_eq!(db.transport().get_trip("T1").unwrap(), t);
        assert_eq!(
            t.to_string(),
            "T1 | Manila - Baguio | 2025-06-01 07:30 | Seats: 3/3 | Fare: 450.00"
        );
        assert!(db.transport().add_trip(&t).unwrap_err().is_duplicate());
    }

    #[test]
    fn test_book_issues_ticket_and_decrements() {
        let mut db = seeded(2);
        let ticket = db.transport().book(&reservation("R1", "T1", 2)).unwrap();
        assert_eq!(ticket.seats_left, 1);
        assert_eq!(ticket.route, "Manila - Baguio");
        assert!(ticket.to_string().contains("Seat: 2"));
        assert_eq!(db.transport().get_trip("T1").unwrap().available_seats, 1);
    }

    #[test]
    fn test_same_seat_twice_rolls_back() {
        let mut db = seeded(3);
        db.transport().book(&reservation("R1", "T1", 1)).unwrap();
        let err = db.transport().book(&reservation("R2", "T1", 1)).unwrap_err();
        assert!(matches!(err, Error::AlreadyAllocated { .. }));
        assert_eq!(db.transport().get_trip("T1").unwrap().available_seats, 2);
    }

    #[test]
    fn test_duplicate_reservation_id_rolls_back() {
        let mut db = seeded(3);
        db.transport().book(&reservation("R1", "T1", 1)).unwrap();
        let err = db.transport().book(&reservation("R1", "T1", 2)).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(db.transport().get_trip("T1").unwrap().available_seats, 2);
    }

    #[test]
    fn test_full_trip_and_bad_seat() {
        let mut db = seeded(1);
        assert!(matches!(
            db.transport().book(&reservation("R0", "T1", 2)).unwrap_err(),
            Error::Validation { .. }
        ));
        db.transport().book(&reservation("R1", "T1", 1)).unwrap();
        assert!(matches!(
            db.transport().book(&reservation("R2", "T1", 1)).unwrap_err(),
            Error::CapacityExhausted { .. }
        ));
        assert!(db
            .transport()
            .book(&reservation("R3", "T9", 1))
            .unwrap_err()
            .is_not_found());
        assert!(db.transport().trips_with_available_seats().unwrap().is_empty());
    }

    #[test]
    fn test_cancel_frees_seat_once() {
        let mut db = seeded(2);
        db.transport().book(&reservation("R1", "T1", 1)).unwrap();
        let cancelled = db.transport().cancel("R1").unwrap();
        assert_eq!(cancelled.seat_no, 1);
        assert_eq!(db.transport().get_trip("T1").unwrap().available_seats, 2);
        assert!(db.transport().cancel("R1").unwrap_err().is_not_found());
        db.transport().book(&reservation("R2", "T1", 1)).unwrap();
    }

    #[test]
    fn test_delete_trip_blocked_by_reservations() {
        let mut db = seeded(2);
        db.transport().book(&reservation("R1", "T1", 1)).unwrap();
        assert!(matches!(
            db.transport().delete_trip("T1").unwrap_err(),
            Error::Conflict { .. }
        ));
        db.transport().cancel("R1").unwrap();
        db.transport().delete_trip("T1").unwrap();
        assert!(db.transport().delete_trip("T1").unwrap_err().is_not_found());
    }

    #[test]
    fn test_listing_and_search() {
        let mut db = seeded(5);
        db.transport().book(&reservation("R1", "T1", 3)).unwrap();
        let mut other = reservation("R2", "T1", 1);
        other.passenger_name = "Ben Reyes".into();
        db.transport().book(&other).unwrap();

        let seats: Vec<i64> = db
            .transport()
            .reservations_for_trip("T1")
            .unwrap()
            .iter()
            .map(|r| r.seat_no)
            .collect();
        assert_eq!(seats, [1, 3]);
        assert_eq!(db.transport().search_reservations("Reyes").unwrap().len(), 1);
        assert_eq!(db.transport().search_reservations("R1").unwrap().len(), 1);
        assert_eq!(db.transport().reservations().unwrap().len(), 2);
        assert!(Reservation::new("R", "n", "09-1", "T1", 1, PaymentStatus::Unpaid).is_err());
    }
}
