//! Car rental: fleet, customers and active rentals.

use std::fmt;

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::collect_rows;
use crate::capacity::{acquire_flag, release_flag, Flag};
use crate::database::Database;
use crate::error::{is_unique_index_violation, Error, Result};
use crate::money::Money;
use crate::validate::{positive, required};

text_enum! {
    /// Car class; decides the rate multiplier.
    pub enum CarKind as "kind" {
        /// Base rate.
        Economy => "Economy",
        /// Rate × 1.2.
        Suv => "SUV",
        /// Rate × 1.5.
        Luxury => "Luxury",
    }
}

impl CarKind {
    /// Multiplier as a percentage of the daily rate.
    #[must_use]
    pub const fn rate_percent(self) -> u32 {
        match self {
            Self::Economy => 100,
            Self::Suv => 120,
            Self::Luxury => 150,
        }
    }
}

text_enum! {
    /// Whether a car is in the lot.
    pub enum CarStatus as "status" {
        /// Free to rent.
        Available => "Available",
        /// Out with a customer.
        Rented => "Rented",
    }
}

const RENTED: Flag = Flag {
    table: "rental_cars",
    key_column: "plate",
    flag_column: "status",
    free: "Available",
    taken: "Rented",
    entity: "car",
};

/// A car in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Car {
    /// Plate number, unique.
    pub plate: String,
    /// Make and model.
    pub model: String,
    /// Class.
    pub kind: CarKind,
    /// Base daily rate, always positive.
    pub daily_rate: Money,
    /// Lot status.
    pub status: CarStatus,
}

impl Car {
    /// Builds an available car.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text or a non-positive rate.
    pub fn new(plate: &str, model: &str, kind: CarKind, daily_rate: Money) -> Result<Self> {
        Ok(Self {
            plate: required("plate", plate)?,
            model: required("model", model)?,
            kind,
            daily_rate: positive("daily_rate", daily_rate)?,
            status: CarStatus::Available,
        })
    }

    /// Fee for `days` days: rate × days × the class multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LimitExceeded`] on overflow.
    ///
    /// # Examples
    ///
    /// ```
    /// use frontdesk::programs::rental::{Car, CarKind};
    /// use frontdesk::Money;
    ///
    /// let suv = Car::new("ABC-123", "Fortuner", CarKind::Suv, Money::from_units(2500)).unwrap();
    /// assert_eq!(suv.fee(3).unwrap(), Money::from_units(9000));
    /// ```
    pub fn fee(&self, days: i64) -> Result<Money> {
        Ok(self
            .daily_rate
            .checked_times(days)?
            .percent_of(self.kind.rate_percent()))
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            plate: row.get(0)?,
            model: row.get(1)?,
            kind: row.get(2)?,
            daily_rate: Money::from_cents(row.get(3)?),
            status: row.get(4)?,
        })
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} - {}/day - {}",
            self.plate, self.model, self.kind, self.daily_rate, self.status
        )
    }
}

/// A registered renter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Unique customer code.
    pub customer_id: String,
    /// Full name.
    pub full_name: String,
    /// Driver's license number, unique.
    pub license: String,
    /// Contact details.
    pub contact: String,
}

impl Customer {
    /// Builds a validated customer.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text.
    pub fn new(customer_id: &str, full_name: &str, license: &str, contact: &str) -> Result<Self> {
        Ok(Self {
            customer_id: required("customer_id", customer_id)?,
            full_name: required("full_name", full_name)?,
            license: required("license", license)?,
            contact: required("contact", contact)?,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            customer_id: row.get(0)?,
            full_name: row.get(1)?,
            license: row.get(2)?,
            contact: row.get(3)?,
        })
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - License: {} - Contact: {}",
            self.customer_id, self.full_name, self.license, self.contact
        )
    }
}

/// An open rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rental {
    /// Unique rental code.
    pub rental_id: String,
    /// Renter.
    pub customer_id: String,
    /// Car rented.
    pub plate: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Return day, after `start_date`.
    pub end_date: NaiveDate,
    /// Fee charged.
    pub total_fee: Money,
}

impl Rental {
    /// Whole days between start and end.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            rental_id: row.get(0)?,
            customer_id: row.get(1)?,
            plate: row.get(2)?,
            start_date: row.get(3)?,
            end_date: row.get(4)?,
            total_fee: Money::from_cents(row.get(5)?),
        })
    }
}

impl fmt::Display for Rental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] Cust:{} Car:{} {} -> {} | Fee: {}",
            self.rental_id,
            self.customer_id,
            self.plate,
            self.start_date,
            self.end_date,
            self.total_fee
        )
    }
}

/// What the counter clerk fills in to rent a car.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalRequest {
    /// New rental code.
    pub rental_id: String,
    /// Renter.
    pub customer_id: String,
    /// Car wanted.
    pub plate: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Return day.
    pub end_date: NaiveDate,
}

impl RentalRequest {
    /// Builds a validated request.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank ids or an end date that is not
    /// after the start date.
    pub fn new(
        rental_id: &str,
        customer_id: &str,
        plate: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self> {
        if end_date <= start_date {
            return Err(Error::validation(
                "end_date",
                format!("{end_date} must be after {start_date}"),
            ));
        }
        Ok(Self {
            rental_id: required("rental_id", rental_id)?,
            customer_id: required("customer_id", customer_id)?,
            plate: required("plate", plate)?,
            start_date,
            end_date,
        })
    }
}

const CAR_COLUMNS: &str = "plate, model, kind, daily_rate_cents, status";
const RENTAL_COLUMNS: &str =
    "rental_id, customer_id, plate, start_date, end_date, total_fee_cents";

/// Rental operations over the shared database.
#[derive(Debug)]
pub struct RentalStore<'a> {
    db: &'a mut Database,
}

impl Database {
    /// Cars, customers and rentals.
    pub fn rental(&mut self) -> RentalStore<'_> {
        RentalStore { db: self }
    }
}

impl RentalStore<'_> {
    /// Adds a car to the fleet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when the plate is taken.
    pub fn add_car(&mut self, car: &Car) -> Result<()> {
        self.db
            .connection()
            .execute(
                &format!("INSERT INTO rental_cars ({CAR_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                params![
                    car.plate,
                    car.model,
                    car.kind,
                    car.daily_rate.cents(),
                    car.status
                ],
            )
            .map_err(|e| Error::on_unique_violation(e, "car", &car.plate))?;
        Ok(())
    }

    /// Every car by plate.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn cars(&self) -> Result<Vec<Car>> {
        collect_rows(
            self.db.connection(),
            &format!("SELECT {CAR_COLUMNS} FROM rental_cars ORDER BY plate"),
            [],
            Car::from_row,
        )
    }

    /// Removes a car that is in the lot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] while the car is rented, or
    /// [`Error::NotFound`].
    pub fn delete_car(&mut self, plate: &str) -> Result<()> {
        let plate = plate.trim();
        let tx = self.db.begin_transaction()?;
        let status: CarStatus = tx
            .query_row(
                "SELECT status FROM rental_cars WHERE plate = ?1",
                [plate],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::not_found("car", plate))?;
        if status == CarStatus::Rented {
            return Err(Error::conflict(format!("car '{plate}' is rented")));
        }
        tx.execute("DELETE FROM rental_cars WHERE plate = ?1", [plate])?;
        tx.commit()?;
        Ok(())
    }

    /// Registers a customer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when the customer code or the license
    /// number is taken.
    pub fn add_customer(&mut self, customer: &Customer) -> Result<()> {
        self.db
            .connection()
            .execute(
                "INSERT INTO rental_customers (customer_id, full_name, license, contact) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    customer.customer_id,
                    customer.full_name,
                    customer.license,
                    customer.contact
                ],
            )
            .map_err(|e| {
                if is_unique_index_violation(&e) {
                    Error::duplicate("license", &customer.license)
                } else {
                    Error::on_unique_violation(e, "customer", &customer.customer_id)
                }
            })?;
        Ok(())
    }

    /// Every customer by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn customers(&self) -> Result<Vec<Customer>> {
        collect_rows(
            self.db.connection(),
            "SELECT customer_id, full_name, license, contact FROM rental_customers \
             ORDER BY customer_id",
            [],
            Customer::from_row,
        )
    }

    /// Rents a car out.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] when the end date is not after the start
    /// - [`Error::NotFound`] for an unknown customer or car
    /// - [`Error::Conflict`] when the car is already rented
    /// - [`Error::Duplicate`] when the rental code is taken
    pub fn rent(&mut self, request: &RentalRequest) -> Result<Rental> {
        let days = (request.end_date - request.start_date).num_days();
        if days < 1 {
            return Err(Error::validation("end_date", "must be after the start date"));
        }

        let tx = self.db.begin_transaction()?;
        let customer_exists: bool = tx.query_row(
            "SELECT EXISTS (SELECT 1 FROM rental_customers WHERE customer_id = ?1)",
            [&request.customer_id],
            |row| row.get(0),
        )?;
        if !customer_exists {
            return Err(Error::not_found("customer", &request.customer_id));
        }

        acquire_flag(&tx, &RENTED, &request.plate)?;
        let car = tx.query_row(
            &format!("SELECT {CAR_COLUMNS} FROM rental_cars WHERE plate = ?1"),
            [&request.plate],
            Car::from_row,
        )?;

        let rental = Rental {
            rental_id: request.rental_id.clone(),
            customer_id: request.customer_id.clone(),
            total_fee: car.fee(days)?,
            plate: car.plate,
            start_date: request.start_date,
            end_date: request.end_date,
        };

        tx.execute(
            &format!(
                "INSERT INTO rental_rentals ({RENTAL_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
            ),
            params![
                rental.rental_id,
                rental.customer_id,
                rental.plate,
                rental.start_date,
                rental.end_date,
                rental.total_fee.cents()
            ],
        )
        .map_err(|e| Error::on_unique_violation(e, "rental", &rental.rental_id))?;
        tx.commit()?;

        log::debug!(
            "rented '{}' to '{}' for {} day(s), fee {}",
            rental.plate,
            rental.customer_id,
            rental.days(),
            rental.total_fee
        );
        Ok(rental)
    }

    /// Closes a rental and puts its car back in the lot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown rental code.
    pub fn return_car(&mut self, rental_id: &str) -> Result<Rental> {
        let rental_id = rental_id.trim();
        let tx = self.db.begin_transaction()?;
        let rental = tx
            .query_row(
                &format!(
                    "DELETE FROM rental_rentals WHERE rental_id = ?1 RETURNING {RENTAL_COLUMNS}"
                ),
                [rental_id],
                Rental::from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("rental", rental_id))?;
        release_flag(&tx, &RENTED, &rental.plate)?;
        tx.commit()?;

        log::debug!("'{}' returned from rental '{rental_id}'", rental.plate);
        Ok(rental)
    }

    /// Open rentals by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn rentals(&self) -> Result<Vec<Rental>> {
        collect_rows(
            self.db.connection(),
            &format!("SELECT {RENTAL_COLUMNS} FROM rental_rentals ORDER BY start_date, rental_id"),
            [],
            Rental::from_row,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    fn seeded() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        for (plate, kind, rate) in [
            ("ECO-1", CarKind::Economy, 1000),
            ("SUV-1", CarKind::Suv, 2500),
            ("LUX-1", CarKind::Luxury, 5000),
        ] {
            let car = Car::new(plate, "Model", kind, Money::from_units(rate)).unwrap();
            db.rental().add_car(&car).unwrap();
        }
        let customer = Customer::new("C1", "Rico Blanco", "N01-23-456789", "0917").unwrap();
        db.rental().add_customer(&customer).unwrap();
        db
    }

    fn request(id: &str, plate: &str, days: u32) -> RentalRequest {
        RentalRequest::new(id, "C1", plate, day(1), day(1 + days)).unwrap()
    }

    #[test]
    fn test_kind_label_and_multiplier() {
        assert_eq!("suv".parse::<CarKind>().unwrap(), CarKind::Suv);
        assert_eq!(CarKind::Suv.to_string(), "SUV");
        assert_eq!(CarKind::Luxury.rate_percent(), 150);
    }

    #[test]
    fn test_rent_charges_multiplied_fee() {
        let mut db = seeded();
        let rental = db.rental().rent(&request("R1", "LUX-1", 2)).unwrap();
        assert_eq!(rental.total_fee, Money::from_units(15_000));
        let cars = db.rental().cars().unwrap();
        let lux = cars.iter().find(|c| c.plate == "LUX-1").unwrap();
        assert_eq!(lux.status, CarStatus::Rented);
    }

    #[test]
    fn test_car_cannot_be_rented_twice() {
        let mut db = seeded();
        db.rental().rent(&request("R1", "ECO-1", 1)).unwrap();
        let err = db.rental().rent(&request("R2", "ECO-1", 1)).unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
        assert!(db
            .rental()
            .rent(&request("R3", "NOPE", 1))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_duplicate_rental_id_rolls_back_flag() {
        let mut db = seeded();
        db.rental().rent(&request("R1", "ECO-1", 1)).unwrap();
        let err = db.rental().rent(&request("R1", "SUV-1", 1)).unwrap_err();
        assert!(err.is_duplicate());
        let suv = db
            .rental()
            .cars()
            .unwrap()
            .into_iter()
            .find(|c| c.plate == "SUV-1")
            .unwrap();
        assert_eq!(suv.status, CarStatus::Available);
    }

    #[test]
    fn test_return_uses_rental_plate() {
        let mut db = seeded();
        db.rental().rent(&request("R1", "SUV-1", 3)).unwrap();
        assert!(matches!(
            db.rental().delete_car("SUV-1").unwrap_err(),
            Error::Conflict { .. }
        ));
        let returned = db.rental().return_car("R1").unwrap();
        assert_eq!(returned.plate, "SUV-1");
        assert!(db.rental().rentals().unwrap().is_empty());
        assert!(db.rental().return_car("R1").unwrap_err().is_not_found());
        db.rental().delete_car("SUV-1").unwrap();
    }

    #[test]
    fn test_customer_checks() {
        let mut db = seeded();
        let same_license = Customer::new("C2", "Other", "N01-23-456789", "1").unwrap();
        let err = db.rental().add_customer(&same_license).unwrap_err();
        assert!(matches!(err, Error::Duplicate { ref entity, .. } if entity == "license"));

        let unknown = RentalRequest::new("R1", "C9", "ECO-1", day(1), day(2)).unwrap();
        assert!(db.rental().rent(&unknown).unwrap_err().is_not_found());
        assert!(RentalRequest::new("R1", "C1", "ECO-1", day(2), day(2)).is_err());
        assert!(Customer::new("C3", "n", " ", "1").is_err());
    }
}
