//! Clinic doctors, patients and appointments.
//!
//! A doctor lists the time slots they take appointments in. At most one
//! scheduled appointment may hold a (doctor, date, slot) triple; a partial
//! UNIQUE index over scheduled rows enforces it, so cancelled or completed
//! appointments free the slot again.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{allocation_insert_error, collect_rows, time_column};
use crate::capacity::{acquire_flag, Flag};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::validate::{digits_only, parse_time, required, TIME_FORMAT};

text_enum! {
    /// Appointment lifecycle.
    pub enum AppointmentStatus as "status" {
        /// Booked and holding its slot.
        Scheduled => "Scheduled",
        /// Cancelled by the patient.
        Cancelled => "Cancelled",
        /// Seen by the doctor.
        Completed => "Completed",
    }
}

const CANCEL: Flag = Flag {
    table: "clinic_appointments",
    key_column: "appointment_id",
    flag_column: "status",
    free: "Scheduled",
    taken: "Cancelled",
    entity: "appointment",
};

const COMPLETE: Flag = Flag {
    taken: "Completed",
    ..CANCEL
};

/// A doctor and the slots they see patients in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Doctor {
    /// Unique doctor code.
    pub doctor_id: String,
    /// Full name.
    pub name: String,
    /// Specialization, e.g. `Pediatrics`.
    pub specialization: String,
    /// Bookable times, sorted. Empty means any time.
    #[serde(serialize_with = "serialize_slots")]
    pub slots: Vec<NaiveTime>,
}

fn serialize_slots<S: serde::Serializer>(
    slots: &[NaiveTime],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&join_slots(slots))
}

fn join_slots(slots: &[NaiveTime]) -> String {
    slots
        .iter()
        .map(|t| t.format(TIME_FORMAT).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses a comma-separated list of `HH:MM` slots, sorted and without
/// repeats. Blank input yields no slots.
///
/// # Errors
///
/// Returns a validation error for any entry that is not a time.
///
/// # Examples
///
/// ```
/// use frontdesk::programs::clinic::parse_slots;
///
/// let slots = parse_slots("10:00, 09:00,10:00").unwrap();
/// assert_eq!(slots.len(), 2);
/// assert!(parse_slots("9am").is_err());
/// ```
pub fn parse_slots(input: &str) -> Result<Vec<NaiveTime>> {
    let mut slots = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_time("slots", s))
        .collect::<Result<Vec<_>>>()?;
    slots.sort_unstable();
    slots.dedup();
    Ok(slots)
}

impl Doctor {
    /// Builds a validated doctor.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text.
    pub fn new(
        doctor_id: &str,
        name: &str,
        specialization: &str,
        mut slots: Vec<NaiveTime>,
    ) -> Result<Self> {
        slots.sort_unstable();
        slots.dedup();
        Ok(Self {
            doctor_id: required("doctor_id", doctor_id)?,
            name: required("name", name)?,
            specialization: required("specialization", specialization)?,
            slots,
        })
    }

    /// Whether an appointment may be booked at `slot`.
    #[must_use]
    pub fn accepts(&self, slot: NaiveTime) -> bool {
        self.slots.is_empty() || self.slots.contains(&slot)
    }

    /// Slots as `HH:MM,HH:MM`.
    #[must_use]
    pub fn slot_list(&self) -> String {
        join_slots(&self.slots)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let text: String = row.get(3)?;
        let slots = parse_slots(&text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Self {
            doctor_id: row.get(0)?,
            name: row.get(1)?,
            specialization: row.get(2)?,
            slots,
        })
    }
}

/// A registered patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClinicPatient {
    /// Unique patient code.
    pub patient_id: String,
    /// Full name.
    pub name: String,
    /// Contact number, digits only.
    pub contact: String,
}

impl ClinicPatient {
    /// Builds a validated patient.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text or a non-digit contact.
    pub fn new(patient_id: &str, name: &str, contact: &str) -> Result<Self> {
        Ok(Self {
            patient_id: required("patient_id", patient_id)?,
            name: required("name", name)?,
            contact: digits_only("contact", contact)?,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            patient_id: row.get(0)?,
            name: row.get(1)?,
            contact: row.get(2)?,
        })
    }
}

/// A booked visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    /// Unique appointment code.
    pub appointment_id: String,
    /// Patient seen.
    pub patient_id: String,
    /// Doctor seeing them.
    pub doctor_id: String,
    /// Day of the visit.
    pub date: NaiveDate,
    /// Slot within the day.
    #[serde(serialize_with = "super::serialize_time")]
    pub timeslot: NaiveTime,
    /// Lifecycle state.
    pub status: AppointmentStatus,
}

impl Appointment {
    /// A new scheduled appointment.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank ids.
    pub fn new(
        appointment_id: &str,
        patient_id: &str,
        doctor_id: &str,
        date: NaiveDate,
        timeslot: NaiveTime,
    ) -> Result<Self> {
        Ok(Self {
            appointment_id: required("appointment_id", appointment_id)?,
            patient_id: required("patient_id", patient_id)?,
            doctor_id: required("doctor_id", doctor_id)?,
            date,
            timeslot,
            status: AppointmentStatus::Scheduled,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            appointment_id: row.get(0)?,
            patient_id: row.get(1)?,
            doctor_id: row.get(2)?,
            date: row.get(3)?,
            timeslot: time_column(row, 4)?,
            status: row.get(5)?,
        })
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} {:<10} {:<10} {:<12} {:<8} {:<12}",
            self.appointment_id,
            self.patient_id,
            self.doctor_id,
            self.date.to_string(),
            self.timeslot.format(TIME_FORMAT).to_string(),
            self.status.as_str()
        )
    }
}

const APPOINTMENT_COLUMNS: &str =
    "appointment_id, patient_id, doctor_id, appointment_date, timeslot, status";

/// Clinic operations over the shared database.
#[derive(Debug)]
pub struct ClinicStore<'a> {
    db: &'a mut Database,
}

impl Database {
    /// Clinic doctors, patients and appointments.
    pub fn clinic(&mut self) -> ClinicStore<'_> {
        ClinicStore { db: self }
    }
}

impl ClinicStore<'_> {
    /// Adds a doctor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when the doctor code is taken.
    pub fn add_doctor(&mut self, doctor: &Doctor) -> Result<()> {
        self.db
            .connection()
            .execute(
                "INSERT INTO clinic_doctors (doctor_id, name, specialization, slots) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    doctor.doctor_id,
                    doctor.name,
                    doctor.specialization,
                    doctor.slot_list()
                ],
            )
            .map_err(|e| Error::on_unique_violation(e, "doctor", &doctor.doctor_id))?;
        Ok(())
    }

    /// Replaces a doctor's slots. Existing appointments are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown doctor.
    pub fn update_doctor_slots(
        &mut self,
        doctor_id: &str,
        mut slots: Vec<NaiveTime>,
    ) -> Result<()> {
        let doctor_id = doctor_id.trim();
        slots.sort_unstable();
        slots.dedup();
        let changed = self.db.connection().execute(
            "UPDATE clinic_doctors SET slots = ?1 WHERE doctor_id = ?2",
            params![join_slots(&slots), doctor_id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("doctor", doctor_id));
        }
        Ok(())
    }

    /// Removes a doctor along with their past appointments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] while the doctor has scheduled
    /// appointments, or [`Error::NotFound`].
    pub fn delete_doctor(&mut self, doctor_id: &str) -> Result<()> {
        self.delete_party("doctor", "clinic_doctors", "doctor_id", doctor_id)
    }

    /// Every doctor by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn doctors(&self) -> Result<Vec<Doctor>> {
        collect_rows(
            self.db.connection(),
            "SELECT doctor_id, name, specialization, slots FROM clinic_doctors ORDER BY doctor_id",
            [],
            Doctor::from_row,
        )
    }

    /// Registers a patient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when the patient code is taken.
    pub fn register_patient(&mut self, patient: &ClinicPatient) -> Result<()> {
        self.db
            .connection()
            .execute(
                "INSERT INTO clinic_patients (patient_id, name, contact) VALUES (?1, ?2, ?3)",
                params![patient.patient_id, patient.name, patient.contact],
            )
            .map_err(|e| Error::on_unique_violation(e, "patient", &patient.patient_id))?;
        Ok(())
    }

    /// Removes a patient along with their past appointments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] while the patient has scheduled
    /// appointments, or [`Error::NotFound`].
    pub fn remove_patient(&mut self, patient_id: &str) -> Result<()> {
        self.delete_party("patient", "clinic_patients", "patient_id", patient_id)
    }

    /// Every patient by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn patients(&self) -> Result<Vec<ClinicPatient>> {
        collect_rows(
            self.db.connection(),
            "SELECT patient_id, name, contact FROM clinic_patients ORDER BY patient_id",
            [],
            ClinicPatient::from_row,
        )
    }

    /// Books an appointment.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a date before `today` or a slot the
    ///   doctor does not offer
    /// - [`Error::NotFound`] for an unknown doctor or patient
    /// - [`Error::AlreadyAllocated`] when the doctor's slot is taken that day
    /// - [`Error::Duplicate`] when the appointment code is taken
    pub fn book(&mut self, appointment: &Appointment, today: NaiveDate) -> Result<()> {
        if appointment.date < today {
            return Err(Error::validation(
                "date",
                format!("{} is in the past", appointment.date),
            ));
        }

        let tx = self.db.begin_transaction()?;
        let doctor = tx
            .query_row(
                "SELECT doctor_id, name, specialization, slots FROM clinic_doctors \
                 WHERE doctor_id = ?1",
                [&appointment.doctor_id],
                Doctor::from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("doctor", &appointment.doctor_id))?;
        let patient_exists: bool = tx.query_row(
            "SELECT EXISTS (SELECT 1 FROM clinic_patients WHERE patient_id = ?1)",
            [&appointment.patient_id],
            |row| row.get(0),
        )?;
        if !patient_exists {
            return Err(Error::not_found("patient", &appointment.patient_id));
        }
        if !doctor.accepts(appointment.timeslot) {
            return Err(Error::validation(
                "timeslot",
                format!(
                    "Dr. {} sees patients at {} only",
                    doctor.name,
                    doctor.slot_list()
                ),
            ));
        }

        let slot = appointment.timeslot.format(TIME_FORMAT).to_string();
        tx.execute(
            &format!(
                "INSERT INTO clinic_appointments ({APPOINTMENT_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
            ),
            params![
                appointment.appointment_id,
                appointment.patient_id,
                appointment.doctor_id,
                appointment.date,
                slot,
                AppointmentStatus::Scheduled
            ],
        )
        .map_err(|e| {
            allocation_insert_error(
                e,
                &format!("doctor '{}' on {}", doctor.doctor_id, appointment.date),
                &slot,
                "appointment",
                &appointment.appointment_id,
            )
        })?;
        tx.commit()?;

        log::debug!(
            "booked '{}' with doctor '{}' on {} at {slot}",
            appointment.appointment_id,
            doctor.doctor_id,
            appointment.date
        );
        Ok(())
    }

    /// Cancels a scheduled appointment, freeing its slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] when the appointment is not scheduled,
    /// or [`Error::NotFound`].
    pub fn cancel(&mut self, appointment_id: &str) -> Result<()> {
        acquire_flag(self.db.connection(), &CANCEL, appointment_id.trim())
    }

    /// Marks a scheduled appointment as seen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] when the appointment is not scheduled,
    /// or [`Error::NotFound`].
    pub fn complete(&mut self, appointment_id: &str) -> Result<()> {
        acquire_flag(self.db.connection(), &COMPLETE, appointment_id.trim())
    }

    /// Every appointment by date and slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn appointments(&self) -> Result<Vec<Appointment>> {
        collect_rows(
            self.db.connection(),
            &format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM clinic_appointments \
                 ORDER BY appointment_date, timeslot, appointment_id"
            ),
            [],
            Appointment::from_row,
        )
    }

    /// One doctor's appointments by date and slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn appointments_for_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>> {
        collect_rows(
            self.db.connection(),
            &format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM clinic_appointments WHERE doctor_id = ?1 \
                 ORDER BY appointment_date, timeslot"
            ),
            [doctor_id.trim()],
            Appointment::from_row,
        )
    }

    fn delete_party(&mut self, entity: &str, table: &str, column: &str, key: &str) -> Result<()> {
        let key = key.trim();
        let tx = self.db.begin_transaction()?;
        let scheduled: i64 = tx.query_row(
            &format!(
                "SELECT COUNT(*) FROM clinic_appointments \
                 WHERE {column} = ?1 AND status = 'Scheduled'"
            ),
            [key],
            |row| row.get(0),
        )?;
        if scheduled > 0 {
            return Err(Error::conflict(format!(
                "{entity} '{key}' has {scheduled} scheduled appointment(s)"
            )));
        }
        tx.execute(
            &format!("DELETE FROM clinic_appointments WHERE {column} = ?1"),
            [key],
        )?;
        if tx.execute(&format!("DELETE FROM {table} WHERE {column} = ?1"), [key])? == 0 {
            return Err(Error::not_found(entity, key));
        }
        tx.commit()?;
        Ok(())
    }
}
