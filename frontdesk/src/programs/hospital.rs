//! Hospital patient admissions.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::collect_rows;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::validate::{positive, required};

text_enum! {
    /// Patient gender as recorded on admission.
    pub enum Gender as "gender" {
        /// Male.
        Male => "Male",
        /// Female.
        Female => "Female",
    }
}

/// An admitted (or discharged) patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patient {
    /// Unique patient number.
    pub patient_id: String,
    /// Full name.
    pub full_name: String,
    /// Age in years, always positive.
    pub age: u32,
    /// Gender.
    pub gender: Gender,
    /// Working diagnosis.
    pub diagnosis: String,
    /// Day of admission.
    pub admission_date: NaiveDate,
    /// Day of discharge; `None` while still admitted.
    pub discharge_date: Option<NaiveDate>,
}

impl Patient {
    /// Builds a validated patient record.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text, a zero age, or a
    /// discharge before admission.
    pub fn new(
        patient_id: &str,
        full_name: &str,
        age: u32,
        gender: Gender,
        diagnosis: &str,
        admission_date: NaiveDate,
        discharge_date: Option<NaiveDate>,
    ) -> Result<Self> {
        check_discharge(admission_date, discharge_date)?;
        Ok(Self {
            patient_id: required("patient_id", patient_id)?,
            full_name: required("full_name", full_name)?,
            age: positive("age", age)?,
            gender,
            diagnosis: required("diagnosis", diagnosis)?,
            admission_date,
            discharge_date,
        })
    }

    /// True while no discharge date is recorded.
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        self.discharge_date.is_none()
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            patient_id: row.get(0)?,
            full_name: row.get(1)?,
            age: row.get(2)?,
            gender: row.get(3)?,
            diagnosis: row.get(4)?,
            admission_date: row.get(5)?,
            discharge_date: row.get(6)?,
        })
    }
}

fn check_discharge(admission: NaiveDate, discharge: Option<NaiveDate>) -> Result<()> {
    match discharge {
        Some(day) if day < admission => Err(Error::validation(
            "discharge_date",
            format!("{day} is before admission on {admission}"),
        )),
        _ => Ok(()),
    }
}

const COLUMNS: &str =
    "patient_id, full_name, age, gender, diagnosis, admission_date, discharge_date";

/// Patients per diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosisCount {
    /// The diagnosis.
    pub diagnosis: String,
    /// Number of patients with it.
    pub count: i64,
}

/// Hospital operations over the shared database.
#[derive(Debug)]
pub struct HospitalStore<'a> {
    db: &'a mut Database,
}

impl Database {
    /// Hospital patient records.
    pub fn hospital(&mut self) -> HospitalStore<'_> {
        HospitalStore { db: self }
    }
}

impl HospitalStore<'_> {
    /// Admits a new patient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when the patient number is taken.
    pub fn add(&mut self, patient: &Patient) -> Result<()> {
        self.db
            .connection()
            .execute(
                &format!(
                    "INSERT INTO hospital_patients ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                ),
                params![
                    patient.patient_id,
                    patient.full_name,
                    patient.age,
                    patient.gender,
                    patient.diagnosis,
                    patient.admission_date,
                    patient.discharge_date
                ],
            )
            .map_err(|e| Error::on_unique_violation(e, "patient", &patient.patient_id))?;
        Ok(())
    }

    /// All patients ordered by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self) -> Result<Vec<Patient>> {
        collect_rows(
            self.db.connection(),
            &format!("SELECT {COLUMNS} FROM hospital_patients ORDER BY patient_id"),
            [],
            Patient::from_row,
        )
    }

    /// Looks up one patient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no patient has this number.
    pub fn get(&self, patient_id: &str) -> Result<Patient> {
        let patient_id = patient_id.trim();
        self.db
            .connection()
            .query_row(
                &format!("SELECT {COLUMNS} FROM hospital_patients WHERE patient_id = ?1"),
                [patient_id],
                Patient::from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("patient", patient_id))
    }

    /// Patients whose number equals `term` or whose name contains it.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search(&self, term: &str) -> Result<Vec<Patient>> {
        collect_rows(
            self.db.connection(),
            &format!(
                "SELECT {COLUMNS} FROM hospital_patients \
                 WHERE patient_id = ?1 OR full_name LIKE '%' || ?1 || '%' ORDER BY patient_id"
            ),
            [term.trim()],
            Patient::from_row,
        )
    }

    /// Replaces the diagnosis and discharge date.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the discharge precedes admission,
    /// or [`Error::NotFound`].
    pub fn update(
        &mut self,
        patient_id: &str,
        diagnosis: &str,
        discharge_date: Option<NaiveDate>,
    ) -> Result<()> {
        let patient_id = patient_id.trim();
        let diagnosis = required("diagnosis", diagnosis)?;

        let tx = self.db.begin_transaction()?;
        let admission: NaiveDate = tx
            .query_row(
                "SELECT admission_date FROM hospital_patients WHERE patient_id = ?1",
                [patient_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::not_found("patient", patient_id))?;
        check_discharge(admission, discharge_date)?;

        tx.execute(
            "UPDATE hospital_patients SET diagnosis = ?1, discharge_date = ?2 WHERE patient_id = ?3",
            params![diagnosis, discharge_date, patient_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Removes a patient record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no patient has this number.
    pub fn delete(&mut self, patient_id: &str) -> Result<()> {
        let patient_id = patient_id.trim();
        let changed = self.db.connection().execute(
            "DELETE FROM hospital_patients WHERE patient_id = ?1",
            [patient_id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("patient", patient_id));
        }
        Ok(())
    }

    /// Patients without a discharge date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn currently_admitted(&self) -> Result<Vec<Patient>> {
        collect_rows(
            self.db.connection(),
            &format!(
                "SELECT {COLUMNS} FROM hospital_patients WHERE discharge_date IS NULL \
                 ORDER BY admission_date, patient_id"
            ),
            [],
            Patient::from_row,
        )
    }

    /// Patient count per diagnosis, ordered by diagnosis.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_by_diagnosis(&self) -> Result<Vec<DiagnosisCount>> {
        collect_rows(
            self.db.connection(),
            "SELECT diagnosis, COUNT(*) FROM hospital_patients GROUP BY diagnosis ORDER BY diagnosis",
            [],
            |row| {
                Ok(DiagnosisCount {
                    diagnosis: row.get(0)?,
                    count: row.get(1)?,
                })
            },
        )
    }
}
