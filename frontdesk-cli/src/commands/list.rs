//! List command implementation.
//!
//! Prints the records of one program as a table, JSON, CSV or TSV, so they
//! can be inspected or exported without going through a menu.

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database_for_reading, resolve_data_dir, GlobalOptions,
};
use clap::{Args, ValueEnum};
use frontdesk::programs::quiz::{QuestionBank, ResultLog, QUESTIONS_FILE_NAME, RESULTS_FILE_NAME};
use frontdesk::programs::smarthome::{DeviceRegistry, DEVICES_FILE_NAME};
use frontdesk::Database;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

/// List the records of one program.
#[derive(Args)]
pub struct ListCommand {
    /// What to list
    #[arg(value_enum)]
    pub entity: Entity,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "table",
        env = "FRONTDESK_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

/// Record kinds that can be listed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Entity {
    /// Student records
    Students,
    /// Inventory products
    Products,
    /// Hospital patients
    Patients,
    /// Bank accounts
    Accounts,
    /// Shopping cart items
    Cart,
    /// School personnel
    Personnel,
    /// Transport trips
    Trips,
    /// Transport reservations
    Reservations,
    /// Clinic doctors
    Doctors,
    /// Clinic patients
    ClinicPatients,
    /// Clinic appointments
    Appointments,
    /// Rental cars
    Cars,
    /// Rental customers
    Customers,
    /// Open rentals
    Rentals,
    /// Library books
    Books,
    /// Library loans, open and closed
    Loans,
    /// Saved smart-home devices
    Devices,
    /// Quiz questions
    Questions,
    /// Quiz results
    Results,
}

impl Entity {
    /// Column names, matching the serialized field names.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Students => &["student_id", "first_name", "last_name", "course", "year_level"],
            Self::Products => &["product_id", "name", "category", "quantity", "unit_price"],
            Self::Patients => &[
                "patient_id",
                "full_name",
                "age",
                "gender",
                "diagnosis",
                "admission_date",
                "discharge_date",
            ],
            Self::Accounts => &["number", "holder", "kind", "balance"],
            Self::Cart => &["product_id", "name", "category", "price"],
            Self::Personnel => &[
                "id",
                "name",
                "age",
                "role",
                "subject",
                "course",
                "year_level",
                "department",
            ],
            Self::Trips => &[
                "trip_id",
                "route",
                "date",
                "time",
                "total_seats",
                "available_seats",
                "fare",
            ],
            Self::Reservations => &[
                "reservation_id",
                "passenger_name",
                "contact",
                "trip_id",
                "seat_no",
                "payment",
            ],
            Self::Doctors => &["doctor_id", "name", "specialization", "slots"],
            Self::ClinicPatients => &["patient_id", "name", "contact"],
            Self::Appointments => &[
                "appointment_id",
                "patient_id",
                "doctor_id",
                "date",
                "timeslot",
                "status",
            ],
            Self::Cars => &["plate", "model", "kind", "daily_rate", "status"],
            Self::Customers => &["customer_id", "full_name", "license", "contact"],
            Self::Rentals => &[
                "rental_id",
                "customer_id",
                "plate",
                "start_date",
                "end_date",
                "total_fee",
            ],
            Self::Books => &["book_id", "title", "author", "year", "status"],
            Self::Loans => &[
                "loan_id",
                "book_id",
                "title",
                "borrower",
                "borrowed_on",
                "returned_on",
            ],
            Self::Devices => &[
                "id",
                "name",
                "on",
                "kind",
                "brightness",
                "speed",
                "temperature",
                "mode",
            ],
            Self::Questions => &["id", "text", "choices", "correct"],
            Self::Results => &["student_id", "student_name", "score", "total", "date"],
        }
    }

    const fn is_file_backed(self) -> bool {
        matches!(self, Self::Devices | Self::Questions | Self::Results)
    }
}

/// Output format for list command.
#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let rows = if self.entity.is_file_backed() {
            file_rows(self.entity, global)?
        } else {
            let config = load_configuration(global)?;
            let mut db = open_database_for_reading(global, &config)?;
            database_rows(self.entity, &mut db)?
        };

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        render(self.entity.columns(), &rows, self.format, &mut handle)
    }
}

fn json_error(e: serde_json::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

fn to_rows<T: Serialize>(items: &[T]) -> Result<Vec<Value>, CliError> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(json_error))
        .collect()
}

/// Loads the rows of a database-backed entity.
pub fn database_rows(entity: Entity, db: &mut Database) -> Result<Vec<Value>, CliError> {
    match entity {
        Entity::Students => to_rows(&db.students().list()?),
        Entity::Products => to_rows(&db.inventory().list()?),
        Entity::Patients => to_rows(&db.hospital().list()?),
        Entity::Accounts => to_rows(&db.bank(Default::default()).list()?),
        Entity::Cart => to_rows(&db.cart().items()?),
        Entity::Personnel => to_rows(&db.personnel().list()?),
        Entity::Trips => to_rows(&db.transport().trips()?),
        Entity::Reservations => to_rows(&db.transport().reservations()?),
        Entity::Doctors => to_rows(&db.clinic().doctors()?),
        Entity::ClinicPatients => to_rows(&db.clinic().patients()?),
        Entity::Appointments => to_rows(&db.clinic().appointments()?),
        Entity::Cars => to_rows(&db.rental().cars()?),
        Entity::Customers => to_rows(&db.rental().customers()?),
        Entity::Rentals => to_rows(&db.rental().rentals()?),
        Entity::Books => to_rows(&db.library().books()?),
        Entity::Loans => to_rows(&db.library().loans()?),
        Entity::Devices | Entity::Questions | Entity::Results => Ok(Vec::new()),
    }
}

fn file_rows(entity: Entity, global: &GlobalOptions) -> Result<Vec<Value>, CliError> {
    let data_dir = resolve_data_dir(global)?;
    match entity {
        Entity::Devices => {
            let path = data_dir.join(DEVICES_FILE_NAME);
            if !path.exists() {
                return Ok(Vec::new());
            }
            to_rows(DeviceRegistry::load(&path)?.list())
        }
        Entity::Questions => {
            to_rows(QuestionBank::load(data_dir.join(QUESTIONS_FILE_NAME))?.questions())
        }
        Entity::Results => to_rows(&ResultLog::new(data_dir.join(RESULTS_FILE_NAME)).load()?),
        _ => Ok(Vec::new()),
    }
}

/// Text for one cell; missing values are empty.
fn cell(row: &Value, column: &str) -> String {
    match row.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
            .collect::<Vec<_>>()
            .join(","),
        Some(other) => other.to_string(),
    }
}

/// Writes `rows` in `format`.
pub fn render<W: Write>(
    columns: &[&str],
    rows: &[Value],
    format: OutputFormat,
    out: &mut W,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => format_as_table(columns, rows, out),
        OutputFormat::Json => format_as_json(rows, out),
        OutputFormat::Csv => format_as_delimited(columns, rows, b',', out),
        OutputFormat::Tsv => format_as_delimited(columns, rows, b'\t', out),
    }
}

fn format_as_table<W: Write>(
    columns: &[&str],
    rows: &[Value],
    out: &mut W,
) -> Result<(), CliError> {
    let header_line = columns
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(out, "{header_line}")?;

    for row in rows {
        let line = columns
            .iter()
            .map(|c| {
                let text = cell(row, c);
                if text.is_empty() {
                    "-".to_string()
                } else {
                    text
                }
            })
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn format_as_json<W: Write>(rows: &[Value], out: &mut W) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, rows).map_err(json_error)?;
    writeln!(out)?;
    Ok(())
}

/// Convert csv::Error to CliError.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

fn format_as_delimited<W: Write>(
    columns: &[&str],
    rows: &[Value],
    delimiter: u8,
    out: &mut W,
) -> Result<(), CliError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);
    writer.write_record(columns).map_err(csv_error)?;
    for row in rows {
        writer
            .write_record(columns.iter().map(|c| cell(row, c)))
            .map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}
