//! Hospital patient records menu.

use crate::console::{finish, stdio_console, ActionResult, Console};
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use frontdesk::programs::hospital::{Gender, Patient};
use frontdesk::Database;
use std::io::{BufRead, Write};

/// Manage hospital patient records interactively.
#[derive(Args)]
pub struct HospitalCommand {}

impl HospitalCommand {
    /// Execute the hospital menu on stdin/stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        finish(run(&mut stdio_console(), &mut db))
    }
}

/// One-line rendering used by the menu and the `list` table.
pub fn describe(p: &Patient) -> String {
    let discharged = p
        .discharge_date
        .map_or_else(|| "Admitted".to_string(), |d| format!("Discharged {d}"));
    format!(
        "{} | {} | {} | {} | {} | Since {} | {discharged}",
        p.patient_id, p.full_name, p.age, p.gender, p.diagnosis, p.admission_date
    )
}

/// Runs the hospital menu until "Exit" or end of input.
pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, db: &mut Database) -> ActionResult {
    console.run_menu(
        "Hospital Patient Records",
        &[
            "Add Patient",
            "View Patients",
            "Search Patient",
            "Update Patient",
            "Delete Patient",
            "Reports",
            "Exit",
        ],
        |console, choice| {
            match choice {
                1 => {
                    let id = console.ask("Patient ID: ")?;
                    let name = console.ask("Full name: ")?;
                    let age = console.ask_number("age", "Age: ")?;
                    let gender: Gender = console.ask_parsed("Gender (Male/Female): ")?;
                    let diagnosis = console.ask("Diagnosis: ")?;
                    let admitted =
                        console.ask_date("admission_date", "Admission date (YYYY-MM-DD): ")?;
                    let discharged = console.ask_optional_date(
                        "discharge_date",
                        "Discharge date (YYYY-MM-DD, blank if still admitted): ",
                    )?;
                    let patient =
                        Patient::new(&id, &name, age, gender, &diagnosis, admitted, discharged)?;
                    db.hospital().add(&patient)?;
                    console.say("Patient added.")?;
                }
                2 => {
                    let rows: Vec<String> = db.hospital().list()?.iter().map(describe).collect();
                    console.show_all(&rows, "No patients found.")?;
                }
                3 => {
                    let term = console.ask("Search by ID or name: ")?;
                    let rows: Vec<String> =
                        db.hospital().search(&term)?.iter().map(describe).collect();
                    console.show_all(&rows, "No matching patients.")?;
                }
                4 => {
                    let id = console.ask("Patient ID: ")?;
                    let current = db.hospital().get(&id)?;
                    console.say(describe(&current))?;
                    let diagnosis = console.ask("New diagnosis (blank keeps): ")?;
                    let diagnosis = if diagnosis.is_empty() {
                        current.diagnosis
                    } else {
                        diagnosis
                    };
                    let discharged = console.ask_optional_date(
                        "discharge_date",
                        "Discharge date (YYYY-MM-DD, blank if still admitted): ",
                    )?;
                    db.hospital().update(&id, &diagnosis, discharged)?;
                    console.say("Patient updated.")?;
                }
                5 => {
                    let id = console.ask("Patient ID: ")?;
                    db.hospital().delete(&id)?;
                    console.say("Patient deleted.")?;
                }
                _ => reports(console, db)?,
            }
            Ok(())
        },
    )
}

fn reports<R: BufRead, W: Write>(console: &mut Console<R, W>, db: &mut Database) -> ActionResult {
    console.run_menu(
        "Reports",
        &[
            "Currently Admitted Patients",
            "Count Patients per Diagnosis",
            "Back",
        ],
        |console, choice| {
            if choice == 1 {
                let rows: Vec<String> = db
                    .hospital()
                    .currently_admitted()?
                    .iter()
                    .map(describe)
                    .collect();
                console.show_all(&rows, "No patients are currently admitted.")?;
            } else {
                let rows: Vec<String> = db
                    .hospital()
                    .count_by_diagnosis()?
                    .iter()
                    .map(|c| format!("{}: {}", c.diagnosis, c.count))
                    .collect();
                console.show_all(&rows, "No patients found.")?;
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(db: &mut Database, script: &str) -> String {
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        finish(run(&mut console, db)).unwrap();
        String::from_utf8(console.output().clone()).unwrap()
    }

    const ADD_P1: &str = "1\nP1\nAna Cruz\n34\nfemale\nFlu\n2025-03-01\n\n";

    #[test]
    fn test_add_and_discharge() {
        let mut db = Database::open_in_memory().unwrap();
        let out = run_script(&mut db, &format!("{ADD_P1}4\nP1\n\n2025-03-04\n7\n"));
        assert!(out.contains("Patient added."));
        assert!(out.contains("Patient updated."));
        let patient = db.hospital().get("P1").unwrap();
        assert_eq!(patient.diagnosis, "Flu");
        assert!(!patient.is_admitted());
    }

    #[test]
    fn test_discharge_before_admission_is_refused() {
        let mut db = Database::open_in_memory().unwrap();
        let out = run_script(&mut db, &format!("{ADD_P1}4\nP1\nCold\n2025-02-01\n7\n"));
        assert!(out.contains("Error: validation error for 'discharge_date'"));
        assert!(db.hospital().get("P1").unwrap().is_admitted());
    }

    #[test]
    fn test_admitted_report() {
        let mut db = Database::open_in_memory().unwrap();
        let out = run_script(&mut db, &format!("{ADD_P1}6\n1\n2\n3\n7\n"));
        assert!(out.contains("P1 | Ana Cruz | 34 | Female | Flu | Since 2025-03-01 | Admitted"));
        assert!(out.contains("Flu: 1"));
    }
}
