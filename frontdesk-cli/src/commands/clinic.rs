//! Clinic menus for administrators, doctors and patients.

use crate::console::{finish, stdio_console, ActionResult, Console};
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, today, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use frontdesk::programs::clinic::{parse_slots, Appointment, ClinicPatient, Doctor};
use frontdesk::Database;
use std::io::{BufRead, Write};

/// Run the clinic appointment system interactively.
#[derive(Args)]
pub struct ClinicCommand {}

impl ClinicCommand {
    /// Execute the clinic menu on stdin/stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        finish(run(&mut stdio_console(), &mut db, today()))
    }
}

/// One-line doctor summary.
pub fn describe_doctor(d: &Doctor) -> String {
    let slots = if d.slots.is_empty() {
        "any time".to_string()
    } else {
        d.slot_list()
    };
    format!("{} | Dr. {} | {} | Slots: {slots}", d.doctor_id, d.name, d.specialization)
}

const APPOINTMENT_HEADER: &str = "ID         Patient    Doctor     Date         Time     Status";

fn show_appointments<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    appointments: &[Appointment],
) -> ActionResult {
    if appointments.is_empty() {
        console.say("No appointments found.")?;
    } else {
        console.say(APPOINTMENT_HEADER)?;
        console.show_all(appointments, "")?;
    }
    Ok(())
}

/// Runs the top-level clinic menu until "Exit" or end of input.
///
/// Bookings dated before `today` are refused.
pub fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    db: &mut Database,
    today: NaiveDate,
) -> ActionResult {
    console.run_menu(
        "Clinic Appointment System",
        &["Admin", "Doctor", "Patient", "Exit"],
        |console, choice| match choice {
            1 => admin_menu(console, db),
            2 => doctor_menu(console, db),
            _ => patient_menu(console, db, today),
        },
    )
}

fn admin_menu<R: BufRead, W: Write>(console: &mut Console<R, W>, db: &mut Database) -> ActionResult {
    console.run_menu(
        "Admin Menu",
        &[
            "Add Doctor",
            "Update Doctor Slots",
            "Delete Doctor",
            "View Doctors",
            "View Patients",
            "Back",
        ],
        |console, choice| {
            match choice {
                1 => {
                    let id = console.ask("Doctor ID: ")?;
                    let name = console.ask("Name: ")?;
                    let specialization = console.ask("Specialization: ")?;
                    let slots = parse_slots(&console.ask("Slots (HH:MM, comma separated): ")?)?;
                    db.clinic()
                        .add_doctor(&Doctor::new(&id, &name, &specialization, slots)?)?;
                    console.say("Doctor added.")?;
                }
                2 => {
                    let id = console.ask("Doctor ID: ")?;
                    let slots = parse_slots(&console.ask("New slots (HH:MM, comma separated): ")?)?;
                    db.clinic().update_doctor_slots(&id, slots)?;
                    console.say("Slots updated.")?;
                }
                3 => {
                    let id = console.ask("Doctor ID: ")?;
                    db.clinic().delete_doctor(&id)?;
                    console.say("Doctor deleted.")?;
                }
                4 => {
                    let rows: Vec<String> =
                        db.clinic().doctors()?.iter().map(describe_doctor).collect();
                    console.show_all(&rows, "No doctors registered.")?;
                }
                _ => {
                    let rows: Vec<String> = db
                        .clinic()
                        .patients()?
                        .iter()
                        .map(|p| format!("{} | {} | {}", p.patient_id, p.name, p.contact))
                        .collect();
                    console.show_all(&rows, "No patients registered.")?;
                }
            }
            Ok(())
        },
    )
}

fn doctor_menu<R: BufRead, W: Write>(console: &mut Console<R, W>, db: &mut Database) -> ActionResult {
    let doctor_id = console.ask("Doctor ID: ")?;
    let doctor = match db.clinic().doctors()?.into_iter().find(|d| d.doctor_id == doctor_id) {
        Some(doctor) => doctor,
        None => return Err(frontdesk::Error::not_found("doctor", doctor_id).into()),
    };
    console.say(format!("Welcome, Dr. {}.", doctor.name))?;
    console.run_menu(
        "Doctor Menu",
        &["View My Appointments", "Complete Appointment", "Back"],
        |console, choice| {
            if choice == 1 {
                let appointments = db.clinic().appointments_for_doctor(&doctor.doctor_id)?;
                show_appointments(console, &appointments)?;
            } else {
                let id = console.ask("Appointment ID: ")?;
                db.clinic().complete(&id)?;
                console.say("Appointment marked as completed.")?;
            }
            Ok(())
        },
    )
}

fn patient_menu<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    db: &mut Database,
    today: NaiveDate,
) -> ActionResult {
    console.run_menu(
        "Patient Menu",
        &[
            "Register",
            "Book Appointment",
            "Cancel Appointment",
            "View My Appointments",
            "Back",
        ],
        |console, choice| {
            match choice {
                1 => {
                    let id = console.ask("Patient ID: ")?;
                    let name = console.ask("Name: ")?;
                    let contact = console.ask("Contact number: ")?;
                    db.clinic()
                        .register_patient(&ClinicPatient::new(&id, &name, &contact)?)?;
                    console.say("Patient registered.")?;
                }
                2 => {
                    let id = console.ask("Appointment ID: ")?;
                    let patient_id = console.ask("Patient ID: ")?;
                    let doctor_id = console.ask("Doctor ID: ")?;
                    let date = console.ask_date("date", "Date (YYYY-MM-DD): ")?;
                    let slot = console.ask_time("timeslot", "Time (HH:MM): ")?;
                    let appointment = Appointment::new(&id, &patient_id, &doctor_id, date, slot)?;
                    db.clinic().book(&appointment, today)?;
                    console.say("Appointment booked.")?;
                }
                3 => {
                    let id = console.ask("Appointment ID: ")?;
                    db.clinic().cancel(&id)?;
                    console.say("Appointment cancelled.")?;
                }
                _ => {
                    let patient_id = console.ask("Patient ID: ")?;
                    let mine: Vec<Appointment> = db
                        .clinic()
                        .appointments()?
                        .into_iter()
                        .filter(|a| a.patient_id == patient_id)
                        .collect();
                    show_appointments(console, &mine)?;
                }
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk::programs::clinic::AppointmentStatus;
    use std::io::Cursor;

    const SETUP: &str = "1\n1\nD1\nReyes\nPediatrics\n09:00,10:00\n6\n\
                         3\n1\nP1\nAna\n0917\n1\nP2\nBen\n0918\n5\n";

    fn run_script(db: &mut Database, script: &str) -> String {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        finish(run(&mut console, db, today)).unwrap();
        String::from_utf8(console.output().clone()).unwrap()
    }

    #[test]
    fn test_slot_taken_then_freed_by_cancel() {
        let mut db = Database::open_in_memory().unwrap();
        let script = format!(
            "{SETUP}3\n2\nA1\nP1\nD1\n2025-03-02\n09:00\n\
             2\nA2\nP2\nD1\n2025-03-02\n09:00\n\
             3\nA1\n\
             2\nA2\nP2\nD1\n2025-03-02\n09:00\n5\n4\n"
        );
        let out = run_script(&mut db, &script);
        assert!(out.contains("is already allocated"));
        assert!(out.contains("Appointment cancelled."));
        let appointments = db.clinic().appointments().unwrap();
        assert_eq!(appointments.len(), 2);
        assert!(appointments
            .iter()
            .any(|a| a.appointment_id == "A2" && a.status == AppointmentStatus::Scheduled));
    }

    #[test]
    fn test_booking_rules() {
        let mut db = Database::open_in_memory().unwrap();
        let script = format!(
            "{SETUP}3\n2\nA1\nP1\nD1\n2025-02-28\n09:00\n\
             2\nA1\nP1\nD1\n2025-03-02\n11:00\n\
             2\nA1\nP9\nD1\n2025-03-02\n09:00\n5\n4\n"
        );
        let out = run_script(&mut db, &script);
        assert!(out.contains("Error: validation error for 'date'"));
        assert!(out.contains("Error: validation error for 'timeslot'"));
        assert!(out.contains("Error: patient 'P9' not found"));
    }

    #[test]
    fn test_doctor_completes_appointment() {
        let mut db = Database::open_in_memory().unwrap();
        let script = format!(
            "{SETUP}3\n2\nA1\nP1\nD1\n2025-03-02\n10:00\n5\n\
             2\nD1\n2\nA1\n1\n2\nA1\n3\n4\n"
        );
        let out = run_script(&mut db, &script);
        assert!(out.contains("Welcome, Dr. Reyes."));
        assert!(out.contains("Appointment marked as completed."));
        assert!(out.contains("Completed"));
        assert!(out.contains("Error: conflict"));
    }

    #[test]
    fn test_doctor_with_appointment_cannot_be_deleted() {
        let mut db = Database::open_in_memory().unwrap();
        let script = format!(
            "{SETUP}3\n2\nA1\nP1\nD1\n2025-03-02\n10:00\n5\n1\n3\nD1\n4\n6\n4\n"
        );
        let out = run_script(&mut db, &script);
        assert!(out.contains("Error: conflict"));
        assert!(out.contains("D1 | Dr. Reyes | Pediatrics | Slots: 09:00,10:00"));
    }
}
