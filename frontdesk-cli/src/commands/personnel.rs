//! School personnel menu.

use crate::console::{finish, stdio_console, ActionResult, Console};
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use frontdesk::programs::personnel::{Person, Role};
use frontdesk::Database;
use std::io::{BufRead, Write};

/// Manage teachers, students and admin staff interactively.
#[derive(Args)]
pub struct PersonnelCommand {}

impl PersonnelCommand {
    /// Execute the personnel menu on stdin/stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        finish(run(&mut stdio_console(), &mut db))
    }
}

fn ask_person<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    role_of: impl FnOnce(&mut Console<R, W>) -> ActionResult<Role>,
) -> ActionResult<Person> {
    let id = console.ask("ID: ")?;
    let name = console.ask("Name: ")?;
    let age = console.ask_number("age", "Age: ")?;
    let role = role_of(console)?;
    Ok(Person::new(&id, &name, age, role)?)
}

/// Runs the personnel menu until "Exit" or end of input.
pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, db: &mut Database) -> ActionResult {
    console.run_menu(
        "School Personnel",
        &[
            "Add Teacher",
            "Add Student",
            "Add Admin Staff",
            "View All Personnel",
            "Role-Specific Action",
            "Exit",
        ],
        |console, choice| {
            let person = match choice {
                1 => ask_person(console, |c| {
                    let subject = c.ask("Subject: ")?;
                    Ok(Role::teacher(&subject)?)
                })?,
                2 => ask_person(console, |c| {
                    let course = c.ask("Course: ")?;
                    let year = c.ask_number("year_level", "Year level: ")?;
                    Ok(Role::student(&course, year)?)
                })?,
                3 => ask_person(console, |c| {
                    let department = c.ask("Department: ")?;
                    Ok(Role::admin_staff(&department)?)
                })?,
                4 => {
                    let people = db.personnel().list()?;
                    return Ok(console.show_all(&people, "No personnel recorded.")?);
                }
                _ => {
                    let id = console.ask("ID: ")?;
                    let person = db.personnel().get(&id)?;
                    return Ok(console.say(person.role_action())?);
                }
            };
            db.personnel().add(&person)?;
            console.say(format!("{} added.", person.role.label()))?;
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

    #[test]
    fn test_introductions_and_actions() {
        let mut db = Database::open_in_memory().unwrap();
        let out = run_script(
            &mut db,
            "1\nT1\nAna\n35\nMath\n2\nS1\nBen\n19\nBSIT\n2\n3\nA1\nCora\n40\nRegistrar\n4\n5\nt1\n6\n",
        );
        assert!(out.contains("ID: T1 - I am Ana, a Teacher of Math."));
        assert!(out.contains("ID: S1 - I am Ben, a 2nd year student of BSIT."));
        assert!(out.contains("working in the Registrar department."));
        assert!(out.contains("Ana has graded a student."));
    }

    #[test]
    fn test_zero_age_rejected() {
        let mut db = Database::open_in_memory().unwrap();
        let out = run_script(&mut db, "1\nT1\nAna\n0\nMath\n6\n");
        assert!(out.contains("Error: validation error for 'age'"));
        assert!(db.personnel().list().unwrap().is_empty());
    }
}
