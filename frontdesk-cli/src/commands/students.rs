//! Student records menu.

use crate::console::{finish, stdio_console, ActionResult, Console};
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use frontdesk::programs::students::Student;
use frontdesk::Database;
use std::io::{BufRead, Write};

/// Manage student records interactively.
#[derive(Args)]
pub struct StudentsCommand {}

impl StudentsCommand {
    /// Execute the students menu on stdin/stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        finish(run(&mut stdio_console(), &mut db))
    }
}

/// One-line rendering used by the menu and the `list` table.
pub fn describe(s: &Student) -> String {
    format!(
        "{} | {} {} | {} | Year {}",
        s.student_id, s.first_name, s.last_name, s.course, s.year_level
    )
}

/// Runs the student menu until "Exit" or end of input.
pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, db: &mut Database) -> ActionResult {
    console.run_menu(
        "Student Records",
        &[
            "Add Student",
            "View Students",
            "Search Student",
            "Update Student",
            "Delete Student",
            "Reports",
            "Exit",
        ],
        |console, choice| match choice {
            1 => {
                let id = console.ask("Student ID: ")?;
                let first = console.ask("First name: ")?;
                let last = console.ask("Last name: ")?;
                let course = console.ask("Course: ")?;
                let year = console.ask_number("year_level", "Year level (1-5): ")?;
                db.students()
                    .add(&Student::new(&id, &first, &last, &course, year)?)?;
                console.say("Student added.")?;
                Ok(())
            }
            2 => {
                let rows: Vec<String> = db.students().list()?.iter().map(describe).collect();
                console.show_all(&rows, "No students found.")?;
                Ok(())
            }
            3 => {
                let id = console.ask("Student ID: ")?;
                let student = db.students().get(&id)?;
                console.say(describe(&student))?;
                Ok(())
            }
            4 => {
                let id = console.ask("Student ID: ")?;
                let course = console.ask("New course: ")?;
                let year = console.ask_number("year_level", "New year level (1-5): ")?;
                db.students().update(&id, &course, year)?;
                console.say("Student updated.")?;
                Ok(())
            }
            5 => {
                let id = console.ask("Student ID: ")?;
                db.students().delete(&id)?;
                console.say("Student deleted.")?;
                Ok(())
            }
            _ => reports(console, db),
        },
    )
}

fn reports<R: BufRead, W: Write>(console: &mut Console<R, W>, db: &mut Database) -> ActionResult {
    console.run_menu(
        "Reports",
        &[
            "Count students per course",
            "List students per year level",
            "Back",
        ],
        |console, choice| {
            if choice == 1 {
                let counts = db.students().count_by_course()?;
                let rows: Vec<String> = counts
                    .iter()
                    .map(|c| format!("{}: {}", c.course, c.count))
                    .collect();
                console.show_all(&rows, "No students found.")?;
            } else {
                let rows: Vec<String> = db
                    .students()
                    .list_by_year_level()?
                    .iter()
                    .map(describe)
                    .collect();
                console.show_all(&rows, "No students found.")?;
            }
            Ok(())
        },
    )
}
