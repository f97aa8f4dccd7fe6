//! Library catalogue and lending menu.

use crate::console::{finish, stdio_console, ActionResult, Console};
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, today, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use frontdesk::programs::library::{Book, Loan};
use frontdesk::Database;
use std::io::{BufRead, Write};

/// Manage books and loans interactively.
#[derive(Args)]
pub struct LibraryCommand {}

impl LibraryCommand {
    /// Execute the library menu on stdin/stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        finish(run(&mut stdio_console(), &mut db, today()))
    }
}

/// One-line book rendering.
pub fn describe_book(b: &Book) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        b.book_id, b.title, b.author, b.year, b.status
    )
}

/// One-line loan rendering.
pub fn describe_loan(l: &Loan) -> String {
    let mut line = format!(
        "Loan #{} | {} ({}) | {} | since {}",
        l.loan_id, l.book_id, l.title, l.borrower, l.borrowed_on
    );
    if let Some(returned) = l.returned_on {
        line.push_str(&format!(" | returned {returned}"));
    }
    line
}

/// Runs the library menu until "Exit" or end of input.
///
/// Loans open and close on `today`.
pub fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    db: &mut Database,
    today: NaiveDate,
) -> ActionResult {
    console.run_menu(
        "Library Management",
        &[
            "Add Book",
            "View Books",
            "Update Book",
            "Delete Book",
            "Borrow Book",
            "Return Book",
            "View Borrowed Books",
            "Exit",
        ],
        |console, choice| {
            match choice {
                1 => {
                    let id = console.ask("Book ID: ")?;
                    let title = console.ask("Title: ")?;
                    let author = console.ask("Author: ")?;
                    let year = console.ask_number("year", "Year: ")?;
                    db.library().add_book(&Book::new(&id, &title, &author, year)?)?;
                    console.say("Book added.")?;
                }
                2 => {
                    let rows: Vec<String> =
                        db.library().books()?.iter().map(describe_book).collect();
                    console.show_all(&rows, "No books in the catalogue.")?;
                }
                3 => {
                    let id = console.ask("Book ID: ")?;
                    let current = db.library().get_book(&id)?;
                    console.say(describe_book(&current))?;
                    let title = console.ask("New title: ")?;
                    let author = console.ask("New author: ")?;
                    let year = console.ask_number("year", "New year: ")?;
                    db.library().update_book(&id, &title, &author, year)?;
                    console.say("Book updated.")?;
                }
                4 => {
                    let id = console.ask("Book ID: ")?;
                    db.library().delete_book(&id)?;
                    console.say("Book deleted.")?;
                }
                5 => {
                    let id = console.ask("Book ID: ")?;
                    let borrower = console.ask("Borrower name: ")?;
                    let loan = db.library().borrow(&id, &borrower, today)?;
                    console.say(format!("'{}' lent to {}.", loan.title, loan.borrower))?;
                }
                6 => {
                    let id = console.ask("Book ID: ")?;
                    let loan = db.library().return_book(&id, today)?;
                    console.say(format!("'{}' returned by {}.", loan.title, loan.borrower))?;
                }
                _ => {
                    let rows: Vec<String> =
                        db.library().borrowed()?.iter().map(describe_loan).collect();
                    console.show_all(&rows, "No books are on loan.")?;
                }
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
        let today = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        finish(run(&mut console, db, today)).unwrap();
        String::from_utf8(console.output().clone()).unwrap()
    }

    #[test]
    fn test_borrow_twice_refused_then_returned() {
        let mut db = Database::open_in_memory().unwrap();
        let out = run_script(
            &mut db,
            "1\nB1\nDune\nHerbert\n1965\n5\nB1\nAna\n5\nB1\nBen\n7\n6\nB1\n7\n8\n",
        );
        assert!(out.contains("'Dune' lent to Ana."));
        assert!(out.contains("Error: conflict"));
        assert!(out.contains("Loan #1 | B1 (Dune) | Ana | since 2025-02-10"));
        assert!(out.contains("'Dune' returned by Ana."));
        assert!(out.contains("No books are on loan."));
    }

    #[test]
    fn test_book_on_loan_cannot_be_deleted() {
        let mut db = Database::open_in_memory().unwrap();
        let out = run_script(&mut db, "1\nB1\nDune\nHerbert\n1965\n5\nB1\nAna\n4\nB1\n2\n8\n");
        assert!(out.contains("Error: conflict: book 'B1' is on loan"));
        assert!(out.contains("B1 | Dune | Herbert | 1965 | Borrowed"));
    }

    #[test]
    fn test_update_book() {
        let mut db = Database::open_in_memory().unwrap();
        let out = run_script(
            &mut db,
            "1\nB1\nDune\nHerbert\n1965\n3\nB1\nDune Messiah\nFrank Herbert\n1969\n2\n8\n",
        );
        assert!(out.contains("B1 | Dune Messiah | Frank Herbert | 1969 | Available"));
    }
}
