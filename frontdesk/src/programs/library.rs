//! Library books and loans.
//!
//! A book's status column is a [`Flag`]; borrowing flips it and opens a
//! loan in the same transaction. The partial UNIQUE index on open loans
//! keeps a book from being lent twice even if the flag were bypassed.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{allocation_insert_error, collect_rows};
use crate::capacity::{acquire_flag, release_flag, Flag};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::validate::{positive, required};

text_enum! {
    /// Shelf status.
    pub enum BookStatus as "status" {
        /// On the shelf.
        Available => "Available",
        /// Out on loan.
        Borrowed => "Borrowed",
    }
}

const ON_LOAN: Flag = Flag {
    table: "library_books",
    key_column: "book_id",
    flag_column: "status",
    free: "Available",
    taken: "Borrowed",
    entity: "book",
};

/// A catalogued book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Unique catalogue code.
    pub book_id: String,
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// Publication year.
    pub year: u32,
    /// Shelf status.
    pub status: BookStatus,
}

impl Book {
    /// Builds an available book.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text or a zero year.
    pub fn new(book_id: &str, title: &str, author: &str, year: u32) -> Result<Self> {
        Ok(Self {
            book_id: required("book_id", book_id)?,
            title: required("title", title)?,
            author: required("author", author)?,
            year: positive("year", year)?,
            status: BookStatus::Available,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            book_id: row.get(0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            year: row.get(3)?,
            status: row.get(4)?,
        })
    }
}

/// A lending of one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loan {
    /// Assigned loan number.
    pub loan_id: i64,
    /// Book lent.
    pub book_id: String,
    /// Title of the book lent.
    pub title: String,
    /// Who has it.
    pub borrower: String,
    /// Day lent.
    pub borrowed_on: NaiveDate,
    /// Day returned; `None` while open.
    pub returned_on: Option<NaiveDate>,
}

impl Loan {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            loan_id: row.get(0)?,
            book_id: row.get(1)?,
            title: row.get(2)?,
            borrower: row.get(3)?,
            borrowed_on: row.get(4)?,
            returned_on: row.get(5)?,
        })
    }
}

const BOOK_COLUMNS: &str = "book_id, title, author, year, status";
const LOAN_SELECT: &str = "SELECT l.loan_id, l.book_id, b.title, l.borrower, l.borrowed_on, \
     l.returned_on FROM library_loans l JOIN library_books b ON b.book_id = l.book_id";

/// Library operations over the shared database.
#[derive(Debug)]
pub struct LibraryStore<'a> {
    db: &'a mut Database,
}

impl Database {
    /// Library books and loans.
    pub fn library(&mut self) -> LibraryStore<'_> {
        LibraryStore { db: self }
    }
}

impl LibraryStore<'_> {
    /// Catalogues a book.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when the code is taken.
    pub fn add_book(&mut self, book: &Book) -> Result<()> {
        self.db
            .connection()
            .execute(
                &format!("INSERT INTO library_books ({BOOK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                params![book.book_id, book.title, book.author, book.year, book.status],
            )
            .map_err(|e| Error::on_unique_violation(e, "book", &book.book_id))?;
        Ok(())
    }

    /// Every book by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn books(&self) -> Result<Vec<Book>> {
        collect_rows(
            self.db.connection(),
            &format!("SELECT {BOOK_COLUMNS} FROM library_books ORDER BY book_id"),
            [],
            Book::from_row,
        )
    }

    /// Looks up one book.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown code.
    pub fn get_book(&self, book_id: &str) -> Result<Book> {
        let book_id = book_id.trim();
        self.db
            .connection()
            .query_row(
                &format!("SELECT {BOOK_COLUMNS} FROM library_books WHERE book_id = ?1"),
                [book_id],
                Book::from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("book", book_id))
    }

    /// Replaces title, author and year. Status is left alone.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text or a zero year, or
    /// [`Error::NotFound`].
    pub fn update_book(
        &mut self,
        book_id: &str,
        title: &str,
        author: &str,
        year: u32,
    ) -> Result<()> {
        let book_id = book_id.trim();
        let changed = self.db.connection().execute(
            "UPDATE library_books SET title = ?1, author = ?2, year = ?3 WHERE book_id = ?4",
            params![
                required("title", title)?,
                required("author", author)?,
                positive("year", year)?,
                book_id
            ],
        )?;
        if changed == 0 {
            return Err(Error::not_found("book", book_id));
        }
        Ok(())
    }

    /// Removes a book that is on the shelf, with its loan history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] while the book is on loan, or
    /// [`Error::NotFound`].
    pub fn delete_book(&mut self, book_id: &str) -> Result<()> {
        let book_id = book_id.trim();
        let tx = self.db.begin_transaction()?;
        let status: BookStatus = tx
            .query_row(
                "SELECT status FROM library_books WHERE book_id = ?1",
                [book_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::not_found("book", book_id))?;
        if status == BookStatus::Borrowed {
            return Err(Error::conflict(format!("book '{book_id}' is on loan")));
        }
        tx.execute("DELETE FROM library_loans WHERE book_id = ?1", [book_id])?;
        tx.execute("DELETE FROM library_books WHERE book_id = ?1", [book_id])?;
        tx.commit()?;
        Ok(())
    }

    /// Lends a book.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] for an unknown book
    /// - [`Error::Conflict`] when the book is already out
    /// - [`Error::AlreadyAllocated`] when an open loan exists regardless
    pub fn borrow(&mut self, book_id: &str, borrower: &str, today: NaiveDate) -> Result<Loan> {
        let book_id = book_id.trim();
        let borrower = required("borrower", borrower)?;

        let tx = self.db.begin_transaction()?;
        acquire_flag(&tx, &ON_LOAN, book_id)?;
        let loan_id: i64 = tx
            .query_row(
                "INSERT INTO library_loans (book_id, borrower, borrowed_on) VALUES (?1, ?2, ?3) \
                 RETURNING loan_id",
                params![book_id, borrower, today],
                |row| row.get(0),
            )
            .map_err(|e| {
                allocation_insert_error(
                    e,
                    &format!("book '{book_id}'"),
                    "open loan",
                    "loan",
                    book_id,
                )
            })?;
        let loan = tx.query_row(
            &format!("{LOAN_SELECT} WHERE l.loan_id = ?1"),
            [loan_id],
            Loan::from_row,
        )?;
        tx.commit()?;

        log::debug!("lent '{book_id}' to '{borrower}' as loan {loan_id}");
        Ok(loan)
    }

    /// Takes a book back and closes its open loan.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] for an unknown book
    /// - [`Error::Conflict`] when the book is not on loan
    /// - [`Error::Validation`] when `today` is before the loan started
    pub fn return_book(&mut self, book_id: &str, today: NaiveDate) -> Result<Loan> {
        let book_id = book_id.trim();
        let tx = self.db.begin_transaction()?;
        release_flag(&tx, &ON_LOAN, book_id)?;
        let mut loan = tx
            .query_row(
                &format!("{LOAN_SELECT} WHERE l.book_id = ?1 AND l.returned_on IS NULL"),
                [book_id],
                Loan::from_row,
            )
            .optional()?
            .ok_or_else(|| Error::conflict(format!("book '{book_id}' has no open loan")))?;
        if today < loan.borrowed_on {
            return Err(Error::validation(
                "returned_on",
                format!("{today} is before the loan date {}", loan.borrowed_on),
            ));
        }
        tx.execute(
            "UPDATE library_loans SET returned_on = ?1 WHERE loan_id = ?2",
            params![today, loan.loan_id],
        )?;
        tx.commit()?;

        loan.returned_on = Some(today);
        log::debug!("'{book_id}' returned, loan {} closed", loan.loan_id);
        Ok(loan)
    }

    /// Open loans, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn borrowed(&self) -> Result<Vec<Loan>> {
        collect_rows(
            self.db.connection(),
            &format!(
                "{LOAN_SELECT} WHERE l.returned_on IS NULL ORDER BY l.borrowed_on, l.loan_id"
            ),
            [],
            Loan::from_row,
        )
    }

    /// Every loan, open or closed, in the order made.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn loans(&self) -> Result<Vec<Loan>> {
        collect_rows(
            self.db.connection(),
            &format!("{LOAN_SELECT} ORDER BY l.loan_id"),
            [],
            Loan::from_row,
        )
    }
}
