//! Student information records.

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::collect_rows;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::validate::{in_range, required};

/// Lowest accepted year level.
pub const MIN_YEAR_LEVEL: u8 = 1;
/// Highest accepted year level.
pub const MAX_YEAR_LEVEL: u8 = 5;

/// An enrolled student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    /// Unique student number.
    pub student_id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Course or program of study.
    pub course: String,
    /// Year level, 1 through 5.
    pub year_level: u8,
}

impl Student {
    /// Builds a validated student.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text fields or a year level
    /// outside 1..=5.
    pub fn new(
        student_id: &str,
        first_name: &str,
        last_name: &str,
        course: &str,
        year_level: u8,
    ) -> Result<Self> {
        Ok(Self {
            student_id: required("student_id", student_id)?,
            first_name: required("first_name", first_name)?,
            last_name: required("last_name", last_name)?,
            course: required("course", course)?,
            year_level: in_range("year_level", year_level, MIN_YEAR_LEVEL, MAX_YEAR_LEVEL)?,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            student_id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            course: row.get(3)?,
            year_level: row.get(4)?,
        })
    }
}

const COLUMNS: &str = "student_id, first_name, last_name, course, year_level";

/// Number of students in one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseCount {
    /// The course.
    pub course: String,
    /// How many students take it.
    pub count: i64,
}

/// Student operations over the shared database.
#[derive(Debug)]
pub struct StudentStore<'a> {
    db: &'a mut Database,
}

impl Database {
    /// Student records.
    pub fn students(&mut self) -> StudentStore<'_> {
        StudentStore { db: self }
    }
}

impl StudentStore<'_> {
    /// Inserts a new student.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when the student number is taken.
    pub fn add(&mut self, student: &Student) -> Result<()> {
        self.db
            .connection()
            .execute(
                &format!("INSERT INTO students ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                params![
                    student.student_id,
                    student.first_name,
                    student.last_name,
                    student.course,
                    student.year_level
                ],
            )
            .map_err(|e| Error::on_unique_violation(e, "student", &student.student_id))?;
        log::debug!("added student {}", student.student_id);
        Ok(())
    }

    /// All students ordered by student number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self) -> Result<Vec<Student>> {
        self.query(&format!("SELECT {COLUMNS} FROM students ORDER BY student_id"))
    }

    /// Looks up one student.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no student has this number.
    pub fn get(&self, student_id: &str) -> Result<Student> {
        let student_id = student_id.trim();
        self.db
            .connection()
            .query_row(
                &format!("SELECT {COLUMNS} FROM students WHERE student_id = ?1"),
                [student_id],
                Student::from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("student", student_id))
    }

    /// Changes a student's course and year level.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input or [`Error::NotFound`].
    pub fn update(&mut self, student_id: &str, course: &str, year_level: u8) -> Result<()> {
        let student_id = student_id.trim();
        let course = required("course", course)?;
        let year_level = in_range("year_level", year_level, MIN_YEAR_LEVEL, MAX_YEAR_LEVEL)?;
        let changed = self.db.connection().execute(
            "UPDATE students SET course = ?1, year_level = ?2 WHERE student_id = ?3",
            params![course, year_level, student_id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("student", student_id));
        }
        Ok(())
    }

    /// Removes a student.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no student has this number.
    pub fn delete(&mut self, student_id: &str) -> Result<()> {
        let student_id = student_id.trim();
        let changed = self
            .db
            .connection()
            .execute("DELETE FROM students WHERE student_id = ?1", [student_id])?;
        if changed == 0 {
            return Err(Error::not_found("student", student_id));
        }
        log::debug!("deleted student {student_id}");
        Ok(())
    }

    /// Student count per course, ordered by course.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_by_course(&self) -> Result<Vec<CourseCount>> {
        collect_rows(
            self.db.connection(),
            "SELECT course, COUNT(*) FROM students GROUP BY course ORDER BY course",
            [],
            |row| {
                Ok(CourseCount {
                    course: row.get(0)?,
                    count: row.get(1)?,
                })
            },
        )
    }

    /// All students ordered by year level, then student number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_by_year_level(&self) -> Result<Vec<Student>> {
        self.query(&format!(
            "SELECT {COLUMNS} FROM students ORDER BY year_level, student_id"
        ))
    }

    fn query(&self, sql: &str) -> Result<Vec<Student>> {
        collect_rows(self.db.connection(), sql, [], Student::from_row)
    }
}
