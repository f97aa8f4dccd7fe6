//! School personnel: teachers, students and administrative staff.

use std::fmt;

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::collect_rows;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::validate::{positive, required};

/// What a person does at the school, with the role's own detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role")]
pub enum Role {
    /// Teaches a subject.
    Teacher {
        /// Subject taught.
        subject: String,
    },
    /// Studies a course.
    Student {
        /// Course enrolled in.
        course: String,
        /// Year level, at least 1.
        year_level: u32,
    },
    /// Works in an office.
    AdminStaff {
        /// Department worked in.
        department: String,
    },
}

impl Role {
    /// A teacher of `subject`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank subject.
    pub fn teacher(subject: &str) -> Result<Self> {
        Ok(Self::Teacher {
            subject: required("subject", subject)?,
        })
    }

    /// A student of `course` in `year_level`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank course or a zero year level.
    pub fn student(course: &str, year_level: u32) -> Result<Self> {
        Ok(Self::Student {
            course: required("course", course)?,
            year_level: positive("year_level", year_level)?,
        })
    }

    /// Staff of `department`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank department.
    pub fn admin_staff(department: &str) -> Result<Self> {
        Ok(Self::AdminStaff {
            department: required("department", department)?,
        })
    }

    /// Stored role label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Teacher { .. } => "Teacher",
            Self::Student { .. } => "Student",
            Self::AdminStaff { .. } => "AdminStaff",
        }
    }

    /// The role's text detail: subject, course or department.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Teacher { subject } => subject,
            Self::Student { course, .. } => course,
            Self::AdminStaff { department } => department,
        }
    }

    const fn year_level(&self) -> Option<u32> {
        match self {
            Self::Student { year_level, .. } => Some(*year_level),
            _ => None,
        }
    }

    /// What this role does, as a past-tense phrase.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Teacher { .. } => "has graded a student",
            Self::Student { .. } => "has submitted an assignment",
            Self::AdminStaff { .. } => "has processed a document",
        }
    }
}

/// Ordinal form used for year levels: `1st`, `2nd`, `3rd`, otherwise `Nth`.
#[must_use]
pub fn ordinal(n: u32) -> String {
    match n {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        _ => format!("{n}th"),
    }
}

/// A member of the school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    /// Identifier, unique ignoring case.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Age in years, always positive.
    pub age: u32,
    /// Role and role detail.
    #[serde(flatten)]
    pub role: Role,
}

impl Person {
    /// Builds a validated person.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text or a zero age.
    pub fn new(id: &str, name: &str, age: u32, role: Role) -> Result<Self> {
        Ok(Self {
            id: required("id", id)?,
            name: required("name", name)?,
            age: positive("age", age)?,
            role,
        })
    }

    /// The line a person introduces themselves with.
    #[must_use]
    pub fn introduce(&self) -> String {
        self.to_string()
    }

    /// The role-specific action line, e.g. `"Ana has graded a student."`.
    #[must_use]
    pub fn role_action(&self) -> String {
        format!("{} {}.", self.name, self.role.action())
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let label: String = row.get(3)?;
        let detail: String = row.get(4)?;
        let role = match label.as_str() {
            "Teacher" => Role::Teacher { subject: detail },
            "Student" => Role::Student {
                course: detail,
                year_level: row.get::<_, Option<u32>>(5)?.unwrap_or(1),
            },
            _ => Role::AdminStaff { department: detail },
        };
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            role,
        })
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {} - I am {}, ", self.id, self.name)?;
        match &self.role {
            Role::Teacher { subject } => write!(f, "a Teacher of {subject}."),
            Role::Student { course, year_level } => {
                write!(f, "a {} year student of {course}.", ordinal(*year_level))
            }
            Role::AdminStaff { department } => {
                write!(f, "working in the {department} department.")
            }
        }
    }
}

const COLUMNS: &str = "person_id, name, age, role, detail, year_level";

/// Personnel operations over the shared database.
#[derive(Debug)]
pub struct PersonnelStore<'a> {
    db: &'a mut Database,
}

impl Database {
    /// School personnel records.
    pub fn personnel(&mut self) -> PersonnelStore<'_> {
        PersonnelStore { db: self }
    }
}

impl PersonnelStore<'_> {
    /// Adds a person.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when the id is taken in any case.
    pub fn add(&mut self, person: &Person) -> Result<()> {
        self.db
            .connection()
            .execute(
                &format!("INSERT INTO personnel ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                params![
                    person.id,
                    person.name,
                    person.age,
                    person.role.label(),
                    person.role.detail(),
                    person.role.year_level()
                ],
            )
            .map_err(|e| Error::on_unique_violation(e, "person", &person.id))?;
        Ok(())
    }

    /// Everyone, in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self) -> Result<Vec<Person>> {
        collect_rows(
            self.db.connection(),
            &format!("SELECT {COLUMNS} FROM personnel ORDER BY rowid"),
            [],
            Person::from_row,
        )
    }

    /// Looks up a person ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no one has this id.
    pub fn get(&self, id: &str) -> Result<Person> {
        let id = id.trim();
        self.db
            .connection()
            .query_row(
                &format!("SELECT {COLUMNS} FROM personnel WHERE person_id = ?1"),
                [id],
                Person::from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("person", id))
    }
}
