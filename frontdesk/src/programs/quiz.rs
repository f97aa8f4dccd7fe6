//! Multiple-choice quiz with a file-backed question bank and result log.
//!
//! Questions are stored one per line as `id|text|a|b|c|d|X`; results are
//! appended as `id|name|score/total|YYYY-MM-DD`.

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::flatfile::{append_line, read_records, split_fields, text_field, write_lines};
use crate::validate::{parse_date, parse_number, DATE_FORMAT};

/// Question bank file name under the data directory.
pub const QUESTIONS_FILE_NAME: &str = "quiz_questions.txt";

/// Result log file name under the data directory.
pub const RESULTS_FILE_NAME: &str = "quiz_results.txt";

text_enum! {
    /// One of the four answer letters.
    pub enum Choice as "answer" {
        /// First choice.
        A => "A",
        /// Second choice.
        B => "B",
        /// Third choice.
        C => "C",
        /// Fourth choice.
        D => "D",
    }
}

impl Choice {
    /// Position in a question's choice list.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// Identifier, unique ignoring case.
    pub id: String,
    /// Question text.
    pub text: String,
    /// Choices A to D.
    pub choices: [String; 4],
    /// The right answer.
    pub correct: Choice,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text or text containing `|`.
    pub fn new(id: &str, text: &str, choices: [&str; 4], correct: Choice) -> Result<Self> {
        let [a, b, c, d] = choices;
        Ok(Self {
            id: text_field("id", id)?,
            text: text_field("text", text)?,
            choices: [
                text_field("choice A", a)?,
                text_field("choice B", b)?,
                text_field("choice C", c)?,
                text_field("choice D", d)?,
            ],
            correct,
        })
    }

    /// Text of `choice`.
    #[must_use]
    pub fn choice(&self, choice: Choice) -> &str {
        &self.choices[choice.index()]
    }

    fn to_line(&self) -> String {
        let [a, b, c, d] = &self.choices;
        format!("{}|{}|{a}|{b}|{c}|{d}|{}", self.id, self.text, self.correct)
    }

    fn from_line(line_no: usize, line: &str) -> Result<Self> {
        let f = split_fields(line_no, line, 7)?;
        Self::new(f[0], f[1], [f[2], f[3], f[4], f[5]], f[6].parse()?)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Question: {}", self.text)?;
        for choice in Choice::ALL {
            writeln!(f, "{choice}. {}", self.choice(*choice))?;
        }
        write!(f, "Correct: {}", self.correct)
    }
}

/// Changes to a question. Blank text and `None` keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionEdit {
    /// New question text.
    pub text: String,
    /// New choices A to D.
    pub choices: [String; 4],
    /// New right answer.
    pub correct: Option<Choice>,
}

fn keep_if_blank<'a>(new: &'a str, old: &'a str) -> &'a str {
    if new.trim().is_empty() {
        old
    } else {
        new
    }
}

/// The question bank, saved after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    path: PathBuf,
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Loads the bank at `path`; a missing file is an empty bank.
    ///
    /// Malformed lines and repeated ids are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be read.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut bank = Self {
            questions: Vec::new(),
            path,
        };
        for question in read_records(&bank.path, Question::from_line)? {
            if bank.position(&question.id).is_some() {
                log::warn!(
                    "{}: skipping repeated question id '{}'",
                    bank.path.display(),
                    question.id
                );
                continue;
            }
            bank.questions.push(question);
        }
        Ok(bank)
    }

    /// File backing this bank.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every question to the bank's file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        write_lines(&self.path, self.questions.iter().map(Question::to_line))
    }

    /// Adds a question and saves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when the id is taken in any case.
    pub fn add(&mut self, question: Question) -> Result<()> {
        if self.position(&question.id).is_some() {
            return Err(Error::duplicate("question", question.id));
        }
        self.questions.push(question);
        self.save()
    }

    /// Applies `edit` to a question and saves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, or a validation error
    /// for text containing `|`.
    pub fn edit(&mut self, id: &str, edit: &QuestionEdit) -> Result<&Question> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::not_found("question", id.trim()))?;
        let current = &self.questions[index];

        let [a, b, c, d] = &edit.choices;
        let [old_a, old_b, old_c, old_d] = &current.choices;
        let updated = Question::new(
            &current.id,
            keep_if_blank(&edit.text, &current.text),
            [
                keep_if_blank(a, old_a),
                keep_if_blank(b, old_b),
                keep_if_blank(c, old_c),
                keep_if_blank(d, old_d),
            ],
            edit.correct.unwrap_or(current.correct),
        )?;

        self.questions[index] = updated;
        self.save()?;
        Ok(&self.questions[index])
    }

    /// Removes a question and saves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn delete(&mut self, id: &str) -> Result<Question> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::not_found("question", id.trim()))?;
        let removed = self.questions.remove(index);
        self.save()?;
        Ok(removed)
    }

    /// Every question in file order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    fn position(&self, id: &str) -> Option<usize> {
        let id = id.trim();
        self.questions
            .iter()
            .position(|q| q.id.eq_ignore_ascii_case(id))
    }
}

/// One sitting of the quiz.
#[derive(Debug, Clone)]
pub struct Quiz {
    questions: Vec<Question>,
    answered: usize,
    score: u32,
}

impl Quiz {
    /// Starts a quiz over `questions`, shuffled with `rng` when asked.
    ///
    /// # Errors
    ///
    /// Returns a validation error when there are no questions.
    pub fn new<R: Rng + ?Sized>(
        questions: &[Question],
        shuffle: bool,
        rng: &mut R,
    ) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::validation("questions", "no questions available"));
        }
        let mut questions = questions.to_vec();
        if shuffle {
            questions.shuffle(rng);
        }
        Ok(Self {
            questions,
            answered: 0,
            score: 0,
        })
    }

    /// The question waiting for an answer, with its 1-based number.
    #[must_use]
    pub fn current(&self) -> Option<(usize, &Question)> {
        self.questions
            .get(self.answered)
            .map(|q| (self.answered + 1, q))
    }

    /// Answers the current question; returns whether it was right.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] once every question is answered.
    pub fn answer(&mut self, choice: Choice) -> Result<bool> {
        let question = self
            .questions
            .get(self.answered)
            .ok_or_else(|| Error::conflict("every question is already answered"))?;
        let correct = question.correct == choice;
        if correct {
            self.score += 1;
        }
        self.answered += 1;
        Ok(correct)
    }

    /// True once every question is answered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answered == self.questions.len()
    }

    /// Correct answers so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Number of questions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Closes the quiz and produces the student's result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] while questions remain, or a validation
    /// error for a blank id or name.
    pub fn finish(
        self,
        student_id: &str,
        student_name: &str,
        date: NaiveDate,
    ) -> Result<QuizResult> {
        if !self.is_complete() {
            return Err(Error::conflict(format!(
                "{} of {} questions unanswered",
                self.questions.len() - self.answered,
                self.questions.len()
            )));
        }
        let total = u32::try_from(self.questions.len()).map_err(|_| Error::LimitExceeded {
            details: "too many questions".to_string(),
        })?;
        QuizResult::new(student_id, student_name, self.score, total, date)
    }
}

/// A student's score on one sitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    /// Student number.
    pub student_id: String,
    /// Student name.
    pub student_name: String,
    /// Correct answers.
    pub score: u32,
    /// Questions asked, at least one.
    pub total: u32,
    /// Day taken.
    pub date: NaiveDate,
}

impl QuizResult {
    /// Builds a validated result.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text, a zero total, or a score
    /// above the total.
    pub fn new(
        student_id: &str,
        student_name: &str,
        score: u32,
        total: u32,
        date: NaiveDate,
    ) -> Result<Self> {
        if total == 0 || score > total {
            return Err(Error::validation(
                "score",
                format!("{score}/{total} is not a valid score"),
            ));
        }
        Ok(Self {
            student_id: text_field("student_id", student_id)?,
            student_name: text_field("student_name", student_name)?,
            score,
            total,
            date,
        })
    }

    /// Score as a percentage of the total.
    #[must_use]
    pub fn percent(&self) -> f64 {
        f64::from(self.score) * 100.0 / f64::from(self.total)
    }

    fn cmp_ratio(&self, other: &Self) -> Ordering {
        (u64::from(self.score) * u64::from(other.total))
            .cmp(&(u64::from(other.score) * u64::from(self.total)))
    }

    fn to_line(&self) -> String {
        format!(
            "{}|{}|{}/{}|{}",
            self.student_id,
            self.student_name,
            self.score,
            self.total,
            self.date.format(DATE_FORMAT)
        )
    }

    fn from_line(line_no: usize, line: &str) -> Result<Self> {
        let f = split_fields(line_no, line, 4)?;
        let (score, total) = f[2].split_once('/').ok_or_else(|| Error::MalformedRecord {
            line: line_no,
            reason: format!("score '{}' is not score/total", f[2]),
        })?;
        Self::new(
            f[0],
            f[1],
            parse_number("score", score)?,
            parse_number("total", total)?,
            parse_date("date", f[3])?,
        )
    }
}

impl fmt::Display for QuizResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {}/{} | {}",
            self.student_id, self.student_name, self.score, self.total, self.date
        )
    }
}

/// Append-only log of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    /// A log backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends one result.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn append(&self, result: &QuizResult) -> Result<()> {
        append_line(&self.path, &result.to_line())?;
        log::debug!(
            "recorded {}/{} for '{}'",
            result.score,
            result.total,
            result.student_id
        );
        Ok(())
    }

    /// Every readable result in file order.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be read.
    pub fn load(&self) -> Result<Vec<QuizResult>> {
        read_records(&self.path, QuizResult::from_line)
    }
}

/// Class statistics over a set of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    /// Results counted.
    pub count: usize,
    /// Mean of the per-result percentages.
    pub average_percent: f64,
    /// Best result; the earliest wins a tie.
    pub highest: QuizResult,
    /// Worst result; the earliest wins a tie.
    pub lowest: QuizResult,
}

impl ResultSummary {
    /// Summarises `results`, or `None` when there are none.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use frontdesk::programs::quiz::{QuizResult, ResultSummary};
    ///
    /// let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    /// let results = [
    ///     QuizResult::new("1", "Ana", 3, 4, day).unwrap(),
    ///     QuizResult::new("2", "Ben", 1, 4, day).unwrap(),
    /// ];
    /// let summary = ResultSummary::from_results(&results).unwrap();
    /// assert!((summary.average_percent - 50.0).abs() < 1e-9);
    /// assert_eq!(summary.highest.student_name, "Ana");
    /// ```
    #[must_use]
    pub fn from_results(results: &[QuizResult]) -> Option<Self> {
        let (first, rest) = results.split_first()?;
        let mut highest = first;
        let mut lowest = first;
        for result in rest {
            if result.cmp_ratio(highest) == Ordering::Greater {
                highest = result;
            }
            if result.cmp_ratio(lowest) == Ordering::Less {
                lowest = result;
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let average_percent =
            results.iter().map(QuizResult::percent).sum::<f64>() / results.len() as f64;
        Some(Self {
            count: results.len(),
            average_percent,
            highest: highest.clone(),
            lowest: lowest.clone(),
        })
    }
}
