//! Quiz menus for instructors and students.
//!
//! Questions and results are kept in text files under the data directory.

use crate::console::{finish, stdio_console, ActionError, ActionResult, Console};
use crate::error::CliError;
use crate::utils::{resolve_data_dir, today, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use frontdesk::programs::quiz::{
    Choice, Question, QuestionBank, QuestionEdit, Quiz, ResultLog, ResultSummary,
    QUESTIONS_FILE_NAME, RESULTS_FILE_NAME,
};
use rand::Rng;
use std::io::{BufRead, Write};

/// Run the quiz system interactively.
#[derive(Args)]
pub struct QuizCommand {
    /// Keep the question order instead of shuffling
    #[arg(long)]
    pub no_shuffle: bool,
}

impl QuizCommand {
    /// Execute the quiz menu on stdin/stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;
        std::fs::create_dir_all(&data_dir)?;
        let mut bank = QuestionBank::load(data_dir.join(QUESTIONS_FILE_NAME))?;
        let results = ResultLog::new(data_dir.join(RESULTS_FILE_NAME));
        let session = Session {
            shuffle: !self.no_shuffle,
            today: today(),
        };
        finish(run(
            &mut stdio_console(),
            &mut bank,
            &results,
            &mut rand::thread_rng(),
            session,
        ))
    }
}

/// Settings for one run of the quiz menu.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    /// Shuffle questions for each student.
    pub shuffle: bool,
    /// Date stamped on results.
    pub today: NaiveDate,
}

/// Runs the top-level quiz menu until "Exit" or end of input.
pub fn run<R, W, G>(
    console: &mut Console<R, W>,
    bank: &mut QuestionBank,
    results: &ResultLog,
    rng: &mut G,
    session: Session,
) -> ActionResult
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    console.run_menu(
        "Quiz System",
        &["Instructor", "Student", "Exit"],
        |console, choice| match choice {
            1 => instructor_menu(console, bank, results),
            _ => take_quiz(console, bank, results, rng, session),
        },
    )
}

fn ask_choices<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    hint: &str,
) -> ActionResult<[String; 4]> {
    let mut choices: [String; 4] = Default::default();
    for (slot, letter) in choices.iter_mut().zip(Choice::ALL) {
        *slot = console.ask(&format!("Choice {letter}{hint}: "))?;
    }
    Ok(choices)
}

fn instructor_menu<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    bank: &mut QuestionBank,
    results: &ResultLog,
) -> ActionResult {
    console.run_menu(
        "Instructor Menu",
        &[
            "View Questions",
            "Add Question",
            "Edit Question",
            "Delete Question",
            "View Reports",
            "Back",
        ],
        |console, choice| {
            match choice {
                1 => {
                    let questions = bank.questions();
                    if questions.is_empty() {
                        console.say("No questions yet.")?;
                    }
                    for question in questions {
                        console.say(question)?;
                        console.say("")?;
                    }
                }
                2 => {
                    let id = console.ask("Question ID: ")?;
                    let text = console.ask("Question: ")?;
                    let choices = ask_choices(console, "")?;
                    let correct: Choice = console.ask_parsed("Correct answer (A-D): ")?;
                    let [a, b, c, d] = &choices;
                    let choices = [a.as_str(), b.as_str(), c.as_str(), d.as_str()];
                    bank.add(Question::new(&id, &text, choices, correct)?)?;
                    console.say("Question added.")?;
                }
                3 => {
                    let id = console.ask("Question ID: ")?;
                    let text = console.ask("New question (blank to keep): ")?;
                    let choices = ask_choices(console, " (blank to keep)")?;
                    let answer = console.ask("New correct answer (blank to keep): ")?;
                    let correct = if answer.is_empty() {
                        None
                    } else {
                        Some(answer.parse::<Choice>()?)
                    };
                    let edit = QuestionEdit {
                        text,
                        choices,
                        correct,
                    };
                    let updated = bank.edit(&id, &edit)?;
                    console.say(format!("Question updated.\n{updated}"))?;
                }
                4 => {
                    let id = console.ask("Question ID: ")?;
                    let removed = bank.delete(&id)?;
                    console.say(format!("Question {} deleted.", removed.id))?;
                }
                _ => show_reports(console, results)?,
            }
            Ok(())
        },
    )
}

fn show_reports<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    results: &ResultLog,
) -> ActionResult {
    let all = results.load()?;
    let Some(summary) = ResultSummary::from_results(&all) else {
        console.say("No results recorded.")?;
        return Ok(());
    };
    console.say(format!("Students: {}", summary.count))?;
    console.say(format!("Average: {:.2}%", summary.average_percent))?;
    console.say(format!("Highest: {}", summary.highest))?;
    console.say(format!("Lowest: {}", summary.lowest))?;
    console.say("--- All Results ---")?;
    console.show_all(&all, "")?;
    Ok(())
}

fn take_quiz<R, W, G>(
    console: &mut Console<R, W>,
    bank: &QuestionBank,
    results: &ResultLog,
    rng: &mut G,
    session: Session,
) -> ActionResult
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let mut quiz = Quiz::new(bank.questions(), session.shuffle, rng)?;
    let student_id = console.ask("Student ID: ")?;
    let student_name = console.ask("Student name: ")?;

    let total = quiz.total();
    while let Some((number, question)) = quiz.current() {
        console.say(format!("\nQuestion {number} of {total}: {}", question.text))?;
        for letter in Choice::ALL {
            console.say(format!("{letter}. {}", question.choice(*letter)))?;
        }
        let choice = loop {
            match console.ask_parsed::<Choice>("Your answer (A-D): ") {
                Ok(choice) => break choice,
                Err(ActionError::Library(_)) => console.say("Please answer A, B, C or D.")?,
                Err(other) => return Err(other),
            }
        };
        quiz.answer(choice)?;
    }

    let result = quiz.finish(&student_id, &student_name, session.today)?;
    results.append(&result)?;
    console.say(format!(
        "Quiz complete! {} scored {}/{} ({:.1}%).",
        result.student_name,
        result.score,
        result.total,
        result.percent()
    ))?;
    Ok(())
}
