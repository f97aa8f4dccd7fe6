//! Line-oriented console used by the interactive menus.
//!
//! The console is generic over its reader and writer so that menus can be
//! driven from scripted input in tests.

use crate::error::CliError;
use chrono::{NaiveDate, NaiveTime};
use frontdesk::validate::{parse_date, parse_number, parse_time};
use frontdesk::{Error as LibError, Money};
use std::fmt::Display;
use std::io::{self, BufRead, Stdout, StdinLock, Write};
use std::str::FromStr;

/// Why a menu action stopped early.
#[derive(Debug)]
pub enum ActionError {
    /// The library refused the action; the menu prints it and carries on.
    Library(LibError),
    /// Input ended; every menu unwinds.
    EndOfInput,
    /// The console itself failed.
    Io(io::Error),
}

impl From<LibError> for ActionError {
    fn from(e: LibError) -> Self {
        ActionError::Library(e)
    }
}

impl From<io::Error> for ActionError {
    fn from(e: io::Error) -> Self {
        ActionError::Io(e)
    }
}

/// Result of a single menu action.
pub type ActionResult<T = ()> = Result<T, ActionError>;

/// Console over the process's stdin and stdout.
pub type StdConsole = Console<StdinLock<'static>, Stdout>;

/// Builds a console on stdin and stdout.
///
/// Stdout stays unlocked so background timers can print between prompts.
pub fn stdio_console() -> StdConsole {
    Console::new(io::stdin().lock(), io::stdout())
}

/// Turns the outcome of a top-level menu into the command's result.
///
/// Running out of input is a normal way to leave a menu.
pub fn finish(result: ActionResult) -> Result<(), CliError> {
    match result {
        Ok(()) | Err(ActionError::EndOfInput) => Ok(()),
        Err(ActionError::Library(e)) => Err(e.into()),
        Err(ActionError::Io(e)) => Err(e.into()),
    }
}

/// Prompting reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Wraps a reader and a writer.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// The underlying writer.
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Writes one line.
    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Writes each item on its own line, or `empty` when there are none.
    pub fn show_all<T: Display>(&mut self, items: &[T], empty: &str) -> io::Result<()> {
        if items.is_empty() {
            return self.say(empty);
        }
        for item in items {
            self.say(item)?;
        }
        Ok(())
    }

    /// Reads one raw line without its line ending, or `None` at end of
    /// input. The bytes are not checked for UTF-8 here.
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Prints `prompt` and reads the trimmed answer.
    ///
    /// An answer that is not UTF-8 is a validation error, so only the
    /// current action is abandoned.
    pub fn ask(&mut self, prompt: &str) -> ActionResult<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let line = self.read_line()?.ok_or(ActionError::EndOfInput)?;
        let text = String::from_utf8(line)
            .map_err(|_| LibError::validation("input", "answer is not valid UTF-8 text"))?;
        Ok(text.trim().to_string())
    }

    /// Asks for a number.
    pub fn ask_number<T: FromStr>(&mut self, field: &str, prompt: &str) -> ActionResult<T> {
        let answer = self.ask(prompt)?;
        Ok(parse_number(field, &answer)?)
    }

    /// Asks for a `YYYY-MM-DD` date.
    pub fn ask_date(&mut self, field: &str, prompt: &str) -> ActionResult<NaiveDate> {
        let answer = self.ask(prompt)?;
        Ok(parse_date(field, &answer)?)
    }

    /// Asks for a date that may be left blank.
    pub fn ask_optional_date(
        &mut self,
        field: &str,
        prompt: &str,
    ) -> ActionResult<Option<NaiveDate>> {
        let answer = self.ask(prompt)?;
        if answer.is_empty() {
            return Ok(None);
        }
        Ok(Some(parse_date(field, &answer)?))
    }

    /// Asks for an `HH:MM` time.
    pub fn ask_time(&mut self, field: &str, prompt: &str) -> ActionResult<NaiveTime> {
        let answer = self.ask(prompt)?;
        Ok(parse_time(field, &answer)?)
    }

    /// Asks for an amount such as `12.50`.
    pub fn ask_money(&mut self, field: &str, prompt: &str) -> ActionResult<Money> {
        let answer = self.ask(prompt)?;
        Ok(Money::parse_field(field, &answer)?)
    }

    /// Asks for one of a fixed set of labels.
    pub fn ask_parsed<T>(&mut self, prompt: &str) -> ActionResult<T>
    where
        T: FromStr<Err = LibError>,
    {
        let answer = self.ask(prompt)?;
        Ok(answer.parse()?)
    }

    /// Asks a yes/no question; anything but `y` or `yes` is no.
    pub fn confirm(&mut self, prompt: &str) -> ActionResult<bool> {
        let answer = self.ask(prompt)?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    /// Shows a numbered menu until a valid option is picked.
    ///
    /// Returns the 1-based option, or `None` at end of input.
    pub fn choose(&mut self, title: &str, options: &[&str]) -> io::Result<Option<usize>> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "=== {title} ===")?;
            for (i, option) in options.iter().enumerate() {
                writeln!(self.output, "{}. {option}", i + 1)?;
            }
            write!(self.output, "Enter choice: ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match String::from_utf8_lossy(&line).trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n)),
                _ => writeln!(self.output, "Invalid choice. Try again.")?,
            }
        }
    }

    /// Runs a menu whose last option leaves it.
    ///
    /// `action` gets the picked option for every other entry. Library
    /// errors are printed as `Error: ...` and the menu is shown again.
    pub fn run_menu<F>(&mut self, title: &str, options: &[&str], mut action: F) -> ActionResult
    where
        F: FnMut(&mut Self, usize) -> ActionResult,
    {
        loop {
            let choice = self.choose(title, options)?.ok_or(ActionError::EndOfInput)?;
            if choice == options.len() {
                return Ok(());
            }
            match action(self, choice) {
                Ok(()) => {}
                Err(ActionError::Library(e)) => self.say(format!("Error: {e}"))?,
                Err(other) => return Err(other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn printed(console: &Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.output().clone()).unwrap()
    }

    #[test]
    fn test_ask_trims_answer() {
        let mut c = console("  Ana  \r\n");
        assert_eq!(c.ask("Name: ").unwrap(), "Ana");
        assert_eq!(printed(&c), "Name: ");
    }

    #[test]
    fn test_ask_at_end_of_input() {
        let mut c = console("");
        assert!(matches!(c.ask("Name: "), Err(ActionError::EndOfInput)));
    }

    #[test]
    fn test_ask_number_reports_field() {
        let mut c = console("abc\n");
        match c.ask_number::<u8>("year_level", "Year: ") {
            Err(ActionError::Library(LibError::Validation { field, .. })) => {
                assert_eq!(field, "year_level");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_optional_date_blank_is_none() {
        let mut c = console("\n2025-01-02\n");
        assert_eq!(c.ask_optional_date("d", "? ").unwrap(), None);
        assert_eq!(
            c.ask_optional_date("d", "? ").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 2)
        );
    }

    #[test]
    fn test_undecodable_answer_abandons_only_the_action() {
        let mut c = Console::new(Cursor::new(b"1\n\xff\n2\n".to_vec()), Vec::new());
        let mut asked = 0;
        let result = c.run_menu("Menu", &["Ask", "Exit"], |console, _| {
            asked += 1;
            console.ask("Name: ")?;
            Ok(())
        });
        assert!(result.is_ok());
        assert_eq!(asked, 1);
        assert!(printed(&c).contains("Error: validation error for 'input'"));
    }

    #[test]
    fn test_undecodable_choice_is_reprompted() {
        let mut c = Console::new(Cursor::new(b"\xfe\r\n2\r\n".to_vec()), Vec::new());
        assert_eq!(c.choose("Menu", &["One", "Exit"]).unwrap(), Some(2));
        assert!(printed(&c).contains("Invalid choice. Try again."));
    }

    #[test]
    fn test_choose_retries_invalid_input() {
        let mut c = console("9\nx\n2\n");
        assert_eq!(c.choose("Menu", &["One", "Exit"]).unwrap(), Some(2));
        assert_eq!(printed(&c).matches("Invalid choice. Try again.").count(), 2);
    }

    #[test]
    fn test_run_menu_prints_library_errors_and_continues() {
        let mut c = console("1\n1\n2\n");
        let mut calls = 0;
        c.run_menu("Menu", &["Fail", "Exit"], |_, _| {
            calls += 1;
            Err(LibError::not_found("trip", "T9").into())
        })
        .unwrap();
        assert_eq!(calls, 2);
        assert_eq!(printed(&c).matches("Error: trip 'T9' not found").count(), 2);
    }

    #[test]
    fn test_run_menu_unwinds_at_end_of_input() {
        let mut c = console("1\n");
        let result = c.run_menu("Menu", &["Ask", "Exit"], |c, _| {
            c.ask("Name: ")?;
            Ok(())
        });
        assert!(matches!(result, Err(ActionError::EndOfInput)));
        assert!(finish(result).is_ok());
    }
}
