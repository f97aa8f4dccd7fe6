//! Pipe-delimited text files.
//!
//! One record per line, fields separated by `|`. Readers hand each line to
//! a parser and skip the ones it rejects as malformed, logging a warning.
//! Writers replace the file through a temporary sibling and a rename.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::validate::required;

/// Field separator.
pub const DELIMITER: char = '|';

/// Validates a text field that will be written to a flat file.
///
/// # Errors
///
/// Returns a validation error for blank input or input containing the
/// delimiter or a line break.
pub fn text_field(field: &str, value: &str) -> Result<String> {
    let value = required(field, value)?;
    if value.contains(DELIMITER) || value.contains('\n') || value.contains('\r') {
        return Err(Error::validation(
            field,
            format!("must not contain '{DELIMITER}' or line breaks"),
        ));
    }
    Ok(value)
}

/// Splits a line into exactly `expected` fields.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] when the count differs.
pub fn split_fields(line_no: usize, line: &str, expected: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if fields.len() != expected {
        return Err(Error::MalformedRecord {
            line: line_no,
            reason: format!("expected {expected} fields, found {}", fields.len()),
        });
    }
    Ok(fields)
}

/// Reads every non-blank line through `parse`.
///
/// Lines rejected with [`Error::MalformedRecord`] or [`Error::Validation`]
/// are skipped with a warning; other errors abort the read. A missing file
/// reads as empty.
///
/// # Errors
///
/// Returns an I/O error if the file exists but cannot be read.
pub fn read_records<T, F>(path: &Path, mut parse: F) -> Result<Vec<T>>
where
    F: FnMut(usize, &str) -> Result<T>,
{
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse(index + 1, line) {
            Ok(record) => records.push(record),
            Err(e @ (Error::MalformedRecord { .. } | Error::Validation { .. })) => {
                log::warn!("{}: skipping line {}: {e}", path.display(), index + 1);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(records)
}

/// Replaces the file with `lines`.
///
/// # Errors
///
/// Returns an I/O error if the directory or file cannot be written.
pub fn write_lines<I>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = String>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        for line in lines {
            writeln!(file, "{line}")?;
        }
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Appends one line, creating the file when missing.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or written.
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}
