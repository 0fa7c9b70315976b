//! Splits recipe text into statements.
//!
//! Recipes are line oriented: a line whose trimmed form starts with `//` is a
//! comment and vanishes, and a line whose trimmed form ends with `;` completes
//! the statement accumulated so far. Everything in between, blank lines
//! included, is carried over line by line.

use std::io::{BufRead, Lines};

use serde::Deserialize;
use tracing::debug;

use crate::error::{BakeryError, Result};

pub const COMMENT_MARKER: &str = "//";
pub const TERMINATOR: char = ';';

/// What happens to text left over after the last terminated statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// Leftover text is dropped.
    #[default]
    Lenient,
    /// Leftover text other than whitespace is an error.
    Strict,
}

/// Lazy, single pass sequence of complete statements read from `R`.
pub struct Statements<R> {
    lines: Lines<R>,
    buffer: String,
    termination: Termination,
    finished: bool,
}

impl<R: BufRead> Statements<R> {
    pub fn new(reader: R, termination: Termination) -> Self {
        Self {
            lines: reader.lines(),
            buffer: String::new(),
            termination,
            finished: false,
        }
    }

    fn flush(&mut self) -> String {
        let statement = self.buffer.trim_matches('\n').to_owned();
        self.buffer.clear();
        statement
    }

    fn leftover(&mut self) -> Option<Result<String>> {
        let text = self.flush();
        if text.trim().is_empty() {
            return None;
        }
        match self.termination {
            Termination::Strict => Some(Err(BakeryError::UnterminatedStatement { text })),
            Termination::Lenient => {
                debug!(%text, "discarding unterminated trailing text");
                None
            }
        }
    }
}

impl<R: BufRead> Iterator for Statements<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(BakeryError::Read(e)));
                }
                None => {
                    self.finished = true;
                    return self.leftover();
                }
            };
            let line = line.trim();
            if line.starts_with(COMMENT_MARKER) {
                continue;
            }
            match line.strip_suffix(TERMINATOR) {
                Some(last) => {
                    self.buffer.push_str(last);
                    self.buffer.push('\n');
                    return Some(Ok(self.flush()));
                }
                None => {
                    self.buffer.push_str(line);
                    self.buffer.push('\n');
                }
            }
        }
    }
}

/// Statements of an in-memory recipe text.
pub fn statements(text: &str, termination: Termination) -> Statements<&[u8]> {
    Statements::new(text.as_bytes(), termination)
}
