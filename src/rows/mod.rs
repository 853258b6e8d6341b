// src/rows/mod.rs

//! Lazy row sequences over an open [`CsvFile`].
//!
//! Both sequences pull one line per step and stop for good at the first line
//! that is missing, unreadable or fails [`is_valid_line`]. A malformed line in
//! the middle of a file therefore hides every line after it.

pub mod mapped;
pub mod row;

pub use mapped::MappedRows;
pub use row::MappedRow;

use tracing::trace;

use crate::{
    error::{CsvError, Result},
    file::CsvFile,
    parse::{is_valid_line, split_line},
};

#[derive(Debug)]
enum State {
    /// No line fetched yet, or the last fetched line was handed out
    Pending,
    /// A validated line waiting for `next_row`
    Ready(String),
    /// Terminal; nothing more will be read
    Exhausted,
}

/// Forward-only sequence of split rows.
///
/// `has_more` does the reading, `next_row` only hands out what was read. The
/// sequence borrows its handle mutably, so only one can be live at a time.
pub struct Rows<'a> {
    file: &'a mut CsvFile,
    state: State,
    line_no: usize,
}

impl<'a> Rows<'a> {
    pub(crate) fn new(file: &'a mut CsvFile) -> Self {
        Self {
            file,
            state: State::Pending,
            line_no: 0,
        }
    }

    /// Read the next line and report whether it is a usable row.
    ///
    /// Each call reads one line, even if the previous row was never taken.
    /// Once this returns `false` it always will.
    pub fn has_more(&mut self) -> bool {
        if let State::Exhausted = self.state {
            return false;
        }

        let line = self.file.read_next_line();
        if !is_valid_line(line.as_deref()) {
            match &line {
                Some(bad) => trace!(line_no = self.line_no + 1, line = %bad, "invalid line, stopping"),
                None => trace!(rows = self.line_no, "end of input"),
            }
            self.state = State::Exhausted;
            return false;
        }

        self.line_no += 1;
        self.state = line.map_or(State::Exhausted, State::Ready);
        true
    }

    /// Take the row fetched by the last successful [`has_more`](Self::has_more).
    pub fn next_row(&mut self) -> Result<Vec<String>> {
        match std::mem::replace(&mut self.state, State::Pending) {
            State::Ready(line) => Ok(split_line(&line)),
            other => {
                self.state = other;
                Err(CsvError::Exhausted)
            }
        }
    }

    /// Whether the sequence has terminated.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }

    /// Number of valid lines read so far.
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl Iterator for Rows<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_more() {
            self.next_row().ok()
        } else {
            None
        }
    }
}
