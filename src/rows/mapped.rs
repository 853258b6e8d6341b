// src/rows/mapped.rs

use tracing::trace;

use super::{MappedRow, Rows};
use crate::error::Result;

/// Sequence of rows keyed by a fixed header.
///
/// Rows shorter than the header simply lack the trailing keys; values past
/// the end of the header are dropped.
pub struct MappedRows<'a> {
    rows: Rows<'a>,
    header: Vec<String>,
}

impl<'a> MappedRows<'a> {
    pub(crate) fn new(rows: Rows<'a>, header: Vec<String>) -> Self {
        Self { rows, header }
    }

    /// Use the first line of `rows` as the header. If there is no usable first
    /// line, the sequence comes back already exhausted.
    pub(crate) fn from_first_line(mut rows: Rows<'a>) -> Self {
        let header = rows.next().unwrap_or_default();
        trace!(?header, exhausted = rows.is_exhausted(), "captured header");
        Self::new(rows, header)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// See [`Rows::has_more`].
    pub fn has_more(&mut self) -> bool {
        self.rows.has_more()
    }

    /// See [`Rows::next_row`].
    pub fn next_row(&mut self) -> Result<MappedRow> {
        let values = self.rows.next_row()?;
        Ok(MappedRow::zip(&self.header, values))
    }

    pub fn is_exhausted(&self) -> bool {
        self.rows.is_exhausted()
    }
}

impl Iterator for MappedRows<'_> {
    type Item = MappedRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_more() {
            self.next_row().ok()
        } else {
            None
        }
    }
}
