// src/error.rs

use std::{io, path::PathBuf};
use thiserror::Error;

use crate::value::FieldKind;

/// Everything that can go wrong while opening a CSV source or reading values
/// out of it.
///
/// Read failures in the middle of an iteration are not in here: they end the
/// sequence and go to the handle's [`Diagnostics`](crate::Diagnostics) sink.
#[derive(Error, Debug)]
pub enum CsvError {
    /// Local file could not be opened
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Remote answered with anything other than 200
    #[error("bad response from server, code {0}")]
    BadStatus(u16),

    /// `next_row` was called without a row fetched by `has_more`
    #[error("no more lines to read")]
    Exhausted,

    #[error("field not found: {0}")]
    KeyNotFound(String),

    #[error("unsupported field kind: {0}")]
    UnsupportedKind(String),

    #[error("cannot parse {value:?} as {kind}")]
    InvalidNumber { value: String, kind: FieldKind },
}

/// Result type alias for CSV operations
pub type Result<T> = std::result::Result<T, CsvError>;
