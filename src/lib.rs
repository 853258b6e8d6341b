//! Line-oriented CSV reading from files, streams and HTTP resources.
//!
//! Rows come out lazily, either as field lists ([`Rows`]) or keyed by a
//! header ([`MappedRows`]), and stop at the first line that does not look
//! like CSV.

pub mod diagnostics;
pub mod error;
pub mod fetch;
pub mod file;
pub mod parse;
pub mod rows;
pub mod value;

pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{CsvError, Result};
pub use file::CsvFile;
pub use parse::{is_valid_line, split_line};
pub use rows::{MappedRow, MappedRows, Rows};
pub use value::{FieldKind, FromField, Value};
