// src/value.rs

use serde::Serialize;
use std::{fmt, str::FromStr};

use crate::error::{CsvError, Result};

/// The kinds a field can be read as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Integer,
    Double,
    Boolean,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Double => "double",
            FieldKind::Boolean => "boolean",
        }
    }

    /// Coerce already-trimmed text into a value of this kind.
    pub fn coerce(self, text: &str) -> Result<Value> {
        let invalid = || CsvError::InvalidNumber {
            value: text.to_string(),
            kind: self,
        };
        Ok(match self {
            FieldKind::String => Value::String(text.to_string()),
            FieldKind::Integer => Value::Integer(text.parse().map_err(|_| invalid())?),
            FieldKind::Double => Value::Double(text.parse().map_err(|_| invalid())?),
            FieldKind::Boolean => Value::Boolean(text.eq_ignore_ascii_case("true")),
        })
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind names as given on the command line (`--types qty:int`).
/// Anything outside the four supported kinds is rejected here.
impl FromStr for FieldKind {
    type Err = CsvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "string" | "str" => Ok(FieldKind::String),
            "integer" | "int" => Ok(FieldKind::Integer),
            "double" | "float" => Ok(FieldKind::Double),
            "boolean" | "bool" => Ok(FieldKind::Boolean),
            _ => Err(CsvError::UnsupportedKind(s.to_string())),
        }
    }
}

/// A field value coerced to one of the supported kinds.
///
/// Serializes as the bare value (`42`, `true`, `"text"`).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i32),
    Double(f64),
    Boolean(bool),
}

impl Value {
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::String(_) => FieldKind::String,
            Value::Integer(_) => FieldKind::Integer,
            Value::Double(_) => FieldKind::Double,
            Value::Boolean(_) => FieldKind::Boolean,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Double(d) => write!(f, "{}", d),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Rust types that a field can be extracted into directly.
pub trait FromField: Sized {
    const KIND: FieldKind;

    fn from_value(value: Value) -> Option<Self>;
}

impl FromField for String {
    const KIND: FieldKind = FieldKind::String;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromField for i32 {
    const KIND: FieldKind = FieldKind::Integer;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(n),
            _ => None,
        }
    }
}

impl FromField for f64 {
    const KIND: FieldKind = FieldKind::Double;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Double(d) => Some(d),
            _ => None,
        }
    }
}

impl FromField for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }
}
