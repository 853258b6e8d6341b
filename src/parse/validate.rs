// src/parse/validate.rs

use super::raw_segments;

/// Check whether `line` is a usable CSV line. `None` (nothing was read) is
/// never valid.
///
/// A comma may only appear between fields or inside a field that is fully
/// wrapped in double quotes, and a quoted field must escape its own quotes by
/// doubling them. A field that merely starts *or* ends with a quote is held to
/// the escaping rule as well, while a quote in the middle of an unquoted field
/// goes unchecked: this is a smoke test, not a grammar.
pub fn is_valid_line(line: Option<&str>) -> bool {
    match line {
        Some(line) => raw_segments(line).into_iter().all(is_valid_segment),
        None => false,
    }
}

fn is_valid_segment(raw: &str) -> bool {
    let field = raw.trim();
    if field.is_empty() {
        return true;
    }

    let opens = field.starts_with('"');
    let closes = field.ends_with('"');

    if field.contains(',') && !(opens && closes) {
        return false;
    }
    if opens || closes {
        // a lone quote has no inside to check
        if field == "\"" {
            return false;
        }
        let mut inner = field.chars();
        inner.next();
        inner.next_back();
        return !inner.as_str().replace("\"\"", "").contains('"');
    }
    true
}
