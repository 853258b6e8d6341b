// src/parse/split.rs

use super::raw_segments;

/// Split one CSV line into its field values.
///
/// Commas inside a double-quoted span are kept. Every field is trimmed, and a
/// field wrapped in quotes loses them, with `""` collapsed to `"` inside.
pub fn split_line(line: &str) -> Vec<String> {
    raw_segments(line).into_iter().map(unescape).collect()
}

/// Trim + strip outer quotes if present, then undo quote doubling.
fn unescape(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"")
    } else {
        trimmed.to_string()
    }
}
