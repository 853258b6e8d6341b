// src/parse/mod.rs

//! Single-line CSV handling: splitting a raw line into fields and
//! checking that a raw line is well-formed enough to be split.

pub mod split;
pub mod validate;

pub use split::split_line;
pub use validate::is_valid_line;

/// Break `line` on every comma that sits outside a quoted span, without
/// trimming or unescaping the pieces.
///
/// A comma is a delimiter when the remainder of the line after it holds an
/// even number of `"` characters. When at least one delimiter was found,
/// trailing empty pieces are discarded, so `"a,b,,"` gives `["a", "b"]` and
/// `","` gives nothing at all. A line without delimiters is returned whole.
pub(crate) fn raw_segments(line: &str) -> Vec<&str> {
    let mut quotes_left = line.bytes().filter(|&b| b == b'"').count();
    let mut segments = Vec::new();
    let mut start = 0;

    // `"` and `,` are single-byte, so every index we cut at is a char boundary.
    for (i, b) in line.bytes().enumerate() {
        match b {
            b'"' => quotes_left -= 1,
            b',' if quotes_left % 2 == 0 => {
                segments.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&line[start..]);

    if segments.len() > 1 {
        while segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_segments_respects_quotes() {
        assert_eq!(raw_segments(r#"a,"b,c",d"#), vec!["a", r#""b,c""#, "d"]);
        assert_eq!(raw_segments(r#"a,"b,c"#), vec![r#"a,"b"#, "c"]);
    }

    #[test]
    fn test_raw_segments_trailing_empties() {
        assert_eq!(raw_segments("a,b,,"), vec!["a", "b"]);
        assert_eq!(raw_segments(",a"), vec!["", "a"]);
        assert!(raw_segments(",").is_empty());
        assert_eq!(raw_segments(""), vec![""]);
        assert_eq!(raw_segments("a, ,"), vec!["a", " "]);
    }
}
