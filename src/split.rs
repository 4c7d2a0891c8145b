//! Quote- and escape-aware string splitting.
//!
//! Parameter values may be wrapped in double quotes or carry backslash
//! escapes, so a plain `str::split` on `;` or `,` would cut them apart. The
//! helpers in this module skip any separator that is inside a `"…"` pair or
//! that directly follows a `\`.

/// The quote delimiter recognized by the splitting helpers.
pub const QUOTE: char = '"';

/// The escape character recognized by the splitting helpers.
pub const ESCAPE: char = '\\';

/// Iterates `(byte_index, char)` pairs that sit outside quotes and escapes.
fn unquoted_chars(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut in_quotes = false;
    let mut escaped = false;
    text.char_indices().filter(move |&(_, c)| {
        if escaped {
            escaped = false;
            return false;
        }
        match c {
            ESCAPE => {
                escaped = true;
                false
            }
            QUOTE => {
                in_quotes = !in_quotes;
                false
            }
            _ => !in_quotes,
        }
    })
}

/// Returns the byte index of the first un-quoted `ch` at or after `start`.
///
/// Quote state is tracked from the beginning of `text`, so `start` may point
/// into the middle of a quoted run without confusing the scan.
///
/// # Examples
///
/// ```
/// use typed_uri::split::non_quoted_index_of;
///
/// assert_eq!(non_quoted_index_of(r#"a="x;y";b"#, ';', 0), Some(7));
/// assert_eq!(non_quoted_index_of(r"a\;b", ';', 0), None);
/// ```
#[must_use]
pub fn non_quoted_index_of(text: &str, ch: char, start: usize) -> Option<usize> {
    unquoted_chars(text)
        .find(|&(i, c)| i >= start && c == ch)
        .map(|(i, _)| i)
}

/// Splits `text` on any of `separators` that is not quoted or escaped.
///
/// With `remove_empty`, segments that are empty after trimming are dropped.
/// Segments are returned untrimmed otherwise.
#[must_use]
pub fn non_quoted_split<'a>(
    text: &'a str,
    separators: &[char],
    remove_empty: bool,
) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut begin = 0;
    for (i, c) in unquoted_chars(text) {
        if separators.contains(&c) {
            parts.push(&text[begin..i]);
            begin = i + c.len_utf8();
        }
    }
    parts.push(&text[begin..]);

    if remove_empty {
        parts.retain(|p| !p.trim().is_empty());
    }
    parts
}

/// Splits `text` once, on the first un-quoted `separator`.
///
/// Returns `None` when no such separator exists.
#[must_use]
pub fn non_quoted_split_on_first(text: &str, separator: char) -> Option<(&str, &str)> {
    let idx = non_quoted_index_of(text, separator, 0)?;
    Some((&text[..idx], &text[idx + separator.len_utf8()..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_of_skips_quoted_separator() {
        assert_eq!(non_quoted_index_of(r#""a;b";c"#, ';', 0), Some(5));
    }

    #[test]
    fn index_of_respects_start() {
        assert_eq!(non_quoted_index_of("a;b;c", ';', 2), Some(3));
        assert_eq!(non_quoted_index_of("a;b;c", ';', 4), None);
    }

    #[test]
    fn index_of_skips_escaped_separator() {
        assert_eq!(non_quoted_index_of(r"a\;b;c", ';', 0), Some(4));
    }

    #[test]
    fn escaped_quote_does_not_open_quotes() {
        assert_eq!(non_quoted_index_of(r#"a\"b;c"#, ';', 0), Some(4));
    }

    #[test]
    fn split_keeps_quoted_runs_together() {
        let parts = non_quoted_split(r#"x=1;y="a;b";z"#, &[';'], false);
        assert_eq!(parts, vec!["x=1", r#"y="a;b""#, "z"]);
    }

    #[test]
    fn split_on_several_separators() {
        let parts = non_quoted_split("a,b;c", &[',', ';'], false);
        assert_eq!(parts, vec!["a", "b", "c"]);
    }

    #[test]
    fn split_remove_empty() {
        assert_eq!(non_quoted_split(";a;; ;b;", &[';'], true), vec!["a", "b"]);
        assert_eq!(non_quoted_split(";a", &[';'], false), vec!["", "a"]);
    }

    #[test]
    fn split_without_separator_yields_whole_text() {
        assert_eq!(non_quoted_split("abc", &[';'], false), vec!["abc"]);
    }

    #[test]
    fn split_on_first() {
        assert_eq!(non_quoted_split_on_first("a,b,c", ','), Some(("a", "b,c")));
        assert_eq!(non_quoted_split_on_first(r#""a,b""#, ','), None);
    }

    #[test]
    fn split_handles_multibyte_text() {
        let parts = non_quoted_split("é;ü", &[';'], false);
        assert_eq!(parts, vec!["é", "ü"]);
    }
}
