//! IETF-style escaping of parameter values.
//!
//! Values that contain a reserved character (`;`, `,`, `"`, `\`, whitespace,
//! a control character, or a `%` that does not start an escape) are written
//! inside double quotes with backslash escapes. Plain values are written
//! verbatim, so ordinary URIs serialize exactly as they were read.

use std::borrow::Cow;
use std::fmt::Write;

use crate::split::{ESCAPE, QUOTE};

/// How a literal quote character is represented inside a quoted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// `"` is written as `\"`.
    #[default]
    Backslash,
    /// `"` is written as `&quot;` (and `&` as `&amp;`).
    HtmlEntity,
}

fn is_reserved(c: char, style: QuoteStyle) -> bool {
    matches!(c, ';' | ',' | QUOTE | ESCAPE)
        || c.is_control()
        || c.is_whitespace()
        || (style == QuoteStyle::HtmlEntity && c == '&')
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if c.is_control() => {
            // Cc characters all fit in one byte.
            let _ = write!(out, "\\x{:02X}", u32::from(c));
        }
        c => {
            out.push(ESCAPE);
            out.push(c);
        }
    }
}

/// Escapes `value` with backslashes, optionally wrapping it in quotes.
///
/// `\`, `"` and control characters are always escaped. Without enclosing
/// quotes `;` and `,` are escaped as well, since nothing else protects them.
///
/// # Examples
///
/// ```
/// use typed_uri::escape::encode_value;
///
/// assert_eq!(encode_value("a;b", false), r"a\;b");
/// assert_eq!(encode_value("a;b", true), r#""a;b""#);
/// assert_eq!(encode_value("line\nbreak", true), r#""line\nbreak""#);
/// ```
#[must_use]
pub fn encode_value(value: &str, enclose: bool) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    if enclose {
        out.push(QUOTE);
    }
    for c in value.chars() {
        match c {
            QUOTE | ESCAPE => push_escaped(&mut out, c),
            ';' | ',' if !enclose => push_escaped(&mut out, c),
            c if c.is_control() => push_escaped(&mut out, c),
            c => out.push(c),
        }
    }
    if enclose {
        out.push(QUOTE);
    }
    out
}

/// Returns true if `value` is wrapped in a pair of unescaped quotes.
fn is_enclosed(value: &str) -> bool {
    if value.len() < 2 || !value.starts_with(QUOTE) || !value.ends_with(QUOTE) {
        return false;
    }
    let inner = &value[1..value.len() - 1];
    let trailing_escapes = inner.chars().rev().take_while(|&c| c == ESCAPE).count();
    trailing_escapes % 2 == 0
}

/// Reverses [`encode_value`]: strips enclosing quotes and resolves escapes.
///
/// Unknown escapes resolve to the escaped character itself; a dangling
/// trailing backslash is kept literally.
#[must_use]
pub fn decode_value(value: &str) -> String {
    let inner = if is_enclosed(value) {
        &value[1..value.len() - 1]
    } else {
        value
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('x') => {
                let hex: String = chars.clone().take(2).collect();
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if hex.len() == 2 => {
                        out.push(char::from(byte));
                        chars.nth(1);
                    }
                    _ => out.push('x'),
                }
            }
            Some(other) => out.push(other),
            None => out.push(ESCAPE),
        }
    }
    out
}

/// Returns true if some `%` in `value` is not followed by two hex digits.
#[must_use]
pub fn has_stray_percent(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

/// Returns true if `value` has to be quoted to survive inside a parameter list.
#[must_use]
pub fn needs_quoting(value: &str, style: QuoteStyle) -> bool {
    value.chars().any(|c| is_reserved(c, style)) || has_stray_percent(value)
}

/// Returns true if `value` can appear unquoted as a bare token or URI field.
pub(crate) fn is_token_safe(value: &str) -> bool {
    !value.is_empty() && !value.contains('=') && !needs_quoting(value, QuoteStyle::Backslash)
}

/// Encodes a parameter value, quoting it only when required.
///
/// # Examples
///
/// ```
/// use typed_uri::escape::{encode_parameter_value, QuoteStyle};
///
/// assert_eq!(encode_parameter_value("example.com", QuoteStyle::Backslash), "example.com");
/// assert_eq!(encode_parameter_value("a,b", QuoteStyle::Backslash), r#""a,b""#);
/// assert_eq!(
///     encode_parameter_value(r#"say "hi""#, QuoteStyle::HtmlEntity),
///     r#""say &quot;hi&quot;""#
/// );
/// ```
#[must_use]
pub fn encode_parameter_value(value: &str, style: QuoteStyle) -> Cow<'_, str> {
    if !needs_quoting(value, style) {
        return Cow::Borrowed(value);
    }
    match style {
        QuoteStyle::Backslash => Cow::Owned(encode_value(value, true)),
        QuoteStyle::HtmlEntity => {
            let entities = value.replace('&', "&amp;").replace(QUOTE, "&quot;");
            Cow::Owned(encode_value(&entities, true))
        }
    }
}

/// Decodes a parameter value written by [`encode_parameter_value`].
#[must_use]
pub fn decode_parameter_value(value: &str, style: QuoteStyle) -> Cow<'_, str> {
    let quoted = is_enclosed(value);
    if !quoted && !value.contains(ESCAPE) {
        return Cow::Borrowed(value);
    }
    let decoded = decode_value(value);
    match style {
        QuoteStyle::HtmlEntity if quoted => {
            Cow::Owned(decoded.replace("&quot;", "\"").replace("&amp;", "&"))
        }
        _ => Cow::Owned(decoded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_value_is_borrowed() {
        assert!(matches!(
            encode_parameter_value("example.com", QuoteStyle::Backslash),
            Cow::Borrowed("example.com")
        ));
        assert!(matches!(
            decode_parameter_value("example.com", QuoteStyle::Backslash),
            Cow::Borrowed("example.com")
        ));
    }

    #[test]
    fn reserved_characters_force_quotes() {
        assert_eq!(encode_parameter_value("a;b", QuoteStyle::Backslash), r#""a;b""#);
        assert_eq!(encode_parameter_value(r"a\b", QuoteStyle::Backslash), r#""a\\b""#);
        assert_eq!(encode_parameter_value(" padded", QuoteStyle::Backslash), r#"" padded""#);
        assert_eq!(encode_parameter_value("a b", QuoteStyle::Backslash), r#""a b""#);
        assert_eq!(encode_parameter_value("100%", QuoteStyle::Backslash), r#""100%""#);
        assert_eq!(encode_parameter_value("%2B1", QuoteStyle::Backslash), "%2B1");
    }

    #[test]
    fn token_safety() {
        assert!(is_token_safe("text/html"));
        assert!(is_token_safe("+1-202-555-0123"));
        assert!(!is_token_safe(""));
        assert!(!is_token_safe("a=b"));
        assert!(!is_token_safe("a;b"));
    }

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(encode_value("a\u{1}b", false), r"a\x01b");
        assert_eq!(decode_value(r"a\x01b"), "a\u{1}b");
        assert_eq!(decode_value(r"\tx"), "\tx");
    }

    #[test]
    fn decode_strips_quotes_and_escapes() {
        assert_eq!(decode_value(r#""a;b""#), "a;b");
        assert_eq!(decode_value(r#""say \"hi\"""#), r#"say "hi""#);
        assert_eq!(decode_value(r"a\;b"), "a;b");
    }

    #[test]
    fn decode_keeps_escaped_closing_quote() {
        // The final quote is escaped, so the value is not enclosed.
        assert_eq!(decode_value(r#""abc\""#), r#""abc""#);
    }

    #[test]
    fn decode_tolerates_bad_hex_and_dangling_escape() {
        assert_eq!(decode_value(r"\xZZ"), "xZZ");
        assert_eq!(decode_value("end\\"), "end\\");
    }

    #[test]
    fn html_entity_style_round_trips() {
        let raw = r#"a "b" & c;d"#;
        let encoded = encode_parameter_value(raw, QuoteStyle::HtmlEntity);
        assert_eq!(encoded, r#""a &quot;b&quot; &amp; c;d""#);
        assert_eq!(decode_parameter_value(&encoded, QuoteStyle::HtmlEntity), raw);
    }

    #[test]
    fn backslash_style_round_trips() {
        let raw = "multi\nline, \"quoted\"; \\ done";
        let encoded = encode_parameter_value(raw, QuoteStyle::Backslash);
        assert_eq!(decode_parameter_value(&encoded, QuoteStyle::Backslash), raw);
    }
}
