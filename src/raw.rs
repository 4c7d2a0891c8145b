//! Minimal generic URI split: scheme and body.
//!
//! This is only the syntactic pre-check every typed wrapper runs before
//! handing the body to a scheme parser. It does not normalize or resolve.

use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, ParseErrorKind};
use crate::split::QUOTE;

/// A URI split into a lower-cased scheme and its body.
///
/// # Examples
///
/// ```
/// use typed_uri::RawUri;
///
/// let raw = RawUri::parse("GEO:45.5,-122.6").unwrap();
/// assert_eq!(raw.scheme(), "geo");
/// assert_eq!(raw.body(), "45.5,-122.6");
/// assert_eq!(raw.to_string(), "geo:45.5,-122.6");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawUri {
    scheme: String,
    body: String,
}

impl RawUri {
    /// Parses `input` as `scheme:body`.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The input is empty
    /// - There is no scheme, or the scheme contains invalid characters
    /// - The body is empty
    /// - The body contains control characters, whitespace outside quotes, or
    ///   an invalid percent escape
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_inner(input).map_err(|kind| ParseError::new(input, kind))
    }

    /// Returns true if `input` would be accepted by [`RawUri::parse`].
    #[must_use]
    pub fn is_well_formed(input: &str) -> bool {
        Self::parse_inner(input).is_ok()
    }

    /// Returns the lower-cased scheme, without the `:`.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns everything after the first `:`.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    fn parse_inner(input: &str) -> Result<Self, ParseErrorKind> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseErrorKind::Empty);
        }

        let colon = input
            .find(':')
            .ok_or_else(|| ParseErrorKind::format("missing ':' after scheme"))?;
        let (scheme, body) = (&input[..colon], &input[colon + 1..]);

        Self::validate_scheme(scheme)?;
        Self::validate_body(body)?;

        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            body: body.to_string(),
        })
    }

    fn validate_scheme(scheme: &str) -> Result<(), ParseErrorKind> {
        let mut chars = scheme.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => {}
            Some(_) => return Err(ParseErrorKind::format("scheme must start with a letter")),
            None => return Err(ParseErrorKind::format("scheme is empty")),
        }
        if chars.any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))) {
            return Err(ParseErrorKind::format(
                "scheme may only contain letters, digits, '+', '-' and '.'",
            ));
        }
        Ok(())
    }

    fn validate_body(body: &str) -> Result<(), ParseErrorKind> {
        if body.is_empty() {
            return Err(ParseErrorKind::format("body is empty"));
        }

        let bytes = body.as_bytes();
        let mut in_quotes = false;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'"' => in_quotes = !in_quotes,
                b'\\' => i += 1,
                b'%' if !in_quotes => {
                    let valid = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                        && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
                    if !valid {
                        return Err(ParseErrorKind::format(format!(
                            "invalid percent escape at position {i}"
                        )));
                    }
                    i += 2;
                }
                b if b.is_ascii_control() => {
                    return Err(ParseErrorKind::format(format!(
                        "control character at position {i}"
                    )));
                }
                b' ' if !in_quotes => {
                    return Err(ParseErrorKind::format(format!(
                        "unquoted space at position {i}"
                    )));
                }
                _ => {}
            }
            i += 1;
        }

        if in_quotes {
            return Err(ParseErrorKind::format(format!("unterminated {QUOTE} in body")));
        }
        Ok(())
    }
}

impl fmt::Display for RawUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.body)
    }
}

impl FromStr for RawUri {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for RawUri {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lowercases_scheme_only() {
        let raw = RawUri::parse("TEL:+1-202-555;EXT=9").unwrap();
        assert_eq!(raw.scheme(), "tel");
        assert_eq!(raw.body(), "+1-202-555;EXT=9");
    }

    #[test]
    fn parse_trims_input() {
        let raw = RawUri::parse("  data:,hi \n").unwrap();
        assert_eq!(raw.body(), ",hi");
    }

    #[test]
    fn parse_empty_returns_error() {
        assert!(matches!(
            RawUri::parse("   "),
            Err(ParseError {
                kind: ParseErrorKind::Empty,
                ..
            })
        ));
    }

    #[test]
    fn parse_missing_colon_fails() {
        assert!(!RawUri::is_well_formed("geo45,3"));
    }

    #[test]
    fn parse_invalid_scheme_fails() {
        assert!(!RawUri::is_well_formed(":abc"));
        assert!(!RawUri::is_well_formed("1tel:123"));
        assert!(!RawUri::is_well_formed("te l:123"));
        assert!(RawUri::is_well_formed("x-my.scheme+1:ok"));
    }

    #[test]
    fn parse_empty_body_fails() {
        assert!(!RawUri::is_well_formed("tel:"));
    }

    #[test]
    fn percent_escapes_must_be_complete() {
        assert!(RawUri::is_well_formed("data:,Hello%20World"));
        assert!(!RawUri::is_well_formed("data:,100%"));
        assert!(!RawUri::is_well_formed("data:,%G1"));
    }

    #[test]
    fn percent_inside_quotes_is_literal() {
        assert!(RawUri::is_well_formed(r#"tel:+1;x="100%""#));
    }

    #[test]
    fn spaces_only_inside_quotes() {
        assert!(!RawUri::is_well_formed("tel:+1;x=a b"));
        assert!(RawUri::is_well_formed(r#"tel:+1;x="a b""#));
        assert!(!RawUri::is_well_formed(r#"tel:+1;x="a b"#));
    }

    #[test]
    fn escaped_quote_does_not_toggle() {
        assert!(RawUri::is_well_formed(r#"tel:+1;x="a\" b""#));
    }

    #[test]
    fn control_characters_rejected() {
        assert!(!RawUri::is_well_formed("tel:+1\u{7}"));
    }
}
