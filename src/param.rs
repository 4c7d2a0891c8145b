//! `name=value` parameters embedded in URI bodies.

use std::fmt;
use std::str::FromStr;

use crate::error::ParameterError;
use crate::escape::{QuoteStyle, decode_parameter_value, encode_parameter_value};
use crate::split::{ESCAPE, QUOTE, non_quoted_split, non_quoted_split_on_first};

/// A single `;`-delimited parameter from a URI body.
///
/// A bare token such as `base64` is a parameter with no value. Names are
/// compared case-insensitively by [`Parameter::is`]; the original spelling is
/// kept for serialization.
///
/// # Examples
///
/// ```
/// use typed_uri::Parameter;
///
/// let p = Parameter::parse(r#"note="a;b""#).unwrap();
/// assert_eq!(p.name(), "note");
/// assert_eq!(p.value(), Some("a;b"));
/// assert_eq!(p.to_string(), r#"note="a;b""#);
///
/// let bare = Parameter::parse("base64").unwrap();
/// assert_eq!(bare.value(), None);
/// assert_eq!(bare.to_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    name: String,
    value: Option<String>,
}

impl Parameter {
    /// Creates a parameter from a name and an optional, already decoded value.
    ///
    /// The name is written out verbatim, so `;`, `,`, `=`, whitespace and a
    /// `%` that does not start an escape may only appear inside quotes or
    /// after a `\`, as in names read by [`Parameter::parse`].
    ///
    /// # Errors
    ///
    /// Returns `ParameterError` if:
    /// - The trimmed name is empty
    /// - The name contains a control character, an unterminated quote, a
    ///   dangling escape, or an unprotected separator
    pub fn new(name: &str, value: Option<&str>) -> Result<Self, ParameterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ParameterError::Empty);
        }
        Self::check_name(name)?;
        Ok(Self {
            name: name.to_string(),
            value: value.map(str::to_string),
        })
    }

    /// Creates a parameter without a value.
    ///
    /// # Errors
    ///
    /// See [`Parameter::new`].
    pub fn bare(name: &str) -> Result<Self, ParameterError> {
        Self::new(name, None)
    }

    /// Parses a single parameter token (without the leading `;`).
    ///
    /// The token is split once on the first `=` that is not quoted or escaped;
    /// the value part is unquoted and unescaped.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError` if the token is empty or has an empty name.
    pub fn parse(token: &str) -> Result<Self, ParameterError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ParameterError::Empty);
        }

        let Some((name, raw_value)) = non_quoted_split_on_first(token, '=') else {
            return Ok(Self {
                name: token.to_string(),
                value: None,
            });
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(ParameterError::EmptyName {
                token: token.to_string(),
            });
        }

        let value = decode_parameter_value(raw_value.trim(), QuoteStyle::Backslash);
        Ok(Self {
            name: name.to_string(),
            value: Some(value.into_owned()),
        })
    }

    /// Parses a parameter token, returning `None` instead of an error.
    #[must_use]
    pub fn try_parse(token: &str) -> Option<Self> {
        Self::parse(token).ok()
    }

    /// Parses a `;`-separated parameter list, skipping empty segments.
    ///
    /// # Errors
    ///
    /// Returns the first `ParameterError` encountered.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, ParameterError> {
        non_quoted_split(input, &[';'], true)
            .into_iter()
            .map(Self::parse)
            .collect()
    }

    /// Returns the parameter name as written.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the decoded value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Replaces the value.
    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    /// Returns true if this parameter's name matches `name`, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns true if the parameter has no value.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.value.is_none()
    }

    /// Serializes the parameter prefixed with `;`, ready to append to a body.
    ///
    /// Like [`Display`](fmt::Display), yields an empty string for a bare
    /// parameter.
    #[must_use]
    pub fn to_segment(&self) -> String {
        if self.value.is_none() {
            return String::new();
        }
        format!(";{self}")
    }

    /// Appends `params` to `out` as `;name=value` segments.
    ///
    /// Unlike [`Parameter::to_segment`], bare parameters are written as
    /// `;name` so that unrecognized tokens survive a round trip.
    pub fn write_list(out: &mut String, params: &[Self]) {
        for p in params {
            if p.is_bare() {
                out.push(';');
                out.push_str(&p.name);
            } else {
                out.push_str(&p.to_segment());
            }
        }
    }

    /// Returns the first parameter in `params` named `name`.
    #[must_use]
    pub fn find<'a>(params: &'a [Self], name: &str) -> Option<&'a Self> {
        params.iter().find(|p| p.is(name))
    }

    fn check_name(name: &str) -> Result<(), ParameterError> {
        let invalid = |reason| ParameterError::InvalidName {
            name: name.to_string(),
            reason,
        };
        let bytes = name.as_bytes();
        let mut in_quotes = false;
        let mut escaped = false;

        for (i, c) in name.char_indices() {
            if c.is_control() {
                return Err(invalid("contains a control character"));
            }
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                ESCAPE => escaped = true,
                QUOTE => in_quotes = !in_quotes,
                _ if in_quotes => {}
                ';' | ',' | '=' => return Err(invalid("contains an unquoted separator")),
                c if c.is_whitespace() => return Err(invalid("contains unquoted whitespace")),
                '%' => {
                    let escape = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                        && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
                    if !escape {
                        return Err(invalid("contains a '%' that does not start an escape"));
                    }
                }
                _ => {}
            }
        }

        if escaped {
            return Err(invalid("ends with a dangling escape"));
        }
        if in_quotes {
            return Err(invalid("has an unterminated quote"));
        }
        Ok(())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(
                f,
                "{}={}",
                self.name,
                encode_parameter_value(v, QuoteStyle::Backslash)
            ),
            None => Ok(()),
        }
    }
}

impl FromStr for Parameter {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Parameter {
    type Error = ParameterError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Parameter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if self.is_bare() {
            serializer.serialize_str(&self.name)
        } else {
            serializer.collect_str(self)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Parameter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_value() {
        let p = Parameter::parse("phone-context=example.com").unwrap();
        assert_eq!(p.name(), "phone-context");
        assert_eq!(p.value(), Some("example.com"));
    }

    #[test]
    fn parse_trims_name_and_value() {
        let p = Parameter::parse("  ext = 22 ").unwrap();
        assert_eq!(p.name(), "ext");
        assert_eq!(p.value(), Some("22"));
    }

    #[test]
    fn parse_bare_token() {
        let p = Parameter::parse(" text/html ").unwrap();
        assert_eq!(p.name(), "text/html");
        assert!(p.is_bare());
    }

    #[test]
    fn parse_splits_on_first_equals_only() {
        let p = Parameter::parse("a=b=c").unwrap();
        assert_eq!(p.value(), Some("b=c"));
    }

    #[test]
    fn parse_ignores_quoted_equals_in_name_search() {
        let p = Parameter::parse(r#""x=y""#).unwrap();
        assert_eq!(p.name(), r#""x=y""#);
        assert!(p.is_bare());
    }

    #[test]
    fn parse_empty_value() {
        let p = Parameter::parse("flag=").unwrap();
        assert_eq!(p.value(), Some(""));
        assert_eq!(p.to_string(), "flag=");
    }

    #[test]
    fn parse_empty_fails() {
        assert_eq!(Parameter::parse("   "), Err(ParameterError::Empty));
        assert_eq!(Parameter::parse(""), Err(ParameterError::Empty));
    }

    #[test]
    fn parse_empty_name_fails() {
        assert!(matches!(
            Parameter::parse("=value"),
            Err(ParameterError::EmptyName { .. })
        ));
    }

    #[test]
    fn try_parse_never_fails() {
        assert_eq!(Parameter::try_parse(""), None);
        assert!(Parameter::try_parse("a=b").is_some());
    }

    #[test]
    fn is_ignores_case() {
        let p = Parameter::parse("Phone-Context=x").unwrap();
        assert!(p.is("phone-context"));
        assert!(!p.is("ext"));
        assert_eq!(p.name(), "Phone-Context");
    }

    #[test]
    fn display_quotes_reserved_values() {
        let p = Parameter::new("note", Some("a,b")).unwrap();
        assert_eq!(p.to_string(), r#"note="a,b""#);
        assert_eq!(p.to_segment(), r#";note="a,b""#);
    }

    #[test]
    fn new_rejects_names_that_change_meaning() {
        for name in ["a;ext", "a b", "a=b", "a,b", "100%", "a\"b", "a\\", "a\u{7}"] {
            assert!(
                matches!(
                    Parameter::new(name, Some("9")),
                    Err(ParameterError::InvalidName { .. })
                ),
                "accepted {name:?}"
            );
            assert!(Parameter::bare(name).is_err(), "accepted bare {name:?}");
        }
    }

    #[test]
    fn new_accepts_names_parse_produces() {
        for token in [r#""x=y""#, r"a\;b", r#"n"a b""#, "%2Bx", "text/html"] {
            let parsed = Parameter::parse(token).unwrap();
            assert_eq!(Parameter::bare(parsed.name()).unwrap(), parsed);
        }
    }

    #[test]
    fn accepted_name_is_read_back_unchanged() {
        let param = Parameter::new(r"a\;ext", Some("9")).unwrap();
        let mut out = String::new();
        Parameter::write_list(&mut out, std::slice::from_ref(&param));
        assert_eq!(Parameter::parse_list(&out).unwrap(), vec![param]);
    }

    #[test]
    fn bare_serializes_empty_but_list_keeps_it() {
        let bare = Parameter::bare("flag").unwrap();
        assert_eq!(bare.to_string(), "");
        assert_eq!(bare.to_segment(), "");

        let mut out = String::new();
        Parameter::write_list(&mut out, &[bare, Parameter::new("a", Some("1")).unwrap()]);
        assert_eq!(out, ";flag;a=1");
    }

    #[test]
    fn parse_list_skips_empty_segments() {
        let list = Parameter::parse_list(r#"a=1;;b="x;y";c"#).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[1].value(), Some("x;y"));
        assert!(list[2].is_bare());
    }

    #[test]
    fn find_is_case_insensitive() {
        let list = Parameter::parse_list("A=1;b=2").unwrap();
        assert_eq!(Parameter::find(&list, "a").and_then(Parameter::value), Some("1"));
        assert!(Parameter::find(&list, "c").is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let list = Parameter::parse_list(r#"note="a;b";flag"#).unwrap();
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"["note=\"a;b\"","flag"]"#);
        let back: Vec<Parameter> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn set_value_replaces() {
        let mut p = Parameter::bare("x").unwrap();
        p.set_value(Some("y".to_string()));
        assert_eq!(p.to_string(), "x=y");
    }
}
