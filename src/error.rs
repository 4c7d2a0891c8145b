//! Error types for typed URI parsing.

use thiserror::Error;

/// Errors that can occur when parsing a typed URI or one of its bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse URI '{input}': {kind}")]
pub struct ParseError {
    /// The input that failed to parse
    pub input: String,
    /// The specific error that occurred
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(input: &str, kind: ParseErrorKind) -> Self {
        Self {
            input: input.to_string(),
            kind,
        }
    }
}

/// Specific parsing error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Input is empty
    #[error("input is empty")]
    Empty,
    /// The URI does not carry the scheme the wrapper expects
    #[error("{}", scheme_mismatch_message(expected, found.as_deref()))]
    SchemeMismatch {
        /// The scheme the wrapper accepts
        expected: &'static str,
        /// The scheme that was found, if any
        found: Option<String>,
    },
    /// The URI or its body does not match the expected grammar
    #[error("malformed input: {reason}")]
    Format {
        /// Reason for the failure
        reason: String,
    },
    /// A `;name=value` parameter could not be parsed
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),
    /// A typed field was missing or out of its domain
    #[error("invalid field: {0}")]
    InvalidField(#[from] FieldError),
}

impl ParseErrorKind {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }
}

fn scheme_mismatch_message(expected: &str, found: Option<&str>) -> String {
    match found {
        Some(s) => format!("expected scheme '{expected}:', found '{s}:'"),
        None => format!("missing scheme; URI must start with '{expected}:'"),
    }
}

/// Errors for parameter parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// Token is empty or whitespace only
    #[error("parameter cannot be empty")]
    Empty,
    /// Token has a value but no name, e.g. `=value`
    #[error("parameter '{token}' has an empty name")]
    EmptyName {
        /// The offending token
        token: String,
    },
    /// Name would change meaning or break the URI once written out
    #[error("invalid parameter name '{name}': {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Reason for rejection
        reason: &'static str,
    },
}

/// Errors raised when a typed field is assigned an invalid value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A required field was empty or absent
    #[error("missing required field: {field}")]
    MissingRequiredField {
        /// Name of the missing field
        field: &'static str,
    },
    /// A field value falls outside the field's domain
    #[error("value '{value}' for {field} is out of domain: {reason}")]
    OutOfDomainValue {
        /// Name of the field
        field: &'static str,
        /// The rejected value, as text
        value: String,
        /// Reason for rejection
        reason: &'static str,
    },
}

impl FieldError {
    pub(crate) const fn missing(field: &'static str) -> Self {
        Self::MissingRequiredField { field }
    }

    pub(crate) fn out_of_domain(
        field: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        Self::OutOfDomainValue {
            field,
            value: value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_mismatch_display_names_both_schemes() {
        let err = ParseError::new(
            "geo:1,1",
            ParseErrorKind::SchemeMismatch {
                expected: "tel",
                found: Some("geo".to_string()),
            },
        );
        assert_eq!(
            err.to_string(),
            "failed to parse URI 'geo:1,1': expected scheme 'tel:', found 'geo:'"
        );
    }

    #[test]
    fn field_error_converts_into_kind() {
        let kind: ParseErrorKind = FieldError::missing("number").into();
        assert_eq!(
            kind,
            ParseErrorKind::InvalidField(FieldError::MissingRequiredField { field: "number" })
        );
        assert_eq!(kind.to_string(), "invalid field: missing required field: number");
    }

    #[test]
    fn out_of_domain_display() {
        let err = FieldError::out_of_domain("latitude", 91.5, "must be within [-90, 90]");
        assert_eq!(
            err.to_string(),
            "value '91.5' for latitude is out of domain: must be within [-90, 90]"
        );
    }
}
