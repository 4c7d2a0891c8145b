//! 128-bit identifiers carried in `urn:uuid:` URIs (RFC 4122).

use std::fmt;

use uuid::Uuid;

use crate::constants::{URN_SCHEME, UUID_NAMESPACE};
use crate::error::{FieldError, ParseError, ParseErrorKind};
use crate::notify::{Notifier, set_field};
use crate::param::Parameter;
use crate::split::non_quoted_split;
use crate::value::{Parsed, SchemeValue};

/// Fields of a [`UniqueIdentifier`], as reported to change listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrnField {
    /// The identifier
    Value,
}

/// A UUID in the `uuid` URN namespace.
///
/// The nil UUID means "no identifier": it is stored as absent and the value
/// serializes to nothing.
///
/// # Examples
///
/// ```
/// use typed_uri::UniqueIdentifier;
///
/// let id = UniqueIdentifier::parse_str("F81D4FAE-7DEC-11D0-A765-00A0C91E6BF6").unwrap();
/// assert_eq!(id.to_string(), "uuid:f81d4fae-7dec-11d0-a765-00a0c91e6bf6");
///
/// assert!(UniqueIdentifier::new(uuid::Uuid::nil()).value().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UniqueIdentifier {
    value: Option<Uuid>,
    notifier: Notifier<UrnField>,
}

impl UniqueIdentifier {
    /// Wraps `uuid`. The nil UUID yields an empty identifier.
    #[must_use]
    pub fn new(uuid: Uuid) -> Self {
        Self {
            value: Self::non_nil(uuid),
            notifier: Notifier::new(),
        }
    }

    /// Generates a random (version 4) identifier.
    #[must_use]
    pub fn new_v4() -> Self {
        Self::new(Uuid::new_v4())
    }

    /// Parses an identifier, with or without the `uuid:` namespace prefix.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::OutOfDomainValue` if `text` is not a UUID.
    pub fn parse_str(text: &str) -> Result<Self, FieldError> {
        let text = text.trim();
        let bare = Self::strip_namespace(text).unwrap_or(text);
        Uuid::parse_str(bare)
            .map(Self::new)
            .map_err(|_| FieldError::out_of_domain("uuid", text, "not a valid UUID"))
    }

    /// Returns the identifier, if any.
    #[must_use]
    pub const fn value(&self) -> Option<Uuid> {
        self.value
    }

    /// Replaces the identifier. `None` and the nil UUID clear it.
    pub fn set_value(&mut self, value: Option<Uuid>) -> bool {
        let value = value.and_then(Self::non_nil);
        set_field(&mut self.value, value, UrnField::Value, &self.notifier)
    }

    fn non_nil(uuid: Uuid) -> Option<Uuid> {
        (!uuid.is_nil()).then_some(uuid)
    }

    fn strip_namespace(text: &str) -> Option<&str> {
        let (namespace, rest) = text.split_once(':')?;
        namespace
            .eq_ignore_ascii_case(UUID_NAMESPACE)
            .then_some(rest)
    }

    fn parse_inner(body: &str) -> Result<Parsed<Self>, ParseErrorKind> {
        let segments = non_quoted_split(body, &[';'], false);
        let (first, rest) = segments
            .split_first()
            .ok_or(FieldError::missing("uuid"))?;

        let first = first.trim();
        if first.is_empty() {
            return Err(FieldError::missing("uuid").into());
        }
        if !Parameter::parse(first)?.is_bare() {
            return Err(ParseErrorKind::format("expected 'uuid:<identifier>'"));
        }

        let bare = match Self::strip_namespace(first) {
            Some(id) => id,
            None if first.contains(':') => {
                return Err(ParseErrorKind::format(format!(
                    "unsupported URN namespace in '{first}'"
                )));
            }
            None => first,
        };
        let uuid = Uuid::parse_str(bare)
            .map_err(|e| ParseErrorKind::format(format!("invalid UUID '{bare}': {e}")))?;

        let leftovers = rest
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| Parameter::parse(s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Parsed {
            value: Self::new(uuid),
            leftovers,
        })
    }
}

impl From<Uuid> for UniqueIdentifier {
    fn from(uuid: Uuid) -> Self {
        Self::new(uuid)
    }
}

impl SchemeValue for UniqueIdentifier {
    const SCHEME: &'static str = URN_SCHEME;
    type Field = UrnField;

    /// Parses `[uuid:]<identifier>[;other...]`.
    fn parse_body(body: &str) -> Result<Parsed<Self>, ParseError> {
        Self::parse_inner(body).map_err(|kind| ParseError::new(body, kind))
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    fn notifier(&self) -> &Notifier<UrnField> {
        &self.notifier
    }

    fn notifier_mut(&mut self) -> &mut Notifier<UrnField> {
        &mut self.notifier
    }
}

impl fmt::Display for UniqueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(uuid) => write!(f, "{UUID_NAMESPACE}:{}", uuid.hyphenated()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "f81d4fae-7dec-11d0-a765-00a0c91e6bf6";

    #[test]
    fn parse_with_namespace() {
        let parsed = UniqueIdentifier::parse_body(&format!("UUID:{ID}")).unwrap();
        assert_eq!(parsed.value.value(), Uuid::parse_str(ID).ok());
        assert_eq!(parsed.value.to_string(), format!("uuid:{ID}"));
        assert!(parsed.leftovers.is_empty());
    }

    #[test]
    fn parse_without_namespace() {
        let parsed = UniqueIdentifier::parse_body(ID).unwrap();
        assert!(parsed.value.value().is_some());
    }

    #[test]
    fn parse_keeps_leftovers() {
        let parsed = UniqueIdentifier::parse_body(&format!("uuid:{ID};v=1;flag")).unwrap();
        assert_eq!(parsed.leftovers.len(), 2);
        assert_eq!(parsed.leftovers[0].value(), Some("1"));
    }

    #[test]
    fn parse_rejects_other_namespace() {
        assert!(matches!(
            UniqueIdentifier::parse_body("isbn:0451450523"),
            Err(ParseError {
                kind: ParseErrorKind::Format { .. },
                ..
            })
        ));
    }

    #[test]
    fn parse_rejects_bad_uuid() {
        assert!(matches!(
            UniqueIdentifier::parse_body("uuid:not-a-uuid"),
            Err(ParseError {
                kind: ParseErrorKind::Format { .. },
                ..
            })
        ));
    }

    #[test]
    fn parse_rejects_missing_identifier() {
        assert!(UniqueIdentifier::parse_body(";v=1").is_err());
        assert!(UniqueIdentifier::parse_body("id=abc").is_err());
    }

    #[test]
    fn nil_is_empty() {
        let parsed = UniqueIdentifier::parse_body(&format!("uuid:{}", Uuid::nil())).unwrap();
        assert!(parsed.value.is_empty());
        assert_eq!(parsed.value.to_string(), "");
    }

    #[test]
    fn set_value_treats_nil_as_clear() {
        let mut id = UniqueIdentifier::new_v4();
        assert!(!id.is_empty());
        assert!(id.set_value(Some(Uuid::nil())));
        assert!(id.is_empty());
        assert!(!id.set_value(None));
    }

    #[test]
    fn parse_str_reports_domain_error() {
        assert!(matches!(
            UniqueIdentifier::parse_str("nope"),
            Err(FieldError::OutOfDomainValue { field: "uuid", .. })
        ));
    }
}
