//! Typed URI wrappers.
//!
//! A [`SchemeUri`] owns one scheme value plus the parameters its parser did
//! not recognize, and keeps the canonical URI text cached. Edits go through
//! [`SchemeUri::value_mut`]; the cache is brought up to date when the
//! returned guard is dropped, so a reader never sees stale text.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace, warn};

use crate::data::DataPayload;
use crate::error::{FieldError, ParseError, ParseErrorKind};
use crate::geo::GeoLocation;
use crate::notify::SubscriptionId;
use crate::param::Parameter;
use crate::phone::PhoneNumber;
use crate::raw::RawUri;
use crate::urn::UniqueIdentifier;
use crate::value::SchemeValue;

/// A `tel:` URI.
pub type TelUri = SchemeUri<PhoneNumber>;

/// A `geo:` URI.
pub type GeoUri = SchemeUri<GeoLocation>;

/// A `data:` URI.
pub type DataUri = SchemeUri<DataPayload>;

/// A `urn:uuid:` URI.
pub type UrnUri = SchemeUri<UniqueIdentifier>;

/// Builds the listener a wrapper installs on its value.
fn stale_listener<F: fmt::Debug + 'static>(
    scheme: &'static str,
    stale: Arc<AtomicBool>,
) -> impl Fn(F) + Send + Sync + 'static {
    move |field| {
        trace!("{scheme}: field {field:?} changed");
        stale.store(true, Ordering::Release);
    }
}

/// A URI of one fixed scheme, backed by a typed value.
///
/// # Examples
///
/// ```
/// use typed_uri::TelUri;
///
/// let mut uri = TelUri::parse("tel:7042;phone-context=example.com;ext=22;foo=bar").unwrap();
/// assert_eq!(uri.value().extension(), Some("22"));
/// assert_eq!(uri.parameter("foo").and_then(|p| p.value()), Some("bar"));
///
/// uri.value_mut().set_extension(Some("23"));
/// assert_eq!(
///     uri.as_str(),
///     Some("tel:7042;phone-context=example.com;ext=23;foo=bar")
/// );
/// ```
pub struct SchemeUri<V: SchemeValue> {
    value: V,
    other_parameters: Vec<Parameter>,
    /// Canonical text as of the last completed mutation
    cached: Option<String>,
    stale: Arc<AtomicBool>,
    subscription: SubscriptionId,
}

impl<V: SchemeValue> SchemeUri<V> {
    /// Parses a URI of this wrapper's scheme.
    ///
    /// Surrounding whitespace is ignored and the scheme is matched
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The input is empty
    /// - The input does not start with this wrapper's scheme
    /// - The input is not a well-formed URI
    /// - The body does not parse as the scheme's value
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_inner(input).map_err(|kind| ParseError::new(input, kind))
    }

    /// Parses a URI, returning `None` instead of an error.
    #[must_use]
    pub fn try_parse(input: &str) -> Option<Self> {
        Self::parse(input).ok()
    }

    /// Returns true if `input` carries this wrapper's scheme and is a
    /// well-formed URI. The body is not parsed.
    #[must_use]
    pub fn is_well_formed(input: &str) -> bool {
        let input = input.trim();
        Self::check_scheme(input).is_ok() && RawUri::is_well_formed(input)
    }

    /// Builds a wrapper from an already split URI.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the scheme differs or the body does not parse.
    pub fn from_uri(uri: &RawUri) -> Result<Self, ParseError> {
        Self::from_raw(uri).map_err(|kind| ParseError::new(&uri.to_string(), kind))
    }

    /// Wraps a value with no extra parameters.
    ///
    /// A value that fails [`SchemeValue::validate`] is wrapped anyway but has
    /// no text until it is fixed through [`SchemeUri::value_mut`].
    #[must_use]
    pub fn from_value(value: V) -> Self {
        let uri = Self::assemble(value, Vec::new());
        if uri.cached.is_none() && !uri.value.is_empty() {
            warn!("{}: wrapped value cannot be serialized yet", V::SCHEME);
        }
        uri
    }

    /// Returns the canonical URI text, or `None` for an empty value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.cached.as_deref()
    }

    /// Returns the scheme, without the `:`.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn scheme(&self) -> &'static str {
        V::SCHEME
    }

    /// Returns the typed value.
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns a guard for editing the value in place.
    ///
    /// The cached text is refreshed when the guard is dropped. The value may
    /// also be replaced wholesale through the guard.
    pub fn value_mut(&mut self) -> ValueMut<'_, V> {
        ValueMut { uri: self }
    }

    /// Unwraps the value, dropping the extra parameters.
    #[must_use]
    pub fn into_value(self) -> V {
        self.into_parts().0
    }

    /// Unwraps the value and the extra parameters.
    #[must_use]
    pub fn into_parts(self) -> (V, Vec<Parameter>) {
        let mut value = self.value;
        value.notifier_mut().unsubscribe(self.subscription);
        (value, self.other_parameters)
    }

    /// Returns the parameters the value did not claim, in source order.
    #[must_use]
    pub fn other_parameters(&self) -> &[Parameter] {
        &self.other_parameters
    }

    /// Returns the first extra parameter named `name`, ignoring case.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        Parameter::find(&self.other_parameters, name)
    }

    /// Appends an extra parameter.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::OutOfDomainValue`, leaving the parameters
    /// unchanged, if the value's parser would not read the parameter back as
    /// an extra one. An example is `ext` on a number without an extension.
    pub fn push_parameter(&mut self, parameter: Parameter) -> Result<(), FieldError> {
        let mut parameters = self.other_parameters.clone();
        parameters.push(parameter);
        self.set_other_parameters(parameters)
    }

    /// Replaces all extra parameters.
    ///
    /// # Errors
    ///
    /// See [`SchemeUri::push_parameter`].
    pub fn set_other_parameters(&mut self, parameters: Vec<Parameter>) -> Result<(), FieldError> {
        self.value.check_leftovers(&parameters)?;
        self.other_parameters = parameters;
        self.recompute();
        Ok(())
    }

    /// Removes the first extra parameter named `name` and returns it.
    pub fn remove_parameter(&mut self, name: &str) -> Option<Parameter> {
        let index = self.other_parameters.iter().position(|p| p.is(name))?;
        let removed = self.other_parameters.remove(index);
        self.recompute();
        Some(removed)
    }

    fn parse_inner(input: &str) -> Result<Self, ParseErrorKind> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseErrorKind::Empty);
        }
        Self::check_scheme(input)?;
        let raw = RawUri::parse(input).map_err(|e| e.kind)?;
        Self::from_raw(&raw)
    }

    fn check_scheme(input: &str) -> Result<(), ParseErrorKind> {
        let found = input.split_once(':').map(|(scheme, _)| scheme);
        match found {
            Some(scheme) if scheme.eq_ignore_ascii_case(V::SCHEME) => Ok(()),
            _ => Err(ParseErrorKind::SchemeMismatch {
                expected: V::SCHEME,
                found: found.map(str::to_ascii_lowercase),
            }),
        }
    }

    fn from_raw(raw: &RawUri) -> Result<Self, ParseErrorKind> {
        if raw.scheme() != V::SCHEME {
            return Err(ParseErrorKind::SchemeMismatch {
                expected: V::SCHEME,
                found: Some(raw.scheme().to_string()),
            });
        }
        let parsed = V::parse_body(raw.body()).map_err(|e| e.kind)?;
        let uri = Self::assemble(parsed.value, parsed.leftovers);
        trace!(
            "{}: parsed with {} extra parameter(s)",
            V::SCHEME,
            uri.other_parameters.len()
        );
        Ok(uri)
    }

    fn assemble(mut value: V, other_parameters: Vec<Parameter>) -> Self {
        let stale = Arc::new(AtomicBool::new(false));
        let subscription = value
            .notifier_mut()
            .subscribe(stale_listener::<V::Field>(V::SCHEME, Arc::clone(&stale)));
        let mut uri = Self {
            value,
            other_parameters,
            cached: None,
            stale,
            subscription,
        };
        uri.recompute();
        uri
    }

    /// Re-subscribes if the value was replaced, then recomputes if stale.
    fn refresh(&mut self) {
        if !self.value.notifier().is_subscribed(self.subscription) {
            self.subscription = self
                .value
                .notifier_mut()
                .subscribe(stale_listener::<V::Field>(V::SCHEME, Arc::clone(&self.stale)));
            self.stale.store(true, Ordering::Release);
        }
        if self.stale.swap(false, Ordering::AcqRel) {
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        if self.value.is_empty() {
            self.cached = None;
            return;
        }
        let checked = self
            .value
            .validate()
            .and_then(|()| self.value.check_leftovers(&self.other_parameters));
        match checked {
            Ok(()) => self.cached = Some(self.render()),
            Err(e) => debug!("{}: keeping previous text: {e}", V::SCHEME),
        }
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(V::SCHEME.len() + 32);
        out.push_str(V::SCHEME);
        out.push(':');
        self.value.write_body(&mut out, &self.other_parameters);
        out
    }
}

/// Mutable access to the value of a [`SchemeUri`].
///
/// Dropping the guard refreshes the wrapper's cached text.
pub struct ValueMut<'a, V: SchemeValue> {
    uri: &'a mut SchemeUri<V>,
}

impl<V: SchemeValue> Deref for ValueMut<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.uri.value
    }
}

impl<V: SchemeValue> DerefMut for ValueMut<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        &mut self.uri.value
    }
}

impl<V: SchemeValue> Drop for ValueMut<'_, V> {
    fn drop(&mut self) {
        self.uri.refresh();
    }
}

impl<V: SchemeValue> Clone for SchemeUri<V> {
    fn clone(&self) -> Self {
        let mut value = self.value.clone();
        let stale = Arc::new(AtomicBool::new(false));
        let subscription = value
            .notifier_mut()
            .subscribe(stale_listener::<V::Field>(V::SCHEME, Arc::clone(&stale)));
        Self {
            value,
            other_parameters: self.other_parameters.clone(),
            cached: self.cached.clone(),
            stale,
            subscription,
        }
    }
}

impl<V: SchemeValue + PartialEq> PartialEq for SchemeUri<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.other_parameters == other.other_parameters
    }
}

impl<V: SchemeValue + Eq> Eq for SchemeUri<V> {}

impl<V: SchemeValue> fmt::Debug for SchemeUri<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeUri")
            .field("value", &self.value)
            .field("other_parameters", &self.other_parameters)
            .field("cached", &self.cached)
            .finish_non_exhaustive()
    }
}

impl<V: SchemeValue> fmt::Display for SchemeUri<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or_default())
    }
}

impl<V: SchemeValue> FromStr for SchemeUri<V> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<V: SchemeValue> TryFrom<&str> for SchemeUri<V> {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl<V: SchemeValue> serde::Serialize for SchemeUri<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str().unwrap_or_default())
    }
}

#[cfg(feature = "serde")]
impl<'de, V: SchemeValue> serde::Deserialize<'de> for SchemeUri<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
