//! The contract shared by every scheme value type.

use std::fmt::{self, Write};

use crate::error::{FieldError, ParseError};
use crate::notify::Notifier;
use crate::param::Parameter;

/// A value parsed from a URI body, plus the parameters it did not recognize.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    /// The typed value
    pub value: T,
    /// Parameters no field of `value` claimed, in source order
    pub leftovers: Vec<Parameter>,
}

/// A typed value carried in the body of one URI scheme.
///
/// Implementors route every field write through
/// [`set_field`](crate::notify::set_field) so that the owning
/// [`SchemeUri`](crate::SchemeUri) can keep its cached text current.
pub trait SchemeValue: Clone + fmt::Display + fmt::Debug {
    /// The scheme literal, without the `:`.
    const SCHEME: &'static str;

    /// Identifies which field a change notification is about.
    type Field: Copy + fmt::Debug + Eq + Send + Sync + 'static;

    /// Parses the body of a URI (everything after `scheme:`).
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the body does not match the scheme grammar or a
    /// field is missing or out of its domain.
    fn parse_body(body: &str) -> Result<Parsed<Self>, ParseError>;

    /// Returns true if there is nothing to serialize.
    fn is_empty(&self) -> bool;

    /// Checks invariants that span several fields.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    fn validate(&self) -> Result<(), FieldError> {
        Ok(())
    }

    /// Checks that `leftovers` written next to this value read back as
    /// leftovers.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::OutOfDomainValue` for the first parameter the
    /// grammar would read as something else.
    fn check_leftovers(&self, leftovers: &[Parameter]) -> Result<(), FieldError> {
        let _ = leftovers;
        Ok(())
    }

    /// The value's change notifier.
    fn notifier(&self) -> &Notifier<Self::Field>;

    /// The value's change notifier, for subscribing.
    fn notifier_mut(&mut self) -> &mut Notifier<Self::Field>;

    /// Writes the body, with `leftovers` merged in where the grammar allows.
    ///
    /// The default appends them after the value's own serialization.
    fn write_body(&self, out: &mut String, leftovers: &[Parameter]) {
        let _ = write!(out, "{self}");
        Parameter::write_list(out, leftovers);
    }
}
