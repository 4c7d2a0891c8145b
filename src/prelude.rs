//! Convenient re-exports for glob imports.
//!
//! This module provides a single import for all common types, making it easy
//! to get started with the crate:
//!
//! ```rust
//! use typed_uri::prelude::*;
//!
//! let uri = TelUri::parse("tel:+12025551234").unwrap();
//! assert!(uri.value().is_global());
//! ```
//!
//! The per-type field enums and the notification plumbing are left out; import
//! them from the crate root when subscribing to changes directly.

pub use crate::{
    // Wrappers
    DataUri, GeoUri, SchemeUri, TelUri, UrnUri,
    // Values
    BinaryPayload, DataPayload, GeoLocation, PhoneExtra, PhoneNumber, SchemeValue, TextPayload,
    UniqueIdentifier,
    // Parameters
    Parameter, RawUri,
    // Errors
    FieldError, ParameterError, ParseError, ParseErrorKind,
};
