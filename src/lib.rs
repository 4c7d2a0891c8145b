//! Typed, round-trip-safe `tel:`, `geo:`, `data:` and `urn:uuid:` URIs.
//!
//! Each scheme carries a typed value (a phone number, a geolocation, a text
//! or binary payload, a 128-bit identifier). Serializing a value always yields
//! a well-formed URI, and parsing never silently drops information: any
//! parameter the value does not recognize is kept and written back out.
//!
//! # Quick Start
//!
//! ```rust
//! use typed_uri::{GeoUri, TelUri};
//!
//! // Parse a geo URI; the default coordinate system is not re-emitted
//! let geo = GeoUri::parse("geo:45.5,-122.6,35;u=10;crs=wgs84").unwrap();
//! assert_eq!(geo.value().latitude(), 45.5);
//! assert_eq!(geo.as_str(), Some("geo:45.5,-122.6,35;u=10"));
//!
//! // Unknown parameters survive a round trip
//! let tel = TelUri::parse("tel:+1-202-555-0123;foo=bar").unwrap();
//! assert!(tel.value().is_global());
//! assert_eq!(tel.to_string(), "tel:+1-202-555-0123;foo=bar");
//! ```
//!
//! # Editing in place
//!
//! Values are edited through [`SchemeUri::value_mut`]. Every setter reports
//! the field it changed; the wrapper listens for those reports and refreshes
//! its cached text once the edit completes.
//!
//! ```rust
//! use typed_uri::GeoUri;
//!
//! let mut uri = GeoUri::parse("geo:10,20").unwrap();
//! uri.value_mut().set_latitude(90.0).unwrap();
//! // Every longitude names the same pole
//! assert_eq!(uri.as_str(), Some("geo:90,0"));
//! ```
//!
//! # Grammar
//!
//! | Scheme | Body |
//! |--------|------|
//! | `tel:` (RFC 3966) | `number[;phone-context=..][;ext=..\|;isub=..][;other...]` |
//! | `geo:` (RFC 5870) | `lat,long[,alt][;u=..][;crs=..][;other...]` |
//! | `data:` (RFC 2397) | `[type][;charset=..][;other...],data` or `type[;other...];base64,data` |
//! | `urn:` (RFC 4122) | `uuid:<identifier>[;other...]` |
//!
//! Parameter values that contain reserved characters are written inside
//! double quotes with backslash escapes; see [`escape`].

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod constants;
mod data;
mod error;
pub mod escape;
mod geo;
#[cfg(kani)]
mod kani_impls;
pub mod notify;
mod param;
mod phone;
pub mod prelude;
mod raw;
pub mod split;
mod urn;
mod value;
mod wrapper;

pub use constants::{
    BASE64_MARKER, CHARSET_PARAM, CRS_PARAM, DATA_SCHEME, DEFAULT_CRS, DEFAULT_MEDIA_TYPE,
    EXTENSION_PARAM, GEO_SCHEME, ISDN_SUBADDRESS_PARAM, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE,
    MIN_LONGITUDE, PHONE_CONTEXT_PARAM, TEL_SCHEME, UNCERTAINTY_PARAM, URN_SCHEME, UUID_NAMESPACE,
};
pub use data::{BinaryPayload, DataField, DataPayload, TextPayload};
pub use error::{FieldError, ParameterError, ParseError, ParseErrorKind};
pub use geo::{GeoField, GeoLocation};
pub use notify::{Notifier, SubscriptionId};
pub use param::Parameter;
pub use phone::{PhoneExtra, PhoneField, PhoneNumber};
pub use raw::RawUri;
pub use urn::{UniqueIdentifier, UrnField};
pub use value::{Parsed, SchemeValue};
pub use wrapper::{DataUri, GeoUri, SchemeUri, TelUri, UrnUri, ValueMut};
