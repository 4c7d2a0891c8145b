//! Scheme literals, grammar defaults, and well-known parameter names.

/// The `tel:` scheme (RFC 3966).
pub const TEL_SCHEME: &str = "tel";

/// The `geo:` scheme (RFC 5870).
pub const GEO_SCHEME: &str = "geo";

/// The `data:` scheme (RFC 2397).
pub const DATA_SCHEME: &str = "data";

/// The `urn:` scheme.
pub const URN_SCHEME: &str = "urn";

/// URN namespace identifier for 128-bit identifiers (RFC 4122).
pub const UUID_NAMESPACE: &str = "uuid";

/// Default coordinate reference system label for `geo:` URIs.
pub const DEFAULT_CRS: &str = "wgs84";

/// Default media type for `data:` URIs.
pub const DEFAULT_MEDIA_TYPE: &str = "text/plain";

/// Marker parameter announcing base64 content in a `data:` URI.
pub const BASE64_MARKER: &str = "base64";

/// `tel:` parameter naming the context of a local number.
pub const PHONE_CONTEXT_PARAM: &str = "phone-context";

/// `tel:` parameter carrying an extension.
pub const EXTENSION_PARAM: &str = "ext";

/// `tel:` parameter carrying an ISDN subaddress.
pub const ISDN_SUBADDRESS_PARAM: &str = "isub";

/// `geo:` parameter carrying the coordinate reference system.
pub const CRS_PARAM: &str = "crs";

/// `geo:` parameter carrying the uncertainty in meters.
pub const UNCERTAINTY_PARAM: &str = "u";

/// `data:` parameter carrying the character set.
pub const CHARSET_PARAM: &str = "charset";

/// Smallest valid latitude.
pub const MIN_LATITUDE: f64 = -90.0;

/// Largest valid latitude.
pub const MAX_LATITUDE: f64 = 90.0;

/// Smallest valid longitude.
pub const MIN_LONGITUDE: f64 = -180.0;

/// Largest valid longitude.
pub const MAX_LONGITUDE: f64 = 180.0;
