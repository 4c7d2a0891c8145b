//! Payloads carried in `data:` URIs (RFC 2397).
//!
//! A `data:` body is either URL-encoded text
//! (`[<mediatype>][;charset=<charset>],<data>`) or base64-encoded bytes
//! (`<mediatype>;base64,<data>`). [`DataPayload`] holds one or the other and
//! picks the variant from the `base64` marker when parsing.

use std::borrow::Cow;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::constants::{BASE64_MARKER, CHARSET_PARAM, DATA_SCHEME, DEFAULT_MEDIA_TYPE};
use crate::error::{FieldError, ParseError, ParseErrorKind};
use crate::escape::{has_stray_percent, is_token_safe};
use crate::notify::{Notifier, set_field};
use crate::param::Parameter;
use crate::split::{non_quoted_split, non_quoted_split_on_first};
use crate::value::{Parsed, SchemeValue};

/// Bytes escaped by [`TextPayload::from_text`]. Non-ASCII is always escaped.
const PAYLOAD_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'`')
    .add(b'#');

/// Fields of a `data:` payload, as reported to change listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataField {
    /// The media type
    MediaType,
    /// The text character set
    CharSet,
    /// The payload itself
    Data,
}

fn normalize_media_type(media_type: &str) -> Result<String, FieldError> {
    let media_type = media_type.trim().to_ascii_lowercase();
    if media_type.is_empty() {
        return Err(FieldError::missing("media type"));
    }
    if media_type == BASE64_MARKER {
        return Err(FieldError::out_of_domain(
            "media type",
            media_type,
            "collides with the base64 marker",
        ));
    }
    if !is_token_safe(&media_type) {
        return Err(FieldError::out_of_domain(
            "media type",
            media_type,
            "contains characters that cannot appear in a data: prefix",
        ));
    }
    Ok(media_type)
}

fn split_payload(body: &str) -> Result<(&str, &str), ParseErrorKind> {
    non_quoted_split_on_first(body, ',')
        .ok_or_else(|| ParseErrorKind::format("missing ',' before the payload"))
}

/// URL-encoded text carried in a `data:` URI.
///
/// The payload is kept exactly as it appears in the URI; use
/// [`TextPayload::decoded_data`] for the text it encodes.
///
/// # Examples
///
/// ```
/// use typed_uri::TextPayload;
///
/// let text = TextPayload::from_text("Hello World").unwrap();
/// assert_eq!(text.data(), "Hello%20World");
/// assert_eq!(text.decoded_data(), "Hello World");
/// assert_eq!(text.to_string(), ",Hello%20World");
///
/// let html = text.with_media_type("text/html").unwrap();
/// assert_eq!(html.to_string(), "text/html,Hello%20World");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextPayload {
    data: String,
    media_type: Option<String>,
    charset: Option<String>,
    notifier: Notifier<DataField>,
}

impl TextPayload {
    /// Creates a payload from already URL-encoded text.
    ///
    /// # Errors
    ///
    /// Returns `FieldError` if `data` is empty, or contains whitespace, control
    /// characters, quotes, or a `%` that does not start an escape.
    pub fn new(data: &str) -> Result<Self, FieldError> {
        Ok(Self {
            data: Self::check_data(data)?,
            ..Self::default()
        })
    }

    /// Creates a payload by percent-encoding plain text.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::MissingRequiredField` if `text` is empty.
    pub fn from_text(text: &str) -> Result<Self, FieldError> {
        Self::new(&utf8_percent_encode(text, PAYLOAD_ESCAPES).to_string())
    }

    /// Returns this payload with a media type.
    ///
    /// # Errors
    ///
    /// Returns `FieldError` if the media type is not a plain token.
    pub fn with_media_type(mut self, media_type: &str) -> Result<Self, FieldError> {
        self.set_media_type(Some(media_type))?;
        Ok(self)
    }

    /// Returns this payload with a character set.
    #[must_use]
    pub fn with_charset(mut self, charset: &str) -> Self {
        self.set_charset(Some(charset));
        self
    }

    /// Returns the payload as it appears in the URI.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Returns the payload with percent escapes resolved.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD.
    #[must_use]
    pub fn decoded_data(&self) -> Cow<'_, str> {
        percent_decode_str(&self.data).decode_utf8_lossy()
    }

    /// Returns the explicit, non-default media type, if any.
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Returns the effective media type.
    #[must_use]
    pub fn effective_media_type(&self) -> &str {
        self.media_type.as_deref().unwrap_or(DEFAULT_MEDIA_TYPE)
    }

    /// Returns the character set, if any.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// Replaces the URL-encoded payload.
    ///
    /// # Errors
    ///
    /// See [`TextPayload::new`].
    pub fn set_data(&mut self, data: &str) -> Result<bool, FieldError> {
        let data = Self::check_data(data)?;
        Ok(set_field(&mut self.data, data, DataField::Data, &self.notifier))
    }

    /// Sets or clears the media type. `text/plain` and blank values clear it.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::OutOfDomainValue` if the media type is not a plain
    /// token.
    pub fn set_media_type(&mut self, media_type: Option<&str>) -> Result<bool, FieldError> {
        let media_type = match media_type.filter(|m| !m.trim().is_empty()) {
            Some(m) => Some(normalize_media_type(m)?).filter(|m| m != DEFAULT_MEDIA_TYPE),
            None => None,
        };
        Ok(set_field(
            &mut self.media_type,
            media_type,
            DataField::MediaType,
            &self.notifier,
        ))
    }

    /// Sets or clears the character set. A blank value clears it.
    pub fn set_charset(&mut self, charset: Option<&str>) -> bool {
        let charset = charset
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        set_field(&mut self.charset, charset, DataField::CharSet, &self.notifier)
    }

    /// Writes the body, with `leftovers` after the charset.
    ///
    /// When leftovers include a bare token, the default media type is written
    /// explicitly so that the token is not read back as the media type.
    pub fn write_body(&self, out: &mut String, leftovers: &[Parameter]) {
        let media_type = self.media_type.as_deref().or_else(|| {
            leftovers
                .iter()
                .any(Parameter::is_bare)
                .then_some(DEFAULT_MEDIA_TYPE)
        });
        if let Some(m) = media_type {
            out.push_str(m);
        }
        let charset = self
            .charset
            .as_deref()
            .and_then(|cs| Parameter::new(CHARSET_PARAM, Some(cs)).ok());
        if let Some(p) = charset {
            out.push_str(&p.to_segment());
        }
        Parameter::write_list(out, leftovers);
        out.push(',');
        out.push_str(&self.data);
    }

    fn check_data(data: &str) -> Result<String, FieldError> {
        if data.is_empty() {
            return Err(FieldError::missing("data"));
        }
        let unsafe_char = data
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '"');
        if unsafe_char || has_stray_percent(data) {
            return Err(FieldError::out_of_domain(
                "data",
                data,
                "must be URL-encoded",
            ));
        }
        Ok(data.to_string())
    }

    fn parse_inner(body: &str) -> Result<Parsed<Self>, ParseErrorKind> {
        let (prefix, data) = split_payload(body)?;
        let mut text = Self::new(data)?;
        let mut leftovers = Vec::new();
        let mut media_seen = false;

        for param in Parameter::parse_list(prefix)? {
            if param.is_bare() && param.is(BASE64_MARKER) {
                return Err(ParseErrorKind::format(
                    "the base64 marker must be the last parameter",
                ));
            }
            if param.is_bare() && !media_seen {
                media_seen = true;
                text.set_media_type(Some(param.name()))?;
            } else if param.is(CHARSET_PARAM) && param.value().is_some() && text.charset.is_none() {
                text.set_charset(param.value());
            } else {
                leftovers.push(param);
            }
        }

        Ok(Parsed {
            value: text,
            leftovers,
        })
    }
}

impl fmt::Display for TextPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut body = String::new();
        self.write_body(&mut body, &[]);
        f.write_str(&body)
    }
}

/// Base64-encoded bytes carried in a `data:` URI.
///
/// # Examples
///
/// ```
/// use typed_uri::BinaryPayload;
///
/// let png = BinaryPayload::new("image/PNG", b"Hello".to_vec()).unwrap();
/// assert_eq!(png.media_type(), "image/png");
/// assert_eq!(png.to_string(), "image/png;base64,SGVsbG8=");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BinaryPayload {
    media_type: String,
    data: Vec<u8>,
    notifier: Notifier<DataField>,
}

impl BinaryPayload {
    /// Creates a binary payload.
    ///
    /// # Errors
    ///
    /// Returns `FieldError` if the media type is blank or not a plain token,
    /// or if `data` is empty.
    pub fn new(media_type: &str, data: impl Into<Vec<u8>>) -> Result<Self, FieldError> {
        let payload = Self {
            media_type: normalize_media_type(media_type)?,
            data: data.into(),
            notifier: Notifier::new(),
        };
        payload.check()?;
        Ok(payload)
    }

    /// Returns the media type.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Returns the decoded bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the bytes in standard base64.
    #[must_use]
    pub fn encoded_data(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// Replaces the media type.
    ///
    /// # Errors
    ///
    /// Returns `FieldError` if the media type is blank or not a plain token.
    pub fn set_media_type(&mut self, media_type: &str) -> Result<bool, FieldError> {
        let media_type = normalize_media_type(media_type)?;
        Ok(set_field(
            &mut self.media_type,
            media_type,
            DataField::MediaType,
            &self.notifier,
        ))
    }

    /// Replaces the bytes.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::MissingRequiredField` if `data` is empty.
    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) -> Result<bool, FieldError> {
        let data = data.into();
        if data.is_empty() {
            return Err(FieldError::missing("data"));
        }
        Ok(set_field(&mut self.data, data, DataField::Data, &self.notifier))
    }

    /// Writes the body, with `leftovers` between the media type and the
    /// base64 marker.
    pub fn write_body(&self, out: &mut String, leftovers: &[Parameter]) {
        out.push_str(&self.media_type);
        Parameter::write_list(out, leftovers);
        out.push(';');
        out.push_str(BASE64_MARKER);
        out.push(',');
        out.push_str(&self.encoded_data());
    }

    fn check(&self) -> Result<(), FieldError> {
        if self.media_type.is_empty() {
            return Err(FieldError::missing("media type"));
        }
        if self.data.is_empty() {
            return Err(FieldError::missing("data"));
        }
        Ok(())
    }

    fn parse_inner(body: &str) -> Result<Parsed<Self>, ParseErrorKind> {
        let (prefix, payload) = split_payload(body)?;
        let segments = non_quoted_split(prefix, &[';'], false);
        let Some((marker, head)) = segments.split_last() else {
            return Err(ParseErrorKind::format("missing base64 marker"));
        };
        if head.is_empty() || !marker.trim().eq_ignore_ascii_case(BASE64_MARKER) {
            return Err(ParseErrorKind::format("missing base64 marker"));
        }

        let (media_type, middle) = head
            .split_first()
            .ok_or(FieldError::missing("media type"))?;
        if media_type.trim().is_empty() {
            return Err(FieldError::missing("media type").into());
        }
        let media_type = Parameter::parse(media_type)?;
        if !media_type.is_bare() {
            return Err(FieldError::missing("media type").into());
        }

        let leftovers = middle
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| Parameter::parse(s))
            .collect::<Result<Vec<_>, _>>()?;

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| ParseErrorKind::format(format!("invalid base64 payload: {e}")))?;

        Ok(Parsed {
            value: Self::new(media_type.name(), data)?,
            leftovers,
        })
    }
}

impl fmt::Display for BinaryPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut body = String::new();
        self.write_body(&mut body, &[]);
        f.write_str(&body)
    }
}

/// The value of a `data:` URI: text or bytes.
///
/// # Examples
///
/// ```
/// use typed_uri::{DataPayload, SchemeValue};
///
/// let parsed = DataPayload::parse_body("image/gif;base64,R0lG").unwrap();
/// assert!(parsed.value.as_binary().is_some());
/// assert_eq!(parsed.value.media_type(), "image/gif");
///
/// let parsed = DataPayload::parse_body(",Hello%20World").unwrap();
/// assert_eq!(parsed.value.media_type(), "text/plain");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataPayload {
    /// URL-encoded text
    Text(TextPayload),
    /// Base64-encoded bytes
    Binary(BinaryPayload),
}

impl DataPayload {
    /// Returns the effective media type of either variant.
    #[must_use]
    pub fn media_type(&self) -> &str {
        match self {
            Self::Text(t) => t.effective_media_type(),
            Self::Binary(b) => b.media_type(),
        }
    }

    /// Returns the text payload, if this is one.
    #[must_use]
    pub const fn as_text(&self) -> Option<&TextPayload> {
        match self {
            Self::Text(t) => Some(t),
            Self::Binary(_) => None,
        }
    }

    /// Returns the binary payload, if this is one.
    #[must_use]
    pub const fn as_binary(&self) -> Option<&BinaryPayload> {
        match self {
            Self::Binary(b) => Some(b),
            Self::Text(_) => None,
        }
    }

    /// Returns true if the payload is base64-encoded.
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    fn is_base64_body(body: &str) -> bool {
        non_quoted_split_on_first(body, ',')
            .and_then(|(prefix, _)| non_quoted_split(prefix, &[';'], false).pop())
            .is_some_and(|last| last.trim().eq_ignore_ascii_case(BASE64_MARKER))
    }
}

impl Default for DataPayload {
    fn default() -> Self {
        Self::Text(TextPayload::default())
    }
}

impl From<TextPayload> for DataPayload {
    fn from(text: TextPayload) -> Self {
        Self::Text(text)
    }
}

impl From<BinaryPayload> for DataPayload {
    fn from(binary: BinaryPayload) -> Self {
        Self::Binary(binary)
    }
}

impl SchemeValue for DataPayload {
    const SCHEME: &'static str = DATA_SCHEME;
    type Field = DataField;

    /// Parses a text or base64 body, depending on whether the last prefix
    /// parameter is the `base64` marker.
    fn parse_body(body: &str) -> Result<Parsed<Self>, ParseError> {
        let parsed = if Self::is_base64_body(body) {
            BinaryPayload::parse_inner(body).map(|p| Parsed {
                value: Self::Binary(p.value),
                leftovers: p.leftovers,
            })
        } else {
            TextPayload::parse_inner(body).map(|p| Parsed {
                value: Self::Text(p.value),
                leftovers: p.leftovers,
            })
        };
        parsed.map_err(|kind| ParseError::new(body, kind))
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Text(t) => t.data.is_empty(),
            Self::Binary(b) => b.data.is_empty(),
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        match self {
            Self::Text(t) => TextPayload::check_data(&t.data).map(|_| ()),
            Self::Binary(b) => b.check(),
        }
    }

    /// A bare `base64` after a text prefix would turn the body into a
    /// binary one, and a `charset` would be claimed if none is set.
    fn check_leftovers(&self, leftovers: &[Parameter]) -> Result<(), FieldError> {
        let Self::Text(t) = self else {
            return Ok(());
        };
        for p in leftovers {
            if p.is_bare() && p.is(BASE64_MARKER) {
                return Err(FieldError::out_of_domain(
                    "parameter",
                    p.name(),
                    "the base64 marker cannot follow a text payload",
                ));
            }
            if !p.is_bare() && p.is(CHARSET_PARAM) && t.charset.is_none() {
                return Err(FieldError::out_of_domain(
                    "parameter",
                    p.name(),
                    "would be read back as the charset",
                ));
            }
        }
        Ok(())
    }

    fn notifier(&self) -> &Notifier<DataField> {
        match self {
            Self::Text(t) => &t.notifier,
            Self::Binary(b) => &b.notifier,
        }
    }

    fn notifier_mut(&mut self) -> &mut Notifier<DataField> {
        match self {
            Self::Text(t) => &mut t.notifier,
            Self::Binary(b) => &mut b.notifier,
        }
    }

    fn write_body(&self, out: &mut String, leftovers: &[Parameter]) {
        match self {
            Self::Text(t) => t.write_body(out, leftovers),
            Self::Binary(b) => b.write_body(out, leftovers),
        }
    }
}

impl fmt::Display for DataPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => fmt::Display::fmt(t, f),
            Self::Binary(b) => fmt::Display::fmt(b, f),
        }
    }
}
