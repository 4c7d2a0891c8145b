//! Telephone numbers carried in `tel:` URIs (RFC 3966).

use std::fmt;

use crate::constants::{EXTENSION_PARAM, ISDN_SUBADDRESS_PARAM, PHONE_CONTEXT_PARAM, TEL_SCHEME};
use crate::error::{FieldError, ParseError, ParseErrorKind};
use crate::escape::is_token_safe;
use crate::notify::{Notifier, set_field};
use crate::param::Parameter;
use crate::split::non_quoted_split;
use crate::value::{Parsed, SchemeValue};

/// The optional suffix of a phone number.
///
/// An extension and an ISDN subaddress are mutually exclusive, so a number
/// carries at most one of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PhoneExtra {
    /// Neither an extension nor a subaddress
    #[default]
    None,
    /// A dialing extension (`;ext=`)
    Extension(String),
    /// An ISDN subaddress (`;isub=`)
    IsdnSubAddress(String),
}

/// Fields of a [`PhoneNumber`], as reported to change listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneField {
    /// The number itself
    Number,
    /// The `phone-context`
    Context,
    /// The extension
    Extension,
    /// The ISDN subaddress
    IsdnSubAddress,
}

/// A telephone number with its context and optional suffix.
///
/// Global numbers start with `+`. Local numbers are only meaningful within a
/// `phone-context`, so a local number always carries one.
///
/// # Examples
///
/// ```
/// use typed_uri::PhoneNumber;
///
/// let global = PhoneNumber::new("+12025551234", None).unwrap();
/// assert!(global.is_global());
/// assert_eq!(global.to_string(), "+12025551234");
///
/// let local = PhoneNumber::new("7042", Some("example.com"))
///     .unwrap()
///     .with_extension("22");
/// assert!(local.is_local());
/// assert_eq!(local.to_string(), "7042;phone-context=example.com;ext=22");
///
/// // A local number without a context is rejected.
/// assert!(PhoneNumber::new("7042", None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhoneNumber {
    number: String,
    context: Option<String>,
    extra: PhoneExtra,
    notifier: Notifier<PhoneField>,
}

impl PhoneNumber {
    /// Creates a phone number.
    ///
    /// # Errors
    ///
    /// Returns `FieldError` if:
    /// - The trimmed number is empty
    /// - The number contains characters that cannot appear unquoted in a URI
    ///   body (`;`, `,`, `=`, quotes, whitespace, ...)
    /// - The number is local and `context` is absent or blank
    pub fn new(number: &str, context: Option<&str>) -> Result<Self, FieldError> {
        let phone = Self {
            number: Self::check_number(number)?,
            context: Self::normalize_context(context),
            extra: PhoneExtra::None,
            notifier: Notifier::new(),
        };
        phone.validate()?;
        Ok(phone)
    }

    /// Returns this number with an extension, replacing any subaddress.
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.set_extension(Some(extension));
        self
    }

    /// Returns this number with an ISDN subaddress, replacing any extension.
    #[must_use]
    pub fn with_isdn_sub_address(mut self, sub_address: &str) -> Self {
        self.set_isdn_sub_address(Some(sub_address));
        self
    }

    /// Returns the number as written, including any leading `+`.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Returns the `phone-context`, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the extension or subaddress slot.
    #[must_use]
    pub const fn extra(&self) -> &PhoneExtra {
        &self.extra
    }

    /// Returns the extension, if that is the active suffix.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        match &self.extra {
            PhoneExtra::Extension(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the ISDN subaddress, if that is the active suffix.
    #[must_use]
    pub fn isdn_sub_address(&self) -> Option<&str> {
        match &self.extra {
            PhoneExtra::IsdnSubAddress(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if the number starts with `+`.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.number.starts_with('+')
    }

    /// Returns true if the number is not global.
    #[must_use]
    pub fn is_local(&self) -> bool {
        !self.is_global()
    }

    /// Replaces the number.
    ///
    /// Switching a global number to a local one leaves the value invalid
    /// until a context is set; see [`SchemeValue::validate`].
    ///
    /// # Errors
    ///
    /// Returns `FieldError` if the number is blank or not URI-safe.
    pub fn set_number(&mut self, number: &str) -> Result<bool, FieldError> {
        let number = Self::check_number(number)?;
        Ok(set_field(&mut self.number, number, PhoneField::Number, &self.notifier))
    }

    /// Replaces the `phone-context`. A blank context clears it.
    pub fn set_context(&mut self, context: Option<&str>) -> bool {
        let context = Self::normalize_context(context);
        set_field(&mut self.context, context, PhoneField::Context, &self.notifier)
    }

    /// Sets or clears the extension.
    ///
    /// Setting an extension clears any subaddress. Clearing only has an
    /// effect if the extension is the active suffix.
    pub fn set_extension(&mut self, extension: Option<&str>) -> bool {
        match extension {
            Some(e) => self.set_extra(PhoneExtra::Extension(e.trim().to_string())),
            None if self.extension().is_some() => self.set_extra(PhoneExtra::None),
            None => false,
        }
    }

    /// Sets or clears the ISDN subaddress.
    ///
    /// Setting a subaddress clears any extension. Clearing only has an
    /// effect if the subaddress is the active suffix.
    pub fn set_isdn_sub_address(&mut self, sub_address: Option<&str>) -> bool {
        match sub_address {
            Some(s) => self.set_extra(PhoneExtra::IsdnSubAddress(s.trim().to_string())),
            None if self.isdn_sub_address().is_some() => self.set_extra(PhoneExtra::None),
            None => false,
        }
    }

    /// Replaces the suffix slot.
    pub fn set_extra(&mut self, extra: PhoneExtra) -> bool {
        let field = match (&extra, &self.extra) {
            (PhoneExtra::IsdnSubAddress(_), _)
            | (PhoneExtra::None, PhoneExtra::IsdnSubAddress(_)) => PhoneField::IsdnSubAddress,
            _ => PhoneField::Extension,
        };
        set_field(&mut self.extra, extra, field, &self.notifier)
    }

    fn check_number(number: &str) -> Result<String, FieldError> {
        let number = number.trim();
        if number.is_empty() {
            return Err(FieldError::missing("number"));
        }
        if !is_token_safe(number) {
            return Err(FieldError::out_of_domain(
                "number",
                number,
                "contains characters that cannot appear in a tel: body",
            ));
        }
        Ok(number.to_string())
    }

    fn normalize_context(context: Option<&str>) -> Option<String> {
        context
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }

    fn parse_inner(body: &str) -> Result<Parsed<Self>, ParseErrorKind> {
        let segments = non_quoted_split(body, &[';'], false);
        let (number, rest) = segments
            .split_first()
            .ok_or(FieldError::missing("number"))?;

        let mut phone = Self {
            number: Self::check_number(number)?,
            ..Self::default()
        };
        let mut leftovers = Vec::new();

        for segment in rest.iter().filter(|s| !s.trim().is_empty()) {
            let param = Parameter::parse(segment)?;
            let value = param.value().map(str::to_string);
            let suffix_free = phone.extra == PhoneExtra::None;
            match value {
                Some(v) if suffix_free && param.is(ISDN_SUBADDRESS_PARAM) => {
                    phone.extra = PhoneExtra::IsdnSubAddress(v);
                }
                Some(v) if suffix_free && param.is(EXTENSION_PARAM) => {
                    phone.extra = PhoneExtra::Extension(v);
                }
                Some(v) if phone.context.is_none() && param.is(PHONE_CONTEXT_PARAM) => {
                    phone.context = Self::normalize_context(Some(&v));
                }
                _ => leftovers.push(param),
            }
        }

        phone.validate()?;
        Ok(Parsed {
            value: phone,
            leftovers,
        })
    }
}

impl SchemeValue for PhoneNumber {
    const SCHEME: &'static str = TEL_SCHEME;
    type Field = PhoneField;

    /// Parses `number[;phone-context=..][;ext=..|;isub=..][;other...]`.
    ///
    /// When both `ext` and `isub` appear, the first one wins and the other is
    /// kept as a leftover parameter.
    fn parse_body(body: &str) -> Result<Parsed<Self>, ParseError> {
        Self::parse_inner(body).map_err(|kind| ParseError::new(body, kind))
    }

    fn is_empty(&self) -> bool {
        self.number.is_empty()
    }

    fn validate(&self) -> Result<(), FieldError> {
        if self.number.is_empty() {
            return Err(FieldError::missing("number"));
        }
        if self.is_local() && self.context.is_none() {
            return Err(FieldError::missing(PHONE_CONTEXT_PARAM));
        }
        Ok(())
    }

    fn check_leftovers(&self, leftovers: &[Parameter]) -> Result<(), FieldError> {
        let suffix_free = self.extra == PhoneExtra::None;
        let claimed = leftovers.iter().filter(|p| !p.is_bare()).find(|p| {
            (suffix_free && (p.is(EXTENSION_PARAM) || p.is(ISDN_SUBADDRESS_PARAM)))
                || (self.context.is_none() && p.is(PHONE_CONTEXT_PARAM))
        });
        match claimed {
            Some(p) => Err(FieldError::out_of_domain(
                "parameter",
                p.name(),
                "would be read back as a phone field",
            )),
            None => Ok(()),
        }
    }

    fn notifier(&self) -> &Notifier<PhoneField> {
        &self.notifier
    }

    fn notifier_mut(&mut self) -> &mut Notifier<PhoneField> {
        &mut self.notifier
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number)?;

        let mut params = Vec::with_capacity(2);
        if let Some(ctx) = &self.context {
            params.push((PHONE_CONTEXT_PARAM, ctx.as_str()));
        }
        match &self.extra {
            PhoneExtra::Extension(e) => params.push((EXTENSION_PARAM, e.as_str())),
            PhoneExtra::IsdnSubAddress(s) => params.push((ISDN_SUBADDRESS_PARAM, s.as_str())),
            PhoneExtra::None => {}
        }

        for (name, value) in params {
            if let Ok(p) = Parameter::new(name, Some(value)) {
                write!(f, "{}", p.to_segment())?;
            }
        }
        Ok(())
    }
}
