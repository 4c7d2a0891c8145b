//! Geographic locations carried in `geo:` URIs (RFC 5870).

use std::fmt::{self, Write};

use log::debug;

use crate::constants::{
    CRS_PARAM, DEFAULT_CRS, GEO_SCHEME, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE,
    UNCERTAINTY_PARAM,
};
use crate::error::{FieldError, ParseError, ParseErrorKind};
use crate::notify::{Notifier, set_field};
use crate::param::Parameter;
use crate::split::non_quoted_split_on_first;
use crate::value::{Parsed, SchemeValue};

/// Fields of a [`GeoLocation`], as reported to change listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoField {
    /// Latitude in decimal degrees
    Latitude,
    /// Longitude in decimal degrees
    Longitude,
    /// Altitude in meters
    Altitude,
    /// Uncertainty in meters
    Uncertainty,
    /// Coordinate reference system label
    Crs,
}

/// A point on (or above) the globe.
///
/// At either pole every longitude names the same point, so the longitude of
/// a pole is always 0.
///
/// # Examples
///
/// ```
/// use typed_uri::GeoLocation;
///
/// let mut geo = GeoLocation::new(45.5, -122.6).unwrap();
/// geo.set_altitude(Some(35.0)).unwrap();
/// geo.set_uncertainty(Some(10.0)).unwrap();
/// assert_eq!(geo.to_string(), "45.5,-122.6,35;u=10");
///
/// geo.set_latitude(90.0).unwrap();
/// assert_eq!(geo.longitude(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    latitude: f64,
    longitude: f64,
    altitude: Option<f64>,
    uncertainty: Option<f64>,
    crs: Option<String>,
    notifier: Notifier<GeoField>,
}

impl GeoLocation {
    /// Creates a location from latitude and longitude in decimal degrees.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::OutOfDomainValue` if latitude is outside
    /// [-90, 90] or longitude is outside [-180, 180] (NaN included).
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, FieldError> {
        let latitude = Self::check_latitude(latitude)?;
        let longitude = Self::check_longitude(longitude)?;
        Ok(Self {
            latitude,
            longitude: if Self::pole(latitude) { 0.0 } else { longitude },
            altitude: None,
            uncertainty: None,
            crs: None,
            notifier: Notifier::new(),
        })
    }

    /// Returns the latitude.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude. Always 0 at a pole.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns the altitude, if any.
    #[must_use]
    pub const fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    /// Returns the uncertainty, if any.
    #[must_use]
    pub const fn uncertainty(&self) -> Option<f64> {
        self.uncertainty
    }

    /// Returns the explicit, non-default CRS label, if any.
    #[must_use]
    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }

    /// Returns the effective CRS label.
    #[must_use]
    pub fn crs_label(&self) -> &str {
        self.crs.as_deref().unwrap_or(DEFAULT_CRS)
    }

    /// Returns true if the location is one of the poles.
    #[must_use]
    pub fn is_pole(&self) -> bool {
        Self::pole(self.latitude)
    }

    /// Sets the latitude. Moving onto a pole resets the longitude to 0.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::OutOfDomainValue` if outside [-90, 90].
    pub fn set_latitude(&mut self, latitude: f64) -> Result<bool, FieldError> {
        let latitude = Self::check_latitude(latitude)?;
        let mut changed =
            set_field(&mut self.latitude, latitude, GeoField::Latitude, &self.notifier);
        // -0.0 == 0.0, so set_field alone would keep a negative zero.
        if Self::pole(latitude) && (self.longitude != 0.0 || self.longitude.is_sign_negative()) {
            self.longitude = 0.0;
            self.notifier.notify(GeoField::Longitude);
            changed = true;
        }
        Ok(changed)
    }

    /// Sets the longitude. Ignored at a pole.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::OutOfDomainValue` if outside [-180, 180].
    pub fn set_longitude(&mut self, longitude: f64) -> Result<bool, FieldError> {
        let longitude = Self::check_longitude(longitude)?;
        if self.is_pole() {
            return Ok(false);
        }
        Ok(set_field(&mut self.longitude, longitude, GeoField::Longitude, &self.notifier))
    }

    /// Sets or clears the altitude.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::OutOfDomainValue` if the altitude is not finite.
    pub fn set_altitude(&mut self, altitude: Option<f64>) -> Result<bool, FieldError> {
        let altitude = Self::check_finite("altitude", altitude)?;
        Ok(set_field(&mut self.altitude, altitude, GeoField::Altitude, &self.notifier))
    }

    /// Sets or clears the uncertainty. Negative values are accepted as-is.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::OutOfDomainValue` if the uncertainty is not finite.
    pub fn set_uncertainty(&mut self, uncertainty: Option<f64>) -> Result<bool, FieldError> {
        let uncertainty = Self::check_finite("uncertainty", uncertainty)?;
        Ok(set_field(
            &mut self.uncertainty,
            uncertainty,
            GeoField::Uncertainty,
            &self.notifier,
        ))
    }

    /// Sets or clears the CRS label.
    ///
    /// Labels compare case-insensitively and are stored lower-case; the
    /// default `wgs84` and blank labels are stored as absent.
    pub fn set_crs(&mut self, crs: Option<&str>) -> bool {
        let crs = crs
            .map(|c| c.trim().to_ascii_lowercase())
            .filter(|c| !c.is_empty() && c != DEFAULT_CRS);
        set_field(&mut self.crs, crs, GeoField::Crs, &self.notifier)
    }

    #[allow(clippy::float_cmp)]
    fn pole(latitude: f64) -> bool {
        latitude.abs() == MAX_LATITUDE
    }

    fn check_latitude(latitude: f64) -> Result<f64, FieldError> {
        if (MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            Ok(latitude)
        } else {
            Err(FieldError::out_of_domain(
                "latitude",
                latitude,
                "must be within [-90, 90]",
            ))
        }
    }

    fn check_longitude(longitude: f64) -> Result<f64, FieldError> {
        if (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            Ok(longitude)
        } else {
            Err(FieldError::out_of_domain(
                "longitude",
                longitude,
                "must be within [-180, 180]",
            ))
        }
    }

    fn check_finite(field: &'static str, value: Option<f64>) -> Result<Option<f64>, FieldError> {
        match value {
            Some(v) if !v.is_finite() => Err(FieldError::out_of_domain(field, v, "must be finite")),
            _ => Ok(value),
        }
    }

    fn parse_coordinate(text: &str, name: &'static str) -> Result<f64, ParseErrorKind> {
        text.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseErrorKind::format(format!("{name} '{text}' is not a number")))
    }

    fn parse_inner(body: &str) -> Result<Parsed<Self>, ParseErrorKind> {
        let (coords, params) = non_quoted_split_on_first(body, ';').unwrap_or((body, ""));

        if !coords.contains(',') {
            return Err(ParseErrorKind::format("expected 'latitude,longitude'"));
        }
        let parts: Vec<&str> = coords.split(',').collect();
        if parts.len() > 3 {
            return Err(ParseErrorKind::format(
                "expected at most three coordinates",
            ));
        }

        let latitude = Self::parse_coordinate(parts[0], "latitude")?;
        let longitude = Self::parse_coordinate(parts[1], "longitude")?;
        let mut geo = Self::new(latitude, longitude)?;
        if let Some(alt) = parts.get(2) {
            geo.altitude = Some(Self::parse_coordinate(alt, "altitude")?);
        }

        let mut leftovers = Vec::new();
        let mut crs_seen = false;
        for param in Parameter::parse_list(params)? {
            if param.is(UNCERTAINTY_PARAM) && geo.uncertainty.is_none() {
                match param.value().and_then(|v| v.parse::<f64>().ok()) {
                    Some(u) if u.is_finite() => geo.uncertainty = Some(u),
                    _ => debug!("dropping non-numeric geo uncertainty {:?}", param.value()),
                }
            } else if param.is(CRS_PARAM) && param.value().is_some() && !crs_seen {
                crs_seen = true;
                geo.set_crs(param.value());
            } else {
                leftovers.push(param);
            }
        }

        Ok(Parsed {
            value: geo,
            leftovers,
        })
    }
}

impl SchemeValue for GeoLocation {
    const SCHEME: &'static str = GEO_SCHEME;
    type Field = GeoField;

    /// Parses `lat,long[,alt][;u=..][;crs=..][;other...]`.
    ///
    /// A non-numeric `u` is dropped rather than failing the parse.
    fn parse_body(body: &str) -> Result<Parsed<Self>, ParseError> {
        Self::parse_inner(body).map_err(|kind| ParseError::new(body, kind))
    }

    fn is_empty(&self) -> bool {
        false
    }

    /// Any `u` is claimed while no uncertainty is set, even one that does
    /// not parse.
    fn check_leftovers(&self, leftovers: &[Parameter]) -> Result<(), FieldError> {
        match leftovers.iter().find(|p| p.is(UNCERTAINTY_PARAM)) {
            Some(p) if self.uncertainty.is_none() => Err(FieldError::out_of_domain(
                "parameter",
                p.name(),
                "would be read back as the uncertainty",
            )),
            _ => Ok(()),
        }
    }

    fn notifier(&self) -> &Notifier<GeoField> {
        &self.notifier
    }

    fn notifier_mut(&mut self) -> &mut Notifier<GeoField> {
        &mut self.notifier
    }

    /// Writes `crs=wgs84` explicitly when a leftover `crs` follows, so that
    /// the leftover is not read back as the CRS.
    fn write_body(&self, out: &mut String, leftovers: &[Parameter]) {
        let _ = write!(out, "{self}");
        if self.crs.is_none() && leftovers.iter().any(|p| p.is(CRS_PARAM) && !p.is_bare()) {
            let _ = write!(out, ";{CRS_PARAM}={DEFAULT_CRS}");
        }
        Parameter::write_list(out, leftovers);
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)?;
        if let Some(alt) = self.altitude {
            write!(f, ",{alt}")?;
        }
        if let Some(u) = self.uncertainty {
            write!(f, ";{UNCERTAINTY_PARAM}={u}")?;
        }
        let crs = self
            .crs
            .as_deref()
            .and_then(|c| Parameter::new(CRS_PARAM, Some(c)).ok());
        if let Some(crs) = crs {
            write!(f, "{}", crs.to_segment())?;
        }
        Ok(())
    }
}
