//! Geographic coordinate types
//!
//! A coordinate layer on a photo is `Option<GeoPoint>`: the source system's
//! `-360.0` "no coordinate" sentinel is translated to `None` at the decode
//! boundary, so a layer is either fully present (valid latitude and
//! longitude) or fully absent. Altitude is independently optional within a
//! present point.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Valid latitude range in decimal degrees
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
/// Valid longitude range in decimal degrees
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// A single geographic position in decimal degrees, altitude in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
        }
    }

    pub fn with_altitude(latitude: f64, longitude: f64, altitude: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

/// Validate a latitude/longitude pair against the legal coordinate ranges.
///
/// Used by manual placement and predefined-position loading. Zero is a valid
/// coordinate; absence is expressed with `None`, never with a magic value.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if LATITUDE_RANGE.contains(&latitude) && LONGITUDE_RANGE.contains(&longitude) {
        Ok(())
    } else {
        Err(Error::InvalidCoordinate {
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_range_boundaries() {
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(-90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, 180.1).is_err());
        assert!(validate_coordinates(0.0, -180.1).is_err());
        // the legacy absent sentinel must never validate
        assert!(validate_coordinates(-360.0, -360.0).is_err());
    }
}
