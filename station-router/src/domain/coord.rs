//! WGS84 coordinate type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Error returned when constructing a coordinate from invalid values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lon}, {lat}): {reason}")]
pub struct InvalidCoordinate {
    pub lon: f64,
    pub lat: f64,
    reason: &'static str,
}

/// A (longitude, latitude) pair in degrees.
///
/// Both components are finite, longitude lies in `[-180, 180]` and latitude
/// in `[-90, 90]`. The order matches the engine's wire format, which puts
/// longitude first.
///
/// # Examples
///
/// ```
/// use station_router::domain::Coordinate;
///
/// let c = Coordinate::new(10.0, 50.0).unwrap();
/// assert_eq!(c.lon(), 10.0);
/// assert_eq!(c.lat(), 50.0);
///
/// assert!(Coordinate::new(181.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    lon: f64,
    lat: f64,
}

impl Coordinate {
    /// Create a coordinate, validating both components.
    pub fn new(lon: f64, lat: f64) -> Result<Self, InvalidCoordinate> {
        let invalid = |reason| InvalidCoordinate { lon, lat, reason };

        if !lon.is_finite() || !lat.is_finite() {
            return Err(invalid("components must be finite"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }

        Ok(Self { lon, lat })
    }

    /// Parse a flat `[lon0, lat0, lon1, lat1, ...]` sequence into coordinates.
    pub fn from_flat(values: &[f64]) -> Result<Vec<Self>, InvalidCoordinate> {
        let pairs = values.chunks_exact(2);
        if let [lon] = pairs.remainder() {
            return Err(InvalidCoordinate {
                lon: *lon,
                lat: f64::NAN,
                reason: "flat sequence has an odd number of values",
            });
        }

        pairs.map(|pair| Self::new(pair[0], pair[1])).collect()
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Great-circle distance to `other` in metres (haversine).
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

        EARTH_RADIUS_M * 2.0 * a.sqrt().min(1.0).asin()
    }

    /// Bit patterns of both components, usable as an exact hash key.
    pub(crate) fn to_bits(self) -> (u64, u64) {
        (self.lon.to_bits(), self.lat.to_bits())
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from([lon, lat]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(lon, lat)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lon, c.lat]
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lon, self.lat)
    }
}

/// Formats as `lon,lat`, the form used in engine URLs.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert!(Coordinate::new(-180.0, -90.0).is_ok());
        assert!(Coordinate::new(180.0, 90.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(180.5, 0.0).is_err());
        assert!(Coordinate::new(-180.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, 90.5).is_err());
        assert!(Coordinate::new(0.0, -90.5).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn from_flat_pairs_values() {
        let coords = Coordinate::from_flat(&[10.0, 50.0, 10.1, 50.1]).unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0], Coordinate::new(10.0, 50.0).unwrap());
        assert_eq!(coords[1], Coordinate::new(10.1, 50.1).unwrap());
    }

    #[test]
    fn from_flat_empty() {
        assert!(Coordinate::from_flat(&[]).unwrap().is_empty());
    }

    #[test]
    fn from_flat_rejects_odd_length() {
        let err = Coordinate::from_flat(&[10.0, 50.0, 10.1]).unwrap_err();
        assert!(err.to_string().contains("odd number"));
    }

    #[test]
    fn from_flat_rejects_invalid_pair() {
        assert!(Coordinate::from_flat(&[10.0, 50.0, 10.0, 95.0]).is_err());
    }

    #[test]
    fn display_is_lon_first() {
        let c = Coordinate::new(9.9217, 57.0488).unwrap();
        assert_eq!(c.to_string(), "9.9217,57.0488");
    }

    #[test]
    fn serde_as_pair() {
        let c: Coordinate = serde_json::from_str("[10.5, 55.25]").unwrap();
        assert_eq!(c.lon(), 10.5);
        assert_eq!(c.lat(), 55.25);
        assert_eq!(serde_json::to_string(&c).unwrap(), "[10.5,55.25]");

        assert!(serde_json::from_str::<Coordinate>("[200.0, 0.0]").is_err());
    }

    #[test]
    fn haversine_distance() {
        // Aalborg to Aarhus is roughly 100 km as the crow flies
        let aalborg = Coordinate::new(9.9217, 57.0488).unwrap();
        let aarhus = Coordinate::new(10.2039, 56.1629).unwrap();
        let d = aalborg.distance_m(&aarhus);
        assert!((d - 99_600.0).abs() < 2_000.0, "got {d}");
        assert_eq!(aalborg.distance_m(&aalborg), 0.0);
    }
}
