//! Request and response types shared by engine clients.
//!
//! The nearest-service response is parsed eagerly into a [`Snapped`] value.
//! Table responses are handed back as raw JSON and decoded by
//! [`crate::query::decode_row`], so every engine implementation goes through
//! the same decoder.

use serde::Deserialize;

use crate::domain::{Coordinate, Hint};

use super::error::EngineError;

/// Response code OSRM uses for a successful request.
pub const CODE_OK: &str = "Ok";

/// Response code OSRM uses when nothing routable lies within the radius.
pub const CODE_NO_SEGMENT: &str = "NoSegment";

/// Result of a successful nearest search.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapped {
    /// The routable point the input was moved to.
    pub location: Coordinate,
    /// Engine locator for `location`.
    pub hint: Hint,
    /// Distance from the input coordinate, in metres.
    pub distance: Option<f64>,
}

/// One position in a table request.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub coordinate: Coordinate,
    pub hint: Option<Hint>,
}

impl Waypoint {
    /// A position the engine has to locate itself.
    pub fn bare(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            hint: None,
        }
    }
}

/// A duration-matrix request.
///
/// `sources` and `destinations` are positions into `waypoints`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRequest {
    pub waypoints: Vec<Waypoint>,
    pub sources: Vec<usize>,
    pub destinations: Vec<usize>,
}

impl TableRequest {
    /// Build a one-to-many request: `origin` at position 0 is the only
    /// source and every following position is a destination.
    pub fn one_to_many(origin: Coordinate, destinations: Vec<Waypoint>) -> Self {
        let count = destinations.len();
        let mut waypoints = Vec::with_capacity(count + 1);
        waypoints.push(Waypoint::bare(origin));
        waypoints.extend(destinations);

        Self {
            waypoints,
            sources: vec![0],
            destinations: (1..=count).collect(),
        }
    }

    /// Check that every source and destination refers to a waypoint.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sources.is_empty() || self.destinations.is_empty() {
            return Err(EngineError::InvalidRequest(
                "table needs at least one source and one destination".to_string(),
            ));
        }

        let len = self.waypoints.len();
        if let Some(pos) = self
            .sources
            .iter()
            .chain(&self.destinations)
            .find(|&&p| p >= len)
        {
            return Err(EngineError::InvalidRequest(format!(
                "position {pos} out of range for {len} waypoints"
            )));
        }

        Ok(())
    }
}

/// Body of a nearest-service response.
#[derive(Debug, Deserialize)]
pub struct NearestResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub waypoints: Vec<NearestWaypoint>,
}

/// A waypoint in a nearest-service response.
#[derive(Debug, Deserialize)]
pub struct NearestWaypoint {
    #[serde(default)]
    pub location: Option<[f64; 2]>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
}

impl NearestResponse {
    /// Turn the response into a snap result.
    ///
    /// `NoSegment` is a normal "nothing within radius" answer. Any other
    /// non-`Ok` code, or a first waypoint missing its location or hint, is
    /// an error.
    pub fn into_snapped(self) -> Result<Option<Snapped>, EngineError> {
        if self.code == CODE_NO_SEGMENT {
            return Ok(None);
        }
        if self.code != CODE_OK {
            return Err(EngineError::Code {
                code: self.code,
                message: self.message.unwrap_or_default(),
            });
        }

        let waypoint = self
            .waypoints
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::Malformed("nearest response has no waypoints".into()))?;

        let [lon, lat] = waypoint
            .location
            .ok_or_else(|| EngineError::Malformed("waypoint has no location".into()))?;
        let location =
            Coordinate::new(lon, lat).map_err(|e| EngineError::Malformed(e.to_string()))?;

        let hint = waypoint
            .hint
            .ok_or_else(|| EngineError::Malformed("waypoint has no hint".into()))?;
        let hint = Hint::parse(&hint).map_err(|e| EngineError::Malformed(e.to_string()))?;

        Ok(Some(Snapped {
            location,
            hint,
            distance: waypoint.distance,
        }))
    }
}
