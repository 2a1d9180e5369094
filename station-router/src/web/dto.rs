//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Hint, Station};
use crate::registry::RegistrationSummary;

/// Request to replace the station registry.
#[derive(Debug, Deserialize)]
pub struct RegisterStationsRequest {
    /// Flat `[lon0, lat0, lon1, lat1, ...]` sequence
    pub coordinates: Vec<f64>,
}

/// Result of a registration.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisterStationsResponse {
    /// Registry generation created by this call
    pub generation: u64,

    /// Number of stations registered
    pub total: usize,

    /// Stations snapped to the road network
    pub snapped: usize,

    /// Stations kept at their raw coordinate
    pub fallback: usize,
}

/// A registered station.
#[derive(Debug, Serialize, Deserialize)]
pub struct StationResponse {
    pub index: usize,

    /// Resolved longitude used in queries
    pub lon: f64,

    /// Resolved latitude used in queries
    pub lat: f64,

    /// Longitude as registered
    pub raw_lon: f64,

    /// Latitude as registered
    pub raw_lat: f64,

    /// Engine hint, absent if the station was not snapped
    pub hint: Option<Hint>,

    /// Snap distance in metres
    pub snap_distance: Option<f64>,
}

/// Request for one duration row.
#[derive(Debug, Deserialize)]
pub struct TableQueryRequest {
    /// Origin longitude
    pub lon: f64,

    /// Origin latitude
    pub lat: f64,

    /// Registry indices, in the order the durations should come back
    pub indices: Vec<i64>,
}

/// Durations in seconds, `-1.0` where unreachable.
#[derive(Debug, Serialize, Deserialize)]
pub struct TableQueryResponse {
    pub durations: Vec<f32>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl From<RegistrationSummary> for RegisterStationsResponse {
    fn from(summary: RegistrationSummary) -> Self {
        Self {
            generation: summary.generation,
            total: summary.total,
            snapped: summary.snapped,
            fallback: summary.fallback,
        }
    }
}

impl From<Station> for StationResponse {
    fn from(station: Station) -> Self {
        Self {
            index: station.index,
            lon: station.resolved.lon(),
            lat: station.resolved.lat(),
            raw_lon: station.raw.lon(),
            raw_lat: station.raw.lat(),
            hint: station.hint,
            snap_distance: station.snap_distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;

    #[test]
    fn station_response_from_unsnapped() {
        let raw = Coordinate::new(10.0, 50.0).unwrap();
        let response = StationResponse::from(Station::unsnapped(4, raw));
        assert_eq!(response.index, 4);
        assert_eq!(response.lon, 10.0);
        assert_eq!(response.raw_lat, 50.0);
        assert!(response.hint.is_none());
    }

    #[test]
    fn station_response_serializes_hint() {
        let raw = Coordinate::new(10.0, 50.0).unwrap();
        let resolved = Coordinate::new(10.001, 50.0).unwrap();
        let station = Station::snapped(0, raw, resolved, Hint::encode(b"node:0"), Some(71.0));

        let json = serde_json::to_value(StationResponse::from(station)).unwrap();
        assert_eq!(json["hint"], "bm9kZTow");
        assert_eq!(json["lon"], 10.001);
        assert_eq!(json["snap_distance"], 71.0);
    }

    #[test]
    fn station_response_rejects_invalid_hint() {
        let body = r#"{"index": 0, "lon": 10.0, "lat": 50.0, "raw_lon": 10.0,
            "raw_lat": 50.0, "hint": "not a hint!", "snap_distance": null}"#;
        assert!(serde_json::from_str::<StationResponse>(body).is_err());

        let body = body.replace("not a hint!", "bm9kZTow");
        let response: StationResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(response.hint, Some(Hint::encode(b"node:0")));
    }

    #[test]
    fn table_request_parses() {
        let req: TableQueryRequest =
            serde_json::from_str(r#"{"lon": 10.05, "lat": 50.05, "indices": [1, 0, -2]}"#).unwrap();
        assert_eq!(req.indices, vec![1, 0, -2]);
    }
}
