//! Engines with scripted behaviour for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};

use crate::domain::{Coordinate, Hint};
use crate::engine::{EngineError, RoutingEngine, Snapped, TableRequest};

/// Longitude at or beyond which [`ScriptedEngine`] finds nothing to snap to.
pub const NO_MATCH_LON: f64 = 100.0;

/// Longitude at or beyond which [`ScriptedEngine`] fails the snap request.
pub const ERROR_LON: f64 = 150.0;

/// Engine whose answers depend only on its inputs.
///
/// Snapping shifts the latitude by `0.25` and encodes the input longitude
/// in the hint. Longitudes at or beyond [`NO_MATCH_LON`] find no match,
/// beyond [`ERROR_LON`] the request errors. Table durations are the
/// destination's position times ten seconds; a destination whose
/// longitude is negative is unreachable.
#[derive(Default)]
pub struct ScriptedEngine {
    pub table_calls: AtomicUsize,
    pub last_request: Mutex<Option<TableRequest>>,
    /// Response returned verbatim from `table` instead of the computed one.
    pub table_override: Mutex<Option<Result<Value, String>>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn override_table(&self, response: Result<Value, String>) {
        *self.table_override.lock().unwrap() = Some(response);
    }

    pub fn table_calls(&self) -> usize {
        self.table_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<TableRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl RoutingEngine for ScriptedEngine {
    async fn snap_nearest(
        &self,
        coordinate: Coordinate,
        _radius: Option<f64>,
    ) -> Result<Option<Snapped>, EngineError> {
        let lon = coordinate.lon();
        if lon >= ERROR_LON {
            return Err(EngineError::Malformed("scripted snap failure".into()));
        }
        if lon >= NO_MATCH_LON {
            return Ok(None);
        }

        let lat = (coordinate.lat() + 0.25).min(90.0);
        Ok(Some(Snapped {
            location: Coordinate::new(lon, lat).map_err(|e| EngineError::Malformed(e.to_string()))?,
            hint: Hint::encode(format!("lon:{lon}").as_bytes()),
            distance: Some(111.0),
        }))
    }

    async fn table(&self, request: &TableRequest) -> Result<Value, EngineError> {
        self.table_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(response) = self.table_override.lock().unwrap().clone() {
            return response.map_err(|message| EngineError::Api {
                status: 500,
                message,
            });
        }

        request.validate()?;
        let row: Vec<Value> = request
            .destinations
            .iter()
            .map(|&d| {
                if request.waypoints[d].coordinate.lon() < 0.0 {
                    Value::Null
                } else {
                    json!(d as f64 * 10.0)
                }
            })
            .collect();

        Ok(json!({"code": "Ok", "durations": [row]}))
    }
}
