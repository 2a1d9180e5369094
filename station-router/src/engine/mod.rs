//! Routing engine clients.
//!
//! The routing engine is an external collaborator. This module defines the
//! two operations the rest of the crate needs from it, nearest-point snapping
//! and duration tables, and provides two implementations:
//!
//! - [`OsrmClient`] talks to a running `osrm-routed` over HTTP
//! - [`MockEngine`] answers from a small JSON network file, for tests and
//!   offline development

mod client;
mod error;
mod mock;
mod types;

use std::future::Future;

use serde_json::Value;

use crate::domain::Coordinate;

pub use client::{OsrmClient, OsrmConfig};
pub use error::EngineError;
pub use mock::{MockEngine, MockNetwork, MockNode};
pub use types::{
    CODE_NO_SEGMENT, CODE_OK, NearestResponse, NearestWaypoint, Snapped, TableRequest, Waypoint,
};

/// Read-only operations of a routing engine.
///
/// Implementations must be safe to call concurrently; neither operation
/// mutates engine state.
pub trait RoutingEngine: Send + Sync {
    /// Snap `coordinate` to the nearest routable point.
    ///
    /// `radius` limits the search in metres; `None` means unlimited.
    /// Returns `Ok(None)` when nothing routable lies within the radius.
    fn snap_nearest(
        &self,
        coordinate: Coordinate,
        radius: Option<f64>,
    ) -> impl Future<Output = Result<Option<Snapped>, EngineError>> + Send;

    /// Compute a duration table and return the engine's raw response.
    fn table(
        &self,
        request: &TableRequest,
    ) -> impl Future<Output = Result<Value, EngineError>> + Send;
}

/// Engine selected at startup.
#[derive(Debug, Clone)]
pub enum Engine {
    Osrm(OsrmClient),
    Mock(MockEngine),
}

impl RoutingEngine for Engine {
    async fn snap_nearest(
        &self,
        coordinate: Coordinate,
        radius: Option<f64>,
    ) -> Result<Option<Snapped>, EngineError> {
        match self {
            Engine::Osrm(client) => client.snap_nearest(coordinate, radius).await,
            Engine::Mock(mock) => mock.snap_nearest(coordinate, radius).await,
        }
    }

    async fn table(&self, request: &TableRequest) -> Result<Value, EngineError> {
        match self {
            Engine::Osrm(client) => client.table(request).await,
            Engine::Mock(mock) => mock.table(request).await,
        }
    }
}
