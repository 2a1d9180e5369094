//! Station registry: snap-and-cache.
//!
//! Registration snaps every station to the road network once and keeps the
//! engine's hint for it, so later table queries can reuse both. The registry
//! is held as an immutable [`Snapshot`] behind an `Arc`; registering swaps in
//! a complete new snapshot, so a query always resolves all of its indices
//! against one registration.

mod snapshot;

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::domain::{Coordinate, Station};
use crate::engine::RoutingEngine;

pub use snapshot::{OutOfRange, Snapshot};

/// Outcome counts of one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationSummary {
    /// Generation number of the new snapshot.
    pub generation: u64,
    /// Number of stations registered.
    pub total: usize,
    /// Stations the engine snapped.
    pub snapped: usize,
    /// Stations kept at their raw coordinate without a hint.
    pub fallback: usize,
}

/// Index-stable station list shared between registration and queries.
pub struct StationRegistry {
    current: RwLock<Arc<Snapshot>>,
    /// Serializes registrations so generations are swapped in order.
    registering: Mutex<()>,
    snap_radius: Option<f64>,
    snap_concurrency: usize,
}

impl StationRegistry {
    /// Create an empty registry.
    ///
    /// `snap_radius` bounds the nearest search in metres (`None` means
    /// unlimited). `snap_concurrency` is the number of snap requests kept in
    /// flight during registration; 1 snaps strictly one after another.
    pub fn new(snap_radius: Option<f64>, snap_concurrency: usize) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::default())),
            registering: Mutex::new(()),
            snap_radius,
            snap_concurrency: snap_concurrency.max(1),
        }
    }

    /// Replace the registry with `coordinates`, snapping each one.
    ///
    /// Station `i` of the new registry always corresponds to `coordinates[i]`.
    /// A station the engine cannot snap, for whatever reason, keeps its raw
    /// coordinate and gets no hint; this never fails the registration.
    pub async fn register<E: RoutingEngine>(
        &self,
        engine: &E,
        coordinates: Vec<Coordinate>,
    ) -> RegistrationSummary {
        let _registering = self.registering.lock().await;
        let generation = self.current.read().await.generation() + 1;
        let radius = self.snap_radius;

        let pending: Vec<_> = coordinates
            .into_iter()
            .enumerate()
            .map(|(index, raw)| snap_station(engine, index, raw, radius))
            .collect();

        // `buffered` yields results in input order regardless of which
        // request finishes first
        let stations: Vec<Station> = stream::iter(pending)
            .buffered(self.snap_concurrency)
            .collect()
            .await;

        let snapped = stations.iter().filter(|s| s.is_snapped()).count();
        let summary = RegistrationSummary {
            generation,
            total: stations.len(),
            snapped,
            fallback: stations.len() - snapped,
        };

        *self.current.write().await = Arc::new(Snapshot::new(generation, stations));

        info!(
            generation,
            total = summary.total,
            snapped = summary.snapped,
            fallback = summary.fallback,
            "registered stations"
        );
        summary
    }

    /// The current snapshot.
    ///
    /// The returned `Arc` stays valid and unchanged even if a registration
    /// replaces the registry afterwards.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    /// Resolved coordinate and hint of station `index`.
    pub async fn get(&self, index: usize) -> Result<Station, OutOfRange> {
        self.snapshot().await.get(index).cloned()
    }

    pub async fn len(&self) -> usize {
        self.current.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.current.read().await.is_empty()
    }

    pub async fn generation(&self) -> u64 {
        self.current.read().await.generation()
    }

    pub fn snap_radius(&self) -> Option<f64> {
        self.snap_radius
    }
}

/// Snap one station, falling back to the raw coordinate.
async fn snap_station<E: RoutingEngine>(
    engine: &E,
    index: usize,
    raw: Coordinate,
    radius: Option<f64>,
) -> Station {
    match engine.snap_nearest(raw, radius).await {
        Ok(Some(snapped)) => Station::snapped(
            index,
            raw,
            snapped.location,
            snapped.hint,
            snapped.distance,
        ),
        Ok(None) => {
            debug!(index, %raw, "no routable point within radius, keeping raw coordinate");
            Station::unsnapped(index, raw)
        }
        Err(e) => {
            debug!(index, %raw, error = %e, "snap failed, keeping raw coordinate");
            Station::unsnapped(index, raw)
        }
    }
}
