//! Station router: registry, query builder, decoder and row cache together.
//!
//! This is the surface host applications use. It exposes the two boundary
//! operations, registering a station set and computing a duration row
//! from an origin to a subset of stations, plus single-station lookup.

use tracing::{debug, warn};

use crate::cache::{CacheConfig, RowCache};
use crate::domain::{Coordinate, Station};
use crate::engine::RoutingEngine;
use crate::error::RouterError;
use crate::query::{DurationRow, build_row_request, decode_row};
use crate::registry::{OutOfRange, RegistrationSummary, StationRegistry};

/// Default nearest-search radius in metres.
pub const DEFAULT_SNAP_RADIUS_M: f64 = 100.0;

/// Configuration for a [`StationRouter`].
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Nearest-search radius used when registering stations, in metres.
    /// `None` searches without limit.
    pub snap_radius: Option<f64>,

    /// Snap requests kept in flight during registration.
    pub snap_concurrency: usize,

    /// Row cache settings.
    pub cache: CacheConfig,
}

impl RouterConfig {
    /// Set the snap radius.
    pub fn with_snap_radius(mut self, radius: Option<f64>) -> Self {
        self.snap_radius = radius;
        self
    }

    /// Set the number of concurrent snap requests.
    pub fn with_snap_concurrency(mut self, n: usize) -> Self {
        self.snap_concurrency = n;
        self
    }

    /// Set the row cache configuration.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            snap_radius: Some(DEFAULT_SNAP_RADIUS_M),
            snap_concurrency: 1,
            cache: CacheConfig::default(),
        }
    }
}

/// Caching, batching front end to a routing engine.
pub struct StationRouter<E> {
    engine: E,
    registry: StationRegistry,
    cache: Option<RowCache>,
}

impl<E: RoutingEngine> StationRouter<E> {
    /// Create a router with an empty registry.
    pub fn new(engine: E, config: RouterConfig) -> Self {
        let cache = config
            .cache
            .is_enabled()
            .then(|| RowCache::new(&config.cache));

        Self {
            engine,
            registry: StationRegistry::new(config.snap_radius, config.snap_concurrency),
            cache,
        }
    }

    /// Replace the registry with `coordinates`.
    ///
    /// Cached rows all belong to older generations afterwards and are dropped.
    pub async fn register(&self, coordinates: Vec<Coordinate>) -> RegistrationSummary {
        let summary = self.registry.register(&self.engine, coordinates).await;
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
        summary
    }

    /// Replace the registry from a flat `[lon0, lat0, lon1, lat1, ...]`
    /// sequence.
    ///
    /// Invalid input is rejected before the registry is touched.
    pub async fn register_stations(
        &self,
        flat: &[f64],
    ) -> Result<RegistrationSummary, RouterError> {
        let coordinates = Coordinate::from_flat(flat)?;
        Ok(self.register(coordinates).await)
    }

    /// Station `index` of the current registry.
    ///
    /// Negative indices are out of range.
    pub async fn station(&self, index: i64) -> Result<Station, RouterError> {
        let snapshot = self.registry.snapshot().await;
        Ok(snapshot.get_signed(index)?.clone())
    }

    /// Travel times from `origin` to each of `indices`, in the same order.
    ///
    /// All indices resolve against one registry snapshot. Either a row with
    /// one entry per index is returned or an error; never a partial row.
    pub async fn compute_row(
        &self,
        origin: Coordinate,
        indices: &[usize],
    ) -> Result<DurationRow, RouterError> {
        let snapshot = self.registry.snapshot().await;
        let request = build_row_request(&snapshot, origin, indices)?;

        // The engine rejects tables without destinations
        if indices.is_empty() {
            return Ok(DurationRow::default());
        }

        let generation = snapshot.generation();
        if let Some(cache) = &self.cache
            && let Some(row) = cache.get(generation, origin, indices).await
        {
            debug!(generation, destinations = indices.len(), "row cache hit");
            return Ok(row);
        }

        let response = self.engine.table(&request).await.map_err(|e| {
            warn!(error = %e, "table query failed");
            RouterError::Engine(e)
        })?;

        let row = decode_row(response, indices.len()).inspect_err(|e| {
            warn!(error = %e, "table response rejected");
        })?;

        if let Some(cache) = &self.cache {
            cache.insert(generation, origin, indices, row.clone()).await;
        }

        Ok(row)
    }

    /// Boundary form of [`compute_row`](Self::compute_row).
    ///
    /// Takes a raw origin and signed indices and returns `f32` seconds with
    /// `-1.0` for unreachable stations.
    pub async fn compute_table_indexed(
        &self,
        origin_lon: f64,
        origin_lat: f64,
        indices: &[i64],
    ) -> Result<Vec<f32>, RouterError> {
        let origin = Coordinate::new(origin_lon, origin_lat)?;
        let len = self.registry.len().await;
        let indices = indices
            .iter()
            .map(|&i| usize::try_from(i).map_err(|_| OutOfRange { index: i, len }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.compute_row(origin, &indices).await?.to_sentinel_vec())
    }

    pub fn registry(&self) -> &StationRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Number of cached rows, or `None` if caching is disabled.
    pub fn cached_rows(&self) -> Option<u64> {
        self.cache.as_ref().map(RowCache::entry_count)
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
