//! Caching layer for decoded duration rows.
//!
//! A row is fully determined by the registry contents, the origin and the
//! requested indices. The registry generation stands in for its contents,
//! so re-registering stations makes every older entry unreachable. The
//! router also clears the cache on each registration.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::Coordinate;
use crate::query::DurationRow;

/// Cache key for rows: (registry generation, origin bits, station indices).
type RowKey = (u64, (u64, u64), Vec<usize>);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries. Zero disables the cache.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// A configuration with caching turned off.
    pub fn disabled() -> Self {
        Self {
            max_capacity: 0,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_capacity > 0
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 10_000,
        }
    }
}

/// Cache for decoded duration rows.
pub struct RowCache {
    rows: MokaCache<RowKey, DurationRow>,
}

impl RowCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let rows = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { rows }
    }

    fn key(generation: u64, origin: Coordinate, indices: &[usize]) -> RowKey {
        (generation, origin.to_bits(), indices.to_vec())
    }

    /// Get a cached row.
    pub async fn get(
        &self,
        generation: u64,
        origin: Coordinate,
        indices: &[usize],
    ) -> Option<DurationRow> {
        self.rows.get(&Self::key(generation, origin, indices)).await
    }

    /// Insert a row into the cache.
    pub async fn insert(
        &self,
        generation: u64,
        origin: Coordinate,
        indices: &[usize],
        row: DurationRow,
    ) {
        self.rows
            .insert(Self::key(generation, origin, indices), row)
            .await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.rows.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.rows.invalidate_all();
    }
}
