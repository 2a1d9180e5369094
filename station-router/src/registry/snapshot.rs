//! Immutable registry snapshots.

use crate::domain::Station;

/// Error returned for an index outside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("station index {index} out of range for registry of {len}")]
pub struct OutOfRange {
    pub index: i64,
    pub len: usize,
}

/// One complete registration.
///
/// A snapshot never changes after it is built. Registering a new station set
/// produces a new snapshot with the next generation number.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    generation: u64,
    stations: Vec<Station>,
}

impl Snapshot {
    pub(crate) fn new(generation: u64, stations: Vec<Station>) -> Self {
        debug_assert!(stations.iter().enumerate().all(|(i, s)| s.index == i));
        Self {
            generation,
            stations,
        }
    }

    /// Registration counter; the initial empty registry is generation 0.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Look up a station by index.
    pub fn get(&self, index: usize) -> Result<&Station, OutOfRange> {
        self.stations.get(index).ok_or(OutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            len: self.stations.len(),
        })
    }

    /// Look up a station by a signed index, as received at the boundary.
    pub fn get_signed(&self, index: i64) -> Result<&Station, OutOfRange> {
        let out_of_range = OutOfRange {
            index,
            len: self.stations.len(),
        };
        let index = usize::try_from(index).map_err(|_| out_of_range)?;
        self.stations.get(index).ok_or(out_of_range)
    }
}
