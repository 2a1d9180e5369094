//! Registered station entries.

use super::{Coordinate, Hint};

/// One entry in the station registry.
///
/// `resolved` is the engine's snapped location when snapping succeeded and
/// equals `raw` otherwise. `hint` is present exactly when snapping succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Position in the registry, assigned in registration order.
    pub index: usize,

    /// Coordinate as supplied by the caller.
    pub raw: Coordinate,

    /// Coordinate used in later queries.
    pub resolved: Coordinate,

    /// Engine locator for `resolved`, if snapping succeeded.
    pub hint: Option<Hint>,

    /// Distance in metres between `raw` and `resolved`, when the engine
    /// reported one.
    pub snap_distance: Option<f64>,
}

impl Station {
    /// A station whose snap succeeded.
    pub fn snapped(
        index: usize,
        raw: Coordinate,
        resolved: Coordinate,
        hint: Hint,
        snap_distance: Option<f64>,
    ) -> Self {
        Self {
            index,
            raw,
            resolved,
            hint: Some(hint),
            snap_distance,
        }
    }

    /// A station that fell back to its raw coordinate.
    pub fn unsnapped(index: usize, raw: Coordinate) -> Self {
        Self {
            index,
            raw,
            resolved: raw,
            hint: None,
            snap_distance: None,
        }
    }

    /// Whether the engine snapped this station.
    pub fn is_snapped(&self) -> bool {
        self.hint.is_some()
    }
}
