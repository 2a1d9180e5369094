//! Domain types for the station router.
//!
//! Coordinates, engine hints and registered stations. These are plain
//! values with validation at construction, so the rest of the crate can
//! assume they are well formed.

mod coord;
mod hint;
mod station;

pub use coord::{Coordinate, InvalidCoordinate};
pub use hint::{Hint, InvalidHint};
pub use station::Station;
