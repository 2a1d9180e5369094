//! Router error types.

use crate::domain::InvalidCoordinate;
use crate::engine::EngineError;
use crate::query::DecodeError;
use crate::registry::OutOfRange;

/// Errors surfaced by [`crate::router::StationRouter`].
///
/// Per-station snap failures never appear here; registration absorbs them.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// The engine could not be initialised
    #[error("cannot start engine: {0}")]
    EngineInit(#[source] EngineError),

    /// Caller supplied an invalid coordinate
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),

    /// Caller referenced a station outside the registry
    #[error("station index {index} out of range for registry of {len}")]
    OutOfRange { index: i64, len: usize },

    /// The engine failed to answer the query
    #[error("engine query failed: {0}")]
    Engine(#[source] EngineError),

    /// The engine's answer could not be decoded
    #[error("failed to decode engine response: {0}")]
    Decode(#[from] DecodeError),
}

impl From<OutOfRange> for RouterError {
    fn from(e: OutOfRange) -> Self {
        RouterError::OutOfRange {
            index: e.index,
            len: e.len,
        }
    }
}
