//! One-to-many table request construction.

use crate::domain::Coordinate;
use crate::engine::{TableRequest, Waypoint};
use crate::registry::{OutOfRange, Snapshot};

/// Build the request for one duration row.
///
/// The origin goes at position 0 without a hint. Each requested station
/// follows in the order given, with its resolved coordinate and cached hint.
/// Fails on the first index outside `snapshot`, before anything is sent.
pub fn build_row_request(
    snapshot: &Snapshot,
    origin: Coordinate,
    indices: &[usize],
) -> Result<TableRequest, OutOfRange> {
    let destinations = indices
        .iter()
        .map(|&i| {
            snapshot.get(i).map(|station| Waypoint {
                coordinate: station.resolved,
                hint: station.hint.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TableRequest::one_to_many(origin, destinations))
}
