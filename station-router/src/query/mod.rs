//! Matrix queries against the station registry.
//!
//! [`build_row_request`] turns an origin and a list of registry indices into
//! a one-to-many table request; [`decode_row`] extracts the resulting row
//! from the engine's response.

mod builder;
mod decode;
mod row;

pub use builder::build_row_request;
pub use decode::{DecodeError, decode_row};
pub use row::{DurationRow, UNREACHABLE};
