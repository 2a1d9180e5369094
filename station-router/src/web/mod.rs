//! Web layer for the station router.
//!
//! Exposes registration and duration queries over HTTP, so host
//! applications exchange plain JSON values instead of raw buffers.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
