//! Application state for the web layer.

use std::sync::Arc;

use crate::engine::Engine;
use crate::router::StationRouter;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Station router in front of the configured engine
    pub router: Arc<StationRouter<Engine>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(router: StationRouter<Engine>) -> Self {
        Self {
            router: Arc::new(router),
        }
    }
}
