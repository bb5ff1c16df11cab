//! Application state.

use std::sync::Arc;

use duel_storage::SimulationStore;

/// Application state shared across request handlers.
///
/// Read-only after startup; requests share nothing mutable.
pub(crate) struct AppState {
    /// Backing store for simulation records.
    pub(crate) store: Arc<dyn SimulationStore>,
    /// Exact-match CORS origin allow-list.
    pub(crate) allowed_origins: Vec<String>,
}

impl AppState {
    pub(crate) fn new(store: Arc<dyn SimulationStore>, allowed_origins: Vec<String>) -> Self {
        Self {
            store,
            allowed_origins,
        }
    }

    pub(crate) fn is_allowed_origin(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }
}
