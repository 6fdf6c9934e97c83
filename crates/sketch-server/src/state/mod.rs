//! Application state.

pub mod store;

pub use store::{CommittedPlan, FleetStore, RegisterOutcome, StoreError};

use crate::catalog::ShapeCatalog;
use crate::config::Config;

/// Shared state injected into every route: the live fleet plus the
/// read-only shape catalog.
pub struct AppState {
    pub store: FleetStore,
    pub catalog: ShapeCatalog,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            store: FleetStore::new(config),
            catalog: ShapeCatalog::builtin(),
        }
    }
}
