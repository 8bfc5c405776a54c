//! Application State

use std::sync::Arc;

use checkout_payments::{ConfirmationOrchestrator, ProductCatalog};

use crate::config::StoreConfig;

/// Shared application state.
///
/// The processor handle lives inside the orchestrator and is injected
/// once at startup; nothing reaches for ambient globals.
#[derive(Clone)]
pub struct AppState {
    /// Drives confirmation requests to wire responses
    pub orchestrator: Arc<ConfirmationOrchestrator>,

    /// Product price lookup for the store pages
    pub catalog: Arc<dyn ProductCatalog>,

    /// Store configuration exposed on /config
    pub config: Arc<StoreConfig>,
}
