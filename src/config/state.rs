// Application state module
// Owns the customer registry and the cached settings handlers read per request

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::types::Config;
use crate::ledger::Registry;

/// Application state, shared by every connection task
pub struct AppState {
    pub config: Config,
    pub registry: RwLock<Registry>,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    /// Create `AppState` with an empty registry
    pub fn new(config: &Config) -> Self {
        Self::with_registry(config, Registry::new())
    }

    pub fn with_registry(config: &Config, registry: Registry) -> Self {
        Self {
            config: config.clone(),
            registry: RwLock::new(registry),
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        }
    }
}
