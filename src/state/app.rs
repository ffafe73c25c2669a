use std::sync::Arc;

use crate::config::engine::EngineConfig;
use crate::entitlement::{EntitlementGate, UsageTracker};
use crate::metrics::EngineMetrics;
use crate::progress::engine::ProgressEngine;

/// Application-wide state container.
/// The host builds one at startup and passes it (or clones of it) explicitly;
/// nothing in the crate keeps global mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EngineConfig>,
    /// Per-student progress records
    pub engine: Arc<ProgressEngine>,
    /// Feature quotas consulted by navigation
    pub usage: Arc<UsageTracker>,
    /// Shared with the engine
    pub metrics: EngineMetrics,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        let metrics = EngineMetrics::new();
        AppState {
            engine: Arc::new(ProgressEngine::with_metrics(config.clone(), metrics.clone())),
            usage: Arc::new(UsageTracker::new(&config.usage)),
            config: Arc::new(config),
            metrics,
        }
    }

    /// Swap in a different engine, e.g. one restored from a snapshot.
    pub fn with_engine(mut self, engine: ProgressEngine) -> Self {
        self.engine = Arc::new(engine);
        self
    }

    pub fn gate(&self) -> &dyn EntitlementGate {
        &*self.usage
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
