//! Application state shared across handlers.

use std::sync::Arc;

use pandan_stand_core::Catalog;

use crate::config::CounterConfig;
use crate::lifecycle::LifecycleController;
use crate::store::OrderStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; owns the injected order store and the
/// lifecycle controller built over it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CounterConfig,
    catalog: Catalog,
    store: Arc<OrderStore>,
    lifecycle: LifecycleController,
}

impl AppState {
    /// Create a new application state over an already-opened store.
    #[must_use]
    pub fn new(config: CounterConfig, catalog: Catalog, store: Arc<OrderStore>) -> Self {
        let lifecycle = LifecycleController::new(Arc::clone(&store));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                store,
                lifecycle,
            }),
        }
    }

    /// Get a reference to the counter configuration.
    #[must_use]
    pub fn config(&self) -> &CounterConfig {
        &self.inner.config
    }

    /// Get a reference to the stall menu.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn store(&self) -> &OrderStore {
        &self.inner.store
    }

    /// Get a reference to the lifecycle controller.
    #[must_use]
    pub fn lifecycle(&self) -> &LifecycleController {
        &self.inner.lifecycle
    }
}
