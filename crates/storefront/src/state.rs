//! Application state shared across handlers.

use std::sync::Arc;

use crate::browse::BrowseSessions;
use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the configuration, the
/// remote catalog client and the per-visitor browse sessions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    browsers: BrowseSessions,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogClient::new(&config);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                browsers: BrowseSessions::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the browse-session store.
    #[must_use]
    pub fn browsers(&self) -> &BrowseSessions {
        &self.inner.browsers
    }
}
