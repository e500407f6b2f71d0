//! Application state shared across handlers.

use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::cart::CartService;
use crate::commerce::Commerce;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the selected commerce backend, the response cache, and
/// the cart service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    commerce: Commerce,
    cache: ResponseCache,
    carts: CartService<Commerce>,
}

impl AppState {
    /// Create a new application state from the loaded configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let commerce = Commerce::new(&config.backend);
        let cache = ResponseCache::new();
        let carts = CartService::new(commerce.clone(), cache.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                commerce,
                cache,
                carts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the configured commerce backend.
    #[must_use]
    pub fn commerce(&self) -> &Commerce {
        &self.inner.commerce
    }

    /// Get a reference to the tag-scoped response cache.
    #[must_use]
    pub fn cache(&self) -> &ResponseCache {
        &self.inner.cache
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn carts(&self) -> &CartService<Commerce> {
        &self.inner.carts
    }
}
