//! Cart identity management.
//!
//! The opaque cart handle lives in a single named slot of durable per-client
//! storage - the request session. This module exclusively owns writes to
//! that slot; every other component receives the handle by value.
//!
//! The slot is abstracted behind [`CartHandleStore`] so tests can substitute
//! an in-memory store.

use async_trait::async_trait;
use tower_sessions::Session;

/// Session key holding the cart handle.
const CART_ID_KEY: &str = "cart_id";

/// Durable per-client slot for the cart handle.
#[async_trait]
pub trait CartHandleStore: Send + Sync {
    /// Read the stored handle.
    async fn get(&self) -> Option<String>;

    /// Overwrite the stored handle.
    async fn set(&self, cart_id: &str);

    /// Drop the stored handle.
    async fn clear(&self);
}

/// Handle store backed by the request session.
pub struct SessionHandleStore {
    session: Session,
}

impl SessionHandleStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CartHandleStore for SessionHandleStore {
    async fn get(&self) -> Option<String> {
        self.session.get::<String>(CART_ID_KEY).await.ok().flatten()
    }

    async fn set(&self, cart_id: &str) {
        if let Err(e) = self.session.insert(CART_ID_KEY, cart_id).await {
            tracing::error!("Failed to save cart ID to session: {e}");
        }
    }

    async fn clear(&self) {
        if let Err(e) = self.session.remove::<String>(CART_ID_KEY).await {
            tracing::error!("Failed to clear cart ID from session: {e}");
        }
    }
}

/// Read the handle without provisioning anything.
pub async fn resolve_cart_id(handles: &dyn CartHandleStore) -> Option<String> {
    handles.get().await
}

/// In-memory handle store for tests.
#[cfg(test)]
pub(crate) struct MemoryHandleStore {
    slot: tokio::sync::RwLock<Option<String>>,
}

#[cfg(test)]
impl MemoryHandleStore {
    pub fn new(initial: Option<&str>) -> Self {
        Self {
            slot: tokio::sync::RwLock::new(initial.map(str::to_string)),
        }
    }

    pub async fn stored(&self) -> Option<String> {
        self.slot.read().await.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl CartHandleStore for MemoryHandleStore {
    async fn get(&self) -> Option<String> {
        self.slot.read().await.clone()
    }

    async fn set(&self, cart_id: &str) {
        *self.slot.write().await = Some(cart_id.to_string());
    }

    async fn clear(&self) {
        *self.slot.write().await = None;
    }
}
