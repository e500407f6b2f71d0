//! Cart synchronization against the commerce backend.
//!
//! Every operation runs the same pipeline: resolve the handle, fetch the
//! cart where the decision needs it, locate the affected line, issue the
//! mutation, and finish by raising the `cart` cache-invalidation signal.
//! Failures never escape as errors to the UI layer - each operation converts
//! them into one fixed user-facing message ([`CartActionError`]) and emits
//! the underlying cause as a structured tracing event.
//!
//! # Concurrency
//!
//! The fetch-locate-mutate sequence is not atomic. Two concurrent
//! quantity updates for the same variant on the same handle can lose one
//! update; the backends expose no optimistic-concurrency token, so conflicts
//! are serialized only by the remote cart API itself. This is an accepted
//! limitation, not a bug.

pub mod identity;

use thiserror::Error;
use tracing::instrument;

use reefknot_core::Cart;

use crate::cache::{CacheTag, ResponseCache};
use crate::commerce::{CartLineInput, CartLineUpdateInput, CommerceBackend};

use identity::CartHandleStore;

/// Fixed user-facing failure vocabulary for cart operations.
///
/// The `Display` strings are the contract with the UI layer; callers treat
/// any non-empty message as failure and never see the underlying cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartActionError {
    /// No cart handle present when one is required.
    #[error("Missing cart ID")]
    MissingCartId,

    /// The cart could not be fetched (or was unusable for the operation).
    #[error("Error fetching cart")]
    CartFetch,

    /// The requested line does not exist remotely, or cannot be addressed
    /// because the backend assigned it no line id.
    #[error("Item not found in cart")]
    ItemNotFound,

    /// Adding a line failed, or its required input was missing.
    #[error("Error adding item to cart")]
    AddItem,

    /// Removing a line failed.
    #[error("Error removing item from cart")]
    RemoveItem,

    /// Updating a line quantity failed.
    #[error("Error updating item quantity")]
    UpdateItem,
}

/// Orchestrates read-modify-write cart operations against the backend.
///
/// Cheaply cloneable when the backend is.
#[derive(Clone)]
pub struct CartService<B> {
    backend: B,
    cache: ResponseCache,
}

impl<B: CommerceBackend> CartService<B> {
    /// Create a new cart service.
    pub const fn new(backend: B, cache: ResponseCache) -> Self {
        Self { backend, cache }
    }

    /// Add a variant to the cart.
    ///
    /// Requires a live handle and a variant id; either missing collapses
    /// into the add-failure message. Always issues an *add* - whether a
    /// repeated add merges into the existing line or duplicates it is the
    /// backend's decision.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::AddItem`] on missing input or backend
    /// failure.
    #[instrument(skip(self, handles))]
    pub async fn add_item(
        &self,
        handles: &dyn CartHandleStore,
        variant_id: Option<&str>,
        quantity: u32,
    ) -> Result<(), CartActionError> {
        let (Some(cart_id), Some(variant_id)) = (handles.get().await, variant_id) else {
            return Err(CartActionError::AddItem);
        };

        self.backend
            .add_to_cart(
                &cart_id,
                vec![CartLineInput {
                    variant_id: variant_id.to_string(),
                    quantity,
                }],
            )
            .await
            .map_err(|e| {
                tracing::error!(cart_id = %cart_id, variant_id, error = %e, "failed to add item to cart");
                CartActionError::AddItem
            })?;

        self.cache.invalidate(CacheTag::Cart);
        Ok(())
    }

    /// Remove the line holding a variant from the cart.
    ///
    /// A line the backend assigned no line id is treated as not removable;
    /// no guessed-identifier remove call is ever issued.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::MissingCartId`] without a handle,
    /// [`CartActionError::ItemNotFound`] when the line is absent or
    /// unaddressable, and [`CartActionError::RemoveItem`] on backend
    /// failure.
    #[instrument(skip(self, handles))]
    pub async fn remove_item(
        &self,
        handles: &dyn CartHandleStore,
        variant_id: &str,
    ) -> Result<(), CartActionError> {
        let cart_id = handles.get().await.ok_or(CartActionError::MissingCartId)?;
        let cart = self.fetch_cart(&cart_id).await?;

        let line_id = cart
            .line_for_variant(variant_id)
            .and_then(|line| line.line_id.clone())
            .ok_or(CartActionError::ItemNotFound)?;

        self.backend
            .remove_from_cart(&cart_id, vec![line_id])
            .await
            .map_err(|e| {
                tracing::error!(cart_id = %cart_id, variant_id, error = %e, "failed to remove item from cart");
                CartActionError::RemoveItem
            })?;

        self.cache.invalidate(CacheTag::Cart);
        Ok(())
    }

    /// Set the quantity of a variant in the cart.
    ///
    /// The branch table is the core business rule:
    /// 1. line exists, quantity 0 - remove it;
    /// 2. line exists, quantity > 0 - update to the new quantity;
    /// 3. line absent, quantity > 0 - implicit add;
    /// 4. line absent, quantity 0 - nothing to do.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::MissingCartId`] without a handle,
    /// [`CartActionError::CartFetch`] when the cart cannot be fetched, and
    /// [`CartActionError::UpdateItem`] on backend failure.
    #[instrument(skip(self, handles))]
    pub async fn set_item_quantity(
        &self,
        handles: &dyn CartHandleStore,
        variant_id: &str,
        quantity: u32,
    ) -> Result<(), CartActionError> {
        let cart_id = handles.get().await.ok_or(CartActionError::MissingCartId)?;
        let cart = self.fetch_cart(&cart_id).await?;

        // A line without a backend-assigned id cannot be addressed and is
        // handled as if absent.
        let line_id = cart
            .line_for_variant(variant_id)
            .and_then(|line| line.line_id.clone());

        match (line_id, quantity) {
            (Some(line_id), 0) => {
                self.backend
                    .remove_from_cart(&cart_id, vec![line_id])
                    .await
                    .map_err(|e| {
                        tracing::error!(cart_id = %cart_id, variant_id, error = %e, "failed to remove line while setting quantity");
                        CartActionError::UpdateItem
                    })?;
            }
            (Some(line_id), quantity) => {
                self.backend
                    .update_cart(
                        &cart_id,
                        vec![CartLineUpdateInput {
                            line_id,
                            variant_id: variant_id.to_string(),
                            quantity,
                        }],
                    )
                    .await
                    .map_err(|e| {
                        tracing::error!(cart_id = %cart_id, variant_id, error = %e, "failed to update item quantity");
                        CartActionError::UpdateItem
                    })?;
            }
            (None, quantity) if quantity > 0 => {
                // An update for a line the cart does not hold is an implicit add.
                self.backend
                    .add_to_cart(
                        &cart_id,
                        vec![CartLineInput {
                            variant_id: variant_id.to_string(),
                            quantity,
                        }],
                    )
                    .await
                    .map_err(|e| {
                        tracing::error!(cart_id = %cart_id, variant_id, error = %e, "failed to add item while setting quantity");
                        CartActionError::UpdateItem
                    })?;
            }
            (None, _) => {} // nothing to do
        }

        self.cache.invalidate(CacheTag::Cart);
        Ok(())
    }

    /// Resolve the hosted-checkout URL for the current cart.
    ///
    /// Requires a live handle and a fetchable, non-empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::MissingCartId`] without a handle and
    /// [`CartActionError::CartFetch`] when the cart cannot be fetched, is
    /// empty, or the checkout target cannot be resolved.
    #[instrument(skip(self, handles))]
    pub async fn checkout(
        &self,
        handles: &dyn CartHandleStore,
        currency: &str,
    ) -> Result<String, CartActionError> {
        let cart_id = handles.get().await.ok_or(CartActionError::MissingCartId)?;
        let cart = self.fetch_cart(&cart_id).await?;

        if cart.is_empty() {
            tracing::warn!(cart_id = %cart.id, "checkout requested for an empty cart");
            return Err(CartActionError::CartFetch);
        }

        self.backend
            .begin_checkout(&cart, currency)
            .await
            .map_err(|e| {
                tracing::error!(cart_id = %cart.id, error = %e, "failed to resolve checkout target");
                CartActionError::CartFetch
            })
    }

    /// Return the live cart for the stored handle, lazily provisioning a
    /// new cart (and persisting its handle) when the slot is empty or the
    /// stored handle no longer resolves remotely.
    ///
    /// At most one new handle is written per call. Concurrent requests
    /// sharing the same slot are not serialized; the last write wins.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::CartFetch`] when a new cart cannot be
    /// created.
    #[instrument(skip(self, handles))]
    pub async fn ensure_cart(
        &self,
        handles: &dyn CartHandleStore,
    ) -> Result<Cart, CartActionError> {
        if let Some(cart_id) = handles.get().await {
            match self.backend.get_cart(&cart_id).await {
                Ok(cart) => return Ok(cart),
                Err(e) => {
                    tracing::warn!(cart_id = %cart_id, error = %e, "stored cart handle no longer resolves, creating a new cart");
                }
            }
        }

        self.create_cart_and_persist_handle(handles).await
    }

    /// Unconditionally create a new cart and overwrite the stored handle.
    ///
    /// First-touch initialization only: invoking this while a valid handle
    /// exists orphans the previous cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::CartFetch`] when the backend cannot
    /// create a cart.
    #[instrument(skip(self, handles))]
    pub async fn create_cart_and_persist_handle(
        &self,
        handles: &dyn CartHandleStore,
    ) -> Result<Cart, CartActionError> {
        let cart = self.backend.create_cart().await.map_err(|e| {
            tracing::error!(error = %e, "failed to create cart");
            CartActionError::CartFetch
        })?;

        handles.set(&cart.id).await;
        self.cache.invalidate(CacheTag::Cart);
        Ok(cart)
    }

    async fn fetch_cart(&self, cart_id: &str) -> Result<Cart, CartActionError> {
        self.backend.get_cart(cart_id).await.map_err(|e| {
            tracing::error!(cart_id, error = %e, "failed to fetch cart");
            CartActionError::CartFetch
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use reefknot_core::{CartLine, Money};

    use crate::cache::CacheValue;
    use crate::commerce::{CommerceError, MockCommerceBackend};

    use super::identity::MemoryHandleStore;
    use super::*;

    fn line(variant_id: &str, line_id: Option<&str>, quantity: u32) -> CartLine {
        CartLine::new(
            line_id.map(str::to_string),
            variant_id,
            format!("Variant {variant_id}"),
            quantity,
            Money::new(Decimal::new(1000, 2), "USD"),
        )
    }

    fn cart_with(lines: Vec<CartLine>) -> Cart {
        Cart::from_lines("cart-1", Some("https://shop/checkout/cart-1".to_string()), lines)
    }

    fn service(backend: MockCommerceBackend) -> CartService<MockCommerceBackend> {
        CartService::new(backend, ResponseCache::new())
    }

    async fn prime_cart_tag(service: &CartService<MockCommerceBackend>) {
        service
            .cache
            .insert(CacheTag::Cart, "marker", CacheValue::Products(vec![]))
            .await;
    }

    async fn cart_tag_invalidated(service: &CartService<MockCommerceBackend>) -> bool {
        service.cache.get(CacheTag::Cart, "marker").await.is_none()
    }

    // =========================================================================
    // add_item
    // =========================================================================

    #[tokio::test]
    async fn test_add_item_issues_add_and_invalidates() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_add_to_cart()
            .withf(|cart_id, lines| {
                cart_id == "cart-1"
                    && lines.first().is_some_and(|l| l.variant_id == "v1" && l.quantity == 1)
            })
            .times(1)
            .returning(|_, _| Ok(cart_with(vec![line("v1", Some("line-1"), 1)])));

        let service = service(backend);
        prime_cart_tag(&service).await;

        let result = service.add_item(&handles, Some("v1"), 1).await;

        assert_eq!(result, Ok(()));
        assert!(cart_tag_invalidated(&service).await);
    }

    #[tokio::test]
    async fn test_add_item_without_handle_fails_without_backend_call() {
        let handles = MemoryHandleStore::new(None);
        let service = service(MockCommerceBackend::new());

        let result = service.add_item(&handles, Some("v1"), 1).await;

        assert_eq!(result, Err(CartActionError::AddItem));
    }

    #[tokio::test]
    async fn test_add_item_without_variant_fails() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let service = service(MockCommerceBackend::new());

        let result = service.add_item(&handles, None, 1).await;

        assert_eq!(result, Err(CartActionError::AddItem));
    }

    #[tokio::test]
    async fn test_add_item_backend_failure_flattens_to_message() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend.expect_add_to_cart().times(1).returning(|_, _| {
            Err(CommerceError::Api {
                status: 502,
                message: "upstream".to_string(),
            })
        });

        let service = service(backend);
        let result = service.add_item(&handles, Some("v1"), 1).await;

        assert_eq!(result.unwrap_err().to_string(), "Error adding item to cart");
    }

    // =========================================================================
    // remove_item
    // =========================================================================

    #[tokio::test]
    async fn test_remove_item_removes_by_line_id() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|_| Ok(cart_with(vec![line("v1", Some("line-1"), 1)])));
        backend
            .expect_remove_from_cart()
            .withf(|cart_id, line_ids| {
                cart_id == "cart-1"
                    && line_ids.len() == 1
                    && line_ids.first().is_some_and(|id| id == "line-1")
            })
            .times(1)
            .returning(|_, _| Ok(cart_with(vec![])));

        let service = service(backend);
        prime_cart_tag(&service).await;

        let result = service.remove_item(&handles, "v1").await;

        assert_eq!(result, Ok(()));
        assert!(cart_tag_invalidated(&service).await);
    }

    #[tokio::test]
    async fn test_remove_item_missing_handle() {
        let handles = MemoryHandleStore::new(None);
        let service = service(MockCommerceBackend::new());

        let result = service.remove_item(&handles, "v1").await;

        assert_eq!(result, Err(CartActionError::MissingCartId));
    }

    #[tokio::test]
    async fn test_remove_item_absent_variant_is_not_found() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|_| Ok(cart_with(vec![line("v1", Some("line-1"), 1)])));

        let service = service(backend);
        let result = service.remove_item(&handles, "v2").await;

        assert_eq!(result, Err(CartActionError::ItemNotFound));
    }

    #[tokio::test]
    async fn test_remove_item_without_line_id_never_issues_remove() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        // Line exists but the backend assigned no line id; removing would
        // mean guessing an identifier.
        backend
            .expect_get_cart()
            .times(1)
            .returning(|_| Ok(cart_with(vec![line("v1", None, 1)])));

        let service = service(backend);
        let result = service.remove_item(&handles, "v1").await;

        assert_eq!(result, Err(CartActionError::ItemNotFound));
    }

    #[tokio::test]
    async fn test_remove_item_fetch_failure() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|id| Err(CommerceError::NotFound(format!("Cart not found: {id}"))));

        let service = service(backend);
        let result = service.remove_item(&handles, "v1").await;

        assert_eq!(result, Err(CartActionError::CartFetch));
    }

    // =========================================================================
    // set_item_quantity - the branch table
    // =========================================================================

    #[tokio::test]
    async fn test_set_quantity_zero_removes_existing_line() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|_| Ok(cart_with(vec![line("v1", Some("line-1"), 2)])));
        backend
            .expect_remove_from_cart()
            .withf(|_, line_ids| {
                line_ids.len() == 1 && line_ids.first().is_some_and(|id| id == "line-1")
            })
            .times(1)
            .returning(|_, _| Ok(cart_with(vec![])));

        let service = service(backend);
        let result = service.set_item_quantity(&handles, "v1", 0).await;

        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_set_quantity_updates_existing_line() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|_| Ok(cart_with(vec![line("v1", Some("line-1"), 1)])));
        backend
            .expect_update_cart()
            .withf(|_, lines| {
                lines
                    .first()
                    .is_some_and(|l| l.line_id == "line-1" && l.variant_id == "v1" && l.quantity == 5)
            })
            .times(1)
            .returning(|_, _| Ok(cart_with(vec![line("v1", Some("line-1"), 5)])));

        let service = service(backend);
        let result = service.set_item_quantity(&handles, "v1", 5).await;

        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_set_quantity_on_absent_line_is_implicit_add() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|_| Ok(cart_with(vec![])));
        backend
            .expect_add_to_cart()
            .withf(|_, lines| {
                lines.first().is_some_and(|l| l.variant_id == "v1" && l.quantity == 3)
            })
            .times(1)
            .returning(|_, _| Ok(cart_with(vec![line("v1", Some("line-1"), 3)])));

        let service = service(backend);
        let result = service.set_item_quantity(&handles, "v1", 3).await;

        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_set_quantity_zero_on_absent_line_is_noop_and_idempotent() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        // Only reads; any mutation call would fail the test.
        backend
            .expect_get_cart()
            .times(2)
            .returning(|_| Ok(cart_with(vec![line("other", Some("line-9"), 1)])));

        let service = service(backend);

        assert_eq!(service.set_item_quantity(&handles, "v1", 0).await, Ok(()));
        assert_eq!(service.set_item_quantity(&handles, "v1", 0).await, Ok(()));
    }

    #[tokio::test]
    async fn test_set_quantity_missing_handle() {
        let handles = MemoryHandleStore::new(None);
        let service = service(MockCommerceBackend::new());

        let result = service.set_item_quantity(&handles, "v1", 1).await;

        assert_eq!(result, Err(CartActionError::MissingCartId));
    }

    #[tokio::test]
    async fn test_set_quantity_backend_failure_flattens_to_message() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|_| Ok(cart_with(vec![line("v1", Some("line-1"), 1)])));
        backend.expect_update_cart().times(1).returning(|_, _| {
            Err(CommerceError::UserError("quantity too large".to_string()))
        });

        let service = service(backend);
        let result = service.set_item_quantity(&handles, "v1", 99).await;

        assert_eq!(
            result.unwrap_err().to_string(),
            "Error updating item quantity"
        );
    }

    #[tokio::test]
    async fn test_set_quantity_invalidates_cart_tag_even_on_noop() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|_| Ok(cart_with(vec![])));

        let service = service(backend);
        prime_cart_tag(&service).await;

        let result = service.set_item_quantity(&handles, "v1", 0).await;

        assert_eq!(result, Ok(()));
        assert!(cart_tag_invalidated(&service).await);
    }

    // =========================================================================
    // checkout
    // =========================================================================

    #[tokio::test]
    async fn test_checkout_returns_redirect_target() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|_| Ok(cart_with(vec![line("v1", Some("line-1"), 1)])));
        backend
            .expect_begin_checkout()
            .withf(|cart, currency| cart.id == "cart-1" && currency == "USD")
            .times(1)
            .returning(|_, _| Ok("https://shop/checkout/cart-1".to_string()));

        let service = service(backend);
        let result = service.checkout(&handles, "USD").await;

        assert_eq!(result, Ok("https://shop/checkout/cart-1".to_string()));
    }

    #[tokio::test]
    async fn test_checkout_missing_handle() {
        let handles = MemoryHandleStore::new(None);
        let service = service(MockCommerceBackend::new());

        let result = service.checkout(&handles, "USD").await;

        assert_eq!(result, Err(CartActionError::MissingCartId));
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_fails() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|_| Ok(cart_with(vec![])));

        let service = service(backend);
        let result = service.checkout(&handles, "USD").await;

        assert_eq!(result, Err(CartActionError::CartFetch));
    }

    #[tokio::test]
    async fn test_checkout_unfetchable_cart_fails() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|id| Err(CommerceError::NotFound(format!("Cart not found: {id}"))));

        let service = service(backend);
        let result = service.checkout(&handles, "USD").await;

        assert_eq!(result, Err(CartActionError::CartFetch));
    }

    // =========================================================================
    // create_cart_and_persist_handle
    // =========================================================================

    #[tokio::test]
    async fn test_create_cart_overwrites_handle() {
        let handles = MemoryHandleStore::new(Some("cart-old"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_create_cart()
            .times(1)
            .returning(|| Ok(Cart::from_lines("cart-new", None, vec![])));

        let service = service(backend);
        prime_cart_tag(&service).await;

        let created = service
            .create_cart_and_persist_handle(&handles)
            .await
            .expect("cart created");

        assert_eq!(created.id, "cart-new");
        assert_eq!(handles.stored().await.as_deref(), Some("cart-new"));
        assert!(cart_tag_invalidated(&service).await);
    }

    // =========================================================================
    // ensure_cart
    // =========================================================================

    #[tokio::test]
    async fn test_ensure_cart_reuses_live_handle() {
        let handles = MemoryHandleStore::new(Some("cart-1"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|id| Ok(Cart::from_lines(id, None, vec![])));

        let service = service(backend);
        let ensured = service.ensure_cart(&handles).await.expect("cart ensured");

        assert_eq!(ensured.id, "cart-1");
        assert_eq!(handles.stored().await.as_deref(), Some("cart-1"));
    }

    #[tokio::test]
    async fn test_ensure_cart_provisions_when_slot_empty() {
        let handles = MemoryHandleStore::new(None);
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_create_cart()
            .times(1)
            .returning(|| Ok(Cart::from_lines("cart-new", None, vec![])));

        let service = service(backend);
        let ensured = service.ensure_cart(&handles).await.expect("cart ensured");

        assert_eq!(ensured.id, "cart-new");
        assert_eq!(handles.stored().await.as_deref(), Some("cart-new"));
    }

    #[tokio::test]
    async fn test_ensure_cart_replaces_stale_handle() {
        let handles = MemoryHandleStore::new(Some("cart-stale"));
        let mut backend = MockCommerceBackend::new();
        backend
            .expect_get_cart()
            .times(1)
            .returning(|id| Err(CommerceError::NotFound(format!("Cart not found: {id}"))));
        backend
            .expect_create_cart()
            .times(1)
            .returning(|| Ok(Cart::from_lines("cart-new", None, vec![])));

        let service = service(backend);
        let ensured = service.ensure_cart(&handles).await.expect("cart ensured");

        assert_eq!(ensured.id, "cart-new");
        assert_eq!(handles.stored().await.as_deref(), Some("cart-new"));
    }

    // =========================================================================
    // error vocabulary
    // =========================================================================

    #[test]
    fn test_error_messages_are_stable() {
        assert_eq!(CartActionError::MissingCartId.to_string(), "Missing cart ID");
        assert_eq!(CartActionError::CartFetch.to_string(), "Error fetching cart");
        assert_eq!(
            CartActionError::ItemNotFound.to_string(),
            "Item not found in cart"
        );
        assert_eq!(
            CartActionError::AddItem.to_string(),
            "Error adding item to cart"
        );
        assert_eq!(
            CartActionError::RemoveItem.to_string(),
            "Error removing item from cart"
        );
        assert_eq!(
            CartActionError::UpdateItem.to_string(),
            "Error updating item quantity"
        );
    }
}
