//! Cart route handlers.
//!
//! These handlers are the caller-facing boundary of the cart synchronizer.
//! The contract with the UI layer: mutating operations answer
//! `204 No Content` on success, or `422` with the bare fixed error string as
//! the body; checkout answers with a redirect. Any non-empty body is a
//! failure message drawn from the fixed vocabulary in
//! [`crate::cart::CartActionError`].

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use reefknot_core::Cart;

use crate::cache::{CacheTag, CacheValue};
use crate::cart::CartActionError;
use crate::cart::identity::{self, SessionHandleStore};
use crate::commerce::CommerceBackend;
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub variant_id: Option<String>,
    pub quantity: Option<u32>,
}

/// Set quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub variant_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub variant_id: String,
}

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub currency: Option<String>,
}

/// Current cart envelope; `cart` is absent before first touch.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Option<Cart>,
}

fn action_response(result: Result<(), CartActionError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
    }
}

/// Current cart as JSON (cached under the `cart` tag).
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CartResponse> {
    let handles = SessionHandleStore::new(session);

    let Some(cart_id) = identity::resolve_cart_id(&handles).await else {
        return Json(CartResponse { cart: None });
    };

    let cache_key = format!("cart:{cart_id}");
    if let Some(CacheValue::Cart(cart)) = state.cache().get(CacheTag::Cart, &cache_key).await {
        return Json(CartResponse { cart: Some(*cart) });
    }

    match state.commerce().get_cart(&cart_id).await {
        Ok(cart) => {
            state
                .cache()
                .insert(CacheTag::Cart, cache_key, CacheValue::Cart(Box::new(cart.clone())))
                .await;
            Json(CartResponse { cart: Some(cart) })
        }
        Err(e) => {
            tracing::warn!(cart_id = %cart_id, error = %e, "failed to fetch cart");
            Json(CartResponse { cart: None })
        }
    }
}

/// First-touch initialization: ensure a live cart exists for this client.
///
/// Reuses the stored handle when it still resolves; otherwise creates a new
/// cart and persists the new handle.
#[instrument(skip(state, session))]
pub async fn init(State(state): State<AppState>, session: Session) -> Response {
    let handles = SessionHandleStore::new(session);

    match state.carts().ensure_cart(&handles).await {
        Ok(cart) => Json(CartResponse { cart: Some(cart) }).into_response(),
        Err(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
    }
}

/// Add an item to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let handles = SessionHandleStore::new(session);
    let quantity = form.quantity.unwrap_or(1);

    action_response(
        state
            .carts()
            .add_item(&handles, form.variant_id.as_deref(), quantity)
            .await,
    )
}

/// Set an item's quantity (implicit add / remove at the edges).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let handles = SessionHandleStore::new(session);

    action_response(
        state
            .carts()
            .set_item_quantity(&handles, &form.variant_id, form.quantity)
            .await,
    )
}

/// Remove an item from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let handles = SessionHandleStore::new(session);

    action_response(state.carts().remove_item(&handles, &form.variant_id).await)
}

/// Redirect to the hosted checkout.
#[instrument(skip(state, session))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let handles = SessionHandleStore::new(session);
    let currency = form
        .currency
        .unwrap_or_else(|| Cart::DEFAULT_CURRENCY.to_string());

    match state.carts().checkout(&handles, &currency).await {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
    }
}
