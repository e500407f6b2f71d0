//! Fourthwall public API client implementation.
//!
//! Plain REST over `reqwest`. Auth is a shop identifier in the `X-ShopId`
//! header plus a shared secret as a `secret` query parameter. Every mutating
//! call (and every cart read) is sent with `Cache-Control: no-store` so a
//! read immediately following a write is never served stale.

pub mod reshape;
pub mod types;

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{instrument, warn};

use reefknot_core::{Cart, Collection, Product};

use crate::config::FourthwallConfig;

use super::{CartLineInput, CartLineUpdateInput, CommerceError};
use types::{CartPayload, CheckoutPayload, CollectionsPayload, ProductListPayload};

/// Fixed path prefix of the public API.
const API_BASE_PATH: &str = "/api/public/v1.0";

/// Client for the Fourthwall public API.
#[derive(Clone)]
pub struct FourthwallClient {
    inner: Arc<FourthwallClientInner>,
}

struct FourthwallClientInner {
    client: reqwest::Client,
    api_url: String,
    checkout_domain: String,
    shop_id: String,
    secret: String,
    storefront_collection: String,
}

impl FourthwallClient {
    /// Create a new Fourthwall API client.
    #[must_use]
    pub fn new(config: &FourthwallConfig) -> Self {
        Self {
            inner: Arc::new(FourthwallClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.clone(),
                checkout_domain: config.checkout_domain.clone(),
                shop_id: config.shop_id.clone(),
                secret: config.secret.expose_secret().to_string(),
                storefront_collection: config.storefront_collection.clone(),
            }),
        }
    }

    /// Full request URL including the secret query parameter.
    fn url(&self, path: &str) -> String {
        format!(
            "{}{API_BASE_PATH}/{path}?secret={}",
            self.inner.api_url, self.inner.secret
        )
    }

    /// URL carried in errors and logs; never includes the secret.
    fn display_url(&self, path: &str) -> String {
        format!("{}{API_BASE_PATH}/{path}", self.inner.api_url)
    }

    /// GET a JSON payload.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        no_store: bool,
    ) -> Result<T, CommerceError> {
        let mut request = self
            .inner
            .client
            .get(self.url(path))
            .header("Content-Type", "application/json")
            .header("X-ShopId", &self.inner.shop_id);

        if no_store {
            request = request.header(reqwest::header::CACHE_CONTROL, "no-store");
        }

        let url = self.display_url(path);
        let response = request
            .send()
            .await
            .map_err(|source| CommerceError::Transport {
                url: url.clone(),
                source,
            })?;

        decode_body(&url, response).await
    }

    /// POST a JSON payload. Always sent with caching disabled.
    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &serde_json::Value,
    ) -> Result<T, CommerceError> {
        let url = self.display_url(path);
        let response = self
            .inner
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .header("X-ShopId", &self.inner.shop_id)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .json(payload)
            .send()
            .await
            .map_err(|source| {
                warn!(url = %url, payload = %payload, "Fourthwall request failed");
                CommerceError::Transport {
                    url: url.clone(),
                    source,
                }
            })?;

        decode_body(&url, response).await
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Create a new, empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    #[instrument(skip(self))]
    pub async fn create_cart(&self) -> Result<Cart, CommerceError> {
        let payload: CartPayload = self
            .post_json("carts", &serde_json::json!({ "items": [] }))
            .await?;
        reshape::cart(payload)
    }

    /// Fetch an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be fetched.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &str) -> Result<Cart, CommerceError> {
        let payload: CartPayload = self
            .get_json(&format!("carts/{cart_id}"), true)
            .await?;
        reshape::cart(payload)
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, CommerceError> {
        let items = lines
            .iter()
            .map(|line| {
                serde_json::json!({
                    "variantId": line.variant_id,
                    "quantity": line.quantity,
                })
            })
            .collect::<Vec<_>>();

        let payload: CartPayload = self
            .post_json(
                &format!("carts/{cart_id}/add"),
                &serde_json::json!({ "items": items }),
            )
            .await?;
        reshape::cart(payload)
    }

    /// Remove lines from a cart. Fourthwall addresses lines by variant id.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, CommerceError> {
        let items = line_ids
            .iter()
            .map(|variant_id| serde_json::json!({ "variantId": variant_id }))
            .collect::<Vec<_>>();

        let payload: CartPayload = self
            .post_json(
                &format!("carts/{cart_id}/remove"),
                &serde_json::json!({ "items": items }),
            )
            .await?;
        reshape::cart(payload)
    }

    /// Set new quantities on existing cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, CommerceError> {
        let items = lines
            .iter()
            .map(|line| {
                serde_json::json!({
                    "variantId": line.variant_id,
                    "quantity": line.quantity,
                })
            })
            .collect::<Vec<_>>();

        let payload: CartPayload = self
            .post_json(
                &format!("carts/{cart_id}/change"),
                &serde_json::json!({ "items": items }),
            )
            .await?;
        reshape::cart(payload)
    }

    /// Mint a checkout session for the cart and build the redirect target.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout session cannot be created.
    #[instrument(skip(self, cart), fields(cart_id = %cart.id))]
    pub async fn begin_checkout(
        &self,
        cart: &Cart,
        currency: &str,
    ) -> Result<String, CommerceError> {
        let checkout: CheckoutPayload = self
            .post_json(
                "checkouts",
                &serde_json::json!({ "cartId": cart.id, "currency": currency }),
            )
            .await?;

        Ok(format!(
            "{}/checkout/{}",
            self.inner.checkout_domain, checkout.id
        ))
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Fetch a product by its slug.
    ///
    /// The public API has no product-by-slug endpoint; products are looked up
    /// in the configured storefront collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product(&self, handle: &str) -> Result<Product, CommerceError> {
        let collection = self.inner.storefront_collection.clone();
        let products = self.get_collection_products(&collection).await?;

        products
            .into_iter()
            .find(|product| product.handle == handle)
            .ok_or_else(|| CommerceError::NotFound(format!("Product not found: {handle}")))
    }

    /// List collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(&self) -> Result<Vec<Collection>, CommerceError> {
        let payload: CollectionsPayload = self.get_json("collections", false).await?;
        Ok(reshape::collections(payload.collections))
    }

    /// List the products of a collection.
    ///
    /// An unknown collection yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_products(
        &self,
        handle: &str,
    ) -> Result<Vec<Product>, CommerceError> {
        let payload: ProductListPayload = self
            .get_json(&format!("collections/{handle}/products"), false)
            .await?;

        match payload.results {
            Some(results) => Ok(reshape::products(results)),
            None => {
                warn!(handle = %handle, "no collection found");
                Ok(Vec::new())
            }
        }
    }
}

/// Check the status and decode the body, keeping the URL for diagnostics.
async fn decode_body<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> Result<T, CommerceError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|source| CommerceError::Transport {
            url: url.to_string(),
            source,
        })?;

    if !status.is_success() {
        return Err(api_error(status, &text));
    }

    serde_json::from_str(&text).map_err(|source| CommerceError::Decode {
        url: url.to_string(),
        source,
    })
}

fn api_error(status: StatusCode, body: &str) -> CommerceError {
    CommerceError::Api {
        status: status.as_u16(),
        message: body.chars().take(200).collect(),
    }
}
