//! Shopify Storefront API client implementation.
//!
//! GraphQL over `reqwest` 0.13. Query documents are runtime strings
//! ([`queries`]) and responses are parsed with `graphql_client::Response`
//! into the hand-written data types in [`types`].

pub mod convert;
pub mod queries;
pub mod types;

use std::sync::Arc;

use graphql_client::Response;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{instrument, warn};

use reefknot_core::{Cart, Collection, Product};

use crate::config::ShopifyConfig;

use super::{CartLineInput, CartLineUpdateInput, CommerceError, GraphQLError};
use types::{
    CartCreateData, CartLinesAddData, CartLinesRemoveData, CartLinesUpdateData,
    CartMutationPayload, CartQueryData, CollectionProductsQueryData, CollectionsQueryData,
    ProductQueryData,
};

/// Client for the Shopify Storefront API.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl ShopifyClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            config.store, config.api_version
        );

        Self {
            inner: Arc::new(ShopifyClientInner {
                client: reqwest::Client::new(),
                endpoint,
                access_token: config.storefront_private_token.expose_secret().to_string(),
            }),
        }
    }

    /// Execute a GraphQL operation.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &'static str,
        variables: serde_json::Value,
    ) -> Result<T, CommerceError> {
        let request_body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            .header("Shopify-Storefront-Private-Token", &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|source| CommerceError::Transport {
                url: self.inner.endpoint.clone(),
                source,
            })?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CommerceError::RateLimited(retry_after));
        }

        // Get the body as text first for better error diagnostics
        let response_text =
            response
                .text()
                .await
                .map_err(|source| CommerceError::Transport {
                    url: self.inner.endpoint.clone(),
                    source,
                })?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify API returned non-success status"
            );
            return Err(CommerceError::Api {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect(),
            });
        }

        let parsed: Response<T> = serde_json::from_str(&response_text).map_err(|source| {
            tracing::error!(
                error = %source,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse Shopify GraphQL response"
            );
            CommerceError::Decode {
                url: self.inner.endpoint.clone(),
                source,
            }
        })?;

        // Check for GraphQL errors
        if let Some(errors) = parsed.errors
            && !errors.is_empty()
        {
            return Err(CommerceError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        path: e.path.map_or_else(Vec::new, |path| {
                            path.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(key) => key,
                                    graphql_client::PathFragment::Index(index) => {
                                        index.to_string()
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        parsed.data.ok_or_else(|| {
            tracing::error!(
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify GraphQL response has no data and no errors"
            );
            CommerceError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                path: vec![],
            }])
        })
    }

    // =========================================================================
    // Cart Methods (never cached - mutable state)
    // =========================================================================

    /// Create a new, empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self))]
    pub async fn create_cart(&self) -> Result<Cart, CommerceError> {
        let data: CartCreateData = self
            .execute(
                queries::CREATE_CART,
                serde_json::json!({ "input": { "lines": [] } }),
            )
            .await?;

        cart_from_mutation(data.cart_create, "create cart")
    }

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is not found or the request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &str) -> Result<Cart, CommerceError> {
        let data: CartQueryData = self
            .execute(queries::GET_CART, serde_json::json!({ "cartId": cart_id }))
            .await?;

        data.cart
            .map(convert::cart)
            .ok_or_else(|| CommerceError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, CommerceError> {
        let lines = lines
            .iter()
            .map(|line| {
                serde_json::json!({
                    "merchandiseId": line.variant_id,
                    "quantity": line.quantity,
                })
            })
            .collect::<Vec<_>>();

        let data: CartLinesAddData = self
            .execute(
                queries::ADD_TO_CART,
                serde_json::json!({ "cartId": cart_id, "lines": lines }),
            )
            .await?;

        cart_from_mutation(data.cart_lines_add, "add to cart")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, CommerceError> {
        let data: CartLinesRemoveData = self
            .execute(
                queries::REMOVE_FROM_CART,
                serde_json::json!({ "cartId": cart_id, "lineIds": line_ids }),
            )
            .await?;

        cart_from_mutation(data.cart_lines_remove, "remove from cart")
    }

    /// Update cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, CommerceError> {
        let lines = lines
            .iter()
            .map(|line| {
                serde_json::json!({
                    "id": line.line_id,
                    "merchandiseId": line.variant_id,
                    "quantity": line.quantity,
                })
            })
            .collect::<Vec<_>>();

        let data: CartLinesUpdateData = self
            .execute(
                queries::UPDATE_CART_LINES,
                serde_json::json!({ "cartId": cart_id, "lines": lines }),
            )
            .await?;

        cart_from_mutation(data.cart_lines_update, "update cart")
    }

    /// Resolve the hosted-checkout URL attached to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart carries no checkout URL.
    #[instrument(skip(self, cart), fields(cart_id = %cart.id))]
    pub async fn begin_checkout(
        &self,
        cart: &Cart,
        _currency: &str,
    ) -> Result<String, CommerceError> {
        cart.checkout_url
            .clone()
            .ok_or_else(|| CommerceError::NotFound(format!("Cart has no checkout URL: {}", cart.id)))
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product(&self, handle: &str) -> Result<Product, CommerceError> {
        let data: ProductQueryData = self
            .execute(
                queries::GET_PRODUCT_BY_HANDLE,
                serde_json::json!({ "handle": handle }),
            )
            .await?;

        data.product
            .map(convert::product)
            .ok_or_else(|| CommerceError::NotFound(format!("Product not found: {handle}")))
    }

    /// List collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(&self) -> Result<Vec<Collection>, CommerceError> {
        let data: CollectionsQueryData = self
            .execute(queries::GET_COLLECTIONS, serde_json::json!({}))
            .await?;

        Ok(data
            .collections
            .edges
            .into_iter()
            .map(|edge| convert::collection(edge.node))
            .collect())
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
        let data: CollectionProductsQueryData = self
            .execute(
                queries::GET_COLLECTION_PRODUCTS,
                serde_json::json!({ "handle": handle }),
            )
            .await?;

        match data.collection {
            Some(collection) => Ok(collection
                .products
                .edges
                .into_iter()
                .map(|edge| convert::product(edge.node))
                .collect()),
            None => {
                warn!(handle = %handle, "no collection found");
                Ok(Vec::new())
            }
        }
    }
}

/// Unwrap a cart mutation payload, surfacing user errors.
fn cart_from_mutation(
    payload: Option<CartMutationPayload>,
    action: &str,
) -> Result<Cart, CommerceError> {
    if let Some(result) = payload {
        if !result.user_errors.is_empty() {
            return Err(CommerceError::UserError(
                result
                    .user_errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }

        if let Some(cart) = result.cart {
            return Ok(convert::cart(cart));
        }
    }

    Err(CommerceError::GraphQL(vec![GraphQLError {
        message: format!("Failed to {action}"),
        path: vec![],
    }]))
}
