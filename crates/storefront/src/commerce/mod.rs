//! Commerce backend adapter seam.
//!
//! # Architecture
//!
//! The storefront talks to exactly one remote commerce platform, selected by
//! configuration at startup. Both platforms are hidden behind the
//! [`CommerceBackend`] trait: the cart synchronizer and the read path depend
//! only on the trait and the canonical model, never on a concrete backend or
//! a backend-native payload shape.
//!
//! - [`shopify`] - Shopify Storefront API (GraphQL over `reqwest`)
//! - [`fourthwall`] - Fourthwall public API (REST over `reqwest`)
//!
//! Mutating calls are issued with caching disabled so a read immediately
//! following a write is never served stale by an intermediary.

pub mod fourthwall;
pub mod shopify;

use async_trait::async_trait;
use mockall::automock;
use reefknot_core::{Cart, Collection, Product};
use thiserror::Error;

use crate::config::BackendConfig;

pub use fourthwall::FourthwallClient;
pub use shopify::ShopifyClient;

/// Errors that can occur when talking to a commerce backend.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// The HTTP request itself failed (connect, timeout, TLS).
    /// Carries the request URL for diagnostics; never retried here -
    /// retry policy belongs to the caller.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the JSON we expected.
    #[error("invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// A structurally required field was missing from a payload.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from a mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

/// A GraphQL error returned by a backend.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    pub path: Vec<String>,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .map(|e| {
            if e.path.is_empty() {
                e.message.clone()
            } else {
                format!("{} (path: {})", e.message, e.path.join("."))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineInput {
    /// Product variant to add.
    pub variant_id: String,
    /// Quantity to add.
    pub quantity: u32,
}

/// Input for updating an existing cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineUpdateInput {
    /// Backend-assigned line identifier.
    pub line_id: String,
    /// Variant held by the line.
    pub variant_id: String,
    /// New quantity (positive; removal goes through the remove call).
    pub quantity: u32,
}

/// The adapter interface a commerce backend must implement.
///
/// Every method returns canonical types; reshaping from the backend-native
/// representation happens inside the adapter.
#[automock]
#[async_trait]
pub trait CommerceBackend: Send + Sync {
    /// Create a new, empty cart.
    async fn create_cart(&self) -> Result<Cart, CommerceError>;

    /// Fetch an existing cart by its handle.
    async fn get_cart(&self, cart_id: &str) -> Result<Cart, CommerceError>;

    /// Add lines to a cart. Merge-vs-duplicate semantics for repeated adds
    /// of the same variant are the backend's decision.
    async fn add_to_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, CommerceError>;

    /// Remove lines from a cart by their backend-assigned line ids.
    async fn remove_from_cart(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, CommerceError>;

    /// Update existing cart lines.
    async fn update_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, CommerceError>;

    /// Resolve the hosted-checkout URL for a fetched cart.
    async fn begin_checkout(&self, cart: &Cart, currency: &str) -> Result<String, CommerceError>;

    /// Fetch a product by its URL handle.
    async fn get_product(&self, handle: &str) -> Result<Product, CommerceError>;

    /// List collections.
    async fn get_collections(&self) -> Result<Vec<Collection>, CommerceError>;

    /// List the products of a collection.
    async fn get_collection_products(&self, handle: &str)
    -> Result<Vec<Product>, CommerceError>;
}

/// The configured commerce backend, tagged by the startup selector.
#[derive(Clone)]
pub enum Commerce {
    Shopify(ShopifyClient),
    Fourthwall(FourthwallClient),
}

impl Commerce {
    /// Build the backend selected by configuration.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        match config {
            BackendConfig::Shopify(shopify) => Self::Shopify(ShopifyClient::new(shopify)),
            BackendConfig::Fourthwall(fourthwall) => {
                Self::Fourthwall(FourthwallClient::new(fourthwall))
            }
        }
    }
}

#[async_trait]
impl CommerceBackend for Commerce {
    async fn create_cart(&self) -> Result<Cart, CommerceError> {
        match self {
            Self::Shopify(client) => client.create_cart().await,
            Self::Fourthwall(client) => client.create_cart().await,
        }
    }

    async fn get_cart(&self, cart_id: &str) -> Result<Cart, CommerceError> {
        match self {
            Self::Shopify(client) => client.get_cart(cart_id).await,
            Self::Fourthwall(client) => client.get_cart(cart_id).await,
        }
    }

    async fn add_to_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, CommerceError> {
        match self {
            Self::Shopify(client) => client.add_to_cart(cart_id, lines).await,
            Self::Fourthwall(client) => client.add_to_cart(cart_id, lines).await,
        }
    }

    async fn remove_from_cart(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, CommerceError> {
        match self {
            Self::Shopify(client) => client.remove_from_cart(cart_id, line_ids).await,
            Self::Fourthwall(client) => client.remove_from_cart(cart_id, line_ids).await,
        }
    }

    async fn update_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, CommerceError> {
        match self {
            Self::Shopify(client) => client.update_cart(cart_id, lines).await,
            Self::Fourthwall(client) => client.update_cart(cart_id, lines).await,
        }
    }

    async fn begin_checkout(&self, cart: &Cart, currency: &str) -> Result<String, CommerceError> {
        match self {
            Self::Shopify(client) => client.begin_checkout(cart, currency).await,
            Self::Fourthwall(client) => client.begin_checkout(cart, currency).await,
        }
    }

    async fn get_product(&self, handle: &str) -> Result<Product, CommerceError> {
        match self {
            Self::Shopify(client) => client.get_product(handle).await,
            Self::Fourthwall(client) => client.get_product(handle).await,
        }
    }

    async fn get_collections(&self) -> Result<Vec<Collection>, CommerceError> {
        match self {
            Self::Shopify(client) => client.get_collections().await,
            Self::Fourthwall(client) => client.get_collections().await,
        }
    }

    async fn get_collection_products(
        &self,
        handle: &str,
    ) -> Result<Vec<Product>, CommerceError> {
        match self {
            Self::Shopify(client) => client.get_collection_products(handle).await,
            Self::Fourthwall(client) => client.get_collection_products(handle).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commerce_error_display() {
        let err = CommerceError::NotFound("cart-123".to_string());
        assert_eq!(err.to_string(), "Not found: cart-123");

        let err = CommerceError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field not found".to_string(),
                path: vec![],
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                path: vec!["cart".to_string(), "id".to_string()],
            },
        ];
        let err = CommerceError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID (path: cart.id)"
        );
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = CommerceError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }
}
