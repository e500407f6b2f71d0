//! Response data types for the Shopify Storefront GraphQL API.
//!
//! Hand-written to match the query documents in [`super::queries`]; used as
//! the `data` payload of `graphql_client::Response`. These shapes never
//! leave the adapter - [`super::convert`] maps them into the canonical
//! model.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Relay-style connection wrapper.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

/// Relay-style edge wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// Shopify `MoneyV2`; the amount arrives as a decimal string.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyV2 {
    pub amount: Decimal,
    pub currency_code: String,
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartNode {
    pub id: String,
    #[serde(default)]
    pub checkout_url: Option<String>,
    #[serde(default)]
    pub lines: Connection<CartLineNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineNode {
    pub id: String,
    pub quantity: u32,
    pub merchandise: MerchandiseNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseNode {
    pub id: String,
    pub title: String,
    pub price: MoneyV2,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserErrorNode {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Payload shared by every cart mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<CartNode>,
    #[serde(default)]
    pub user_errors: Vec<UserErrorNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQueryData {
    pub cart: Option<CartNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreateData {
    pub cart_create: Option<CartMutationPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesAddData {
    pub cart_lines_add: Option<CartMutationPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesRemoveData {
    pub cart_lines_remove: Option<CartMutationPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesUpdateData {
    pub cart_lines_update: Option<CartMutationPayload>,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub available_for_sale: bool,
    pub price: MoneyV2,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub available_for_sale: bool,
    #[serde(default)]
    pub images: Connection<ImageNode>,
    #[serde(default)]
    pub variants: Connection<VariantNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQueryData {
    pub product: Option<ProductNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionNode {
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionsQueryData {
    #[serde(default)]
    pub collections: Connection<CollectionNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProductsNode {
    #[serde(default)]
    pub products: Connection<ProductNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProductsQueryData {
    pub collection: Option<CollectionProductsNode>,
}
