//! Wire types for the Fourthwall public API.
//!
//! These mirror the JSON the API actually sends and exist only inside the
//! adapter; everything leaving this module has been reshaped into the
//! canonical model.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Monetary amount as Fourthwall sends it (JSON number, two decimals).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyPayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    pub currency_code: String,
}

/// A cart as returned by the cart endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    /// Absent only on malformed responses; required downstream.
    pub id: Option<String>,
    #[serde(default)]
    pub items: Vec<CartItemPayload>,
}

/// One cart line; Fourthwall keys lines by variant, not by a line id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemPayload {
    pub variant: VariantPayload,
    pub quantity: u32,
}

/// A product variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPayload {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub unit_price: MoneyPayload,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
}

/// A product image. Fourthwall supplies no alt text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub url: String,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
}

/// A product as returned by the collection-products endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
    #[serde(default)]
    pub variants: Vec<VariantPayload>,
}

/// Product listing envelope; `results` is absent for unknown collections.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListPayload {
    pub results: Option<Vec<Option<ProductPayload>>>,
}

/// A collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPayload {
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Collection listing envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionsPayload {
    #[serde(default)]
    pub collections: Vec<CollectionPayload>,
}

/// A checkout session minted for a cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub id: String,
}
