//! Read-only catalog projections.
//!
//! Products and variants are never mutated by this layer; they are reshaped
//! from backend catalog payloads for the read path.

use serde::{Deserialize, Serialize};

use crate::types::money::Money;

/// Product or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility. Derived from the URL filename when the
    /// backend supplies none.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

/// A product variant (specific purchasable combination).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    pub id: String,
    /// Variant title.
    pub title: String,
    /// SKU code.
    pub sku: Option<String>,
    /// Whether this variant can currently be ordered.
    pub available_for_sale: bool,
    /// Current price.
    pub price: Money,
}

/// A product in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// Whether any variant is available.
    pub available_for_sale: bool,
    /// All product images.
    pub images: Vec<Image>,
    /// Product variants.
    pub variants: Vec<ProductVariant>,
}
