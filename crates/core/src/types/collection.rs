//! Collection projections.

use serde::{Deserialize, Serialize};

/// A collection of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// URL handle. Empty for the synthetic catalog-wide collection.
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// Storefront search path for this collection.
    pub path: String,
    /// Last update timestamp, when the backend reports one.
    pub updated_at: Option<String>,
}

impl Collection {
    /// The synthetic "All products" collection prepended to listings.
    #[must_use]
    pub fn all_products(updated_at: impl Into<String>) -> Self {
        Self {
            handle: String::new(),
            title: "All".to_string(),
            description: "All products".to_string(),
            path: "/search".to_string(),
            updated_at: Some(updated_at.into()),
        }
    }
}
