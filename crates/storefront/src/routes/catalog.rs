//! Cached catalog read handlers.
//!
//! Reads go through the tag-scoped response cache; the revalidation webhook
//! drops the matching tag when the remote catalog changes.

use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::Utc;
use tracing::{debug, instrument};

use reefknot_core::{Collection, Product};

use crate::cache::{CacheTag, CacheValue};
use crate::commerce::CommerceBackend;
use crate::error::Result;
use crate::state::AppState;

/// Product detail.
#[instrument(skip(state), fields(handle = %handle))]
pub async fn show_product(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Product>> {
    let cache_key = format!("product:{handle}");

    if let Some(CacheValue::Product(product)) =
        state.cache().get(CacheTag::Products, &cache_key).await
    {
        debug!("Cache hit for product");
        return Ok(Json(*product));
    }

    let product = state.commerce().get_product(&handle).await?;

    state
        .cache()
        .insert(
            CacheTag::Products,
            cache_key,
            CacheValue::Product(Box::new(product.clone())),
        )
        .await;

    Ok(Json(product))
}

/// Collection listing.
///
/// Prepends the synthetic "All products" entry and hides `hidden-*`
/// collections, which exist only for internal storefront wiring.
#[instrument(skip(state))]
pub async fn list_collections(State(state): State<AppState>) -> Result<Json<Vec<Collection>>> {
    const CACHE_KEY: &str = "collections";

    if let Some(CacheValue::Collections(collections)) =
        state.cache().get(CacheTag::Collections, CACHE_KEY).await
    {
        debug!("Cache hit for collections");
        return Ok(Json(collections));
    }

    let mut collections = vec![Collection::all_products(Utc::now().to_rfc3339())];
    collections.extend(
        state
            .commerce()
            .get_collections()
            .await?
            .into_iter()
            .filter(|collection| !collection.handle.starts_with("hidden")),
    );

    state
        .cache()
        .insert(
            CacheTag::Collections,
            CACHE_KEY,
            CacheValue::Collections(collections.clone()),
        )
        .await;

    Ok(Json(collections))
}

/// Products of a collection.
#[instrument(skip(state), fields(handle = %handle))]
pub async fn collection_products(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let cache_key = format!("collection:{handle}:products");

    if let Some(CacheValue::Products(products)) =
        state.cache().get(CacheTag::Collections, &cache_key).await
    {
        debug!("Cache hit for collection products");
        return Ok(Json(products));
    }

    let products = state.commerce().get_collection_products(&handle).await?;

    state
        .cache()
        .insert(
            CacheTag::Collections,
            cache_key,
            CacheValue::Products(products.clone()),
        )
        .await;

    Ok(Json(products))
}
