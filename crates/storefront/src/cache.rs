//! Tag-scoped response cache for the read path.
//!
//! Cached reads are grouped under three named tags - `cart`, `collections`,
//! `products` - and invalidated as a group: cart mutations raise the `cart`
//! tag, the revalidation webhook raises the catalog tags. Invalidation is a
//! fire-and-forget epoch bump; entries written under an older epoch become
//! unreachable and age out of the `moka` cache by TTL. Readers must tolerate
//! an invalidation arriving just before or just after the write it describes
//! becomes visible.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use reefknot_core::{Cart, Collection, Product};

/// Cache entry lifetime.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Maximum number of cached entries.
const CACHE_CAPACITY: u64 = 1000;

/// Named invalidation tags consumed by the read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    /// Cart reads; raised by every successful cart mutation.
    Cart,
    /// Collection listings; raised by collection-lifecycle webhooks.
    Collections,
    /// Product payloads; raised by product-lifecycle webhooks.
    Products,
}

impl CacheTag {
    /// The wire name of this tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Collections => "collections",
            Self::Products => "products",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Cart => 0,
            Self::Collections => 1,
            Self::Products => 2,
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Cart(Box<Cart>),
    Product(Box<Product>),
    Products(Vec<Product>),
    Collections(Vec<Collection>),
}

/// Tag-scoped cache shared between the read path and the invalidators.
///
/// Cheaply cloneable; clones share the underlying cache.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<ResponseCacheInner>,
}

struct ResponseCacheInner {
    cache: Cache<(CacheTag, u64, String), CacheValue>,
    epochs: [AtomicU64; 3],
}

impl ResponseCache {
    /// Create a new cache with the default capacity and TTL.
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ResponseCacheInner {
                cache,
                epochs: [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)],
            }),
        }
    }

    fn epoch(&self, tag: CacheTag) -> u64 {
        self.inner
            .epochs
            .get(tag.index())
            .map_or(0, |epoch| epoch.load(Ordering::Acquire))
    }

    /// Look up a cached value under a tag.
    pub async fn get(&self, tag: CacheTag, key: &str) -> Option<CacheValue> {
        let epoch = self.epoch(tag);
        self.inner.cache.get(&(tag, epoch, key.to_string())).await
    }

    /// Store a value under a tag.
    pub async fn insert(&self, tag: CacheTag, key: impl Into<String>, value: CacheValue) {
        let epoch = self.epoch(tag);
        self.inner.cache.insert((tag, epoch, key.into()), value).await;
    }

    /// Raise the invalidation signal for a tag.
    ///
    /// All entries cached under the tag become unreachable immediately;
    /// the underlying storage reclaims them via TTL.
    pub fn invalidate(&self, tag: CacheTag) {
        if let Some(epoch) = self.inner.epochs.get(tag.index()) {
            epoch.fetch_add(1, Ordering::Release);
        }
        tracing::debug!(tag = tag.as_str(), "cache tag invalidated");
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_collections() -> CacheValue {
        CacheValue::Collections(vec![Collection::all_products("2024-01-01T00:00:00Z")])
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = ResponseCache::new();
        cache
            .insert(CacheTag::Collections, "collections", sample_collections())
            .await;

        assert!(cache.get(CacheTag::Collections, "collections").await.is_some());
    }

    #[tokio::test]
    async fn test_miss_on_unknown_key() {
        let cache = ResponseCache::new();
        assert!(cache.get(CacheTag::Products, "product:missing").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_drops_only_that_tag() {
        let cache = ResponseCache::new();
        cache
            .insert(CacheTag::Collections, "collections", sample_collections())
            .await;
        cache
            .insert(CacheTag::Products, "products", CacheValue::Products(vec![]))
            .await;

        cache.invalidate(CacheTag::Collections);

        assert!(cache.get(CacheTag::Collections, "collections").await.is_none());
        assert!(cache.get(CacheTag::Products, "products").await.is_some());
    }

    #[tokio::test]
    async fn test_repeated_invalidation_is_harmless() {
        let cache = ResponseCache::new();
        cache.invalidate(CacheTag::Cart);
        cache.invalidate(CacheTag::Cart);

        cache
            .insert(CacheTag::Cart, "cart:1", CacheValue::Products(vec![]))
            .await;
        assert!(cache.get(CacheTag::Cart, "cart:1").await.is_some());
    }
}
