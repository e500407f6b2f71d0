//! Revalidation webhook handler.
//!
//! The commerce platform notifies this endpoint when catalog data changes.
//! The handler always answers HTTP 200 with a JSON body - a non-200 answer
//! would make the sender retry, and a secret mismatch must not hand an
//! unauthenticated caller a retry signal either. Only the internal
//! invalidation is skipped when verification fails.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
};
use chrono::Utc;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use crate::cache::{CacheTag, ResponseCache};
use crate::state::AppState;

/// Header carrying the webhook topic.
const TOPIC_HEADER: &str = "x-shopify-topic";

const COLLECTION_TOPICS: &[&str] = &[
    "collections/create",
    "collections/delete",
    "collections/update",
];
const PRODUCT_TOPICS: &[&str] = &["products/create", "products/delete", "products/update"];

/// Webhook query parameters.
#[derive(Debug, Deserialize)]
pub struct RevalidateParams {
    pub secret: Option<String>,
}

/// Webhook response body; `revalidated`/`now` are present only when an
/// invalidation actually fired.
#[derive(Debug, Serialize)]
pub struct RevalidateResponse {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revalidated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now: Option<i64>,
}

impl RevalidateResponse {
    /// Acknowledge without acting.
    const fn ack() -> Self {
        Self {
            status: 200,
            revalidated: None,
            now: None,
        }
    }
}

/// Handle an inbound change notification.
#[instrument(skip(state, headers, params))]
pub async fn revalidate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<RevalidateParams>,
) -> Json<RevalidateResponse> {
    let topic = headers
        .get(TOPIC_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    let secret_ok = params.secret.as_deref()
        == Some(state.config().revalidation_secret.expose_secret());

    if !secret_ok {
        error!("Invalid revalidation secret.");
        return Json(RevalidateResponse::ack());
    }

    Json(apply(state.cache(), topic))
}

/// Map a topic onto the tag it invalidates.
fn invalidation_for(topic: &str) -> Option<CacheTag> {
    if COLLECTION_TOPICS.contains(&topic) {
        Some(CacheTag::Collections)
    } else if PRODUCT_TOPICS.contains(&topic) {
        Some(CacheTag::Products)
    } else {
        None
    }
}

fn apply(cache: &ResponseCache, topic: &str) -> RevalidateResponse {
    match invalidation_for(topic) {
        Some(tag) => {
            cache.invalidate(tag);
            RevalidateResponse {
                status: 200,
                revalidated: Some(true),
                now: Some(Utc::now().timestamp_millis()),
            }
        }
        None => RevalidateResponse::ack(),
    }
}
