//! Pure reshaping from Fourthwall payloads into the canonical model.
//!
//! Reshaping is deterministic and does no I/O. It is total over its declared
//! domain: absent collections become empty vectors and absent products are
//! filtered silently; only a payload missing a structurally required id is a
//! hard failure surfaced to the caller. Cart totals are recomputed from the
//! line items - the backend's own total/tax fields, where they exist at all,
//! are ignored.

use reefknot_core::{Cart, CartLine, Collection, Image, Money, Product, ProductVariant};

use crate::commerce::CommerceError;

use super::types::{
    CartPayload, CollectionPayload, ImagePayload, MoneyPayload, ProductPayload, VariantPayload,
};

pub fn cart(payload: CartPayload) -> Result<Cart, CommerceError> {
    let id = payload
        .id
        .ok_or_else(|| CommerceError::Malformed("cart payload has no id".to_string()))?;

    let lines = payload
        .items
        .into_iter()
        .map(|item| {
            // Fourthwall addresses lines by variant, so the variant id
            // doubles as the line handle.
            CartLine::new(
                Some(item.variant.id.clone()),
                item.variant.id,
                item.variant.name,
                item.quantity,
                money(item.variant.unit_price),
            )
        })
        .collect();

    Ok(Cart::from_lines(id, None, lines))
}

pub fn product(payload: Option<ProductPayload>) -> Option<Product> {
    let payload = payload?;

    Some(Product {
        id: payload.id,
        handle: payload.slug,
        title: payload.name.clone(),
        description: payload.description,
        available_for_sale: true,
        images: images(payload.images, &payload.name),
        variants: variants(payload.variants),
    })
}

pub fn products(payloads: Vec<Option<ProductPayload>>) -> Vec<Product> {
    payloads.into_iter().filter_map(product).collect()
}

/// Derive alt text from the image URL's filename stem; fall back to the raw
/// URL when the pattern does not match.
pub fn images(payloads: Vec<ImagePayload>, product_title: &str) -> Vec<Image> {
    payloads
        .into_iter()
        .map(|image| {
            let alt_text = filename_stem(&image.url).map_or_else(
                || image.url.clone(),
                |stem| format!("{product_title} - {stem}"),
            );
            Image {
                url: image.url,
                alt_text: Some(alt_text),
                width: image.width,
                height: image.height,
            }
        })
        .collect()
}

/// Fourthwall variants are always orderable; stock levels are not modeled
/// at this layer.
pub fn variants(payloads: Vec<VariantPayload>) -> Vec<ProductVariant> {
    payloads
        .into_iter()
        .map(|variant| ProductVariant {
            id: variant.id,
            title: variant.name,
            sku: variant.sku,
            available_for_sale: true,
            price: money(variant.unit_price),
        })
        .collect()
}

pub fn collection(payload: CollectionPayload) -> Collection {
    Collection {
        path: format!("/search/{}", payload.handle),
        handle: payload.handle,
        title: payload.title,
        description: payload.description,
        updated_at: payload.updated_at,
    }
}

pub fn collections(payloads: Vec<CollectionPayload>) -> Vec<Collection> {
    payloads.into_iter().map(collection).collect()
}

fn money(payload: MoneyPayload) -> Money {
    Money::new(payload.value, payload.currency_code)
}

/// The text between the last `/` and the last `.` of a URL path.
fn filename_stem(url: &str) -> Option<&str> {
    let (_, name) = url.rsplit_once('/')?;
    let (stem, _extension) = name.rsplit_once('.')?;
    (!stem.is_empty()).then_some(stem)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn money_payload(cents: i64) -> MoneyPayload {
        MoneyPayload {
            value: Decimal::new(cents, 2),
            currency_code: "USD".to_string(),
        }
    }

    fn variant_payload(id: &str, cents: i64) -> VariantPayload {
        VariantPayload {
            id: id.to_string(),
            name: format!("Variant {id}"),
            sku: None,
            unit_price: money_payload(cents),
            images: vec![],
        }
    }

    fn cart_payload(items: Vec<(VariantPayload, u32)>) -> CartPayload {
        CartPayload {
            id: Some("cart-1".to_string()),
            items: items
                .into_iter()
                .map(|(variant, quantity)| super::super::types::CartItemPayload {
                    variant,
                    quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn test_cart_total_recomputed_from_lines() {
        let payload = cart_payload(vec![
            (variant_payload("v1", 1250), 2),
            (variant_payload("v2", 499), 1),
        ]);

        let cart = cart(payload).expect("cart reshapes");

        // 2 x 12.50 + 1 x 4.99
        assert_eq!(cart.total_cost.amount, Decimal::new(2999, 2));
        assert_eq!(cart.total_cost.currency_code, "USD");
    }

    #[test]
    fn test_empty_cart_defaults_to_zero_usd() {
        let cart = cart(cart_payload(vec![])).expect("cart reshapes");
        assert!(cart.lines.is_empty());
        assert_eq!(cart.total_cost, Money::zero("USD"));
    }

    #[test]
    fn test_cart_without_id_is_malformed() {
        let payload = CartPayload { id: None, items: vec![] };
        assert!(matches!(cart(payload), Err(CommerceError::Malformed(_))));
    }

    #[test]
    fn test_line_id_mirrors_variant_id() {
        let cart = cart(cart_payload(vec![(variant_payload("v1", 100), 1)]))
            .expect("cart reshapes");
        let line = cart.line_for_variant("v1").expect("line present");
        assert_eq!(line.line_id.as_deref(), Some("v1"));
    }

    #[test]
    fn test_merged_add_round_trips_as_one_line() {
        // Backend merged a repeated add into a single line with quantity 2.
        let cart = cart(cart_payload(vec![(variant_payload("v1", 500), 2)]))
            .expect("cart reshapes");
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines.first().map(|l| l.quantity), Some(2));
        assert_eq!(cart.total_cost.amount, Decimal::new(1000, 2));
    }

    #[test]
    fn test_duplicate_lines_round_trip_unmerged() {
        // Backend chose duplicate lines instead; reshape must not collapse them.
        let cart = cart(cart_payload(vec![
            (variant_payload("v1", 500), 1),
            (variant_payload("v1", 500), 1),
        ]))
        .expect("cart reshapes");
        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.total_cost.amount, Decimal::new(1000, 2));
    }

    #[test]
    fn test_image_alt_text_from_filename_stem() {
        let reshaped = images(
            vec![ImagePayload {
                url: "https://cdn.example.com/media/blue-tee.png".to_string(),
                width: Some(800),
                height: Some(600),
            }],
            "Blue Tee",
        );

        assert_eq!(
            reshaped.first().and_then(|i| i.alt_text.as_deref()),
            Some("Blue Tee - blue-tee")
        );
    }

    #[test]
    fn test_image_alt_text_falls_back_to_url() {
        let url = "https://cdn.example.com/media/no-extension";
        let reshaped = images(
            vec![ImagePayload {
                url: url.to_string(),
                width: None,
                height: None,
            }],
            "Blue Tee",
        );

        assert_eq!(reshaped.first().and_then(|i| i.alt_text.as_deref()), Some(url));
    }

    #[test]
    fn test_variants_are_always_orderable() {
        let reshaped = variants(vec![variant_payload("v1", 100)]);
        assert!(reshaped.first().is_some_and(|v| v.available_for_sale));
        assert_eq!(reshaped.first().map(|v| v.title.as_str()), Some("Variant v1"));
    }

    #[test]
    fn test_products_filters_absent_entries() {
        let payloads = vec![
            None,
            Some(ProductPayload {
                id: "p1".to_string(),
                name: "Tee".to_string(),
                slug: "tee".to_string(),
                description: String::new(),
                images: vec![],
                variants: vec![],
            }),
            None,
        ];

        let reshaped = products(payloads);
        assert_eq!(reshaped.len(), 1);
        assert_eq!(reshaped.first().map(|p| p.handle.as_str()), Some("tee"));
    }

    #[test]
    fn test_collection_gets_search_path() {
        let reshaped = collection(CollectionPayload {
            handle: "summer".to_string(),
            title: "Summer".to_string(),
            description: String::new(),
            updated_at: None,
        });
        assert_eq!(reshaped.path, "/search/summer");
    }
}
