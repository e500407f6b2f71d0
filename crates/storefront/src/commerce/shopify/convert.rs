//! Conversions from Shopify GraphQL nodes into the canonical model.
//!
//! Cart totals follow the same policy as the Fourthwall reshaper: recomputed
//! from the lines, never read from the backend's cost fields.

use reefknot_core::{Cart, CartLine, Collection, Image, Money, Product, ProductVariant};

use super::types::{CartNode, CollectionNode, MoneyV2, ProductNode};

pub fn cart(node: CartNode) -> Cart {
    let lines = node
        .lines
        .edges
        .into_iter()
        .map(|edge| {
            let line = edge.node;
            CartLine::new(
                Some(line.id),
                line.merchandise.id,
                line.merchandise.title,
                line.quantity,
                money(line.merchandise.price),
            )
        })
        .collect();

    Cart::from_lines(node.id, node.checkout_url, lines)
}

pub fn product(node: ProductNode) -> Product {
    Product {
        id: node.id,
        handle: node.handle,
        title: node.title,
        description: node.description,
        available_for_sale: node.available_for_sale,
        images: node
            .images
            .edges
            .into_iter()
            .map(|edge| Image {
                url: edge.node.url,
                alt_text: edge.node.alt_text,
                width: edge.node.width,
                height: edge.node.height,
            })
            .collect(),
        variants: node
            .variants
            .edges
            .into_iter()
            .map(|edge| ProductVariant {
                id: edge.node.id,
                title: edge.node.title,
                sku: edge.node.sku,
                available_for_sale: edge.node.available_for_sale,
                price: money(edge.node.price),
            })
            .collect(),
    }
}

pub fn collection(node: CollectionNode) -> Collection {
    Collection {
        path: format!("/search/{}", node.handle),
        handle: node.handle,
        title: node.title,
        description: node.description,
        updated_at: node.updated_at,
    }
}

fn money(payload: MoneyV2) -> Money {
    Money::new(payload.amount, payload.currency_code)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_cart_total_recomputed_from_lines() {
        let node: CartNode = serde_json::from_value(json!({
            "id": "gid://shopify/Cart/abc",
            "checkoutUrl": "https://shop.example.com/checkout/abc",
            "lines": {
                "edges": [
                    {
                        "node": {
                            "id": "gid://shopify/CartLine/1",
                            "quantity": 2,
                            "merchandise": {
                                "id": "gid://shopify/ProductVariant/11",
                                "title": "Small",
                                "price": { "amount": "12.50", "currencyCode": "USD" }
                            }
                        }
                    },
                    {
                        "node": {
                            "id": "gid://shopify/CartLine/2",
                            "quantity": 1,
                            "merchandise": {
                                "id": "gid://shopify/ProductVariant/12",
                                "title": "Large",
                                "price": { "amount": "4.99", "currencyCode": "USD" }
                            }
                        }
                    }
                ]
            }
        }))
        .expect("cart node parses");

        let cart = cart(node);

        assert_eq!(cart.total_cost.amount, Decimal::new(2999, 2));
        assert_eq!(
            cart.checkout_url.as_deref(),
            Some("https://shop.example.com/checkout/abc")
        );
        assert_eq!(cart.lines.len(), 2);
        let line = cart
            .line_for_variant("gid://shopify/ProductVariant/11")
            .expect("line present");
        assert_eq!(line.line_id.as_deref(), Some("gid://shopify/CartLine/1"));
    }

    #[test]
    fn test_empty_cart_converts_to_zero_usd() {
        let node: CartNode = serde_json::from_value(json!({
            "id": "gid://shopify/Cart/abc",
            "checkoutUrl": null,
            "lines": { "edges": [] }
        }))
        .expect("cart node parses");

        let cart = cart(node);
        assert!(cart.is_empty());
        assert_eq!(cart.total_cost, Money::zero("USD"));
    }

    #[test]
    fn test_product_conversion_keeps_availability() {
        let node: ProductNode = serde_json::from_value(json!({
            "id": "gid://shopify/Product/1",
            "handle": "blue-tee",
            "title": "Blue Tee",
            "description": "A tee.",
            "availableForSale": true,
            "images": {
                "edges": [
                    { "node": { "url": "https://cdn/img.png", "altText": "Front", "width": 800, "height": 600 } }
                ]
            },
            "variants": {
                "edges": [
                    {
                        "node": {
                            "id": "gid://shopify/ProductVariant/11",
                            "title": "Small",
                            "sku": "TEE-S",
                            "availableForSale": false,
                            "price": { "amount": "19.00", "currencyCode": "USD" }
                        }
                    }
                ]
            }
        }))
        .expect("product node parses");

        let product = product(node);
        assert_eq!(product.handle, "blue-tee");
        assert_eq!(
            product.variants.first().map(|v| v.available_for_sale),
            Some(false)
        );
        assert_eq!(
            product.images.first().and_then(|i| i.alt_text.as_deref()),
            Some("Front")
        );
    }

    #[test]
    fn test_collection_gets_search_path() {
        let converted = collection(CollectionNode {
            handle: "summer".to_string(),
            title: "Summer".to_string(),
            description: String::new(),
            updated_at: Some("2024-01-01T00:00:00Z".to_string()),
        });
        assert_eq!(converted.path, "/search/summer");
    }
}
