//! GraphQL query documents for the Shopify Storefront API.
//!
//! Documents are plain runtime strings; the response envelope is parsed with
//! `graphql_client::Response` and hand-written data types in
//! [`super::types`], so no schema codegen step is involved.

/// Append the shared cart fragment to an operation document.
macro_rules! with_cart_fields {
    ($operation:literal) => {
        concat!(
            $operation,
            r"
fragment CartFields on Cart {
  id
  checkoutUrl
  lines(first: 100) {
    edges {
      node {
        id
        quantity
        merchandise {
          ... on ProductVariant {
            id
            title
            price {
              amount
              currencyCode
            }
          }
        }
      }
    }
  }
}
"
        )
    };
}

pub const GET_CART: &str = with_cart_fields!(
    r"query getCart($cartId: ID!) {
  cart(id: $cartId) {
    ...CartFields
  }
}
"
);

pub const CREATE_CART: &str = with_cart_fields!(
    r"mutation createCart($input: CartInput!) {
  cartCreate(input: $input) {
    cart {
      ...CartFields
    }
    userErrors {
      field
      message
    }
  }
}
"
);

pub const ADD_TO_CART: &str = with_cart_fields!(
    r"mutation addToCart($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFields
    }
    userErrors {
      field
      message
    }
  }
}
"
);

pub const REMOVE_FROM_CART: &str = with_cart_fields!(
    r"mutation removeFromCart($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart {
      ...CartFields
    }
    userErrors {
      field
      message
    }
  }
}
"
);

pub const UPDATE_CART_LINES: &str = with_cart_fields!(
    r"mutation updateCartLines($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFields
    }
    userErrors {
      field
      message
    }
  }
}
"
);

/// Append the shared product fragment to an operation document.
macro_rules! with_product_fields {
    ($operation:literal) => {
        concat!(
            $operation,
            r"
fragment ProductFields on Product {
  id
  handle
  title
  description
  availableForSale
  images(first: 10) {
    edges {
      node {
        url
        altText
        width
        height
      }
    }
  }
  variants(first: 50) {
    edges {
      node {
        id
        title
        sku
        availableForSale
        price {
          amount
          currencyCode
        }
      }
    }
  }
}
"
        )
    };
}

pub const GET_PRODUCT_BY_HANDLE: &str = with_product_fields!(
    r"query getProductByHandle($handle: String!) {
  product(handle: $handle) {
    ...ProductFields
  }
}
"
);

pub const GET_COLLECTION_PRODUCTS: &str = with_product_fields!(
    r"query getCollectionProducts($handle: String!) {
  collection(handle: $handle) {
    products(first: 100) {
      edges {
        node {
          ...ProductFields
        }
      }
    }
  }
}
"
);

pub const GET_COLLECTIONS: &str = r"query getCollections {
  collections(first: 100) {
    edges {
      node {
        handle
        title
        description
        updatedAt
      }
    }
  }
}
";
