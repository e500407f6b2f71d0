//! Reefknot Core - Canonical commerce model.
//!
//! This crate defines the internal commerce schema every backend is
//! normalized into: money, carts, cart lines, products, and collections.
//! The `storefront` crate reshapes backend-native payloads (Shopify
//! Storefront GraphQL, Fourthwall REST) into these types and never exposes
//! a backend-native shape past its adapter boundary.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Amounts use
//! `rust_decimal::Decimal` so money arithmetic is exact.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
