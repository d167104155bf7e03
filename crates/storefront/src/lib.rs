//! Shopfront Storefront library.
//!
//! A thin client over the Shopify Storefront API. Shopify owns every product,
//! cart, customer and order; this crate owns the client-side state around
//! them:
//!
//! - [`services::cart`] - shopper-scoped cart identity, refetch after every mutation
//! - [`services::wishlist`] - per-shopper wishlist in the local store
//! - [`services::auth`] - customer login/logout/registration
//! - [`services::orders`] - session-protected order history and addresses
//! - [`storage`] - the synchronous key-value store that replaces browser storage
//! - [`state`] - composition root that wires the above together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod events;
pub mod services;
pub mod session;
pub mod shopify;
pub mod state;
pub mod storage;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
