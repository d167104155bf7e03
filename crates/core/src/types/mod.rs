//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod shopper;
pub mod status;
pub mod wishlist;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use shopper::ShopperKey;
pub use status::*;
pub use wishlist::WishlistItem;
