//! Shopfront Core - Shared types library.
//!
//! This crate provides the types shared by every Shopfront component:
//! - `storefront` - Storefront API client, cart/wishlist/session managers
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! persistence, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for remote IDs, shopper keys, prices, emails and statuses
//! - [`order_status`] - Maps an order's two remote statuses to a display step

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod order_status;
pub mod types;

pub use order_status::{OrderDisplayStatus, ProgressStep, StatusTone, resolve_display_status};
pub use types::*;
