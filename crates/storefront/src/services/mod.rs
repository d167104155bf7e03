//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Customer login, logout and registration
//! - `cart` - Shopper-scoped cart over the Storefront API
//! - `orders` - Order history and saved addresses
//! - `wishlist` - Per-shopper wishlist in the local store

pub mod auth;
pub mod cart;
pub mod orders;
pub mod wishlist;

pub use auth::{AccountService, AuthError, Registration};
pub use cart::{CartError, CartManager};
pub use orders::{OrderError, OrderService};
pub use wishlist::{WishlistError, WishlistManager};
