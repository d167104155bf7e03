//! Subcommand definitions and handlers.

pub mod account;
pub mod cart;
pub mod collections;
pub mod orders;
pub mod products;
pub mod status;
pub mod wishlist;

pub use account::AccountAction;
pub use cart::CartAction;
pub use collections::CollectionsAction;
pub use orders::OrdersAction;
pub use products::ProductsAction;
pub use wishlist::WishlistAction;

use shopfront_storefront::error::AppError;
use shopfront_storefront::shopify::StorefrontClient;
use shopfront_storefront::state::AppState;

/// The catalog client, which only exists when talking to a real store.
fn catalog(state: &AppState) -> Result<&StorefrontClient, AppError> {
    state
        .storefront()
        .ok_or_else(|| AppError::NotFound("storefront catalog".to_string()))
}
