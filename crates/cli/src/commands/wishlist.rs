//! Wishlist commands.

use clap::Subcommand;

use shopfront_storefront::error::AppError;
use shopfront_storefront::services::wishlist::item_from_product;
use shopfront_storefront::state::AppState;

use crate::output::Output;

#[derive(Subcommand)]
pub enum WishlistAction {
    /// List saved products
    List,
    /// Save a product by handle
    Add { handle: String },
    /// Remove a product by handle or product ID
    Remove { product: String },
    /// Remove every saved product
    Clear,
}

pub async fn run(state: &AppState, action: WishlistAction, out: Output) -> Result<(), AppError> {
    let wishlist = state.wishlist();

    match action {
        WishlistAction::List => {
            let items = wishlist.items()?;
            out.emit(&items, |items| {
                if items.is_empty() {
                    println!("Your wishlist is empty.");
                }
                for item in items {
                    let price = item.price.as_ref().map(|p| p.display()).unwrap_or_default();
                    println!("{:<32} {:<40} {price}", item.handle, item.title);
                }
            });
        }
        WishlistAction::Add { handle } => {
            let product = super::catalog(state)?.product_by_handle(&handle).await?;
            if wishlist.add(item_from_product(&product))? {
                out.message(&format!("Saved {}", product.title));
            } else {
                out.message(&format!("{} is already in your wishlist", product.title));
            }
        }
        WishlistAction::Remove { product } => {
            let saved = wishlist
                .items()?
                .into_iter()
                .find(|i| i.handle == product || i.product_id.as_str() == product)
                .ok_or_else(|| AppError::NotFound(format!("{product} in your wishlist")))?;
            wishlist.remove(&saved.product_id)?;
            out.message(&format!("Removed {}", saved.title));
        }
        WishlistAction::Clear => {
            wishlist.clear()?;
            out.message("Wishlist cleared");
        }
    }
    Ok(())
}
