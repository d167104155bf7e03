//! Cart commands.

use clap::Subcommand;

use shopfront_core::{CartLineId, VariantId};
use shopfront_storefront::error::AppError;
use shopfront_storefront::services::CartError;
use shopfront_storefront::state::AppState;

use crate::output::{Output, print_cart};

const VARIANT_GID_PREFIX: &str = "gid://shopify/ProductVariant/";

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Add a product (by handle) or a variant (by ID)
    Add {
        /// Product handle or `gid://shopify/ProductVariant/...`
        item: String,
        /// Variant of the product to add (default: first available)
        #[arg(long)]
        variant: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Set a line's quantity; 0 removes it
    Set {
        line_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { line_id: String },
    /// Start over with an empty cart
    Clear,
    /// Replace the applied discount codes; no codes removes them all
    Discount { codes: Vec<String> },
    /// Set the order note
    Note { text: String },
    /// Print the checkout URL
    Checkout,
}

pub async fn run(state: &AppState, action: CartAction, out: Output) -> Result<(), AppError> {
    let mut manager = state.cart_manager();

    let cart = match action {
        CartAction::Show => manager.resolve_active_cart().await?,
        CartAction::Add {
            item,
            variant,
            quantity,
        } => {
            if item.starts_with(VARIANT_GID_PREFIX) {
                manager.add_item(&VariantId::new(item), quantity).await?
            } else {
                let product = super::catalog(state)?.product_by_handle(&item).await?;
                match variant {
                    Some(id) => {
                        let variant = product
                            .variant(&VariantId::new(id))
                            .ok_or(CartError::MissingVariant)?;
                        manager.add_item(&variant.id, quantity).await?
                    }
                    None => manager.add_product(&product, quantity).await?,
                }
            }
        }
        CartAction::Set { line_id, quantity } => {
            manager
                .set_quantity(&CartLineId::new(line_id), quantity)
                .await?
        }
        CartAction::Remove { line_id } => manager.remove_item(&CartLineId::new(line_id)).await?,
        CartAction::Clear => manager.clear().await?,
        CartAction::Discount { codes } => manager.apply_discount_codes(&codes).await?,
        CartAction::Note { text } => manager.set_note(&text).await?,
        CartAction::Checkout => {
            let cart = manager.resolve_active_cart().await?;
            if cart.is_empty() {
                return Err(AppError::BadRequest(
                    "Your cart is empty, add something before checking out".to_string(),
                ));
            }
            out.emit(
                &serde_json::json!({ "checkout_url": cart.checkout_url }),
                |_| println!("{}", cart.checkout_url),
            );
            return Ok(());
        }
    };

    out.emit(cart, print_cart);
    Ok(())
}
