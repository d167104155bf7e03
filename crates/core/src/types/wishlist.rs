//! Wishlist entries saved by a shopper.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};
use super::price::Price;

/// A product saved to a shopper's wishlist.
///
/// Identity is the product ID; the other fields are display data captured
/// when the item was saved and may drift from the live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub handle: String,
    pub title: String,
    /// Variant to add when the item is moved to the cart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl WishlistItem {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(product_id: ProductId, handle: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            product_id,
            handle: handle.into(),
            title: title.into(),
            variant_id: None,
            price: None,
            image_url: None,
            added_at: Utc::now(),
        }
    }
}
