//! Per-shopper wishlist persisted in the key-value store.
//!
//! Items live under `<prefix>-<shopperKey>` (e.g. `wishlist-guest`) as a JSON
//! array, deduplicated by product ID. The shopper is read from the session
//! on every call, so login and logout take effect immediately.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use shopfront_core::{ProductId, ShopperKey, WishlistItem};

use crate::session::SessionStore;
use crate::shopify::Product;
use crate::storage::{JsonStoreExt, KeyValueStore, StorageError};

/// Errors that can occur during wishlist operations.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// Reading or writing the wishlist failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Reads and writes the current shopper's wishlist.
#[derive(Clone)]
pub struct WishlistManager {
    store: Arc<dyn KeyValueStore>,
    session: SessionStore,
    key_prefix: String,
}

impl WishlistManager {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            session: SessionStore::new(Arc::clone(&store)),
            store,
            key_prefix: key_prefix.into(),
        }
    }

    /// Storage key holding a shopper's wishlist.
    #[must_use]
    pub fn storage_key(&self, shopper: &ShopperKey) -> String {
        format!("{}-{}", self.key_prefix, shopper.as_storage_key())
    }

    fn current_key(&self) -> Result<String, WishlistError> {
        Ok(self.storage_key(&self.session.shopper_key()?))
    }

    fn load(&self, key: &str) -> Result<Vec<WishlistItem>, WishlistError> {
        match self.store.get_json::<Vec<WishlistItem>>(key) {
            Ok(items) => Ok(items.unwrap_or_default()),
            Err(StorageError::CorruptValue { source, .. }) => {
                warn!(key, error = %source, "Ignoring unreadable wishlist");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, items: &[WishlistItem]) -> Result<(), WishlistError> {
        if items.is_empty() {
            self.store.remove(key)?;
        } else {
            self.store.set_json(key, items)?;
        }
        Ok(())
    }

    /// The current shopper's saved items, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn items(&self) -> Result<Vec<WishlistItem>, WishlistError> {
        self.load(&self.current_key()?)
    }

    /// Save an item. Returns `false` if the product was already saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self, item), fields(product_id = %item.product_id))]
    pub fn add(&self, item: WishlistItem) -> Result<bool, WishlistError> {
        let key = self.current_key()?;
        let mut items = self.load(&key)?;

        if items.iter().any(|i| i.product_id == item.product_id) {
            debug!("Already in wishlist");
            return Ok(false);
        }

        items.push(item);
        self.save(&key, &items)?;
        Ok(true)
    }

    /// Remove a product. Returns `false` if it was not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove(&self, product_id: &ProductId) -> Result<bool, WishlistError> {
        let key = self.current_key()?;
        let mut items = self.load(&key)?;
        let before = items.len();

        items.retain(|i| &i.product_id != product_id);
        if items.len() == before {
            return Ok(false);
        }

        self.save(&key, &items)?;
        Ok(true)
    }

    /// Whether a product is saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn contains(&self, product_id: &ProductId) -> Result<bool, WishlistError> {
        Ok(self.items()?.iter().any(|i| &i.product_id == product_id))
    }

    /// Add the item if absent, remove it if present.
    ///
    /// Returns `true` if the item is saved afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn toggle(&self, item: WishlistItem) -> Result<bool, WishlistError> {
        if self.remove(&item.product_id)? {
            Ok(false)
        } else {
            self.add(item)
        }
    }

    /// Remove every item for the current shopper.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&self) -> Result<(), WishlistError> {
        self.store.remove(&self.current_key()?)?;
        Ok(())
    }
}

/// Snapshot a product's display fields as a wishlist entry.
#[must_use]
pub fn item_from_product(product: &Product) -> WishlistItem {
    let variant = product.default_variant();
    let mut item = WishlistItem::new(product.id.clone(), &product.handle, &product.title);
    item.variant_id = variant.map(|v| v.id.clone());
    item.price = Some(
        variant.map_or_else(|| product.price_range.min_variant_price.clone(), |v| v.price.clone()),
    );
    item.image_url = product.featured_image.as_ref().map(|i| i.url.clone());
    item
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};

    use shopfront_core::{CustomerId, Email};

    use super::*;
    use crate::session::CurrentUser;
    use crate::storage::MemoryStore;

    fn item(n: u32) -> WishlistItem {
        WishlistItem::new(
            ProductId::new(format!("gid://shopify/Product/{n}")),
            format!("product-{n}"),
            format!("Product {n}"),
        )
    }

    fn manager() -> (Arc<MemoryStore>, WishlistManager) {
        let store = Arc::new(MemoryStore::new());
        let manager = WishlistManager::new(store.clone(), "wishlist");
        (store, manager)
    }

    #[test]
    fn test_add_is_idempotent() {
        let (_, wishlist) = manager();
        assert!(wishlist.add(item(1)).unwrap());
        assert!(!wishlist.add(item(1)).unwrap());
        assert_eq!(wishlist.items().unwrap().len(), 1);
    }

    #[test]
    fn test_guest_key() {
        let (store, wishlist) = manager();
        wishlist.add(item(1)).unwrap();
        assert!(store.get("wishlist-guest").unwrap().is_some());
    }

    #[test]
    fn test_remove_and_contains() {
        let (_, wishlist) = manager();
        wishlist.add(item(1)).unwrap();
        wishlist.add(item(2)).unwrap();

        assert!(wishlist.contains(&item(2).product_id).unwrap());
        assert!(wishlist.remove(&item(2).product_id).unwrap());
        assert!(!wishlist.remove(&item(2).product_id).unwrap());
        assert!(!wishlist.contains(&item(2).product_id).unwrap());
        let remaining: Vec<ProductId> = wishlist
            .items()
            .unwrap()
            .into_iter()
            .map(|i| i.product_id)
            .collect();
        assert_eq!(remaining, vec![item(1).product_id]);
    }

    #[test]
    fn test_toggle() {
        let (_, wishlist) = manager();
        assert!(wishlist.toggle(item(1)).unwrap());
        assert!(!wishlist.toggle(item(1)).unwrap());
        assert!(wishlist.items().unwrap().is_empty());
    }

    #[test]
    fn test_clear_removes_key() {
        let (store, wishlist) = manager();
        wishlist.add(item(1)).unwrap();
        wishlist.clear().unwrap();
        assert!(store.get("wishlist-guest").unwrap().is_none());
        assert!(wishlist.items().unwrap().is_empty());
    }

    #[test]
    fn test_wishlist_follows_session() {
        let (store, wishlist) = manager();
        wishlist.add(item(1)).unwrap();

        let user = CurrentUser {
            customer_id: CustomerId::new("gid://shopify/Customer/5"),
            email: Email::parse("ada@example.com").unwrap(),
            first_name: None,
            last_name: None,
            access_token: "token".to_string(),
            expires_at: Utc::now() + Duration::days(1),
        };
        let session = SessionStore::new(store.clone());
        session.set_current_user(&user).unwrap();

        assert!(wishlist.items().unwrap().is_empty());
        wishlist.add(item(2)).unwrap();
        assert!(store.get("wishlist-gid://shopify/Customer/5").unwrap().is_some());

        session.clear().unwrap();
        let guest_items = wishlist.items().unwrap();
        assert_eq!(guest_items.len(), 1);
        assert_eq!(guest_items[0].product_id, item(1).product_id);
    }

    #[test]
    fn test_corrupt_wishlist_reads_empty() {
        let (store, wishlist) = manager();
        store.set("wishlist-guest", "not json").unwrap();
        assert!(wishlist.items().unwrap().is_empty());
        assert!(wishlist.add(item(1)).unwrap());
        assert_eq!(wishlist.items().unwrap().len(), 1);
    }
}
