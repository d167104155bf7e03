//! Shopper-scoped cart management.
//!
//! [`CartManager`] keeps exactly one remote cart per shopper key and a local
//! copy of its lines. Every mutation is sent to Shopify and followed by a
//! refetch; the local copy is only ever replaced by what the remote returns.
//!
//! # Storage
//!
//! The remote cart ID is persisted under `<prefix>_<shopperKey>`, e.g.
//! `shopify_cart_guest` or `shopify_cart_gid://shopify/Customer/42`. Logging
//! in or out switches keys, so each identity keeps its own cart. Carts are
//! never merged.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use shopfront_core::{CartId, CartLineId, Price, ShopperKey, VariantId};

use crate::error::add_breadcrumb;
use crate::events::AuthSubscription;
use crate::session::SessionStore;
use crate::shopify::{
    Cart, CartApi, CartLine, CartLineInput, CartLineUpdateInput, Product, ShopifyError,
};
use crate::storage::{KeyValueStore, StorageError};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// No variant was given, or the product has none to add.
    #[error("no product variant selected")]
    MissingVariant,

    /// Items can only be added in positive quantities.
    #[error("invalid quantity {0}: must be at least 1")]
    InvalidQuantity(i64),

    /// The line is not in the active cart.
    #[error("cart line not found: {0}")]
    LineNotFound(CartLineId),

    /// The remote stopped recognizing the cart mid-operation.
    #[error("cart no longer exists: {0}")]
    CartVanished(CartId),

    /// Shopify request failed.
    #[error("shopify error: {0}")]
    Remote(#[from] ShopifyError),

    /// Reading or writing the persisted cart ID failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug)]
struct ActiveCart {
    shopper: ShopperKey,
    cart: Cart,
}

/// Maintains the active shopper's remote cart.
pub struct CartManager {
    api: Arc<dyn CartApi>,
    store: Arc<dyn KeyValueStore>,
    session: SessionStore,
    auth: AuthSubscription,
    key_prefix: String,
    active: Option<ActiveCart>,
}

impl CartManager {
    /// Create a cart manager. Nothing is fetched until first use.
    #[must_use]
    pub fn new(
        api: Arc<dyn CartApi>,
        store: Arc<dyn KeyValueStore>,
        auth: AuthSubscription,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            api,
            session: SessionStore::new(Arc::clone(&store)),
            store,
            auth,
            key_prefix: key_prefix.into(),
            active: None,
        }
    }

    /// Storage key holding the cart ID for a shopper.
    #[must_use]
    pub fn storage_key(&self, shopper: &ShopperKey) -> String {
        format!("{}_{}", self.key_prefix, shopper.as_storage_key())
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Load (or create) the cart for the current shopper and adopt it.
    ///
    /// A persisted ID the remote no longer recognizes is replaced by a new
    /// cart stored under the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the session or store cannot be read, or a remote call fails.
    #[instrument(skip(self))]
    pub async fn resolve_active_cart(&mut self) -> Result<&Cart, CartError> {
        // Resolving now covers any pending notification
        self.auth.drain();

        let shopper = self.session.shopper_key()?;
        let key = self.storage_key(&shopper);

        let persisted = self
            .store
            .get(&key)?
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(CartId::new);

        let cart = match persisted {
            Some(cart_id) => match self.api.fetch_cart(&cart_id).await? {
                Some(cart) => {
                    debug!(cart_id = %cart.id, shopper = %shopper, "Adopted persisted cart");
                    cart
                }
                None => {
                    warn!(cart_id = %cart_id, shopper = %shopper, "Persisted cart no longer exists, creating a new one");
                    self.create_and_persist(&key).await?
                }
            },
            None => self.create_and_persist(&key).await?,
        };

        Ok(&self.active.insert(ActiveCart { shopper, cart }).cart)
    }

    /// Create a cart for the signed-in customer (or a guest) and persist its ID.
    async fn create_and_persist(&self, key: &str) -> Result<Cart, CartError> {
        let token = self
            .session
            .current_user()?
            .filter(|user| !user.is_expired())
            .map(|user| user.access_token);

        let cart = self.api.create_cart(token.as_deref()).await?;
        self.store.set(key, cart.id.as_str())?;
        info!(cart_id = %cart.id, key, "Created cart");
        Ok(cart)
    }

    /// The active cart, re-resolving if the shopper changed since it was loaded.
    async fn ensure_active(&mut self) -> Result<&Cart, CartError> {
        let changed = self.auth.drain();
        let shopper = self.session.shopper_key()?;

        match self.active.take() {
            Some(active) if !changed && active.shopper == shopper => {
                Ok(&self.active.insert(active).cart)
            }
            previous => {
                // Keep the old state until resolution succeeds
                self.active = previous;
                self.resolve_active_cart().await
            }
        }
    }

    /// Replace the local cart with the remote's copy.
    async fn refresh(&mut self, cart_id: &CartId) -> Result<&Cart, CartError> {
        let Some(cart) = self.api.fetch_cart(cart_id).await? else {
            // Drop the mapping so the next operation starts a fresh cart
            self.active = None;
            return Err(CartError::CartVanished(cart_id.clone()));
        };

        let shopper = match self.active.take() {
            Some(active) => active.shopper,
            None => self.session.shopper_key()?,
        };
        Ok(&self.active.insert(ActiveCart { shopper, cart }).cart)
    }

    /// Consume pending auth changes and re-resolve if there were any.
    ///
    /// Returns `true` if the cart was re-resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if re-resolution fails.
    pub async fn sync_auth(&mut self) -> Result<bool, CartError> {
        if self.auth.drain() {
            self.resolve_active_cart().await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Wait for the next login or logout, then re-resolve.
    ///
    /// Returns `false` once the signal has shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if re-resolution fails.
    pub async fn wait_for_auth_change(&mut self) -> Result<bool, CartError> {
        if self.auth.changed().await.is_none() {
            return Ok(false);
        }
        self.resolve_active_cart().await?;
        Ok(true)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a variant to the cart.
    ///
    /// If the variant is already in the cart its line quantity is increased.
    ///
    /// # Errors
    ///
    /// Returns `CartError::MissingVariant` for an empty variant ID and
    /// `CartError::InvalidQuantity` for a quantity below 1.
    #[instrument(skip(self), fields(variant_id = %variant_id))]
    pub async fn add_item(&mut self, variant_id: &VariantId, quantity: i64) -> Result<&Cart, CartError> {
        if variant_id.as_str().trim().is_empty() {
            return Err(CartError::MissingVariant);
        }
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let cart = self.ensure_active().await?;
        let cart_id = cart.id.clone();

        if let Some(line) = cart.line_for_variant(variant_id) {
            let (line_id, existing) = (line.id.clone(), line.quantity);
            debug!(line_id = %line_id, existing, "Variant already in cart, increasing quantity");
            return self.set_quantity(&line_id, existing.saturating_add(quantity)).await;
        }

        self.api
            .add_lines(
                &cart_id,
                &[CartLineInput {
                    merchandise_id: variant_id.clone(),
                    quantity,
                }],
            )
            .await?;

        add_breadcrumb(
            "cart",
            "Added item",
            Some(&[("variant_id", variant_id.as_str()), ("cart_id", cart_id.as_str())]),
        );

        self.refresh(&cart_id).await
    }

    /// Add a product's default variant.
    ///
    /// # Errors
    ///
    /// Returns `CartError::MissingVariant` if the product has no variants.
    pub async fn add_product(&mut self, product: &Product, quantity: i64) -> Result<&Cart, CartError> {
        let variant_id = product
            .default_variant()
            .map(|v| v.id.clone())
            .ok_or(CartError::MissingVariant)?;
        self.add_item(&variant_id, quantity).await
    }

    /// Set a line's quantity. A quantity of zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if the line is not in the active cart.
    #[instrument(skip(self), fields(line_id = %line_id))]
    pub async fn set_quantity(&mut self, line_id: &CartLineId, quantity: i64) -> Result<&Cart, CartError> {
        if quantity <= 0 {
            return self.remove_item(line_id).await;
        }

        let cart = self.ensure_active().await?;
        if cart.line(line_id).is_none() {
            return Err(CartError::LineNotFound(line_id.clone()));
        }
        let cart_id = cart.id.clone();

        self.api
            .update_lines(
                &cart_id,
                &[CartLineUpdateInput {
                    id: line_id.clone(),
                    quantity,
                }],
            )
            .await?;

        add_breadcrumb(
            "cart",
            "Updated quantity",
            Some(&[("line_id", line_id.as_str()), ("quantity", &quantity.to_string())]),
        );

        self.refresh(&cart_id).await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if the line is not in the active cart.
    #[instrument(skip(self), fields(line_id = %line_id))]
    pub async fn remove_item(&mut self, line_id: &CartLineId) -> Result<&Cart, CartError> {
        let cart = self.ensure_active().await?;
        if cart.line(line_id).is_none() {
            return Err(CartError::LineNotFound(line_id.clone()));
        }
        let cart_id = cart.id.clone();

        self.api
            .remove_lines(&cart_id, std::slice::from_ref(line_id))
            .await?;

        add_breadcrumb("cart", "Removed item", Some(&[("line_id", line_id.as_str())]));

        self.refresh(&cart_id).await
    }

    /// Start over with a new empty cart for the current shopper.
    ///
    /// The previous remote cart is abandoned, not deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be created or its ID persisted.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) -> Result<&Cart, CartError> {
        self.auth.drain();
        let shopper = self.session.shopper_key()?;
        let key = self.storage_key(&shopper);

        let cart = self.create_and_persist(&key).await?;
        add_breadcrumb("cart", "Cleared cart", Some(&[("cart_id", cart.id.as_str())]));

        Ok(&self.active.insert(ActiveCart { shopper, cart }).cart)
    }

    /// Replace the cart's discount codes. Blank codes are ignored; an empty
    /// list removes all codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote rejects the update.
    #[instrument(skip(self))]
    pub async fn apply_discount_codes(&mut self, codes: &[String]) -> Result<&Cart, CartError> {
        let mut normalized: Vec<String> = Vec::with_capacity(codes.len());
        for code in codes.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
            if !normalized.iter().any(|c| c.eq_ignore_ascii_case(code)) {
                normalized.push(code.to_string());
            }
        }

        let cart_id = self.ensure_active().await?.id.clone();
        self.api
            .update_discount_codes(&cart_id, &normalized)
            .await?;

        add_breadcrumb("cart", "Updated discount codes", None);

        self.refresh(&cart_id).await
    }

    /// Set the cart note. An empty note clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote rejects the update.
    #[instrument(skip(self, note))]
    pub async fn set_note(&mut self, note: &str) -> Result<&Cart, CartError> {
        let cart_id = self.ensure_active().await?.id.clone();
        self.api.update_note(&cart_id, note.trim()).await?;
        self.refresh(&cart_id).await
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The active cart, if one has been resolved.
    #[must_use]
    pub fn cart(&self) -> Option<&Cart> {
        self.active.as_ref().map(|a| &a.cart)
    }

    /// The shopper the active cart belongs to.
    #[must_use]
    pub fn shopper(&self) -> Option<&ShopperKey> {
        self.active.as_ref().map(|a| &a.shopper)
    }

    /// Lines of the active cart (empty if none is resolved).
    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        self.cart().map(|c| c.lines.as_slice()).unwrap_or_default()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.items().iter().map(|l| l.quantity).sum()
    }

    /// Subtotal reported by Shopify for the active cart.
    #[must_use]
    pub fn subtotal(&self) -> Option<&Price> {
        self.cart().map(|c| &c.cost.subtotal)
    }

    /// Hosted checkout URL of the active cart.
    #[must_use]
    pub fn checkout_url(&self) -> Option<&str> {
        self.cart().map(|c| c.checkout_url.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    use shopfront_core::{CustomerId, Email};

    use super::*;
    use crate::events::AuthEvents;
    use crate::session::CurrentUser;
    use crate::storage::MemoryStore;
    use crate::shopify::CustomerApi;
    use crate::testing::FakeCommerce;

    struct Fixture {
        fake: Arc<FakeCommerce>,
        store: Arc<MemoryStore>,
        events: AuthEvents,
        manager: CartManager,
    }

    fn fixture() -> Fixture {
        let fake = Arc::new(FakeCommerce::new());
        let store = Arc::new(MemoryStore::new());
        let events = AuthEvents::new();
        let manager = CartManager::new(
            fake.clone(),
            store.clone(),
            events.subscribe(),
            "shopify_cart",
        );
        Fixture {
            fake,
            store,
            events,
            manager,
        }
    }

    fn log_in(fixture: &Fixture, customer_id: &CustomerId, token: &str) {
        let user = CurrentUser {
            customer_id: customer_id.clone(),
            email: Email::parse("ada@example.com").unwrap(),
            first_name: None,
            last_name: None,
            access_token: token.to_string(),
            expires_at: Utc::now() + Duration::days(1),
        };
        SessionStore::new(fixture.store.clone())
            .set_current_user(&user)
            .unwrap();
        fixture.events.publish(user.shopper_key());
    }

    #[tokio::test]
    async fn test_resolve_creates_and_persists_cart() {
        let mut f = fixture();
        let cart_id = f.manager.resolve_active_cart().await.unwrap().id.clone();

        assert_eq!(
            f.store.get("shopify_cart_guest").unwrap().as_deref(),
            Some(cart_id.as_str())
        );
        assert_eq!(f.fake.cart_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_adopts_persisted_cart() {
        let mut f = fixture();
        let first = f.manager.resolve_active_cart().await.unwrap().id.clone();

        let mut other = CartManager::new(
            f.fake.clone(),
            f.store.clone(),
            f.events.subscribe(),
            "shopify_cart",
        );
        let second = other.resolve_active_cart().await.unwrap().id.clone();

        assert_eq!(first, second);
        assert_eq!(f.fake.cart_count(), 1);
    }

    #[tokio::test]
    async fn test_stale_cart_id_replaced_under_same_key() {
        let mut f = fixture();
        let old = f.manager.resolve_active_cart().await.unwrap().id.clone();
        f.fake.forget_cart(&old);

        let new = f.manager.resolve_active_cart().await.unwrap().id.clone();
        assert_ne!(old, new);
        assert_eq!(
            f.store.get("shopify_cart_guest").unwrap().as_deref(),
            Some(new.as_str())
        );
    }

    #[tokio::test]
    async fn test_add_item_then_same_variant_increments() {
        let mut f = fixture();
        let variant = f.fake.add_variant("Tee", "Large", "20.00");

        f.manager.add_item(&variant, 1).await.unwrap();
        let cart = f.manager.add_item(&variant, 2).await.unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 3);
        assert_eq!(f.manager.total_quantity(), 3);
        assert_eq!(f.manager.subtotal().unwrap().display(), "$60.00");
    }

    #[tokio::test]
    async fn test_add_item_rejects_missing_variant_and_bad_quantity() {
        let mut f = fixture();
        let variant = f.fake.add_variant("Tee", "Large", "20.00");

        assert!(matches!(
            f.manager.add_item(&VariantId::new(""), 1).await,
            Err(CartError::MissingVariant)
        ));
        assert!(matches!(
            f.manager.add_item(&variant, 0).await,
            Err(CartError::InvalidQuantity(0))
        ));
        // Validation happens before any remote call
        assert_eq!(f.fake.calls("create_cart"), 0);
    }

    #[tokio::test]
    async fn test_set_quantity_updates_line() {
        let mut f = fixture();
        let variant = f.fake.add_variant("Mug", "Default Title", "8.50");
        let line_id = f.manager.add_item(&variant, 1).await.unwrap().lines[0].id.clone();

        let cart = f.manager.set_quantity(&line_id, 4).await.unwrap();
        assert_eq!(cart.lines[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_set_quantity_unknown_line() {
        let mut f = fixture();
        let result = f
            .manager
            .set_quantity(&CartLineId::new("gid://shopify/CartLine/nope"), 2)
            .await;
        assert!(matches!(result, Err(CartError::LineNotFound(_))));
    }

    #[tokio::test]
    async fn test_local_lines_match_remote_after_mutations() {
        let mut f = fixture();
        let a = f.fake.add_variant("Tee", "Small", "20.00");
        let b = f.fake.add_variant("Mug", "Default Title", "8.50");

        f.manager.add_item(&a, 1).await.unwrap();
        f.manager.add_item(&b, 2).await.unwrap();
        let line = f.manager.items()[0].id.clone();
        f.manager.remove_item(&line).await.unwrap();

        let local = f.manager.cart().unwrap().clone();
        let remote = f.fake.cart(&local.id).unwrap();
        assert_eq!(local.lines, remote.lines);
        assert_eq!(local.lines.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_lines_untouched() {
        let mut f = fixture();
        let variant = f.fake.add_variant("Tee", "Large", "20.00");
        f.manager.add_item(&variant, 1).await.unwrap();
        let before = f.manager.items().to_vec();

        f.fake.fail_next("Internal error");
        let result = f.manager.add_item(&variant, 1).await;

        assert!(matches!(result, Err(CartError::Remote(_))));
        assert_eq!(f.manager.items(), before.as_slice());
    }

    #[tokio::test]
    async fn test_clear_starts_new_cart() {
        let mut f = fixture();
        let variant = f.fake.add_variant("Tee", "Large", "20.00");
        let old = f.manager.add_item(&variant, 1).await.unwrap().id.clone();

        let new = f.manager.clear().await.unwrap().id.clone();

        assert_ne!(old, new);
        assert!(f.manager.items().is_empty());
        // The old cart is abandoned, not deleted
        assert!(f.fake.cart(&old).is_some());
        assert_eq!(
            f.store.get("shopify_cart_guest").unwrap().as_deref(),
            Some(new.as_str())
        );
    }

    #[tokio::test]
    async fn test_login_switches_cart_and_logout_restores_guest_cart() {
        let mut f = fixture();
        let variant = f.fake.add_variant("Tee", "Large", "20.00");
        let guest_cart = f.manager.add_item(&variant, 1).await.unwrap().id.clone();

        let email = Email::parse("ada@example.com").unwrap();
        let customer = f.fake.add_customer(&email, "hunter22", None);
        let token = f.fake.create_access_token(&email, "hunter22").await.unwrap();
        log_in(&f, &customer, &token.access_token);

        let customer_cart = f.manager.resolve_active_cart().await.unwrap().clone();
        assert_ne!(customer_cart.id, guest_cart);
        assert!(customer_cart.lines.is_empty());
        assert_eq!(f.fake.cart_owner(&customer_cart.id), Some(customer.clone()));

        SessionStore::new(f.store.clone()).clear().unwrap();
        f.events.publish(ShopperKey::Guest);

        assert!(f.manager.sync_auth().await.unwrap());
        assert_eq!(f.manager.cart().unwrap().id, guest_cart);
        assert_eq!(f.manager.total_quantity(), 1);
    }

    #[tokio::test]
    async fn test_discount_codes_normalized() {
        let mut f = fixture();
        let codes = vec![" SAVE10 ".to_string(), String::new(), "save10".to_string()];
        let cart = f.manager.apply_discount_codes(&codes).await.unwrap();
        assert_eq!(cart.discount_codes.len(), 1);
        assert_eq!(cart.discount_codes[0].code, "SAVE10");
    }

    #[tokio::test]
    async fn test_set_note() {
        let mut f = fixture();
        let cart = f.manager.set_note("  Gift wrap please ").await.unwrap();
        assert_eq!(cart.note.as_deref(), Some("Gift wrap please"));
    }

    #[tokio::test]
    async fn test_accessors_before_resolution() {
        let f = fixture();
        assert!(f.manager.cart().is_none());
        assert!(f.manager.items().is_empty());
        assert_eq!(f.manager.total_quantity(), 0);
        assert!(f.manager.checkout_url().is_none());
    }

    proptest! {
        #[test]
        fn prop_non_positive_quantity_removes_line(quantity in i64::MIN..=0) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            runtime.block_on(async {
                let mut f = fixture();
                let variant = f.fake.add_variant("Tee", "Large", "20.00");
                let line_id = f.manager.add_item(&variant, 2).await.unwrap().lines[0].id.clone();

                let cart = f.manager.set_quantity(&line_id, quantity).await.unwrap();
                prop_assert!(cart.lines.is_empty());
                prop_assert_eq!(f.fake.calls("remove_lines"), 1);
                prop_assert_eq!(f.fake.calls("update_lines"), 0);
                Ok(())
            })?;
        }
    }
}
