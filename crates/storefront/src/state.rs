//! Application state shared across commands.

use std::sync::Arc;

use tracing::info;

use crate::config::{StorageConfig, StorefrontConfig};
use crate::error::AppError;
use crate::events::AuthEvents;
use crate::services::{AccountService, CartManager, OrderService, WishlistManager};
use crate::session::SessionStore;
use crate::shopify::{CartApi, CustomerApi, StorefrontClient};
use crate::storage::{FileStore, KeyValueStore};

/// Application state shared across all commands.
///
/// This struct is cheaply cloneable via `Arc`. It owns the persisted store and
/// the auth-changed signal; every service is built from it so they all see
/// the same shopper.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    storage: StorageConfig,
    store: Arc<dyn KeyValueStore>,
    carts: Arc<dyn CartApi>,
    customers: Arc<dyn CustomerApi>,
    storefront: Option<StorefrontClient>,
    events: AuthEvents,
}

impl AppState {
    /// Create application state backed by the Storefront API and a file store
    /// in the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the store endpoint is invalid or the data
    /// directory cannot be opened.
    pub fn new(config: &StorefrontConfig) -> Result<Self, AppError> {
        let storefront = StorefrontClient::new(&config.shopify)?;
        let store = FileStore::open(&config.storage.data_dir)?;
        info!(
            endpoint = %storefront.endpoint(),
            store = %store.path().display(),
            "Storefront state ready"
        );

        Ok(Self::from_parts(
            config.storage.clone(),
            Arc::new(store),
            Arc::new(storefront.clone()),
            Arc::new(storefront.clone()),
            Some(storefront),
        ))
    }

    /// Assemble state from explicit parts. Tests pass a fake backend and an
    /// in-memory store here.
    #[must_use]
    pub fn from_parts(
        storage: StorageConfig,
        store: Arc<dyn KeyValueStore>,
        carts: Arc<dyn CartApi>,
        customers: Arc<dyn CustomerApi>,
        storefront: Option<StorefrontClient>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                storage,
                store,
                carts,
                customers,
                storefront,
                events: AuthEvents::new(),
            }),
        }
    }

    /// Get a reference to the storage configuration.
    #[must_use]
    pub fn storage_config(&self) -> &StorageConfig {
        &self.inner.storage
    }

    /// Get the persisted key-value store.
    #[must_use]
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.inner.store)
    }

    /// Get the auth-changed signal.
    #[must_use]
    pub fn events(&self) -> &AuthEvents {
        &self.inner.events
    }

    /// Get the Storefront catalog client, if this state talks to Shopify.
    #[must_use]
    pub fn storefront(&self) -> Option<&StorefrontClient> {
        self.inner.storefront.as_ref()
    }

    /// Get the session record store.
    #[must_use]
    pub fn session(&self) -> SessionStore {
        SessionStore::new(self.store())
    }

    /// Create a cart manager subscribed to auth changes from now on.
    #[must_use]
    pub fn cart_manager(&self) -> CartManager {
        CartManager::new(
            Arc::clone(&self.inner.carts),
            self.store(),
            self.inner.events.subscribe(),
            self.inner.storage.cart_key_prefix.clone(),
        )
    }

    /// Create a wishlist manager.
    #[must_use]
    pub fn wishlist(&self) -> WishlistManager {
        WishlistManager::new(self.store(), self.inner.storage.wishlist_key_prefix.clone())
    }

    /// Create the account service.
    #[must_use]
    pub fn accounts(&self) -> AccountService {
        AccountService::new(
            Arc::clone(&self.inner.customers),
            self.store(),
            self.inner.events.clone(),
        )
    }

    /// Create the order service.
    #[must_use]
    pub fn orders(&self) -> OrderService {
        OrderService::new(
            Arc::clone(&self.inner.customers),
            self.store(),
            self.inner.events.clone(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::Email;

    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::FakeCommerce;

    fn state() -> (Arc<FakeCommerce>, AppState) {
        let fake = Arc::new(FakeCommerce::new());
        let state = AppState::from_parts(
            StorageConfig::default(),
            Arc::new(MemoryStore::new()),
            fake.clone(),
            fake.clone(),
            None,
        );
        (fake, state)
    }

    #[tokio::test]
    async fn test_services_share_one_shopper() {
        let (fake, state) = state();
        let variant = fake.add_variant("Tee", "Large", "20.00");
        let email = Email::parse("ada@example.com").unwrap();
        fake.add_customer(&email, "hunter22", None);

        let mut cart = state.cart_manager();
        cart.add_item(&variant, 1).await.unwrap();
        assert!(state.store().get("shopify_cart_guest").unwrap().is_some());

        let user = state.accounts().login("ada@example.com", "hunter22").await.unwrap();
        assert!(cart.sync_auth().await.unwrap());
        assert_eq!(cart.shopper(), Some(&user.shopper_key()));
        assert!(cart.items().is_empty());

        assert_eq!(state.session().shopper_key().unwrap(), user.shopper_key());
        assert!(state.orders().orders(5).await.unwrap().is_empty());
    }

    #[test]
    fn test_storefront_absent_for_fake_state() {
        let (_, state) = state();
        assert!(state.storefront().is_none());
        assert_eq!(state.storage_config().wishlist_key_prefix, "wishlist");
    }
}
