//! Persisted customer session and shopper key derivation.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use shopfront_core::{CustomerId, Email, ShopperKey};

use crate::storage::{JsonStoreExt, KeyValueStore, StorageError};

/// Keys used for session data in the key-value store.
pub mod keys {
    /// Key for storing the current logged-in customer.
    pub const CURRENT_USER: &str = "current_user";
}

/// Session record for the signed-in customer.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub customer_id: CustomerId,
    pub email: Email,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Storefront API customer access token.
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentUser")
            .field("customer_id", &self.customer_id)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl CurrentUser {
    /// Whether the access token has expired as of `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the access token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// The shopper key owned by this customer.
    #[must_use]
    pub fn shopper_key(&self) -> ShopperKey {
        ShopperKey::Customer(self.customer_id.clone())
    }

    /// Full name, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.email.to_string()
        } else {
            name
        }
    }
}

/// Reads and writes the [`CurrentUser`] record.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Create a session store over a key-value store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The persisted customer, if any.
    ///
    /// A record that no longer decodes is treated as signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn current_user(&self) -> Result<Option<CurrentUser>, StorageError> {
        match self.store.get_json::<CurrentUser>(keys::CURRENT_USER) {
            Ok(user) => Ok(user),
            Err(StorageError::CorruptValue { source, .. }) => {
                warn!(error = %source, "Ignoring unreadable session record");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// The shopper key in effect: the signed-in customer, or guest.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn shopper_key(&self) -> Result<ShopperKey, StorageError> {
        Ok(self
            .current_user()?
            .map_or(ShopperKey::Guest, |user| user.shopper_key()))
    }

    /// Persist the signed-in customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set_current_user(&self, user: &CurrentUser) -> Result<(), StorageError> {
        self.store.set_json(keys::CURRENT_USER, user)
    }

    /// Forget the signed-in customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::CURRENT_USER)
    }
}
