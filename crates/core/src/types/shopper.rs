//! Shopper identity used to scope persisted cart and wishlist state.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::CustomerId;

/// The logical shopper that owns a cart and a wishlist.
///
/// Either an anonymous guest or an authenticated customer. The storage form
/// (see [`ShopperKey::as_storage_key`]) is `guest` for guests and the
/// customer's remote ID otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "customer_id", rename_all = "snake_case")]
pub enum ShopperKey {
    #[default]
    Guest,
    Customer(CustomerId),
}

impl ShopperKey {
    /// Storage form of the guest key.
    pub const GUEST: &'static str = "guest";

    /// Returns the string used to scope persisted keys.
    #[must_use]
    pub fn as_storage_key(&self) -> &str {
        match self {
            Self::Guest => Self::GUEST,
            Self::Customer(id) => id.as_str(),
        }
    }

    /// Whether this is the anonymous guest shopper.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }

    /// The authenticated customer ID, if any.
    #[must_use]
    pub const fn customer_id(&self) -> Option<&CustomerId> {
        match self {
            Self::Guest => None,
            Self::Customer(id) => Some(id),
        }
    }
}

impl fmt::Display for ShopperKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_storage_key())
    }
}

impl From<CustomerId> for ShopperKey {
    fn from(id: CustomerId) -> Self {
        Self::Customer(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_storage_key() {
        assert_eq!(ShopperKey::Guest.as_storage_key(), "guest");
        assert!(ShopperKey::default().is_guest());
    }

    #[test]
    fn test_customer_storage_key() {
        let key = ShopperKey::from(CustomerId::new("gid://shopify/Customer/42"));
        assert_eq!(key.as_storage_key(), "gid://shopify/Customer/42");
        assert_eq!(key.to_string(), "gid://shopify/Customer/42");
        assert!(!key.is_guest());
    }

    #[test]
    fn test_distinct_customers_have_distinct_keys() {
        let a = ShopperKey::from(CustomerId::new("gid://shopify/Customer/1"));
        let b = ShopperKey::from(CustomerId::new("gid://shopify/Customer/2"));
        assert_ne!(a.as_storage_key(), b.as_storage_key());
        assert_ne!(a.as_storage_key(), ShopperKey::Guest.as_storage_key());
    }
}
