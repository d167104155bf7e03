//! Newtype IDs for type-safe references to remote Shopify resources.
//!
//! Shopify identifies every resource with an opaque global ID string such as
//! `gid://shopify/ProductVariant/4471`. Use the `define_gid!` macro to create
//! wrappers that prevent accidentally passing a product ID where a variant ID
//! is expected.

/// Macro to define a type-safe Shopify global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Accessors: `new()`, `as_str()`, `into_inner()`, `tail()`
/// - `From<String>`, `From<&str>`, `Display` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use shopfront_core::define_gid;
/// define_gid!(ShippingZoneId);
///
/// let zone = ShippingZoneId::new("gid://shopify/ShippingZone/7");
/// assert_eq!(zone.tail(), "7");
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a remote ID string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the ID string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// The last path segment of the ID (`"4471"` for
            /// `gid://shopify/ProductVariant/4471`), without any query string.
            #[must_use]
            pub fn tail(&self) -> &str {
                let path = self.0.split('?').next().unwrap_or(&self.0);
                path.rsplit('/').next().unwrap_or(path)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_gid!(ProductId);
define_gid!(VariantId);
define_gid!(CollectionId);
define_gid!(CartId);
define_gid!(CartLineId);
define_gid!(CustomerId);
define_gid!(OrderId);
define_gid!(AddressId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_of_gid() {
        let id = VariantId::new("gid://shopify/ProductVariant/4471");
        assert_eq!(id.tail(), "4471");
    }

    #[test]
    fn test_tail_strips_cart_key() {
        let id = CartId::new("gid://shopify/Cart/c1-abc123?key=deadbeef");
        assert_eq!(id.tail(), "c1-abc123");
    }

    #[test]
    fn test_tail_of_plain_string() {
        assert_eq!(ProductId::new("plain").tail(), "plain");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = CustomerId::new("gid://shopify/Customer/9");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"gid://shopify/Customer/9\"");

        let back: CustomerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
