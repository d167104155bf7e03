//! Remote operations the services depend on.
//!
//! [`StorefrontClient`](super::StorefrontClient) implements both traits over
//! HTTP; `testing::FakeCommerce` implements them in memory.

use async_trait::async_trait;

use shopfront_core::{CartId, CartLineId, Email};

use super::ShopifyError;
use super::types::{
    Cart, CartLineInput, CartLineUpdateInput, Customer, CustomerAccessToken, CustomerCreateInput,
    MailingAddress, Order,
};

/// Cart operations.
///
/// Mutations do not return the cart: callers refetch with
/// [`fetch_cart`](CartApi::fetch_cart) so the local copy always matches
/// what the remote holds.
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Create an empty cart, bound to a customer when a token is given.
    async fn create_cart(&self, buyer_access_token: Option<&str>) -> Result<Cart, ShopifyError>;

    /// Fetch a cart. `Ok(None)` means the remote no longer knows the ID.
    async fn fetch_cart(&self, cart_id: &CartId) -> Result<Option<Cart>, ShopifyError>;

    async fn add_lines(&self, cart_id: &CartId, lines: &[CartLineInput])
    -> Result<(), ShopifyError>;

    async fn update_lines(
        &self,
        cart_id: &CartId,
        lines: &[CartLineUpdateInput],
    ) -> Result<(), ShopifyError>;

    async fn remove_lines(&self, cart_id: &CartId, line_ids: &[CartLineId])
    -> Result<(), ShopifyError>;

    /// Replace the cart's discount codes. An empty slice removes them all.
    async fn update_discount_codes(
        &self,
        cart_id: &CartId,
        codes: &[String],
    ) -> Result<(), ShopifyError>;

    async fn update_note(&self, cart_id: &CartId, note: &str) -> Result<(), ShopifyError>;
}

/// Customer account operations, authorized by a customer access token.
#[async_trait]
pub trait CustomerApi: Send + Sync {
    /// Exchange credentials for an access token.
    ///
    /// Rejected credentials are reported as [`ShopifyError::Unauthorized`].
    async fn create_access_token(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<CustomerAccessToken, ShopifyError>;

    /// Revoke an access token.
    async fn delete_access_token(&self, access_token: &str) -> Result<(), ShopifyError>;

    /// Register a customer.
    ///
    /// An email that is already registered is reported as [`ShopifyError::Conflict`].
    async fn create_customer(&self, input: &CustomerCreateInput) -> Result<Customer, ShopifyError>;

    /// The customer owning the token. `Ok(None)` means the token was rejected.
    async fn customer(&self, access_token: &str) -> Result<Option<Customer>, ShopifyError>;

    /// Most recent orders first. `Ok(None)` means the token was rejected.
    async fn orders(
        &self,
        access_token: &str,
        first: i64,
    ) -> Result<Option<Vec<Order>>, ShopifyError>;

    /// Saved addresses. `Ok(None)` means the token was rejected.
    async fn addresses(
        &self,
        access_token: &str,
        first: i64,
    ) -> Result<Option<Vec<MailingAddress>>, ShopifyError>;
}
