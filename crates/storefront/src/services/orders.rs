//! Session-protected reads of order history and saved addresses.
//!
//! Every call needs a signed-in customer. A token that has expired locally,
//! or that Shopify no longer accepts, ends the session: the record is
//! cleared and the auth change published so carts and wishlists follow.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use shopfront_core::ShopperKey;

use crate::error::clear_sentry_user;
use crate::events::AuthEvents;
use crate::session::{CurrentUser, SessionStore};
use crate::shopify::{CustomerApi, MailingAddress, Order, ShopifyError};
use crate::storage::{KeyValueStore, StorageError};

/// Orders fetched when looking one up by number or name.
const LOOKUP_WINDOW: i64 = 250;

/// Errors that can occur reading customer data.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Nobody is signed in.
    #[error("please log in to view your orders")]
    SessionRequired,

    /// The session token is no longer valid.
    #[error("your session has expired, please log in again")]
    SessionExpired,

    /// No order matches the reference.
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// Shopify request failed.
    #[error("shopify error: {0}")]
    Remote(#[from] ShopifyError),

    /// Reading or clearing the session failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Order history and addresses for the signed-in customer.
#[derive(Clone)]
pub struct OrderService {
    customers: Arc<dyn CustomerApi>,
    session: SessionStore,
    events: AuthEvents,
}

impl OrderService {
    #[must_use]
    pub fn new(
        customers: Arc<dyn CustomerApi>,
        store: Arc<dyn KeyValueStore>,
        events: AuthEvents,
    ) -> Self {
        Self {
            customers,
            session: SessionStore::new(store),
            events,
        }
    }

    /// The signed-in customer, or the reason there is none.
    fn require_session(&self) -> Result<CurrentUser, OrderError> {
        let user = self.session.current_user()?.ok_or(OrderError::SessionRequired)?;
        if user.is_expired() {
            return Err(self.expire(&user));
        }
        Ok(user)
    }

    /// End a stale session. Returns the error to surface.
    fn expire(&self, user: &CurrentUser) -> OrderError {
        info!(customer_id = %user.customer_id, "Customer session expired");
        if let Err(e) = self.session.clear() {
            return e.into();
        }
        clear_sentry_user();
        self.events.publish(ShopperKey::Guest);
        OrderError::SessionExpired
    }

    /// Most recent orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::SessionRequired` if nobody is signed in.
    /// Returns `OrderError::SessionExpired` if the token is no longer valid.
    #[instrument(skip(self))]
    pub async fn orders(&self, first: i64) -> Result<Vec<Order>, OrderError> {
        let user = self.require_session()?;
        match self.customers.orders(&user.access_token, first).await? {
            Some(orders) => Ok(orders),
            None => Err(self.expire(&user)),
        }
    }

    /// Find an order by number (`1001`, `#1001`) or name.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::OrderNotFound` if no recent order matches.
    /// Returns the session errors of [`Self::orders`].
    #[instrument(skip(self))]
    pub async fn order(&self, reference: &str) -> Result<Order, OrderError> {
        self.orders(LOOKUP_WINDOW)
            .await?
            .into_iter()
            .find(|order| order.matches_reference(reference))
            .ok_or_else(|| OrderError::OrderNotFound(reference.trim().to_string()))
    }

    /// Saved mailing addresses.
    ///
    /// # Errors
    ///
    /// Returns the session errors of [`Self::orders`].
    #[instrument(skip(self))]
    pub async fn addresses(&self, first: i64) -> Result<Vec<MailingAddress>, OrderError> {
        let user = self.require_session()?;
        match self.customers.addresses(&user.access_token, first).await? {
            Some(addresses) => Ok(addresses),
            None => Err(self.expire(&user)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use shopfront_core::{
        CustomerId, Email, FinancialStatus, FulfillmentStatus, OrderId, Price, ProgressStep,
    };

    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::FakeCommerce;

    struct Fixture {
        fake: Arc<FakeCommerce>,
        session: SessionStore,
        events: AuthEvents,
        orders: OrderService,
        customer_id: CustomerId,
    }

    fn fixture() -> Fixture {
        let fake = Arc::new(FakeCommerce::new());
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let events = AuthEvents::new();
        let email = Email::parse("ada@example.com").unwrap();
        let customer_id = fake.add_customer(&email, "hunter22", Some("Ada"));
        Fixture {
            orders: OrderService::new(fake.clone(), store.clone(), events.clone()),
            session: SessionStore::new(store),
            fake,
            events,
            customer_id,
        }
    }

    fn order(number: i64, days_ago: i64) -> Order {
        Order {
            id: OrderId::new(format!("gid://shopify/Order/{number}")),
            name: format!("#{number}"),
            order_number: number,
            processed_at: Utc.with_ymd_and_hms(2026, 6, 30, 12, 0, 0).unwrap()
                - Duration::days(days_ago),
            financial_status: Some(FinancialStatus::Paid),
            fulfillment_status: Some(FulfillmentStatus::Fulfilled),
            subtotal: None,
            total: Price::parse("25.00", "USD").unwrap(),
            shipping_address: None,
            line_items: vec![],
            tracking: vec![],
            status_url: None,
        }
    }

    async fn sign_in(f: &Fixture, expires_in: Duration) -> CurrentUser {
        let token = f
            .fake
            .create_access_token(&Email::parse("ada@example.com").unwrap(), "hunter22")
            .await
            .unwrap();
        let user = CurrentUser {
            customer_id: f.customer_id.clone(),
            email: Email::parse("ada@example.com").unwrap(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            access_token: token.access_token,
            expires_at: Utc::now() + expires_in,
        };
        f.session.set_current_user(&user).unwrap();
        user
    }

    #[tokio::test]
    async fn test_orders_require_session() {
        let f = fixture();
        assert!(matches!(
            f.orders.orders(10).await,
            Err(OrderError::SessionRequired)
        ));
        assert!(matches!(
            f.orders.addresses(10).await,
            Err(OrderError::SessionRequired)
        ));
        assert_eq!(f.fake.calls("orders"), 0);
    }

    #[tokio::test]
    async fn test_orders_newest_first_with_status() {
        let f = fixture();
        f.fake.add_order(&f.customer_id, order(1001, 10));
        f.fake.add_order(&f.customer_id, order(1002, 1));
        sign_in(&f, Duration::days(1)).await;

        let orders = f.orders.orders(10).await.unwrap();
        let names: Vec<&str> = orders.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["#1002", "#1001"]);
        assert_eq!(orders[0].display_status().step, ProgressStep::Delivered);
    }

    #[tokio::test]
    async fn test_order_lookup_by_reference() {
        let f = fixture();
        f.fake.add_order(&f.customer_id, order(1001, 10));
        f.fake.add_order(&f.customer_id, order(1002, 1));
        sign_in(&f, Duration::days(1)).await;

        assert_eq!(f.orders.order("1001").await.unwrap().order_number, 1001);
        assert_eq!(f.orders.order(" #1002 ").await.unwrap().order_number, 1002);
        assert!(matches!(
            f.orders.order("9999").await,
            Err(OrderError::OrderNotFound(r)) if r == "9999"
        ));
    }

    #[tokio::test]
    async fn test_locally_expired_session_is_cleared() {
        let f = fixture();
        sign_in(&f, Duration::hours(-1)).await;
        let mut subscription = f.events.subscribe();

        assert!(matches!(
            f.orders.orders(10).await,
            Err(OrderError::SessionExpired)
        ));
        assert!(f.session.current_user().unwrap().is_none());
        assert!(subscription.drain());
        assert_eq!(f.fake.calls("orders"), 0);
    }

    #[tokio::test]
    async fn test_rejected_token_is_cleared() {
        let f = fixture();
        sign_in(&f, Duration::days(1)).await;
        f.fake.revoke_tokens();

        assert!(matches!(
            f.orders.addresses(5).await,
            Err(OrderError::SessionExpired)
        ));
        assert!(f.session.current_user().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_session() {
        let f = fixture();
        sign_in(&f, Duration::days(1)).await;
        f.fake.fail_next("Internal error");

        assert!(matches!(
            f.orders.orders(10).await,
            Err(OrderError::Remote(_))
        ));
        assert!(f.session.current_user().unwrap().is_some());
    }
}
