//! Integration tests for customer sessions and order history.

#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};

use shopfront_core::{AddressId, FinancialStatus, FulfillmentStatus, OrderId, Price, ProgressStep};
use shopfront_integration_tests::{EMAIL, PASSWORD, TestContext};
use shopfront_storefront::error::AppError;
use shopfront_storefront::services::{AuthError, OrderError, Registration};
use shopfront_storefront::shopify::{MailingAddress, Order};

fn order(number: i64, day: u32, fulfillment: Option<FulfillmentStatus>) -> Order {
    Order {
        id: OrderId::new(format!("gid://shopify/Order/{number}")),
        name: format!("#{number}"),
        order_number: number,
        processed_at: Utc.with_ymd_and_hms(2026, 5, day, 9, 30, 0).unwrap(),
        financial_status: Some(FinancialStatus::Paid),
        fulfillment_status: fulfillment,
        subtotal: None,
        total: Price::parse("40.00", "USD").unwrap(),
        shipping_address: None,
        line_items: vec![],
        tracking: vec![],
        status_url: None,
    }
}

#[tokio::test]
async fn test_orders_without_session() {
    let ctx = TestContext::new();
    let err = ctx.state.orders().orders(10).await.unwrap_err();
    assert!(matches!(err, OrderError::SessionRequired));
    assert_eq!(
        AppError::from(err).user_message(),
        "Please log in to view your orders"
    );
}

#[tokio::test]
async fn test_order_history_with_progress() {
    let ctx = TestContext::new();
    ctx.fake
        .add_order(&ctx.customer_id, order(1001, 1, Some(FulfillmentStatus::Fulfilled)));
    ctx.fake
        .add_order(&ctx.customer_id, order(1002, 20, Some(FulfillmentStatus::InTransit)));
    ctx.state.accounts().login(EMAIL, PASSWORD).await.unwrap();

    let orders = ctx.state.orders().orders(10).await.unwrap();
    let steps: Vec<(i64, ProgressStep)> = orders
        .iter()
        .map(|o| (o.order_number, o.display_status().step))
        .collect();
    assert_eq!(
        steps,
        vec![(1002, ProgressStep::Shipped), (1001, ProgressStep::Delivered)]
    );

    let found = ctx.state.orders().order("#1001").await.unwrap();
    assert_eq!(found.display_status().label, "Delivered ✓");
}

#[tokio::test]
async fn test_revoked_token_expires_session_everywhere() {
    let ctx = TestContext::new();
    ctx.state.accounts().login(EMAIL, PASSWORD).await.unwrap();
    let mut cart = ctx.state.cart_manager();
    cart.resolve_active_cart().await.unwrap();

    ctx.fake.revoke_tokens();
    let err = ctx.state.orders().orders(10).await.unwrap_err();
    assert!(matches!(err, OrderError::SessionExpired));

    assert!(ctx.state.accounts().current_user().unwrap().is_none());
    assert!(cart.sync_auth().await.unwrap());
    assert_eq!(cart.shopper(), Some(&shopfront_core::ShopperKey::Guest));
}

#[tokio::test]
async fn test_addresses() {
    let ctx = TestContext::new();
    ctx.fake.add_address(
        &ctx.customer_id,
        MailingAddress {
            id: AddressId::new(""),
            name: Some("Ada Lovelace".to_string()),
            company: None,
            address1: Some("12 St James's Square".to_string()),
            address2: None,
            city: Some("London".to_string()),
            province_code: None,
            zip: Some("SW1Y 4JH".to_string()),
            country: Some("United Kingdom".to_string()),
            phone: None,
        },
    );
    ctx.state.accounts().login(EMAIL, PASSWORD).await.unwrap();

    let addresses = ctx.state.orders().addresses(5).await.unwrap();
    assert_eq!(addresses.len(), 1);
    assert!(addresses[0].formatted_single_line().contains("London"));
}

#[tokio::test]
async fn test_register_and_session_survives_restart() {
    let ctx = TestContext::new();
    let registration = Registration {
        email: "grace@example.com".to_string(),
        password: "cobol1959".to_string(),
        first_name: Some("Grace".to_string()),
        ..Registration::default()
    };
    let user = ctx.state.accounts().register(&registration).await.unwrap();

    let restarted = ctx.restart().unwrap();
    let current = restarted.accounts().current_user().unwrap().unwrap();
    assert_eq!(current, user);
    assert_eq!(current.display_name(), "Grace");

    let again = restarted.accounts().register(&registration).await;
    assert!(matches!(again, Err(AuthError::CustomerAlreadyExists)));
}
