//! Integration tests for the shopper-scoped cart.

#![allow(clippy::unwrap_used)]

use shopfront_core::ShopperKey;
use shopfront_integration_tests::{EMAIL, PASSWORD, TestContext};
use shopfront_storefront::services::CartError;
use shopfront_storefront::storage::KeyValueStore;

// =============================================================================
// Refetch consistency
// =============================================================================

#[tokio::test]
async fn test_local_lines_match_remote_after_each_mutation() {
    let ctx = TestContext::new();
    let tee = ctx.fake.add_variant("Classic Tee", "Large", "25.00");
    let mug = ctx.fake.add_variant("Camp Mug", "Default Title", "12.50");
    let mut cart = ctx.state.cart_manager();

    cart.add_item(&tee, 2).await.unwrap();
    cart.add_item(&mug, 1).await.unwrap();
    cart.add_item(&tee, 1).await.unwrap();

    let local = cart.cart().unwrap().clone();
    let remote = ctx.fake.cart(&local.id).unwrap();
    assert_eq!(local.lines, remote.lines);
    assert_eq!(local.total_quantity, 4);
    assert_eq!(cart.subtotal().unwrap().display(), "$87.50");

    let mug_line = cart.items().iter().find(|l| l.merchandise.id == mug).unwrap().id.clone();
    cart.set_quantity(&mug_line, 0).await.unwrap();
    let remote = ctx.fake.cart(&local.id).unwrap();
    assert_eq!(cart.items(), remote.lines.as_slice());
    assert_eq!(cart.items().len(), 1);
}

#[tokio::test]
async fn test_failed_mutation_keeps_last_known_cart() {
    let ctx = TestContext::new();
    let tee = ctx.fake.add_variant("Classic Tee", "Large", "25.00");
    let mut cart = ctx.state.cart_manager();
    cart.add_item(&tee, 1).await.unwrap();
    let before = cart.items().to_vec();

    ctx.fake.fail_next("Throttled");
    let result = cart.add_item(&tee, 1).await;

    assert!(matches!(result, Err(CartError::Remote(_))));
    assert_eq!(cart.items(), before.as_slice());
}

// =============================================================================
// Shopper switching
// =============================================================================

#[tokio::test]
async fn test_login_and_logout_switch_between_carts() {
    let ctx = TestContext::new();
    let tee = ctx.fake.add_variant("Classic Tee", "Large", "25.00");
    let mut cart = ctx.state.cart_manager();

    cart.add_item(&tee, 1).await.unwrap();
    let guest_cart = cart.cart().unwrap().id.clone();

    let user = ctx.state.accounts().login(EMAIL, PASSWORD).await.unwrap();
    assert!(cart.sync_auth().await.unwrap());
    let customer_cart = cart.cart().unwrap().id.clone();
    assert_ne!(guest_cart, customer_cart);
    assert_eq!(ctx.fake.cart_owner(&customer_cart), Some(ctx.customer_id.clone()));
    cart.add_item(&tee, 3).await.unwrap();

    ctx.state.accounts().logout().await.unwrap();
    assert!(cart.sync_auth().await.unwrap());
    assert_eq!(cart.cart().unwrap().id, guest_cart);
    assert_eq!(cart.total_quantity(), 1);
    assert_eq!(cart.shopper(), Some(&ShopperKey::Guest));

    ctx.state.accounts().login(EMAIL, PASSWORD).await.unwrap();
    assert!(cart.sync_auth().await.unwrap());
    assert_eq!(cart.cart().unwrap().id, customer_cart);
    assert_eq!(cart.total_quantity(), 3);
    assert_eq!(cart.shopper(), Some(&user.shopper_key()));
}

#[tokio::test]
async fn test_wait_for_auth_change_follows_login() {
    let ctx = TestContext::new();
    let mut cart = ctx.state.cart_manager();
    cart.resolve_active_cart().await.unwrap();

    let accounts = ctx.state.accounts();
    let login = tokio::spawn(async move { accounts.login(EMAIL, PASSWORD).await });

    assert!(cart.wait_for_auth_change().await.unwrap());
    let user = login.await.unwrap().unwrap();
    cart.sync_auth().await.unwrap();
    assert_eq!(cart.shopper(), Some(&user.shopper_key()));
}

// =============================================================================
// Stale carts
// =============================================================================

#[tokio::test]
async fn test_expired_cart_is_replaced_under_same_key() {
    let ctx = TestContext::new();
    let tee = ctx.fake.add_variant("Classic Tee", "Large", "25.00");
    let mut cart = ctx.state.cart_manager();
    cart.add_item(&tee, 1).await.unwrap();
    let old = cart.cart().unwrap().id.clone();
    ctx.fake.forget_cart(&old);

    let state = ctx.restart().unwrap();
    let mut cart = state.cart_manager();
    let fresh = cart.resolve_active_cart().await.unwrap().id.clone();

    assert_ne!(fresh, old);
    assert!(cart.items().is_empty());
    let stored = state.store().get("shopify_cart_guest").unwrap();
    assert_eq!(stored.as_deref(), Some(fresh.as_str()));
}
