//! Integration tests for the wishlist and the file-backed store.

#![allow(clippy::unwrap_used)]

use shopfront_core::{ProductId, WishlistItem};
use shopfront_integration_tests::{EMAIL, PASSWORD, TestContext};
use shopfront_storefront::storage::{FileStore, KeyValueStore};

fn item(n: u32) -> WishlistItem {
    WishlistItem::new(
        ProductId::new(format!("gid://shopify/Product/{n}")),
        format!("product-{n}"),
        format!("Product {n}"),
    )
}

#[tokio::test]
async fn test_wishlist_is_per_shopper() {
    let ctx = TestContext::new();
    let wishlist = ctx.state.wishlist();
    assert!(wishlist.add(item(1)).unwrap());
    assert!(!wishlist.add(item(1)).unwrap());

    ctx.state.accounts().login(EMAIL, PASSWORD).await.unwrap();
    assert!(wishlist.items().unwrap().is_empty());
    wishlist.add(item(2)).unwrap();

    ctx.state.accounts().logout().await.unwrap();
    let guest: Vec<ProductId> = wishlist.items().unwrap().into_iter().map(|i| i.product_id).collect();
    assert_eq!(guest, vec![item(1).product_id]);
}

#[tokio::test]
async fn test_state_round_trips_across_restart() {
    let ctx = TestContext::new();
    let tee = ctx.fake.add_variant("Classic Tee", "Large", "25.00");
    let mut cart = ctx.state.cart_manager();
    cart.add_item(&tee, 2).await.unwrap();
    let cart_id = cart.cart().unwrap().id.clone();
    ctx.state.wishlist().add(item(7)).unwrap();

    let restarted = ctx.restart().unwrap();
    let mut cart = restarted.cart_manager();
    assert_eq!(cart.resolve_active_cart().await.unwrap().id, cart_id);
    assert_eq!(cart.total_quantity(), 2);
    assert!(restarted.wishlist().contains(&item(7).product_id).unwrap());
}

#[test]
fn test_file_store_reopen() {
    let ctx = TestContext::new();
    let dir = ctx.dir.path().join("raw");
    {
        let store = FileStore::open(&dir).unwrap();
        store.set("greeting", "hello").unwrap();
        store.set("doomed", "bye").unwrap();
        store.remove("doomed").unwrap();
    }

    let store = FileStore::open(&dir).unwrap();
    assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello"));
    assert_eq!(store.get("doomed").unwrap(), None);

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["greeting"], "hello");
}
