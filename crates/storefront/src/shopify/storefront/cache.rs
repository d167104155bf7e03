//! Cache entries for catalog responses.

use crate::shopify::types::{Collection, CollectionConnection, Product, ProductConnection};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductConnection),
    Recommendations(Vec<Product>),
    Collection(Box<Collection>),
    Collections(CollectionConnection),
}

/// Cache key for a page of products. `None` when the page is a search.
pub fn products_key(first: i64, after: Option<&str>, query: Option<&str>) -> Option<String> {
    match query {
        Some(q) if !q.trim().is_empty() => None,
        _ => Some(format!("products:{first}:{}", after.unwrap_or(""))),
    }
}

pub fn product_key(handle: &str) -> String {
    format!("product:{handle}")
}

pub fn recommendations_key(product_id: &str) -> String {
    format!("recommendations:{product_id}")
}

pub fn collections_key(first: i64, after: Option<&str>) -> String {
    format!("collections:{first}:{}", after.unwrap_or(""))
}

pub fn collection_key(handle: &str, first: i64, after: Option<&str>) -> String {
    format!("collection:{handle}:{first}:{}", after.unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_queries_are_not_cached() {
        assert!(products_key(12, None, Some("shirt")).is_none());
        assert_eq!(products_key(12, None, Some("  ")).as_deref(), Some("products:12:"));
        assert_eq!(
            products_key(12, Some("abc"), None).as_deref(),
            Some("products:12:abc")
        );
    }

    #[test]
    fn test_collection_keys_include_page() {
        assert_ne!(
            collection_key("summer", 12, None),
            collection_key("summer", 12, Some("cursor"))
        );
    }
}
