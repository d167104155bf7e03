//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` operation contracts with `reqwest` 0.13 for HTTP.
//! Caches catalog reads using `moka`; carts and customer data are always
//! fetched fresh.

mod cache;
mod cart;
mod conversions;
mod customer;
pub mod queries;

use std::sync::Arc;

use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use shopfront_core::ProductId;

use crate::config::{ConfigError, ShopifyStorefrontConfig};
use crate::shopify::types::{Collection, CollectionConnection, Product, ProductConnection, ProductSortKey};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::CacheValue;
use conversions::{
    convert_collection, convert_collection_connection, convert_product,
    convert_product_connection,
};
use queries::{
    GetCollectionByHandle, GetCollections, GetProductByHandle, GetProductRecommendations,
    GetProducts, get_collection_by_handle, get_collections, get_product_by_handle,
    get_product_recommendations, get_products,
};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";
const CACHE_CAPACITY: u64 = 1000;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides typed access to the catalog, carts and customer accounts.
/// Catalog reads are cached for the configured TTL.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: url::Url,
    access_token: SecretString,
    cache: Cache<String, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the store domain does not form a valid endpoint.
    pub fn new(config: &ShopifyStorefrontConfig) -> Result<Self, ConfigError> {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint()?,
                access_token: config.storefront_token.clone(),
                cache,
            }),
        })
    }

    /// The GraphQL endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &url::Url {
        &self.inner.endpoint
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read the body as text first so failures can be logged
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                operation = request_body.operation_name,
                status = %status,
                body = %truncate(&response_text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::message(format!(
                "HTTP {status}: {}",
                truncate(&response_text, 200)
            )));
        }

        parse_response::<Q::ResponseData>(request_body.operation_name, &response_text)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        let cache_key = cache::product_key(handle);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let data = self
            .execute::<GetProductByHandle>(get_product_by_handle::Variables {
                handle: handle.to_string(),
            })
            .await?;

        let product = data
            .product
            .map(convert_product)
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a page of products, optionally filtered by a search query.
    ///
    /// Search results are never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        first: i64,
        after: Option<String>,
        query: Option<String>,
        sort_key: Option<ProductSortKey>,
        reverse: bool,
    ) -> Result<ProductConnection, ShopifyError> {
        // Sorted pages bypass the cache along with searches
        let cache_key = if sort_key.is_some() || reverse {
            None
        } else {
            cache::products_key(first, after.as_deref(), query.as_deref())
        };

        if let Some(key) = &cache_key
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let data = self
            .execute::<GetProducts>(get_products::Variables {
                first,
                after,
                query,
                sort_key,
                reverse: reverse.then_some(true),
            })
            .await?;

        let connection = convert_product_connection(data.products);

        if let Some(key) = cache_key {
            self.inner
                .cache
                .insert(key, CacheValue::Products(connection.clone()))
                .await;
        }

        Ok(connection)
    }

    /// Get products recommended alongside a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn recommendations(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<Product>, ShopifyError> {
        let cache_key = cache::recommendations_key(product_id.as_str());

        if let Some(CacheValue::Recommendations(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for recommendations");
            return Ok(products);
        }

        let data = self
            .execute::<GetProductRecommendations>(get_product_recommendations::Variables {
                product_id: product_id.clone(),
            })
            .await?;

        let products: Vec<Product> = data
            .product_recommendations
            .map(|recs| recs.into_iter().map(convert_product).collect())
            .unwrap_or_default();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Recommendations(products.clone()))
            .await;

        Ok(products)
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get a collection and a page of its products.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn collection_by_handle(
        &self,
        handle: &str,
        first: i64,
        after: Option<String>,
    ) -> Result<Collection, ShopifyError> {
        let cache_key = cache::collection_key(handle, first, after.as_deref());

        if let Some(CacheValue::Collection(collection)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(*collection);
        }

        let data = self
            .execute::<GetCollectionByHandle>(get_collection_by_handle::Variables {
                handle: handle.to_string(),
                first,
                after,
            })
            .await?;

        let collection = data
            .collection
            .map(convert_collection)
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Collection(Box::new(collection.clone())),
            )
            .await;

        Ok(collection)
    }

    /// Get a page of collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn collections(
        &self,
        first: i64,
        after: Option<String>,
    ) -> Result<CollectionConnection, ShopifyError> {
        let cache_key = cache::collections_key(first, after.as_deref());

        if let Some(CacheValue::Collections(collections)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let data = self
            .execute::<GetCollections>(get_collections::Variables { first, after })
            .await?;

        let connection = convert_collection_connection(data.collections);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Collections(connection.clone()))
            .await;

        Ok(connection)
    }
}

/// Decode a GraphQL response body, surfacing `errors` and missing `data`.
fn parse_response<T: serde::de::DeserializeOwned>(
    operation: &str,
    body: &str,
) -> Result<T, ShopifyError> {
    let response: Response<T> = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(
                operation,
                error = %e,
                body = %truncate(body, 500),
                "Failed to parse Shopify GraphQL response"
            );
            return Err(ShopifyError::Parse(e));
        }
    };

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        debug!(operation, errors = ?errors, "GraphQL errors in response");
        return Err(ShopifyError::GraphQL(
            errors.into_iter().map(convert_graphql_error).collect(),
        ));
    }

    response.data.ok_or_else(|| {
        tracing::error!(
            operation,
            body = %truncate(body, 500),
            "Shopify GraphQL response has no data and no errors"
        );
        ShopifyError::message("No data in response")
    })
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
