//! Remote catalog API client.
//!
//! REST client for category and product reads, with `reqwest` for HTTP and
//! `moka` for response caching (5-minute TTL). The catalog service is the
//! source of truth; nothing is synced locally.

mod cache;
pub mod types;

pub use types::{Category, Product, ProductImage};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use souk_core::{CategoryId, ProductId};

use cache::CacheValue;

/// Fixed endpoint paths under the API base URL.
mod paths {
    pub const CATEGORIES: &str = "catalog/categories/";
    pub const PRODUCTS: &str = "catalog/products/";
}

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-success status from the API.
    #[error("catalog API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Truncated response body.
        body: String,
    },
}

/// Client for the remote catalog API.
///
/// Provides typed access to categories and products. All reads are cached
/// for 5 minutes.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    http: reqwest::Client,
    base_url: Url,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                http: reqwest::Client::new(),
                base_url,
                cache,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    /// Execute a GET request and parse the JSON response.
    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let response = self
            .inner
            .http
            .get(self.endpoint(path))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        // Read the body as text first for better error diagnostics.
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_owned()));
        }

        if !status.is_success() {
            tracing::error!(
                %status,
                body = %body.chars().take(500).collect::<String>(),
                "catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse catalog API response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        let cache_key = "categories".to_owned();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.fetch(paths::CATEGORIES).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Get a category by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn category(&self, id: CategoryId) -> Result<Category, CatalogError> {
        let cache_key = format!("category:{id}");

        if let Some(CacheValue::Category(category)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(*category);
        }

        let category: Category = self.fetch(&format!("{}{id}/", paths::CATEGORIES)).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Category(Box::new(category.clone())))
            .await;

        Ok(category)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let cache_key = "products".to_owned();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.fetch(paths::PRODUCTS).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.fetch(&format!("{}{id}/", paths::PRODUCTS)).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// List the products belonging to a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn products_by_category(
        &self,
        id: CategoryId,
    ) -> Result<Vec<Product>, CatalogError> {
        let cache_key = format!("category-products:{id}");

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .fetch(&format!("{}{id}/products/", paths::CATEGORIES))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("catalog/products/9/".to_owned());
        assert_eq!(err.to_string(), "Not found: catalog/products/9/");
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let client = CatalogClient::new(
            Url::parse("https://api.example.dz/fr/api/").expect("valid url"),
        );
        assert_eq!(
            client.endpoint("catalog/categories/"),
            "https://api.example.dz/fr/api/catalog/categories/"
        );

        let client =
            CatalogClient::new(Url::parse("https://api.example.dz/fr/api").expect("valid url"));
        assert_eq!(
            client.endpoint("catalog/products/3/"),
            "https://api.example.dz/fr/api/catalog/products/3/"
        );
    }
}
