//! Remote product catalog API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest` 0.13; the remote API is the source of truth,
//!   nothing is synced locally
//! - In-memory caching via `moka` for API responses (5 minute TTL)
//! - Implements [`ProductSource`] so the catalog list controller in
//!   `tinyshop-core` can drive pagination through it
//!
//! # Endpoints
//!
//! - `GET /products?limit=&skip=` - unfiltered listing
//! - `GET /products/category/{slug}?limit=&skip=` - category listing
//! - `GET /products/search?limit=&skip=&q=` - keyword search
//! - `GET /products/categories` - category reference data
//! - `GET /products/{id}` - single product

mod cache;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tinyshop_core::{Category, FetchError, FetchMode, Product, ProductPage, ProductSource};

use crate::config::StorefrontConfig;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the catalog API.
///
/// Every variant is a fetch failure from the caller's point of view: there
/// is no partial or fallback content, and failures are not retried here.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("catalog API returned HTTP {status}")]
    FetchFailed { status: StatusCode },

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the remote product catalog API.
///
/// Cheaply cloneable; all clones share one HTTP connection pool and one
/// response cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.catalog_api_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// Fetch one page of the unfiltered catalog.
    pub async fn fetch_all(&self, page: u32, page_size: u32) -> Result<Vec<Product>, CatalogError> {
        self.fetch_list(FetchMode::All, page, page_size).await
    }

    /// Fetch one page of a category-scoped listing.
    pub async fn fetch_by_category(
        &self,
        slug: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Product>, CatalogError> {
        self.fetch_list(FetchMode::Category(slug.to_string()), page, page_size)
            .await
    }

    /// Fetch one page of keyword search results.
    pub async fn fetch_by_keyword(
        &self,
        text: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Product>, CatalogError> {
        self.fetch_list(FetchMode::Keyword(text.to_string()), page, page_size)
            .await
    }

    async fn fetch_list(
        &self,
        mode: FetchMode,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Product>, CatalogError> {
        let key = CacheKey::Page {
            mode: mode.clone(),
            page,
        };
        if let Some(CacheValue::Page(products)) = self.inner.cache.get(&key).await {
            return Ok(products);
        }

        let url = list_url(&self.inner.base_url, &mode, page, page_size);
        let envelope: ProductPage = self.get_json(&url).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Page(envelope.products.clone()))
            .await;
        Ok(envelope.products)
    }

    /// Fetch the category reference list.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            return Ok(categories);
        }

        let url = format!("{}/products/categories", self.inner.base_url);
        let categories: Vec<Category> = self.get_json(&url).await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;
        Ok(categories)
    }

    /// Fetch a single product by id.
    pub async fn fetch_by_id(&self, id: u64) -> Result<Product, CatalogError> {
        if let Some(CacheValue::Product(product)) =
            self.inner.cache.get(&CacheKey::Product(id)).await
        {
            return Ok(*product);
        }

        let url = format!("{}/products/{id}", self.inner.base_url);
        let product: Product = self.get_json(&url).await?;

        self.inner
            .cache
            .insert(
                CacheKey::Product(id),
                CacheValue::Product(Box::new(product.clone())),
            )
            .await;
        Ok(product)
    }

    /// Issue a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::error!(
                status = %status,
                url = %url,
                "catalog API returned non-success status"
            );
            return Err(CatalogError::FetchFailed { status });
        }

        // Read the body as text first for better diagnostics on shape drift.
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| {
            tracing::error!(
                error = %err,
                url = %url,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse catalog API response"
            );
            CatalogError::Parse(err)
        })
    }
}

impl ProductSource for CatalogClient {
    async fn fetch_page(
        &self,
        mode: &FetchMode,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Product>, FetchError> {
        self.fetch_list(mode.clone(), page, page_size)
            .await
            .map_err(|err| FetchError::new(err.to_string()))
    }
}

/// Build the request URL for a list fetch.
///
/// The zero-based offset is `(page - 1) * page_size`, saturating so page 0
/// and page 1 both map to offset 0.
fn list_url(base_url: &str, mode: &FetchMode, page: u32, page_size: u32) -> String {
    let skip = page.saturating_sub(1) * page_size;
    match mode {
        FetchMode::All => format!("{base_url}/products?limit={page_size}&skip={skip}"),
        FetchMode::Category(slug) => format!(
            "{base_url}/products/category/{}?limit={page_size}&skip={skip}",
            urlencoding::encode(slug)
        ),
        FetchMode::Keyword(text) => format!(
            "{base_url}/products/search?limit={page_size}&skip={skip}&q={}",
            urlencoding::encode(text)
        ),
    }
}
