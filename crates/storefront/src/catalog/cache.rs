//! Cache types for catalog API responses.

use tinyshop_core::{Category, FetchMode, Product};

/// Cache key for catalog API lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Page { mode: FetchMode, page: u32 },
    Product(u64),
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Page(Vec<Product>),
    Product(Box<Product>),
    Categories(Vec<Category>),
}
