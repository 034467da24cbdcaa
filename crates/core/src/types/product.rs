//! Product catalog types.
//!
//! The remote catalog API is the source of truth for this schema; the types
//! here mirror its camelCase JSON and add nothing of their own. Products are
//! immutable once fetched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single product as returned by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub brand: Option<String>,
    pub category: String,
    #[serde(default)]
    pub thumbnail: String,
    /// Ordered image sequence for the detail-page carousel.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,
}

impl Product {
    /// Price before the discount was applied, when a discount exists.
    ///
    /// The API reports the discounted price plus a percentage, so the list
    /// price is reconstructed as `price / (1 - discount / 100)`.
    #[must_use]
    pub fn list_price(&self) -> Option<f64> {
        if self.discount_percentage > 0.0 && self.discount_percentage < 100.0 {
            Some(self.price / (1.0 - self.discount_percentage / 100.0))
        } else {
            None
        }
    }

    /// Number of reviews attached to this product.
    #[must_use]
    pub fn review_count(&self) -> usize {
        self.reviews.as_ref().map_or(0, Vec::len)
    }
}

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
    pub reviewer_name: String,
    pub reviewer_email: String,
}

/// A product category.
///
/// Fetched once per process and treated as read-only reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier used in URLs and fetch requests.
    pub slug: String,
    /// Display label for the filter bar.
    pub name: String,
}

/// Wire envelope for the list/search/category endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}
