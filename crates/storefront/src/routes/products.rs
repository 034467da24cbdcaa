//! Product detail page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use reqwest::StatusCode;

use tinyshop_core::Product;

#[allow(unused_imports)]
use crate::filters;
use crate::catalog::CatalogError;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::{discount_label, format_money, rating_stars};
use crate::state::AppState;

/// Product display data for the detail page.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub description: String,
    pub price: String,
    pub list_price: Option<String>,
    /// Rounded discount percentage, e.g. `"18"`.
    pub discount_label: Option<String>,
    pub rating: String,
    pub stars: String,
    pub review_count: usize,
    pub stock_label: String,
    pub stock_class: &'static str,
    pub brand: String,
    pub sku: Option<String>,
    pub weight: Option<String>,
    pub warranty: Option<String>,
    pub shipping: String,
    /// Ordered carousel images; falls back to the thumbnail when the API
    /// provides no gallery.
    pub images: Vec<String>,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        let (stock_class, stock_label) = stock_badge(product.stock);
        let images = if product.images.is_empty() {
            vec![product.thumbnail.clone()]
        } else {
            product.images.clone()
        };

        Self {
            id: product.id,
            title: product.title.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            price: format_money(product.price),
            list_price: product.list_price().map(format_money),
            discount_label: discount_label(product.discount_percentage),
            rating: format!("{:.1}", product.rating),
            stars: rating_stars(product.rating),
            review_count: product.review_count(),
            stock_label,
            stock_class,
            brand: product
                .brand
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            sku: product.sku.clone(),
            weight: product.weight.map(|w| format!("{w}g")),
            warranty: product.warranty_information.clone(),
            shipping: product
                .shipping_information
                .clone()
                .unwrap_or_else(|| "Fast Shipping".to_string()),
            images,
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
}

/// Display the product detail page.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<ProductShowTemplate> {
    let product = match state.catalog().fetch_by_id(id).await {
        Ok(product) => product,
        Err(CatalogError::FetchFailed { status }) if status == StatusCode::NOT_FOUND => {
            return Err(AppError::NotFound(format!("product {id}")));
        }
        Err(err) => return Err(err.into()),
    };

    add_breadcrumb(
        "navigation",
        "Viewed product detail",
        Some(&[("product_id", id.to_string().as_str())]),
    );

    Ok(ProductShowTemplate {
        product: ProductDetailView::from(&product),
    })
}

/// Three-tier availability badge: more than 10 in stock, 1-10 left, none.
fn stock_badge(stock: u32) -> (&'static str, String) {
    if stock > 10 {
        ("in-stock", "In Stock".to_string())
    } else if stock > 0 {
        ("low-stock", format!("Only {stock} left"))
    } else {
        ("out-of-stock", "Out of Stock".to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn stock_badge_tiers() {
        assert_eq!(stock_badge(42), ("in-stock", "In Stock".to_string()));
        assert_eq!(stock_badge(11), ("in-stock", "In Stock".to_string()));
        assert_eq!(stock_badge(10), ("low-stock", "Only 10 left".to_string()));
        assert_eq!(stock_badge(1), ("low-stock", "Only 1 left".to_string()));
        assert_eq!(stock_badge(0), ("out-of-stock", "Out of Stock".to_string()));
    }

    #[test]
    fn detail_view_falls_back_to_thumbnail_carousel() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Desk Lamp",
            "category": "furniture",
            "price": 25.0,
            "stock": 3,
            "thumbnail": "https://cdn.example.com/lamp.png",
        }))
        .unwrap();

        let view = ProductDetailView::from(&product);
        assert_eq!(view.images, vec!["https://cdn.example.com/lamp.png"]);
        assert_eq!(view.stock_class, "low-stock");
        assert_eq!(view.stock_label, "Only 3 left");
        assert_eq!(view.brand, "N/A");
        assert_eq!(view.shipping, "Fast Shipping");
    }
}
