//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                  - Catalog page (grid, filter bar, sentinel)
//! GET  /catalog/page      - Next scroll batch (HTMX fragment)
//! GET  /products/{id}     - Product detail page
//! GET  /health            - Liveness check
//! GET  /health/ready      - Readiness check (probes the catalog API)
//! ```

pub mod catalog;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/catalog/page", get(catalog::load_more))
        .route("/products/{id}", get(products::show))
}

/// Format an amount as a display price, e.g. `$19.99`.
pub(crate) fn format_money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Render a rating as a five-star string, e.g. `★★★★☆`.
pub(crate) fn rating_stars(rating: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = (rating.floor().clamp(0.0, 5.0)) as usize;
    "★".repeat(filled) + &"☆".repeat(5 - filled)
}

/// Rounded discount percentage label, e.g. `"18"`; `None` when undiscounted.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn discount_label(percentage: f64) -> Option<String> {
    if percentage > 0.0 {
        Some(format!("{}", percentage.round() as i64))
    } else {
        None
    }
}
