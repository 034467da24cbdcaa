//! Catalog page and infinite-scroll fragment handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Extension, Query, State};
use serde::Deserialize;

use tinyshop_core::{CatalogList, Category, PAGE_SIZE, Product, ProductSource, SortOrder};

#[allow(unused_imports)]
use crate::filters;
use crate::error::Result;
use crate::middleware::BrowseSessionId;
use crate::routes::{discount_label, format_money};
use crate::state::AppState;

/// Product display data for catalog cards.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub description: String,
    pub price: String,
    pub list_price: Option<String>,
    /// Rounded discount percentage, e.g. `"18"`.
    pub discount_label: Option<String>,
    pub rating: String,
    pub thumbnail: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            category: product.category.clone(),
            description: excerpt(&product.description, 140),
            price: format_money(product.price),
            list_price: product.list_price().map(format_money),
            discount_label: discount_label(product.discount_percentage),
            rating: format!("{:.1}", product.rating),
            thumbnail: product.thumbnail.clone(),
        }
    }
}

/// Filter/sort/search query parameters for the catalog.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub sort: Option<SortOrder>,
}

/// Full catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogIndexTemplate {
    pub categories: Vec<Category>,
    pub products: Vec<ProductCardView>,
    pub selected_category: String,
    pub search_keyword: String,
    pub sort_value: &'static str,
    pub has_more: bool,
    pub fetch_failed: bool,
    pub next_url: String,
}

/// Scroll batch fragment template (cards plus a fresh sentinel, or a
/// click-to-retry control after a failed fetch).
#[derive(Template, WebTemplate)]
#[template(path = "catalog/_cards.html")]
pub struct CatalogBatchTemplate {
    pub products: Vec<ProductCardView>,
    pub has_more: bool,
    pub fetch_failed: bool,
    pub next_url: String,
}

/// Display the catalog page.
///
/// Seeds the visitor's catalog list when needed (a seed-fetch failure is a
/// hard failure: there is no catalog to show), applies the query filters
/// and renders the derived view.
pub async fn index(
    State(state): State<AppState>,
    Extension(session): Extension<BrowseSessionId>,
    Query(query): Query<CatalogQuery>,
) -> Result<CatalogIndexTemplate> {
    let categories = state.catalog().fetch_categories().await?;
    let list = state
        .browsers()
        .get_or_seed(session.0, state.catalog())
        .await?;
    let mut list = list.lock().await;

    apply_query(&mut list, &query);

    let products = list
        .visible_products()
        .iter()
        .map(ProductCardView::from)
        .collect();

    Ok(CatalogIndexTemplate {
        categories,
        products,
        selected_category: list.selected_category().unwrap_or_default().to_string(),
        search_keyword: list.search_keyword().unwrap_or_default().to_string(),
        sort_value: list.sort_order().as_query_value(),
        has_more: list.has_more(),
        fetch_failed: false,
        next_url: load_more_url(&list),
    })
}

/// Fetch and render the next scroll batch.
///
/// Invoked by the sentinel at the bottom of the grid. A pagination-time
/// fetch failure is not retried automatically: the fragment then carries a
/// click-to-retry control instead of a sentinel that would fire again the
/// moment it lands in the viewport.
pub async fn load_more(
    State(state): State<AppState>,
    Extension(session): Extension<BrowseSessionId>,
    Query(query): Query<CatalogQuery>,
) -> Result<CatalogBatchTemplate> {
    let list = state
        .browsers()
        .get_or_seed(session.0, state.catalog())
        .await?;
    let mut list = list.lock().await;

    // Re-assert the filter context the sentinel was rendered under, in case
    // the session was evicted between page render and scroll.
    apply_query(&mut list, &query);

    let start = list.accumulated_len();
    let mut fetch_failed = false;
    if let Some(request) = list.begin_fetch() {
        let result = state
            .catalog()
            .fetch_page(request.mode(), request.page(), PAGE_SIZE)
            .await;
        fetch_failed = result.is_err();
        list.complete_fetch(&request, result);
    }

    let products = list
        .visible_since(start)
        .iter()
        .map(ProductCardView::from)
        .collect();

    Ok(CatalogBatchTemplate {
        products,
        has_more: list.has_more(),
        fetch_failed,
        next_url: load_more_url(&list),
    })
}

fn apply_query(list: &mut CatalogList, query: &CatalogQuery) {
    list.set_category(query.category.as_deref().unwrap_or(""));
    list.set_search_keyword(query.q.as_deref().unwrap_or(""));
    list.set_sort_order(query.sort.unwrap_or_default());
}

/// URL the sentinel requests for the next batch, carrying the current
/// filter context.
fn load_more_url(list: &CatalogList) -> String {
    format!(
        "/catalog/page?category={}&q={}&sort={}",
        urlencoding::encode(list.selected_category().unwrap_or_default()),
        urlencoding::encode(list.search_keyword().unwrap_or_default()),
        list.sort_order().as_query_value()
    )
}

/// Shorten text to at most `max` characters on a char boundary.
fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max).collect();
    short.push('…');
    short
}
