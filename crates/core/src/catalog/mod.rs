//! Catalog browsing state: filter/sort/search plus incremental pagination.
//!
//! [`CatalogList`] owns the state for one catalog view. It is seeded with the
//! first unfiltered page, accumulates further pages fetched through a
//! [`ProductSource`], and derives the visible (filtered + sorted) view as a
//! pure function of that state. Fetches are strictly serialized: a request
//! made while one is in flight is dropped, not queued.
//!
//! Each outgoing request is tagged with the [`FetchMode`] that was active
//! when it was sent. If the filter context has changed by the time the
//! response arrives, the page is discarded instead of being appended into
//! the wrong context.

use std::collections::HashSet;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Product;

/// Fixed number of items requested per page.
///
/// The has-more heuristic is tied to this value: a page shorter than the
/// requested size is treated as end-of-data.
pub const PAGE_SIZE: u32 = 30;

/// Price ordering applied to the visible view.
///
/// Sorting is a pure view transform; changing it never resets accumulation
/// and never triggers a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "")]
    Unsorted,
    #[serde(rename = "asc")]
    PriceAscending,
    #[serde(rename = "desc")]
    PriceDescending,
}

impl SortOrder {
    /// Query-string value for round-tripping through forms and links.
    #[must_use]
    pub const fn as_query_value(self) -> &'static str {
        match self {
            Self::Unsorted => "",
            Self::PriceAscending => "asc",
            Self::PriceDescending => "desc",
        }
    }
}

/// Which filter dimension governs server-side querying.
///
/// Keyword search and category filter can both be set in UI state, but the
/// keyword takes precedence for server-side narrowing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchMode {
    /// Unfiltered catalog.
    All,
    /// Category-scoped listing.
    Category(String),
    /// Keyword search.
    Keyword(String),
}

/// The single failure kind for catalog fetches.
///
/// Covers transport errors and non-2xx responses alike; callers never see
/// partial or fallback content on failure.
#[derive(Debug, Clone, Error)]
#[error("catalog fetch failed: {reason}")]
pub struct FetchError {
    pub reason: String,
}

impl FetchError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Source of catalog pages.
///
/// Implemented by the storefront's HTTP client and by scripted sources in
/// tests. All calls are read-only suspension points.
pub trait ProductSource {
    /// Fetch one page of products for the given mode.
    ///
    /// `page` is 1-based; implementations derive the zero-based offset as
    /// `(page - 1) * page_size`.
    fn fetch_page(
        &self,
        mode: &FetchMode,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<Vec<Product>, FetchError>> + Send;
}

/// An in-flight page request, tagged with the filter context at send time.
#[derive(Debug, Clone)]
pub struct PageRequest {
    mode: FetchMode,
    page: u32,
}

impl PageRequest {
    /// The fetch mode captured when the request was issued.
    #[must_use]
    pub const fn mode(&self) -> &FetchMode {
        &self.mode
    }

    /// The 1-based page number being fetched.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }
}

/// State for one catalog view: filters, sort, and accumulated pages.
#[derive(Debug, Clone)]
pub struct CatalogList {
    /// First unfiltered page, supplied at construction. Filter-context
    /// changes reset accumulation back to this list without a refetch.
    seed: Vec<Product>,
    accumulated: Vec<Product>,
    /// Last successfully fetched page, 1-based. The seed counts as page 1.
    page: u32,
    has_more: bool,
    is_loading: bool,
    selected_category: Option<String>,
    search_keyword: Option<String>,
    sort_order: SortOrder,
}

impl CatalogList {
    /// Create a catalog list seeded with the server-fetched first page.
    #[must_use]
    pub fn new(seed: Vec<Product>) -> Self {
        Self {
            accumulated: seed.clone(),
            seed,
            page: 1,
            has_more: true,
            is_loading: false,
            selected_category: None,
            search_keyword: None,
            sort_order: SortOrder::Unsorted,
        }
    }

    /// Select a category; an empty slug clears the selection.
    ///
    /// A changed value resets accumulation to the seed and pagination to
    /// page 1. Assigning the current value is a no-op.
    pub fn set_category(&mut self, slug: &str) {
        let next = normalize(slug);
        if next != self.selected_category {
            self.selected_category = next;
            self.reset();
        }
    }

    /// Set the search keyword; empty or whitespace-only text clears it.
    ///
    /// Same reset semantics as [`Self::set_category`].
    pub fn set_search_keyword(&mut self, text: &str) {
        let next = normalize(text);
        if next != self.search_keyword {
            self.search_keyword = next;
            self.reset();
        }
    }

    /// Change the price ordering of the visible view. Never resets
    /// accumulation and never triggers a fetch.
    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
    }

    fn reset(&mut self) {
        self.accumulated = self.seed.clone();
        self.page = 1;
        self.has_more = true;
    }

    /// The fetch mode currently governing server-side queries.
    ///
    /// Keyword search takes priority over category filtering.
    #[must_use]
    pub fn fetch_mode(&self) -> FetchMode {
        if let Some(keyword) = &self.search_keyword {
            FetchMode::Keyword(keyword.clone())
        } else if let Some(slug) = &self.selected_category {
            FetchMode::Category(slug.clone())
        } else {
            FetchMode::All
        }
    }

    /// Begin a fetch for the next page.
    ///
    /// Returns `None` when a fetch is already in flight or the source is
    /// exhausted; otherwise marks the list as loading and returns the
    /// request tagged with the current filter context.
    pub fn begin_fetch(&mut self) -> Option<PageRequest> {
        if self.is_loading || !self.has_more {
            return None;
        }
        self.is_loading = true;
        Some(PageRequest {
            mode: self.fetch_mode(),
            page: self.page + 1,
        })
    }

    /// Apply the outcome of a fetch started with [`Self::begin_fetch`].
    ///
    /// The loading flag is cleared unconditionally. A successful page is
    /// discarded when the filter context changed while the request was in
    /// flight; a failed fetch leaves accumulation, page number and
    /// `has_more` untouched so a later trigger can retry.
    ///
    /// Returns the number of products appended.
    pub fn complete_fetch(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<Product>, FetchError>,
    ) -> usize {
        self.is_loading = false;

        let items = match result {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(error = %err, page = request.page, "catalog page fetch failed");
                return 0;
            }
        };

        if request.mode != self.fetch_mode() {
            tracing::debug!(
                page = request.page,
                "discarding page fetched under a stale filter context"
            );
            return 0;
        }

        self.has_more = items.len() == PAGE_SIZE as usize;
        self.page = request.page;

        let known: HashSet<u64> = self.accumulated.iter().map(|p| p.id).collect();
        let before = self.accumulated.len();
        self.accumulated
            .extend(items.into_iter().filter(|p| !known.contains(&p.id)));
        self.accumulated.len() - before
    }

    /// Fetch and merge the next page from `source`.
    ///
    /// No-op returning 0 while a fetch is in flight or after end-of-data.
    /// Returns the number of products appended.
    pub async fn request_next_page<S: ProductSource>(&mut self, source: &S) -> usize {
        let Some(request) = self.begin_fetch() else {
            return 0;
        };
        let result = source
            .fetch_page(request.mode(), request.page(), PAGE_SIZE)
            .await;
        self.complete_fetch(&request, result)
    }

    /// Derive the filtered + sorted view without mutating stored state.
    ///
    /// Category filter is an exact match, keyword filter a case-insensitive
    /// substring match on the title; each is skipped when unset. Price
    /// sorting is stable, so ties keep accumulation order, and the unsorted
    /// case returns items exactly in accumulation order.
    #[must_use]
    pub fn visible_products(&self) -> Vec<Product> {
        let mut visible: Vec<Product> = self
            .accumulated
            .iter()
            .filter(|p| self.matches_filters(p))
            .cloned()
            .collect();

        match self.sort_order {
            SortOrder::Unsorted => {}
            SortOrder::PriceAscending => visible.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOrder::PriceDescending => visible.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }
        visible
    }

    /// The filtered (unsorted) view of products accumulated at index
    /// `start` or later. Used to render an incremental scroll batch.
    #[must_use]
    pub fn visible_since(&self, start: usize) -> Vec<Product> {
        self.accumulated
            .iter()
            .skip(start)
            .filter(|p| self.matches_filters(p))
            .cloned()
            .collect()
    }

    fn matches_filters(&self, product: &Product) -> bool {
        if let Some(slug) = &self.selected_category
            && product.category != *slug
        {
            return false;
        }
        if let Some(keyword) = &self.search_keyword
            && !product
                .title
                .to_lowercase()
                .contains(&keyword.to_lowercase())
        {
            return false;
        }
        true
    }

    /// Number of products accumulated so far, before view filtering.
    #[must_use]
    pub fn accumulated_len(&self) -> usize {
        self.accumulated.len()
    }

    /// Last successfully fetched page (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Whether a full final page suggests more data remains.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a fetch is currently in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Currently selected category slug, if any.
    #[must_use]
    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    /// Current search keyword, if any.
    #[must_use]
    pub fn search_keyword(&self) -> Option<&str> {
        self.search_keyword.as_deref()
    }

    /// Current price ordering.
    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        self.sort_order
    }
}

fn normalize(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn product(id: u64, title: &str, category: &str, price: f64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "category": category,
            "price": price,
        }))
        .unwrap()
    }

    /// Seed of 30 products split across beauty and furniture.
    #[allow(clippy::cast_precision_loss)]
    fn mixed_seed() -> Vec<Product> {
        (1..=30)
            .map(|i| {
                let category = if i % 2 == 0 { "beauty" } else { "furniture" };
                product(i, &format!("Item {i}"), category, i as f64)
            })
            .collect()
    }

    fn full_page(start_id: u64, category: &str) -> Vec<Product> {
        (start_id..start_id + u64::from(PAGE_SIZE))
            .map(|i| product(i, &format!("Item {i}"), category, 10.0))
            .collect()
    }

    /// Scripted source: pops pre-programmed results and records every call.
    struct ScriptedSource {
        results: Mutex<Vec<Result<Vec<Product>, FetchError>>>,
        calls: Mutex<Vec<(FetchMode, u32)>>,
    }

    impl ScriptedSource {
        fn new(results: Vec<Result<Vec<Product>, FetchError>>) -> Self {
            Self {
                results: Mutex::new(results),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn last_call(&self) -> (FetchMode, u32) {
            self.calls.lock().unwrap().last().unwrap().clone()
        }
    }

    impl ProductSource for ScriptedSource {
        async fn fetch_page(
            &self,
            mode: &FetchMode,
            page: u32,
            _page_size: u32,
        ) -> Result<Vec<Product>, FetchError> {
            self.calls.lock().unwrap().push((mode.clone(), page));
            let mut results = self.results.lock().unwrap();
            if results.is_empty() {
                Ok(Vec::new())
            } else {
                results.remove(0)
            }
        }
    }

    #[test]
    fn category_change_resets_to_seed_and_page_one() {
        let mut list = CatalogList::new(mixed_seed());
        // Fake a prior successful page so there is something to reset.
        let request = list.begin_fetch().unwrap();
        list.complete_fetch(&request, Ok(full_page(100, "beauty")));
        assert_eq!(list.page(), 2);
        assert_eq!(list.accumulated_len(), 60);

        list.set_category("beauty");
        assert_eq!(list.page(), 1);
        assert_eq!(list.accumulated_len(), 30);
        assert!(list.has_more());
    }

    #[test]
    fn keyword_change_resets_to_seed_and_page_one() {
        let mut list = CatalogList::new(mixed_seed());
        let request = list.begin_fetch().unwrap();
        list.complete_fetch(&request, Ok(full_page(100, "beauty")));

        list.set_search_keyword("item");
        assert_eq!(list.page(), 1);
        assert_eq!(list.accumulated_len(), 30);
        assert!(list.has_more());
    }

    #[test]
    fn assigning_same_filter_value_does_not_reset() {
        let mut list = CatalogList::new(mixed_seed());
        list.set_category("beauty");
        let request = list.begin_fetch().unwrap();
        list.complete_fetch(&request, Ok(full_page(100, "beauty")));
        assert_eq!(list.accumulated_len(), 60);

        list.set_category("beauty");
        assert_eq!(list.accumulated_len(), 60);
        assert_eq!(list.page(), 2);
    }

    #[test]
    fn sort_change_never_resets() {
        let mut list = CatalogList::new(mixed_seed());
        let request = list.begin_fetch().unwrap();
        list.complete_fetch(&request, Ok(full_page(100, "beauty")));

        list.set_sort_order(SortOrder::PriceAscending);
        assert_eq!(list.accumulated_len(), 60);
        assert_eq!(list.page(), 2);
    }

    #[tokio::test]
    async fn request_is_noop_while_loading() {
        let mut list = CatalogList::new(mixed_seed());
        let _held = list.begin_fetch().unwrap();
        assert!(list.is_loading());

        let source = ScriptedSource::new(vec![Ok(full_page(100, "beauty"))]);
        let appended = list.request_next_page(&source).await;
        assert_eq!(appended, 0);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn request_is_noop_when_exhausted() {
        let mut list = CatalogList::new(mixed_seed());
        // A short page flips has_more off.
        let source = ScriptedSource::new(vec![Ok(vec![product(100, "Tail", "beauty", 1.0)])]);
        list.request_next_page(&source).await;
        assert!(!list.has_more());

        let appended = list.request_next_page(&source).await;
        assert_eq!(appended, 0);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn full_page_keeps_has_more_short_page_ends_pagination() {
        let mut list = CatalogList::new(mixed_seed());
        let source = ScriptedSource::new(vec![
            Ok(full_page(100, "beauty")),
            Ok(full_page(200, "beauty")[..10].to_vec()),
        ]);

        assert_eq!(list.request_next_page(&source).await, 30);
        assert!(list.has_more());
        assert_eq!(list.page(), 2);

        assert_eq!(list.request_next_page(&source).await, 10);
        assert!(!list.has_more());
        assert_eq!(list.page(), 3);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_state_and_clears_loading() {
        let mut list = CatalogList::new(mixed_seed());
        let source = ScriptedSource::new(vec![Err(FetchError::new("HTTP 500"))]);

        let appended = list.request_next_page(&source).await;
        assert_eq!(appended, 0);
        assert!(!list.is_loading());
        assert_eq!(list.accumulated_len(), 30);
        assert_eq!(list.page(), 1);
        // A transient failure must not permanently stop pagination.
        assert!(list.has_more());

        // The next trigger retries.
        let source = ScriptedSource::new(vec![Ok(full_page(100, "beauty"))]);
        assert_eq!(list.request_next_page(&source).await, 30);
    }

    #[test]
    fn stale_page_is_discarded_after_filter_change() {
        let mut list = CatalogList::new(mixed_seed());
        let request = list.begin_fetch().unwrap();

        // Filter context changes while the request is in flight.
        list.set_search_keyword("lipstick");

        let appended = list.complete_fetch(&request, Ok(full_page(100, "beauty")));
        assert_eq!(appended, 0);
        assert!(!list.is_loading());
        assert_eq!(list.accumulated_len(), 30);
        assert_eq!(list.page(), 1);
    }

    #[test]
    fn duplicate_ids_are_not_appended_twice() {
        let mut list = CatalogList::new(mixed_seed());
        let request = list.begin_fetch().unwrap();
        // Page overlaps the seed on ids 21..=30.
        let page: Vec<Product> = (21..21 + u64::from(PAGE_SIZE))
            .map(|i| product(i, &format!("Item {i}"), "beauty", 5.0))
            .collect();
        let appended = list.complete_fetch(&request, Ok(page));
        assert_eq!(appended, 20);
        assert_eq!(list.accumulated_len(), 50);
    }

    #[test]
    fn visible_sorting_is_monotone_and_default_keeps_insertion_order() {
        let seed = vec![
            product(1, "C", "misc", 3.0),
            product(2, "A", "misc", 1.0),
            product(3, "B", "misc", 2.0),
            product(4, "D", "misc", 1.0),
        ];
        let mut list = CatalogList::new(seed);

        let ids: Vec<u64> = list.visible_products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        list.set_sort_order(SortOrder::PriceAscending);
        let prices: Vec<f64> = list.visible_products().iter().map(|p| p.price).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));
        // Stable: id 2 accumulated before id 4 at the same price.
        let ids: Vec<u64> = list.visible_products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);

        list.set_sort_order(SortOrder::PriceDescending);
        let prices: Vec<f64> = list.visible_products().iter().map(|p| p.price).collect();
        assert!(prices.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn keyword_filter_is_case_insensitive_substring() {
        let seed = vec![
            product(1, "Smartphone X", "electronics", 499.0),
            product(2, "Desk Lamp", "furniture", 25.0),
        ];
        let mut list = CatalogList::new(seed);
        list.set_search_keyword("PHONE");

        let visible = list.visible_products();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible.first().unwrap().title, "Smartphone X");
    }

    #[tokio::test]
    async fn category_selection_filters_view_and_scopes_next_fetch() {
        let mut list = CatalogList::new(mixed_seed());
        list.set_category("beauty");

        assert!(
            list.visible_products()
                .iter()
                .all(|p| p.category == "beauty")
        );
        assert_eq!(list.page(), 1);

        let source = ScriptedSource::new(vec![Ok(full_page(100, "beauty"))]);
        list.request_next_page(&source).await;
        assert_eq!(
            source.last_call(),
            (FetchMode::Category("beauty".to_string()), 2)
        );
    }

    #[tokio::test]
    async fn keyword_takes_priority_over_category_for_fetches() {
        let mut list = CatalogList::new(mixed_seed());
        list.set_search_keyword("lipstick");
        list.set_category("furniture");

        assert_eq!(list.selected_category(), Some("furniture"));
        assert_eq!(list.search_keyword(), Some("lipstick"));

        let source = ScriptedSource::new(vec![Ok(Vec::new())]);
        list.request_next_page(&source).await;
        assert_eq!(
            source.last_call(),
            (FetchMode::Keyword("lipstick".to_string()), 2)
        );
    }

    #[test]
    fn blank_keyword_clears_keyword_mode() {
        let mut list = CatalogList::new(mixed_seed());
        list.set_search_keyword("lipstick");
        assert!(matches!(list.fetch_mode(), FetchMode::Keyword(_)));

        list.set_search_keyword("   ");
        assert_eq!(list.search_keyword(), None);
        assert_eq!(list.fetch_mode(), FetchMode::All);
    }

    #[test]
    fn visible_since_applies_filters_without_sorting() {
        let mut list = CatalogList::new(mixed_seed());
        list.set_category("beauty");
        list.set_sort_order(SortOrder::PriceDescending);
        let request = list.begin_fetch().unwrap();

        let mut page = full_page(100, "beauty");
        if let Some(stray) = page.first_mut() {
            stray.category = "furniture".to_string();
        }
        list.complete_fetch(&request, Ok(page));

        let batch = list.visible_since(30);
        assert_eq!(batch.len(), 29);
        // Arrival order, not price order.
        let ids: Vec<u64> = batch.iter().map(|p| p.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn sort_order_parses_query_values() {
        assert_eq!(
            serde_json::from_str::<SortOrder>("\"asc\"").unwrap(),
            SortOrder::PriceAscending
        );
        assert_eq!(
            serde_json::from_str::<SortOrder>("\"desc\"").unwrap(),
            SortOrder::PriceDescending
        );
        assert_eq!(
            serde_json::from_str::<SortOrder>("\"\"").unwrap(),
            SortOrder::Unsorted
        );
        assert_eq!(SortOrder::PriceAscending.as_query_value(), "asc");
    }
}
