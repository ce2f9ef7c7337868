//! The list-query pipeline.
//!
//! [`query`] runs one list request end to end:
//!
//! ```text
//! search string ─► FilterParser ─► Predicates ─► FuzzyIndex ─► candidates
//!                                                                  │
//!                      PageResult ◄─ paginate ◄─ (optional) OrderBy ┘
//! ```

use crate::index::FuzzyIndex;
use crate::ordering::OrderBy;
use crate::paginate::{paginate, PageLinks, PageRequest, PageResult};
use crate::traits::Searchable;

/// Parameters of one list request.
///
/// # Example
///
/// ```
/// use pixer_query::{OrderBy, QueryParams};
///
/// let params = QueryParams::new("/tags")
///     .page(2)
///     .limit(10)
///     .search("name:shirt")
///     .order_by(OrderBy::asc("name"));
/// assert_eq!(params.links().page_url(3), "/tags?search=name%3Ashirt&limit=10&page=3");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    /// Requested page; `None` or `0` means the first.
    pub page: Option<usize>,
    /// Page size; `None` or `0` means the default.
    pub limit: Option<usize>,
    /// Encoded `k:v;k:v` filter, or a bare term for the default field.
    pub search: Option<String>,
    /// Explicit ordering overriding relevance.
    pub order_by: Option<OrderBy>,
    /// Path of the list endpoint, used when no `base_url` is given.
    pub path: String,
    /// Template for page links; `page` is substituted into it.
    pub base_url: Option<String>,
    /// Absolute prefix for page links.
    pub app_url: Option<String>,
}

impl QueryParams {
    /// Creates parameters for the list endpoint at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        QueryParams {
            path: path.into(),
            ..QueryParams::default()
        }
    }

    /// Sets the page.
    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the search string.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets an explicit ordering.
    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Sets the page link template.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the absolute prefix for page links.
    pub fn app_url(mut self, app_url: impl Into<String>) -> Self {
        self.app_url = Some(app_url.into());
        self
    }

    /// The normalized page request.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_params(self.page, self.limit)
    }

    /// Page links for this request.
    ///
    /// Without an explicit `base_url`, links are
    /// `{path}?search={search}&limit={limit}&page=N` with `search`
    /// percent-encoded, so it decodes back to the exact search string.
    pub fn links(&self) -> PageLinks {
        let base_url = match &self.base_url {
            Some(base_url) => base_url.clone(),
            None => format!(
                "{}?search={}&limit={}",
                self.path,
                urlencoding::encode(self.search.as_deref().unwrap_or_default()),
                self.page_request().limit()
            ),
        };
        let links = PageLinks::new(base_url);
        match &self.app_url {
            Some(app_url) => links.with_app_url(app_url.as_str()),
            None => links,
        }
    }
}

/// Runs a list request against an index.
///
/// An absent or blank search returns the whole collection in its original
/// order; otherwise records must match every predicate. Explicit ordering,
/// when given, replaces relevance order before the page is sliced.
pub fn query<'a, T: Searchable>(
    index: &'a FuzzyIndex<T>,
    params: &QueryParams,
) -> PageResult<&'a T> {
    let predicates = params
        .search
        .as_deref()
        .map(|search| index.config().parser().parse(search))
        .unwrap_or_default();

    let mut candidates = index.search(&predicates);
    if let Some(order_by) = &params.order_by {
        order_by.sort(&mut candidates);
    }

    let request = params.page_request();
    tracing::trace!(
        predicates = %predicates,
        candidates = candidates.len(),
        page = request.page(),
        limit = request.limit(),
        "running list query"
    );
    paginate(candidates, request, &params.links())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::index::Collection;
    use crate::value::{RecordId, Value};

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        id: i64,
        name: String,
    }

    impl Searchable for Tag {
        fn record_id(&self) -> RecordId<'_> {
            RecordId::Int(self.id)
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(&self.name),
                _ => Value::None,
            }
        }
    }

    fn index(names: &[&str]) -> FuzzyIndex<Tag> {
        let tags = names
            .iter()
            .enumerate()
            .map(|(i, name)| Tag {
                id: i as i64 + 1,
                name: name.to_string(),
            })
            .collect();
        let config = SearchConfig::new(["name"]).default_field("name");
        FuzzyIndex::build(Collection::new(tags), config).unwrap()
    }

    fn names<'a>(page: &PageResult<&'a Tag>) -> Vec<&'a str> {
        page.data.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn no_search_returns_everything_in_order() {
        let index = index(&["b", "a", "c"]);
        let page = query(&index, &QueryParams::new("/tags"));
        assert_eq!(names(&page), vec!["b", "a", "c"]);
        assert_eq!(page.per_page, 15);
    }

    #[test]
    fn blank_search_equals_no_search() {
        let index = index(&["shirts", "hats"]);
        let blank = query(&index, &QueryParams::new("/tags").search(""));
        let none = query(&index, &QueryParams::new("/tags"));
        assert_eq!(blank.data, none.data);
        assert_eq!(blank.total, none.total);
    }

    #[test]
    fn bare_term_searches_default_field() {
        let index = index(&["shirts", "electronics", "t-shirt"]);
        let page = query(&index, &QueryParams::new("/tags").search("shirt"));
        assert_eq!(names(&page), vec!["shirts", "t-shirt"]);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn ordering_overrides_relevance() {
        let index = index(&["shirts", "t-shirt", "a shirt"]);
        let params = QueryParams::new("/tags")
            .search("name:shirt")
            .order_by(OrderBy::asc("name"));
        let page = query(&index, &params);
        assert_eq!(names(&page), vec!["a shirt", "shirts", "t-shirt"]);
    }

    #[test]
    fn default_links_carry_search_and_limit() {
        let index = index(&["a", "b", "c"]);
        let params = QueryParams::new("/tags").search("name:a").limit(1);
        let page = query(&index, &params);
        assert_eq!(page.first_page_url, "/tags?search=name%3Aa&limit=1&page=1");
    }

    #[test]
    fn explicit_base_url_and_app_url() {
        let index = index(&["a", "b", "c"]);
        let params = QueryParams::new("/tags")
            .limit(1)
            .page(2)
            .base_url("/tags?limit=1&orderBy=name")
            .app_url("http://localhost:5000");
        let page = query(&index, &params);
        assert_eq!(
            page.next_page_url.as_deref(),
            Some("http://localhost:5000/tags?limit=1&orderBy=name&page=3")
        );
        assert_eq!(
            page.prev_page_url.as_deref(),
            Some("http://localhost:5000/tags?limit=1&orderBy=name&page=1")
        );
    }
}
