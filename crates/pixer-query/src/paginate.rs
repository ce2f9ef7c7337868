//! Page slicing and pagination metadata.
//!
//! [`paginate`] turns an already filtered, ordered list into a
//! [`PageResult`]: the requested slice plus the counts, bounds and links a
//! client needs to navigate the rest.
//!
//! Out-of-range pages are not errors; they produce an empty `data` slice
//! with `first_item` and `last_item` set to `0`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// A `page` parameter within a query string (the part between `?` and `#`).
static PAGE_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|&)page=[^&]*").expect("page parameter pattern is valid"));

/// Which page to return and how large pages are.
///
/// Zero is not a valid page or limit; both are coerced to their defaults
/// (`page = 1`, `limit = 15`) rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl PageRequest {
    /// Page returned when none (or zero) is requested.
    pub const DEFAULT_PAGE: usize = 1;
    /// Page size used when none (or zero) is requested.
    pub const DEFAULT_LIMIT: usize = 15;

    /// Creates a request, coercing zero values to the defaults.
    pub fn new(page: usize, limit: usize) -> Self {
        PageRequest {
            page: if page == 0 { Self::DEFAULT_PAGE } else { page },
            limit: if limit == 0 { Self::DEFAULT_LIMIT } else { limit },
        }
    }

    /// Creates a request from optional parameters.
    pub fn from_params(page: Option<usize>, limit: Option<usize>) -> Self {
        PageRequest::new(page.unwrap_or(0), limit.unwrap_or(0))
    }

    /// The 1-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// The page size.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Index of the first item of this page in the full list.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT)
    }
}

/// Builds page links from a base URL.
///
/// The base URL carries every other parameter (search term, filters,
/// limit); only `page` is substituted, so links round-trip the rest
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    base_url: String,
    app_url: Option<String>,
}

impl PageLinks {
    /// Creates links relative to `base_url`, e.g. `/tags?search=name%3Aa&limit=15`.
    pub fn new(base_url: impl Into<String>) -> Self {
        PageLinks {
            base_url: base_url.into(),
            app_url: None,
        }
    }

    /// Prefixes every link with an absolute application URL.
    pub fn with_app_url(mut self, app_url: impl Into<String>) -> Self {
        let app_url = app_url.into();
        self.app_url = if app_url.is_empty() {
            None
        } else {
            Some(app_url)
        };
        self
    }

    /// The link to `page`.
    pub fn page_url(&self, page: usize) -> String {
        let url = with_page_param(&self.base_url, page);
        match &self.app_url {
            Some(app) => format!(
                "{}/{}",
                app.trim_end_matches('/'),
                url.trim_start_matches('/')
            ),
            None => url,
        }
    }
}

fn with_page_param(base_url: &str, page: usize) -> String {
    let (url, fragment) = match base_url.find('#') {
        Some(at) => base_url.split_at(at),
        None => (base_url, ""),
    };
    let Some((path, query)) = url.split_once('?') else {
        return format!("{url}?page={page}{fragment}");
    };

    let query = if PAGE_PARAM.is_match(query) {
        let replacement = format!("${{1}}page={page}");
        PAGE_PARAM.replace(query, replacement.as_str()).into_owned()
    } else if query.is_empty() || query.ends_with('&') {
        format!("{query}page={page}")
    } else {
        format!("{query}&page={page}")
    };
    format!("{path}?{query}{fragment}")
}

/// One page of a filtered collection, with navigation metadata.
///
/// Serializes with the field names list endpoints respond with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult<T> {
    /// The records on this page.
    pub data: Vec<T>,
    /// Number of records on this page.
    pub count: usize,
    /// The page number returned.
    pub current_page: usize,
    /// 1-based position of the first record of `data`, `0` when empty.
    pub first_item: usize,
    /// 1-based position of the last record of `data`, `0` when empty.
    pub last_item: usize,
    /// Number of the last page, at least `1`.
    pub last_page: usize,
    /// Page size.
    pub per_page: usize,
    /// Size of the full filtered collection.
    pub total: usize,
    pub first_page_url: String,
    pub last_page_url: String,
    pub next_page_url: Option<String>,
    pub prev_page_url: Option<String>,
}

impl<T> PageResult<T> {
    /// Converts the records, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> PageResult<U>
    where
        F: FnMut(T) -> U,
    {
        PageResult {
            data: self.data.into_iter().map(f).collect(),
            count: self.count,
            current_page: self.current_page,
            first_item: self.first_item,
            last_item: self.last_item,
            last_page: self.last_page,
            per_page: self.per_page,
            total: self.total,
            first_page_url: self.first_page_url,
            last_page_url: self.last_page_url,
            next_page_url: self.next_page_url,
            prev_page_url: self.prev_page_url,
        }
    }

    /// Returns `true` if this page holds no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Clone> PageResult<&T> {
    /// Clones the borrowed records into an owned page.
    pub fn cloned(self) -> PageResult<T> {
        self.map(T::clone)
    }
}

/// Slices one page out of `items` and computes its metadata.
///
/// # Example
///
/// ```
/// use pixer_query::{paginate, PageLinks, PageRequest};
///
/// let tags: Vec<u32> = (1..=22).collect();
/// let page = paginate(tags, PageRequest::new(2, 15), &PageLinks::new("/tags?limit=15"));
///
/// assert_eq!(page.data.len(), 7);
/// assert_eq!((page.first_item, page.last_item), (16, 22));
/// assert_eq!(page.prev_page_url.as_deref(), Some("/tags?limit=15&page=1"));
/// assert_eq!(page.next_page_url, None);
/// ```
pub fn paginate<T>(items: Vec<T>, request: PageRequest, links: &PageLinks) -> PageResult<T> {
    let total = items.len();
    let limit = request.limit();
    let current_page = request.page();
    let last_page = total.div_ceil(limit).max(1);

    let start = request.offset().min(total);
    let data: Vec<T> = items.into_iter().skip(start).take(limit).collect();
    let count = data.len();
    let (first_item, last_item) = if count == 0 {
        (0, 0)
    } else {
        (start + 1, start + count)
    };

    PageResult {
        data,
        count,
        current_page,
        first_item,
        last_item,
        last_page,
        per_page: limit,
        total,
        first_page_url: links.page_url(1),
        last_page_url: links.page_url(last_page),
        next_page_url: (current_page < last_page).then(|| links.page_url(current_page + 1)),
        prev_page_url: (current_page > 1).then(|| links.page_url(current_page - 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("t{i}")).collect()
    }

    #[test]
    fn zero_values_are_coerced() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 15);
        assert_eq!(PageRequest::from_params(None, Some(5)).limit(), 5);
        assert_eq!(PageRequest::default(), PageRequest::new(1, 15));
    }

    #[test]
    fn offset_saturates() {
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(usize::MAX, usize::MAX).offset(), usize::MAX);
    }

    #[test]
    fn first_page() {
        let page = paginate(tags(22), PageRequest::new(1, 15), &PageLinks::new("/tags?limit=15"));
        assert_eq!(page.data, tags(15));
        assert_eq!(page.count, 15);
        assert_eq!(page.total, 22);
        assert_eq!(page.last_page, 2);
        assert_eq!((page.first_item, page.last_item), (1, 15));
        assert_eq!(page.next_page_url.as_deref(), Some("/tags?limit=15&page=2"));
        assert_eq!(page.prev_page_url, None);
        assert_eq!(page.first_page_url, "/tags?limit=15&page=1");
        assert_eq!(page.last_page_url, "/tags?limit=15&page=2");
    }

    #[test]
    fn last_partial_page() {
        let page = paginate(tags(22), PageRequest::new(2, 15), &PageLinks::new("/tags"));
        assert_eq!(page.data, tags(22)[15..].to_vec());
        assert_eq!(page.count, 7);
        assert_eq!((page.first_item, page.last_item), (16, 22));
        assert_eq!(page.prev_page_url.as_deref(), Some("/tags?page=1"));
        assert_eq!(page.next_page_url, None);
    }

    #[test]
    fn page_beyond_end_is_empty() {
        let page = paginate(tags(22), PageRequest::new(5, 15), &PageLinks::new("/tags"));
        assert!(page.is_empty());
        assert_eq!((page.first_item, page.last_item), (0, 0));
        assert_eq!(page.total, 22);
        assert_eq!(page.current_page, 5);
        assert_eq!(page.next_page_url, None);
        assert_eq!(page.prev_page_url.as_deref(), Some("/tags?page=4"));
    }

    #[test]
    fn empty_collection_has_one_page() {
        let page = paginate(Vec::<String>::new(), PageRequest::default(), &PageLinks::new("/tags"));
        assert_eq!(page.last_page, 1);
        assert_eq!(page.total, 0);
        assert_eq!(page.next_page_url, None);
        assert_eq!(page.prev_page_url, None);
        assert_eq!(page.last_page_url, "/tags?page=1");
    }

    #[test]
    fn exact_multiple_of_limit() {
        let page = paginate(tags(30), PageRequest::new(2, 15), &PageLinks::new("/tags"));
        assert_eq!(page.last_page, 2);
        assert_eq!(page.next_page_url, None);
    }

    #[test]
    fn existing_page_param_is_replaced_in_place() {
        let links = PageLinks::new("/tags?page=3&search=name:shirt&limit=15");
        assert_eq!(links.page_url(4), "/tags?page=4&search=name:shirt&limit=15");

        let links = PageLinks::new("/tags?search=a&page=&limit=2");
        assert_eq!(links.page_url(1), "/tags?search=a&page=1&limit=2");
    }

    #[test]
    fn similar_params_are_not_replaced() {
        let links = PageLinks::new("/tags?per_page=5");
        assert_eq!(links.page_url(2), "/tags?per_page=5&page=2");
    }

    #[test]
    fn fragment_stays_last() {
        let links = PageLinks::new("/tags?limit=5#list");
        assert_eq!(links.page_url(2), "/tags?limit=5&page=2#list");
    }

    #[test]
    fn page_in_fragment_or_value_is_not_replaced() {
        let links = PageLinks::new("/tags?limit=5#page=3");
        assert_eq!(links.page_url(2), "/tags?limit=5&page=2#page=3");

        let links = PageLinks::new("/tags?search=name%3Aa%26page%3D7&limit=2");
        assert_eq!(links.page_url(2), "/tags?search=name%3Aa%26page%3D7&limit=2&page=2");

        let links = PageLinks::new("/tags?q=subpage=1");
        assert_eq!(links.page_url(2), "/tags?q=subpage=1&page=2");
    }

    #[test]
    fn dangling_separator_is_reused() {
        assert_eq!(PageLinks::new("/tags?").page_url(1), "/tags?page=1");
        assert_eq!(PageLinks::new("/tags?a=1&").page_url(1), "/tags?a=1&page=1");
    }

    #[test]
    fn app_url_prefixes_links() {
        let links = PageLinks::new("/tags?limit=15").with_app_url("https://shop.example/api/");
        assert_eq!(
            links.page_url(2),
            "https://shop.example/api/tags?limit=15&page=2"
        );
        assert_eq!(
            PageLinks::new("/tags").with_app_url("").page_url(1),
            "/tags?page=1"
        );
    }

    #[test]
    fn map_keeps_metadata() {
        let page = paginate(tags(3), PageRequest::new(1, 2), &PageLinks::new("/tags"));
        let lengths = page.clone().map(|t| t.len());
        assert_eq!(lengths.data, vec![2, 2]);
        assert_eq!(lengths.total, page.total);
        assert_eq!(lengths.next_page_url, page.next_page_url);
    }
}
