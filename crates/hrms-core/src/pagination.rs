//! Offset pagination shared by every list endpoint.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Normalized page/limit pair parsed from query parameters.
///
/// `page` is 1-based and floored at 1; `limit` is clamped to
/// `1..=MAX_PAGE_LIMIT`. Out-of-range inputs are silently normalized rather
/// than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }.normalized()
    }

    /// Clamp page and limit into their valid ranges.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Row offset for the normalized query.
    pub fn offset(&self) -> u64 {
        let q = self.normalized();
        u64::from(q.page - 1) * u64::from(q.limit)
    }
}

/// One page of results together with the totals clients need for paging UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, query: PageQuery) -> Self {
        let query = query.normalized();
        let pages = total.div_ceil(u64::from(query.limit));
        Self {
            items,
            total,
            page: query.page,
            limit: query.limit,
            pages: u32::try_from(pages).unwrap_or(u32::MAX),
        }
    }

    pub fn empty(query: PageQuery) -> Self {
        Self::new(Vec::new(), 0, query)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let q = PageQuery::default();
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_normalization_clamps() {
        let q = PageQuery::new(0, 0);
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 1);

        let q = PageQuery::new(3, 500);
        assert_eq!(q.limit, MAX_PAGE_LIMIT);
        assert_eq!(q.offset(), 200);
    }

    #[test]
    fn test_page_count_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 31, PageQuery::new(1, 10));
        assert_eq!(page.pages, 4);

        let page = Page::<i32>::new(Vec::new(), 30, PageQuery::new(1, 10));
        assert_eq!(page.pages, 3);

        let page = Page::<i32>::empty(PageQuery::default());
        assert_eq!(page.pages, 0);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_query_deserializes_with_defaults() {
        let q: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q, PageQuery::default());

        let q: PageQuery = serde_json::from_str(r#"{"page":2,"limit":25}"#).unwrap();
        assert_eq!(q.page, 2);
        assert_eq!(q.limit, 25);
    }

    #[test]
    fn test_map_preserves_totals() {
        let page = Page::new(vec![1, 2], 12, PageQuery::new(2, 2));
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.items, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(mapped.total, 12);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.pages, 6);
    }
}
