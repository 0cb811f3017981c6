//! Page/limit pagination utilities.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not send one.
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Hard upper bound on page size regardless of configuration.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Normalized page request (1-based page, clamped limit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Builds a page request, clamping `page >= 1` and `1 <= limit <= max_limit`.
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64, max_limit: i64) -> Self {
        let max_limit = max_limit.clamp(1, MAX_PAGE_SIZE);
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(default_limit).clamp(1, max_limit);
        Self { page, limit }
    }

    /// Row offset for SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

/// Pagination metadata returned alongside list payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total = total.max(0);
        let total_pages = if total == 0 {
            0
        } else {
            (total + request.limit - 1) / request.limit
        };
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::new(Some(0), Some(1000), 12, 50);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 50);

        let req = PageRequest::new(Some(-4), Some(0), 12, 50);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 1);
    }

    #[test]
    fn test_page_request_offset() {
        let req = PageRequest::new(Some(3), Some(20), 12, 100);
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn test_page_meta() {
        let meta = PageMeta::new(PageRequest::new(Some(2), Some(10), 12, 100), 35);
        assert_eq!(meta.total_pages, 4);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let last = PageMeta::new(PageRequest::new(Some(4), Some(10), 12, 100), 35);
        assert!(!last.has_next);
    }

    #[test]
    fn test_page_meta_empty() {
        let meta = PageMeta::new(PageRequest::default(), 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_page_meta_serialization() {
        let meta = PageMeta::new(PageRequest::default(), 5);
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"totalPages\":1"));
        assert!(json.contains("\"hasNext\":false"));
    }
}
