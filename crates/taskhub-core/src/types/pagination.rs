//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Highest page number accepted. Keeps every offset representable as a
/// signed 64-bit SQL `OFFSET`.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request, clamping both values into range.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Build a request from optional query values, substituting the
    /// endpoint's defaults for anything missing or zero.
    pub fn from_query(page: Option<u64>, limit: Option<u64>, default_size: u64) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let size = limit.filter(|l| *l > 0).unwrap_or(default_size);
        Self::new(page, size)
    }

    /// Calculate the SQL `OFFSET` value.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T: Serialize> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages (0 when there are no items).
    pub total_pages: u64,
}

impl<T: Serialize> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages: total_items.div_ceil(request.page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_defaults() {
        let req = PageRequest::from_query(None, None, 5);
        assert_eq!(req, PageRequest { page: 1, page_size: 5 });

        let req = PageRequest::from_query(Some(0), Some(0), 10);
        assert_eq!(req, PageRequest { page: 1, page_size: 10 });
    }

    #[test]
    fn test_page_size_is_clamped() {
        let req = PageRequest::from_query(Some(3), Some(10_000), 10);
        assert_eq!(req.page_size, MAX_PAGE_SIZE);
        assert_eq!(req.offset(), 2 * MAX_PAGE_SIZE);
    }

    #[test]
    fn test_total_pages() {
        let req = PageRequest::new(2, 10);
        let page = PageResponse::new(vec![1, 2, 3], &req, 23);
        assert_eq!(page.total_pages, 3);

        let empty = PageResponse::<u8>::new(Vec::new(), &req, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_huge_page_keeps_offset_in_range() {
        let req = PageRequest::from_query(Some(u64::MAX), Some(MAX_PAGE_SIZE), 10);
        assert_eq!(req.page, MAX_PAGE);
        assert!(i64::try_from(req.offset()).is_ok());
    }
}
