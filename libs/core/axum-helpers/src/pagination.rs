//! Shared pagination types for list endpoints.
//!
//! Pages are zero-based. Every paginated endpoint accepts the same
//! query parameters and returns the same envelope, so clients can page
//! through any collection with one implementation.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default page size when the client does not specify one
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Upper bound on requested page size
pub const MAX_PAGE_SIZE: u64 = 100;

/// Sort direction for paginated queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Query parameters accepted by every paginated endpoint.
///
/// All fields are optional; see [`PageRequest::page`] and friends for
/// the effective values.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Zero-based page index (default 0)
    pub page: Option<u64>,
    /// Page size (default 20, capped at 100)
    pub size: Option<u64>,
    /// Field to sort by (default "id"; unknown fields fall back to "id")
    pub sort: Option<String>,
    /// Sort direction (default ascending)
    pub direction: Option<SortDirection>,
}

impl PageRequest {
    /// Effective zero-based page index
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(0)
    }

    /// Effective page size, clamped to `1..=MAX_PAGE_SIZE`
    pub fn size(&self) -> u64 {
        self.size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset for the effective page
    pub fn offset(&self) -> u64 {
        self.page() * self.size()
    }

    /// Requested sort field, or "id" when absent
    pub fn sort(&self) -> &str {
        self.sort.as_deref().unwrap_or("id")
    }

    /// Requested sort direction, or ascending when absent
    pub fn direction(&self) -> SortDirection {
        self.direction.unwrap_or_default()
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    /// Items on this page
    pub content: Vec<T>,
    /// Zero-based index of this page
    pub page: u64,
    /// Requested page size
    pub size: u64,
    /// Total matching items across all pages
    pub total_elements: u64,
    /// Total number of pages
    pub total_pages: u64,
    /// Whether this is the first page
    pub first: bool,
    /// Whether this is the last page
    pub last: bool,
}

impl<T> Page<T> {
    /// Build a page envelope from one page of items and the total count.
    ///
    /// `total_pages` rounds up, and an empty result still reports one
    /// page boundary correctly (`last` is true past the end).
    pub fn new(content: Vec<T>, page: u64, size: u64, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(size.max(1));
        Self {
            first: page == 0,
            last: page + 1 >= total_pages,
            content,
            page,
            size,
            total_elements,
            total_pages,
        }
    }

    /// Map the items of this page, keeping the envelope
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page(), 0);
        assert_eq!(req.size(), 20);
        assert_eq!(req.offset(), 0);
        assert_eq!(req.sort(), "id");
        assert_eq!(req.direction(), SortDirection::Asc);
    }

    #[test]
    fn test_page_request_size_clamped() {
        let req = PageRequest {
            size: Some(1000),
            ..Default::default()
        };
        assert_eq!(req.size(), MAX_PAGE_SIZE);

        let req = PageRequest {
            size: Some(0),
            ..Default::default()
        };
        assert_eq!(req.size(), 1);
    }

    #[test]
    fn test_page_request_offset() {
        let req = PageRequest {
            page: Some(2),
            size: Some(10),
            ..Default::default()
        };
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn test_page_envelope_rounding() {
        let page = Page::new(vec![1, 2, 3], 0, 10, 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.first);
        assert!(!page.last);

        let last = Page::<i32>::new(vec![], 2, 10, 25);
        assert!(last.last);
        assert!(!last.first);
    }

    #[test]
    fn test_page_envelope_empty() {
        let page = Page::<i32>::new(vec![], 0, 20, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.first);
        assert!(page.last);
    }

    #[test]
    fn test_page_map_keeps_envelope() {
        let page = Page::new(vec![1, 2], 1, 2, 6);
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.content, vec!["1", "2"]);
        assert_eq!(mapped.page, 1);
        assert_eq!(mapped.total_pages, 3);
    }

    #[test]
    fn test_sort_direction_deserialize() {
        let dir: SortDirection = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(dir, SortDirection::Desc);
    }
}
