//! This modules defines the common functionality for paging data.

use serde::Serialize;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to display per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

impl PaginationConfig {
    /// Fill in the page number and page size for a request.
    ///
    /// A missing or zero-valued parameter falls back to the configured
    /// default. There is no upper bound on either value.
    pub fn resolve(&self, page: Option<u64>, page_size: Option<u64>) -> (u64, u64) {
        let page = page.filter(|&page| page > 0).unwrap_or(self.default_page);
        let page_size = page_size
            .filter(|&page_size| page_size > 0)
            .unwrap_or(self.default_page_size);

        (page, page_size)
    }
}

/// Describes where a page of rows sits within the full result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// The page number that was returned.
    pub page: u64,
    /// The maximum number of rows per page.
    pub page_size: u64,
    /// How many rows exist across all pages.
    pub total_records: u64,
    /// How many pages the full result set spans. Zero when there are no rows.
    pub total_pages: u64,
}

impl PageInfo {
    /// Describe the page `page` of `total_records` rows split into chunks of `page_size`.
    pub fn new(page: u64, page_size: u64, total_records: u64) -> Self {
        Self {
            page,
            page_size,
            total_records,
            total_pages: total_records.div_ceil(page_size),
        }
    }
}
