// ABOUTME: Offset pagination types shared by list endpoints
// ABOUTME: Computes page counts and SQL offsets from page/limit query params
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints
pub const DEFAULT_PAGE_LIMIT: u32 = 30;

/// Pagination metadata returned alongside a page of results
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    /// Total matching records across all pages
    pub total: i64,
    /// Current page (1-based)
    pub page: u32,
    /// Total number of pages
    pub pages: i64,
}

impl Pagination {
    /// Build pagination metadata from a total count and page parameters
    #[must_use]
    pub fn new(total: i64, page: u32, limit: u32) -> Self {
        let limit = i64::from(limit.max(1));
        Self {
            total,
            page,
            pages: (total + limit - 1) / limit,
        }
    }
}

/// Compute the SQL offset for a 1-based page number
#[must_use]
pub fn offset_for(page: u32, limit: u32) -> i64 {
    i64::from(page.saturating_sub(1)) * i64::from(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(Pagination::new(0, 1, 30).pages, 0);
        assert_eq!(Pagination::new(30, 1, 30).pages, 1);
        assert_eq!(Pagination::new(31, 1, 30).pages, 2);
    }

    #[test]
    fn test_offset() {
        assert_eq!(offset_for(1, 30), 0);
        assert_eq!(offset_for(3, 10), 20);
        assert_eq!(offset_for(0, 10), 0);
    }
}
