//
//  ebay-sdk
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for eBay API Responses
//!
//! This module provides the pagination state shared by every paged operation
//! and the two traits that let the [`Paginator`](crate::api::Paginator) drive
//! an operation without knowing its schema.
//!
//! # Overview
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`PaginationState`] | Page number, page size and (once known) totals |
//! | [`PagedRequest`] | Builds a fresh request for a given page number |
//! | [`PagedResponse`] | Reads the pagination state out of a payload |
//!
//! # Page-numbered vs offset APIs
//!
//! **XML families** (Finding, Trading) use 1-based page numbers:
//! - `paginationInput.pageNumber` / `Pagination.PageNumber` selects a page
//! - `paginationOutput.totalPages` / `PaginationResult.TotalNumberOfPages` reports the total
//!
//! **REST families** (Browse) use `offset` and `limit`:
//! - Page `n` is `offset = (n - 1) * limit`
//! - `total` divided by `limit` gives the page count
//!
//! Both are normalized into [`PaginationState`] so the driver only ever
//! deals with page numbers.
//!
//! # Example
//!
//! ```rust
//! use ebay_sdk::api::common::PaginationState;
//!
//! let state = PaginationState::from_offset(20, 10, Some(45));
//!
//! assert_eq!(state.page_number, 3);
//! assert_eq!(state.total_pages, Some(5));
//! assert_eq!(state.page_limit(20), 5);
//! ```

use serde::{Deserialize, Serialize};

/// Pagination state of one page of results.
///
/// `total_entries` and `total_pages` are unknown until a response arrives,
/// so both are optional.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `page_number` | `u32` | Current page (1-based) |
/// | `entries_per_page` | `u32` | Requested page size |
/// | `total_entries` | `Option<u64>` | Total matching entries, once known |
/// | `total_pages` | `Option<u32>` | Total pages, once known |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    /// Current page number (1-based).
    pub page_number: u32,

    /// Number of entries requested per page.
    pub entries_per_page: u32,

    /// Total number of entries across all pages.
    #[serde(default)]
    pub total_entries: Option<u64>,

    /// Total number of pages.
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl PaginationState {
    /// Creates the state for a page that has not been fetched yet.
    pub fn new(page_number: u32, entries_per_page: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            entries_per_page,
            total_entries: None,
            total_pages: None,
        }
    }

    /// Builds the state from an offset/limit pair as used by REST APIs.
    ///
    /// # Parameters
    ///
    /// * `offset` - Zero-based index of the first entry on the page
    /// * `limit` - Page size
    /// * `total` - Total entries reported by the API, if any
    ///
    /// # Returns
    ///
    /// A state whose page number is `offset / limit + 1` and whose page
    /// count is derived from `total`. A zero `limit` yields a single page.
    pub fn from_offset(offset: u64, limit: u32, total: Option<u64>) -> Self {
        if limit == 0 {
            return Self {
                page_number: 1,
                entries_per_page: 0,
                total_entries: total,
                total_pages: Some(1),
            };
        }

        let page_number = u32::try_from(offset / u64::from(limit) + 1).unwrap_or(u32::MAX);
        let total_pages = total.map(|t| {
            let pages = t.div_ceil(u64::from(limit));
            u32::try_from(pages).unwrap_or(u32::MAX)
        });

        Self {
            page_number,
            entries_per_page: limit,
            total_entries: total,
            total_pages,
        }
    }

    /// Offset of the first entry on `page`, for a page size `limit`.
    pub fn offset_for(page: u32, limit: u32) -> u64 {
        u64::from(page.saturating_sub(1)) * u64::from(limit)
    }

    /// Returns `true` if pages exist after this one.
    pub fn has_next(&self) -> bool {
        self.total_pages
            .map(|total| self.page_number < total)
            .unwrap_or(false)
    }

    /// Number of pages the driver should visit when capped at `max_pages`.
    ///
    /// Unknown totals count as a single page; a result set with zero pages
    /// still yields the first page that reported it.
    pub fn page_limit(&self, max_pages: u32) -> u32 {
        let total = self.total_pages.unwrap_or(1).max(1);
        total.min(max_pages.max(1))
    }
}

/// A request that can be re-issued for a different page.
///
/// Implementations return a *new* value; the template is never mutated, so
/// concurrently scheduled pages never observe each other's page number.
///
/// # Example
///
/// ```rust
/// use ebay_sdk::api::common::PagedRequest;
///
/// #[derive(Clone)]
/// struct Search {
///     keywords: String,
///     page: u32,
/// }
///
/// impl PagedRequest for Search {
///     fn with_page(&self, page: u32) -> Self {
///         Self { page, ..self.clone() }
///     }
/// }
///
/// let template = Search { keywords: "drone".into(), page: 1 };
/// let second = template.with_page(2);
///
/// assert_eq!(template.page, 1);
/// assert_eq!(second.page, 2);
/// ```
pub trait PagedRequest: Clone {
    /// Returns a copy of this request targeting `page` (1-based).
    fn with_page(&self, page: u32) -> Self;
}

/// A response payload that reports its pagination state.
pub trait PagedResponse {
    /// Returns the pagination state, or `None` if the payload omitted it.
    fn pagination(&self) -> Option<PaginationState>;
}
