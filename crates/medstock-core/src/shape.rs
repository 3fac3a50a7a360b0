//! # Response Shapes
//!
//! Chooses the list response layout from the parameters that were supplied.
//!
//! ## Three Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  page/limit?  name?   Shape                                            │
//! │  ───────────  ─────   ──────────────────────────────────────────────── │
//! │  yes          yes     { data, pagination, search: { query } }          │
//! │  yes          no      { data, pagination }        (no "search" key)    │
//! │  no           yes     { search: { query, total_results }, data }       │
//! │  no           no      [ ...rows ]                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `total_results` in the searched shape is the number of rows returned,
//! while `total_records` in the paginated shape is the size of the whole
//! filtered set. Both are kept as-is for existing clients.

use serde::Serialize;
use ts_rs::TS;

use crate::query::{ListParams, PageRequest};
use crate::types::Medication;

// =============================================================================
// Pagination Descriptor
// =============================================================================

/// Position of a page within the full filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Pagination {
    pub current_page: u32,
    pub per_page: u32,
    pub total_records: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Derives the descriptor for `page` over `total_records` rows.
    ///
    /// ## Rules
    /// - `total_pages = ceil(total_records / limit)` (0 for an empty set)
    /// - `has_next = page < total_pages`
    /// - `has_prev = page > 1`
    ///
    /// ## Example
    /// ```rust
    /// use medstock_core::query::PageRequest;
    /// use medstock_core::shape::Pagination;
    ///
    /// let p = Pagination::new(PageRequest::new(2, 10).unwrap(), 25);
    /// assert_eq!(p.total_pages, 3);
    /// assert!(p.has_next && p.has_prev);
    /// ```
    pub fn new(page: PageRequest, total_records: u64) -> Self {
        let per_page = u64::from(page.limit);
        let total_pages = total_records.div_ceil(per_page);

        Pagination {
            current_page: page.page,
            per_page: page.limit,
            total_records,
            total_pages,
            has_next: u64::from(page.page) < total_pages,
            has_prev: page.page > 1,
        }
    }
}

// =============================================================================
// Search Blocks
// =============================================================================

/// Search echo attached to a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEcho {
    pub query: String,
}

/// Search summary of an unpaginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub query: String,
    /// Rows in this response.
    pub total_results: usize,
}

// =============================================================================
// Listing
// =============================================================================

/// The body of `GET /medications`, resolved once per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MedicationListing {
    Paginated {
        data: Vec<Medication>,
        pagination: Pagination,
        #[serde(skip_serializing_if = "Option::is_none")]
        search: Option<SearchEcho>,
    },
    Searched {
        search: SearchSummary,
        data: Vec<Medication>,
    },
    Plain(Vec<Medication>),
}

impl MedicationListing {
    /// Shapes fetched rows for the given parameters.
    ///
    /// `total_records` is the count of the full filtered set. It is only
    /// consulted in paginated mode; when missing there, the row count is
    /// used instead.
    pub fn shape(params: &ListParams, data: Vec<Medication>, total_records: Option<u64>) -> Self {
        match (params.page, &params.search) {
            (Some(page), search) => {
                let total = total_records.unwrap_or(data.len() as u64);
                MedicationListing::Paginated {
                    data,
                    pagination: Pagination::new(page, total),
                    search: search.clone().map(|query| SearchEcho { query }),
                }
            }
            (None, Some(query)) => MedicationListing::Searched {
                search: SearchSummary {
                    query: query.clone(),
                    total_results: data.len(),
                },
                data,
            },
            (None, None) => MedicationListing::Plain(data),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
