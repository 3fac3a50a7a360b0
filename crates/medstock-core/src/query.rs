//! # Query Module
//!
//! Normalises list parameters and builds the store query descriptor.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /medications?name=asp&page=2&limit=5                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RawListParams { page: "2", limit: "5", name: "asp" }                   │
//! │       │                                                                 │
//! │       ▼  ListParams::normalize  ← fails BEFORE any store call           │
//! │  ListParams { search: "asp", page: PageRequest { 2, 5 } }               │
//! │       │                                                                 │
//! │       ▼  to_query                                                       │
//! │  MedicationQuery                                                        │
//! │  ├── filter: name ILIKE %asp%     ──► count (never windowed)            │
//! │  └── window: offset 5, limit 5    ──► list                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pagination Switch
//! Pagination is active as soon as either `page` or `limit` is supplied; the
//! missing one takes its default. With neither, the list is unpaginated.

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};

// =============================================================================
// Raw Parameters
// =============================================================================

/// Query string exactly as received. Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub name: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// =============================================================================
// Normalised Parameters
// =============================================================================

/// A validated page position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page, within `[1, MAX_LIMIT]`.
    pub limit: u32,
}

impl PageRequest {
    /// Validates a page position.
    ///
    /// ## Rules
    /// - `page` ≥ 1
    /// - `limit` within `[1, MAX_LIMIT]`
    pub fn new(page: i64, limit: i64) -> CoreResult<Self> {
        let page = u32::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(CoreError::InvalidPage)?;

        let limit = u32::try_from(limit)
            .ok()
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .ok_or_else(CoreError::invalid_limit)?;

        Ok(PageRequest { page, limit })
    }

    /// Rows skipped before this page: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn window(&self) -> Window {
        Window {
            offset: self.offset(),
            limit: self.limit,
        }
    }
}

/// Normalised list parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Name search term, if any.
    pub search: Option<String>,
    /// Page position; `None` means unpaginated (legacy) mode.
    pub page: Option<PageRequest>,
}

impl ListParams {
    /// Parses and bounds-checks raw list parameters.
    ///
    /// ## Errors
    /// - `CoreError::InvalidPage` - `page` is not an integer ≥ 1
    /// - `CoreError::InvalidLimit` - `limit` is not an integer in `[1, 100]`
    ///
    /// `page` is checked first, matching the order clients see errors in.
    pub fn normalize(raw: &RawListParams) -> CoreResult<Self> {
        let search = non_empty(&raw.name).map(str::to_string);

        let page_raw = non_empty(&raw.page);
        let limit_raw = non_empty(&raw.limit);

        let page = if page_raw.is_none() && limit_raw.is_none() {
            None
        } else {
            let page = match page_raw {
                Some(p) => p.trim().parse::<i64>().map_err(|_| CoreError::InvalidPage)?,
                None => i64::from(DEFAULT_PAGE),
            };
            if page < 1 {
                return Err(CoreError::InvalidPage);
            }

            let limit = match limit_raw {
                Some(l) => l
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| CoreError::invalid_limit())?,
                None => i64::from(DEFAULT_LIMIT),
            };

            Some(PageRequest::new(page, limit)?)
        };

        Ok(ListParams { search, page })
    }

    /// Builds the store query for these parameters.
    pub fn to_query(&self) -> MedicationQuery {
        MedicationQuery {
            filter: MedicationFilter {
                name_contains: self.search.clone(),
            },
            window: self.page.map(|p| p.window()),
        }
    }
}

// =============================================================================
// Query Descriptor
// =============================================================================

/// Folded form of a medication name, stored next to it for searching.
///
/// Search terms are folded the same way, so matching ignores case for every
/// script, not only ASCII.
pub fn search_key(name: &str) -> String {
    name.to_lowercase()
}

/// Row filter shared by the count and the data query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicationFilter {
    /// Case-insensitive substring match on `name`.
    pub name_contains: Option<String>,
}

impl MedicationFilter {
    /// `LIKE` pattern to run against the stored [`search_key`].
    ///
    /// `%` and `_` in the term keep their wildcard meaning.
    pub fn like_pattern(&self) -> Option<String> {
        self.name_contains
            .as_deref()
            .map(|term| format!("%{}%", search_key(term)))
    }
}

/// Contiguous slice of the filtered, id-ordered row set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u32,
}

/// The read operation handed to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicationQuery {
    pub filter: MedicationFilter,
    /// `None` returns every filtered row.
    pub window: Option<Window>,
}

impl MedicationQuery {
    /// The filter the count query uses; the window never applies to it.
    pub fn count_filter(&self) -> &MedicationFilter {
        &self.filter
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
