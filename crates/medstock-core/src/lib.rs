//! # medstock-core: Pure Business Logic for MedStock
//!
//! This crate holds the data-access rules of the medication inventory
//! service as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MedStock Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front-end client                             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    /medications, /reports, /health                              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ medstock-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌───────────────┐   │   │
//! │  │  │validation │ │   query   │ │   shape   │ │   aggregate   │   │   │
//! │  │  │ numeric + │ │ page/limit│ │ Plain     │ │ by category   │   │   │
//! │  │  │ required  │ │ name      │ │ Searched  │ │ by supplier   │   │   │
//! │  │  │ fields    │ │ window    │ │ Paginated │ │ total qty     │   │   │
//! │  │  └───────────┘ └───────────┘ └───────────┘ └───────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  medstock-db (Store Layer)                      │   │
//! │  │            MedicationStore trait, SQLite implementation         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Medication, MedicationDraft, report payloads)
//! - [`error`] - Domain error types
//! - [`validation`] - Numeric and required-field validation
//! - [`query`] - Pagination parameter normalisation and query descriptors
//! - [`shape`] - List response shapes and the pagination descriptor
//! - [`aggregate`] - Report folds over raw store rows
//!
//! ## Example Usage
//!
//! ```rust
//! use medstock_core::query::{ListParams, RawListParams};
//!
//! let raw = RawListParams {
//!     page: Some("2".to_string()),
//!     limit: None,
//!     name: Some("aspirin".to_string()),
//! };
//! let params = ListParams::normalize(&raw).unwrap();
//! let query = params.to_query();
//!
//! // Page 2 with the default limit of 10 skips the first ten rows.
//! assert_eq!(query.window.unwrap().offset, 10);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod error;
pub mod query;
pub mod shape;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError, ValidationReport};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page used when only `limit` is supplied.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when only `page` is supplied.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Fields every record of a bulk create must carry (present and non-null).
///
/// Single-record create and update do not apply this check.
pub const REQUIRED_BATCH_FIELDS: [&str; 6] = [
    "sku",
    "name",
    "category_id",
    "supplier_id",
    "price",
    "quantity",
];
