//! # Error Types
//!
//! Domain-specific error types for medstock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medstock-core errors (this file)                                      │
//! │  ├── CoreError         - Client input and domain failures              │
//! │  ├── ValidationError   - One failed rule on one record                 │
//! │  └── ValidationReport  - Ordered list of ValidationErrors              │
//! │                                                                         │
//! │  medstock-db errors (separate crate)                                   │
//! │  └── DbError           - Store operation failures                      │
//! │                                                                         │
//! │  HTTP errors (in apps/api)                                             │
//! │  └── ApiError          - What the client sees (status + JSON)          │
//! │                                                                         │
//! │  Flow: ValidationError → ValidationReport → CoreError → ApiError       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Message Format
//! The rendered messages are part of the HTTP contract. Clients match on
//! substrings such as `"Price must be"` and `"Missing required field"`, so
//! the wording below must not drift.

use std::fmt;

use thiserror::Error;

use crate::MAX_LIMIT;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// `page` was supplied but is not an integer ≥ 1.
    #[error("Page must be a positive integer")]
    InvalidPage,

    /// `limit` was supplied but is outside `[1, MAX_LIMIT]`.
    #[error("Limit must be between 1 and {max}")]
    InvalidLimit { max: u32 },

    /// A bulk create carried zero records.
    #[error("Medications array cannot be empty")]
    EmptyBatch,

    /// One or more numeric / required-field rules failed.
    ///
    /// `details` is the joined [`ValidationReport`]: `", "` for single-record
    /// writes, `"; "` for batches.
    #[error("Validation failed: {details}")]
    ValidationFailed { details: String },

    /// Medication cannot be found.
    #[error("Medication not found: {0}")]
    MedicationNotFound(String),

    /// Validation error on a single field (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an `InvalidLimit` error bound to the crate's maximum.
    pub fn invalid_limit() -> Self {
        CoreError::InvalidLimit { max: MAX_LIMIT }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Numeric fields subject to the non-negative rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Price,
    Quantity,
}

impl NumericField {
    /// JSON key carrying this field.
    pub const fn key(self) -> &'static str {
        match self {
            NumericField::Price => "price",
            NumericField::Quantity => "quantity",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericField::Price => write!(f, "Price"),
            NumericField::Quantity => write!(f, "Quantity"),
        }
    }
}

/// Input validation errors.
///
/// `index` is the record's position in a bulk request, `None` for single
/// record writes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required batch field is absent or null.
    #[error("Missing required field '{field}' in medication at index {index}")]
    MissingField { field: String, index: usize },

    /// A numeric field is present but not a number ≥ 0.
    #[error("{}{} must be a non-negative number", index_prefix(.index), .field)]
    NotNonNegative {
        field: NumericField,
        index: Option<usize>,
    },

    /// A field has the wrong JSON type for the store column.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

fn index_prefix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("Medication at index {}: ", i),
        None => String::new(),
    }
}

// =============================================================================
// Validation Report
// =============================================================================

/// Ordered accumulation of validation failures from one validation pass.
///
/// Never persisted; rendered once into a [`CoreError::ValidationFailed`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Renders every error and joins them with `separator`.
    pub fn join(&self, separator: &str) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// `Ok(())` when empty, otherwise a `ValidationFailed` with the joined
    /// messages.
    pub fn into_result(self, separator: &str) -> CoreResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        Err(CoreError::ValidationFailed {
            details: self.join(separator),
        })
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
