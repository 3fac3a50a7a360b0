//! # Validation Module
//!
//! Record validation for medication writes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Passes                                  │
//! │                                                                         │
//! │  Single create / update                                                │
//! │  └── numeric check (price, quantity)     errors joined with ", "       │
//! │                                                                         │
//! │  Bulk create                                                           │
//! │  └── for each record i, in order:                                      │
//! │      ├── required-field check (sku, name, category_id,                 │
//! │      │                         supplier_id, price, quantity)           │
//! │      └── numeric check, prefixed "Medication at index i:"              │
//! │      errors from ALL records accumulated, joined with "; "             │
//! │                                                                         │
//! │  Any error → nothing reaches the store                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Absent vs Invalid
//! A missing key and an explicit `null` are both "absent" and never fail the
//! numeric check. Only a present value that does not coerce to a number ≥ 0
//! does.
//!
//! ## Usage
//! ```rust
//! use medstock_core::validation::validate_single;
//! use medstock_core::MedicationPayload;
//! use serde_json::json;
//!
//! let ok = MedicationPayload::from(json!({ "name": "Aspirin" }));
//! assert!(validate_single(&ok).is_ok());
//!
//! let bad = MedicationPayload::from(json!({ "name": "Aspirin", "price": -5 }));
//! assert!(validate_single(&bad).is_err());
//! ```

use serde_json::Value;

use crate::error::{CoreError, CoreResult, NumericField, ValidationError, ValidationReport};
use crate::types::MedicationPayload;
use crate::REQUIRED_BATCH_FIELDS;

const SINGLE_SEPARATOR: &str = ", ";
const BATCH_SEPARATOR: &str = "; ";

// =============================================================================
// Numeric Coercion
// =============================================================================

/// Coerces a JSON value to a finite number.
///
/// ## Rules
/// - JSON numbers are taken as-is
/// - Strings are trimmed and parsed as a decimal (`"12.5"`, `" 3 "`, `"1e2"`)
/// - Booleans, arrays, objects, `null`, unparsable strings, NaN and infinities
///   yield `None`
/// - The whole trimmed string must parse. A numeric prefix is not enough, so
///   `"12abc"` is rejected rather than read as 12, and `"Infinity"` is
///   rejected rather than read as an unbounded quantity
///
/// ## Example
/// ```rust
/// use medstock_core::validation::coerce_number;
/// use serde_json::json;
///
/// assert_eq!(coerce_number(&json!(10)), Some(10.0));
/// assert_eq!(coerce_number(&json!("2.5")), Some(2.5));
/// assert_eq!(coerce_number(&json!("bad")), None);
/// ```
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

// =============================================================================
// Record Checks
// =============================================================================

/// Checks `price` and `quantity` on one record.
///
/// Absent fields are skipped. `index` is the batch position, if any, and
/// becomes the message prefix.
pub fn check_numeric_fields(payload: &MedicationPayload, index: Option<usize>) -> ValidationReport {
    let mut report = ValidationReport::new();

    for field in [NumericField::Price, NumericField::Quantity] {
        let Some(value) = payload.field(field.key()) else {
            continue;
        };

        match coerce_number(value) {
            Some(n) if n >= 0.0 => {}
            _ => report.push(ValidationError::NotNonNegative { field, index }),
        }
    }

    report
}

/// Checks that every [`REQUIRED_BATCH_FIELDS`] entry is present and non-null.
pub fn check_required_fields(payload: &MedicationPayload, index: usize) -> ValidationReport {
    let mut report = ValidationReport::new();

    for field in REQUIRED_BATCH_FIELDS {
        if !payload.has(field) {
            report.push(ValidationError::MissingField {
                field: field.to_string(),
                index,
            });
        }
    }

    report
}

// =============================================================================
// Write-Path Validators
// =============================================================================

/// Validates a single-record create or a partial update.
///
/// Only the numeric rules apply; required fields are not checked.
pub fn validate_single(payload: &MedicationPayload) -> CoreResult<()> {
    check_numeric_fields(payload, None).into_result(SINGLE_SEPARATOR)
}

/// Validates a whole batch before any record is written.
///
/// ## Rules
/// - The batch must not be empty
/// - Every record runs the required-field check, then the numeric check
/// - Errors from every record are accumulated; there is no short-circuit
///
/// ## Example
/// ```rust
/// use medstock_core::validation::validate_batch;
/// use medstock_core::{CoreError, MedicationPayload};
/// use serde_json::json;
///
/// let batch = vec![MedicationPayload::from(json!({
///     "sku": "A-1", "name": "A", "category_id": 1, "supplier_id": 1,
///     "price": 1, "quantity": -2
/// }))];
///
/// match validate_batch(&batch) {
///     Err(CoreError::ValidationFailed { details }) => {
///         assert_eq!(details, "Medication at index 0: Quantity must be a non-negative number");
///     }
///     other => panic!("{:?}", other),
/// }
/// ```
pub fn validate_batch(payloads: &[MedicationPayload]) -> CoreResult<()> {
    if payloads.is_empty() {
        return Err(CoreError::EmptyBatch);
    }

    let mut report = ValidationReport::new();
    for (index, payload) in payloads.iter().enumerate() {
        report.extend(check_required_fields(payload, index));
        report.extend(check_numeric_fields(payload, Some(index)));
    }

    report.into_result(BATCH_SEPARATOR)
}

// =============================================================================
// Unit Tests
// =============================================================================
