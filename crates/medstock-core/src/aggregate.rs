//! # Aggregation
//!
//! Report folds over raw store rows. Every report is a full scan; nothing
//! here is cached or incremental.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store rows (inner-joined group names)     store rows (raw quantity)    │
//! │  ["Analgesic", "Antibiotic", "Analgesic"]  [10, 20, "bad", null]        │
//! │            │                                        │                   │
//! │            ▼ count_by_key                           ▼ total_quantity    │
//! │  { Analgesic: 2, Antibiotic: 1 }                    30                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::{
    CategoryBreakdownReport, SupplierBreakdownReport, TotalMedicationsReport, TotalQuantityReport,
};
use crate::validation::coerce_number;

/// Counts occurrences of each group key.
pub fn count_by_key<I, S>(keys: I) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    keys.into_iter().fold(BTreeMap::new(), |mut acc, key| {
        *acc.entry(key.into()).or_insert(0) += 1;
        acc
    })
}

/// Sums raw quantity cells. Anything that does not coerce to a finite
/// number contributes 0.
pub fn total_quantity<'a, I>(cells: I) -> f64
where
    I: IntoIterator<Item = &'a Value>,
{
    cells
        .into_iter()
        .map(|cell| coerce_number(cell).unwrap_or(0.0))
        .sum()
}

// =============================================================================
// Report Builders
// =============================================================================

pub fn total_medications_report(total: u64, timestamp: String) -> TotalMedicationsReport {
    TotalMedicationsReport {
        total_medications: total,
        timestamp,
    }
}

pub fn total_quantity_report(cells: &[Value], timestamp: String) -> TotalQuantityReport {
    TotalQuantityReport {
        total_quantity: total_quantity(cells),
        timestamp,
    }
}

pub fn category_report(names: Vec<String>, timestamp: String) -> CategoryBreakdownReport {
    CategoryBreakdownReport {
        medications_by_category: count_by_key(names),
        timestamp,
    }
}

pub fn supplier_report(names: Vec<String>, timestamp: String) -> SupplierBreakdownReport {
    SupplierBreakdownReport {
        medications_by_supplier: count_by_key(names),
        timestamp,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
