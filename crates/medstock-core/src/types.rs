//! # Domain Types
//!
//! Core domain types used throughout MedStock.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INBOUND                               OUTBOUND                         │
//! │  ┌──────────────────────┐              ┌──────────────────────┐         │
//! │  │  CreateRequest       │              │  Medication          │         │
//! │  │  ├── Single(payload) │              │  (list rows)         │         │
//! │  │  └── Batch(payloads) │              ├──────────────────────┤         │
//! │  ├──────────────────────┤  validate    │  MedicationDetail    │         │
//! │  │  MedicationPayload   │ ──────────►  │  + categories        │         │
//! │  │  (untyped JSON obj)  │  then        │  + suppliers         │         │
//! │  ├──────────────────────┤  convert     ├──────────────────────┤         │
//! │  │  MedicationDraft     │              │  *Report             │         │
//! │  │  (typed, all Option) │              │  (+ timestamp)       │         │
//! │  └──────────────────────┘              └──────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Medications are keyed by a store-assigned integer `id`. The `sku` is the
//! business identifier and is not unique-checked here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::validation::coerce_number;

/// Store-assigned medication identifier.
pub type MedicationId = i64;

/// Largest magnitude an f64 holds with every integer below it exact.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Writes a whole number as a JSON integer (`30`, not `30.0`). Fractional and
/// non-finite values are written as floats.
pub fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

// =============================================================================
// Medication
// =============================================================================

/// A medication row as returned by list and write operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Medication {
    /// Store-assigned identifier.
    pub id: MedicationId,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name, searched by the list endpoint.
    pub name: String,

    pub description: Option<String>,

    /// Unit price, never negative once validated.
    #[serde(serialize_with = "serialize_number")]
    pub price: f64,

    /// Units in stock, never negative once validated.
    #[serde(serialize_with = "serialize_number")]
    pub quantity: f64,

    pub category_id: Option<i64>,

    pub supplier_id: Option<i64>,
}

// =============================================================================
// Referenced Entities
// =============================================================================

/// Category joined into a medication detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

/// Supplier joined into a medication detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SupplierRef {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A single medication with its category and supplier resolved.
///
/// The joined objects keep the plural keys `categories` / `suppliers`; they
/// are `null` when the reference does not resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicationDetail {
    pub id: MedicationId,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "serialize_number")]
    pub price: f64,
    #[serde(serialize_with = "serialize_number")]
    pub quantity: f64,
    pub categories: Option<CategoryRef>,
    pub suppliers: Option<SupplierRef>,
}

// =============================================================================
// Inbound Payloads
// =============================================================================

/// A candidate record exactly as the client sent it.
///
/// Kept untyped until validated so that a missing or `null` field can be
/// told apart from a field carrying an invalid value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicationPayload(Map<String, Value>);

impl MedicationPayload {
    pub fn new(fields: Map<String, Value>) -> Self {
        MedicationPayload(fields)
    }

    /// Returns the field value, treating `null` the same as a missing key.
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self.0.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// True when the key is present with a non-null value.
    pub fn has(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Value> for MedicationPayload {
    /// Non-object values become an empty payload.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => MedicationPayload(map),
            _ => MedicationPayload::default(),
        }
    }
}

/// Body of `POST /medications`: one record or an ordered batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CreateRequest {
    Batch(Vec<MedicationPayload>),
    Single(MedicationPayload),
}

// =============================================================================
// Medication Draft
// =============================================================================

/// A validated payload converted to store column types.
///
/// Every field is optional: inserts leave absent columns to store defaults,
/// updates leave them untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicationDraft {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
}

impl MedicationDraft {
    /// True when no column would be written.
    pub fn is_empty(&self) -> bool {
        self == &MedicationDraft::default()
    }
}

impl TryFrom<&MedicationPayload> for MedicationDraft {
    type Error = crate::error::CoreError;

    fn try_from(payload: &MedicationPayload) -> CoreResult<Self> {
        Ok(MedicationDraft {
            sku: string_field(payload, "sku")?,
            name: string_field(payload, "name")?,
            description: string_field(payload, "description")?,
            price: number_field(payload, "price")?,
            quantity: number_field(payload, "quantity")?,
            category_id: id_field(payload, "category_id")?,
            supplier_id: id_field(payload, "supplier_id")?,
        })
    }
}

fn string_field(payload: &MedicationPayload, key: &str) -> CoreResult<Option<String>> {
    match payload.field(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid_format(key, "must be a string")),
    }
}

fn number_field(payload: &MedicationPayload, key: &str) -> CoreResult<Option<f64>> {
    match payload.field(key) {
        None => Ok(None),
        Some(value) => coerce_number(value)
            .map(Some)
            .ok_or_else(|| invalid_format(key, "must be a number")),
    }
}

fn id_field(payload: &MedicationPayload, key: &str) -> CoreResult<Option<i64>> {
    let parsed = match payload.field(key) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| invalid_format(key, "must be an integer identifier"))
}

fn invalid_format(field: &str, reason: &str) -> crate::error::CoreError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

// =============================================================================
// Reports
// =============================================================================

/// `GET /reports/total`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TotalMedicationsReport {
    pub total_medications: u64,
    pub timestamp: String,
}

/// `GET /reports/total-quantity`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TotalQuantityReport {
    #[serde(serialize_with = "serialize_number")]
    pub total_quantity: f64,
    pub timestamp: String,
}

/// `GET /reports/by-category`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryBreakdownReport {
    pub medications_by_category: BTreeMap<String, u64>,
    pub timestamp: String,
}

/// `GET /reports/by-supplier`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierBreakdownReport {
    pub medications_by_supplier: BTreeMap<String, u64>,
    pub timestamp: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
