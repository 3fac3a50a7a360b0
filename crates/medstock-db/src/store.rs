//! # Medication Store
//!
//! The persistence contract the API layer is written against.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  medstock-api services                                                  │
//! │       │  Arc<dyn MedicationStore>   (injected, never a global)          │
//! │       ▼                                                                 │
//! │  MedicationStore ──► SqliteMedicationStore  (repository/medication.rs)  │
//! │                 └──► test decorators        (apps/api/tests)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call is a single independent store operation. Nothing is retried
//! here: an error aborts the calling operation as-is.

use async_trait::async_trait;
use serde_json::Value;

use medstock_core::query::{MedicationFilter, MedicationQuery};
use medstock_core::{Medication, MedicationDetail, MedicationDraft, MedicationId};

use crate::error::DbResult;

/// Persistence operations on medication rows.
#[async_trait]
pub trait MedicationStore: Send + Sync {
    /// Number of rows matching `filter`. Never windowed.
    async fn count(&self, filter: &MedicationFilter) -> DbResult<u64>;

    /// Rows matching the query filter, ordered by id, restricted to the
    /// query window when present.
    async fn list(&self, query: &MedicationQuery) -> DbResult<Vec<Medication>>;

    /// One row with its category and supplier joined, if it exists.
    async fn get_detail(&self, id: MedicationId) -> DbResult<Option<MedicationDetail>>;

    /// Inserts all drafts atomically, returning them with ids assigned.
    async fn insert(&self, drafts: &[MedicationDraft]) -> DbResult<Vec<Medication>>;

    /// Applies a partial update. `None` when no row has this id.
    async fn update(&self, id: MedicationId, patch: &MedicationDraft)
        -> DbResult<Option<Medication>>;

    /// Deletes a row. Deleting a missing id is not an error.
    async fn delete(&self, id: MedicationId) -> DbResult<()>;

    /// One category name per medication whose category resolves.
    async fn category_names(&self) -> DbResult<Vec<String>>;

    /// One supplier name per medication whose supplier resolves.
    async fn supplier_names(&self) -> DbResult<Vec<String>>;

    /// Every row's stored quantity cell, uncoerced.
    async fn quantities(&self) -> DbResult<Vec<Value>>;

    /// True when the store answers a trivial query.
    async fn health_check(&self) -> bool;
}
