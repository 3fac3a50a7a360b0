//! Medication service: list, fetch and write paths.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CreateRequest::Single(payload)       CreateRequest::Batch(payloads)    │
//! │       │                                     │                           │
//! │       ▼ validate_single (", ")              ▼ validate_batch ("; ")     │
//! │       │                                     │  empty → 400, no store    │
//! │       │                                     │  all errors accumulated   │
//! │       ▼                                     ▼                           │
//! │  MedicationDraft ──────► store.insert(&drafts) ◄────── Vec<Draft>       │
//! │                          one transaction                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing reaches the store until every record has passed validation.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use medstock_core::query::{ListParams, RawListParams};
use medstock_core::shape::MedicationListing;
use medstock_core::validation::{validate_batch, validate_single};
use medstock_core::{
    CoreError, CoreResult, CreateRequest, Medication, MedicationDetail, MedicationDraft,
    MedicationId, MedicationPayload,
};
use medstock_db::MedicationStore;

use crate::error::{ApiError, ApiResult};

/// Response body of a successful create.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CreateOutcome {
    /// The inserted record itself.
    Single(Medication),
    /// `{ message, data }` for a batch.
    Batch { message: String, data: Vec<Medication> },
}

/// Response body of a delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteOutcome {
    pub message: String,
}

/// Medication service implementation.
#[derive(Clone)]
pub struct MedicationService {
    store: Arc<dyn MedicationStore>,
}

impl MedicationService {
    /// Create a new medication service.
    pub fn new(store: Arc<dyn MedicationStore>) -> Self {
        MedicationService { store }
    }

    /// Lists medications in the shape selected by the parameters.
    ///
    /// The count runs only when paginating, and before the page fetch.
    pub async fn list(&self, raw: &RawListParams) -> ApiResult<MedicationListing> {
        let params = ListParams::normalize(raw).map_err(|err| {
            warn!(error = %err, "Rejected list parameters");
            ApiError::from(err)
        })?;
        let query = params.to_query();

        let total = match params.page {
            Some(_) => Some(
                self.store
                    .count(query.count_filter())
                    .await
                    .map_err(ApiError::read)?,
            ),
            None => None,
        };

        let rows = self.store.list(&query).await.map_err(ApiError::read)?;

        debug!(
            rows = rows.len(),
            total = ?total,
            search = ?params.search,
            "Listed medications"
        );
        Ok(MedicationListing::shape(&params, rows, total))
    }

    /// Fetches one medication with category and supplier joined.
    ///
    /// An id that is not an integer cannot exist, so it is a 404 as well.
    pub async fn get(&self, id: &str) -> ApiResult<MedicationDetail> {
        let not_found = || ApiError::from(CoreError::MedicationNotFound(id.to_string()));

        let Some(id) = parse_id(id) else {
            return Err(not_found());
        };

        self.store
            .get_detail(id)
            .await
            .map_err(ApiError::read)?
            .ok_or_else(not_found)
    }

    /// Creates one record or a batch.
    pub async fn create(&self, request: CreateRequest) -> ApiResult<CreateOutcome> {
        match request {
            CreateRequest::Single(payload) => {
                let draft = checked_draft(&payload, validate_single(&payload))?;

                let inserted = self
                    .store
                    .insert(std::slice::from_ref(&draft))
                    .await
                    .map_err(ApiError::write)?;
                let row = inserted.into_iter().next().ok_or_else(|| ApiError::Store {
                    status: axum::http::StatusCode::BAD_REQUEST,
                    message: "Insert returned no row".to_string(),
                })?;

                info!(id = row.id, sku = %row.sku, "Medication created");
                Ok(CreateOutcome::Single(row))
            }
            CreateRequest::Batch(payloads) => {
                if let Err(err) = validate_batch(&payloads) {
                    warn!(records = payloads.len(), error = %err, "Rejected medication batch");
                    return Err(err.into());
                }

                let drafts = payloads
                    .iter()
                    .map(MedicationDraft::try_from)
                    .collect::<CoreResult<Vec<_>>>()?;

                let data = self.store.insert(&drafts).await.map_err(ApiError::write)?;

                info!(count = data.len(), "Medication batch created");
                Ok(CreateOutcome::Batch {
                    message: format!("Successfully created {} medications", data.len()),
                    data,
                })
            }
        }
    }

    /// Applies a partial update.
    pub async fn update(&self, id: &str, payload: MedicationPayload) -> ApiResult<Medication> {
        let patch = checked_draft(&payload, validate_single(&payload))?;
        let id = parse_write_id(id)?;

        let row = self
            .store
            .update(id, &patch)
            .await
            .map_err(ApiError::write)?
            .ok_or_else(|| ApiError::from(CoreError::MedicationNotFound(id.to_string())))?;

        info!(id = row.id, "Medication updated");
        Ok(row)
    }

    /// Deletes a medication. Unknown ids succeed.
    pub async fn delete(&self, id: &str) -> ApiResult<DeleteOutcome> {
        let id = parse_write_id(id)?;

        self.store.delete(id).await.map_err(ApiError::write)?;

        info!(id = id, "Medication deleted");
        Ok(DeleteOutcome {
            message: "Deleted successfully".to_string(),
        })
    }
}

fn parse_id(raw: &str) -> Option<MedicationId> {
    raw.trim().parse().ok()
}

fn parse_write_id(raw: &str) -> ApiResult<MedicationId> {
    parse_id(raw).ok_or_else(|| ApiError::ClientInput(format!("Invalid medication id: {}", raw)))
}

/// Turns a validated payload into a draft, logging rejections.
fn checked_draft(
    payload: &MedicationPayload,
    validation: CoreResult<()>,
) -> ApiResult<MedicationDraft> {
    validation
        .and_then(|()| MedicationDraft::try_from(payload))
        .map_err(|err| {
            warn!(error = %err, "Rejected medication payload");
            ApiError::from(err)
        })
}
