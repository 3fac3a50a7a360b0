//! Report service: full-scan aggregates over the medication table.
//!
//! Every report reads the store afresh and is stamped at response time.
//! Any store failure is a 500; reports take no client input.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use medstock_core::aggregate;
use medstock_core::query::MedicationFilter;
use medstock_core::{
    CategoryBreakdownReport, SupplierBreakdownReport, TotalMedicationsReport, TotalQuantityReport,
};
use medstock_db::MedicationStore;

use crate::error::{ApiError, ApiResult};

/// Report service implementation.
#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn MedicationStore>,
}

impl ReportService {
    /// Create a new report service.
    pub fn new(store: Arc<dyn MedicationStore>) -> Self {
        ReportService { store }
    }

    /// Count of all medications; no rows are fetched.
    pub async fn total(&self) -> ApiResult<TotalMedicationsReport> {
        let total = self
            .store
            .count(&MedicationFilter::default())
            .await
            .map_err(ApiError::read)?;

        debug!(total = total, "Total medications report");
        Ok(aggregate::total_medications_report(total, timestamp()))
    }

    /// Sum of every quantity, unparsable cells counting as 0.
    pub async fn total_quantity(&self) -> ApiResult<TotalQuantityReport> {
        let cells = self.store.quantities().await.map_err(ApiError::read)?;

        debug!(rows = cells.len(), "Total quantity report");
        Ok(aggregate::total_quantity_report(&cells, timestamp()))
    }

    /// Medications per resolvable category name.
    pub async fn by_category(&self) -> ApiResult<CategoryBreakdownReport> {
        let names = self.store.category_names().await.map_err(ApiError::read)?;
        Ok(aggregate::category_report(names, timestamp()))
    }

    /// Medications per resolvable supplier name.
    pub async fn by_supplier(&self) -> ApiResult<SupplierBreakdownReport> {
        let names = self.store.supplier_names().await.map_err(ApiError::read)?;
        Ok(aggregate::supplier_report(names, timestamp()))
    }
}

/// ISO-8601 UTC with milliseconds, e.g. `2026-01-01T09:30:00.000Z`.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
