//! HTTP handlers.
//!
//! Each handler extracts, calls one service method and wraps the result.
//! Extractor rejections are turned into 400 `{ "error": ... }` bodies.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use medstock_core::query::RawListParams;
use medstock_core::shape::MedicationListing;
use medstock_core::{
    CategoryBreakdownReport, CreateRequest, Medication, MedicationDetail, MedicationPayload,
    SupplierBreakdownReport, TotalMedicationsReport, TotalQuantityReport,
};

use crate::error::ApiResult;
use crate::services::{CreateOutcome, DeleteOutcome};
use crate::AppState;

// =============================================================================
// Medications
// =============================================================================

/// `GET /medications?name=&page=&limit=`
pub async fn list_medications(
    State(state): State<AppState>,
    query: Result<Query<RawListParams>, QueryRejection>,
) -> ApiResult<Json<MedicationListing>> {
    let Query(raw) = query?;
    Ok(Json(state.medications().list(&raw).await?))
}

/// `GET /medications/{id}`
pub async fn get_medication(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MedicationDetail>> {
    Ok(Json(state.medications().get(&id).await?))
}

/// `POST /medications`
pub async fn create_medications(
    State(state): State<AppState>,
    body: Result<Json<CreateRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateOutcome>)> {
    let Json(request) = body?;
    let outcome = state.medications().create(request).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// `PUT /medications/{id}`
pub async fn update_medication(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<MedicationPayload>, JsonRejection>,
) -> ApiResult<Json<Medication>> {
    let Json(payload) = body?;
    Ok(Json(state.medications().update(&id, payload).await?))
}

/// `DELETE /medications/{id}`
pub async fn delete_medication(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteOutcome>> {
    Ok(Json(state.medications().delete(&id).await?))
}

// =============================================================================
// Reports
// =============================================================================

/// `GET /reports/total`
pub async fn total_report(State(state): State<AppState>) -> ApiResult<Json<TotalMedicationsReport>> {
    Ok(Json(state.reports().total().await?))
}

/// `GET /reports/total-quantity`
pub async fn total_quantity_report(
    State(state): State<AppState>,
) -> ApiResult<Json<TotalQuantityReport>> {
    Ok(Json(state.reports().total_quantity().await?))
}

/// `GET /reports/by-category`
pub async fn category_report(
    State(state): State<AppState>,
) -> ApiResult<Json<CategoryBreakdownReport>> {
    Ok(Json(state.reports().by_category().await?))
}

/// `GET /reports/by-supplier`
pub async fn supplier_report(
    State(state): State<AppState>,
) -> ApiResult<Json<SupplierBreakdownReport>> {
    Ok(Json(state.reports().by_supplier().await?))
}

// =============================================================================
// Health
// =============================================================================

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Response {
    let status = state.health().check().await;
    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status)).into_response()
}
