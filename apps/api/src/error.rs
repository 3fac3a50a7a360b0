//! Error types for the MedStock API.
//!
//! ```text
//! CoreError ──┐
//!             ├──► ApiError ──► (status, { "error": ..., "details"?: ... })
//! DbError ────┘
//! ```
//!
//! A store failure carries the status of the path it happened on: 400 for
//! writes, 500 for reads and reports.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use medstock_core::CoreError;
use medstock_db::DbError;

pub type ApiResult<T> = Result<T, ApiError>;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed parameters or body.
    #[error("{0}")]
    ClientInput(String),

    /// Record validation failed; `details` joins every message.
    #[error("Validation failed: {details}")]
    Validation { details: String },

    #[error("{0}")]
    NotFound(String),

    /// Store failure, message passed through unchanged.
    #[error("{message}")]
    Store { status: StatusCode, message: String },
}

impl ApiError {
    /// Store failure on a read or report path.
    pub fn read(err: DbError) -> Self {
        error!(error = %err, "Store read failed");
        ApiError::Store {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }

    /// Store failure on a write path.
    pub fn write(err: DbError) -> Self {
        ApiError::Store {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ClientInput(_) | ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation { details } => json!({
                "error": "Validation failed",
                "details": details,
            }),
            ApiError::ClientInput(message)
            | ApiError::NotFound(message)
            | ApiError::Store { message, .. } => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationFailed { details } => ApiError::Validation { details },
            CoreError::MedicationNotFound(_) => ApiError::NotFound(err.to_string()),
            CoreError::InvalidPage
            | CoreError::InvalidLimit { .. }
            | CoreError::EmptyBatch
            | CoreError::Validation(_) => ApiError::ClientInput(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ClientInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::ClientInput(rejection.body_text())
    }
}
