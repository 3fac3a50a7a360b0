//! # MedStock API
//!
//! HTTP server for the medication inventory.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         MedStock API Routes                             │
//! │                                                                         │
//! │  ┌──────────────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │  MedicationService               │  │  ReportService              │  │
//! │  │                                  │  │                             │  │
//! │  │ GET    /medications              │  │ GET /reports/total          │  │
//! │  │ GET    /medications/{id}         │  │ GET /reports/total-quantity │  │
//! │  │ POST   /medications              │  │ GET /reports/by-category    │  │
//! │  │ PUT    /medications/{id}         │  │ GET /reports/by-supplier    │  │
//! │  │ DELETE /medications/{id}         │  │                             │  │
//! │  └──────────────────────────────────┘  └─────────────────────────────┘  │
//! │                                                                         │
//! │  ┌──────────────────────────────────┐                                   │
//! │  │  HealthService   GET /health     │                                   │
//! │  └──────────────────────────────────┘                                   │
//! │                                                                         │
//! │  Every service holds the same Arc<dyn MedicationStore>.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`] for the environment variables read at startup.

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use medstock_db::MedicationStore;

// Re-exports
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};

use crate::services::{HealthService, MedicationService, ReportService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn MedicationStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn MedicationStore>) -> Self {
        AppState { store }
    }

    pub fn medications(&self) -> MedicationService {
        MedicationService::new(self.store.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(self.store.clone())
    }

    pub fn health(&self) -> HealthService {
        HealthService::new(self.store.clone())
    }
}

/// Builds the application router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/medications",
            get(handlers::list_medications).post(handlers::create_medications),
        )
        .route(
            "/medications/{id}",
            get(handlers::get_medication)
                .put(handlers::update_medication)
                .delete(handlers::delete_medication),
        )
        .route("/reports/total", get(handlers::total_report))
        .route("/reports/total-quantity", get(handlers::total_quantity_report))
        .route("/reports/by-category", get(handlers::category_report))
        .route("/reports/by-supplier", get(handlers::supplier_report))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// CORS policy: a single configured origin, or any origin when unset.
pub fn cors_layer(origin: Option<HeaderValue>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    match origin {
        Some(origin) => cors.allow_origin(origin),
        None => cors.allow_origin(Any),
    }
}
