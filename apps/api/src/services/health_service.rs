//! Health check service.
//!
//! Provides a liveness probe that also pings the store.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use medstock_db::MedicationStore;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: bool,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.database
    }
}

/// Health service implementation.
#[derive(Clone)]
pub struct HealthService {
    store: Arc<dyn MedicationStore>,
}

impl HealthService {
    /// Create a new health service.
    pub fn new(store: Arc<dyn MedicationStore>) -> Self {
        HealthService { store }
    }

    /// Check database connectivity.
    pub async fn check(&self) -> HealthStatus {
        let database = self.store.health_check().await;
        if !database {
            warn!("Database health check failed");
        }

        HealthStatus {
            status: if database { "ok" } else { "unavailable" },
            database,
        }
    }
}
