//! Service implementations.
//!
//! Services own the orchestration between medstock-core and the injected
//! store; handlers only extract and respond.

pub mod health_service;
pub mod medication_service;
pub mod report_service;

pub use health_service::{HealthService, HealthStatus};
pub use medication_service::{CreateOutcome, DeleteOutcome, MedicationService};
pub use report_service::ReportService;
