//! # medstock-db
//!
//! The medication store: a [`MedicationStore`] trait the API is written
//! against, and its SQLite implementation over a sqlx pool.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  medstock-api services                                                  │
//! │       │  Arc<dyn MedicationStore>                                       │
//! │       ▼                                                                 │
//! │  SqliteMedicationStore ──┐                                              │
//! │  CategoryRepository    ──┼──► Database (SqlitePool) ──► medstock.db     │
//! │  SupplierRepository    ──┘         │                                    │
//! │                                    └── migrations/sqlite/*.sql          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust,ignore
//! use medstock_db::{Database, DbConfig, MedicationStore};
//!
//! let db = Database::new(DbConfig::new("./medstock.db")).await?;
//! let total = db.medications().count(&Default::default()).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::MedicationStore;

pub use repository::medication::SqliteMedicationStore;
pub use repository::reference::{CategoryRepository, SupplierRepository};
