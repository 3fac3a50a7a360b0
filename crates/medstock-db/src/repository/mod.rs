//! # Repository Module
//!
//! SQLite repository implementations for MedStock.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service (medstock-api)                                                 │
//! │       │                                                                 │
//! │       │  store.list(&query)                                             │
//! │       ▼                                                                 │
//! │  SqliteMedicationStore  (impl MedicationStore)                          │
//! │  ├── count / list          filter + optional window                     │
//! │  ├── get_detail            LEFT JOIN categories, suppliers              │
//! │  ├── insert / update       QueryBuilder over present columns            │
//! │  └── category_names / ...  INNER JOIN report scans                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SqliteMedicationStore`](medication::SqliteMedicationStore) - Medication CRUD, search and report scans
//! - [`CategoryRepository`](reference::CategoryRepository) - Category rows (seed + fixtures)
//! - [`SupplierRepository`](reference::SupplierRepository) - Supplier rows (seed + fixtures)

pub mod medication;
pub mod reference;
