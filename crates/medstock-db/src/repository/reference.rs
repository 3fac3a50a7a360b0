//! # Reference Repositories
//!
//! Categories and suppliers. The API only reads them through medication
//! joins; these repositories exist to populate them.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use medstock_core::{CategoryRef, SupplierRef};

/// Repository for category rows.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a category and returns it with its id.
    pub async fn insert(&self, name: &str) -> DbResult<CategoryRef> {
        debug!(name = %name, "Inserting category");

        let category = sqlx::query_as::<_, CategoryRef>(
            "INSERT INTO categories (name) VALUES (?1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn list(&self) -> DbResult<Vec<CategoryRef>> {
        let categories =
            sqlx::query_as::<_, CategoryRef>("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }
}

/// Repository for supplier rows.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Inserts a supplier and returns it with its id.
    pub async fn insert(
        &self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> DbResult<SupplierRef> {
        debug!(name = %name, "Inserting supplier");

        let supplier = sqlx::query_as::<_, SupplierRef>(
            r#"
            INSERT INTO suppliers (name, email, phone)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, email, phone
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn list(&self) -> DbResult<Vec<SupplierRef>> {
        let suppliers = sqlx::query_as::<_, SupplierRef>(
            "SELECT id, name, email, phone FROM suppliers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }
}
