//! # Medication Repository
//!
//! SQLite implementation of [`MedicationStore`].
//!
//! ## Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list / count                                                           │
//! │    SELECT ... FROM medications                                          │
//! │    [WHERE name_search LIKE '%term%']   ← both sides case-folded         │
//! │    ORDER BY id [LIMIT n OFFSET m]      ← count never takes the window   │
//! │                                                                         │
//! │  get_detail                                                             │
//! │    medications m                                                        │
//! │    LEFT JOIN categories c ON c.id = m.category_id                       │
//! │    LEFT JOIN suppliers  s ON s.id = m.supplier_id                       │
//! │                                                                         │
//! │  category_names / supplier_names                                        │
//! │    INNER JOIN  ← rows with an unresolved reference drop out             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `price` and `quantity` are REAL columns, but SQLite will keep a text value
//! written into them as text. Reads cast them back to REAL, and the
//! `quantities` scan hands the raw cell to the caller.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::store::MedicationStore;
use medstock_core::query::{search_key, MedicationFilter, MedicationQuery};
use medstock_core::{
    CategoryRef, Medication, MedicationDetail, MedicationDraft, MedicationId, SupplierRef,
};

/// Columns of a list row, in `Medication` field order.
const MEDICATION_COLUMNS: &str = "id, sku, name, description, \
     CAST(price AS REAL) AS price, CAST(quantity AS REAL) AS quantity, \
     category_id, supplier_id";

/// Repository for medication rows.
///
/// ## Usage
/// ```rust,ignore
/// let store = SqliteMedicationStore::new(pool);
/// let page = store.list(&params.to_query()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteMedicationStore {
    pool: SqlitePool,
}

impl SqliteMedicationStore {
    /// Creates a new SqliteMedicationStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteMedicationStore { pool }
    }

    async fn fetch_row(&self, id: MedicationId) -> DbResult<Option<Medication>> {
        let sql = format!("SELECT {} FROM medications WHERE id = ?1", MEDICATION_COLUMNS);
        let row = sqlx::query_as::<_, Medication>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn joined_names(&self, table: &str, column: &str) -> DbResult<Vec<String>> {
        let sql = format!(
            "SELECT j.name FROM medications m INNER JOIN {table} j ON j.id = m.{column} ORDER BY m.id"
        );
        let names = sqlx::query_scalar::<_, String>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(table = %table, rows = names.len(), "Fetched report group keys");
        Ok(names)
    }
}

// =============================================================================
// Column Values
// =============================================================================

/// A typed value for one written column.
enum Cell {
    Text(String),
    Real(f64),
    Integer(i64),
}

/// The columns a draft writes, in table order. Absent fields are skipped.
fn draft_cells(draft: &MedicationDraft) -> Vec<(&'static str, Cell)> {
    let mut cells = Vec::new();

    if let Some(sku) = &draft.sku {
        cells.push(("sku", Cell::Text(sku.clone())));
    }
    if let Some(name) = &draft.name {
        cells.push(("name", Cell::Text(name.clone())));
        cells.push(("name_search", Cell::Text(search_key(name))));
    }
    if let Some(description) = &draft.description {
        cells.push(("description", Cell::Text(description.clone())));
    }
    if let Some(price) = draft.price {
        cells.push(("price", Cell::Real(price)));
    }
    if let Some(quantity) = draft.quantity {
        cells.push(("quantity", Cell::Real(quantity)));
    }
    if let Some(category_id) = draft.category_id {
        cells.push(("category_id", Cell::Integer(category_id)));
    }
    if let Some(supplier_id) = draft.supplier_id {
        cells.push(("supplier_id", Cell::Integer(supplier_id)));
    }

    cells
}

fn push_cell(qb: &mut QueryBuilder<'_, Sqlite>, cell: Cell) {
    match cell {
        Cell::Text(value) => {
            qb.push_bind(value);
        }
        Cell::Real(value) => {
            qb.push_bind(value);
        }
        Cell::Integer(value) => {
            qb.push_bind(value);
        }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &MedicationFilter) {
    if let Some(pattern) = filter.like_pattern() {
        qb.push(" WHERE name_search LIKE ").push_bind(pattern);
    }
}

fn insert_statement(draft: &MedicationDraft) -> QueryBuilder<'static, Sqlite> {
    let cells = draft_cells(draft);
    let mut qb = QueryBuilder::new("INSERT INTO medications ");

    if cells.is_empty() {
        qb.push("DEFAULT VALUES");
    } else {
        let columns: Vec<&str> = cells.iter().map(|(column, _)| *column).collect();
        qb.push("(").push(columns.join(", ")).push(") VALUES (");
        for (i, (_, cell)) in cells.into_iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            push_cell(&mut qb, cell);
        }
        qb.push(")");
    }

    qb.push(" RETURNING ").push(MEDICATION_COLUMNS);
    qb
}

// =============================================================================
// Row Mapping
// =============================================================================

fn detail_from_row(row: &SqliteRow) -> Result<MedicationDetail, sqlx::Error> {
    let categories = match row.try_get::<Option<i64>, _>("category_ref_id")? {
        Some(id) => Some(CategoryRef {
            id,
            name: row.try_get("category_name")?,
        }),
        None => None,
    };

    let suppliers = match row.try_get::<Option<i64>, _>("supplier_ref_id")? {
        Some(id) => Some(SupplierRef {
            id,
            name: row.try_get("supplier_name")?,
            email: row.try_get("supplier_email")?,
            phone: row.try_get("supplier_phone")?,
        }),
        None => None,
    };

    Ok(MedicationDetail {
        id: row.try_get("id")?,
        sku: row.try_get("sku")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        quantity: row.try_get("quantity")?,
        categories,
        suppliers,
    })
}

/// Converts a `(typeof(quantity), CAST(quantity AS TEXT))` pair to JSON.
fn quantity_cell(kind: &str, raw: Option<String>) -> Value {
    let Some(raw) = raw else {
        return Value::Null;
    };

    match kind {
        "integer" => match raw.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(raw),
        },
        "real" => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::String(raw)),
        _ => Value::String(raw),
    }
}

// =============================================================================
// MedicationStore
// =============================================================================

#[async_trait]
impl MedicationStore for SqliteMedicationStore {
    async fn count(&self, filter: &MedicationFilter) -> DbResult<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM medications");
        push_filter(&mut qb, filter);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;

        debug!(search = ?filter.name_contains, count = count, "Counted medications");
        Ok(count as u64)
    }

    async fn list(&self, query: &MedicationQuery) -> DbResult<Vec<Medication>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM medications",
            MEDICATION_COLUMNS
        ));
        push_filter(&mut qb, &query.filter);
        qb.push(" ORDER BY id");

        if let Some(window) = query.window {
            qb.push(" LIMIT ")
                .push_bind(i64::from(window.limit))
                .push(" OFFSET ")
                .push_bind(window.offset as i64);
        }

        let rows = qb.build_query_as::<Medication>().fetch_all(&self.pool).await?;

        debug!(
            search = ?query.filter.name_contains,
            window = ?query.window,
            rows = rows.len(),
            "Listed medications"
        );
        Ok(rows)
    }

    async fn get_detail(&self, id: MedicationId) -> DbResult<Option<MedicationDetail>> {
        debug!(id = id, "Fetching medication detail");

        let row = sqlx::query(
            r#"
            SELECT
                m.id,
                m.sku,
                m.name,
                m.description,
                CAST(m.price AS REAL) AS price,
                CAST(m.quantity AS REAL) AS quantity,
                c.id AS category_ref_id,
                c.name AS category_name,
                s.id AS supplier_ref_id,
                s.name AS supplier_name,
                s.email AS supplier_email,
                s.phone AS supplier_phone
            FROM medications m
            LEFT JOIN categories c ON c.id = m.category_id
            LEFT JOIN suppliers s ON s.id = m.supplier_id
            WHERE m.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(detail_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, drafts: &[MedicationDraft]) -> DbResult<Vec<Medication>> {
        debug!(count = drafts.len(), "Inserting medications");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut inserted = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let mut qb = insert_statement(draft);
            // An error drops `tx`, rolling back every row of the batch.
            let row = qb.build_query_as::<Medication>().fetch_one(&mut *tx).await?;
            inserted.push(row);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(count = inserted.len(), "Medications inserted");
        Ok(inserted)
    }

    async fn update(
        &self,
        id: MedicationId,
        patch: &MedicationDraft,
    ) -> DbResult<Option<Medication>> {
        let cells = draft_cells(patch);
        debug!(id = id, columns = cells.len(), "Updating medication");

        if cells.is_empty() {
            return self.fetch_row(id).await;
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE medications SET ");
        for (column, cell) in cells {
            qb.push(column).push(" = ");
            push_cell(&mut qb, cell);
            qb.push(", ");
        }
        qb.push("updated_at = ")
            .push_bind(Utc::now())
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(MEDICATION_COLUMNS);

        let row = qb
            .build_query_as::<Medication>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn delete(&self, id: MedicationId) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM medications WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id = id, deleted = result.rows_affected(), "Deleted medication");
        Ok(())
    }

    async fn category_names(&self) -> DbResult<Vec<String>> {
        self.joined_names("categories", "category_id").await
    }

    async fn supplier_names(&self) -> DbResult<Vec<String>> {
        self.joined_names("suppliers", "supplier_id").await
    }

    async fn quantities(&self) -> DbResult<Vec<Value>> {
        let rows = sqlx::query_as::<_, (String, Option<String>)>(
            "SELECT typeof(quantity), CAST(quantity AS TEXT) FROM medications",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(kind, raw)| quantity_cell(&kind, raw))
            .collect())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
