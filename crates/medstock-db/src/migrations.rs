//! Schema migrations embedded from `migrations/sqlite/` at compile time.
//!
//! `001_initial_schema.sql` creates `categories`, `suppliers` and
//! `medications`. `002_name_search.sql` adds the case-folded `name_search`
//! column. New schema changes go in a new numbered file; applied files are
//! checksummed by sqlx and must not be edited.

use medstock_core::query::search_key;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations. Already-applied ones are skipped.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;

    let refolded = refold_search_keys(pool).await?;
    info!(
        migrations = MIGRATOR.migrations.len(),
        refolded, "Schema up to date"
    );
    Ok(())
}

/// Rewrites `name_search` for names holding characters outside printable
/// ASCII, which SQLite's `lower()` leaves unfolded.
async fn refold_search_keys(pool: &SqlitePool) -> DbResult<u64> {
    let rows: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, name FROM medications WHERE name GLOB '*[^ -~]*'")
            .fetch_all(pool)
            .await?;

    let mut refolded = 0;
    for (id, name) in rows {
        refolded += sqlx::query(
            "UPDATE medications SET name_search = ?1 WHERE id = ?2 AND name_search IS NOT ?1",
        )
        .bind(search_key(&name))
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    }

    Ok(refolded)
}
