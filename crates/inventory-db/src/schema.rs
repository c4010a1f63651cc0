//! # Schema
//!
//! DDL for the `fruits` table and the version policy around it.
//!
//! ## Version Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ensure_schema()                                    │
//! │                                                                         │
//! │  Read PRAGMA user_version                                              │
//! │       │                                                                 │
//! │       ├── 0 (fresh file)      → CREATE TABLE, set version              │
//! │       ├── == SCHEMA_VERSION   → CREATE TABLE IF NOT EXISTS             │
//! │       ├── <  SCHEMA_VERSION   → warn!, DROP TABLE, CREATE, set version │
//! │       │                         (ALL PRODUCT DATA IS DISCARDED)        │
//! │       └── >  SCHEMA_VERSION   → SchemaFailed (written by newer build)  │
//! │                                                                         │
//! │  All steps run in one transaction.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There are no incremental migrations. Bumping [`SCHEMA_VERSION`] wipes the
//! table on the next start.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};

/// Name of the product table.
pub const TABLE_NAME: &str = "fruits";

/// Current schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Creates the product table.
///
/// `AUTOINCREMENT` keeps ids from being reused after deletes. Price and
/// quantity default to 1 when an insert leaves them out.
pub const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS fruits (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        name            TEXT    NOT NULL,
        price_per_kg    INTEGER NOT NULL DEFAULT 1,
        quantity_kg     INTEGER NOT NULL DEFAULT 1,
        supplier_name   TEXT    NOT NULL,
        supplier_phone  TEXT    NOT NULL
    )
"#;

/// Drops the product table.
pub const DROP_TABLE: &str = "DROP TABLE IF EXISTS fruits";

/// Brings the database to [`SCHEMA_VERSION`].
pub async fn ensure_schema(pool: &SqlitePool) -> DbResult<()> {
    ensure_schema_at(pool, SCHEMA_VERSION).await
}

/// Brings the database to `version` under the drop-and-recreate policy.
pub(crate) async fn ensure_schema_at(pool: &SqlitePool, version: i64) -> DbResult<()> {
    let mut tx = pool.begin().await?;

    let stored = read_version(&mut tx).await?;
    debug!(stored, current = version, "Checking schema version");

    if stored > version {
        return Err(DbError::SchemaFailed(format!(
            "database is at schema version {stored}, this build supports up to {version}"
        )));
    }

    if stored != 0 && stored < version {
        warn!(
            stored,
            current = version,
            table = TABLE_NAME,
            "Schema upgrade: dropping and recreating table, existing products are discarded"
        );
        sqlx::query(DROP_TABLE).execute(&mut *tx).await?;
    }

    sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;
    write_version(&mut tx, version).await?;

    tx.commit().await?;

    info!(version, "Schema ready");
    Ok(())
}

/// Drops the table and creates it empty at the current version.
pub async fn recreate(pool: &SqlitePool) -> DbResult<()> {
    warn!(table = TABLE_NAME, "Recreating table, all products are discarded");

    let mut tx = pool.begin().await?;
    sqlx::query(DROP_TABLE).execute(&mut *tx).await?;
    sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;
    write_version(&mut tx, SCHEMA_VERSION).await?;
    tx.commit().await?;

    Ok(())
}

/// Returns the stored schema version (0 for a fresh file).
pub async fn schema_version(pool: &SqlitePool) -> DbResult<i64> {
    let mut conn = pool.acquire().await?;
    read_version(&mut conn).await
}

async fn read_version(conn: &mut SqliteConnection) -> DbResult<i64> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(&mut *conn)
        .await?;
    Ok(version)
}

async fn write_version(conn: &mut SqliteConnection, version: i64) -> DbResult<()> {
    // PRAGMA arguments can't be bound; version is an integer we control
    sqlx::query(&format!("PRAGMA user_version = {version}"))
        .execute(&mut *conn)
        .await?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn raw_pool() -> SqlitePool {
        let db = Database::new(DbConfig::in_memory().lazy(true)).await.unwrap();
        db.pool().clone()
    }

    async fn row_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM fruits")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn insert_one(pool: &SqlitePool) {
        sqlx::query("INSERT INTO fruits (name, supplier_name, supplier_phone) VALUES ('a', 'b', 'c')")
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_fresh_database_gets_current_version() {
        let pool = raw_pool().await;
        assert_eq!(schema_version(&pool).await.unwrap(), 0);

        ensure_schema(&pool).await.unwrap();
        assert_eq!(schema_version(&pool).await.unwrap(), SCHEMA_VERSION);
        assert_eq!(row_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent_and_keeps_data() {
        let pool = raw_pool().await;
        ensure_schema(&pool).await.unwrap();
        insert_one(&pool).await;

        ensure_schema(&pool).await.unwrap();
        assert_eq!(row_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_column_defaults() {
        let pool = raw_pool().await;
        ensure_schema(&pool).await.unwrap();
        insert_one(&pool).await;

        let (price, qty): (i64, i64) =
            sqlx::query_as("SELECT price_per_kg, quantity_kg FROM fruits")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!((price, qty), (1, 1));
    }

    #[tokio::test]
    async fn test_newer_version_is_refused() {
        let pool = raw_pool().await;
        ensure_schema(&pool).await.unwrap();
        sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION + 1))
            .execute(&pool)
            .await
            .unwrap();

        let err = ensure_schema(&pool).await.unwrap_err();
        assert!(matches!(err, DbError::SchemaFailed(_)));
    }

    #[tokio::test]
    async fn test_older_version_is_dropped_and_recreated() {
        let pool = raw_pool().await;
        ensure_schema_at(&pool, 1).await.unwrap();
        insert_one(&pool).await;
        insert_one(&pool).await;

        ensure_schema_at(&pool, 2).await.unwrap();

        assert_eq!(row_count(&pool).await, 0);
        assert_eq!(schema_version(&pool).await.unwrap(), 2);

        // Ids restart with the new table
        insert_one(&pool).await;
        let id: i64 = sqlx::query_scalar("SELECT id FROM fruits")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(id, 1);
    }

    #[tokio::test]
    async fn test_recreate_discards_rows() {
        let pool = raw_pool().await;
        ensure_schema(&pool).await.unwrap();
        insert_one(&pool).await;
        insert_one(&pool).await;

        recreate(&pool).await.unwrap();
        assert_eq!(row_count(&pool).await, 0);
        assert_eq!(schema_version(&pool).await.unwrap(), SCHEMA_VERSION);
    }
}
