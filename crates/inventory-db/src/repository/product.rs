//! # Product Repository
//!
//! Target-addressed SQL for the `fruits` table.
//!
//! ## Target Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    WHERE clause by target                               │
//! │                                                                         │
//! │  Target::Item(7)                                                       │
//! │       └──► WHERE id = ?            (caller selection is ignored)       │
//! │                                                                         │
//! │  Target::Collection                                                    │
//! │       ├──► selection given  → WHERE <predicates>                       │
//! │       └──► no selection     → every row                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Column names come from [`Column`]; every value is bound.

use inventory_core::{
    Column, Product, ProductFields, ProductId, Projection, Selection, SortOrder, Target, Value,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::cursor::Cursor;
use crate::error::{DbError, DbResult};
use crate::repository::bind_value;
use crate::schema::TABLE_NAME;

const PRODUCT_COLUMNS: &str = "id, name, price_per_kg, quantity_kg, supplier_name, supplier_phone";

/// Outcome of a quantity adjustment on an existing product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuantityAdjustment {
    /// Stock after the adjustment.
    pub quantity_kg: i64,
    /// False when the adjustment was clamped to no change (already at zero).
    pub changed: bool,
}

/// Repository for product database operations.
///
/// Assumes the schema exists; go through [`crate::InventoryStore`] or call
/// [`crate::Database::ready`] first.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Starts a query and returns a cursor over its rows.
    ///
    /// ## Arguments
    /// * `target` - Collection or one item (item forces `id = ?`)
    /// * `projection` - Columns to return
    /// * `selection` - Extra filter, collection targets only
    /// * `sort` - ORDER BY terms; unordered when absent
    /// * `buffer` - Rows read ahead of the caller
    pub fn query(
        &self,
        target: Target,
        projection: &Projection,
        selection: Option<&Selection>,
        sort: Option<&SortOrder>,
        buffer: usize,
    ) -> Cursor {
        let columns = projection.resolve();
        let column_list = columns
            .iter()
            .map(Column::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let (filter, values) = target_filter(target, selection);
        let mut sql = format!("SELECT {column_list} FROM {TABLE_NAME}{filter}");
        if let Some(sort) = sort.filter(|s| !s.is_empty()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(&sort.to_sql());
        }

        debug!(%target, sql = %sql, "Querying products");
        Cursor::spawn(self.pool.clone(), sql, values, columns, buffer)
    }

    /// Inserts a product and returns its new id.
    ///
    /// Absent price/quantity fall back to the column defaults.
    pub async fn insert(&self, fields: &ProductFields) -> DbResult<ProductId> {
        let assignments = fields.assignments();
        if assignments.is_empty() {
            return Err(DbError::InsertFailed("no fields to insert".to_string()));
        }

        let columns = assignments
            .iter()
            .map(|(c, _)| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; assignments.len()].join(", ");
        let sql = format!("INSERT INTO {TABLE_NAME} ({columns}) VALUES ({placeholders})");

        debug!(name = ?fields.name, "Inserting product");

        let mut query = sqlx::query(&sql);
        for (_, value) in assignments {
            query = bind_value(query, value);
        }
        let result = query.execute(&self.pool).await?;

        let id = result.last_insert_rowid();
        if result.rows_affected() != 1 || id <= 0 {
            return Err(DbError::InsertFailed(format!(
                "engine reported {} rows, row id {id}",
                result.rows_affected()
            )));
        }

        Ok(id)
    }

    /// Writes the fields present in `fields` to every row matching `target`.
    ///
    /// ## Returns
    /// Rows updated; 0 when `fields` is empty (no statement is run).
    pub async fn update(&self, target: Target, fields: &ProductFields) -> DbResult<u64> {
        let assignments = fields.assignments();
        if assignments.is_empty() {
            return Ok(0);
        }

        let set_clause = assignments
            .iter()
            .map(|(c, _)| format!("{} = ?", c.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let (filter, filter_values) = target_filter(target, None);
        let sql = format!("UPDATE {TABLE_NAME} SET {set_clause}{filter}");

        debug!(%target, fields = assignments.len(), "Updating products");

        let mut query = sqlx::query(&sql);
        for value in assignments.into_iter().map(|(_, v)| v).chain(filter_values) {
            query = bind_value(query, value);
        }
        let result = query.execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    /// Deletes every row matching `target`.
    pub async fn delete(&self, target: Target) -> DbResult<u64> {
        let (filter, values) = target_filter(target, None);
        let sql = format!("DELETE FROM {TABLE_NAME}{filter}");

        debug!(%target, "Deleting products");

        let mut query = sqlx::query(&sql);
        for value in values {
            query = bind_value(query, value);
        }
        let result = query.execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    /// Adds `delta` to a product's stock, never going below zero.
    ///
    /// Saturates at `i64::MAX` instead of overflowing.
    ///
    /// ## Returns
    /// * `Ok(Some(adj))` - Product exists; `adj.changed` is false when the
    ///   stock was already at the clamp (e.g. decrement at zero)
    /// * `Ok(None)` - No product with that id
    pub async fn adjust_quantity(
        &self,
        id: ProductId,
        delta: i64,
    ) -> DbResult<Option<QuantityAdjustment>> {
        debug!(id, delta, "Adjusting quantity");

        let mut tx = self.pool.begin().await?;

        // quantity_kg + ?2 past i64::MAX would turn REAL; saturate instead
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE fruits
            SET quantity_kg = CASE
                WHEN ?2 > 0 AND quantity_kg > 9223372036854775807 - ?2 THEN 9223372036854775807
                ELSE MAX(quantity_kg + ?2, 0)
            END
            WHERE id = ?1 AND CASE
                WHEN ?2 > 0 AND quantity_kg > 9223372036854775807 - ?2 THEN 9223372036854775807
                ELSE MAX(quantity_kg + ?2, 0)
            END <> quantity_kg
            RETURNING quantity_kg
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match updated {
            Some(quantity_kg) => Some(QuantityAdjustment {
                quantity_kg,
                changed: true,
            }),
            None => sqlx::query_scalar::<_, i64>("SELECT quantity_kg FROM fruits WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .map(|quantity_kg| QuantityAdjustment {
                    quantity_kg,
                    changed: false,
                }),
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Gets a product by its id.
    pub async fn get(&self, id: ProductId) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM {TABLE_NAME} WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists every product, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM {TABLE_NAME} ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fruits")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// WHERE clause (with leading space) and its bound values for a target.
fn target_filter(target: Target, selection: Option<&Selection>) -> (String, Vec<Value>) {
    match target {
        Target::Item(id) => (" WHERE id = ?".to_string(), vec![Value::Integer(id)]),
        Target::Collection => match selection.filter(|s| !s.is_empty()) {
            Some(selection) => {
                let (sql, values) = selection.to_sql();
                (format!(" WHERE {sql}"), values)
            }
            None => (String::new(), Vec::new()),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
