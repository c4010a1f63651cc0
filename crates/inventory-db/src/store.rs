//! # Inventory Store
//!
//! The single entry point screens use: validation, target dispatch,
//! execution and change notification.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    store.update(Target::Item(1), fields)                │
//! │                                                                         │
//! │  1. validate_for_update(fields)   ── ValidationError → return, no I/O  │
//! │  2. fields empty?                 ── return 0, no I/O                   │
//! │  3. database.ready()              ── ensures schema on first use       │
//! │  4. ProductRepository::update     ── UPDATE fruits SET … WHERE id = ?  │
//! │  5. rows > 0 ?                    ── notifier.notify(Target::Item(1))  │
//! │  6. return rows                                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let store = InventoryStore::open(DbConfig::new("inventory.db")).await?;
//!
//! let id = store.insert(&ProductFields::new()
//!     .name("Apple").price_per_kg(3).quantity_kg(10)
//!     .supplier_name("Acme").supplier_phone("555-1234")).await?;
//!
//! store.subscribe(Target::Collection, |n| println!("{} changed", n.target));
//! store.update(Target::Item(id), &ProductFields::new().quantity_kg(9)).await?;
//! ```

use inventory_core::validation::{validate_for_insert, validate_for_update};
use inventory_core::{
    Product, ProductFields, ProductId, Projection, Selection, SortOrder, Target, TargetKind,
};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::cursor::Cursor;
use crate::error::DbResult;
use crate::notify::{ChangeNotifier, Notification, SubscriptionId};
use crate::pool::{Database, DbConfig, DEFAULT_DATABASE_FILE};
use crate::repository::product::{ProductRepository, QuantityAdjustment};

/// Target-addressed product store with change notification.
///
/// Cheap to clone; clones share the pool and the observer registry.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    db: Database,
    notifier: ChangeNotifier,
    cursor_buffer: usize,
}

impl InventoryStore {
    /// Opens the database described by `config` and wraps it in a store.
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        let cursor_buffer = config.cursor_buffer;
        let notify_capacity = config.notify_capacity;
        let db = Database::new(config).await?;
        Ok(InventoryStore {
            db,
            notifier: ChangeNotifier::new(notify_capacity),
            cursor_buffer,
        })
    }

    /// Wraps an existing database handle with the file-database buffer sizes.
    pub fn with_database(db: Database) -> Self {
        let defaults = DbConfig::new(DEFAULT_DATABASE_FILE);
        InventoryStore {
            db,
            notifier: ChangeNotifier::new(defaults.notify_capacity),
            cursor_buffer: defaults.cursor_buffer,
        }
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn repo(&self) -> DbResult<ProductRepository> {
        self.db.ready().await?;
        Ok(self.db.products())
    }

    // =========================================================================
    // Core contract
    // =========================================================================

    /// Queries products.
    ///
    /// Item targets always filter by their id; `selection` only applies to
    /// the collection. Rows come back unordered unless `sort` is given.
    pub async fn query(
        &self,
        target: Target,
        projection: &Projection,
        selection: Option<&Selection>,
        sort: Option<&SortOrder>,
    ) -> DbResult<Cursor> {
        let repo = self.repo().await?;
        Ok(repo.query(target, projection, selection, sort, self.cursor_buffer))
    }

    /// Inserts a product and returns its id.
    ///
    /// ## Errors
    /// * `DbError::Validation` - a required field is missing or a number is negative
    /// * storage errors - the row could not be written
    pub async fn insert(&self, fields: &ProductFields) -> DbResult<ProductId> {
        validate_for_insert(fields)?;

        let id = self.repo().await?.insert(fields).await?;
        info!(id, "Product inserted");

        self.notifier.notify(Target::Collection);
        Ok(id)
    }

    /// Writes the fields present in `fields` to the rows addressed by `target`.
    ///
    /// Returns the number of rows updated. An empty field set returns 0
    /// without touching the database.
    pub async fn update(&self, target: Target, fields: &ProductFields) -> DbResult<u64> {
        validate_for_update(fields)?;

        if fields.is_empty() {
            debug!(%target, "Empty update skipped");
            return Ok(0);
        }

        let rows = self.repo().await?.update(target, fields).await?;
        if rows > 0 {
            self.notifier.notify(target);
        }
        Ok(rows)
    }

    /// Deletes the rows addressed by `target`.
    ///
    /// Deleting an id that does not exist returns 0.
    pub async fn delete(&self, target: Target) -> DbResult<u64> {
        let rows = self.repo().await?.delete(target).await?;
        if rows > 0 {
            info!(%target, rows, "Products deleted");
            self.notifier.notify(target);
        }
        Ok(rows)
    }

    /// Classifies a target.
    pub fn type_of(&self, target: Target) -> TargetKind {
        target.kind()
    }

    /// Classifies a content address.
    ///
    /// ## Errors
    /// * `DbError::UnknownTarget` - the address is not a product address
    pub fn type_of_address(&self, address: &str) -> DbResult<TargetKind> {
        Ok(Target::parse(address)?.kind())
    }

    // =========================================================================
    // Notification
    // =========================================================================

    /// Registers a callback for changes relevant to `target`.
    ///
    /// Callbacks run synchronously on the task that made the write.
    pub fn subscribe<F>(&self, target: Target, observer: F) -> SubscriptionId
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.notifier.subscribe(target, observer)
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Receiver for every notification.
    pub fn changes(&self) -> broadcast::Receiver<Notification> {
        self.notifier.changes()
    }

    // =========================================================================
    // Screen helpers
    // =========================================================================

    /// Adds `delta` kg to a product's stock, stopping at zero.
    ///
    /// Returns the new quantity, or `None` if the product doesn't exist.
    /// Observers are only notified when the stored value changed.
    pub async fn adjust_quantity(&self, id: ProductId, delta: i64) -> DbResult<Option<i64>> {
        let outcome = self.repo().await?.adjust_quantity(id, delta).await?;

        if let Some(QuantityAdjustment { changed: true, .. }) = outcome {
            self.notifier.notify(Target::Item(id));
        }
        Ok(outcome.map(|adj| adj.quantity_kg))
    }

    /// Gets one product.
    pub async fn get(&self, id: ProductId) -> DbResult<Option<Product>> {
        self.repo().await?.get(id).await
    }

    /// Lists every product, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        self.repo().await?.list().await
    }

    /// Counts products.
    pub async fn count(&self) -> DbResult<i64> {
        self.repo().await?.count().await
    }

    /// Drops every product by recreating the table.
    pub async fn reset(&self) -> DbResult<()> {
        self.db.recreate_schema().await?;
        self.notifier.notify(Target::Collection);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use inventory_core::{Column, Record, ValidationError};
    use std::sync::{Arc, Mutex};

    async fn store() -> InventoryStore {
        InventoryStore::open(DbConfig::in_memory()).await.unwrap()
    }

    fn apple() -> ProductFields {
        ProductFields::new()
            .name("Apple")
            .price_per_kg(3)
            .quantity_kg(10)
            .supplier_name("Acme")
            .supplier_phone("555-1234")
    }

    async fn fetch_item(store: &InventoryStore, id: ProductId) -> Vec<Record> {
        store
            .query(Target::Item(id), &Projection::All, None, None)
            .await
            .unwrap()
            .collect()
            .await
            .unwrap()
    }

    fn record_notifications(store: &InventoryStore, target: Target) -> Arc<Mutex<Vec<Target>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(target, move |n| sink.lock().unwrap().push(n.target));
        seen
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let store = store().await;

        let id = store.insert(&apple()).await.unwrap();
        assert_eq!(id, 1);

        let records = fetch_item(&store, id).await;
        assert_eq!(records.len(), 1);
        let product = records[0].clone().into_product().unwrap();
        assert_eq!(ProductFields::from(&product), apple());

        let rows = store
            .update(Target::Item(id), &ProductFields::new().quantity_kg(9))
            .await
            .unwrap();
        assert_eq!(rows, 1);
        let product = store.get(id).await.unwrap().unwrap();
        assert_eq!(product.quantity_kg, 9);
        assert_eq!(product.name, "Apple");
        assert_eq!(product.supplier_phone, "555-1234");

        assert_eq!(store.delete(Target::Item(id)).await.unwrap(), 1);
        assert!(fetch_item(&store, id).await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_missing_fields_leaves_collection_unchanged() {
        let store = store().await;
        store.insert(&apple()).await.unwrap();

        for column in [Column::Name, Column::SupplierName, Column::SupplierPhone] {
            let mut fields = apple();
            match column {
                Column::Name => fields.name = None,
                Column::SupplierName => fields.supplier_name = None,
                _ => fields.supplier_phone = None,
            }

            let err = store.insert(&fields).await.unwrap_err();
            assert!(matches!(
                err,
                DbError::Validation(ValidationError::MissingField { field }) if field == column
            ));
        }

        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_negative_numbers_rejected() {
        let store = store().await;

        let err = store.insert(&apple().price_per_kg(-1)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::InvalidValue { field: Column::PricePerKg })
        ));

        let err = store.insert(&apple().quantity_kg(-3)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::InvalidValue { field: Column::QuantityKg })
        ));

        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = store().await;
        let a = store.insert(&apple()).await.unwrap();
        let b = store.insert(&apple().name("Pear")).await.unwrap();
        store.delete(Target::Item(b)).await.unwrap();
        let c = store.insert(&apple().name("Plum")).await.unwrap();

        assert_ne!(a, b);
        assert!(c > b);
    }

    #[tokio::test]
    async fn test_empty_update_touches_nothing() {
        let store = store().await;
        let id = store.insert(&apple()).await.unwrap();
        let seen = record_notifications(&store, Target::Collection);

        assert_eq!(
            store.update(Target::Item(id), &ProductFields::new()).await.unwrap(),
            0
        );
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_update_needs_no_database() {
        // Never opened: an empty update must not try to connect
        let db = Database::new(DbConfig::new("/nonexistent/dir/inventory.db").lazy(true))
            .await
            .unwrap();
        let store = InventoryStore::with_database(db);

        assert_eq!(
            store.update(Target::Item(1), &ProductFields::new()).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_invalid_update_keeps_stored_value() {
        let store = store().await;
        let id = store.insert(&apple()).await.unwrap();

        let err = store
            .update(Target::Item(id), &ProductFields::new().quantity_kg(-1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::InvalidValue { field: Column::QuantityKg })
        ));
        assert_eq!(store.get(id).await.unwrap().unwrap().quantity_kg, 10);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_id_return_zero() {
        let store = store().await;
        assert_eq!(
            store
                .update(Target::Item(77), &ProductFields::new().name("Ghost"))
                .await
                .unwrap(),
            0
        );
        assert_eq!(store.delete(Target::Item(77)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_notifications() {
        let store = store().await;
        let all = record_notifications(&store, Target::Collection);
        let first = record_notifications(&store, Target::Item(1));

        store.insert(&apple()).await.unwrap();
        store.insert(&apple().name("Pear")).await.unwrap();
        store
            .update(Target::Item(2), &ProductFields::new().quantity_kg(1))
            .await
            .unwrap();
        store
            .update(Target::Item(1), &ProductFields::new().quantity_kg(1))
            .await
            .unwrap();
        // Nothing matched: no notification
        store.delete(Target::Item(9)).await.unwrap();
        store.delete(Target::Item(1)).await.unwrap();

        assert_eq!(
            *all.lock().unwrap(),
            vec![
                Target::Collection,
                Target::Collection,
                Target::Item(2),
                Target::Item(1),
                Target::Item(1),
            ]
        );
        assert_eq!(
            *first.lock().unwrap(),
            vec![
                Target::Collection,
                Target::Collection,
                Target::Item(1),
                Target::Item(1),
            ]
        );
    }

    #[tokio::test]
    async fn test_unsubscribed_observer_is_silent() {
        let store = store().await;
        let seen = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&seen);
        let id = store.subscribe(Target::Collection, move |_| *sink.lock().unwrap() += 1);

        store.insert(&apple()).await.unwrap();
        assert!(store.unsubscribe(id));
        store.insert(&apple()).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_changes_channel() {
        let store = store().await;
        let mut rx = store.changes();

        let id = store.insert(&apple()).await.unwrap();
        store.delete(Target::Item(id)).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().target, Target::Collection);
        assert_eq!(rx.recv().await.unwrap().target, Target::Item(id));
    }

    #[tokio::test]
    async fn test_adjust_quantity() {
        let store = store().await;
        let id = store.insert(&apple().quantity_kg(1)).await.unwrap();
        let seen = record_notifications(&store, Target::Item(id));

        assert_eq!(store.adjust_quantity(id, -1).await.unwrap(), Some(0));
        // Already at zero: no write, no notification
        assert_eq!(store.adjust_quantity(id, -1).await.unwrap(), Some(0));
        assert_eq!(store.adjust_quantity(id, 1).await.unwrap(), Some(1));
        assert_eq!(store.adjust_quantity(404, 1).await.unwrap(), None);

        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_adjust_quantity_at_max_stock() {
        let store = store().await;
        let id = store.insert(&apple().quantity_kg(i64::MAX)).await.unwrap();
        let seen = record_notifications(&store, Target::Item(id));

        assert_eq!(store.adjust_quantity(id, 1).await.unwrap(), Some(i64::MAX));
        assert_eq!(store.get(id).await.unwrap().unwrap().quantity_kg, i64::MAX);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_with_database_uses_file_defaults() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = InventoryStore::with_database(db);
        let defaults = DbConfig::new(DEFAULT_DATABASE_FILE);

        assert_eq!(store.cursor_buffer, defaults.cursor_buffer);

        // Fill the channel to the file default; nothing is lagged
        let mut rx = store.changes();
        for _ in 0..defaults.notify_capacity {
            store.notifier.notify(Target::Collection);
        }
        for _ in 0..defaults.notify_capacity {
            assert_eq!(rx.recv().await.unwrap().target, Target::Collection);
        }
    }

    #[tokio::test]
    async fn test_type_of() {
        let store = store().await;
        assert_eq!(store.type_of(Target::Collection), TargetKind::Collection);
        assert_eq!(store.type_of(Target::Item(3)), TargetKind::Item);
        assert_eq!(
            store
                .type_of_address("content://com.example.inventory/fruits/3")
                .unwrap(),
            TargetKind::Item
        );
        assert!(matches!(
            store.type_of_address("content://com.example.inventory/veggies"),
            Err(DbError::UnknownTarget { .. })
        ));
    }

    #[tokio::test]
    async fn test_projected_query() {
        let store = store().await;
        let id = store.insert(&apple()).await.unwrap();

        let records = store
            .query(
                Target::Item(id),
                &Projection::columns([Column::Id, Column::QuantityKg]),
                None,
                None,
            )
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(id));
        assert_eq!(records[0].quantity_kg, Some(10));
        assert_eq!(records[0].name, None);
    }

    #[tokio::test]
    async fn test_lazy_store_creates_schema_on_first_use() {
        let store = InventoryStore::open(DbConfig::in_memory().lazy(true))
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(store.insert(&apple()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears_products() {
        let store = store().await;
        store.insert(&apple()).await.unwrap();
        let seen = record_notifications(&store, Target::Collection);

        store.reset().await.unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(*seen.lock().unwrap(), vec![Target::Collection]);
    }

    #[tokio::test]
    async fn test_clones_share_observers() {
        let store = store().await;
        let seen = record_notifications(&store, Target::Collection);

        let other = store.clone();
        other.insert(&apple()).await.unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
