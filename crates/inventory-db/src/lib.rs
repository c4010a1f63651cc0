//! # inventory-db: Storage for the Fruit Inventory
//!
//! Persistent, target-addressed product storage on a local SQLite file,
//! with change notification for screens that display product data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inventory Data Flow                              │
//! │                                                                         │
//! │  Catalog screen / Editor screen / Details screen                       │
//! │       │  query · insert · update · delete · subscribe                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  inventory-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌───────────────┐   │   │
//! │  │   │ InventoryStore│   │  ProductRepo  │   │   Database    │   │   │
//! │  │   │  (store.rs)   │──►│ (product.rs)  │──►│   (pool.rs)   │   │   │
//! │  │   │               │   │               │   │               │   │   │
//! │  │   │ validation    │   │ runtime SQL   │   │ SqlitePool    │   │   │
//! │  │   │ dispatch      │   │ Cursor        │   │ schema.rs     │   │   │
//! │  │   │ notify.rs     │   │               │   │ user_version  │   │   │
//! │  │   └───────────────┘   └───────────────┘   └───────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 SQLite: inventory.db / fruits                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The public contract: query, insert, update, delete, type_of
//! - [`pool`] - Connection pool creation and configuration
//! - [`schema`] - Table definition and version policy
//! - [`repository`] - SQL for the product table
//! - [`cursor`] - Streaming query results
//! - [`notify`] - Observer registry
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inventory_core::{Projection, SortOrder, Column, Target};
//! use inventory_db::{DbConfig, InventoryStore};
//!
//! let store = InventoryStore::open(DbConfig::from_env()?).await?;
//!
//! let sort = SortOrder::new().asc(Column::Name);
//! let products = store
//!     .query(Target::Collection, &Projection::All, None, Some(&sort))
//!     .await?
//!     .products()
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cursor;
pub mod error;
pub mod notify;
pub mod pool;
pub mod repository;
pub mod schema;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use cursor::Cursor;
pub use error::{DbError, DbResult};
pub use notify::{ChangeNotifier, Notification, Observer, SubscriptionId};
pub use pool::{Database, DbConfig};
pub use store::InventoryStore;

// Repository re-exports for convenience
pub use repository::product::{ProductRepository, QuantityAdjustment};
