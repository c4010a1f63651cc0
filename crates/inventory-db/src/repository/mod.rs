//! # Repository Module
//!
//! SQL for the product table, kept in one place.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where SQL Lives                                      │
//! │                                                                         │
//! │  InventoryStore (validation, dispatch, notification)                   │
//! │       │                                                                 │
//! │       │  repo.update(Target::Item(1), &fields)                         │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── query(target, projection, selection, sort)                        │
//! │  ├── insert(fields)                                                    │
//! │  ├── update(target, fields)                                            │
//! │  ├── delete(target)                                                    │
//! │  └── adjust_quantity(id, delta)                                        │
//! │       │                                                                 │
//! │       │  SQL with bound parameters                                     │
//! │       ▼                                                                 │
//! │  SQLite `fruits` table                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The repository does not validate or notify; that is the store's job.

pub mod product;

use inventory_core::Value;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

/// Binds one scalar onto a runtime-built statement.
pub(crate) fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Integer(v) => query.bind(v),
        Value::Text(v) => query.bind(v),
    }
}
