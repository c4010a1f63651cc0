//! # inventory-core: Pure Domain Logic for the Fruit Inventory
//!
//! Everything the store needs to know about a product that does not involve
//! touching the database: the record shape, partial field maps, target
//! addressing, query descriptions and write validation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Fruit Inventory Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Screens (list / detail / editor) - external          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ query / insert / update / delete      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ inventory-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  target   │  │   query   │  │ validation│  │   │
//! │  │   │  Product  │  │  Target   │  │ Selection │  │  insert   │  │   │
//! │  │   │  Fields   │  │  parse    │  │ SortOrder │  │  update   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                inventory-db (Database Layer)                    │   │
//! │  │        SQLite schema, store, change notification                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `Product`, `ProductFields`, `Column`, `Value`, `Record`
//! - [`target`] - `Target` addressing (collection vs single item)
//! - [`query`] - `Projection`, `Selection`, `SortOrder`
//! - [`validation`] - insert/update field checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use inventory_core::{validation, ProductFields, Target};
//!
//! let fields = ProductFields::new()
//!     .name("Apple")
//!     .price_per_kg(3)
//!     .quantity_kg(10)
//!     .supplier_name("Acme")
//!     .supplier_phone("555-1234");
//!
//! assert!(validation::validate_for_insert(&fields).is_ok());
//! assert_eq!(Target::Item(1).to_string(), "content://com.example.inventory/fruits/1");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod query;
pub mod target;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use query::{Direction, Op, Predicate, Projection, Selection, SortOrder};
pub use target::{Target, TargetKind};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Authority part of every content address handled by the store.
pub const CONTENT_AUTHORITY: &str = "com.example.inventory";

/// Path segment naming the product collection.
pub const PATH_FRUITS: &str = "fruits";
