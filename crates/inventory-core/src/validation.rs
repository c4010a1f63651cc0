//! # Validation Module
//!
//! Write-side checks run before the store touches the table.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Editor screen (external)                                     │
//! │  └── Empty-form checks, immediate user feedback                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── insert: text fields required, numbers non-negative                │
//! │  └── update: same checks, only for the fields being written            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL constraints                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checks run in table order and stop at the first violation.

use crate::error::ValidationError;
use crate::types::{Column, ProductFields};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// A required text field: must be present and not blank.
fn require_text(column: Column, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::MissingField { field: column }),
    }
}

/// A numeric field: when present, must be zero or more.
fn check_non_negative(column: Column, value: Option<i64>) -> ValidationResult<()> {
    match value {
        Some(v) if v < 0 => Err(ValidationError::InvalidValue { field: column }),
        _ => Ok(()),
    }
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a field set for insertion.
///
/// ## Rules
/// - `name`, `supplier_name`, `supplier_phone` must be present and not blank
/// - `price_per_kg`, `quantity_kg` may be absent (the column default applies),
///   but must not be negative when present
///
/// ## Example
/// ```rust
/// use inventory_core::{validation::validate_for_insert, Column, ProductFields, ValidationError};
///
/// let fields = ProductFields::new().name("Kiwi").supplier_name("Acme");
/// assert_eq!(
///     validate_for_insert(&fields),
///     Err(ValidationError::MissingField { field: Column::SupplierPhone })
/// );
/// ```
pub fn validate_for_insert(fields: &ProductFields) -> ValidationResult<()> {
    require_text(Column::Name, fields.name.as_deref())?;
    check_non_negative(Column::PricePerKg, fields.price_per_kg)?;
    check_non_negative(Column::QuantityKg, fields.quantity_kg)?;
    require_text(Column::SupplierName, fields.supplier_name.as_deref())?;
    require_text(Column::SupplierPhone, fields.supplier_phone.as_deref())?;
    Ok(())
}

/// Validates a partial update.
///
/// Fields absent from the update are left untouched and are not checked.
/// Present fields follow the same rules as [`validate_for_insert`].
pub fn validate_for_update(fields: &ProductFields) -> ValidationResult<()> {
    if fields.name.is_some() {
        require_text(Column::Name, fields.name.as_deref())?;
    }
    check_non_negative(Column::PricePerKg, fields.price_per_kg)?;
    check_non_negative(Column::QuantityKg, fields.quantity_kg)?;
    if fields.supplier_name.is_some() {
        require_text(Column::SupplierName, fields.supplier_name.as_deref())?;
    }
    if fields.supplier_phone.is_some() {
        require_text(Column::SupplierPhone, fields.supplier_phone.as_deref())?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
