//! # Error Types
//!
//! Domain-specific error types for inventory-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  inventory-core errors (this file)                                     │
//! │  ├── CoreError        - Target resolution + wrapped validation         │
//! │  └── ValidationError  - Field checks on insert/update                  │
//! │                                                                         │
//! │  inventory-db errors (separate crate)                                  │
//! │  └── DbError          - Storage failures (+ the two above)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → Screen message           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation errors are caller-correctable and always raised before the
//! table is touched. `UnknownTarget` is an integration bug and is never
//! retried.

use thiserror::Error;

use crate::types::Column;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The address does not name the product collection or a single product.
    ///
    /// ## When This Occurs
    /// - Wrong scheme or authority
    /// - Unknown path segment
    /// - Non-numeric id after the collection path
    #[error("Unknown target: {address}")]
    UnknownTarget { address: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an UnknownTarget error for the given address.
    pub fn unknown_target(address: impl Into<String>) -> Self {
        CoreError::UnknownTarget {
            address: address.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field validation failures for writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is absent or blank.
    #[error("{field} is required")]
    MissingField { field: Column },

    /// A numeric field holds a value outside its allowed range.
    #[error("{field} must not be negative")]
    InvalidValue { field: Column },
}

impl ValidationError {
    /// The column that failed validation.
    pub fn field(&self) -> Column {
        match self {
            ValidationError::MissingField { field } | ValidationError::InvalidValue { field } => {
                *field
            }
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MissingField {
            field: Column::SupplierPhone,
        };
        assert_eq!(err.to_string(), "supplier_phone is required");

        let err = ValidationError::InvalidValue {
            field: Column::QuantityKg,
        };
        assert_eq!(err.to_string(), "quantity_kg must not be negative");
    }

    #[test]
    fn test_field_accessor() {
        let err = ValidationError::InvalidValue {
            field: Column::PricePerKg,
        };
        assert_eq!(err.field(), Column::PricePerKg);
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MissingField { field: Column::Name };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_unknown_target_message() {
        let err = CoreError::unknown_target("content://elsewhere/things");
        assert_eq!(err.to_string(), "Unknown target: content://elsewhere/things");
    }
}
