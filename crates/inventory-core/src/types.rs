//! # Domain Types
//!
//! The product record and the shapes used to read and write it.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  ProductFields  │   │     Record      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  name?          │   │  id?            │       │
//! │  │  name           │   │  price_per_kg?  │   │  name?          │       │
//! │  │  price_per_kg   │   │  quantity_kg?   │   │  ...            │       │
//! │  │  quantity_kg    │   │  supplier_*?    │   │  (projected     │       │
//! │  │  supplier_*     │   │  (partial write)│   │   columns only) │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │     Column      │   │      Value      │                             │
//! │  │  SQL name of    │   │  Integer | Text │                             │
//! │  │  each field     │   │  bind parameter │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices and quantities are whole numbers (price per kilogram, stock in
//! kilograms). The supplier phone is free text; formats differ by country.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Identifier assigned by the store on insert. Never reused.
pub type ProductId = i64;

// =============================================================================
// Column
// =============================================================================

/// A column of the `fruits` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Name,
    PricePerKg,
    QuantityKg,
    SupplierName,
    SupplierPhone,
}

impl Column {
    /// Every column, in table order.
    pub const ALL: [Column; 6] = [
        Column::Id,
        Column::Name,
        Column::PricePerKg,
        Column::QuantityKg,
        Column::SupplierName,
        Column::SupplierPhone,
    ];

    /// Columns a caller may write. `id` is assigned by the store.
    pub const WRITABLE: [Column; 5] = [
        Column::Name,
        Column::PricePerKg,
        Column::QuantityKg,
        Column::SupplierName,
        Column::SupplierPhone,
    ];

    /// SQL column name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Name => "name",
            Column::PricePerKg => "price_per_kg",
            Column::QuantityKg => "quantity_kg",
            Column::SupplierName => "supplier_name",
            Column::SupplierPhone => "supplier_phone",
        }
    }

    /// Whether the column stores an integer.
    pub const fn is_integer(&self) -> bool {
        matches!(self, Column::Id | Column::PricePerKg | Column::QuantityKg)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Value
// =============================================================================

/// A scalar bound into a statement, either as an assignment or a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A fruit stocked in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: ProductId,

    /// Display name shown in the list and detail screens.
    pub name: String,

    /// Price per kilogram, in the smallest currency unit.
    pub price_per_kg: i64,

    /// Stock on hand, in kilograms.
    pub quantity_kg: i64,

    /// Supplier the fruit is ordered from.
    pub supplier_name: String,

    /// Supplier phone number, stored as entered.
    pub supplier_phone: String,
}

impl Product {
    /// Whether any stock is left to sell.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.quantity_kg > 0
    }
}

// =============================================================================
// Product Fields (partial write)
// =============================================================================

/// A partial set of writable product fields.
///
/// Used both for inserts (where the validator demands the text fields) and
/// for partial updates (where only the fields present are written).
///
/// ## Example
/// ```rust
/// use inventory_core::{Column, ProductFields};
///
/// let fields = ProductFields::new().quantity_kg(9);
/// let columns: Vec<Column> = fields.assignments().into_iter().map(|(c, _)| c).collect();
/// assert_eq!(columns, vec![Column::QuantityKg]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductFields {
    pub name: Option<String>,
    pub price_per_kg: Option<i64>,
    pub quantity_kg: Option<i64>,
    pub supplier_name: Option<String>,
    pub supplier_phone: Option<String>,
}

impl ProductFields {
    /// Creates an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the product name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the price per kilogram.
    pub fn price_per_kg(mut self, price: i64) -> Self {
        self.price_per_kg = Some(price);
        self
    }

    /// Sets the quantity in kilograms.
    pub fn quantity_kg(mut self, quantity: i64) -> Self {
        self.quantity_kg = Some(quantity);
        self
    }

    /// Sets the supplier name.
    pub fn supplier_name(mut self, supplier: impl Into<String>) -> Self {
        self.supplier_name = Some(supplier.into());
        self
    }

    /// Sets the supplier phone number.
    pub fn supplier_phone(mut self, phone: impl Into<String>) -> Self {
        self.supplier_phone = Some(phone.into());
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of fields set.
    pub fn len(&self) -> usize {
        [
            self.name.is_some(),
            self.price_per_kg.is_some(),
            self.quantity_kg.is_some(),
            self.supplier_name.is_some(),
            self.supplier_phone.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// The fields that are set, as `(column, value)` pairs in table order.
    pub fn assignments(&self) -> Vec<(Column, Value)> {
        let mut out = Vec::with_capacity(self.len());
        if let Some(v) = &self.name {
            out.push((Column::Name, Value::Text(v.clone())));
        }
        if let Some(v) = self.price_per_kg {
            out.push((Column::PricePerKg, Value::Integer(v)));
        }
        if let Some(v) = self.quantity_kg {
            out.push((Column::QuantityKg, Value::Integer(v)));
        }
        if let Some(v) = &self.supplier_name {
            out.push((Column::SupplierName, Value::Text(v.clone())));
        }
        if let Some(v) = &self.supplier_phone {
            out.push((Column::SupplierPhone, Value::Text(v.clone())));
        }
        out
    }
}

impl From<&Product> for ProductFields {
    fn from(p: &Product) -> Self {
        ProductFields {
            name: Some(p.name.clone()),
            price_per_kg: Some(p.price_per_kg),
            quantity_kg: Some(p.quantity_kg),
            supplier_name: Some(p.supplier_name.clone()),
            supplier_phone: Some(p.supplier_phone.clone()),
        }
    }
}

// =============================================================================
// Record (projected row)
// =============================================================================

/// One row returned by a query. Only projected columns are `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: Option<ProductId>,
    pub name: Option<String>,
    pub price_per_kg: Option<i64>,
    pub quantity_kg: Option<i64>,
    pub supplier_name: Option<String>,
    pub supplier_phone: Option<String>,
}

impl Record {
    /// Stores `value` in the slot for `column`.
    ///
    /// Mismatched kinds (text into an integer column or the reverse) are
    /// ignored; the row decoder never produces them.
    pub fn set(&mut self, column: Column, value: Value) {
        match (column, value) {
            (Column::Id, Value::Integer(v)) => self.id = Some(v),
            (Column::Name, Value::Text(v)) => self.name = Some(v),
            (Column::PricePerKg, Value::Integer(v)) => self.price_per_kg = Some(v),
            (Column::QuantityKg, Value::Integer(v)) => self.quantity_kg = Some(v),
            (Column::SupplierName, Value::Text(v)) => self.supplier_name = Some(v),
            (Column::SupplierPhone, Value::Text(v)) => self.supplier_phone = Some(v),
            _ => {}
        }
    }

    /// Converts to a full product if every column was projected.
    pub fn into_product(self) -> Option<Product> {
        Some(Product {
            id: self.id?,
            name: self.name?,
            price_per_kg: self.price_per_kg?,
            quantity_kg: self.quantity_kg?,
            supplier_name: self.supplier_name?,
            supplier_phone: self.supplier_phone?,
        })
    }
}

impl From<Product> for Record {
    fn from(p: Product) -> Self {
        Record {
            id: Some(p.id),
            name: Some(p.name),
            price_per_kg: Some(p.price_per_kg),
            quantity_kg: Some(p.quantity_kg),
            supplier_name: Some(p.supplier_name),
            supplier_phone: Some(p.supplier_phone),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn apple() -> Product {
        Product {
            id: 1,
            name: "Apple".to_string(),
            price_per_kg: 3,
            quantity_kg: 10,
            supplier_name: "Acme".to_string(),
            supplier_phone: "555-1234".to_string(),
        }
    }

    #[test]
    fn test_column_names() {
        assert_eq!(Column::PricePerKg.as_str(), "price_per_kg");
        assert_eq!(Column::SupplierPhone.to_string(), "supplier_phone");
        assert!(Column::QuantityKg.is_integer());
        assert!(!Column::Name.is_integer());
        assert!(!Column::WRITABLE.contains(&Column::Id));
    }

    #[test]
    fn test_fields_builder_and_assignments() {
        let fields = ProductFields::new().supplier_phone("555").name("Pear");
        assert_eq!(fields.len(), 2);

        // Table order regardless of builder order
        let assignments = fields.assignments();
        assert_eq!(assignments[0], (Column::Name, Value::Text("Pear".into())));
        assert_eq!(
            assignments[1],
            (Column::SupplierPhone, Value::Text("555".into()))
        );
    }

    #[test]
    fn test_empty_fields() {
        let fields = ProductFields::new();
        assert!(fields.is_empty());
        assert!(fields.assignments().is_empty());
    }

    #[test]
    fn test_fields_from_product() {
        let fields = ProductFields::from(&apple());
        assert_eq!(fields.len(), 5);
        assert_eq!(fields.quantity_kg, Some(10));
    }

    #[test]
    fn test_record_into_product() {
        let record = Record::from(apple());
        assert_eq!(record.into_product(), Some(apple()));

        let mut partial = Record::default();
        partial.set(Column::Id, Value::Integer(1));
        partial.set(Column::QuantityKg, Value::Integer(4));
        assert_eq!(partial.quantity_kg, Some(4));
        assert_eq!(partial.into_product(), None);
    }

    #[test]
    fn test_record_ignores_mismatched_kind() {
        let mut record = Record::default();
        record.set(Column::Name, Value::Integer(5));
        assert_eq!(record.name, None);
    }

    #[test]
    fn test_in_stock() {
        let mut p = apple();
        assert!(p.in_stock());
        p.quantity_kg = 0;
        assert!(!p.in_stock());
    }

    #[test]
    fn test_product_json_shape() {
        let json = serde_json::to_value(apple()).unwrap();
        assert_eq!(json["price_per_kg"], 3);
        assert_eq!(json["supplier_phone"], "555-1234");
    }
}
