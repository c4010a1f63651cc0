//! # Query Descriptions
//!
//! Typed stand-ins for the projection / selection / sort-order arguments a
//! content query takes. The database layer renders them to SQL with `?`
//! placeholders; values are always bound, never spliced into the text.

use serde::{Deserialize, Serialize};

use crate::types::{Column, Value};

// =============================================================================
// Projection
// =============================================================================

/// Which columns a query returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    /// Every column.
    #[default]
    All,
    /// The listed columns. An empty list behaves like `All`.
    Columns(Vec<Column>),
}

impl Projection {
    /// Projection over the given columns.
    pub fn columns(columns: impl IntoIterator<Item = Column>) -> Self {
        Projection::Columns(columns.into_iter().collect())
    }

    /// The columns to select, deduplicated, in the order requested.
    pub fn resolve(&self) -> Vec<Column> {
        match self {
            Projection::All => Column::ALL.to_vec(),
            Projection::Columns(cols) if cols.is_empty() => Column::ALL.to_vec(),
            Projection::Columns(cols) => {
                let mut out: Vec<Column> = Vec::with_capacity(cols.len());
                for col in cols {
                    if !out.contains(col) {
                        out.push(*col);
                    }
                }
                out
            }
        }
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl Op {
    /// SQL spelling of the operator.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Like => "LIKE",
        }
    }
}

/// `column op value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: Column,
    pub op: Op,
    pub value: Value,
}

/// A conjunction of predicates. Empty matches every row.
///
/// ## Example
/// ```rust
/// use inventory_core::{Column, Selection};
///
/// let sel = Selection::new()
///     .eq(Column::SupplierName, "Acme")
///     .gt(Column::QuantityKg, 0);
/// let (sql, values) = sel.to_sql();
/// assert_eq!(sql, "supplier_name = ? AND quantity_kg > ?");
/// assert_eq!(values.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    predicates: Vec<Predicate>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection matching a single product id.
    pub fn by_id(id: i64) -> Self {
        Self::new().eq(Column::Id, id)
    }

    /// Adds a predicate.
    pub fn and(mut self, column: Column, op: Op, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate {
            column,
            op,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, column: Column, value: impl Into<Value>) -> Self {
        self.and(column, Op::Eq, value)
    }

    pub fn ne(self, column: Column, value: impl Into<Value>) -> Self {
        self.and(column, Op::Ne, value)
    }

    pub fn lt(self, column: Column, value: impl Into<Value>) -> Self {
        self.and(column, Op::Lt, value)
    }

    pub fn le(self, column: Column, value: impl Into<Value>) -> Self {
        self.and(column, Op::Le, value)
    }

    pub fn gt(self, column: Column, value: impl Into<Value>) -> Self {
        self.and(column, Op::Gt, value)
    }

    pub fn ge(self, column: Column, value: impl Into<Value>) -> Self {
        self.and(column, Op::Ge, value)
    }

    pub fn like(self, column: Column, pattern: impl Into<String>) -> Self {
        self.and(column, Op::Like, Value::Text(pattern.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Renders the WHERE body (without the keyword) and the values to bind.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let sql = self
            .predicates
            .iter()
            .map(|p| format!("{} {} ?", p.column.as_str(), p.op.as_sql()))
            .collect::<Vec<_>>()
            .join(" AND ");
        let values = self.predicates.iter().map(|p| p.value.clone()).collect();
        (sql, values)
    }
}

// =============================================================================
// Sort Order
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// ORDER BY terms, applied left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    terms: Vec<(Column, Direction)>,
}

impl SortOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asc(mut self, column: Column) -> Self {
        self.terms.push((column, Direction::Asc));
        self
    }

    pub fn desc(mut self, column: Column) -> Self {
        self.terms.push((column, Direction::Desc));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Renders the ORDER BY body (without the keyword).
    pub fn to_sql(&self) -> String {
        self.terms
            .iter()
            .map(|(col, dir)| match dir {
                Direction::Asc => format!("{} ASC", col.as_str()),
                Direction::Desc => format!("{} DESC", col.as_str()),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_resolve() {
        assert_eq!(Projection::All.resolve(), Column::ALL.to_vec());
        assert_eq!(Projection::columns([]).resolve(), Column::ALL.to_vec());
        assert_eq!(
            Projection::columns([Column::QuantityKg, Column::Id, Column::QuantityKg]).resolve(),
            vec![Column::QuantityKg, Column::Id]
        );
    }

    #[test]
    fn test_selection_sql() {
        let (sql, values) = Selection::new().to_sql();
        assert!(sql.is_empty());
        assert!(values.is_empty());

        let (sql, values) = Selection::by_id(4).like(Column::Name, "Ap%").to_sql();
        assert_eq!(sql, "id = ? AND name LIKE ?");
        assert_eq!(values, vec![Value::Integer(4), Value::Text("Ap%".into())]);
    }

    #[test]
    fn test_all_operators() {
        let sel = Selection::new()
            .ne(Column::Name, "x")
            .lt(Column::PricePerKg, 1)
            .le(Column::PricePerKg, 2)
            .ge(Column::QuantityKg, 3);
        let (sql, _) = sel.to_sql();
        assert_eq!(
            sql,
            "name <> ? AND price_per_kg < ? AND price_per_kg <= ? AND quantity_kg >= ?"
        );
    }

    #[test]
    fn test_sort_order_sql() {
        assert!(SortOrder::new().is_empty());
        let order = SortOrder::new().desc(Column::PricePerKg).asc(Column::Name);
        assert_eq!(order.to_sql(), "price_per_kg DESC, name ASC");
    }
}
