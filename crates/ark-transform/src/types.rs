//! Typed output of the column typing pass.

use ark_model::{ColumnFormat, ColumnSpec, SheetKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::stats::ColumnStats;

/// One cell after typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypedCell {
    /// Missing or blank in the source.
    Empty,
    /// Pass-through text, or a numeric column value that did not resolve.
    Text(String),
    /// Canonical numeric value; rendered with the column's format.
    Number(Decimal),
}

impl TypedCell {
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            TypedCell::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypedCell::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TypedCell::Empty)
    }
}

/// A declared column with its finalized format and total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedColumn {
    pub spec: ColumnSpec,
    pub format: ColumnFormat,
    /// Sum of parsed values; `None` for unsummed columns or an empty document.
    pub total: Option<Decimal>,
    pub stats: ColumnStats,
}

/// One typed data row, cells in column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedRow {
    pub source_row: usize,
    pub cells: Vec<TypedCell>,
}

/// Typed document ready for layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedTable {
    pub kind: SheetKind,
    pub columns: Vec<TypedColumn>,
    pub rows: Vec<TypedRow>,
}

impl TypedTable {
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.spec.label.matches(label))
    }

    pub fn has_totals(&self) -> bool {
        self.columns.iter().any(|column| column.total.is_some())
    }

    /// Non-empty numeric-column cells that were kept as text.
    pub fn parse_failures(&self) -> usize {
        self.columns.iter().map(|column| column.stats.failed).sum()
    }
}
