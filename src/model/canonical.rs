//! Canonical model: normalized, numeric-coerced tables.

use super::{ColumnName, RawCell};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Name of the synthetic row identifier column.
pub const IDENTIFIER_COLUMN: &str = "UNIQUE_IDENTIFIER";

/// One retained row of a canonical table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    /// Sequential 1-based identifier assigned before pruning
    pub id: u32,
    /// The key column's cell, preserved as read
    pub key: RawCell,
    /// Every other column, coerced to a number, in schema order
    pub values: Vec<f64>,
}

/// A normalized sheet.
///
/// Its schema is the identifier column, the key column, then the numeric
/// columns. Every row carries exactly one value per numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTable {
    name: String,
    key_column: ColumnName,
    columns: Vec<ColumnName>,
    rows: Vec<CanonicalRow>,
}

impl CanonicalTable {
    /// Build a table, checking every row against the numeric schema.
    pub fn new(
        name: impl Into<String>,
        key_column: ColumnName,
        columns: Vec<ColumnName>,
        rows: Vec<CanonicalRow>,
    ) -> Result<Self> {
        let name = name.into();

        if let Some(row) = rows.iter().find(|r| r.values.len() != columns.len()) {
            return Err(Error::InvalidData(format!(
                "row {} of sheet '{}' has {} values for {} numeric columns",
                row.id,
                name,
                row.values.len(),
                columns.len()
            )));
        }

        Ok(Self {
            name,
            key_column,
            columns,
            rows,
        })
    }

    /// Sheet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the key column.
    pub fn key_column(&self) -> &ColumnName {
        &self.key_column
    }

    /// Numeric columns in sheet order.
    pub fn columns(&self) -> &[ColumnName] {
        &self.columns
    }

    /// Retained rows in sheet order.
    pub fn rows(&self) -> &[CanonicalRow] {
        &self.rows
    }

    /// Number of retained rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a numeric column by name.
    pub fn column_index(&self, name: &ColumnName) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of a numeric column in a row.
    pub fn value(&self, row: usize, column: &ColumnName) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.values.get(idx).copied()
    }

    /// Full column schema: identifier, key, then numeric columns.
    pub fn schema(&self) -> Vec<&str> {
        let mut schema = Vec::with_capacity(self.columns.len() + 2);
        schema.push(IDENTIFIER_COLUMN);
        schema.push(self.key_column.as_str());
        schema.extend(self.columns.iter().map(ColumnName::as_str));
        schema
    }
}

/// A workbook whose sheets have all been canonicalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalWorkbook {
    /// Display label of the source workbook
    pub source: String,
    tables: Vec<CanonicalTable>,
}

impl CanonicalWorkbook {
    /// Create an empty workbook.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            tables: Vec::new(),
        }
    }

    /// Add a table.
    pub fn add_table(&mut self, table: CanonicalTable) {
        self.tables.push(table);
    }

    /// Find a table by exact name.
    pub fn table(&self, name: &str) -> Option<&CanonicalTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// All tables in workbook order.
    pub fn tables(&self) -> &[CanonicalTable] {
        &self.tables
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the workbook has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
