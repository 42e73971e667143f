//! Discrepancy records produced by the differ.

use super::{CanonicalRow, ColumnName};
use serde::Serialize;

/// One numeric mismatch between aligned cells of two workbooks.
///
/// Records are immutable: the differences are computed on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyRecord {
    sheet_name: String,
    column_letter: String,
    row_number: u32,
    column_caption: String,
    row_caption: String,
    value1: f64,
    value2: f64,
    difference: f64,
    absolute_difference: f64,
}

impl DiscrepancyRecord {
    /// Create a record for `column` of the first workbook's `row`.
    pub fn new(
        sheet_name: impl Into<String>,
        column: &ColumnName,
        row: &CanonicalRow,
        value1: f64,
        value2: f64,
    ) -> Self {
        let difference = value1 - value2;
        Self {
            sheet_name: sheet_name.into(),
            column_letter: column.letter().to_string(),
            row_number: row.id,
            column_caption: column.caption().to_string(),
            row_caption: row.key.to_string(),
            value1,
            value2,
            difference,
            absolute_difference: difference.abs(),
        }
    }

    /// Sheet the mismatch was found in.
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Column letters of the mismatching column.
    pub fn column_letter(&self) -> &str {
        &self.column_letter
    }

    /// Identifier of the first workbook's row (its sheet row number).
    pub fn row_number(&self) -> u32 {
        self.row_number
    }

    /// Header caption of the mismatching column.
    pub fn column_caption(&self) -> &str {
        &self.column_caption
    }

    /// Key column value of the row.
    pub fn row_caption(&self) -> &str {
        &self.row_caption
    }

    /// Value in the first workbook.
    pub fn value1(&self) -> f64 {
        self.value1
    }

    /// Value in the second workbook.
    pub fn value2(&self) -> f64 {
        self.value2
    }

    /// `value1 - value2`.
    pub fn difference(&self) -> f64 {
        self.difference
    }

    /// `|value1 - value2|`.
    pub fn absolute_difference(&self) -> f64 {
        self.absolute_difference
    }
}
