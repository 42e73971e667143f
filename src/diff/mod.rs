//! Cell-by-cell comparison of canonical workbooks.
//!
//! Sheets pair by identical name, numeric columns by identical normalized
//! name, and rows through a [`RowPairing`] strategy. Every paired cell whose
//! values differ yields one [`DiscrepancyRecord`]; there is no tolerance.

mod pairing;

pub use pairing::{PositionalPairing, RowPairing};

use crate::model::{CanonicalTable, CanonicalWorkbook, ColumnName, DiscrepancyRecord};
use tracing::{info, warn};

/// Numeric columns present in both tables, as (index in first, index in
/// second, name) in the first table's order.
pub fn paired_columns<'a>(
    first: &'a CanonicalTable,
    second: &CanonicalTable,
) -> Vec<(usize, usize, &'a ColumnName)> {
    first
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| second.column_index(name).map(|other| (idx, other, name)))
        .collect()
}

/// Compare two tables of the same name.
pub fn diff_tables(
    first: &CanonicalTable,
    second: &CanonicalTable,
    pairing: &dyn RowPairing,
) -> Vec<DiscrepancyRecord> {
    let columns = paired_columns(first, second);
    let mut records = Vec::new();

    for (idx, row) in first.rows().iter().enumerate() {
        let Some(other) = pairing.pair(idx, row, second) else {
            continue;
        };

        for &(a, b, name) in &columns {
            let (Some(&value1), Some(&value2)) = (row.values.get(a), other.values.get(b)) else {
                continue;
            };
            if value1 != value2 {
                records.push(DiscrepancyRecord::new(first.name(), name, row, value1, value2));
            }
        }
    }

    records
}

/// Compare every table of `first` with its namesake in `second`.
///
/// Records come out in discovery order: tables of `first` in workbook
/// order, rows in order, columns in order within a row. Tables only one
/// side has are skipped.
///
/// # Example
///
/// ```
/// use xlcompare::diff::{diff_workbooks, PositionalPairing};
/// use xlcompare::model::CanonicalWorkbook;
///
/// let a = CanonicalWorkbook::new("a");
/// let b = CanonicalWorkbook::new("b");
/// assert!(diff_workbooks(&a, &b, &PositionalPairing).is_empty());
/// ```
pub fn diff_workbooks(
    first: &CanonicalWorkbook,
    second: &CanonicalWorkbook,
    pairing: &dyn RowPairing,
) -> Vec<DiscrepancyRecord> {
    let mut records = Vec::new();

    for table in first.tables() {
        match second.table(table.name()) {
            Some(other) => records.extend(diff_tables(table, other, pairing)),
            None => warn!(
                sheet = %table.name(),
                source = %second.source,
                "sheet has no counterpart, skipped"
            ),
        }
    }

    info!(
        first = %first.source,
        second = %second.source,
        pairing = pairing.name(),
        differences = records.len(),
        "compared workbooks"
    );

    records
}
