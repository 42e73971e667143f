//! Sheet normalization.
//!
//! Turns a raw sheet into a [`CanonicalTable`] through a sequence of
//! passes, each producing a new value from the previous one:
//!
//! 1. capture the header row as column captions,
//! 2. label every column `{<letters>} - <caption>`,
//! 3. number every row from 1 in sheet order,
//! 4. prune rows holding a non-key cell that is neither numeric nor `null`,
//! 5. coerce every non-key cell of the remaining rows to a number.

use crate::error::{Error, Result};
use crate::model::{CanonicalRow, CanonicalTable, ColumnKey, ColumnName, RawCell, RawTable};
use crate::resolve::SheetKeys;
use tracing::debug;

/// A sheet row tagged with its sequential identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberedRow<'a> {
    /// 1-based position of the row in the sheet
    pub id: u32,
    /// The row's cells
    pub cells: &'a [RawCell],
}

/// Read the header row's values as captions, one per column.
pub fn capture_captions(table: &RawTable, header_row: usize) -> Result<Vec<String>> {
    let row = table.row(header_row).ok_or_else(|| {
        Error::InvalidData(format!(
            "header row {} is outside sheet '{}' ({} rows)",
            header_row + 1,
            table.name,
            table.row_count()
        ))
    })?;
    Ok(row.iter().map(RawCell::to_string).collect())
}

/// Build the normalized name of every column from its caption.
pub fn label_columns(captions: &[String]) -> Vec<ColumnName> {
    captions
        .iter()
        .enumerate()
        .filter_map(|(idx, caption)| {
            ColumnKey::from_ordinal(idx + 1).map(|key| ColumnName::new(&key, caption))
        })
        .collect()
}

/// Tag every row with a sequential identifier starting at 1.
pub fn number_rows(table: &RawTable) -> Result<Vec<NumberedRow<'_>>> {
    table
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, cells)| {
            let id = u32::try_from(idx + 1).map_err(|_| {
                Error::InvalidData(format!("sheet '{}' has too many rows", table.name))
            })?;
            Ok(NumberedRow { id, cells })
        })
        .collect()
}

/// Whether every non-key cell is numeric or the `null` token.
///
/// The key column is never examined. Scanning stops at the first failing cell.
pub fn is_valid_row(cells: &[RawCell], key_index: usize) -> bool {
    cells
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != key_index)
        .all(|(_, cell)| cell.is_numeric_or_null())
}

/// Keep only rows passing [`is_valid_row`]. Identifiers are left as they are.
pub fn prune_rows<'a>(rows: &[NumberedRow<'a>], key_index: usize) -> Vec<NumberedRow<'a>> {
    rows.iter()
        .filter(|row| is_valid_row(row.cells, key_index))
        .copied()
        .collect()
}

/// Coerce a cell to a number; anything unparsable (including `null`) is 0.
pub fn coerce_cell(cell: &RawCell) -> f64 {
    cell.as_number().unwrap_or(0.0)
}

/// Split every row into its key cell and its coerced numeric values.
pub fn coerce_rows(rows: &[NumberedRow<'_>], key_index: usize) -> Vec<CanonicalRow> {
    rows.iter()
        .map(|row| CanonicalRow {
            id: row.id,
            key: row.cells.get(key_index).cloned().unwrap_or_default(),
            values: row
                .cells
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != key_index)
                .map(|(_, cell)| coerce_cell(cell))
                .collect(),
        })
        .collect()
}

/// Normalize a raw sheet with resolved keys into a canonical table.
///
/// # Example
///
/// ```
/// use xlcompare::model::{ColumnKey, RawCell, RawTable};
/// use xlcompare::normalize::normalize_sheet;
/// use xlcompare::resolve::SheetKeys;
///
/// let sheet = RawTable::from_rows("Sheet1", vec![
///     vec![RawCell::text("Region"), RawCell::text("Sales")],
///     vec![RawCell::text("North"), RawCell::Number(12.0)],
/// ]);
/// let keys = SheetKeys::new(ColumnKey::parse("A").unwrap(), 0);
///
/// let table = normalize_sheet(&sheet, &keys)?;
/// assert_eq!(table.columns()[0].as_str(), "{B} - Sales");
/// assert_eq!(table.rows()[0].values, vec![12.0]);
/// # Ok::<(), xlcompare::Error>(())
/// ```
pub fn normalize_sheet(table: &RawTable, keys: &SheetKeys) -> Result<CanonicalTable> {
    let key_index = keys.key_column.index();
    if key_index >= table.column_count() {
        return Err(Error::InvalidData(format!(
            "key column {} is outside sheet '{}' ({} columns)",
            keys.key_column,
            table.name,
            table.column_count()
        )));
    }

    let captions = capture_captions(table, keys.header_row)?;
    let mut labels = label_columns(&captions);
    let key_column = labels.remove(key_index);

    let numbered = number_rows(table)?;
    let retained = prune_rows(&numbered, key_index);
    let rows = coerce_rows(&retained, key_index);

    debug!(
        sheet = %table.name,
        rows = numbered.len(),
        retained = rows.len(),
        pruned = numbered.len() - rows.len(),
        "normalized sheet"
    );

    CanonicalTable::new(table.name.clone(), key_column, labels, rows)
}
