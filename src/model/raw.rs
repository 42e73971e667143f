//! Raw workbook model: untyped cells as decoded from a spreadsheet file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single decoded cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum RawCell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Error(String),
}

impl RawCell {
    /// Create a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        RawCell::Text(value.into())
    }

    /// Check if this cell holds nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }

    /// The numeric value of this cell, if it has one.
    ///
    /// Number cells always do; text cells do when their trimmed content
    /// parses as a float.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawCell::Number(value) => Some(*value),
            RawCell::Text(text) => parse_number(text),
            _ => None,
        }
    }

    /// Whether this cell is the literal `null` token (any case).
    pub fn is_null_token(&self) -> bool {
        match self {
            RawCell::Text(text) => text.trim().eq_ignore_ascii_case("null"),
            _ => false,
        }
    }

    /// Whether this cell passes the row validity test.
    pub fn is_numeric_or_null(&self) -> bool {
        self.is_null_token() || self.as_number().is_some()
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Empty => Ok(()),
            RawCell::Text(text) => f.write_str(text),
            RawCell::Number(value) => f.write_str(&format_number(*value)),
            RawCell::Bool(true) => f.write_str("TRUE"),
            RawCell::Bool(false) => f.write_str("FALSE"),
            RawCell::Error(_) => Ok(()),
        }
    }
}

/// Parse text as a float, tolerating surrounding whitespace and `,` group
/// separators in the integral digits (`1,234.5`).
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => without_group_separators(trimmed)?.parse::<f64>().ok(),
    }
}

fn without_group_separators(text: &str) -> Option<String> {
    let (sign, body) = text.split_at(usize::from(text.starts_with(['+', '-'])));
    let (integral, tail) = body.split_at(body.find(['.', 'e', 'E']).unwrap_or(body.len()));

    let well_formed = integral.starts_with(|c: char| c.is_ascii_digit())
        && integral.contains(',')
        && integral.chars().all(|c| c.is_ascii_digit() || c == ',');
    well_formed.then(|| format!("{}{}{}", sign, integral.replace(',', ""), tail))
}

/// Format a number the way reports show it: the shortest digits that read
/// back to the same value, switching to `d.dddE+XX` when the decimal
/// exponent is below -5 or at least 15.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let symbol = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return symbol.to_string();
    }

    let scientific = format!("{:e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    match exponent.parse::<i32>() {
        Ok(exponent) if value != 0.0 && !(-5..15).contains(&exponent) => {
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}E{}{:02}", mantissa, sign, exponent.unsigned_abs())
        }
        _ => value.to_string(),
    }
}

/// A named, rectangular table of raw cells.
///
/// Row 0 is sheet row 1 and column 0 is column `A`. Every row has exactly
/// `column_count` cells; short rows are padded with [`RawCell::Empty`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// Sheet name
    pub name: String,
    rows: Vec<Vec<RawCell>>,
    column_count: usize,
}

impl RawTable {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a table from possibly ragged rows, padding them to the widest.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<RawCell>>) -> Self {
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(column_count, RawCell::Empty);
                row
            })
            .collect();

        Self {
            name: name.into(),
            rows,
            column_count,
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<RawCell>] {
        &self.rows
    }

    /// A row by zero-based index.
    pub fn row(&self, index: usize) -> Option<&[RawCell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// A cell by zero-based row and column.
    pub fn cell(&self, row: usize, column: usize) -> Option<&RawCell> {
        self.rows.get(row)?.get(column)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A decoded workbook: its sheets in workbook order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWorkbook {
    /// Display label of the source, usually the file stem
    pub source: String,
    /// Sheets in workbook order
    pub sheets: Vec<RawTable>,
}

impl RawWorkbook {
    /// Create an empty workbook.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            sheets: Vec::new(),
        }
    }

    /// Add a sheet.
    pub fn add_sheet(&mut self, sheet: RawTable) {
        self.sheets.push(sheet);
    }

    /// Find a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&RawTable> {
        self.sheets.iter().find(|s| s.name == name)
    }
}
