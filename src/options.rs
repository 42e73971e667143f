//! Compare configuration.

use crate::diff::{PositionalPairing, RowPairing};
use std::sync::Arc;

/// Default key column hint.
pub const DEFAULT_COLUMN_KEY: &str = "A";

/// Default header row hint.
pub const DEFAULT_HEADER_ROW: &str = "3";

/// Caller-supplied hints locating the key column and header row of each
/// sheet in one workbook.
///
/// Hints stay as text: they are validated per sheet and replaced through
/// the prompt when they do not fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetHints {
    /// Key column letters (e.g. `"A"`)
    pub column_key: String,
    /// 1-based header row number (e.g. `"3"`)
    pub header_row: String,
}

impl Default for SheetHints {
    fn default() -> Self {
        Self {
            column_key: DEFAULT_COLUMN_KEY.to_string(),
            header_row: DEFAULT_HEADER_ROW.to_string(),
        }
    }
}

impl SheetHints {
    /// Create hints from a column key and header row.
    pub fn new(column_key: impl Into<String>, header_row: impl Into<String>) -> Self {
        Self {
            column_key: column_key.into(),
            header_row: header_row.into(),
        }
    }

    /// Set the key column hint.
    pub fn with_column_key(mut self, column_key: impl Into<String>) -> Self {
        self.column_key = column_key.into();
        self
    }

    /// Set the header row hint.
    pub fn with_header_row(mut self, header_row: impl Into<String>) -> Self {
        self.header_row = header_row.into();
        self
    }
}

/// Options for comparing two workbooks.
#[derive(Clone)]
pub struct CompareOptions {
    /// Hints for the first workbook
    pub first: SheetHints,

    /// Hints for the second workbook
    pub second: SheetHints,

    /// How rows of matching sheets are paired
    pub row_pairing: Arc<dyn RowPairing + Send + Sync>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            first: SheetHints::default(),
            second: SheetHints::default(),
            row_pairing: Arc::new(PositionalPairing),
        }
    }
}

impl std::fmt::Debug for CompareOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompareOptions")
            .field("first", &self.first)
            .field("second", &self.second)
            .field("row_pairing", &self.row_pairing.name())
            .finish()
    }
}

impl CompareOptions {
    /// Create options with default hints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set hints for the first workbook.
    pub fn with_first_hints(mut self, hints: SheetHints) -> Self {
        self.first = hints;
        self
    }

    /// Set hints for the second workbook.
    pub fn with_second_hints(mut self, hints: SheetHints) -> Self {
        self.second = hints;
        self
    }

    /// Set the row pairing strategy.
    pub fn with_row_pairing(mut self, pairing: impl RowPairing + Send + Sync + 'static) -> Self {
        self.row_pairing = Arc::new(pairing);
        self
    }
}
