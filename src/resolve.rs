//! Key column and header row resolution.
//!
//! Each sheet needs a key column (whose values label rows in the report)
//! and a header row (whose values caption the columns). Caller hints are
//! validated against the sheet; when they do not fit, the user is asked
//! for replacements until valid values arrive or the comparison is
//! cancelled.

use crate::error::Result;
use crate::model::{ColumnKey, RawTable};
use crate::options::SheetHints;
use crate::prompt::{prompt_until_valid, Prompt, Validation};
use std::fmt;
use tracing::debug;

/// Validated key column and header row of one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetKeys {
    /// Key column (1-based ordinal via [`ColumnKey::ordinal`])
    pub key_column: ColumnKey,
    /// Zero-based index of the header row
    pub header_row: usize,
}

impl SheetKeys {
    /// Create keys from a column key and a zero-based header row index.
    pub fn new(key_column: ColumnKey, header_row: usize) -> Self {
        Self {
            key_column,
            header_row,
        }
    }

    /// The key column's 1-based ordinal.
    pub fn key_ordinal(&self) -> usize {
        self.key_column.ordinal()
    }
}

/// Why a hint was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintRejection {
    /// Empty or whitespace only.
    Blank,
    /// A column hint containing a digit.
    ContainsDigit,
    /// A column hint with characters other than letters.
    NotLetters,
    /// A row hint with characters other than digits.
    NotDigits,
    /// The hint addresses a column or row the sheet does not have.
    OutOfRange,
}

impl fmt::Display for HintRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            HintRejection::Blank => "value is blank",
            HintRejection::ContainsDigit => "column letters contain a digit",
            HintRejection::NotLetters => "column letters contain a non-letter",
            HintRejection::NotDigits => "row number contains a non-digit",
            HintRejection::OutOfRange => "value is outside the sheet",
        };
        f.write_str(text)
    }
}

/// Whether the text contains any decimal digit.
///
/// Column hints are rejected when this holds, so `"A1"` never reaches the
/// letter decoder.
pub fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

/// Validate a key column hint against a sheet.
pub fn validate_column_hint(hint: &str, table: &RawTable) -> Validation<ColumnKey, HintRejection> {
    let hint = hint.trim();
    if hint.is_empty() {
        return Validation::Invalid(HintRejection::Blank);
    }
    if has_digit(hint) {
        return Validation::Invalid(HintRejection::ContainsDigit);
    }
    let Some(key) = ColumnKey::parse(hint) else {
        return Validation::Invalid(HintRejection::NotLetters);
    };
    if key.ordinal() > table.column_count() {
        return Validation::Invalid(HintRejection::OutOfRange);
    }
    Validation::Valid(key)
}

/// Validate a 1-based header row hint against a sheet.
///
/// A valid hint yields the zero-based row index.
pub fn validate_row_hint(hint: &str, table: &RawTable) -> Validation<usize, HintRejection> {
    let hint = hint.trim();
    if hint.is_empty() {
        return Validation::Invalid(HintRejection::Blank);
    }
    if !hint.chars().all(|c| c.is_ascii_digit()) {
        return Validation::Invalid(HintRejection::NotDigits);
    }
    match hint.parse::<usize>() {
        Ok(row) if row >= 1 && row <= table.row_count() => Validation::Valid(row - 1),
        _ => Validation::Invalid(HintRejection::OutOfRange),
    }
}

fn column_message(source: &str, sheet: &str, rejection: Option<&HintRejection>) -> String {
    format!(
        "{}Provide key COLUMN letter(s) for: '{} | {}', or type eXit to end:",
        if rejection.is_some() {
            "Invalid key COLUMN letters. "
        } else {
            ""
        },
        source,
        sheet
    )
}

fn row_message(source: &str, sheet: &str, rejection: Option<&HintRejection>) -> String {
    format!(
        "{}Provide ROW key index for: '{} | {}', or type eXit to end:",
        if rejection.is_some() { "Invalid ROW. " } else { "" },
        source,
        sheet
    )
}

/// Resolve the key column and header row of a sheet.
///
/// `source` labels the workbook in prompt messages. The column is settled
/// before the row. Typing an abort token at either prompt returns
/// [`Error::Aborted`](crate::Error::Aborted).
pub fn resolve_keys(
    table: &RawTable,
    source: &str,
    hints: &SheetHints,
    prompt: &mut dyn Prompt,
) -> Result<SheetKeys> {
    let key_column = match validate_column_hint(&hints.column_key, table) {
        Validation::Valid(key) => key,
        rejected => {
            debug!(sheet = %table.name, hint = %hints.column_key, ?rejected, "key column hint rejected");
            prompt_until_valid(
                prompt,
                |rejection| column_message(source, &table.name, rejection),
                |answer| validate_column_hint(answer, table),
            )?
        }
    };

    let header_row = match validate_row_hint(&hints.header_row, table) {
        Validation::Valid(row) => row,
        rejected => {
            debug!(sheet = %table.name, hint = %hints.header_row, ?rejected, "header row hint rejected");
            prompt_until_valid(
                prompt,
                |rejection| row_message(source, &table.name, rejection),
                |answer| validate_row_hint(answer, table),
            )?
        }
    };

    debug!(
        sheet = %table.name,
        key_column = %key_column,
        header_row = header_row + 1,
        "resolved sheet keys"
    );

    Ok(SheetKeys::new(key_column, header_row))
}
