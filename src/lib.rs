//! # xlcompare
//!
//! Cell-by-cell numeric comparison of two Excel workbooks.
//!
//! Every sheet is canonicalized into a keyed numeric table: a key column
//! and a header row are resolved (asking the user through a [`Prompt`]
//! when the supplied hints do not fit), columns are relabeled
//! `{<letters>} - <caption>`, rows holding non-numeric data are pruned and
//! the rest is coerced to numbers. Sheets, columns and rows of the two
//! workbooks are then paired and every differing value is reported.
//!
//! ## Quick Start
//!
//! ```no_run
//! use xlcompare::{compare_files, CompareOptions, ScriptedPrompt, SheetHints};
//! use xlcompare::render::{write_report, ReportFormat};
//!
//! let options = CompareOptions::new()
//!     .with_first_hints(SheetHints::new("A", "1"))
//!     .with_second_hints(SheetHints::new("A", "1"));
//!
//! // No answers: any prompt cancels the comparison
//! let mut prompt = ScriptedPrompt::default();
//! let records = compare_files("budget.xlsx", "actuals.xlsx", &options, &mut prompt)?;
//!
//! write_report(&records, "COMPARE.csv", ReportFormat::Csv)?;
//! # Ok::<(), xlcompare::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! ```no_run
//! use xlcompare::canonicalize::canonicalize_workbook;
//! use xlcompare::diff::{diff_workbooks, PositionalPairing};
//! use xlcompare::{read_workbook, render, ScriptedPrompt, SheetHints};
//!
//! let mut prompt = ScriptedPrompt::default();
//! let hints = SheetHints::default();
//!
//! let first = canonicalize_workbook(&read_workbook("a.xlsx")?, &hints, &mut prompt)?;
//! let second = canonicalize_workbook(&read_workbook("b.xlsx")?, &hints, &mut prompt)?;
//!
//! let records = render::rank(diff_workbooks(&first, &second, &PositionalPairing));
//! println!("{}", render::to_csv(&records));
//! # Ok::<(), xlcompare::Error>(())
//! ```
//!
//! ## Features
//!
//! - `xlsx` (default): built-in .xlsx decoder

pub mod canonicalize;
pub mod decode;
pub mod diff;
pub mod error;
pub mod input;
pub mod model;
pub mod normalize;
pub mod options;
pub mod prompt;
pub mod render;
pub mod resolve;

#[cfg(feature = "xlsx")]
pub mod container;

#[cfg(feature = "xlsx")]
pub mod detect;

#[cfg(feature = "xlsx")]
pub mod xlsx;

// Re-exports
pub use decode::WorkbookDecoder;
pub use diff::{PositionalPairing, RowPairing};
pub use error::{Error, Result};
pub use model::{
    CanonicalRow, CanonicalTable, CanonicalWorkbook, ColumnKey, ColumnName, DiscrepancyRecord,
    RawCell, RawTable, RawWorkbook,
};
pub use options::{CompareOptions, SheetHints};
pub use prompt::{Prompt, ScriptedPrompt, Validation};

use std::path::Path;

/// Label of a workbook file in prompts and logs: its file stem.
pub fn source_label(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read and decode an .xlsx workbook.
///
/// The file is verified to be a spreadsheet package before it is decoded.
///
/// # Example
///
/// ```no_run
/// let workbook = xlcompare::read_workbook("budget.xlsx")?;
/// println!("{}: {} sheets", workbook.source, workbook.sheets.len());
/// # Ok::<(), xlcompare::Error>(())
/// ```
#[cfg(feature = "xlsx")]
pub fn read_workbook(path: impl AsRef<Path>) -> Result<RawWorkbook> {
    let path = path.as_ref();
    detect::verify_workbook_path(path)?;
    xlsx::XlsxParser::open(path)?.parse()
}

/// Read a workbook file with any decoder.
pub fn read_workbook_with(
    decoder: &dyn WorkbookDecoder,
    path: impl AsRef<Path>,
) -> Result<RawWorkbook> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    decoder.decode(&source_label(path), data)
}

/// Canonicalize two decoded workbooks (the first fully before the second)
/// and diff them. Records come back in discovery order, unranked.
///
/// A cancelled prompt yields [`Error::Aborted`] and no records.
pub fn find_discrepancies(
    first: &RawWorkbook,
    second: &RawWorkbook,
    options: &CompareOptions,
    prompt: &mut dyn Prompt,
) -> Result<Vec<DiscrepancyRecord>> {
    let first = canonicalize::canonicalize_workbook(first, &options.first, prompt)?;
    let second = canonicalize::canonicalize_workbook(second, &options.second, prompt)?;

    Ok(diff::diff_workbooks(&first, &second, &*options.row_pairing))
}

/// Compare two decoded workbooks: [`find_discrepancies`], then
/// [`render::rank`].
pub fn compare_workbooks(
    first: &RawWorkbook,
    second: &RawWorkbook,
    options: &CompareOptions,
    prompt: &mut dyn Prompt,
) -> Result<Vec<DiscrepancyRecord>> {
    find_discrepancies(first, second, options, prompt).map(render::rank)
}

/// Read and compare two .xlsx workbooks.
#[cfg(feature = "xlsx")]
pub fn compare_files(
    first: impl AsRef<Path>,
    second: impl AsRef<Path>,
    options: &CompareOptions,
    prompt: &mut dyn Prompt,
) -> Result<Vec<DiscrepancyRecord>> {
    let first = read_workbook(first)?;
    let second = read_workbook(second)?;
    compare_workbooks(&first, &second, options, prompt)
}
