//! Ranking and report output.
//!
//! Records are ranked by sheet name, then by absolute difference with the
//! largest first, and written as CSV or JSON.
//!
//! # Example
//!
//! ```no_run
//! use xlcompare::render::{rank, write_report, ReportFormat};
//! # let records = Vec::new();
//!
//! let ranked = rank(records);
//! write_report(&ranked, "COMPARE.csv", ReportFormat::Csv)?;
//! # Ok::<(), xlcompare::Error>(())
//! ```

mod csv;
mod json;

pub use self::csv::{csv_fields, to_csv, CSV_HEADER, LINE_ENDING};
pub use self::json::{to_json, JsonFormat};

use crate::error::Result;
use crate::model::DiscrepancyRecord;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use tracing::info;

/// Report file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Quoted comma-separated values
    #[default]
    Csv,
    /// Pretty-printed JSON array
    Json,
}

impl ReportFormat {
    /// File extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

/// Report ordering: sheet name ascending, then absolute difference descending.
pub fn compare_records(a: &DiscrepancyRecord, b: &DiscrepancyRecord) -> Ordering {
    a.sheet_name()
        .cmp(b.sheet_name())
        .then_with(|| b.absolute_difference().total_cmp(&a.absolute_difference()))
}

/// Sort records into report order. Ties keep their discovery order.
pub fn rank(mut records: Vec<DiscrepancyRecord>) -> Vec<DiscrepancyRecord> {
    records.sort_by(compare_records);
    records
}

/// Render records in the given format.
pub fn render(records: &[DiscrepancyRecord], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Csv => Ok(to_csv(records)),
        ReportFormat::Json => to_json(records, JsonFormat::Pretty),
    }
}

/// Write records to `path`.
///
/// Nothing is written when there are no records; the return value tells
/// whether a file was produced.
pub fn write_report(
    records: &[DiscrepancyRecord],
    path: impl AsRef<Path>,
    format: ReportFormat,
) -> Result<bool> {
    if records.is_empty() {
        return Ok(false);
    }

    let path = path.as_ref();
    fs::write(path, render(records, format)?)?;
    info!(path = %path.display(), records = records.len(), ?format, "report written");
    Ok(true)
}
