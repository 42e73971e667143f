//! XLSX (Excel) workbook decoder.
//!
//! Decodes Office Open XML workbooks into [`RawWorkbook`]s: one rectangular
//! table of untyped cells per sheet, in workbook order.
//!
//! # Example
//!
//! ```no_run
//! use xlcompare::xlsx::XlsxParser;
//!
//! let workbook = XlsxParser::open("budget.xlsx")?.parse()?;
//!
//! for sheet in &workbook.sheets {
//!     println!("{}: {} rows", sheet.name, sheet.row_count());
//! }
//! # Ok::<(), xlcompare::Error>(())
//! ```

mod parser;
mod shared_strings;
mod styles;

#[cfg(test)]
pub(crate) mod fixtures;

pub use parser::XlsxParser;

use crate::decode::WorkbookDecoder;
use crate::error::Result;
use crate::model::RawWorkbook;

/// The built-in [`WorkbookDecoder`] for .xlsx packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxDecoder;

impl WorkbookDecoder for XlsxDecoder {
    fn decode(&self, source: &str, data: Vec<u8>) -> Result<RawWorkbook> {
        XlsxParser::from_bytes(data)?.with_source(source).parse()
    }
}
