//! Workbook decoding seam.

use crate::error::Result;
use crate::model::RawWorkbook;

/// Decodes workbook bytes into named raw tables.
///
/// The crate ships [`XlsxDecoder`](crate::xlsx::XlsxDecoder) behind the
/// `xlsx` feature; other spreadsheet readers plug in here.
pub trait WorkbookDecoder {
    /// Decode `data`, labelling the workbook with `source`.
    fn decode(&self, source: &str, data: Vec<u8>) -> Result<RawWorkbook>;
}
