//! Workbook format detection.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Content type for the XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Content type for the macro-enabled workbook part, read the same way.
const XLSM_CONTENT_TYPE: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";

/// Verify that a file is an Excel workbook.
///
/// # Example
///
/// ```no_run
/// use xlcompare::detect::verify_workbook_path;
///
/// verify_workbook_path("budget.xlsx")?;
/// # Ok::<(), xlcompare::Error>(())
/// ```
pub fn verify_workbook_path(path: impl AsRef<Path>) -> Result<()> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    verify_workbook_reader(reader)
}

/// Verify that a byte slice holds an Excel workbook.
pub fn verify_workbook_bytes(data: &[u8]) -> Result<()> {
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }

    verify_workbook_reader(std::io::Cursor::new(data))
}

/// Verify that a reader yields an Excel workbook.
pub fn verify_workbook_reader<R: Read + Seek>(reader: R) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            decode_xml_bytes(&bytes)?
        }
        Err(_) => {
            return Err(Error::MissingComponent("[Content_Types].xml".to_string()));
        }
    };

    if content_types.contains(XLSX_CONTENT_TYPE) || content_types.contains(XLSM_CONTENT_TYPE) {
        return Ok(());
    }

    // Fallback: a spreadsheet package keeps its parts under xl/
    let has_xl = archive.file_names().any(|n| n.starts_with("xl/"));
    let has_other = archive
        .file_names()
        .any(|n| n.starts_with("word/") || n.starts_with("ppt/"));

    if has_xl && !has_other {
        Ok(())
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}
