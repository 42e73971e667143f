//! Error types for the xlcompare library.

use std::io;
use thiserror::Error;

/// Result type alias for xlcompare operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, canonicalizing or comparing workbooks.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a recognizable Excel workbook.
    #[error("Unknown file format")]
    UnknownFormat,

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the workbook.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required workbook component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error while rendering a report.
    #[error("Render error: {0}")]
    Render(String),

    /// The user cancelled the comparison at a prompt.
    #[error("Comparison cancelled by user")]
    Aborted,
}

impl Error {
    /// Whether this error is a user-requested cancellation rather than a failure.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Error::Aborted)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}
