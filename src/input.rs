//! Input workbook path validation.

use crate::error::{Error, Result};
use crate::prompt::{prompt_until_valid, Prompt, Validation};
use std::fmt;
use std::path::{Path, PathBuf};

/// File extension accepted for input workbooks.
pub const WORKBOOK_EXTENSION: &str = "xlsx";

/// Why an input path was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRejection {
    /// No file exists at the path.
    Missing,
    /// The file is not an `.xlsx` workbook.
    WrongExtension,
    /// The path names the same file as the first workbook.
    Duplicate,
}

impl fmt::Display for FileRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRejection::Missing => f.write_str("file does not exist"),
            FileRejection::WrongExtension => {
                write!(f, "file is not a .{} workbook", WORKBOOK_EXTENSION)
            }
            FileRejection::Duplicate => f.write_str("file is the same as the first workbook"),
        }
    }
}

/// Check that a path is an existing `.xlsx` file.
pub fn validate_input_file(path: &str) -> Validation<PathBuf, FileRejection> {
    let trimmed = path.trim();
    if trimmed.is_empty() || !Path::new(trimmed).is_file() {
        return Validation::Invalid(FileRejection::Missing);
    }
    if !has_workbook_extension(trimmed) {
        return Validation::Invalid(FileRejection::WrongExtension);
    }
    Validation::Valid(PathBuf::from(trimmed))
}

/// Check whether a path carries the workbook extension (any case).
pub fn has_workbook_extension(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(WORKBOOK_EXTENSION))
}

/// Whether two paths name the same file.
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn missing_message(order: &str) -> String {
    format!(
        "The {} was either missing or invalid. Please \nprovide a proper Excel file, or type eXit to end:",
        order.to_uppercase()
    )
}

fn duplicate_message(order: &str) -> String {
    format!(
        "The {} is the same as the first Excel file. Please \nprovide a UNIQUE and proper Excel file, or type eXit to end:",
        order.to_uppercase()
    )
}

/// Resolve an input workbook path, prompting until a valid one is given.
///
/// `order` names the file in messages ("first", "second").
pub fn resolve_input_file(
    candidate: Option<&str>,
    order: &str,
    prompt: &mut dyn Prompt,
) -> Result<PathBuf> {
    if let Validation::Valid(path) = validate_input_file(candidate.unwrap_or_default()) {
        return Ok(path);
    }

    prompt_until_valid(prompt, |_| missing_message(order), validate_input_file)
}

/// Resolve the second input workbook, which must differ from `first`.
pub fn resolve_distinct_input_file(
    first: &Path,
    candidate: Option<&str>,
    order: &str,
    prompt: &mut dyn Prompt,
) -> Result<PathBuf> {
    let validate = |text: &str| match validate_input_file(text) {
        Validation::Valid(path) if is_same_file(first, &path) => {
            Validation::Invalid(FileRejection::Duplicate)
        }
        other => other,
    };

    let initial = match validate(candidate.unwrap_or_default()) {
        Validation::Valid(path) => return Ok(path),
        Validation::Invalid(reason) => reason,
        Validation::Aborted => return Err(Error::Aborted),
    };

    prompt_until_valid(
        prompt,
        |reason| rejection_message(order, *reason.unwrap_or(&initial)),
        validate,
    )
}

fn rejection_message(order: &str, reason: FileRejection) -> String {
    match reason {
        FileRejection::Duplicate => duplicate_message(order),
        FileRejection::Missing | FileRejection::WrongExtension => missing_message(order),
    }
}
