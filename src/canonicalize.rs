//! Workbook canonicalization.

use crate::error::Result;
use crate::model::{CanonicalWorkbook, RawWorkbook};
use crate::normalize::normalize_sheet;
use crate::options::SheetHints;
use crate::prompt::Prompt;
use crate::resolve::resolve_keys;
use tracing::info;

/// Resolve keys for and normalize every sheet of a workbook.
///
/// Sheets are handled in workbook order. Each one is resolved against the
/// caller hints on its own; answers typed for one sheet are not carried over
/// to the next. Cancelling any prompt fails the whole workbook with
/// [`Error::Aborted`](crate::Error::Aborted).
pub fn canonicalize_workbook(
    workbook: &RawWorkbook,
    hints: &SheetHints,
    prompt: &mut dyn Prompt,
) -> Result<CanonicalWorkbook> {
    let mut canonical = CanonicalWorkbook::new(workbook.source.clone());

    for sheet in &workbook.sheets {
        let keys = resolve_keys(sheet, &workbook.source, hints, prompt)?;
        canonical.add_table(normalize_sheet(sheet, &keys)?);
    }

    info!(
        source = %workbook.source,
        tables = canonical.len(),
        "canonicalized workbook"
    );

    Ok(canonical)
}
