//! JSON report rendering.

use crate::error::Result;
use crate::model::DiscrepancyRecord;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Serialize records as a JSON array.
pub fn to_json(records: &[DiscrepancyRecord], format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(records)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(records)?,
    };
    Ok(json)
}
