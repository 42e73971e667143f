//! Data model for the compare pipeline.
//!
//! Decoders produce [`RawWorkbook`]s of untyped cells, the canonicalizer
//! turns them into [`CanonicalWorkbook`]s of keyed numeric tables, and the
//! differ reports [`DiscrepancyRecord`]s between two canonical workbooks.

mod canonical;
mod column;
mod discrepancy;
mod raw;

pub use canonical::*;
pub use column::*;
pub use discrepancy::*;
pub use raw::*;
