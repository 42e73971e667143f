//! Row pairing strategies.

use crate::model::{CanonicalRow, CanonicalTable};

/// Chooses which row of the second table a row of the first is compared with.
///
/// The differ only asks for pairs; it never inspects keys itself, so a keyed
/// strategy can replace [`PositionalPairing`] without touching emission.
pub trait RowPairing {
    /// Short name used in logs and debug output.
    fn name(&self) -> &'static str;

    /// The counterpart of `row` (found at `index` in its own table) within
    /// `other`, if there is one.
    fn pair<'b>(
        &self,
        index: usize,
        row: &CanonicalRow,
        other: &'b CanonicalTable,
    ) -> Option<&'b CanonicalRow>;
}

/// Pairs rows by position: row `i` of the first table with row `i` of the
/// second.
///
/// The key column is tracked but ignored here. Rows beyond the end of the
/// second table have no counterpart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionalPairing;

impl RowPairing for PositionalPairing {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn pair<'b>(
        &self,
        index: usize,
        _row: &CanonicalRow,
        other: &'b CanonicalTable,
    ) -> Option<&'b CanonicalRow> {
        other.rows().get(index)
    }
}
