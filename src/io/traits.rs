//! Core traits for import sources.
//!
//! Format adapters implement [`RowSource`] to yield untyped rows one at a
//! time for field mapping.

use crate::Result;
use serde_json::{Map, Value};

/// An externally-sourced row: external column/key name to raw value.
///
/// Tabular sources yield string values under the header names; JSON sources
/// yield the object's values unchanged.
pub type RawRow = Map<String, Value>;

/// Source of untyped import rows.
///
/// Implementations decode a specific format (CSV, JSON) and yield rows in
/// source order.
pub trait RowSource {
    /// Reads the next row from the source.
    ///
    /// Returns `Ok(None)` when the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O errors occur.
    fn next(&mut self) -> Result<Option<RawRow>>;

    /// The 1-based number of the first data row.
    ///
    /// Tabular sources report 2 (the header occupies row 1) so user-facing
    /// row numbers match what the operator sees in a spreadsheet; JSON
    /// sources report 1.
    fn first_row_number(&self) -> usize {
        1
    }

    /// Returns an estimate of the total number of rows, if known.
    fn size_hint(&self) -> Option<usize> {
        None
    }
}
