//! Capability traits implemented by the format crates

use std::path::Path;

use crate::cell::{CellAddress, CellValue};
use crate::error::Result;
use crate::format::SpreadsheetFormat;
use crate::workbook::SheetSelector;

/// A two-dimensional table of cells for one sheet
///
/// Coordinates are one-based. The bounds are the furthest non-empty row and
/// column; anything outside them reads as blank.
pub trait Grid {
    /// Sheet name
    fn name(&self) -> &str;

    /// Stored value at (row, col), `None` for blank cells
    fn cell(&self, row: u32, col: u32) -> Option<&CellValue>;

    /// Furthest non-empty row, 0 when the sheet is empty
    fn row_count(&self) -> u32;

    /// Furthest non-empty column, 0 when the sheet is empty
    fn column_count(&self) -> u32;

    /// Display string at (row, col)
    fn display(&self, row: u32, col: u32) -> String {
        self.cell(row, col)
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

/// A loaded document in one concrete file format
pub trait Backend {
    /// Format this backend reads (and possibly writes)
    fn format(&self) -> SpreadsheetFormat;

    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Make another sheet active; the active sheet is unchanged on error
    fn select_sheet(&mut self, selector: &SheetSelector) -> Result<()>;

    /// The active sheet
    fn active_sheet(&self) -> Result<&dyn Grid>;

    /// Store a value in the active sheet
    fn set_value_at(&mut self, address: CellAddress, value: CellValue) -> Result<()>;

    /// Write the whole document to `path` in [`Backend::format`], overwriting
    fn persist(&mut self, path: &Path) -> Result<()>;
}
