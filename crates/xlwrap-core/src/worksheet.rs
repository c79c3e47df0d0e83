//! Worksheet type

use std::collections::BTreeMap;

use crate::backend::Grid;
use crate::cell::{CellAddress, CellValue};
use crate::error::Result;

/// A worksheet (single sheet in a workbook)
///
/// Cells are stored sparsely, keyed by one-based row then column. Storing
/// [`CellValue::Empty`] removes the cell.
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Row number -> (column number -> value)
    rows: BTreeMap<u32, BTreeMap<u32, CellValue>>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    // === Cell Access ===

    /// Get a cell value by address string (e.g., "A1")
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get cell value by one-based indices
    pub fn get_value_at(&self, row: u32, col: u32) -> CellValue {
        self.value_at(row, col).cloned().unwrap_or_default()
    }

    /// Borrow a stored cell value by one-based indices
    pub fn value_at(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.rows.get(&row).and_then(|cells| cells.get(&col))
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_value(addr, value);
        Ok(())
    }

    /// Set a cell value by one-based row and column, validating the bounds
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u32,
        value: V,
    ) -> Result<()> {
        let addr = CellAddress::new(row, col)?;
        self.set_value(addr, value);
        Ok(())
    }

    /// Set a cell value at an already validated address
    pub fn set_value<V: Into<CellValue>>(&mut self, addr: CellAddress, value: V) {
        let value = value.into();
        if value.is_empty() {
            self.clear_cell_at(addr.row, addr.col);
        } else {
            self.rows.entry(addr.row).or_default().insert(addr.col, value);
        }
    }

    /// Clear a cell by indices
    pub fn clear_cell_at(&mut self, row: u32, col: u32) {
        if let Some(cells) = self.rows.get_mut(&row) {
            cells.remove(&col);
            if cells.is_empty() {
                self.rows.remove(&row);
            }
        }
    }

    // === Bounds ===

    /// Highest non-empty row number, 0 for an empty sheet
    pub fn max_row(&self) -> u32 {
        self.rows.keys().next_back().copied().unwrap_or(0)
    }

    /// Highest non-empty column number across all rows, 0 for an empty sheet
    pub fn max_col(&self) -> u32 {
        self.rows
            .values()
            .filter_map(|cells| cells.keys().next_back().copied())
            .max()
            .unwrap_or(0)
    }

    /// Check if the worksheet is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over all non-empty cells in row-major order: (row, col, value)
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u32, &CellValue)> {
        self.rows
            .iter()
            .flat_map(|(&row, cells)| cells.iter().map(move |(&col, v)| (row, col, v)))
    }
}

impl Grid for Worksheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn cell(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.value_at(row, col)
    }

    fn row_count(&self) -> u32 {
        self.max_row()
    }

    fn column_count(&self) -> u32 {
        self.max_col()
    }
}
