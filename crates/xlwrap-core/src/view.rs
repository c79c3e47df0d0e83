//! Row, column, array and search views over a [`Grid`]

use crate::backend::Grid;
use crate::cell::{CellAddress, CellTarget, CellValue, ColumnRef};
use crate::error::{Error, Result};

/// How [`GridView::search`] and [`GridView::search_all`] match cells
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOptions {
    /// Match when the display string contains the target instead of equalling it
    pub contains: bool,
    /// Which hit `search` returns, counting from 1
    pub occurrence: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            contains: false,
            occurrence: 1,
        }
    }
}

impl SearchOptions {
    /// Exact match, first occurrence
    pub fn new() -> Self {
        Self::default()
    }

    /// Set substring matching
    pub fn contains(mut self, contains: bool) -> Self {
        self.contains = contains;
        self
    }

    /// Set which occurrence `search` returns
    pub fn occurrence(mut self, occurrence: usize) -> Self {
        self.occurrence = occurrence;
        self
    }

    fn matches(&self, text: &str, target: &str) -> bool {
        if self.contains {
            text.contains(target)
        } else {
            text == target
        }
    }
}

/// Read-only traversal of one sheet
///
/// # Example
/// ```
/// use xlwrap_core::{GridView, SearchOptions, Worksheet};
///
/// let mut ws = Worksheet::new("Sheet1");
/// ws.set_cell_value("B2", "testb2").unwrap();
/// ws.set_cell_value("D2", "testd2").unwrap();
///
/// let view = GridView::new(&ws);
/// assert_eq!(view.read_cell("b2").unwrap(), "testb2");
/// assert_eq!(view.row(2).unwrap(), vec!["", "testb2", "", "testd2"]);
///
/// let hit = view.search("test", &SearchOptions::new().contains(true).occurrence(2));
/// assert_eq!(hit.map(|a| a.to_string()), Some("D2".to_string()));
/// ```
#[derive(Clone, Copy)]
pub struct GridView<'a> {
    grid: &'a dyn Grid,
}

impl<'a> GridView<'a> {
    /// Create a view over a grid
    pub fn new(grid: &'a dyn Grid) -> Self {
        Self { grid }
    }

    /// Name of the underlying sheet
    pub fn sheet_name(&self) -> &'a str {
        self.grid.name()
    }

    /// Furthest non-empty row
    pub fn row_count(&self) -> u32 {
        self.grid.row_count()
    }

    /// Furthest non-empty column
    pub fn column_count(&self) -> u32 {
        self.grid.column_count()
    }

    /// Display string of one cell; blank outside the grid
    pub fn read_cell<T: Into<CellTarget>>(&self, target: T) -> Result<String> {
        let addr = target.into().resolve()?;
        Ok(self.grid.display(addr.row, addr.col))
    }

    /// Typed value of one cell; [`CellValue::Empty`] outside the grid
    pub fn cell<T: Into<CellTarget>>(&self, target: T) -> Result<CellValue> {
        let addr = target.into().resolve()?;
        Ok(self
            .grid
            .cell(addr.row, addr.col)
            .cloned()
            .unwrap_or_default())
    }

    /// Display strings of columns `1..=column_count` in row `row`
    pub fn row(&self, row: u32) -> Result<Vec<String>> {
        if row == 0 {
            return Err(Error::InvalidAddress("row must be >= 1".into()));
        }
        Ok((1..=self.grid.column_count())
            .map(|col| self.grid.display(row, col))
            .collect())
    }

    /// Display strings of rows `1..=row_count` in the given column
    pub fn column<C: Into<ColumnRef>>(&self, column: C) -> Result<Vec<String>> {
        let col = column.into().resolve()?;
        Ok((1..=self.grid.row_count())
            .map(|row| self.grid.display(row, col))
            .collect())
    }

    /// Row-major snapshot of the whole grid
    pub fn array(&self) -> Vec<Vec<String>> {
        let cols = self.grid.column_count();
        (1..=self.grid.row_count())
            .map(|row| (1..=cols).map(|col| self.grid.display(row, col)).collect())
            .collect()
    }

    /// Address of the `options.occurrence`-th matching cell, scanning row by row
    pub fn search(&self, target: &str, options: &SearchOptions) -> Option<CellAddress> {
        if options.occurrence == 0 {
            return None;
        }
        self.matches(target, options).nth(options.occurrence - 1)
    }

    /// Addresses of every matching cell in row-major order
    pub fn search_all(&self, target: &str, options: &SearchOptions) -> Vec<CellAddress> {
        self.matches(target, options).collect()
    }

    fn matches<'s>(
        &'s self,
        target: &'s str,
        options: &'s SearchOptions,
    ) -> impl Iterator<Item = CellAddress> + 's {
        let grid: &'s dyn Grid = self.grid;
        let cols = grid.column_count();
        (1..=grid.row_count())
            .flat_map(move |row| (1..=cols).map(move |col| (row, col)))
            .filter(move |&(row, col)| options.matches(&grid.display(row, col), target))
            .map(|(row, col)| CellAddress { row, col })
    }
}
