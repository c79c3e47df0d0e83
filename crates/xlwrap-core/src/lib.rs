//! # xlwrap-core
//!
//! Core data structures for the xlwrap spreadsheet accessor.
//!
//! This crate provides the format-independent pieces:
//! - [`CellTarget`] / [`CellAddress`] - Address resolution between `"AC55"` and `(55, 29)`
//! - [`CellValue`] - Cell values (numbers, strings, booleans, errors, formulas)
//! - [`Workbook`], [`Worksheet`] - The in-memory document loaded by each backend
//! - [`Grid`], [`Backend`] - Capability traits implemented by the format crates
//! - [`GridView`] - Row, column, array and search views over one sheet
//!
//! ## Example
//!
//! ```rust
//! use xlwrap_core::{GridView, SearchOptions, Worksheet};
//!
//! let mut sheet = Worksheet::new("Sheet1");
//! sheet.set_cell_value("AC55", "found me").unwrap();
//! sheet.set_cell_value_at(2, 2, 42.0).unwrap();
//!
//! let view = GridView::new(&sheet);
//! assert_eq!(view.read_cell("B2").unwrap(), "42");
//! assert_eq!(view.read_cell((55, 29)).unwrap(), "found me");
//!
//! let hit = view.search("found", &SearchOptions::new().contains(true)).unwrap();
//! assert_eq!((hit.row, hit.col), (55, 29));
//! ```

pub mod backend;
pub mod cell;
pub mod error;
pub mod format;
pub mod view;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use backend::{Backend, Grid};
pub use cell::{
    CellAddress, CellError, CellTarget, CellValue, ColumnLabel, ColumnRef, SharedStrings,
};
pub use error::{Error, Result};
pub use format::SpreadsheetFormat;
pub use view::{GridView, SearchOptions};
pub use workbook::{SheetSelector, Workbook};
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
