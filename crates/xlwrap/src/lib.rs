//! # xlwrap
//!
//! One accessor API over XLS, XLSX and XLSM spreadsheets.
//!
//! A [`Document`] is opened by path; the extension picks the backend. Cells
//! are addressed either as `"AC55"` or as one-based `(row, column)` pairs,
//! and every read and write is counted per document.
//!
//! ## Features
//!
//! - `xls`: read-only legacy BIFF8 files
//! - `xlsx`: read-write `.xlsx` and `.xlsm` files (VBA projects preserved)
//! - `full`: both of the above (the default set)
//!
//! ## Example
//!
//! ```rust,no_run
//! use xlwrap::prelude::*;
//!
//! let mut doc = Document::open("report.xlsx")?;
//! println!("{}", doc.read("B2")?);
//! println!("{}", doc.read((55, 29))?);
//!
//! doc.change_sheet_by_name("other_sheet")?;
//! if let Some(hit) = doc.search("total", &SearchOptions::new().contains(true))? {
//!     println!("found at {}", hit);
//! }
//!
//! doc.write("C3", 42.0)?;
//! doc.save_as("report-updated.xlsx")?;
//! println!("{}", doc.info());
//! # Ok::<(), xlwrap::Error>(())
//! ```

pub mod document;
pub mod prelude;

pub use document::{Document, DocumentInfo, OpenOptions};

// Re-export core types
pub use xlwrap_core::{
    Backend, CellAddress, CellError, CellTarget, CellValue, ColumnLabel, ColumnRef, Error, Grid,
    GridView, Result, SearchOptions, SheetSelector, SpreadsheetFormat, Workbook, Worksheet,
    MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN,
};

// Re-export backends
#[cfg(feature = "xls")]
pub use xlwrap_xls::{XlsBook, XlsError, XlsReader};
#[cfg(feature = "xlsx")]
pub use xlwrap_xlsx::{XlsxBook, XlsxError, XlsxReader, XlsxWriter};

use std::path::Path;

/// Load the backend for `format` from `path`
///
/// Fails with [`Error::UnsupportedFormat`] when the backend for that format
/// was compiled out.
pub fn open_backend(path: &Path, format: SpreadsheetFormat) -> Result<Box<dyn Backend>> {
    match format {
        #[cfg(feature = "xls")]
        SpreadsheetFormat::Xls => Ok(Box::new(XlsBook::open(path)?)),
        #[cfg(feature = "xlsx")]
        SpreadsheetFormat::Xlsx | SpreadsheetFormat::Xlsm => Ok(Box::new(XlsxBook::open(path)?)),
        #[allow(unreachable_patterns)]
        _ => Err(Error::UnsupportedFormat(path.display().to_string())),
    }
}
