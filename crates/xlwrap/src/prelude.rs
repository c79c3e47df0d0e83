//! Prelude module - common imports for xlwrap users
//!
//! ```rust
//! use xlwrap::prelude::*;
//! ```

pub use crate::{
    // Addressing
    CellAddress,
    CellTarget,
    // Cell types
    CellError,
    CellValue,
    ColumnRef,
    // Main types
    Document,
    DocumentInfo,
    // Error types
    Error,
    GridView,
    OpenOptions,
    Result,
    SearchOptions,
    SheetSelector,
    SpreadsheetFormat,
};
