//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] and [`CellError`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellTarget`] and [`ColumnRef`] - Caller-supplied locations before validation
//! - [`SharedStrings`] - The string table cells refer to by index

mod address;
mod error;
mod shared;
mod value;

pub use address::{CellAddress, CellTarget, ColumnLabel, ColumnRef};
pub use error::CellError;
pub use shared::SharedStrings;
pub use value::CellValue;
