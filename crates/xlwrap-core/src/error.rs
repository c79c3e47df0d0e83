//! Error types for xlwrap-core

use std::path::PathBuf;

use thiserror::Error;

use crate::format::SpreadsheetFormat;
use crate::workbook::SheetSelector;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by address resolution, grid access and document backends
#[derive(Debug, Error)]
pub enum Error {
    /// The path given to open does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The path extension is not a recognized spreadsheet format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Malformed or out-of-range cell reference, or wrong argument arity
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// No sheet matches the selector
    #[error("Sheet not found: {0}")]
    SheetNotFound(SheetSelector),

    /// Write or persist attempted on a read-only backend
    #[error("{operation} is not supported for {format} documents")]
    UnsupportedOperation {
        operation: &'static str,
        format: SpreadsheetFormat,
    },

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Backend IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend could not decode the file contents
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Create an [`Error::UnsupportedOperation`]
    pub fn unsupported(operation: &'static str, format: SpreadsheetFormat) -> Self {
        Error::UnsupportedOperation { operation, format }
    }

    /// Create an [`Error::Parse`] from any message
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }
}
