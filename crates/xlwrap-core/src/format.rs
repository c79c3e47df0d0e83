//! Spreadsheet file formats

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// File format of a spreadsheet document, chosen from the path extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpreadsheetFormat {
    /// Legacy BIFF8 workbook (read-only)
    Xls,
    /// Office Open XML workbook
    Xlsx,
    /// Office Open XML workbook with a VBA project
    Xlsm,
}

impl SpreadsheetFormat {
    /// Determine the format from a path's extension (case-insensitive)
    ///
    /// # Examples
    /// ```
    /// use xlwrap_core::SpreadsheetFormat;
    ///
    /// assert_eq!(SpreadsheetFormat::from_path("book.XLSM").unwrap(), SpreadsheetFormat::Xlsm);
    /// assert!(SpreadsheetFormat::from_path("test_name").is_err());
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("xls") => Ok(SpreadsheetFormat::Xls),
            Some("xlsx") => Ok(SpreadsheetFormat::Xlsx),
            Some("xlsm") => Ok(SpreadsheetFormat::Xlsm),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Lowercase file extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            SpreadsheetFormat::Xls => "xls",
            SpreadsheetFormat::Xlsx => "xlsx",
            SpreadsheetFormat::Xlsm => "xlsm",
        }
    }

    /// Whether documents of this format can be written and saved
    pub fn is_writable(&self) -> bool {
        !matches!(self, SpreadsheetFormat::Xls)
    }
}

impl fmt::Display for SpreadsheetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
