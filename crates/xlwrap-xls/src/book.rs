//! Read-only [`Backend`] over a loaded `.xls` workbook

use std::io::{Read, Seek};
use std::path::Path;

use xlwrap_core::{
    Backend, CellAddress, CellValue, Error, Grid, Result, SheetSelector, SpreadsheetFormat,
    Workbook,
};

use crate::reader::XlsReader;

/// A BIFF8 document held in memory
///
/// Values can be read from any sheet; writing and saving are rejected with
/// [`Error::UnsupportedOperation`].
#[derive(Debug)]
pub struct XlsBook {
    workbook: Workbook,
}

impl XlsBook {
    /// Load a workbook from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("reading xls workbook {}", path.display());
        let workbook = XlsReader::read_file(path)?;
        Ok(Self { workbook })
    }

    /// Load a workbook from any seekable source
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let workbook = XlsReader::read(reader)?;
        Ok(Self { workbook })
    }

    /// The loaded workbook
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }
}

impl Backend for XlsBook {
    fn format(&self) -> SpreadsheetFormat {
        SpreadsheetFormat::Xls
    }

    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn select_sheet(&mut self, selector: &SheetSelector) -> Result<()> {
        self.workbook.select(selector).map(|_| ())
    }

    fn active_sheet(&self) -> Result<&dyn Grid> {
        self.workbook
            .active_worksheet()
            .map(|ws| ws as &dyn Grid)
    }

    fn set_value_at(&mut self, _address: CellAddress, _value: CellValue) -> Result<()> {
        Err(Error::unsupported("write", SpreadsheetFormat::Xls))
    }

    fn persist(&mut self, _path: &Path) -> Result<()> {
        Err(Error::unsupported("save", SpreadsheetFormat::Xls))
    }
}
