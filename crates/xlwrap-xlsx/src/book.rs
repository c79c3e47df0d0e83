//! Read-write [`Backend`] over a loaded `.xlsx` or `.xlsm` workbook

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use tempfile::NamedTempFile;
use xlwrap_core::{
    Backend, CellAddress, CellValue, Error, Grid, Result, SheetSelector, SpreadsheetFormat,
    Workbook,
};

use crate::reader::{XlsxPackage, XlsxReader};
use crate::writer::XlsxWriter;

/// An OOXML document held in memory
///
/// For `.xlsm` files the VBA project is kept as opaque bytes and written back
/// unchanged on save.
#[derive(Debug)]
pub struct XlsxBook {
    workbook: Workbook,
    format: SpreadsheetFormat,
    vba_project: Option<Vec<u8>>,
}

impl XlsxBook {
    /// Load a workbook from disk; the extension decides xlsx or xlsm
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = SpreadsheetFormat::from_path(path)?;
        if format == SpreadsheetFormat::Xls {
            return Err(Error::UnsupportedFormat(path.display().to_string()));
        }

        log::debug!("reading {} workbook {}", format, path.display());
        let file = File::open(path)?;
        Self::from_reader(file, format)
    }

    /// Load a workbook from any seekable source
    pub fn from_reader<R: Read + Seek>(reader: R, format: SpreadsheetFormat) -> Result<Self> {
        let XlsxPackage {
            workbook,
            vba_project,
        } = XlsxReader::read_package(reader)?;

        if format == SpreadsheetFormat::Xlsm && vba_project.is_none() {
            log::debug!("macro-enabled workbook has no VBA project");
        }

        Ok(Self {
            workbook,
            format,
            vba_project,
        })
    }

    /// The loaded workbook
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Raw VBA project carried by an `.xlsm` file
    pub fn vba_project(&self) -> Option<&[u8]> {
        self.vba_project.as_deref()
    }
}

impl Backend for XlsxBook {
    fn format(&self) -> SpreadsheetFormat {
        self.format
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

    fn set_value_at(&mut self, address: CellAddress, value: CellValue) -> Result<()> {
        self.workbook.active_worksheet_mut()?.set_value(address, value);
        Ok(())
    }

    /// Write the package to a temporary file beside `path`, then rename it
    /// over `path`; the target is never left half-written
    fn persist(&mut self, path: &Path) -> Result<()> {
        log::debug!("writing {} workbook {}", self.format, path.display());
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = NamedTempFile::new_in(dir)?;
        match self.format {
            SpreadsheetFormat::Xlsm => XlsxWriter::write_macro_enabled(
                &self.workbook,
                self.vba_project.as_deref(),
                staged.as_file_mut(),
            )?,
            _ => XlsxWriter::write(&self.workbook, staged.as_file_mut())?,
        }
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
