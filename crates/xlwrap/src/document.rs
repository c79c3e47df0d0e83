//! The per-document facade: open, read, write, switch sheets, save

use std::fmt;
use std::path::{Path, PathBuf};

use xlwrap_core::{
    Backend, CellAddress, CellTarget, CellValue, ColumnRef, Error, GridView, Result,
    SearchOptions, SheetSelector, SpreadsheetFormat,
};

use crate::open_backend;

/// Options applied when a [`Document`] is opened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenOptions {
    /// Sheet made active after loading; the first sheet when `None`
    pub sheet: Option<SheetSelector>,
}

impl OpenOptions {
    /// Default options: first sheet active
    pub fn new() -> Self {
        Self::default()
    }

    /// Start on the given sheet
    pub fn sheet<S: Into<SheetSelector>>(mut self, sheet: S) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

/// Snapshot of a document's path, active sheet and access counters
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentInfo {
    /// Path the document was opened from
    pub file: PathBuf,
    /// Active sheet name
    pub sheet: String,
    /// Successful single-cell reads
    pub reads: u64,
    /// Successful single-cell writes
    pub writes: u64,
}

impl fmt::Display for DocumentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File: {}\nSheet: {}\nReads: {}\nWrites: {}",
            self.file.display(),
            self.sheet,
            self.reads,
            self.writes
        )
    }
}

/// An open spreadsheet file
///
/// The whole file is loaded at open; the file handle is not kept. Reads go
/// through the active sheet, which starts as the first sheet unless
/// [`OpenOptions::sheet`] says otherwise.
pub struct Document {
    path: PathBuf,
    backend: Box<dyn Backend>,
    reads: u64,
    writes: u64,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("format", &self.backend.format())
            .field("reads", &self.reads)
            .field("writes", &self.writes)
            .finish()
    }
}

impl Document {
    /// Open a spreadsheet with the first sheet active
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &OpenOptions::default())
    }

    /// Open a spreadsheet with explicit options
    ///
    /// The extension is checked before the path, so `"test_name"` is
    /// [`Error::UnsupportedFormat`] whether or not it exists.
    pub fn open_with<P: AsRef<Path>>(path: P, options: &OpenOptions) -> Result<Self> {
        let path = path.as_ref();
        let format = SpreadsheetFormat::from_path(path)?;
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        log::debug!("opening {} as {}", path.display(), format);
        let mut backend = open_backend(path, format)?;
        if let Some(selector) = &options.sheet {
            backend.select_sheet(selector)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            backend,
            reads: 0,
            writes: 0,
        })
    }

    /// Path the document was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format chosen from the path extension
    pub fn format(&self) -> SpreadsheetFormat {
        self.backend.format()
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.backend.sheet_names()
    }

    /// Name of the active sheet
    pub fn sheet_name(&self) -> Result<&str> {
        self.backend.active_sheet().map(|grid| grid.name())
    }

    /// Read-only view over the active sheet
    pub fn view(&self) -> Result<GridView<'_>> {
        self.backend.active_sheet().map(GridView::new)
    }

    /// Display string of one cell; counts as a read
    ///
    /// ```rust,no_run
    /// # use xlwrap::Document;
    /// let mut doc = Document::open("data.xls")?;
    /// assert_eq!(doc.read("AC55")?, doc.read((55, 29))?);
    /// # Ok::<(), xlwrap::Error>(())
    /// ```
    pub fn read<T: Into<CellTarget>>(&mut self, target: T) -> Result<String> {
        let text = self.view()?.read_cell(target)?;
        self.reads += 1;
        Ok(text)
    }

    /// Typed value of one cell; counts as a read
    pub fn cell<T: Into<CellTarget>>(&mut self, target: T) -> Result<CellValue> {
        let value = self.view()?.cell(target)?;
        self.reads += 1;
        Ok(value)
    }

    /// Display strings of one row of the active sheet
    pub fn row(&self, row: u32) -> Result<Vec<String>> {
        self.view()?.row(row)
    }

    /// Display strings of one column, by number or letters
    pub fn column<C: Into<ColumnRef>>(&self, column: C) -> Result<Vec<String>> {
        self.view()?.column(column)
    }

    /// Row-major snapshot of the active sheet
    pub fn array(&self) -> Result<Vec<Vec<String>>> {
        Ok(self.view()?.array())
    }

    /// Address of the `options.occurrence`-th matching cell
    pub fn search(&self, target: &str, options: &SearchOptions) -> Result<Option<CellAddress>> {
        Ok(self.view()?.search(target, options))
    }

    /// Addresses of every matching cell in row-major order
    pub fn search_all(&self, target: &str, options: &SearchOptions) -> Result<Vec<CellAddress>> {
        Ok(self.view()?.search_all(target, options))
    }

    /// Store a value in the active sheet; counts as a write
    ///
    /// The target is resolved first, so a bad address is reported as such
    /// even on read-only formats.
    pub fn write<T, V>(&mut self, target: T, value: V) -> Result<()>
    where
        T: Into<CellTarget>,
        V: Into<CellValue>,
    {
        let address = target.into().resolve()?;
        self.ensure_writable("write")?;
        self.backend.set_value_at(address, value.into())?;
        self.writes += 1;
        Ok(())
    }

    /// Persist to the path the document was opened from
    pub fn save(&mut self) -> Result<()> {
        self.ensure_writable("save")?;
        log::debug!("saving {}", self.path.display());
        self.backend.persist(&self.path)
    }

    /// Persist to another path, overwriting it; later `save` calls still
    /// target the opened path
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.ensure_writable("save")?;
        let path = path.as_ref();
        log::debug!("saving {} as {}", self.path.display(), path.display());
        self.backend.persist(path)
    }

    fn ensure_writable(&self, operation: &'static str) -> Result<()> {
        let format = self.format();
        if format.is_writable() {
            Ok(())
        } else {
            Err(Error::unsupported(operation, format))
        }
    }

    /// Make another sheet active; the active sheet is unchanged on error
    pub fn change_sheet<S: Into<SheetSelector>>(&mut self, selector: S) -> Result<()> {
        let selector = selector.into();
        self.backend.select_sheet(&selector)?;
        log::debug!("{}: active sheet is now {}", self.path.display(), selector);
        Ok(())
    }

    /// Make the sheet with this exact name active
    pub fn change_sheet_by_name(&mut self, name: &str) -> Result<()> {
        self.change_sheet(SheetSelector::Name(name.to_string()))
    }

    /// Make the sheet at this zero-based position active
    pub fn change_sheet_by_index(&mut self, index: usize) -> Result<()> {
        self.change_sheet(SheetSelector::Index(index))
    }

    /// Path, active sheet and counters
    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            file: self.path.clone(),
            sheet: self.sheet_name().map(str::to_string).unwrap_or_default(),
            reads: self.reads,
            writes: self.writes,
        }
    }

    /// Release the document
    pub fn close(self) {
        log::debug!(
            "closing {} after {} reads and {} writes",
            self.path.display(),
            self.reads,
            self.writes
        );
    }
}
