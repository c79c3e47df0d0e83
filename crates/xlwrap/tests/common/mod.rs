#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use xlwrap::{SpreadsheetFormat, Workbook, XlsxWriter};

#[path = "../../../xlwrap-xls/tests/common/biff.rs"]
mod biff;

pub use biff::BiffWorkbook;

/// Cells of the shared sample sheet, as (row, col, text)
pub const SAMPLE_CELLS: [(u16, u16, &str); 8] = [
    (2, 2, "testb2"),
    (2, 4, "testd2"),
    (2, 10, "testj2"),
    (2, 27, "testaa2"),
    (4, 3, "testc4"),
    (7, 2, "testb7"),
    (7, 3, "testc7"),
    (10, 2, "testb10"),
];

pub const SHEETS: [&str; 3] = ["Sheet1", "Sheet2", "other_sheet"];

/// Bytes standing in for a VBA project in `.xlsm` fixtures
pub const VBA_PROJECT: &[u8] = b"\xd0\xcf\x11\xe0\xa1\xb1\x1a\xe1 vba project";

pub const ALL_FORMATS: [SpreadsheetFormat; 3] = [
    SpreadsheetFormat::Xls,
    SpreadsheetFormat::Xlsx,
    SpreadsheetFormat::Xlsm,
];

/// A fixture file inside its own scratch directory
pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    /// Sibling path in the same scratch directory
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn sample_ooxml() -> Workbook {
    let mut workbook = Workbook::empty();
    for name in SHEETS {
        workbook.add_worksheet_with_name(name).unwrap();
    }
    let first = workbook.worksheet_mut(0).unwrap();
    for (row, col, text) in SAMPLE_CELLS {
        first.set_cell_value_at(row as u32, col as u32, text).unwrap();
    }
    workbook
        .worksheet_mut(2)
        .unwrap()
        .set_cell_value("A1", "other")
        .unwrap();
    workbook
}

fn sample_biff() -> BiffWorkbook {
    let mut wb = BiffWorkbook::new();
    let first = wb.add_sheet(SHEETS[0]);
    wb.add_sheet(SHEETS[1]);
    let other = wb.add_sheet(SHEETS[2]);
    for (row, col, text) in SAMPLE_CELLS {
        wb.text(first, row, col, text);
    }
    wb.text(other, 1, 1, "other");
    wb
}

/// Write the sample workbook to `path` in `format`
pub fn write_sample(path: &Path, format: SpreadsheetFormat) {
    match format {
        SpreadsheetFormat::Xls => sample_biff().save(path),
        SpreadsheetFormat::Xlsx => XlsxWriter::write_file(&sample_ooxml(), path).unwrap(),
        SpreadsheetFormat::Xlsm => {
            let file = File::create(path).unwrap();
            XlsxWriter::write_macro_enabled(&sample_ooxml(), Some(VBA_PROJECT), file).unwrap();
        }
    }
}

/// Sample workbook saved as `test.<ext>` in a fresh scratch directory
pub fn sample_fixture(format: SpreadsheetFormat) -> Fixture {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(format!("test.{}", format.extension()));
    write_sample(&path, format);
    Fixture { dir, path }
}
