//! Reading BIFF8 workbooks built in memory.

mod common;

use std::io::Cursor;

use common::{sample_workbook, BiffWorkbook, SAMPLE_CELLS};
use pretty_assertions::assert_eq;
use xlwrap_core::{
    Backend, CellAddress, CellError, CellValue, Error, GridView, SearchOptions, SheetSelector,
    SpreadsheetFormat,
};
use xlwrap_xls::{XlsBook, XlsReader};

#[test]
fn test_sheet_names_in_file_order() {
    let bytes = sample_workbook().to_bytes();
    let workbook = XlsReader::read(Cursor::new(bytes)).unwrap();

    let names = workbook.sheet_names();
    assert_eq!(names, vec!["Sheet1", "Sheet2", "other_sheet"]);
}

#[test]
fn test_sample_cells_are_one_based() {
    let bytes = sample_workbook().to_bytes();
    let workbook = XlsReader::read(Cursor::new(bytes)).unwrap();
    let sheet = workbook.worksheet(0).unwrap();

    for (row, col, text) in SAMPLE_CELLS {
        let value = sheet.get_value_at(row as u32, col as u32);
        assert_eq!(value, CellValue::string(text), "cell ({row}, {col})");
    }
    assert_eq!(sheet.get_value("A1").unwrap(), CellValue::Empty);
    assert_eq!(sheet.max_row(), 10);
    assert_eq!(sheet.max_col(), 27);
}

#[test]
fn test_value_records() {
    let mut wb = BiffWorkbook::new();
    let s = wb.add_sheet("Values");
    wb.number(s, 1, 1, 42.0)
        .number(s, 1, 2, 3.25)
        .rk_integer(s, 1, 3, -5)
        .boolean(s, 2, 1, true)
        .boolean(s, 2, 2, false)
        .error(s, 2, 3, 0x07)
        .text(s, 3, 1, "naïve")
        .text(s, 3, 2, "日本");

    let workbook = XlsReader::read(Cursor::new(wb.to_bytes())).unwrap();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(sheet.get_value("A1").unwrap(), CellValue::Number(42.0));
    assert_eq!(sheet.get_value("B1").unwrap(), CellValue::Number(3.25));
    assert_eq!(sheet.get_value("C1").unwrap(), CellValue::Number(-5.0));
    assert_eq!(sheet.get_value("A2").unwrap(), CellValue::Boolean(true));
    assert_eq!(sheet.get_value("B2").unwrap(), CellValue::Boolean(false));
    assert_eq!(
        sheet.get_value("C2").unwrap(),
        CellValue::Error(CellError::Div0)
    );
    assert_eq!(sheet.get_value("A3").unwrap(), CellValue::string("naïve"));
    assert_eq!(sheet.get_value("B3").unwrap(), CellValue::string("日本"));

    let view = GridView::new(sheet);
    assert_eq!(view.row(1).unwrap(), vec!["42", "3.25", "-5"]);
    assert_eq!(view.row(2).unwrap(), vec!["TRUE", "FALSE", "#DIV/0!"]);
}

#[test]
fn test_formula_cached_results() {
    let mut wb = BiffWorkbook::new();
    let s = wb.add_sheet("Formulas");
    wb.formula_number(s, 1, 1, 8.0)
        .formula_text(s, 1, 2, "joined");

    let workbook = XlsReader::read(Cursor::new(wb.to_bytes())).unwrap();
    let sheet = workbook.worksheet(0).unwrap();

    let a1 = sheet.get_value("A1").unwrap();
    assert_eq!(a1, CellValue::formula("", Some(CellValue::Number(8.0))));
    assert_eq!(a1.to_string(), "8");

    let b1 = sheet.get_value("B1").unwrap();
    assert_eq!(b1, CellValue::formula("", Some(CellValue::string("joined"))));
    assert_eq!(b1.to_string(), "joined");
}

#[test]
fn test_rk_encodings() {
    let mut wb = BiffWorkbook::new();
    let s = wb.add_sheet("Rk");
    wb.rk_integer(s, 1, 1, 536_870_911)
        .rk_integer(s, 1, 2, -536_870_912)
        .rk_hundredths(s, 2, 1, 1234)
        .rk_hundredths(s, 2, 2, -5)
        .rk_float(s, 3, 1, 1.5)
        .rk_float(s, 3, 2, -0.25);

    let workbook = XlsReader::read(Cursor::new(wb.to_bytes())).unwrap();
    let view = GridView::new(workbook.worksheet(0).unwrap());
    assert_eq!(
        view.array(),
        vec![
            vec!["536870911", "-536870912"],
            vec!["12.34", "-0.05"],
            vec!["1.5", "-0.25"],
        ]
    );
}

#[test]
fn test_mulrk_and_inline_labels() {
    let mut wb = BiffWorkbook::new();
    let s = wb.add_sheet("Runs");
    wb.mulrk(s, 4, 2, &[10, 20, 30])
        .label(s, 5, 3, "testc5")
        .label(s, 6, 1, "Größe");

    let workbook = XlsReader::read(Cursor::new(wb.to_bytes())).unwrap();
    let sheet = workbook.worksheet(0).unwrap();
    let view = GridView::new(sheet);
    assert_eq!(view.row(4).unwrap(), vec!["", "10", "20", "30"]);
    assert_eq!(view.read_cell("C5").unwrap(), "testc5");
    assert_eq!(sheet.get_value("A6").unwrap(), CellValue::string("Größe"));
    assert_eq!(sheet.get_value("E4").unwrap(), CellValue::Empty);
}

#[test]
fn test_chart_sheets_are_skipped() {
    let mut wb = BiffWorkbook::new();
    let first = wb.add_sheet("Data");
    wb.add_chart_sheet("Chart1");
    let last = wb.add_sheet("More");
    wb.number(first, 1, 1, 1.0);
    wb.number(last, 2, 2, 2.0);

    let workbook = XlsReader::read(Cursor::new(wb.to_bytes())).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Data", "More"]);
    assert_eq!(
        workbook.worksheet(1).unwrap().get_value("B2").unwrap(),
        CellValue::Number(2.0)
    );
}

#[test]
fn test_not_a_compound_file() {
    let result = XlsReader::read(Cursor::new(b"PK\x03\x04 definitely not cfb".to_vec()));
    assert!(result.is_err());
}

#[test]
fn test_book_reads_and_searches() {
    let mut book = XlsBook::from_reader(Cursor::new(sample_workbook().to_bytes())).unwrap();
    assert_eq!(book.format(), SpreadsheetFormat::Xls);

    let view = GridView::new(book.active_sheet().unwrap());
    assert_eq!(view.sheet_name(), "Sheet1");
    assert_eq!(view.read_cell("AA2").unwrap(), "testaa2");
    assert_eq!(
        view.search("test", &SearchOptions::new().contains(true).occurrence(2)),
        Some(CellAddress::new(2, 4).unwrap())
    );

    book.select_sheet(&SheetSelector::Index(2)).unwrap();
    assert_eq!(book.active_sheet().unwrap().name(), "other_sheet");
    assert!(matches!(
        book.select_sheet(&SheetSelector::Index(3)),
        Err(Error::SheetNotFound(_))
    ));
    assert_eq!(book.active_sheet().unwrap().name(), "other_sheet");
}

#[test]
fn test_book_is_read_only() {
    let mut book = XlsBook::from_reader(Cursor::new(sample_workbook().to_bytes())).unwrap();

    let write = book.set_value_at(CellAddress::new(1, 1).unwrap(), CellValue::from("x"));
    assert!(matches!(
        write,
        Err(Error::UnsupportedOperation {
            format: SpreadsheetFormat::Xls,
            ..
        })
    ));

    let dir = tempfile::tempdir().unwrap();
    let persist = book.persist(&dir.path().join("out.xls"));
    assert!(matches!(persist, Err(Error::UnsupportedOperation { .. })));
}
