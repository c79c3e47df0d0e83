#![allow(dead_code)]

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

/// Workbook with sheets Sheet1 (sample cells), Sheet2 (empty) and other_sheet
pub fn sample_workbook() -> BiffWorkbook {
    let mut wb = BiffWorkbook::new();
    let first = wb.add_sheet("Sheet1");
    wb.add_sheet("Sheet2");
    let other = wb.add_sheet("other_sheet");
    for (row, col, text) in SAMPLE_CELLS {
        wb.text(first, row, col, text);
    }
    wb.text(other, 1, 1, "other");
    wb
}
