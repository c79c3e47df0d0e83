//! Minimal BIFF8 workbook writer for test fixtures.
//!
//! Produces a CFB container with a `/Workbook` stream holding a globals
//! substream (BOUNDSHEET + SST) and one substream per sheet. Coordinates
//! passed to the builder are one-based, like the rest of xlwrap.

use std::io::{Cursor, Write};
use std::path::Path;

const BOF: u16 = 0x0809;
const EOF: u16 = 0x000A;
const BOUNDSHEET: u16 = 0x0085;
const SST: u16 = 0x00FC;
const LABELSST: u16 = 0x00FD;
const LABEL: u16 = 0x0204;
const NUMBER: u16 = 0x0203;
const RK: u16 = 0x027E;
const MULRK: u16 = 0x00BD;
const BOOLERR: u16 = 0x0205;
const FORMULA: u16 = 0x0006;
const STRING: u16 = 0x0207;

const DEFAULT_XF: u16 = 0x000F;

struct Sheet {
    name: String,
    sheet_type: u8,
    records: Vec<u8>,
}

/// In-memory BIFF8 workbook under construction
#[derive(Default)]
pub struct BiffWorkbook {
    sst: Vec<String>,
    sheets: Vec<Sheet>,
}

fn record(out: &mut Vec<u8>, record_type: u16, body: &[u8]) {
    out.extend_from_slice(&record_type.to_le_bytes());
    out.extend_from_slice(&(body.len() as u16).to_le_bytes());
    out.extend_from_slice(body);
}

fn bof(substream: u16) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x0600u16.to_le_bytes());
    body.extend_from_slice(&substream.to_le_bytes());
    body.extend_from_slice(&0x0DBBu16.to_le_bytes()); // build
    body.extend_from_slice(&0x07CCu16.to_le_bytes()); // year
    body.extend_from_slice(&0u32.to_le_bytes()); // history
    body.extend_from_slice(&6u32.to_le_bytes()); // lowest version
    body
}

/// Character data with the flags byte: Latin-1 when possible, else UTF-16LE
fn string_body(text: &str) -> (u16, Vec<u8>) {
    let mut out = Vec::new();
    let count;
    if text.chars().all(|c| (c as u32) < 0x100) {
        count = text.chars().count();
        out.push(0x00);
        out.extend(text.chars().map(|c| c as u8));
    } else {
        let wide: Vec<u16> = text.encode_utf16().collect();
        count = wide.len();
        out.push(0x01);
        for unit in wide {
            out.extend_from_slice(&unit.to_le_bytes());
        }
    }
    (count as u16, out)
}

fn cell_header(row: u16, col: u16) -> Vec<u8> {
    assert!(row >= 1 && col >= 1, "fixture coordinates are one-based");
    let mut body = Vec::new();
    body.extend_from_slice(&(row - 1).to_le_bytes());
    body.extend_from_slice(&(col - 1).to_le_bytes());
    body.extend_from_slice(&DEFAULT_XF.to_le_bytes());
    body
}

impl BiffWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a worksheet and return its position
    pub fn add_sheet(&mut self, name: &str) -> usize {
        self.sheets.push(Sheet {
            name: name.to_string(),
            sheet_type: 0x00,
            records: Vec::new(),
        });
        self.sheets.len() - 1
    }

    /// Append a chart sheet, which readers should skip
    pub fn add_chart_sheet(&mut self, name: &str) {
        self.sheets.push(Sheet {
            name: name.to_string(),
            sheet_type: 0x02,
            records: Vec::new(),
        });
    }

    /// LABELSST cell pointing into the shared string table
    pub fn text(&mut self, sheet: usize, row: u16, col: u16, text: &str) -> &mut Self {
        let idx = match self.sst.iter().position(|s| s == text) {
            Some(i) => i,
            None => {
                self.sst.push(text.to_string());
                self.sst.len() - 1
            }
        };
        let mut body = cell_header(row, col);
        body.extend_from_slice(&(idx as u32).to_le_bytes());
        record(&mut self.sheets[sheet].records, LABELSST, &body);
        self
    }

    /// NUMBER cell
    pub fn number(&mut self, sheet: usize, row: u16, col: u16, value: f64) -> &mut Self {
        let mut body = cell_header(row, col);
        body.extend_from_slice(&value.to_le_bytes());
        record(&mut self.sheets[sheet].records, NUMBER, &body);
        self
    }

    /// LABEL cell carrying its text inline
    pub fn label(&mut self, sheet: usize, row: u16, col: u16, text: &str) -> &mut Self {
        let mut body = cell_header(row, col);
        let (count, chars) = string_body(text);
        body.extend_from_slice(&count.to_le_bytes());
        body.extend(chars);
        record(&mut self.sheets[sheet].records, LABEL, &body);
        self
    }

    /// RK cell holding an integer
    pub fn rk_integer(&mut self, sheet: usize, row: u16, col: u16, value: i32) -> &mut Self {
        self.rk(sheet, row, col, ((value << 2) as u32) | 0x02)
    }

    /// RK cell holding `hundredths / 100`
    pub fn rk_hundredths(&mut self, sheet: usize, row: u16, col: u16, hundredths: i32) -> &mut Self {
        self.rk(sheet, row, col, ((hundredths << 2) as u32) | 0x03)
    }

    /// RK cell holding a float whose low 34 bits are zero
    pub fn rk_float(&mut self, sheet: usize, row: u16, col: u16, value: f64) -> &mut Self {
        let bits = value.to_bits();
        assert_eq!(bits & 0x3_FFFF_FFFF, 0, "{value} does not fit an RK float");
        self.rk(sheet, row, col, (bits >> 32) as u32)
    }

    fn rk(&mut self, sheet: usize, row: u16, col: u16, rk: u32) -> &mut Self {
        let mut body = cell_header(row, col);
        body.extend_from_slice(&rk.to_le_bytes());
        record(&mut self.sheets[sheet].records, RK, &body);
        self
    }

    /// MULRK run of integers starting at `first_col`
    pub fn mulrk(&mut self, sheet: usize, row: u16, first_col: u16, values: &[i32]) -> &mut Self {
        let mut body = Vec::new();
        body.extend_from_slice(&(row - 1).to_le_bytes());
        body.extend_from_slice(&(first_col - 1).to_le_bytes());
        for value in values {
            body.extend_from_slice(&DEFAULT_XF.to_le_bytes());
            body.extend_from_slice(&(((value << 2) as u32) | 0x02).to_le_bytes());
        }
        let last_col = first_col - 1 + values.len() as u16 - 1;
        body.extend_from_slice(&last_col.to_le_bytes());
        record(&mut self.sheets[sheet].records, MULRK, &body);
        self
    }

    /// BOOLERR cell holding a boolean
    pub fn boolean(&mut self, sheet: usize, row: u16, col: u16, value: bool) -> &mut Self {
        let mut body = cell_header(row, col);
        body.extend_from_slice(&[value as u8, 0]);
        record(&mut self.sheets[sheet].records, BOOLERR, &body);
        self
    }

    /// BOOLERR cell holding an error code (0x07 = #DIV/0!)
    pub fn error(&mut self, sheet: usize, row: u16, col: u16, code: u8) -> &mut Self {
        let mut body = cell_header(row, col);
        body.extend_from_slice(&[code, 1]);
        record(&mut self.sheets[sheet].records, BOOLERR, &body);
        self
    }

    /// FORMULA cell with a numeric cached result
    pub fn formula_number(&mut self, sheet: usize, row: u16, col: u16, cached: f64) -> &mut Self {
        self.formula(sheet, row, col, cached.to_le_bytes());
        self
    }

    /// FORMULA cell with a string cached result (FORMULA + STRING)
    pub fn formula_text(&mut self, sheet: usize, row: u16, col: u16, cached: &str) -> &mut Self {
        self.formula(sheet, row, col, [0x00, 0, 0, 0, 0, 0, 0xFF, 0xFF]);
        let (count, chars) = string_body(cached);
        let mut body = count.to_le_bytes().to_vec();
        body.extend(chars);
        record(&mut self.sheets[sheet].records, STRING, &body);
        self
    }

    fn formula(&mut self, sheet: usize, row: u16, col: u16, result: [u8; 8]) {
        let mut body = cell_header(row, col);
        body.extend_from_slice(&result);
        body.extend_from_slice(&0u16.to_le_bytes()); // options
        body.extend_from_slice(&0u32.to_le_bytes()); // reserved
        body.extend_from_slice(&0u16.to_le_bytes()); // empty token stream
        record(&mut self.sheets[sheet].records, FORMULA, &body);
    }

    /// The raw `/Workbook` stream
    pub fn biff_stream(&self) -> Vec<u8> {
        let mut out = Vec::new();
        record(&mut out, BOF, &bof(0x0005));
        for sheet in &self.sheets {
            let mut body = Vec::new();
            body.extend_from_slice(&0u32.to_le_bytes()); // stream offset, unused by readers here
            body.push(0x00); // visible
            body.push(sheet.sheet_type);
            let (count, chars) = string_body(&sheet.name);
            body.push(count as u8);
            body.extend(chars);
            record(&mut out, BOUNDSHEET, &body);
        }
        if !self.sst.is_empty() {
            let mut body = Vec::new();
            body.extend_from_slice(&(self.sst.len() as u32).to_le_bytes());
            body.extend_from_slice(&(self.sst.len() as u32).to_le_bytes());
            for s in &self.sst {
                let (count, chars) = string_body(s);
                body.extend_from_slice(&count.to_le_bytes());
                body.extend(chars);
            }
            record(&mut out, SST, &body);
        }
        record(&mut out, EOF, &[]);

        for sheet in &self.sheets {
            let substream = if sheet.sheet_type == 0x02 { 0x0020 } else { 0x0010 };
            record(&mut out, BOF, &bof(substream));
            out.extend_from_slice(&sheet.records);
            record(&mut out, EOF, &[]);
        }
        out
    }

    /// The complete `.xls` file contents
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut comp = cfb::CompoundFile::create(Cursor::new(Vec::new()))
            .expect("create compound file");
        {
            let mut stream = comp.create_stream("/Workbook").expect("create stream");
            stream.write_all(&self.biff_stream()).expect("write stream");
            stream.flush().expect("flush stream");
        }
        comp.flush().expect("flush compound file");
        comp.into_inner().into_inner()
    }

    /// Write the `.xls` file to `path`
    pub fn save(&self, path: &Path) {
        std::fs::write(path, self.to_bytes()).expect("write xls fixture");
    }
}
