//! XLS (BIFF8) reader
//!
//! Loads the `Workbook` stream out of the compound file, reads the globals
//! substream for the shared strings and sheet list, then fills one
//! [`Worksheet`] per worksheet substream. BIFF8 rows and columns are
//! zero-based; cells land in the worksheet one-based.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use xlwrap_core::{CellAddress, CellError, CellValue, SharedStrings, Workbook, Worksheet};

use crate::biff::strings::{parse_sst, read_short_string, read_unicode_string};
use crate::biff::{self, BiffRecord, Bof, RecordCursor, RecordKind, Substream, BIFF8_VERSION};
use crate::error::{XlsError, XlsResult};

/// BOUNDSHEET type of an ordinary worksheet; charts and macro sheets are skipped
const WORKSHEET: u8 = 0x00;

/// Reads BIFF8 `.xls` files into a [`Workbook`]
pub struct XlsReader;

/// What the globals substream says about the workbook
#[derive(Default)]
struct Globals {
    strings: SharedStrings,
    /// `(type, name)` per BOUNDSHEET, in substream order
    sheets: Vec<(u8, String)>,
}

impl XlsReader {
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsResult<Workbook> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::read(file)
    }

    pub fn read<R: Read + Seek>(reader: R) -> XlsResult<Workbook> {
        let mut container = cfb::CompoundFile::open(reader)?;

        // BIFF5 writers named the stream "Book"
        let stream_path = ["/Workbook", "/Book"]
            .into_iter()
            .find(|path| container.exists(path))
            .ok_or_else(|| XlsError::InvalidFormat("no Workbook stream in compound file".into()))?;

        let mut bytes = Vec::new();
        container.open_stream(stream_path)?.read_to_end(&mut bytes)?;
        let records = biff::read_all_records(&mut Cursor::new(bytes))?;

        let (globals, rest) = Self::read_globals(&records)?;
        let substreams = Self::split_substreams(rest);

        let mut workbook = Workbook::empty();
        for (position, (sheet_type, name)) in globals.sheets.iter().enumerate() {
            if *sheet_type != WORKSHEET {
                log::debug!("skipping sheet '{}' of type 0x{:02X}", name, sheet_type);
                continue;
            }

            let mut sheet = Worksheet::new(name.as_str());
            match substreams.get(position) {
                Some(cells) => Self::read_cells(cells, &mut sheet, &globals.strings)?,
                None => log::warn!("sheet '{}' has no substream", name),
            }
            workbook.add_existing_worksheet(sheet)?;
        }

        if workbook.is_empty() {
            return Err(XlsError::InvalidFormat("workbook has no worksheets".into()));
        }
        Ok(workbook)
    }

    /// Read the globals substream; returns it with the records after its EOF
    fn read_globals(records: &[BiffRecord]) -> XlsResult<(Globals, &[BiffRecord])> {
        let mut globals = Globals::default();
        let mut started = false;

        for (idx, rec) in records.iter().enumerate() {
            match rec.kind {
                RecordKind::Bof if !started => {
                    let bof = Bof::parse(&rec.data)?;
                    if bof.substream != Substream::Globals {
                        continue;
                    }
                    if bof.version != BIFF8_VERSION {
                        return Err(XlsError::UnsupportedVersion(format!(
                            "expected BIFF8 (0x{BIFF8_VERSION:04X}), got 0x{:04X}",
                            bof.version
                        )));
                    }
                    started = true;
                }
                RecordKind::Eof if started => return Ok((globals, &records[idx + 1..])),
                RecordKind::Sst if started => {
                    parse_sst(&rec.data, &rec.continue_offsets, &mut globals.strings)?;
                }
                RecordKind::BoundSheet if started => {
                    // stream offset(4) + visibility(1) + type(1) + name
                    let mut cur = rec.cursor();
                    cur.skip(5)?;
                    let sheet_type = cur.u8()?;
                    globals.sheets.push((sheet_type, read_short_string(&mut cur)?));
                }
                _ => {}
            }
        }

        Err(XlsError::InvalidFormat("no workbook globals substream found".into()))
    }

    /// Group the records of each BOF..EOF substream, nested substreams included
    fn split_substreams(records: &[BiffRecord]) -> Vec<Vec<&BiffRecord>> {
        let mut groups = Vec::new();
        let mut current = Vec::new();
        let mut depth = 0usize;

        for rec in records {
            match rec.kind {
                RecordKind::Bof => depth += 1,
                RecordKind::Eof if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        groups.push(std::mem::take(&mut current));
                    }
                }
                _ if depth > 0 => current.push(rec),
                _ => {}
            }
        }

        groups
    }

    fn read_cells(
        records: &[&BiffRecord],
        sheet: &mut Worksheet,
        strings: &SharedStrings,
    ) -> XlsResult<()> {
        // A STRING record carries the text result of the FORMULA just before it
        let mut awaiting_text: Option<CellAddress> = None;

        for rec in records {
            let mut cur = rec.cursor();
            let awaiting = awaiting_text.take();
            match rec.kind {
                RecordKind::LabelSst => {
                    let addr = cur.cell_header()?;
                    let index = cur.u32()? as usize;
                    match strings.cell_value(index) {
                        Some(value) => sheet.set_value(addr, value),
                        None => log::warn!("{} refers to missing shared string {}", addr, index),
                    }
                }
                RecordKind::Label => {
                    let addr = cur.cell_header()?;
                    sheet.set_value(addr, CellValue::string(read_unicode_string(&mut cur)?));
                }
                RecordKind::Number => {
                    let addr = cur.cell_header()?;
                    sheet.set_value(addr, CellValue::Number(cur.f64()?));
                }
                RecordKind::Rk => {
                    let addr = cur.cell_header()?;
                    sheet.set_value(addr, CellValue::Number(cur.rk()?));
                }
                RecordKind::MulRk => Self::read_mulrk(&mut cur, sheet)?,
                RecordKind::BoolErr => {
                    let addr = cur.cell_header()?;
                    let [value, is_error] = cur.bytes::<2>()?;
                    let value = if is_error != 0 {
                        CellValue::Error(CellError::from_code(value))
                    } else {
                        CellValue::Boolean(value != 0)
                    };
                    sheet.set_value(addr, value);
                }
                RecordKind::Formula => awaiting_text = Self::read_formula(&mut cur, sheet)?,
                RecordKind::String => {
                    if let Some(addr) = awaiting {
                        let text = read_unicode_string(&mut cur)?;
                        sheet.set_value(
                            addr,
                            CellValue::formula(String::new(), Some(CellValue::string(text))),
                        );
                    }
                }
                _ => {
                    // Formatting and layout records carry no values; they
                    // may sit between a FORMULA and its STRING
                    awaiting_text = awaiting;
                }
            }
        }

        Ok(())
    }

    /// Row, first column, `(xf, rk)` pairs, then the last column
    fn read_mulrk(cur: &mut RecordCursor<'_>, sheet: &mut Worksheet) -> XlsResult<()> {
        let row = u32::from(cur.u16()?) + 1;
        let first = u32::from(cur.u16()?) + 1;
        let pairs = cur.remaining().saturating_sub(2) / 6;

        for col in first..first + pairs as u32 {
            cur.skip(2)?;
            sheet.set_cell_value_at(row, col, CellValue::Number(cur.rk()?))?;
        }

        let last = u32::from(cur.u16()?) + 1;
        if last + 1 != first + pairs as u32 {
            log::warn!(
                "MULRK in row {} ends at column {} but holds {} values from column {}",
                row,
                last,
                pairs,
                first
            );
        }
        Ok(())
    }

    /// Store a formula cell holding only its cached result
    ///
    /// Token streams are not decompiled. Returns the address when the result
    /// is text, which arrives in the following STRING record.
    fn read_formula(
        cur: &mut RecordCursor<'_>,
        sheet: &mut Worksheet,
    ) -> XlsResult<Option<CellAddress>> {
        let addr = cur.cell_header()?;
        let result: [u8; 8] = cur.bytes()?;

        // 0xFFFF in the top two bytes marks a non-numeric result typed by byte 0
        let cached = if result[6..] == [0xFF, 0xFF] {
            match result[0] {
                0x00 => {
                    sheet.set_value(addr, CellValue::formula(String::new(), None));
                    return Ok(Some(addr));
                }
                0x01 => Some(CellValue::Boolean(result[2] != 0)),
                0x02 => Some(CellValue::Error(CellError::from_code(result[2]))),
                0x03 => Some(CellValue::string("")),
                other => {
                    log::warn!("unknown FORMULA result type 0x{other:02X} at {addr}");
                    None
                }
            }
        } else {
            Some(CellValue::Number(f64::from_le_bytes(result)))
        };

        sheet.set_value(addr, CellValue::formula(String::new(), cached));
        Ok(None)
    }
}
