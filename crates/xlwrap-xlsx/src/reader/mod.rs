//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use xlwrap_core::{CellAddress, CellError, CellValue, SharedStrings, Workbook, Worksheet};

/// Path of the VBA project part inside a macro-enabled package
pub(crate) const VBA_PROJECT_PART: &str = "xl/vbaProject.bin";

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' {
            // Check if this looks like _xHHHH_
            let mut hex_chars = String::new();
            let mut saw_x = false;
            let mut is_escape = false;

            if chars.peek() == Some(&'x') {
                chars.next(); // consume 'x'
                saw_x = true;

                // Try to read 4 hex digits
                for _ in 0..4 {
                    match chars.peek() {
                        Some(&ch) if ch.is_ascii_hexdigit() => {
                            hex_chars.push(ch);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                // Check for closing underscore
                if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                    if let Some(decoded) = u32::from_str_radix(&hex_chars, 16)
                        .ok()
                        .and_then(char::from_u32)
                    {
                        chars.next(); // consume closing '_'
                        result.push(decoded);
                        is_escape = true;
                    }
                }
            }

            if !is_escape {
                // Not a valid escape sequence, output what we consumed
                result.push('_');
                if saw_x {
                    result.push('x');
                }
                result.push_str(&hex_chars);
            }
        } else {
            result.push(c);
        }
    }

    result
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

/// Everything the reader keeps from an OOXML package
#[derive(Debug)]
pub struct XlsxPackage {
    /// Sheets and cell values
    pub workbook: Workbook,
    /// Raw `xl/vbaProject.bin`, present in macro-enabled files
    pub vba_project: Option<Vec<u8>>,
}

/// Cell being assembled between `<c>` and `</c>`
#[derive(Default)]
struct PendingCell {
    addr: Option<CellAddress>,
    cell_type: Option<String>,
    value: Option<String>,
    formula: Option<String>,
    inline_text: Option<String>,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        Ok(Self::read_package_file(path)?.workbook)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        Ok(Self::read_package(reader)?.workbook)
    }

    /// Read a workbook and its VBA project from a file path
    pub fn read_package_file<P: AsRef<Path>>(path: P) -> XlsxResult<XlsxPackage> {
        let file = File::open(path)?;
        Self::read_package(file)
    }

    /// Read a workbook and its VBA project from a reader
    pub fn read_package<R: Read + Seek>(reader: R) -> XlsxResult<XlsxPackage> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an OOXML package
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        // Read shared strings (if present)
        let shared_strings = Self::read_shared_strings(&mut archive)?;

        // Read workbook.xml to get sheet info
        let sheet_info = Self::read_workbook_xml(&mut archive)?;

        // Read workbook.xml.rels to get sheet paths
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut workbook = Workbook::empty();
        for (name, r_id) in &sheet_info {
            match sheet_paths.get(r_id) {
                Some(path) => {
                    let mut worksheet = Worksheet::new(name.as_str());
                    Self::read_worksheet(&mut archive, path, &mut worksheet, &shared_strings)?;
                    workbook.add_existing_worksheet(worksheet)?;
                }
                None => log::warn!("sheet '{}' has no worksheet relationship {}", name, r_id),
            }
        }

        if workbook.is_empty() {
            return Err(XlsxError::InvalidFormat("workbook has no worksheets".into()));
        }

        let vba_project = Self::read_vba_project(&mut archive)?;

        Ok(XlsxPackage {
            workbook,
            vba_project,
        })
    }

    /// Read the raw VBA project part, if the package has one
    fn read_vba_project<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Option<Vec<u8>>> {
        let mut file = match archive.by_name(VBA_PROJECT_PART) {
            Ok(f) => f,
            Err(_) => return Ok(None),
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<SharedStrings> {
        let mut strings = SharedStrings::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        // Keep whitespace inside <t> verbatim
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => {
                        in_t = true;
                    }
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push("");
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(&decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => {
                        in_t = false;
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => match e.unescape() {
                    Ok(text) => current_string.push_str(&text),
                    Err(err) => log::warn!("undecodable shared string text: {err}"),
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let name = attr_value(&e, b"name");
                    let r_id = attr_value(&e, b"r:id");

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ folder
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read a worksheet's cell values from the archive
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &SharedStrings,
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(false);

        let mut buf = Vec::new();

        // Position tracking for cells that omit the `r` attribute
        let mut row_num: u32 = 0;
        let mut last_col: u32 = 0;

        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_formula = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        row_num = attr_value(&e, b"r")
                            .and_then(|s| s.parse::<u32>().ok())
                            .unwrap_or(row_num + 1);
                        last_col = 0;
                    }
                    b"c" => {
                        let pending = Self::start_cell(&e, row_num, last_col)?;
                        if let Some(addr) = pending.addr {
                            row_num = addr.row;
                            last_col = addr.col;
                        }
                        cell = Some(pending);
                    }
                    b"v" if cell.is_some() => in_value = true,
                    b"f" if cell.is_some() => in_formula = true,
                    b"is" => {
                        if let Some(pending) = cell.as_mut() {
                            // `<is><t></t></is>` has no text event but is still ""
                            pending.inline_text.get_or_insert_with(String::new);
                            in_inline_str = true;
                        }
                    }
                    b"t" if in_inline_str => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => {
                        row_num = attr_value(&e, b"r")
                            .and_then(|s| s.parse::<u32>().ok())
                            .unwrap_or(row_num + 1);
                        last_col = 0;
                    }
                    b"c" => {
                        // Style-only cell; it still occupies a column position
                        let pending = Self::start_cell(&e, row_num, last_col)?;
                        if let Some(addr) = pending.addr {
                            row_num = addr.row;
                            last_col = addr.col;
                        }
                    }
                    b"is" => {
                        if let Some(pending) = cell.as_mut() {
                            pending.inline_text.get_or_insert_with(String::new);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if let Some(pending) = cell.as_mut() {
                        let target = if in_value {
                            Some(&mut pending.value)
                        } else if in_formula {
                            Some(&mut pending.formula)
                        } else if in_inline_text {
                            Some(&mut pending.inline_text)
                        } else {
                            None
                        };
                        if let Some(slot) = target {
                            let text = e.unescape()?;
                            slot.get_or_insert_with(String::new).push_str(&text);
                        }
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            Self::process_cell(worksheet, pending, shared_strings)?;
                        }
                    }
                    b"v" => in_value = false,
                    b"f" => in_formula = false,
                    b"is" => in_inline_str = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// Parse the attributes of a `<c>` element
    fn start_cell(e: &BytesStart, row_num: u32, last_col: u32) -> XlsxResult<PendingCell> {
        let addr = match attr_value(e, b"r") {
            Some(cell_ref) => CellAddress::parse(&cell_ref).map_err(|err| {
                XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, err))
            })?,
            None => CellAddress::new(row_num.max(1), last_col + 1)?,
        };

        Ok(PendingCell {
            addr: Some(addr),
            cell_type: attr_value(e, b"t"),
            ..PendingCell::default()
        })
    }

    /// Decode a `<v>` payload according to the cell's `t` attribute
    fn typed_value(
        cell_type: Option<&str>,
        value: &str,
        shared_strings: &SharedStrings,
    ) -> Option<CellValue> {
        let decoded = match cell_type {
            // Shared string
            Some("s") => {
                let idx = value.trim().parse::<usize>().ok();
                match idx.and_then(|i| shared_strings.cell_value(i)) {
                    Some(shared) => shared,
                    None => {
                        log::warn!("shared string index '{}' out of bounds", value);
                        return None;
                    }
                }
            }

            // Boolean
            Some("b") => CellValue::Boolean(value == "1" || value.eq_ignore_ascii_case("true")),

            // Error
            Some("e") => CellError::from_literal(value)
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::string(value)),

            // String result or inline text
            Some("str") | Some("inlineStr") => CellValue::string(decode_excel_escapes(value)),

            // Number (default type or explicit "n"); dates are serial numbers too
            None | Some("n") | Some("d") => match value.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::string(value),
            },

            Some(other) => {
                log::warn!("unknown cell type '{}', reading as text", other);
                CellValue::string(value)
            }
        };
        Some(decoded)
    }

    /// Store an assembled cell in the worksheet
    fn process_cell(
        worksheet: &mut Worksheet,
        cell: PendingCell,
        shared_strings: &SharedStrings,
    ) -> XlsxResult<()> {
        let Some(addr) = cell.addr else {
            return Ok(());
        };
        let cell_type = cell.cell_type.as_deref();

        let value = match (cell.formula, cell.inline_text) {
            (Some(f), _) => {
                let cached = cell
                    .value
                    .as_deref()
                    .and_then(|v| Self::typed_value(cell_type, v, shared_strings));

                // Ensure formula starts with '='
                let formula_text = if f.starts_with('=') {
                    f
                } else {
                    format!("={}", f)
                };
                CellValue::formula(formula_text, cached)
            }
            (None, Some(text)) => CellValue::string(decode_excel_escapes(&text)),
            (None, None) => match cell.value.as_deref() {
                Some(v) => match Self::typed_value(cell_type, v, shared_strings) {
                    Some(value) => value,
                    None => return Ok(()),
                },
                None => return Ok(()),
            },
        };

        worksheet.set_value(addr, value);
        Ok(())
    }
}
