//! XLSX writer

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use crate::error::{XlsxError, XlsxResult};
use crate::reader::VBA_PROJECT_PART;
use xlwrap_core::{CellAddress, CellError, CellValue, Workbook, Worksheet};

const MAIN_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const MACRO_MAIN_CONTENT_TYPE: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";
const VBA_CONTENT_TYPE: &str = "application/vnd.ms-office.vbaProject";

/// Minimal stylesheet: one font, the two mandatory fills, one border, one xf
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <fonts count="1"><font><sz val="11"/><name val="Calibri"/><family val="2"/></font></fonts>
    <fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
    <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
    <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
    <cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
    <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#;

/// Package flavour being written
#[derive(Debug, Clone, Copy, Default)]
struct PackageKind<'a> {
    macro_enabled: bool,
    vba_project: Option<&'a [u8]>,
}

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(workbook, file)
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        Self::write_package(workbook, PackageKind::default(), writer)
    }

    /// Write a macro-enabled (xlsm) workbook, embedding `vba_project` unchanged
    pub fn write_macro_enabled<W: Write + Seek>(
        workbook: &Workbook,
        vba_project: Option<&[u8]>,
        writer: W,
    ) -> XlsxResult<()> {
        let kind = PackageKind {
            macro_enabled: true,
            vba_project,
        };
        Self::write_package(workbook, kind, writer)
    }

    fn write_package<W: Write + Seek>(
        workbook: &Workbook,
        kind: PackageKind<'_>,
        writer: W,
    ) -> XlsxResult<()> {
        if workbook.is_empty() {
            return Err(XlsxError::InvalidFormat(
                "a workbook needs at least one worksheet".into(),
            ));
        }

        let mut zip = zip::ZipWriter::new(writer);

        // Write [Content_Types].xml
        Self::write_content_types(&mut zip, workbook, kind)?;

        // Write _rels/.rels
        Self::write_root_rels(&mut zip)?;

        // Write xl/workbook.xml
        Self::write_workbook_xml(&mut zip, workbook)?;

        // Write xl/_rels/workbook.xml.rels
        Self::write_workbook_rels(&mut zip, workbook, kind)?;

        // Write xl/styles.xml
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(STYLES_XML.as_bytes())?;

        for (i, sheet) in workbook.worksheets().enumerate() {
            Self::write_worksheet(&mut zip, sheet, i)?;
        }

        if let Some(vba) = kind.vba_project {
            zip.start_file(VBA_PROJECT_PART, options)?;
            zip.write_all(vba)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
        kind: PackageKind<'_>,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>"#,
        );

        if kind.vba_project.is_some() {
            content.push_str(&format!(
                "\n    <Default Extension=\"bin\" ContentType=\"{}\"/>",
                VBA_CONTENT_TYPE
            ));
        }

        let main_type = if kind.macro_enabled {
            MACRO_MAIN_CONTENT_TYPE
        } else {
            MAIN_CONTENT_TYPE
        };
        content.push_str(&format!(
            r#"
    <Override PartName="/xl/workbook.xml" ContentType="{}"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
            main_type
        ));

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        );

        for (i, sheet) in workbook.worksheets().enumerate() {
            content.push_str(&format!(
                "\n        <sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>",
                escape_xml(sheet.name()),
                i + 1,
                i + 1
            ));
        }

        content.push_str("\n    </sheets>\n</workbook>");
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
        kind: PackageKind<'_>,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        let sheet_count = workbook.sheet_count();
        for i in 0..sheet_count {
            content.push_str(&format!(
                "\n    <Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet{}.xml\"/>",
                i + 1,
                i + 1
            ));
        }

        // Styles and the VBA project follow the worksheets
        content.push_str(&format!(
            "\n    <Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>",
            sheet_count + 1
        ));
        if kind.vba_project.is_some() {
            content.push_str(&format!(
                "\n    <Relationship Id=\"rId{}\" Type=\"http://schemas.microsoft.com/office/2006/relationships/vbaProject\" Target=\"vbaProject.bin\"/>",
                sheet_count + 2
            ));
        }

        content.push_str("\n</Relationships>");
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet: &Worksheet,
        index: usize,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !sheet.is_empty() {
            let last = CellAddress {
                row: sheet.max_row(),
                col: sheet.max_col(),
            };
            content.push_str(&format!("\n    <dimension ref=\"A1:{}\"/>", last));
        }

        content.push_str("\n    <sheetData>");

        // Sparse, row-major
        let mut current_row: Option<u32> = None;
        for (row, col, value) in sheet.iter_cells() {
            if current_row != Some(row) {
                if current_row.is_some() {
                    content.push_str("\n        </row>");
                }
                content.push_str(&format!("\n        <row r=\"{}\">", row));
                current_row = Some(row);
            }

            let cell_ref = CellAddress { row, col }.to_a1_string();
            content.push_str("\n            ");
            content.push_str(&cell_xml(&cell_ref, value));
        }

        if current_row.is_some() {
            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>\n</worksheet>");
        zip.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// The `t` attribute and `<v>` payload for a plain value
fn typed_payload(value: &CellValue) -> Option<(Option<&'static str>, String)> {
    match value {
        CellValue::Empty | CellValue::Formula { .. } => None,
        CellValue::Number(n) if n.is_finite() => Some((None, n.to_string())),
        // Non-finite numbers have no XML representation
        CellValue::Number(_) => Some((Some("e"), CellError::Num.as_str().to_string())),
        CellValue::String(s) => Some((Some("str"), escape_text(s))),
        CellValue::Boolean(b) => Some((Some("b"), if *b { "1" } else { "0" }.to_string())),
        CellValue::Error(e) => Some((Some("e"), escape_xml(e.as_str()))),
    }
}

fn cell_xml(cell_ref: &str, value: &CellValue) -> String {
    match value {
        CellValue::String(s) => format!(
            "<c r=\"{}\" t=\"inlineStr\"><is>{}</is></c>",
            cell_ref,
            text_element(s)
        ),
        CellValue::Formula { text, cached_value } => {
            let body = text.strip_prefix('=').unwrap_or(text);
            let cached = cached_value.as_deref().and_then(typed_payload);
            if body.is_empty() {
                // Nothing to recalculate from; keep the cached value only
                return match cached_value.as_deref() {
                    Some(inner) => cell_xml(cell_ref, inner),
                    None => String::new(),
                };
            }
            let type_attr = cached
                .as_ref()
                .and_then(|(t, _)| *t)
                .map(|t| format!(" t=\"{}\"", t))
                .unwrap_or_default();
            let cached_v = cached
                .map(|(_, v)| format!("<v>{}</v>", v))
                .unwrap_or_default();
            format!(
                "<c r=\"{}\"{}><f>{}</f>{}</c>",
                cell_ref,
                type_attr,
                escape_xml(body),
                cached_v
            )
        }
        other => match typed_payload(other) {
            Some((Some(t), v)) => format!("<c r=\"{}\" t=\"{}\"><v>{}</v></c>", cell_ref, t, v),
            Some((None, v)) => format!("<c r=\"{}\"><v>{}</v></c>", cell_ref, v),
            None => String::new(),
        },
    }
}

/// A `<t>` element, preserving leading and trailing whitespace
fn text_element(s: &str) -> String {
    let escaped = escape_text(s);
    if s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) {
        format!("<t xml:space=\"preserve\">{}</t>", escaped)
    } else {
        format!("<t>{}</t>", escaped)
    }
}

/// Escape text content, encoding characters XML 1.0 cannot carry as `_xHHHH_`
fn escape_text(s: &str) -> String {
    escape_xml(&encode_excel_escapes(s))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Inverse of the reader's `_xHHHH_` decoding
fn encode_excel_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        match c {
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 => out.push_str(&format!("_x{:04X}_", c as u32)),
            // A literal `_xHHHH_` would otherwise be decoded on the way back in
            '_' if looks_like_escape(&s[i..]) => out.push_str("_x005F_"),
            c => out.push(c),
        }
    }
    out
}

fn looks_like_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 7
        && bytes[0] == b'_'
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}
