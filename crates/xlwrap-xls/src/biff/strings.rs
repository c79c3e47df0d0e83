//! BIFF8 string decoding
//!
//! A BIFF8 string is a character count, a flags byte, optional rich-text and
//! phonetic sizes, the characters, then the rich-text runs and phonetic data.
//! Flag bit 0 picks UTF-16LE over compressed Latin-1, bit 2 marks phonetic
//! data and bit 3 rich-text runs.
//!
//! SST entries may cross into a CONTINUE record. The continuation starts with
//! a fresh flags byte, so the encoding can change partway through a string.

use xlwrap_core::SharedStrings;

use super::RecordCursor;
use crate::error::{XlsError, XlsResult};

const WIDE: u8 = 0x01;
const PHONETIC: u8 = 0x04;
const RICH: u8 = 0x08;

/// Count, flags and the size of what follows the characters
struct StringHeader {
    chars: usize,
    flags: u8,
    trailer: usize,
}

impl StringHeader {
    fn read(cur: &mut RecordCursor<'_>) -> XlsResult<Self> {
        let chars = usize::from(cur.u16()?);
        let flags = cur.u8()?;
        let runs = if flags & RICH != 0 { cur.u16()? } else { 0 };
        let phonetic = if flags & PHONETIC != 0 { cur.u32()? } else { 0 };
        Ok(Self {
            chars,
            flags,
            trailer: usize::from(runs) * 4 + phonetic as usize,
        })
    }
}

/// String with a 1-byte count, as in BOUNDSHEET
pub fn read_short_string(cur: &mut RecordCursor<'_>) -> XlsResult<String> {
    let chars = usize::from(cur.u8()?);
    let flags = cur.u8()?;
    read_chars(cur, chars, flags)
}

/// String with a 2-byte count, as in LABEL and STRING
pub fn read_unicode_string(cur: &mut RecordCursor<'_>) -> XlsResult<String> {
    let header = StringHeader::read(cur)?;
    let text = read_chars(cur, header.chars, header.flags)?;
    cur.skip(header.trailer)?;
    Ok(text)
}

fn read_chars(cur: &mut RecordCursor<'_>, count: usize, flags: u8) -> XlsResult<String> {
    if flags & WIDE == 0 {
        return Ok(cur.take(count)?.iter().copied().map(char::from).collect());
    }
    let units: Vec<u16> = cur
        .take(count * 2)?
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| XlsError::Parse(format!("invalid UTF-16 string: {e}")))
}

/// Load an SST record body into `table`
///
/// `continue_offsets` are the positions where merged CONTINUE bodies begin.
/// An entry that cannot be decoded ends the table with a warning, keeping
/// the entries read so far.
pub fn parse_sst(
    data: &[u8],
    continue_offsets: &[usize],
    table: &mut SharedStrings,
) -> XlsResult<()> {
    let mut cur = RecordCursor::new(data);
    let _references = cur.u32()?;
    let unique = cur.u32()?;

    for i in 0..unique {
        match read_sst_entry(&mut cur, continue_offsets) {
            Ok(text) => {
                table.push(&text);
            }
            Err(e) => {
                log::warn!("SST entry {i} of {unique} unreadable: {e}");
                break;
            }
        }
    }

    Ok(())
}

fn read_sst_entry(cur: &mut RecordCursor<'_>, continue_offsets: &[usize]) -> XlsResult<String> {
    let header = StringHeader::read(cur)?;
    let end = cur.position() + cur.remaining();

    let mut flags = header.flags;
    let mut text = String::with_capacity(header.chars);
    let mut left = header.chars;
    while left > 0 {
        if continue_offsets.binary_search(&cur.position()).is_ok() {
            flags = cur.u8()?;
        }
        let segment_end = continue_offsets
            .iter()
            .copied()
            .find(|&start| start > cur.position())
            .unwrap_or(end);
        let width = if flags & WIDE != 0 { 2 } else { 1 };
        let count = left.min((segment_end - cur.position()) / width);
        if count == 0 {
            return Err(XlsError::Parse(format!(
                "SST string stops with {left} characters missing"
            )));
        }
        text.push_str(&read_chars(cur, count, flags)?);
        left -= count;
    }

    cur.skip(header.trailer)?;
    Ok(text)
}
