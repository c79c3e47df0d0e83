//! BIFF8 record stream
//!
//! A BIFF8 stream is a sequence of records, each a 2-byte type and a 2-byte
//! body length followed by the body. Bodies longer than 8224 bytes spill
//! into CONTINUE records, which [`read_all_records`] folds back into the
//! record they extend.

pub mod cursor;
pub mod strings;

use std::io::{Read, Seek};

use crate::error::{XlsError, XlsResult};

pub use cursor::RecordCursor;

/// BOF version field of a BIFF8 stream
pub const BIFF8_VERSION: u16 = 0x0600;

/// The record types the reader acts on; everything else is [`RecordKind::Other`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Bof,
    Eof,
    Continue,
    BoundSheet,
    Sst,
    LabelSst,
    Label,
    Number,
    Rk,
    MulRk,
    BoolErr,
    Formula,
    /// Cached text of the FORMULA record before it
    String,
    Other(u16),
}

impl RecordKind {
    pub fn from_id(id: u16) -> Self {
        match id {
            0x0809 => RecordKind::Bof,
            0x000A => RecordKind::Eof,
            0x003C => RecordKind::Continue,
            0x0085 => RecordKind::BoundSheet,
            0x00FC => RecordKind::Sst,
            0x00FD => RecordKind::LabelSst,
            0x0204 => RecordKind::Label,
            0x0203 => RecordKind::Number,
            0x027E => RecordKind::Rk,
            0x00BD => RecordKind::MulRk,
            0x0205 => RecordKind::BoolErr,
            0x0006 => RecordKind::Formula,
            0x0207 => RecordKind::String,
            other => RecordKind::Other(other),
        }
    }
}

/// One record with its CONTINUE bodies appended
#[derive(Debug)]
pub struct BiffRecord {
    pub kind: RecordKind,
    pub data: Vec<u8>,
    /// Where each appended CONTINUE body starts within `data`
    pub continue_offsets: Vec<usize>,
    /// Offset of the record header in the stream
    pub stream_offset: u64,
}

impl BiffRecord {
    pub fn cursor(&self) -> RecordCursor<'_> {
        RecordCursor::new(&self.data)
    }
}

/// Read every record up to the end of the stream
pub fn read_all_records<R: Read + Seek>(stream: &mut R) -> XlsResult<Vec<BiffRecord>> {
    let mut records: Vec<BiffRecord> = Vec::new();

    loop {
        let stream_offset = stream.stream_position()?;

        let mut header = [0u8; 4];
        match stream.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(XlsError::Io(e)),
        }
        let mut head = RecordCursor::new(&header);
        let kind = RecordKind::from_id(head.u16()?);
        let mut data = vec![0u8; usize::from(head.u16()?)];
        stream.read_exact(&mut data)?;

        if kind == RecordKind::Continue {
            match records.last_mut() {
                Some(prev) => {
                    prev.continue_offsets.push(prev.data.len());
                    prev.data.extend_from_slice(&data);
                }
                None => {
                    log::warn!("dropping CONTINUE record with no parent at offset {stream_offset}")
                }
            }
            continue;
        }

        records.push(BiffRecord {
            kind,
            data,
            continue_offsets: Vec::new(),
            stream_offset,
        });
    }

    Ok(records)
}

/// Kind of substream a BOF record opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substream {
    Globals,
    Worksheet,
    Other(u16),
}

/// Version and substream fields of a BOF record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bof {
    pub version: u16,
    pub substream: Substream,
}

impl Bof {
    pub fn parse(data: &[u8]) -> XlsResult<Self> {
        let mut cur = RecordCursor::new(data);
        let version = cur
            .u16()
            .map_err(|_| XlsError::InvalidFormat("BOF record too short".into()))?;
        let substream = match cur
            .u16()
            .map_err(|_| XlsError::InvalidFormat("BOF record too short".into()))?
        {
            0x0005 => Substream::Globals,
            0x0010 => Substream::Worksheet,
            other => Substream::Other(other),
        };
        Ok(Self { version, substream })
    }
}
