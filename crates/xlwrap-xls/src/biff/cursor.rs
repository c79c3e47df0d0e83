//! Bounds-checked reads over one record body

use xlwrap_core::CellAddress;

use crate::error::{XlsError, XlsResult};

/// Read position inside a BIFF8 record body
///
/// Every multi-byte field is little-endian. A read past the end of the body
/// fails without moving the position.
#[derive(Debug, Clone)]
pub struct RecordCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RecordCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The next `len` bytes
    pub fn take(&mut self, len: usize) -> XlsResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(XlsError::Parse(format!(
                "record body ends {} bytes after offset {}, {} needed",
                self.remaining(),
                self.pos,
                len
            )));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> XlsResult<()> {
        self.take(len).map(|_| ())
    }

    pub fn bytes<const N: usize>(&mut self) -> XlsResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> XlsResult<u8> {
        Ok(self.bytes::<1>()?[0])
    }

    pub fn u16(&mut self) -> XlsResult<u16> {
        self.bytes().map(u16::from_le_bytes)
    }

    pub fn u32(&mut self) -> XlsResult<u32> {
        self.bytes().map(u32::from_le_bytes)
    }

    pub fn f64(&mut self) -> XlsResult<f64> {
        self.bytes().map(f64::from_le_bytes)
    }

    /// A 4-byte RK number as used by RK and MULRK cells
    pub fn rk(&mut self) -> XlsResult<f64> {
        self.u32().map(decode_rk)
    }

    /// The zero-based row and column that open a cell record, followed by
    /// the XF index, returned as a one-based address
    pub fn cell_header(&mut self) -> XlsResult<CellAddress> {
        let row = self.u16()?;
        let col = self.u16()?;
        self.skip(2)?;
        Ok(CellAddress::new(u32::from(row) + 1, u32::from(col) + 1)?)
    }
}

/// Bit 1 selects a 30-bit signed integer over the top 30 bits of an f64;
/// bit 0 divides the result by 100.
fn decode_rk(rk: u32) -> f64 {
    let value = if rk & 0x02 != 0 {
        f64::from((rk as i32) >> 2)
    } else {
        f64::from_bits(u64::from(rk & !0x03) << 32)
    };
    if rk & 0x01 != 0 {
        value / 100.0
    } else {
        value
    }
}
