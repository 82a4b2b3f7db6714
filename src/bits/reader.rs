/*
# Bytes Reader Module

 Bounds-checked big-endian reading over an in-memory byte buffer. Every box parser and decoder
 in the crate sits on top of these primitives.

 Key components:
 - ByteCursor: sequential reader with a read offset (`read_u32_be`, `read_u64_be`,
   `read_fourcc`, `skip`, `take`, `bytes_remaining`)
 - Offset readers: `be_u16_at()`, `be_u32_at()`, `be_u64_at()` for fixed-layout payload fields
 - Fixed-point helper: `fixed_16_16_int()`

 Values are assembled byte by byte, never through unaligned loads, and no operation panics on
 short input.
*/

use crate::errors::BoxError;
use crate::mp4::FourCC;

/// Sequential big-endian reader over an immutable byte buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes between the read offset and the end of the buffer.
    pub fn bytes_remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn check_available(&self, count: usize) -> Result<(), BoxError> {
        if count > self.bytes_remaining() {
            return Err(BoxError::OutOfData {
                needed: count,
                remaining: self.bytes_remaining(),
            });
        }
        Ok(())
    }

    /// Read a 16-bit big endian value.
    pub fn read_u16_be(&mut self) -> Result<u16, BoxError> {
        self.check_available(2)?;
        let b = &self.data[self.pos..self.pos + 2];
        self.pos += 2;
        Ok(((b[0] as u16) << 8) | b[1] as u16)
    }

    /// Read a 32-bit big endian value.
    pub fn read_u32_be(&mut self) -> Result<u32, BoxError> {
        self.check_available(4)?;
        let b = &self.data[self.pos..self.pos + 4];
        self.pos += 4;
        Ok(((b[0] as u32) << 24) | ((b[1] as u32) << 16) | ((b[2] as u32) << 8) | b[3] as u32)
    }

    /// Read a 64-bit big endian value.
    pub fn read_u64_be(&mut self) -> Result<u64, BoxError> {
        self.check_available(8)?;
        let mut value = 0u64;
        for byte in &self.data[self.pos..self.pos + 8] {
            value = (value << 8) | *byte as u64;
        }
        self.pos += 8;
        Ok(value)
    }

    /// Read a four character code. Fails with `InvalidAtomType` on non-ASCII bytes.
    pub fn read_fourcc(&mut self) -> Result<FourCC, BoxError> {
        self.check_available(4)?;
        let bytes = [
            self.data[self.pos],
            self.data[self.pos + 1],
            self.data[self.pos + 2],
            self.data[self.pos + 3],
        ];
        if !bytes.is_ascii() {
            return Err(BoxError::InvalidAtomType { bytes });
        }
        self.pos += 4;
        Ok(FourCC::new(bytes))
    }

    /// Advance the read offset by `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<(), BoxError> {
        self.check_available(count)?;
        self.pos += count;
        Ok(())
    }

    /// Borrow the next `count` bytes and advance past them.
    pub fn take(&mut self, count: usize) -> Result<&'a [u8], BoxError> {
        self.check_available(count)?;
        let chunk = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(chunk)
    }
}

/// Read a 16-bit big endian value at a fixed offset.
pub fn be_u16_at(data: &[u8], offset: usize) -> Option<u16> {
    let b = data.get(offset..offset.checked_add(2)?)?;
    Some(((b[0] as u16) << 8) | b[1] as u16)
}

/// Read a 32-bit big endian value at a fixed offset.
pub fn be_u32_at(data: &[u8], offset: usize) -> Option<u32> {
    let mut cursor = ByteCursor::new(data.get(offset..)?);
    cursor.read_u32_be().ok()
}

/// Read a 64-bit big endian value at a fixed offset.
pub fn be_u64_at(data: &[u8], offset: usize) -> Option<u64> {
    let mut cursor = ByteCursor::new(data.get(offset..)?);
    cursor.read_u64_be().ok()
}

/// Integer part of a 16.16 fixed-point value (fraction truncated).
pub fn fixed_16_16_int(raw: u32) -> u32 {
    raw >> 16
}
