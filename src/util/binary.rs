//! Fixed-width little-endian primitives and length-prefixed encodings.
//!
//! Every multi-byte value in a SPOC file is little-endian. Reading goes
//! through [`ByteReader`], a bounds-checked cursor over a borrowed slice;
//! writing goes through `byteorder`'s `WriteBytesExt` on any `Write`.

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use super::{Error, Result};

/// Bounds-checked cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a cursor at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the slice.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Borrow the next `len` bytes and advance.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::UnexpectedEof(self.data.len() as u64))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    /// Read a `u32` length prefix followed by that many bytes.
    pub fn read_prefixed_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32()? as usize;
        self.take(len)
    }

    /// Read a `u64` length prefix followed by that many bytes.
    pub fn read_block(&mut self) -> Result<&'a [u8]> {
        let len = usize::try_from(self.read_u64()?)
            .map_err(|_| Error::UnexpectedEof(self.data.len() as u64))?;
        self.take(len)
    }
}

/// Write a `u32` length prefix followed by `bytes`.
pub fn write_prefixed_bytes<W: Write>(w: &mut W, bytes: &[u8]) -> Result<()> {
    let len = u32::try_from(bytes.len()).map_err(|_| Error::WktTooLong(bytes.len()))?;
    w.write_u32::<LittleEndian>(len)?;
    w.write_all(bytes)?;
    Ok(())
}

/// Write a `u64` length prefix followed by `bytes`.
pub fn write_block<W: Write>(w: &mut W, bytes: &[u8]) -> Result<()> {
    w.write_u64::<LittleEndian>(bytes.len() as u64)?;
    w.write_all(bytes)?;
    Ok(())
}
