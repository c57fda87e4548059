//! Bounds-checked access to an in-memory file buffer.
//!
//! Every read states its offset and length up front and either gets exactly
//! those bytes back or an [`Error::OutOfBounds`]. Offsets are `u64` so that
//! values lifted straight out of a header can be passed in without casts;
//! the arithmetic is checked, so absurd values fail instead of wrapping.

use crate::error::{Error, Result};

/// Read-only cursor-free view over a byte buffer.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    /// Wraps a buffer
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Number of bytes in the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns exactly `len` bytes starting at `offset`.
    pub fn read_bytes(&self, offset: u64, len: u64) -> Result<&'a [u8]> {
        let oob = || Error::out_of_bounds(offset, len, self.data.len());

        let start = usize::try_from(offset).map_err(|_| oob())?;
        let len_usize = usize::try_from(len).map_err(|_| oob())?;
        let end = start.checked_add(len_usize).ok_or_else(oob)?;

        self.data.get(start..end).ok_or_else(oob)
    }

    /// Reads a fixed-size array, handy for signatures.
    pub fn read_array<const N: usize>(&self, offset: u64) -> Result<[u8; N]> {
        let bytes = self.read_bytes(offset, N as u64)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads a little-endian unsigned integer of 1, 2, 4 or 8 bytes.
    pub fn read_uint(&self, offset: u64, width: usize) -> Result<u64> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(Error::InvalidWidth(width));
        }

        let bytes = self.read_bytes(offset, width as u64)?;
        Ok(bytes
            .iter()
            .rev()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte)))
    }

    /// Reads one byte
    pub fn read_u8(&self, offset: u64) -> Result<u8> {
        Ok(self.read_array::<1>(offset)?[0])
    }

    /// Reads a little-endian `u16`
    pub fn read_u16(&self, offset: u64) -> Result<u16> {
        self.read_array(offset).map(u16::from_le_bytes)
    }

    /// Reads a little-endian `u32`
    pub fn read_u32(&self, offset: u64) -> Result<u32> {
        self.read_array(offset).map(u32::from_le_bytes)
    }

    /// Reads a little-endian `u64`
    pub fn read_u64(&self, offset: u64) -> Result<u64> {
        self.read_array(offset).map(u64::from_le_bytes)
    }

    /// Returns a reader over `len` bytes at `offset`.
    ///
    /// Offsets passed to the returned reader are relative to `offset`, and
    /// reads past `len` fail even if the parent buffer continues.
    pub fn sub_reader(&self, offset: u64, len: u64) -> Result<ByteReader<'a>> {
        self.read_bytes(offset, len).map(ByteReader::new)
    }
}
