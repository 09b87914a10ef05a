//! Bitstream primitives
//!
//! [`BitWriter`] packs bits MSB-first into bytes, buffering a partial
//! byte until eight bits accumulate or an explicit [`BitWriter::align`]
//! pads the remainder with zero bits. [`BitReader`] consumes bits in the
//! same order and fails with [`CodecError::Eof`] past the end of the
//! input.
//!
//! [`ByteReader`] is the byte-level companion used for container
//! framing: fixed-width big-endian u16/u32 fields and length-delimited
//! sub-slices.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::error::CodecError;

/// MSB-first bit packer.
#[derive(Clone, Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    /// Pending bits, left-aligned in the byte.
    pending: u8,
    /// Number of valid bits in `pending` (0..8).
    count: u32,
}

impl BitWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.pending |= 0x80 >> self.count;
        }
        self.count += 1;
        if self.count == 8 {
            self.bytes.push(self.pending);
            self.pending = 0;
            self.count = 0;
        }
    }

    /// Append the low `n` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u32, n: u32) {
        debug_assert!(n <= 32);
        for i in (0..n).rev() {
            self.write_bit(value >> i & 1 != 0);
        }
    }

    /// Pad any partial byte with zero bits so the next write starts
    /// byte-aligned.
    pub fn align(&mut self) {
        if self.count > 0 {
            self.bytes.push(self.pending);
            self.pending = 0;
            self.count = 0;
        }
    }

    /// Align, then append a whole byte. Used for the per-block scale
    /// header so every coded block payload starts byte-aligned.
    pub fn write_aligned_byte(&mut self, byte: u8) {
        self.align();
        self.bytes.push(byte);
    }

    /// Bits written so far, including pending ones.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.count as usize
    }

    /// Flush and return the packed bytes.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.align();
        self.bytes
    }
}

/// MSB-first bit consumer over a borrowed byte slice.
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    /// Absolute bit position from the start of `bytes`.
    pos: usize,
}

impl<'a> BitReader<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Read one bit.
    ///
    /// # Errors
    ///
    /// [`CodecError::Eof`] when the input is exhausted.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool, CodecError> {
        let byte = self.pos / 8;
        if byte >= self.bytes.len() {
            return Err(CodecError::Eof);
        }
        let bit = self.bytes[byte] >> (7 - self.pos % 8) & 1;
        self.pos += 1;
        Ok(bit != 0)
    }

    /// Read `n` bits MSB-first into the low bits of the result.
    ///
    /// # Errors
    ///
    /// [`CodecError::Eof`] when fewer than `n` bits remain.
    pub fn read_bits(&mut self, n: u32) -> Result<u32, CodecError> {
        debug_assert!(n <= 32);
        let mut value = 0u32;
        for _ in 0..n {
            value = (value << 1) | self.read_bit()? as u32;
        }
        Ok(value)
    }

    /// Skip to the next byte boundary and return that byte.
    ///
    /// # Errors
    ///
    /// [`CodecError::Eof`] when no full byte remains.
    pub fn read_aligned_byte(&mut self) -> Result<u8, CodecError> {
        let byte = self.pos.div_ceil(8);
        if byte >= self.bytes.len() {
            return Err(CodecError::Eof);
        }
        self.pos = (byte + 1) * 8;
        Ok(self.bytes[byte])
    }
}

/// Cursor over container bytes: big-endian integers and length-framed
/// sub-slices.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Take the next `n` bytes as a sub-slice.
    ///
    /// # Errors
    ///
    /// [`CodecError::Eof`] when fewer than `n` bytes remain.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::Eof);
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

/// Append a big-endian u16.
#[inline]
pub fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Append a big-endian u32.
#[inline]
pub fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_packing() {
        let mut w = BitWriter::new();
        w.write_bit(true);
        w.write_bits(0b0110, 4);
        w.write_bits(0b101, 3);
        assert_eq!(w.finish(), vec![0b1011_0101]);
    }

    #[test]
    fn test_flush_pads_with_zeros() {
        let mut w = BitWriter::new();
        w.write_bits(0b11, 2);
        assert_eq!(w.finish(), vec![0b1100_0000]);
    }

    #[test]
    fn test_aligned_byte_flushes_partial() {
        let mut w = BitWriter::new();
        w.write_bits(0b101, 3);
        w.write_aligned_byte(0xEE);
        w.write_bit(true);
        let bytes = w.finish();
        assert_eq!(bytes, vec![0b1010_0000, 0xEE, 0b1000_0000]);
    }

    #[test]
    fn test_reader_roundtrip() {
        let mut w = BitWriter::new();
        w.write_bits(0x2A, 7);
        w.write_bits(0x1FFFF, 17);
        w.write_bit(false);
        let bytes = w.finish();

        let mut r = BitReader::new(&bytes);
        assert_eq!(r.read_bits(7).unwrap(), 0x2A);
        assert_eq!(r.read_bits(17).unwrap(), 0x1FFFF);
        assert!(!r.read_bit().unwrap());
    }

    #[test]
    fn test_reader_eof() {
        let bytes = [0xFFu8];
        let mut r = BitReader::new(&bytes);
        assert_eq!(r.read_bits(8).unwrap(), 0xFF);
        assert_eq!(r.read_bit(), Err(CodecError::Eof));
        assert_eq!(r.read_bits(4), Err(CodecError::Eof));
    }

    #[test]
    fn test_reader_aligned_byte_skips_partial() {
        let bytes = [0b1010_0000, 0x55, 0x66];
        let mut r = BitReader::new(&bytes);
        assert!(r.read_bit().unwrap());
        assert_eq!(r.read_aligned_byte().unwrap(), 0x55);
        assert_eq!(r.read_aligned_byte().unwrap(), 0x66);
        assert_eq!(r.read_aligned_byte(), Err(CodecError::Eof));
    }

    #[test]
    fn test_byte_reader_big_endian() {
        let mut buf = Vec::new();
        push_u16(&mut buf, 0x0102);
        push_u32(&mut buf, 0xA1B2C3D4);
        assert_eq!(buf, vec![0x01, 0x02, 0xA1, 0xB2, 0xC3, 0xD4]);

        let mut r = ByteReader::new(&buf);
        assert_eq!(r.read_u16().unwrap(), 0x0102);
        assert_eq!(r.read_u32().unwrap(), 0xA1B2C3D4);
        assert_eq!(r.read_u8(), Err(CodecError::Eof));
    }

    #[test]
    fn test_byte_reader_take() {
        let buf = [1u8, 2, 3, 4];
        let mut r = ByteReader::new(&buf);
        assert_eq!(r.take(3).unwrap(), &[1, 2, 3]);
        assert_eq!(r.remaining(), 1);
        assert_eq!(r.take(2), Err(CodecError::Eof));
    }
}
