//! Golomb-Rice + run-length entropy coding
//!
//! Quantized block coefficients are reinterpreted as u16 (bit pattern
//! preserved) and run-length encoded in zigzag order: each maximal run
//! of identical values becomes a `(length, value)` pair. The run length
//! is Rice-coded with k = 1, the value with k = 15. Runs longer than
//! 65535 split into multiple pairs.
//!
//! # Rice code
//!
//! For value `v` and parameter `k`: `q = v >> k` is written in unary
//! (`q` one-bits and a terminating zero), then the remainder
//! `r = v & (2^k - 1)` in exactly `k` bits, MSB first.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::bitstream::{BitReader, BitWriter};
use crate::error::CodecError;

/// Rice parameter for run lengths.
const K_LENGTH: u32 = 1;
/// Rice parameter for coefficient values.
const K_VALUE: u32 = 15;
/// Longest run a single `(length, value)` pair can carry.
const MAX_RUN: usize = u16::MAX as usize;

/// Rice-encode `value` with parameter `k`.
pub fn rice_encode(writer: &mut BitWriter, value: u16, k: u32) {
    debug_assert!(k <= 15);
    let q = (value as u32) >> k;
    for _ in 0..q {
        writer.write_bit(true);
    }
    writer.write_bit(false);
    if k > 0 {
        writer.write_bits(value as u32 & ((1 << k) - 1), k);
    }
}

/// Decode one Rice-coded value with parameter `k`.
///
/// # Errors
///
/// [`CodecError::Eof`] when the stream ends inside a codeword.
pub fn rice_decode(reader: &mut BitReader<'_>, k: u32) -> Result<u16, CodecError> {
    debug_assert!(k <= 15);
    let mut q = 0u32;
    while reader.read_bit()? {
        q += 1;
    }
    let r = if k > 0 { reader.read_bits(k)? } else { 0 };
    Ok(((q << k) | r) as u16)
}

/// Run-length encode a zigzag-ordered coefficient sequence. Signed
/// values pass through as their u16 bit pattern.
pub fn encode_coefficients(writer: &mut BitWriter, coefficients: &[i16]) {
    let mut i = 0;
    while i < coefficients.len() {
        let value = coefficients[i];
        let mut run = 1;
        while i + run < coefficients.len() && coefficients[i + run] == value && run < MAX_RUN {
            run += 1;
        }
        rice_encode(writer, run as u16, K_LENGTH);
        rice_encode(writer, value as u16, K_VALUE);
        i += run;
    }
}

/// Decode exactly `count` coefficients.
///
/// # Errors
///
/// [`CodecError::Eof`] when the stream ends early or a run overshoots
/// `count` (both mean the block payload is corrupt).
pub fn decode_coefficients(
    reader: &mut BitReader<'_>,
    count: usize,
) -> Result<Vec<i16>, CodecError> {
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let run = rice_decode(reader, K_LENGTH)? as usize;
        let value = rice_decode(reader, K_VALUE)? as i16;
        if run == 0 || out.len() + run > count {
            return Err(CodecError::Eof);
        }
        for _ in 0..run {
            out.push(value);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn roundtrip_one(value: u16, k: u32) -> u16 {
        let mut w = BitWriter::new();
        rice_encode(&mut w, value, k);
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        rice_decode(&mut r, k).unwrap()
    }

    #[test]
    fn test_rice_roundtrip_boundaries() {
        for k in 0..=15 {
            for value in [0u16, 1, 2, 255, 256, 32767, 65535] {
                assert_eq!(roundtrip_one(value, k), value, "k={k} value={value}");
            }
        }
    }

    #[test]
    fn test_rice_roundtrip_random() {
        let mut rng = StdRng::seed_from_u64(0x21CE);
        for _ in 0..2000 {
            let value: u16 = rng.gen();
            let k = rng.gen_range(0..=15);
            assert_eq!(roundtrip_one(value, k), value);
        }
    }

    #[test]
    fn test_rice_codeword_shape() {
        // v=5, k=1: q=2, r=1 → 110 1 → 1101_0000
        let mut w = BitWriter::new();
        rice_encode(&mut w, 5, 1);
        assert_eq!(w.finish(), vec![0b1101_0000]);
    }

    #[test]
    fn test_rice_k0_is_pure_unary() {
        let mut w = BitWriter::new();
        rice_encode(&mut w, 3, 0);
        assert_eq!(w.finish(), vec![0b1110_0000]);
    }

    fn rle_roundtrip(coefficients: &[i16]) -> Vec<i16> {
        let mut w = BitWriter::new();
        encode_coefficients(&mut w, coefficients);
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        decode_coefficients(&mut r, coefficients.len()).unwrap()
    }

    #[test]
    fn test_rle_all_equal() {
        let coefficients = [0i16; 256];
        assert_eq!(rle_roundtrip(&coefficients), coefficients);
        let coefficients = [-3i16; 256];
        assert_eq!(rle_roundtrip(&coefficients), coefficients);
    }

    #[test]
    fn test_rle_alternating() {
        let coefficients: Vec<i16> = (0..256).map(|i| if i % 2 == 0 { 7 } else { -7 }).collect();
        assert_eq!(rle_roundtrip(&coefficients), coefficients);
    }

    #[test]
    fn test_rle_random_blocks() {
        let mut rng = StdRng::seed_from_u64(0x41E5);
        for _ in 0..50 {
            let coefficients: Vec<i16> = (0..256)
                .map(|_| if rng.gen_bool(0.7) { 0 } else { rng.gen() })
                .collect();
            assert_eq!(rle_roundtrip(&coefficients), coefficients);
        }
    }

    #[test]
    fn test_rle_negative_bit_patterns_survive() {
        let coefficients = [i16::MIN, -1, -1, -1, i16::MAX, 0, 0, 0];
        assert_eq!(rle_roundtrip(&coefficients), coefficients);
    }

    #[test]
    fn test_decode_truncated_is_eof() {
        let mut w = BitWriter::new();
        encode_coefficients(&mut w, &[1i16; 256]);
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes[..bytes.len() - 1]);
        // 256 ones needs every byte; truncating must fail cleanly.
        assert_eq!(decode_coefficients(&mut r, 256), Err(CodecError::Eof));
    }

    #[test]
    fn test_decode_overshoot_is_error() {
        // Encode a run of 10 but ask for only 4 coefficients.
        let mut w = BitWriter::new();
        rice_encode(&mut w, 10, 1);
        rice_encode(&mut w, 42, 15);
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        assert_eq!(decode_coefficients(&mut r, 4), Err(CodecError::Eof));
    }

    #[test]
    fn test_long_run_splitting() {
        // 70000 identical values exceed the u16 run limit and must split.
        #[cfg(not(feature = "std"))]
        use alloc::vec;
        let coefficients = vec![9i16; 70000];
        let mut w = BitWriter::new();
        encode_coefficients(&mut w, &coefficients);
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        assert_eq!(
            decode_coefficients(&mut r, coefficients.len()).unwrap(),
            coefficients
        );
    }
}
