//! Frequency-dependent shift quantization
//!
//! Each coefficient of a transformed block is divided by a power of two
//! chosen from the block-wide `scale` byte and the coefficient's
//! position:
//!
//! ```text
//! ┌────┬────┬─────────┐
//! │ s  │s+2 │         │   s   = scale   (lowest frequencies, size/4)
//! ├────┼────┤   s+5   │   s+2 = rest of the low-frequency quadrant
//! │s+2 │s+2 │         │   s+5 = high-frequency detail
//! ├────┴────┼─────────┤
//! │   s+5   │   s+5   │
//! └─────────┴─────────┘
//! ```
//!
//! Quantization rounds symmetrically: `sign(v) · ((|v| + 2^(shift-1)) >> shift)`.
//! Dequantization is `v << shift`, so the reconstruction error is below
//! `2^shift` and `shift == 0` is exactly lossless.

/// Shifts of 16 or more flatten every 16-bit coefficient to zero;
/// treating them uniformly also keeps `<<`/`>>` amounts well-defined.
const SHIFT_LIMIT: u32 = 16;

/// Shift amount for the coefficient at (row, col) of a `size`-wide block.
#[inline]
#[must_use]
pub fn shift_for(row: usize, col: usize, size: usize, scale: u8) -> u32 {
    let base = scale as u32;
    if row < size / 4 && col < size / 4 {
        base
    } else if row < size / 2 && col < size / 2 {
        base + 2
    } else {
        base + 5
    }
}

/// Quantize a single coefficient by `shift`.
#[inline]
#[must_use]
pub fn quantize(value: i16, shift: u32) -> i16 {
    if shift == 0 {
        return value;
    }
    if shift >= SHIFT_LIMIT {
        return 0;
    }
    let magnitude = (value as i32).abs();
    let rounded = (magnitude + (1 << (shift - 1))) >> shift;
    if value < 0 {
        -rounded as i16
    } else {
        rounded as i16
    }
}

/// Dequantize a single coefficient by `shift`. Exact only for
/// `shift == 0`; otherwise reconstructs `quantized << shift`.
///
/// Reconstruction stays in the 16-bit sample model: a value whose
/// rounded magnitude reaches past `i16::MAX` (only possible within
/// `2^(shift-1)` of the range limit) wraps two's-complement, e.g.
/// `v = 32767, shift = 1` quantizes to 16384 and reconstructs as
/// `-32768`.
#[inline]
#[must_use]
pub fn dequantize(value: i16, shift: u32) -> i16 {
    if shift == 0 || shift >= SHIFT_LIMIT {
        return if shift == 0 { value } else { 0 };
    }
    ((value as i32) << shift) as i16
}

/// Quantize a square block in place.
pub fn quantize_block(block: &mut [i16], size: usize, scale: u8) {
    debug_assert_eq!(block.len(), size * size);
    for row in 0..size {
        for col in 0..size {
            let shift = shift_for(row, col, size, scale);
            block[row * size + col] = quantize(block[row * size + col], shift);
        }
    }
}

/// Dequantize a square block in place.
pub fn dequantize_block(block: &mut [i16], size: usize, scale: u8) {
    debug_assert_eq!(block.len(), size * size);
    for row in 0..size {
        for col in 0..size {
            let shift = shift_for(row, col, size, scale);
            block[row * size + col] = dequantize(block[row * size + col], shift);
        }
    }
}
