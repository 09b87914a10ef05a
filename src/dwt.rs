//! Integer Wavelet Transform using Lifting Scheme
//!
//! Implements the reversible LeGall 5/3 wavelet as a two-step lifting
//! scheme over even-length i16 sequences:
//!
//! ```text
//! Split → Predict → Update → Merge
//!   ↓        ↓         ↓       ↓
//! even/odd  high -= ⌊(lowᵢ+lowᵢ₊₁)/2⌋   low += ⌊(highᵢ₋₁+highᵢ+2)/4⌋   [low… high…]
//! ```
//!
//! Boundary handling replicates the edge value: `low[last]` stands in
//! for the missing right neighbor during predict, `high[0]` for the
//! missing left neighbor during update.
//!
//! All arithmetic is integer; intermediate sums use i32 and every
//! lifting stage stores back to i16 with two's-complement truncation,
//! which keeps the transform exactly invertible for arbitrary i16 input.
//!
//! # Fixed kernels
//!
//! Sequences of length 8, 16, and 32 take a vectorized fast path built
//! on `wide` (`simd` feature). The scalar path is the correctness
//! oracle: kernel output is bit-identical, not approximate.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::{BLOCK_AREA, BLOCK_SIZE};

/// Forward 1D lifting transform.
///
/// `signal.len()` must be even and at least 2. Output layout is
/// `[low-pass… high-pass…]`.
pub fn forward_1d(signal: &mut [i16]) {
    #[cfg(feature = "simd")]
    match signal.len() {
        8 => return simd::forward_8(signal),
        16 => return simd::forward_16(signal),
        32 => return simd::forward_32(signal),
        _ => {}
    }
    forward_1d_scalar(signal);
}

/// Inverse 1D lifting transform; exact inverse of [`forward_1d`].
pub fn inverse_1d(signal: &mut [i16]) {
    #[cfg(feature = "simd")]
    match signal.len() {
        8 => return simd::inverse_8(signal),
        16 => return simd::inverse_16(signal),
        32 => return simd::inverse_32(signal),
        _ => {}
    }
    inverse_1d_scalar(signal);
}

/// Scalar reference forward transform. Handles every even length.
pub fn forward_1d_scalar(signal: &mut [i16]) {
    let n = signal.len();
    debug_assert!(n >= 2 && n % 2 == 0, "signal length must be even, got {n}");
    let half = n / 2;

    let mut low: Vec<i16> = (0..half).map(|i| signal[i * 2]).collect();
    let mut high: Vec<i16> = (0..half).map(|i| signal[i * 2 + 1]).collect();

    for i in 0..half {
        let right = low[(i + 1).min(half - 1)] as i32;
        let pred = (low[i] as i32 + right) >> 1;
        high[i] = high[i].wrapping_sub(pred as i16);
    }
    for i in 0..half {
        let left = high[i.saturating_sub(1)] as i32;
        let upd = (left + high[i] as i32 + 2) >> 2;
        low[i] = low[i].wrapping_add(upd as i16);
    }

    signal[..half].copy_from_slice(&low);
    signal[half..].copy_from_slice(&high);
}

/// Scalar reference inverse transform.
pub fn inverse_1d_scalar(signal: &mut [i16]) {
    let n = signal.len();
    debug_assert!(n >= 2 && n % 2 == 0, "signal length must be even, got {n}");
    let half = n / 2;

    let mut low: Vec<i16> = signal[..half].to_vec();
    let mut high: Vec<i16> = signal[half..].to_vec();

    for i in 0..half {
        let left = high[i.saturating_sub(1)] as i32;
        let upd = (left + high[i] as i32 + 2) >> 2;
        low[i] = low[i].wrapping_sub(upd as i16);
    }
    for i in 0..half {
        let right = low[(i + 1).min(half - 1)] as i32;
        let pred = (low[i] as i32 + right) >> 1;
        high[i] = high[i].wrapping_add(pred as i16);
    }

    for i in 0..half {
        signal[i * 2] = low[i];
        signal[i * 2 + 1] = high[i];
    }
}

/// Forward 2D transform over a `width × height` region of a
/// stride-addressed buffer: rows first, then columns. After the call the
/// region holds the LL/HL/LH/HH quadrants.
pub fn forward_2d(buf: &mut [i16], stride: usize, width: usize, height: usize) {
    debug_assert!(width % 2 == 0 && height % 2 == 0);
    for y in 0..height {
        forward_1d(&mut buf[y * stride..y * stride + width]);
    }
    let mut col = vec![0i16; height];
    for x in 0..width {
        for y in 0..height {
            col[y] = buf[y * stride + x];
        }
        forward_1d(&mut col);
        for y in 0..height {
            buf[y * stride + x] = col[y];
        }
    }
}

/// Inverse 2D transform: columns first, then rows (reverse of
/// [`forward_2d`]).
pub fn inverse_2d(buf: &mut [i16], stride: usize, width: usize, height: usize) {
    debug_assert!(width % 2 == 0 && height % 2 == 0);
    let mut col = vec![0i16; height];
    for x in 0..width {
        for y in 0..height {
            col[y] = buf[y * stride + x];
        }
        inverse_1d(&mut col);
        for y in 0..height {
            buf[y * stride + x] = col[y];
        }
    }
    for y in 0..height {
        inverse_1d(&mut buf[y * stride..y * stride + width]);
    }
}

/// Two-level in-block transform used by the base layer: one 2D level on
/// the full 16×16 block, then a second level on its 8×8 LL quadrant.
pub fn forward_block2(block: &mut [i16; BLOCK_AREA]) {
    forward_2d(block, BLOCK_SIZE, BLOCK_SIZE, BLOCK_SIZE);
    forward_2d(block, BLOCK_SIZE, BLOCK_SIZE / 2, BLOCK_SIZE / 2);
}

/// Exact inverse of [`forward_block2`].
pub fn inverse_block2(block: &mut [i16; BLOCK_AREA]) {
    inverse_2d(block, BLOCK_SIZE, BLOCK_SIZE / 2, BLOCK_SIZE / 2);
    inverse_2d(block, BLOCK_SIZE, BLOCK_SIZE, BLOCK_SIZE);
}

#[cfg(feature = "simd")]
mod simd {
    //! Fixed-size vectorized kernels, bit-identical to the scalar path.
    //!
    //! Lanes hold i32; every lifting stage re-wraps lanes to the i16
    //! range with `(v << 16) >> 16` so the stored values match the
    //! scalar path exactly.

    use wide::{i32x4, i32x8};

    #[inline(always)]
    fn wrap4(v: i32x4) -> i32x4 {
        (v << 16i32) >> 16i32
    }

    #[inline(always)]
    fn wrap8(v: i32x8) -> i32x8 {
        (v << 16i32) >> 16i32
    }

    /// Forward kernel for n = 8 (two i32x4 halves).
    pub fn forward_8(signal: &mut [i16]) {
        debug_assert_eq!(signal.len(), 8);
        let l = [
            signal[0] as i32,
            signal[2] as i32,
            signal[4] as i32,
            signal[6] as i32,
        ];
        let h = [
            signal[1] as i32,
            signal[3] as i32,
            signal[5] as i32,
            signal[7] as i32,
        ];
        let low = i32x4::from(l);
        let right = i32x4::from([l[1], l[2], l[3], l[3]]);
        let high = wrap4(i32x4::from(h) - ((low + right) >> 1i32));

        let ha = high.to_array();
        let left = i32x4::from([ha[0], ha[0], ha[1], ha[2]]);
        let low = wrap4(low + ((left + high + i32x4::splat(2)) >> 2i32));

        store_halves(signal, &low.to_array(), &high.to_array());
    }

    /// Inverse kernel for n = 8.
    pub fn inverse_8(signal: &mut [i16]) {
        debug_assert_eq!(signal.len(), 8);
        let l: [i32; 4] = core::array::from_fn(|i| signal[i] as i32);
        let h: [i32; 4] = core::array::from_fn(|i| signal[4 + i] as i32);
        let high = i32x4::from(h);
        let left = i32x4::from([h[0], h[0], h[1], h[2]]);
        let low = wrap4(i32x4::from(l) - ((left + high + i32x4::splat(2)) >> 2i32));

        let la = low.to_array();
        let right = i32x4::from([la[1], la[2], la[3], la[3]]);
        let high = wrap4(high + ((low + right) >> 1i32));

        interleave(signal, &low.to_array(), &high.to_array());
    }

    /// Forward kernel for n = 16 (two i32x8 halves).
    pub fn forward_16(signal: &mut [i16]) {
        debug_assert_eq!(signal.len(), 16);
        let l: [i32; 8] = core::array::from_fn(|i| signal[i * 2] as i32);
        let h: [i32; 8] = core::array::from_fn(|i| signal[i * 2 + 1] as i32);

        let low = i32x8::from(l);
        let right = i32x8::from([l[1], l[2], l[3], l[4], l[5], l[6], l[7], l[7]]);
        let high = wrap8(i32x8::from(h) - ((low + right) >> 1i32));

        let ha = high.to_array();
        let left = i32x8::from([ha[0], ha[0], ha[1], ha[2], ha[3], ha[4], ha[5], ha[6]]);
        let low = wrap8(low + ((left + high + i32x8::splat(2)) >> 2i32));

        store_halves(signal, &low.to_array(), &high.to_array());
    }

    /// Inverse kernel for n = 16.
    pub fn inverse_16(signal: &mut [i16]) {
        debug_assert_eq!(signal.len(), 16);
        let l: [i32; 8] = core::array::from_fn(|i| signal[i] as i32);
        let h: [i32; 8] = core::array::from_fn(|i| signal[8 + i] as i32);

        let high = i32x8::from(h);
        let left = i32x8::from([h[0], h[0], h[1], h[2], h[3], h[4], h[5], h[6]]);
        let low = wrap8(i32x8::from(l) - ((left + high + i32x8::splat(2)) >> 2i32));

        let la = low.to_array();
        let right = i32x8::from([la[1], la[2], la[3], la[4], la[5], la[6], la[7], la[7]]);
        let high = wrap8(high + ((low + right) >> 1i32));

        interleave(signal, &low.to_array(), &high.to_array());
    }

    /// Forward kernel for n = 32 (16-lane halves, processed as 2×i32x8).
    pub fn forward_32(signal: &mut [i16]) {
        debug_assert_eq!(signal.len(), 32);
        let l: [i32; 16] = core::array::from_fn(|i| signal[i * 2] as i32);
        let h: [i32; 16] = core::array::from_fn(|i| signal[i * 2 + 1] as i32);

        let mut right = [0i32; 16];
        right[..15].copy_from_slice(&l[1..]);
        right[15] = l[15];

        let mut high = [0i32; 16];
        for c in 0..2 {
            let low_v = i32x8::from(chunk8(&l, c));
            let right_v = i32x8::from(chunk8(&right, c));
            let h_v = wrap8(i32x8::from(chunk8(&h, c)) - ((low_v + right_v) >> 1i32));
            high[c * 8..c * 8 + 8].copy_from_slice(&h_v.to_array());
        }

        let mut left = [0i32; 16];
        left[0] = high[0];
        left[1..].copy_from_slice(&high[..15]);

        let mut low = [0i32; 16];
        for c in 0..2 {
            let l_v = i32x8::from(chunk8(&l, c));
            let h_v = i32x8::from(chunk8(&high, c));
            let left_v = i32x8::from(chunk8(&left, c));
            let out = wrap8(l_v + ((left_v + h_v + i32x8::splat(2)) >> 2i32));
            low[c * 8..c * 8 + 8].copy_from_slice(&out.to_array());
        }

        store_halves(signal, &low, &high);
    }

    /// Inverse kernel for n = 32.
    pub fn inverse_32(signal: &mut [i16]) {
        debug_assert_eq!(signal.len(), 32);
        let l: [i32; 16] = core::array::from_fn(|i| signal[i] as i32);
        let h: [i32; 16] = core::array::from_fn(|i| signal[16 + i] as i32);

        let mut left = [0i32; 16];
        left[0] = h[0];
        left[1..].copy_from_slice(&h[..15]);

        let mut low = [0i32; 16];
        for c in 0..2 {
            let l_v = i32x8::from(chunk8(&l, c));
            let h_v = i32x8::from(chunk8(&h, c));
            let left_v = i32x8::from(chunk8(&left, c));
            let out = wrap8(l_v - ((left_v + h_v + i32x8::splat(2)) >> 2i32));
            low[c * 8..c * 8 + 8].copy_from_slice(&out.to_array());
        }

        let mut right = [0i32; 16];
        right[..15].copy_from_slice(&low[1..]);
        right[15] = low[15];

        let mut high = [0i32; 16];
        for c in 0..2 {
            let low_v = i32x8::from(chunk8(&low, c));
            let right_v = i32x8::from(chunk8(&right, c));
            let out = wrap8(i32x8::from(chunk8(&h, c)) + ((low_v + right_v) >> 1i32));
            high[c * 8..c * 8 + 8].copy_from_slice(&out.to_array());
        }

        interleave(signal, &low, &high);
    }

    #[inline(always)]
    fn chunk8(arr: &[i32; 16], c: usize) -> [i32; 8] {
        core::array::from_fn(|i| arr[c * 8 + i])
    }

    #[inline(always)]
    fn store_halves(signal: &mut [i16], low: &[i32], high: &[i32]) {
        let half = low.len();
        for i in 0..half {
            signal[i] = low[i] as i16;
            signal[half + i] = high[i] as i16;
        }
    }

    #[inline(always)]
    fn interleave(signal: &mut [i16], low: &[i32], high: &[i32]) {
        for i in 0..low.len() {
            signal[i * 2] = low[i] as i16;
            signal[i * 2 + 1] = high[i] as i16;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_signal(rng: &mut StdRng, n: usize) -> Vec<i16> {
        (0..n).map(|_| rng.gen::<i16>()).collect()
    }

    #[test]
    fn test_forward_splits_constant_signal() {
        let mut signal = [100i16; 16];
        forward_1d(&mut signal);
        // Constant input: high-pass exactly zero, low-pass keeps the level.
        for &hp in &signal[8..] {
            assert_eq!(hp, 0);
        }
        for &lp in &signal[..8] {
            assert_eq!(lp, 100);
        }
    }

    #[test]
    fn test_roundtrip_1d_arbitrary_input() {
        let mut rng = StdRng::seed_from_u64(0x5173);
        for &n in &[2, 4, 6, 8, 10, 16, 32, 64, 100, 256] {
            for _ in 0..50 {
                let original = random_signal(&mut rng, n);
                let mut signal = original.clone();
                forward_1d(&mut signal);
                inverse_1d(&mut signal);
                assert_eq!(signal, original, "roundtrip failed for n={n}");
            }
        }
    }

    #[test]
    fn test_roundtrip_1d_extremes() {
        for pattern in [
            vec![i16::MIN; 16],
            vec![i16::MAX; 16],
            (0..16)
                .map(|i| if i % 2 == 0 { i16::MIN } else { i16::MAX })
                .collect::<Vec<_>>(),
        ] {
            let mut signal = pattern.clone();
            forward_1d(&mut signal);
            inverse_1d(&mut signal);
            assert_eq!(signal, pattern);
        }
    }

    #[cfg(feature = "simd")]
    #[test]
    fn test_simd_kernels_match_scalar() {
        let mut rng = StdRng::seed_from_u64(0xD417);
        for &n in &[8usize, 16, 32] {
            for _ in 0..500 {
                let original = random_signal(&mut rng, n);

                let mut fast = original.clone();
                let mut reference = original.clone();
                forward_1d(&mut fast);
                forward_1d_scalar(&mut reference);
                assert_eq!(fast, reference, "forward kernel diverged for n={n}");

                let mut fast_inv = fast.clone();
                let mut ref_inv = fast.clone();
                inverse_1d(&mut fast_inv);
                inverse_1d_scalar(&mut ref_inv);
                assert_eq!(fast_inv, ref_inv, "inverse kernel diverged for n={n}");
            }
        }
    }

    #[test]
    fn test_roundtrip_2d() {
        let mut rng = StdRng::seed_from_u64(0x2D2D);
        for &(w, h) in &[(8usize, 8usize), (16, 16), (32, 16), (64, 64), (6, 10)] {
            let original = random_signal(&mut rng, w * h);
            let mut buf = original.clone();
            forward_2d(&mut buf, w, w, h);
            inverse_2d(&mut buf, w, w, h);
            assert_eq!(buf, original, "2d roundtrip failed for {w}x{h}");
        }
    }

    #[test]
    fn test_roundtrip_2d_region_with_stride() {
        let mut rng = StdRng::seed_from_u64(0x57F1);
        let stride = 24;
        let original = random_signal(&mut rng, stride * 16);
        let mut buf = original.clone();
        forward_2d(&mut buf, stride, 8, 8);
        inverse_2d(&mut buf, stride, 8, 8);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_roundtrip_block2() {
        let mut rng = StdRng::seed_from_u64(0xB10C);
        for _ in 0..100 {
            let samples = random_signal(&mut rng, BLOCK_AREA);
            let original: [i16; BLOCK_AREA] = samples.try_into().unwrap();
            let mut block = original;
            forward_block2(&mut block);
            inverse_block2(&mut block);
            assert_eq!(block, original);
        }
    }

    #[test]
    fn test_block2_second_level_only_touches_ll() {
        let mut one_level = [0i16; BLOCK_AREA];
        let mut two_level = [0i16; BLOCK_AREA];
        for i in 0..BLOCK_AREA {
            let v = ((i * 7) % 251) as i16 - 125;
            one_level[i] = v;
            two_level[i] = v;
        }
        forward_2d(&mut one_level, BLOCK_SIZE, BLOCK_SIZE, BLOCK_SIZE);
        forward_block2(&mut two_level);
        // HL/LH/HH quadrants must agree; only the 8×8 LL differs.
        for row in 0..BLOCK_SIZE {
            for col in 0..BLOCK_SIZE {
                if row < 8 && col < 8 {
                    continue;
                }
                assert_eq!(
                    one_level[row * BLOCK_SIZE + col],
                    two_level[row * BLOCK_SIZE + col],
                    "detail quadrant changed at ({row},{col})"
                );
            }
        }
    }
}
