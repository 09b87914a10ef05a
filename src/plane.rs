//! Plane and image buffers
//!
//! A [`Plane`] is a width×height array of 16-bit signed samples stored
//! row-major. The same representation carries pixel values, residuals,
//! and wavelet coefficients through every pipeline stage, so each stage
//! takes exclusive ownership or an exclusive borrow and no aliasing ever
//! occurs.
//!
//! [`YCbCrImage`] bundles one plane per channel. The codec works
//! internally on a 4:2:0 layout (chroma planes at half the luma
//! dimensions, ceiling division); a 4:4:4 input is chroma-downsampled on
//! entry to the encoder.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::{BLOCK_AREA, BLOCK_SIZE};

/// Chroma subsampling of an external [`YCbCrImage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChromaSampling {
    /// Chroma planes at half the luma dimensions (ceiling division).
    Cs420,
    /// Chroma planes at full luma resolution.
    Cs444,
}

/// A width×height buffer of i16 samples, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plane {
    width: usize,
    height: usize,
    samples: Vec<i16>,
}

impl Plane {
    /// Create a zero-filled plane.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: vec![0i16; width * height],
        }
    }

    /// Wrap an existing sample buffer. `samples.len()` must equal
    /// `width * height`.
    #[must_use]
    pub fn from_samples(width: usize, height: usize, samples: Vec<i16>) -> Self {
        assert_eq!(samples.len(), width * height, "sample count mismatch");
        Self {
            width,
            height,
            samples,
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    #[inline]
    #[must_use]
    pub fn samples_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }

    /// Sample at (x, y) without bounds clamping.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> i16 {
        self.samples[y * self.width + x]
    }

    /// Sample at (x, y) with indices clamped into the plane.
    #[inline]
    #[must_use]
    pub fn get_clamped(&self, x: usize, y: usize) -> i16 {
        let cx = x.min(self.width - 1);
        let cy = y.min(self.height - 1);
        self.samples[cy * self.width + cx]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: i16) {
        self.samples[y * self.width + x] = value;
    }

    /// Extract the 16×16 block whose top-left corner is
    /// `(bx * BLOCK_SIZE, by * BLOCK_SIZE)`. Samples past the plane edge
    /// are edge-replicated so every block holds exactly
    /// [`BLOCK_AREA`] coefficients.
    #[must_use]
    pub fn extract_block(&self, bx: usize, by: usize) -> [i16; BLOCK_AREA] {
        let mut block = [0i16; BLOCK_AREA];
        let x0 = bx * BLOCK_SIZE;
        let y0 = by * BLOCK_SIZE;
        for row in 0..BLOCK_SIZE {
            for col in 0..BLOCK_SIZE {
                block[row * BLOCK_SIZE + col] = self.get_clamped(x0 + col, y0 + row);
            }
        }
        block
    }

    /// Write a decoded 16×16 block back, discarding the part that falls
    /// outside the plane.
    pub fn insert_block(&mut self, bx: usize, by: usize, block: &[i16; BLOCK_AREA]) {
        let x0 = bx * BLOCK_SIZE;
        let y0 = by * BLOCK_SIZE;
        for row in 0..BLOCK_SIZE {
            let y = y0 + row;
            if y >= self.height {
                break;
            }
            for col in 0..BLOCK_SIZE {
                let x = x0 + col;
                if x >= self.width {
                    break;
                }
                self.samples[y * self.width + x] = block[row * BLOCK_SIZE + col];
            }
        }
    }

    /// Number of 16×16 blocks covering the plane, (horizontal, vertical).
    #[must_use]
    pub fn block_grid(&self) -> (usize, usize) {
        (
            self.width.div_ceil(BLOCK_SIZE),
            self.height.div_ceil(BLOCK_SIZE),
        )
    }

    /// Copy into a buffer padded to even dimensions by replicating the
    /// last column/row. Returns the padded buffer and its dimensions.
    #[must_use]
    pub fn padded_even(&self) -> (Vec<i16>, usize, usize) {
        let pw = self.width + (self.width & 1);
        let ph = self.height + (self.height & 1);
        let mut buf = vec![0i16; pw * ph];
        for y in 0..ph {
            let sy = y.min(self.height - 1);
            for x in 0..pw {
                let sx = x.min(self.width - 1);
                buf[y * pw + x] = self.samples[sy * self.width + sx];
            }
        }
        (buf, pw, ph)
    }

    /// Crop a stride-addressed buffer back into a plane of this size.
    pub fn copy_from_padded(&mut self, buf: &[i16], stride: usize) {
        for y in 0..self.height {
            let src = &buf[y * stride..y * stride + self.width];
            self.samples[y * self.width..(y + 1) * self.width].copy_from_slice(src);
        }
    }

    /// 2× downsample by averaging 2×2 neighborhoods (edge-replicated on
    /// odd dimensions). Output dimensions are the ceiling halves.
    #[must_use]
    pub fn downsample2x(&self) -> Plane {
        let ow = self.width.div_ceil(2);
        let oh = self.height.div_ceil(2);
        let mut out = Plane::new(ow, oh);
        for y in 0..oh {
            for x in 0..ow {
                let a = self.get_clamped(x * 2, y * 2) as i32;
                let b = self.get_clamped(x * 2 + 1, y * 2) as i32;
                let c = self.get_clamped(x * 2, y * 2 + 1) as i32;
                let d = self.get_clamped(x * 2 + 1, y * 2 + 1) as i32;
                out.set(x, y, ((a + b + c + d + 2) >> 2) as i16);
            }
        }
        out
    }
}

/// A three-plane YCbCr image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YCbCrImage {
    pub y: Plane,
    pub cb: Plane,
    pub cr: Plane,
    pub sampling: ChromaSampling,
}

impl YCbCrImage {
    /// Bundle three planes. Luma dimensions must be nonzero and fit in
    /// u16 (the layer header stores them as u16); chroma plane
    /// dimensions must match the sampling mode: full size for 4:4:4,
    /// ceiling halves for 4:2:0.
    #[must_use]
    pub fn new(y: Plane, cb: Plane, cr: Plane, sampling: ChromaSampling) -> Self {
        let (w, h) = (y.width(), y.height());
        assert!(
            (1..=u16::MAX as usize).contains(&w) && (1..=u16::MAX as usize).contains(&h),
            "luma dimensions {w}x{h} out of range 1..=65535"
        );
        let (cw, ch) = match sampling {
            ChromaSampling::Cs444 => (y.width(), y.height()),
            ChromaSampling::Cs420 => (y.width().div_ceil(2), y.height().div_ceil(2)),
        };
        assert_eq!((cb.width(), cb.height()), (cw, ch), "cb plane size");
        assert_eq!((cr.width(), cr.height()), (cw, ch), "cr plane size");
        Self { y, cb, cr, sampling }
    }

    /// Luma dimensions.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.y.width(), self.y.height())
    }

    /// Convert to the codec's internal 4:2:0 working layout. A 4:2:0
    /// image passes through unchanged.
    #[must_use]
    pub fn into_working(self) -> YCbCrImage {
        match self.sampling {
            ChromaSampling::Cs420 => self,
            ChromaSampling::Cs444 => YCbCrImage {
                cb: self.cb.downsample2x(),
                cr: self.cr.downsample2x(),
                y: self.y,
                sampling: ChromaSampling::Cs420,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_get_set() {
        let mut p = Plane::new(4, 3);
        p.set(3, 2, -7);
        assert_eq!(p.get(3, 2), -7);
        assert_eq!(p.get_clamped(100, 100), -7);
    }

    #[test]
    fn test_extract_block_edge_replication() {
        let mut p = Plane::new(20, 20);
        for y in 0..20 {
            for x in 0..20 {
                p.set(x, y, (x + y * 20) as i16);
            }
        }
        // Block (1,1) covers x,y in 16..32; everything past 19 clamps.
        let block = p.extract_block(1, 1);
        assert_eq!(block[0], p.get(16, 16));
        assert_eq!(block[5 * BLOCK_SIZE + 5], p.get(19, 19));
        assert_eq!(block[BLOCK_AREA - 1], p.get(19, 19));
    }

    #[test]
    fn test_insert_block_clips_to_plane() {
        let mut p = Plane::new(18, 18);
        let block = [9i16; BLOCK_AREA];
        p.insert_block(1, 1, &block);
        assert_eq!(p.get(16, 16), 9);
        assert_eq!(p.get(17, 17), 9);
        assert_eq!(p.get(15, 15), 0);
    }

    #[test]
    fn test_block_grid() {
        assert_eq!(Plane::new(16, 16).block_grid(), (1, 1));
        assert_eq!(Plane::new(17, 16).block_grid(), (2, 1));
        assert_eq!(Plane::new(33, 49).block_grid(), (3, 4));
    }

    #[test]
    fn test_padded_even_replicates_edges() {
        let mut p = Plane::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                p.set(x, y, (10 * y + x) as i16);
            }
        }
        let (buf, pw, ph) = p.padded_even();
        assert_eq!((pw, ph), (4, 4));
        assert_eq!(buf[0 * pw + 3], 2); // last column replicated
        assert_eq!(buf[3 * pw + 0], 20); // last row replicated
        assert_eq!(buf[3 * pw + 3], 22);
    }

    #[test]
    fn test_downsample2x_average() {
        let p = Plane::from_samples(2, 2, vec![10, 20, 30, 40]);
        let d = p.downsample2x();
        assert_eq!((d.width(), d.height()), (1, 1));
        assert_eq!(d.get(0, 0), 25); // (10+20+30+40+2)>>2
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_oversized_image_rejected() {
        // 70000 would wrap to 4464 in the u16 layer header.
        let y = Plane::new(70_000, 2);
        let c = Plane::new(35_000, 1);
        YCbCrImage::new(y, c.clone(), c, ChromaSampling::Cs420);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_zero_dimension_image_rejected() {
        let p = Plane::new(0, 4);
        let c = Plane::new(0, 2);
        YCbCrImage::new(p, c.clone(), c, ChromaSampling::Cs420);
    }

    #[test]
    fn test_444_to_working_halves_chroma() {
        let img = YCbCrImage::new(
            Plane::new(5, 4),
            Plane::new(5, 4),
            Plane::new(5, 4),
            ChromaSampling::Cs444,
        );
        let w = img.into_working();
        assert_eq!(w.sampling, ChromaSampling::Cs420);
        assert_eq!((w.cb.width(), w.cb.height()), (3, 2));
    }
}
