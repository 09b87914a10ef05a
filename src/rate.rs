//! Online rate control
//!
//! Tracks the cumulative coded bit and pixel counts across one layer
//! pass and nudges the next block's quantization scale toward the
//! bits-per-pixel target derived from `max_bitrate / (width × height)`.
//! The state deliberately spans channel boundaries (Y → Cb → Cr within
//! one pass) so luma spending influences chroma scale decisions, and it
//! is purely an encoder-side heuristic: every block's scale is
//! transmitted in its header byte, so the decoder never replicates it.

/// Scales above this flatten every 16-bit coefficient to zero, so the
/// feedback loop never goes past it.
pub const MAX_SCALE: u8 = 15;

/// Feedback state for one base- or enhancement-layer encode pass.
#[derive(Clone, Debug)]
pub struct RateController {
    target_bpp: f64,
    coded_bits: u64,
    coded_pixels: u64,
    scale: u8,
}

impl RateController {
    /// Create a controller for a layer covering `width × height` pixels
    /// under a total budget of `max_bitrate` bits.
    #[must_use]
    pub fn new(max_bitrate: u64, width: usize, height: usize) -> Self {
        let pixels = (width * height).max(1) as f64;
        Self {
            target_bpp: max_bitrate as f64 / pixels,
            coded_bits: 0,
            coded_pixels: 0,
            scale: 0,
        }
    }

    /// Scale to use for the next block.
    #[inline]
    #[must_use]
    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Record one coded block and adjust the scale for the next:
    /// coarser when over budget, finer when under.
    pub fn record_block(&mut self, bits: usize, pixels: usize) {
        self.coded_bits += bits as u64;
        self.coded_pixels += pixels as u64;
        let bpp = self.coded_bits as f64 / self.coded_pixels.max(1) as f64;
        if bpp > self.target_bpp {
            self.scale = (self.scale + 1).min(MAX_SCALE);
        } else {
            self.scale = self.scale.saturating_sub(1);
        }
    }

    /// Total bits recorded this pass.
    #[must_use]
    pub fn coded_bits(&self) -> u64 {
        self.coded_bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tightens_when_over_budget() {
        // Budget of 0.5 bpp; blocks arriving at 8 bpp must push the
        // scale up monotonically to the cap.
        let mut rc = RateController::new(2048, 64, 64);
        for _ in 0..32 {
            rc.record_block(2048, 256);
        }
        assert_eq!(rc.scale(), MAX_SCALE);
    }

    #[test]
    fn test_relaxes_when_under_budget() {
        // 244 bpp target; 39 bpp blocks stay far under it.
        let mut rc = RateController::new(1_000_000, 64, 64);
        rc.record_block(10_000, 256);
        assert_eq!(rc.scale(), 0);
        rc.record_block(8, 256);
        assert_eq!(rc.scale(), 0);
    }

    #[test]
    fn test_recovers_after_overspend() {
        let mut rc = RateController::new(25600, 160, 160); // 1 bpp target
        rc.record_block(2560, 256); // 10 bpp → coarser
        assert_eq!(rc.scale(), 1);
        rc.record_block(2560, 256);
        assert_eq!(rc.scale(), 2);
        // Many tiny blocks bring the running average back under target.
        for _ in 0..100 {
            rc.record_block(8, 256);
        }
        assert_eq!(rc.scale(), 0);
    }

    #[test]
    fn test_deterministic_sequence() {
        let run = || {
            let mut rc = RateController::new(50_000, 64, 64);
            let mut scales = Vec::new();
            for i in 0..20 {
                scales.push(rc.scale());
                rc.record_block(500 + i * 37, 256);
            }
            scales
        };
        assert_eq!(run(), run());
    }
}
