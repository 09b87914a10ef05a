//! Quality metrics for codec evaluation.
//!
//! PSNR and MSE between original and reconstructed sample buffers.
//! Planes store samples as `i16` but carry 8-bit pixel data, so PSNR
//! uses a peak value of 255.

use crate::error::CodecError;

/// Mean squared error between two sample buffers.
///
/// Returns `0.0` for empty buffers.
///
/// # Errors
///
/// Returns [`CodecError::BufferSizeMismatch`] if `a` and `b` have
/// different lengths.
#[inline]
pub fn mse_i16(a: &[i16], b: &[i16]) -> Result<f64, CodecError> {
    if a.len() != b.len() {
        return Err(CodecError::BufferSizeMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    if a.is_empty() {
        return Ok(0.0);
    }
    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let diff = f64::from(x) - f64::from(y);
            diff * diff
        })
        .sum();
    Ok(sum / a.len() as f64)
}

/// Peak signal-to-noise ratio in dB between two sample buffers.
///
/// Returns `f64::INFINITY` when the buffers are identical or empty.
/// Higher is better; typical lossy image output is 30–50 dB.
///
/// # Errors
///
/// Returns [`CodecError::BufferSizeMismatch`] if `a` and `b` have
/// different lengths.
#[inline]
pub fn psnr_i16(a: &[i16], b: &[i16]) -> Result<f64, CodecError> {
    let mse_val = mse_i16(a, b)?;
    if mse_val == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * libm::log10(255.0_f64 * 255.0 / mse_val))
}
