//! Reconstruction quality metrics.
//!
//! Images are compared on per-pixel gray intensity, the integer mean of the
//! three channels.

use crate::constants::MAXIMUM_SAMPLE_VALUE;
use crate::error::DctError;
use crate::image::RgbImage;

#[inline]
fn intensity(rgb: [u8; 3]) -> i32 {
    (rgb[0] as i32 + rgb[1] as i32 + rgb[2] as i32) / 3
}

/// Mean squared error of the gray intensities of two equally sized images.
pub fn mean_squared_error(original: &RgbImage, reconstructed: &RgbImage) -> Result<f64, DctError> {
    if original.width != reconstructed.width {
        return Err(DctError::InvalidArgumentWidth);
    }
    if original.height != reconstructed.height {
        return Err(DctError::InvalidArgumentHeight);
    }

    let sum: f64 = original
        .pixels
        .chunks_exact(3)
        .zip(reconstructed.pixels.chunks_exact(3))
        .map(|(a, b)| {
            let diff = (intensity([a[0], a[1], a[2]]) - intensity([b[0], b[1], b[2]])) as f64;
            diff * diff
        })
        .sum();

    Ok(sum / (original.width as f64 * original.height as f64))
}

/// Peak signal-to-noise ratio in decibels. Identical images give infinity.
pub fn psnr(original: &RgbImage, reconstructed: &RgbImage) -> Result<f64, DctError> {
    let mse = mean_squared_error(original, reconstructed)?;
    let peak = MAXIMUM_SAMPLE_VALUE as f64;
    Ok(10.0 * (peak * peak / mse).log10())
}
