//! Threshold and staircase quantization of DCT coefficients.
//!
//! Each block gets its own uniform step, `(max - min) / 2^rate`, where `max` is
//! the largest coefficient magnitude in the block. Coefficients below the
//! threshold are zeroed; the rest are snapped to the first level at or below
//! their magnitude, counting down from `max`.

use crate::cancellation::CancellationToken;
use crate::error::DctError;
use crate::plane::{Plane, read_strip_block, write_strip_block};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-block magnitude range used to derive the quantizer step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockRange {
    pub max: f64,
    pub min: f64,
}

impl BlockRange {
    /// Scans `block` for its magnitude range.
    ///
    /// Both bounds start at zero. `min` only moves on magnitudes below zero, so
    /// it stays at zero for every real input.
    pub fn of(block: &[f64]) -> Self {
        let mut max = 0.0f64;
        let mut min = 0.0f64;
        for value in block {
            let magnitude = value.abs();
            if magnitude > max {
                max = magnitude;
            }
            if magnitude < min {
                min = magnitude;
            }
        }
        Self { max, min }
    }

    pub fn step(&self, rate: u32) -> f64 {
        (self.max - self.min) / 2f64.powi(rate as i32)
    }
}

/// Sign with `sign(0) == 0`, unlike `f64::signum`.
#[inline]
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Quantizes a single coefficient against its block's `max` and `step`.
///
/// A `step` of zero with `max` above the magnitude never terminates; callers
/// bound `rate` so that cannot happen for a non-zero `max`.
#[inline]
pub fn quantize_coefficient(value: f64, threshold: f64, max: f64, step: f64) -> f64 {
    let magnitude = value.abs();
    if magnitude < threshold {
        return 0.0;
    }
    let mut level = max;
    while level > magnitude {
        level -= step;
    }
    sign(value) * level
}

/// Quantizes one `n x n` block in place.
pub fn quantize_block(block: &mut [f64], threshold: f64, rate: u32) {
    let range = BlockRange::of(block);
    let step = range.step(rate);
    for value in block.iter_mut() {
        *value = quantize_coefficient(*value, threshold, range.max, step);
    }
}

/// Quantizes every block of a coefficient plane, consuming and returning it.
pub fn quantize(
    mut plane: Plane,
    threshold: f64,
    rate: u32,
    cancel: &CancellationToken,
) -> Result<Plane, DctError> {
    if plane.samples().is_empty() {
        return Ok(plane);
    }
    let n = plane.block_size();
    let width = plane.width();
    let row_len = plane.block_row_len();

    let quantize_strip = |strip: &mut [f64]| -> Result<(), DctError> {
        let mut block = vec![0.0; n * n];
        for x0 in (0..width).step_by(n) {
            cancel.check()?;
            read_strip_block(strip, width, n, x0, &mut block);
            quantize_block(&mut block, threshold, rate);
            write_strip_block(strip, width, n, x0, &block);
        }
        Ok(())
    };

    #[cfg(feature = "parallel")]
    plane
        .samples_mut()
        .par_chunks_mut(row_len)
        .try_for_each(quantize_strip)?;

    #[cfg(not(feature = "parallel"))]
    plane
        .samples_mut()
        .chunks_mut(row_len)
        .try_for_each(quantize_strip)?;

    Ok(plane)
}
