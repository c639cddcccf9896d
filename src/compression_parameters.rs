use crate::constants::{DEFAULT_BLOCK_SIZE, DEFAULT_RATE, DEFAULT_THRESHOLD, MAXIMUM_RATE};
use crate::error::DctError;

/// Selects how the block transform evaluates the DCT sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformKernel {
    /// Direct O(n^4) summation, the reference behaviour.
    #[default]
    Direct,
    /// Row/column factorization, O(n^3) per block. Agrees with `Direct` within
    /// floating-point tolerance.
    Separable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionParameters {
    pub block_size: usize,
    pub threshold: f64,
    pub rate: u32,
    pub kernel: TransformKernel,
}

impl Default for CompressionParameters {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            threshold: DEFAULT_THRESHOLD,
            rate: DEFAULT_RATE,
            kernel: TransformKernel::Direct,
        }
    }
}

impl CompressionParameters {
    pub fn new(block_size: usize, threshold: f64, rate: u32) -> Self {
        Self {
            block_size,
            threshold,
            rate,
            ..Self::default()
        }
    }

    pub fn with_kernel(mut self, kernel: TransformKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Checks the parameters that do not depend on the image.
    ///
    /// A threshold of zero is accepted. The quantizer terminates on all-zero
    /// blocks because the descent starts at a zero maximum.
    pub fn validate(&self) -> Result<(), DctError> {
        if self.block_size == 0 {
            return Err(DctError::InvalidParameterBlockSize);
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(DctError::InvalidParameterThreshold);
        }
        if self.rate > MAXIMUM_RATE {
            return Err(DctError::InvalidParameterRate);
        }
        Ok(())
    }

    /// Validates against the image the parameters will be applied to.
    pub fn validate_for(&self, width: u32, height: u32) -> Result<(), DctError> {
        self.validate()?;
        if self.block_size > width as usize || self.block_size > height as usize {
            return Err(DctError::BlockSizeExceedsImage);
        }
        Ok(())
    }

    /// Number of quantization levels per block, `2^rate`.
    pub fn step_count(&self) -> f64 {
        2f64.powi(self.rate as i32)
    }

    /// Snaps an arbitrary block size to a power of two, rounding halfway values up.
    pub fn nearest_power_of_two_block_size(block_size: usize) -> usize {
        if block_size <= 1 {
            return 1;
        }
        let upper = block_size.next_power_of_two();
        let lower = upper >> 1;
        if upper - block_size <= block_size - lower {
            upper
        } else {
            lower
        }
    }
}
