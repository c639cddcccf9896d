//! Padded single-channel sample planes.
//!
//! A [`Plane`] stores real-valued samples in row-major order. Its dimensions are
//! always whole multiples of the block size it was created for, so blocks tile
//! it exactly.

use crate::error::DctError;

#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    block_size: usize,
    data: Vec<f64>,
}

/// Rounds `length` up to the next multiple of `block_size`.
pub fn padded_length(length: usize, block_size: usize) -> usize {
    length.div_ceil(block_size) * block_size
}

impl Plane {
    /// Creates a zero-filled plane large enough to hold `width x height` samples.
    pub fn zeroed(width: usize, height: usize, block_size: usize) -> Result<Self, DctError> {
        if block_size == 0 {
            return Err(DctError::InvalidParameterBlockSize);
        }
        let width = padded_length(width, block_size);
        let height = padded_length(height, block_size);
        Ok(Self {
            width,
            height,
            block_size,
            data: vec![0.0; width * height],
        })
    }

    /// Wraps existing row-major samples. The dimensions must already be block aligned.
    pub fn from_samples(
        width: usize,
        height: usize,
        block_size: usize,
        data: Vec<f64>,
    ) -> Result<Self, DctError> {
        if block_size == 0 {
            return Err(DctError::InvalidParameterBlockSize);
        }
        if width % block_size != 0 || height % block_size != 0 {
            return Err(DctError::InvalidArgumentPlaneSize);
        }
        if data.len() != width * height {
            return Err(DctError::InvalidArgumentSize);
        }
        Ok(Self {
            width,
            height,
            block_size,
            data,
        })
    }

    /// A plane of the same geometry with every sample set to zero.
    pub fn zeroed_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            block_size: self.block_size,
            data: vec![0.0; self.data.len()],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn blocks_across(&self) -> usize {
        self.width / self.block_size
    }

    pub fn blocks_down(&self) -> usize {
        self.height / self.block_size
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        self.data[y * self.width + x] = value;
    }

    pub fn samples(&self) -> &[f64] {
        &self.data
    }

    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Number of samples in one horizontal strip of blocks.
    pub fn block_row_len(&self) -> usize {
        self.width * self.block_size
    }

    /// Copies the block whose top-left corner is `(x0, y0)` into `out`, indexed
    /// `out[i * n + j]` with `i` running along x and `j` along y.
    pub fn read_block(&self, x0: usize, y0: usize, out: &mut [f64]) {
        let n = self.block_size;
        for i in 0..n {
            for j in 0..n {
                out[i * n + j] = self.get(x0 + i, y0 + j);
            }
        }
    }

    /// Count of samples that are not exactly zero.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|v| **v != 0.0).count()
    }
}

/// Reads a block out of a block-row strip (`block_size` rows of `width` samples).
pub(crate) fn read_strip_block(strip: &[f64], width: usize, n: usize, x0: usize, out: &mut [f64]) {
    for i in 0..n {
        for j in 0..n {
            out[i * n + j] = strip[j * width + x0 + i];
        }
    }
}

/// Writes a block into a block-row strip, inverse of [`read_strip_block`].
pub(crate) fn write_strip_block(strip: &mut [f64], width: usize, n: usize, x0: usize, block: &[f64]) {
    for i in 0..n {
        for j in 0..n {
            strip[j * width + x0 + i] = block[i * n + j];
        }
    }
}
