//! Block Discrete Cosine Transform (type II forward, type III inverse).
//!
//! Every block of a [`Plane`] is transformed independently. The direct kernel
//! evaluates the double sums exactly as written; the separable kernel factors
//! them into a row pass and a column pass.

use std::f64::consts::PI;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::cancellation::CancellationToken;
use crate::compression_parameters::TransformKernel;
use crate::error::DctError;
use crate::plane::{Plane, read_strip_block, write_strip_block};

/// Normalization coefficients shared by the forward and inverse transforms.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaVector {
    values: Vec<f64>,
}

impl AlphaVector {
    /// `alpha[0] = 1/sqrt(n)`, `alpha[k] = sqrt(2/n)` for `k > 0`.
    pub fn new(block_size: usize) -> Self {
        let mut values = vec![(2.0 / block_size as f64).sqrt(); block_size];
        if let Some(first) = values.first_mut() {
            *first = 1.0 / (block_size as f64).sqrt();
        }
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, k: usize) -> f64 {
        self.values[k]
    }
}

/// Precomputed `cos((2n+1) * k * pi / (2N))`, stored `table[n * N + k]`.
///
/// The argument is formed as integer product, times pi, divided by `2N`, so a
/// lookup is bit-identical to evaluating the cosine inline.
#[derive(Debug, Clone)]
struct CosineTable {
    size: usize,
    table: Vec<f64>,
}

impl CosineTable {
    fn new(size: usize) -> Self {
        let denominator = (2 * size) as f64;
        let mut table = Vec::with_capacity(size * size);
        for n in 0..size {
            for k in 0..size {
                table.push((((2 * n + 1) * k) as f64 * PI / denominator).cos());
            }
        }
        Self { size, table }
    }

    #[inline]
    fn get(&self, n: usize, k: usize) -> f64 {
        self.table[n * self.size + k]
    }
}

pub struct BlockTransform {
    block_size: usize,
    kernel: TransformKernel,
    alpha: AlphaVector,
    cosines: CosineTable,
}

type BlockFn = fn(&BlockTransform, &[f64], &mut [f64], &mut [f64]);

impl BlockTransform {
    pub fn new(block_size: usize, kernel: TransformKernel) -> Result<Self, DctError> {
        if block_size == 0 {
            return Err(DctError::InvalidParameterBlockSize);
        }
        Ok(Self {
            block_size,
            kernel,
            alpha: AlphaVector::new(block_size),
            cosines: CosineTable::new(block_size),
        })
    }

    pub fn alpha(&self) -> &AlphaVector {
        &self.alpha
    }

    /// Forward DCT of every block of `plane`.
    pub fn forward(&self, plane: &Plane, cancel: &CancellationToken) -> Result<Plane, DctError> {
        let block_fn: BlockFn = match self.kernel {
            TransformKernel::Direct => Self::forward_direct,
            TransformKernel::Separable => Self::forward_separable,
        };
        self.apply(plane, cancel, block_fn)
    }

    /// Inverse DCT of every block of `coefficients`.
    pub fn inverse(&self, coefficients: &Plane, cancel: &CancellationToken) -> Result<Plane, DctError> {
        let block_fn: BlockFn = match self.kernel {
            TransformKernel::Direct => Self::inverse_direct,
            TransformKernel::Separable => Self::inverse_separable,
        };
        self.apply(coefficients, cancel, block_fn)
    }

    /// Forward transform of a single `n x n` block, indexed `[i * n + j]`.
    pub fn forward_block(&self, input: &[f64], output: &mut [f64]) {
        let mut scratch = vec![0.0; self.block_size * self.block_size];
        match self.kernel {
            TransformKernel::Direct => self.forward_direct(input, output, &mut scratch),
            TransformKernel::Separable => self.forward_separable(input, output, &mut scratch),
        }
    }

    /// Inverse transform of a single `n x n` block, indexed `[u * n + v]`.
    pub fn inverse_block(&self, input: &[f64], output: &mut [f64]) {
        let mut scratch = vec![0.0; self.block_size * self.block_size];
        match self.kernel {
            TransformKernel::Direct => self.inverse_direct(input, output, &mut scratch),
            TransformKernel::Separable => self.inverse_separable(input, output, &mut scratch),
        }
    }

    fn apply(&self, plane: &Plane, cancel: &CancellationToken, block_fn: BlockFn) -> Result<Plane, DctError> {
        let n = self.block_size;
        if plane.block_size() != n || plane.width() % n != 0 || plane.height() % n != 0 {
            return Err(DctError::InvalidArgumentPlaneSize);
        }

        let mut output = plane.zeroed_like();
        if output.samples().is_empty() {
            return Ok(output);
        }
        let width = plane.width();
        let row_len = plane.block_row_len();

        #[cfg(feature = "parallel")]
        output
            .samples_mut()
            .par_chunks_mut(row_len)
            .zip(plane.samples().par_chunks(row_len))
            .try_for_each(|(dst, src)| self.transform_strip(src, dst, width, cancel, block_fn))?;

        #[cfg(not(feature = "parallel"))]
        output
            .samples_mut()
            .chunks_mut(row_len)
            .zip(plane.samples().chunks(row_len))
            .try_for_each(|(dst, src)| self.transform_strip(src, dst, width, cancel, block_fn))?;

        Ok(output)
    }

    fn transform_strip(
        &self,
        src: &[f64],
        dst: &mut [f64],
        width: usize,
        cancel: &CancellationToken,
        block_fn: BlockFn,
    ) -> Result<(), DctError> {
        let n = self.block_size;
        let mut block = vec![0.0; n * n];
        let mut transformed = vec![0.0; n * n];
        let mut scratch = vec![0.0; n * n];

        for x0 in (0..width).step_by(n) {
            cancel.check()?;
            read_strip_block(src, width, n, x0, &mut block);
            block_fn(self, &block, &mut transformed, &mut scratch);
            write_strip_block(dst, width, n, x0, &transformed);
        }
        Ok(())
    }

    fn forward_direct(&self, input: &[f64], output: &mut [f64], _scratch: &mut [f64]) {
        let n = self.block_size;
        for u in 0..n {
            for v in 0..n {
                let mut sum = 0.0;
                for i in 0..n {
                    let cos_i = self.cosines.get(i, u);
                    for j in 0..n {
                        sum += input[i * n + j] * cos_i * self.cosines.get(j, v);
                    }
                }
                output[u * n + v] = self.alpha.get(u) * self.alpha.get(v) * sum;
            }
        }
    }

    fn inverse_direct(&self, input: &[f64], output: &mut [f64], _scratch: &mut [f64]) {
        let n = self.block_size;
        for x in 0..n {
            for y in 0..n {
                let mut sum = 0.0;
                for u in 0..n {
                    for v in 0..n {
                        sum += self.alpha.get(u)
                            * self.alpha.get(v)
                            * input[u * n + v]
                            * self.cosines.get(x, u)
                            * self.cosines.get(y, v);
                    }
                }
                output[x * n + y] = sum;
            }
        }
    }

    fn forward_separable(&self, input: &[f64], output: &mut [f64], scratch: &mut [f64]) {
        let n = self.block_size;
        // scratch[u * n + j] = sum_i f[i, j] * cos(i, u)
        for u in 0..n {
            for j in 0..n {
                let mut sum = 0.0;
                for i in 0..n {
                    sum += input[i * n + j] * self.cosines.get(i, u);
                }
                scratch[u * n + j] = sum;
            }
        }
        for u in 0..n {
            for v in 0..n {
                let mut sum = 0.0;
                for j in 0..n {
                    sum += scratch[u * n + j] * self.cosines.get(j, v);
                }
                output[u * n + v] = self.alpha.get(u) * self.alpha.get(v) * sum;
            }
        }
    }

    fn inverse_separable(&self, input: &[f64], output: &mut [f64], scratch: &mut [f64]) {
        let n = self.block_size;
        // scratch[x * n + v] = sum_u alpha[u] * C[u, v] * cos(x, u)
        for x in 0..n {
            for v in 0..n {
                let mut sum = 0.0;
                for u in 0..n {
                    sum += self.alpha.get(u) * input[u * n + v] * self.cosines.get(x, u);
                }
                scratch[x * n + v] = sum;
            }
        }
        for x in 0..n {
            for y in 0..n {
                let mut sum = 0.0;
                for v in 0..n {
                    sum += self.alpha.get(v) * scratch[x * n + v] * self.cosines.get(y, v);
                }
                output[x * n + y] = sum;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern_block(n: usize) -> Vec<f64> {
        (0..n * n)
            .map(|k| ((k * 37 + 11) % 256) as f64)
            .collect()
    }

    #[test]
    fn test_alpha_vector() {
        let alpha = AlphaVector::new(8);
        assert_eq!(alpha.len(), 8);
        assert!((alpha.get(0) - 1.0 / 8f64.sqrt()).abs() < 1e-15);
        for k in 1..8 {
            assert!((alpha.get(k) - 0.5).abs() < 1e-15);
        }
    }

    #[test]
    fn test_zero_block_size_is_rejected() {
        assert!(matches!(
            BlockTransform::new(0, TransformKernel::Direct),
            Err(DctError::InvalidParameterBlockSize)
        ));
    }

    #[test]
    fn test_uniform_block_has_only_dc() {
        let transform = BlockTransform::new(8, TransformKernel::Direct).unwrap();
        let input = [100.0; 64];
        let mut coefficients = [0.0; 64];
        transform.forward_block(&input, &mut coefficients);

        let alpha0 = transform.alpha().get(0);
        assert!((coefficients[0] - 6400.0 * alpha0 * alpha0).abs() < 1e-9);
        assert!((coefficients[0] - 800.0).abs() < 1e-9);
        for (k, c) in coefficients.iter().enumerate().skip(1) {
            assert!(c.abs() < 1e-9, "coefficient {} = {}", k, c);
        }

        let mut output = [0.0; 64];
        transform.inverse_block(&coefficients, &mut output);
        for v in output {
            assert!((v - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_block_round_trip() {
        for n in [2, 3, 4, 8, 16] {
            let transform = BlockTransform::new(n, TransformKernel::Direct).unwrap();
            let input = pattern_block(n);
            let mut coefficients = vec![0.0; n * n];
            let mut output = vec![0.0; n * n];
            transform.forward_block(&input, &mut coefficients);
            transform.inverse_block(&coefficients, &mut output);
            for (a, b) in input.iter().zip(&output) {
                assert!((a - b).abs() <= 1e-9 * a.abs().max(1.0), "n={}: {} vs {}", n, a, b);
            }
        }
    }

    #[test]
    fn test_separable_matches_direct() {
        let n = 8;
        let direct = BlockTransform::new(n, TransformKernel::Direct).unwrap();
        let separable = BlockTransform::new(n, TransformKernel::Separable).unwrap();
        let input = pattern_block(n);

        let mut a = vec![0.0; n * n];
        let mut b = vec![0.0; n * n];
        direct.forward_block(&input, &mut a);
        separable.forward_block(&input, &mut b);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-9);
        }

        let mut ra = vec![0.0; n * n];
        let mut rb = vec![0.0; n * n];
        direct.inverse_block(&a, &mut ra);
        separable.inverse_block(&a, &mut rb);
        for (x, y) in ra.iter().zip(&rb) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_blocks_are_independent() {
        // A single bright block must not leak into its neighbours.
        let mut plane = Plane::zeroed(16, 8, 8).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                plane.set(x, y, 200.0);
            }
        }
        let transform = BlockTransform::new(8, TransformKernel::Direct).unwrap();
        let coefficients = transform.forward(&plane, &CancellationToken::new()).unwrap();
        for y in 0..8 {
            for x in 8..16 {
                assert_eq!(coefficients.get(x, y), 0.0);
            }
        }
        assert!((coefficients.get(0, 0) - 1600.0).abs() < 1e-9);
    }

    #[test]
    fn test_plane_block_size_mismatch() {
        let plane = Plane::zeroed(16, 16, 4).unwrap();
        let transform = BlockTransform::new(8, TransformKernel::Direct).unwrap();
        assert_eq!(
            transform.forward(&plane, &CancellationToken::new()),
            Err(DctError::InvalidArgumentPlaneSize)
        );
    }

    #[test]
    fn test_cancelled_transform() {
        let plane = Plane::zeroed(16, 16, 8).unwrap();
        let transform = BlockTransform::new(8, TransformKernel::Direct).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(transform.forward(&plane, &token), Err(DctError::Cancelled));
    }
}
