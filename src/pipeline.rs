//! End-to-end compression: planes, forward DCT, quantization, inverse DCT, image.
//!
//! The three colour channels are independent. With the `parallel` feature they
//! run concurrently via `rayon::join`; the join before reassembly is the only
//! synchronization point.

use tracing::{debug, trace};

use crate::cancellation::CancellationToken;
use crate::compression_parameters::CompressionParameters;
use crate::dct::BlockTransform;
use crate::error::DctError;
use crate::image::{Channel, RgbImage};
use crate::plane::Plane;
use crate::plane_converter::{ChannelPlanes, to_image_with_clamp_count, to_planes};
use crate::quantization::quantize;

#[derive(Debug, Clone, Default)]
pub struct DctCompressor {
    parameters: CompressionParameters,
    cancel: CancellationToken,
}

impl DctCompressor {
    pub fn new(parameters: CompressionParameters) -> Self {
        Self {
            parameters,
            cancel: CancellationToken::new(),
        }
    }

    /// Attaches a token that can stop the compression between blocks.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Compresses and reconstructs `image`.
    ///
    /// Parameters are validated before any work starts. Either the whole
    /// reconstructed image is returned or an error is.
    pub fn compress(&self, image: &RgbImage) -> Result<RgbImage, DctError> {
        let params = &self.parameters;
        params.validate_for(image.width, image.height)?;
        self.cancel.check()?;

        debug!(
            width = image.width,
            height = image.height,
            block_size = params.block_size,
            threshold = params.threshold,
            rate = params.rate,
            kernel = ?params.kernel,
            "compressing image"
        );

        let transform = BlockTransform::new(params.block_size, params.kernel)?;
        let ChannelPlanes { red, green, blue } = to_planes(image, params.block_size)?;

        let (red, green, blue) = self.process_channels(&transform, red, green, blue)?;
        let planes = ChannelPlanes { red, green, blue };

        let (output, clamped) = to_image_with_clamp_count(&planes, image.width, image.height)?;
        if clamped > 0 {
            debug!(clamped, "reconstructed samples clamped to the 8-bit range");
        }
        debug!("compression finished");
        Ok(output)
    }

    #[cfg(feature = "parallel")]
    fn process_channels(
        &self,
        transform: &BlockTransform,
        red: Plane,
        green: Plane,
        blue: Plane,
    ) -> Result<(Plane, Plane, Plane), DctError> {
        let (red, (green, blue)) = rayon::join(
            || self.process_channel(transform, Channel::Red, red),
            || {
                rayon::join(
                    || self.process_channel(transform, Channel::Green, green),
                    || self.process_channel(transform, Channel::Blue, blue),
                )
            },
        );
        Ok((red?, green?, blue?))
    }

    #[cfg(not(feature = "parallel"))]
    fn process_channels(
        &self,
        transform: &BlockTransform,
        red: Plane,
        green: Plane,
        blue: Plane,
    ) -> Result<(Plane, Plane, Plane), DctError> {
        let red = self.process_channel(transform, Channel::Red, red)?;
        let green = self.process_channel(transform, Channel::Green, green)?;
        let blue = self.process_channel(transform, Channel::Blue, blue)?;
        Ok((red, green, blue))
    }

    /// Runs one channel through forward DCT, quantization and inverse DCT.
    fn process_channel(
        &self,
        transform: &BlockTransform,
        channel: Channel,
        plane: Plane,
    ) -> Result<Plane, DctError> {
        let params = &self.parameters;

        let coefficients = transform.forward(&plane, &self.cancel)?;
        trace!(?channel, "forward transform done");

        let coefficients = quantize(coefficients, params.threshold, params.rate, &self.cancel)?;
        trace!(?channel, nonzero = coefficients.count_nonzero(), "quantization done");

        let reconstructed = transform.inverse(&coefficients, &self.cancel)?;
        trace!(?channel, "inverse transform done");
        Ok(reconstructed)
    }
}

/// Compresses `image` with the direct transform kernel.
pub fn compress(
    image: &RgbImage,
    block_size: usize,
    threshold: f64,
    rate: u32,
) -> Result<RgbImage, DctError> {
    DctCompressor::new(CompressionParameters::new(block_size, threshold, rate)).compress(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression_parameters::TransformKernel;

    fn checkerboard(width: u32, height: u32) -> RgbImage {
        let mut image = RgbImage::filled(width, height, [0, 0, 0]).unwrap();
        for y in 0..height {
            for x in 0..width {
                let v = if (x / 2 + y / 2) % 2 == 0 { 220 } else { 30 };
                image.set_pixel(x, y, [v, 255 - v, 128]);
            }
        }
        image
    }

    #[test]
    fn test_block_size_larger_than_image() {
        let image = checkerboard(10, 6);
        assert_eq!(compress(&image, 8, 10.0, 4), Err(DctError::BlockSizeExceedsImage));
        assert_eq!(compress(&image, 0, 10.0, 4), Err(DctError::InvalidParameterBlockSize));
    }

    #[test]
    fn test_uniform_image_survives() {
        let image = RgbImage::filled(16, 16, [100, 150, 200]).unwrap();
        let output = compress(&image, 8, 1.0, 4).unwrap();
        assert_eq!(output.width, 16);
        assert_eq!(output.height, 16);
        for y in 0..16 {
            for x in 0..16 {
                let [r, g, b] = output.pixel(x, y);
                assert!((r as i32 - 100).abs() <= 1);
                assert!((g as i32 - 150).abs() <= 1);
                assert!((b as i32 - 200).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_full_threshold_gives_black_image() {
        let image = checkerboard(16, 16);
        let output = compress(&image, 8, 1.0e9, 4).unwrap();
        assert!(output.pixels.iter().all(|v| *v == 0));
    }

    #[test]
    fn test_output_keeps_original_size() {
        let image = checkerboard(10, 10);
        let output = compress(&image, 8, 5.0, 6).unwrap();
        assert_eq!((output.width, output.height), (10, 10));
        assert_eq!(output.pixels.len(), 300);
    }

    #[test]
    fn test_separable_kernel_pipeline() {
        let image = RgbImage::filled(16, 8, [40, 90, 250]).unwrap();
        let params = CompressionParameters::new(8, 1.0, 4).with_kernel(TransformKernel::Separable);
        let output = DctCompressor::new(params).compress(&image).unwrap();
        for (a, b) in image.pixels.iter().zip(&output.pixels) {
            assert!((*a as i32 - *b as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let compressor = DctCompressor::new(CompressionParameters::default()).with_cancellation(token);
        let image = checkerboard(8, 8);
        assert_eq!(compressor.compress(&image), Err(DctError::Cancelled));
    }
}
