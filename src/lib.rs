//! Block DCT lossy image compression.
//!
//! An RGB image is split into three zero-padded planes, each plane is
//! transformed block by block with a 2D DCT, the coefficients are thresholded
//! and quantized per block, and the inverse DCT rebuilds the pixels.
//!
//! ```no_run
//! use dctform_rs::{CompressionParameters, DctCompressor, RgbImage};
//!
//! let image = RgbImage::filled(64, 48, [120, 80, 200])?;
//! let output = DctCompressor::new(CompressionParameters::new(8, 10.0, 4)).compress(&image)?;
//! assert_eq!((output.width, output.height), (64, 48));
//! # Ok::<(), dctform_rs::DctError>(())
//! ```

pub mod cancellation;
pub mod compression_parameters;
pub mod constants;
pub mod dct;
pub mod error;
pub mod image;
pub mod metrics;
pub mod pipeline;
pub mod plane;
pub mod plane_converter;
pub mod quantization;
pub mod wasm;

#[cfg(any(feature = "ffi", test))]
pub mod ffi;

pub use cancellation::CancellationToken;
pub use compression_parameters::{CompressionParameters, TransformKernel};
pub use error::DctError;
pub use image::{Channel, RgbImage};
pub use pipeline::{DctCompressor, compress};
pub use plane::Plane;
