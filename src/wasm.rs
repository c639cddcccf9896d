//! WebAssembly bindings for dctform-rs.
//!
//! This module provides JavaScript-compatible functions via wasm-bindgen
//! for use in browsers and Node.js.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::{CompressionParameters, DctCompressor, RgbImage, metrics};

/// Compress and reconstruct interleaved RGB pixels.
///
/// # Arguments
/// * `pixels` - `width * height * 3` bytes of RGB data
/// * `block_size` - DCT block edge length, at most the smaller image dimension
/// * `threshold` - coefficients with a smaller magnitude are dropped
/// * `rate` - quantizer resolution in bits per block
///
/// # Returns
/// Reconstructed RGB pixels as Uint8Array
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn compress_rgb(
    pixels: &[u8],
    width: u32,
    height: u32,
    block_size: u32,
    threshold: f64,
    rate: u32,
) -> Result<Vec<u8>, JsValue> {
    let image = RgbImage::new(width, height, pixels.to_vec())
        .map_err(|e| JsValue::from_str(&format!("Image error: {}", e)))?;
    let params = CompressionParameters::new(block_size as usize, threshold, rate);
    let output = DctCompressor::new(params)
        .compress(&image)
        .map_err(|e| JsValue::from_str(&format!("Compress error: {}", e)))?;
    Ok(output.pixels)
}

/// PSNR in decibels between two RGB buffers of the same size.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn psnr_rgb(original: &[u8], reconstructed: &[u8], width: u32, height: u32) -> Result<f64, JsValue> {
    let original = RgbImage::new(width, height, original.to_vec())
        .map_err(|e| JsValue::from_str(&format!("{}", e)))?;
    let reconstructed = RgbImage::new(width, height, reconstructed.to_vec())
        .map_err(|e| JsValue::from_str(&format!("{}", e)))?;
    metrics::psnr(&original, &reconstructed).map_err(|e| JsValue::from_str(&format!("{}", e)))
}
