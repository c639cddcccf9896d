//! C Foreign Function Interface for dctform-rs.
//!
//! Callers own every buffer; nothing is allocated across the boundary.

use std::os::raw::{c_int, c_uchar};

use crate::{CompressionParameters, DctCompressor, DctError, RgbImage};

/// Error codes.
#[repr(C)]
pub enum DctFormStatus {
    Ok = 0,
    InvalidArgument = 1,
    BufferTooSmall = 2,
    InvalidParameter = 3,
    InternalError = 4,
}

impl From<DctError> for DctFormStatus {
    fn from(error: DctError) -> Self {
        if error.is_invalid_parameter() {
            DctFormStatus::InvalidParameter
        } else {
            match error {
                DctError::InvalidArgumentWidth
                | DctError::InvalidArgumentHeight
                | DctError::InvalidArgumentSize => DctFormStatus::InvalidArgument,
                _ => DctFormStatus::InternalError,
            }
        }
    }
}

/// Compress and reconstruct an interleaved RGB image.
///
/// Writes `width * height * 3` bytes to `output` and returns a `DctFormStatus`.
///
/// # Safety
/// `pixels` must point to `pixels_len` readable bytes and `output` to
/// `output_len` writable bytes.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn dctform_compress_rgb(
    pixels: *const c_uchar,
    pixels_len: usize,
    width: u32,
    height: u32,
    block_size: u32,
    threshold: f64,
    rate: u32,
    output: *mut c_uchar,
    output_len: usize,
) -> c_int {
    if pixels.is_null() || output.is_null() {
        return DctFormStatus::InvalidArgument as c_int;
    }

    let input = unsafe { std::slice::from_raw_parts(pixels, pixels_len) };
    let image = match RgbImage::new(width, height, input.to_vec()) {
        Ok(image) => image,
        Err(e) => return DctFormStatus::from(e) as c_int,
    };
    if output_len < image.pixels.len() {
        return DctFormStatus::BufferTooSmall as c_int;
    }

    let params = CompressionParameters::new(block_size as usize, threshold, rate);
    match DctCompressor::new(params).compress(&image) {
        Ok(result) => {
            let dest = unsafe { std::slice::from_raw_parts_mut(output, result.pixels.len()) };
            dest.copy_from_slice(&result.pixels);
            DctFormStatus::Ok as c_int
        }
        Err(e) => DctFormStatus::from(e) as c_int,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_through_c_abi() {
        let pixels = vec![90u8; 8 * 8 * 3];
        let mut output = vec![0u8; pixels.len()];
        let status = unsafe {
            dctform_compress_rgb(
                pixels.as_ptr(),
                pixels.len(),
                8,
                8,
                8,
                1.0,
                4,
                output.as_mut_ptr(),
                output.len(),
            )
        };
        assert_eq!(status, DctFormStatus::Ok as c_int);
        assert!(output.iter().all(|v| (*v as i32 - 90).abs() <= 1));
    }

    #[test]
    fn test_status_codes() {
        let pixels = vec![0u8; 4 * 4 * 3];
        let mut small = vec![0u8; 10];
        let status = unsafe {
            dctform_compress_rgb(pixels.as_ptr(), pixels.len(), 4, 4, 4, 1.0, 4, small.as_mut_ptr(), small.len())
        };
        assert_eq!(status, DctFormStatus::BufferTooSmall as c_int);

        let mut output = vec![0u8; pixels.len()];
        let status = unsafe {
            dctform_compress_rgb(pixels.as_ptr(), pixels.len(), 4, 4, 8, 1.0, 4, output.as_mut_ptr(), output.len())
        };
        assert_eq!(status, DctFormStatus::InvalidParameter as c_int);

        let status = unsafe {
            dctform_compress_rgb(std::ptr::null(), 0, 4, 4, 4, 1.0, 4, output.as_mut_ptr(), output.len())
        };
        assert_eq!(status, DctFormStatus::InvalidArgument as c_int);
    }
}
