//! Conversion between interleaved RGB rasters and padded channel planes.

use crate::constants::{MAXIMUM_SAMPLE_VALUE, MINIMUM_SAMPLE_VALUE};
use crate::error::DctError;
use crate::image::{Channel, RgbImage};
use crate::plane::Plane;

/// The three colour planes of one image, each padded to whole blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPlanes {
    pub red: Plane,
    pub green: Plane,
    pub blue: Plane,
}

/// Splits `image` into three block-aligned planes. Padding samples are zero.
pub fn to_planes(image: &RgbImage, block_size: usize) -> Result<ChannelPlanes, DctError> {
    let width = image.width as usize;
    let height = image.height as usize;

    let mut red = Plane::zeroed(width, height, block_size)?;
    let mut green = red.zeroed_like();
    let mut blue = red.zeroed_like();

    for y in 0..image.height {
        for x in 0..image.width {
            let [r, g, b] = image.pixel(x, y);
            red.set(x as usize, y as usize, r as f64);
            green.set(x as usize, y as usize, g as f64);
            blue.set(x as usize, y as usize, b as f64);
        }
    }

    Ok(ChannelPlanes { red, green, blue })
}

/// Truncates toward zero, then clamps into the 8-bit sample range.
///
/// Reconstructed values routinely leave `[0, 255]` after quantization; that is
/// expected loss, not an error.
#[inline]
pub fn clamp_sample(value: f64) -> u8 {
    (value as i32).clamp(MINIMUM_SAMPLE_VALUE, MAXIMUM_SAMPLE_VALUE) as u8
}

/// Reassembles an image of `width x height` pixels from the top-left of each plane.
///
/// Returns the image and the number of samples that had to be clamped.
pub fn to_image_with_clamp_count(
    planes: &ChannelPlanes,
    width: u32,
    height: u32,
) -> Result<(RgbImage, usize), DctError> {
    for plane in [&planes.red, &planes.green, &planes.blue] {
        if plane.width() < width as usize || plane.height() < height as usize {
            return Err(DctError::InvalidArgumentPlaneSize);
        }
    }

    let mut image = RgbImage::filled(width, height, [0, 0, 0])?;
    let mut clamped = 0usize;
    for y in 0..height {
        for x in 0..width {
            let mut rgb = [0u8; 3];
            for channel in Channel::ALL {
                let plane = planes.get(channel);
                let value = plane.get(x as usize, y as usize);
                let truncated = value as i32;
                if !(MINIMUM_SAMPLE_VALUE..=MAXIMUM_SAMPLE_VALUE).contains(&truncated) {
                    clamped += 1;
                }
                rgb[channel.offset()] = clamp_sample(value);
            }
            image.set_pixel(x, y, rgb);
        }
    }

    Ok((image, clamped))
}

/// Reassembles an image of `width x height` pixels, ignoring plane padding.
pub fn to_image(planes: &ChannelPlanes, width: u32, height: u32) -> Result<RgbImage, DctError> {
    to_image_with_clamp_count(planes, width, height).map(|(image, _)| image)
}

impl ChannelPlanes {
    pub fn get(&self, channel: Channel) -> &Plane {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbImage {
        let mut image = RgbImage::filled(width, height, [0, 0, 0]).unwrap();
        for y in 0..height {
            for x in 0..width {
                image.set_pixel(x, y, [(x * 10) as u8, (y * 10) as u8, 200]);
            }
        }
        image
    }

    #[test]
    fn test_padding_is_zero() {
        let image = gradient(10, 10);
        let planes = to_planes(&image, 8).unwrap();
        assert_eq!(planes.red.width(), 16);
        assert_eq!(planes.red.height(), 16);
        for plane in [&planes.red, &planes.green, &planes.blue] {
            for y in 0..16 {
                for x in 0..16 {
                    if x >= 10 || y >= 10 {
                        assert_eq!(plane.get(x, y), 0.0);
                    }
                }
            }
        }
        assert_eq!(planes.red.get(9, 0), 90.0);
        assert_eq!(planes.green.get(0, 9), 90.0);
        assert_eq!(planes.blue.get(9, 9), 200.0);
    }

    #[test]
    fn test_zero_block_size() {
        let image = gradient(4, 4);
        assert_eq!(to_planes(&image, 0), Err(DctError::InvalidParameterBlockSize));
    }

    #[test]
    fn test_clamp_sample() {
        assert_eq!(clamp_sample(-5.2), 0);
        assert_eq!(clamp_sample(260.7), 255);
        assert_eq!(clamp_sample(127.9), 127);
        assert_eq!(clamp_sample(-0.9), 0);
        assert_eq!(clamp_sample(f64::NAN), 0);
    }

    #[test]
    fn test_round_trip_without_transform() {
        let image = gradient(10, 7);
        let planes = to_planes(&image, 4).unwrap();
        assert_eq!(to_image(&planes, 10, 7).unwrap(), image);
    }

    #[test]
    fn test_out_of_range_values_are_clamped_and_counted() {
        let mut planes = to_planes(&gradient(8, 8), 8).unwrap();
        planes.red.set(0, 0, -5.2);
        planes.green.set(0, 0, 260.7);
        // Outside the output area, never read back.
        planes.blue.set(7, 7, 999.0);
        let (image, clamped) = to_image_with_clamp_count(&planes, 7, 7).unwrap();
        assert_eq!(image.pixel(0, 0), [0, 255, 200]);
        assert_eq!(clamped, 2);
    }

    #[test]
    fn test_planes_smaller_than_image() {
        let planes = to_planes(&gradient(8, 8), 8).unwrap();
        assert_eq!(to_image(&planes, 9, 8), Err(DctError::InvalidArgumentPlaneSize));
    }
}
