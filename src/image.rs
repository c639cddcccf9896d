use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::constants::COMPONENT_COUNT;
use crate::error::DctError;

/// Colour channel of an interleaved RGB pixel, by byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Channel {
    pub const ALL: [Channel; COMPONENT_COUNT] = [Channel::Red, Channel::Green, Channel::Blue];

    pub fn offset(self) -> usize {
        u8::from(self) as usize
    }
}

/// An 8-bit interleaved RGB raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    /// Width of the image in pixels.
    pub width: u32,
    /// Height of the image in pixels.
    pub height: u32,
    /// Row-major `R, G, B` triples, `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

impl RgbImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DctError> {
        if width == 0 {
            return Err(DctError::InvalidArgumentWidth);
        }
        if height == 0 {
            return Err(DctError::InvalidArgumentHeight);
        }
        if pixels.len() != width as usize * height as usize * COMPONENT_COUNT {
            return Err(DctError::InvalidArgumentSize);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// An image with every pixel set to `rgb`.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self, DctError> {
        let count = width as usize * height as usize;
        Self::new(width, height, rgb.repeat(count))
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * COMPONENT_COUNT
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.index(x, y);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = self.index(x, y);
        self.pixels[i..i + COMPONENT_COUNT].copy_from_slice(&rgb);
    }

    pub fn sample(&self, x: u32, y: u32, channel: Channel) -> u8 {
        self.pixels[self.index(x, y) + channel.offset()]
    }
}
