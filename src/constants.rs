pub const MINIMUM_SAMPLE_VALUE: i32 = 0;
pub const MAXIMUM_SAMPLE_VALUE: i32 = 255;

// Interleaved RGB, one byte per channel.
pub const COMPONENT_COUNT: usize = 3;

pub const DEFAULT_BLOCK_SIZE: usize = 8;
pub const DEFAULT_THRESHOLD: f64 = 10.0;
pub const DEFAULT_RATE: u32 = 4;

// Beyond 52 bits the quantizer step falls below the f64 resolution of the block
// maximum and the staircase descent can no longer make progress.
pub const MAXIMUM_RATE: u32 = 52;
