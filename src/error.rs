use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DctError {
    #[error("Invalid parameter block size")]
    InvalidParameterBlockSize = 1,
    #[error("Invalid parameter threshold")]
    InvalidParameterThreshold = 2,
    #[error("Invalid parameter rate")]
    InvalidParameterRate = 3,
    #[error("Block size exceeds image width or height")]
    BlockSizeExceedsImage = 4,
    #[error("Operation cancelled")]
    Cancelled = 5,
    #[error("Invalid data")]
    InvalidData = 6,

    // Logic errors
    #[error("Invalid argument width")]
    InvalidArgumentWidth = 100,
    #[error("Invalid argument height")]
    InvalidArgumentHeight = 101,
    #[error("Invalid argument size")]
    InvalidArgumentSize = 102,
    #[error("Plane dimensions are not a multiple of the block size")]
    InvalidArgumentPlaneSize = 103,
}

impl DctError {
    /// True for the errors raised by parameter validation before any work starts.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameterBlockSize
                | Self::InvalidParameterThreshold
                | Self::InvalidParameterRate
                | Self::BlockSizeExceedsImage
        )
    }

    /// Stable numeric code, used by the C interface.
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_grouping() {
        assert!(DctError::InvalidParameterBlockSize.is_invalid_parameter());
        assert!(DctError::BlockSizeExceedsImage.is_invalid_parameter());
        assert!(!DctError::Cancelled.is_invalid_parameter());
        assert!(!DctError::InvalidArgumentSize.is_invalid_parameter());
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(DctError::InvalidParameterBlockSize.code(), 1);
        assert_eq!(DctError::InvalidArgumentPlaneSize.code(), 103);
    }
}
