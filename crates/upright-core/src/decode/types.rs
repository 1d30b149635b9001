//! Core types for image decoding.

use thiserror::Error;

use crate::orientation::OrientationError;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The decoded pixels couldn't be brought upright.
    #[error(transparent)]
    Orientation(#[from] OrientationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::CorruptedFile("unexpected EOF".to_string());
        assert_eq!(err.to_string(), "Corrupted or incomplete image file: unexpected EOF");

        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }

    #[test]
    fn test_orientation_error_is_transparent() {
        let err: DecodeError =
            OrientationError::ResampleFailure("out of memory".to_string()).into();
        assert_eq!(err.to_string(), "Resample failed: out of memory");
    }
}
