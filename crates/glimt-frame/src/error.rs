//! Error types for frame construction and conversion
//!
//! Provides typed errors that library users can match and handle specifically.

use thiserror::Error;

/// Errors that can occur when building or converting frames
///
/// All fallible frame operations return `Result<T, FrameError>`.
#[derive(Error, Debug)]
pub enum FrameError {
    /// Frame dimensions are not usable
    ///
    /// Frames consumed by the scaler and downstream encoders must have
    /// even, non-zero width and height (alignment = 2).
    #[error("Invalid frame dimensions {width}x{height} (expected even, non-zero)")]
    InvalidDimensions {
        /// Rejected width
        width: u32,
        /// Rejected height
        height: u32,
    },

    /// Pixel data does not match the plane layout for the given dimensions
    #[error("Plane data size mismatch: expected {expected} bytes, got {actual}")]
    PlaneSize {
        /// Bytes required by the plane layout
        expected: usize,
        /// Bytes actually provided
        actual: usize,
    },

    /// Destination buffer is too small for the conversion output
    #[error("Destination buffer too small: need {needed} bytes, have {len}")]
    BufferTooSmall {
        /// Bytes the conversion would write
        needed: usize,
        /// Bytes available in the destination
        len: usize,
    },
}

/// Result type for frame operations
pub type Result<T> = std::result::Result<T, FrameError>;
