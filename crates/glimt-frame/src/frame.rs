//! Frame Data Types
//!
//! Defines [`FrameBuffer`], the immutable-once-built value representing one
//! decoded video frame, and [`PackedFrame`], a borrowed view of the packed
//! BGRA pixels a native capture backend produces.
//!
//! # Plane Layout
//!
//! [`FrameBuffer`] stores I420 planar data in a single contiguous buffer:
//!
//! - Y plane: `width * height` bytes
//! - U plane: `width/2 * height/2` bytes
//! - V plane: `width/2 * height/2` bytes
//!
//! Rows are tightly packed (stride equals width for Y, `width/2` for chroma).
//! Width and height are always even (alignment = 2), which downstream
//! encoders require.

use std::sync::Arc;

use crate::error::{FrameError, Result};

/// Frame rotation in degrees, clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// No rotation (default)
    #[default]
    Deg0,
    /// Rotated 90 degrees
    Deg90,
    /// Rotated 180 degrees
    Deg180,
    /// Rotated 270 degrees
    Deg270,
}

impl Rotation {
    /// Rotation angle in degrees
    #[must_use]
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Parse a rotation from degrees
    ///
    /// Returns `None` for anything other than 0, 90, 180, or 270.
    #[must_use]
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Whether this rotation swaps the display axes
    #[must_use]
    pub fn is_sideways(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

/// Callback through which every capture source and track delivers frames
///
/// Invoked on the producer's thread (capture thread or platform callback
/// thread) - implementations must not assume any particular thread.
pub type FrameCallback = Arc<dyn Fn(FrameBuffer) + Send + Sync>;

/// Required bytes for an I420 frame of the given (even) dimensions
#[must_use]
pub fn i420_len(width: u32, height: u32) -> usize {
    let w = width as usize;
    let h = height as usize;
    w * h + 2 * ((w / 2) * (h / 2))
}

/// One decoded video frame in I420 planar layout
///
/// Immutable once built. Created by a capture source or by the scaler,
/// moved along the pipeline, and consumed (copied into a display buffer)
/// by a render sink.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    rotation: Rotation,
    timestamp_ms: i64,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Build a frame from existing I420 data
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidDimensions`] for odd or zero dimensions
    /// and [`FrameError::PlaneSize`] when `data` does not match the plane
    /// layout for `width` x `height`.
    pub fn from_i420(
        width: u32,
        height: u32,
        rotation: Rotation,
        timestamp_ms: i64,
        data: Vec<u8>,
    ) -> Result<Self> {
        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
            return Err(FrameError::InvalidDimensions { width, height });
        }

        let expected = i420_len(width, height);
        if data.len() != expected {
            return Err(FrameError::PlaneSize {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            rotation,
            timestamp_ms,
            data,
        })
    }

    /// Build an all-black frame (Y=16, U=V=128)
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidDimensions`] for odd or zero dimensions.
    pub fn black(width: u32, height: u32, timestamp_ms: i64) -> Result<Self> {
        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
            return Err(FrameError::InvalidDimensions { width, height });
        }

        let y_len = (width as usize) * (height as usize);
        let c_len = ((width / 2) as usize) * ((height / 2) as usize);

        let mut data = vec![16u8; y_len];
        data.resize(y_len + 2 * c_len, 128u8);

        Ok(Self {
            width,
            height,
            rotation: Rotation::Deg0,
            timestamp_ms,
            data,
        })
    }

    /// Frame width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frame rotation
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Capture timestamp in monotonic milliseconds
    #[must_use]
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// Dimensions after applying rotation, as a display surface sees them
    #[must_use]
    pub fn display_size(&self) -> (u32, u32) {
        if self.rotation.is_sideways() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Y plane row stride in bytes
    #[must_use]
    pub fn stride_y(&self) -> usize {
        self.width as usize
    }

    /// Chroma plane row stride in bytes
    #[must_use]
    pub fn stride_c(&self) -> usize {
        (self.width / 2) as usize
    }

    /// Luma plane
    #[must_use]
    pub fn plane_y(&self) -> &[u8] {
        &self.data[..self.stride_y() * self.height as usize]
    }

    /// U chroma plane
    #[must_use]
    pub fn plane_u(&self) -> &[u8] {
        let y_len = self.stride_y() * self.height as usize;
        let c_len = self.stride_c() * (self.height / 2) as usize;
        &self.data[y_len..y_len + c_len]
    }

    /// V chroma plane
    #[must_use]
    pub fn plane_v(&self) -> &[u8] {
        let y_len = self.stride_y() * self.height as usize;
        let c_len = self.stride_c() * (self.height / 2) as usize;
        &self.data[y_len + c_len..y_len + 2 * c_len]
    }

    /// Full plane data (Y, then U, then V)
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Borrowed view of a packed BGRA frame as produced by a native capture
///
/// `stride` is the distance between row starts in bytes and may exceed
/// `width * 4` when the backend pads rows.
#[derive(Debug, Clone, Copy)]
pub struct PackedFrame<'a> {
    /// Packed BGRA pixel bytes
    pub data: &'a [u8],
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row stride in bytes
    pub stride: usize,
}

impl<'a> PackedFrame<'a> {
    /// View of one pixel row (exactly `width * 4` bytes)
    #[must_use]
    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = (y as usize) * self.stride;
        &self.data[start..start + (self.width as usize) * 4]
    }

    /// The largest even-aligned sub-rectangle anchored at the origin
    ///
    /// Odd native dimensions are cropped (not scaled) before any further
    /// processing. Stride and data are unchanged; only the visible extent
    /// shrinks.
    #[must_use]
    pub fn cropped_even(&self) -> PackedFrame<'a> {
        PackedFrame {
            data: self.data,
            width: self.width & !1,
            height: self.height & !1,
            stride: self.stride,
        }
    }
}
