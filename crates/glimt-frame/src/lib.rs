//! # glimt-frame
//!
//! Video frame data types and pure image processing for the glimt capture
//! and rendering pipeline.
//!
//! This crate is part of the [glimt](https://github.com/glimt-media/glimt)
//! workspace and is consumed by [`glimt-capture`](https://crates.io/crates/glimt-capture)
//! (scaling captured frames) and [`glimt-render`](https://crates.io/crates/glimt-render)
//! (filling display buffers).
//!
//! # Features
//!
//! - **I420 Frame Buffers**: Immutable-once-built planar frames with
//!   rotation and monotonic timestamps
//! - **Aspect-Preserving Scaling**: Fit-within-bounds with even alignment
//!   for downstream encoders
//! - **Letterboxing**: Centered placement with uniform margins
//! - **BT.601 Conversion**: Packed BGRA to planar I420 (capture direction)
//!   and planar to packed RGBA (display direction)
//!
//! # Quick Start
//!
//! ```rust
//! use glimt_frame::{PackedFrame, ScaleSession};
//!
//! // A native 1920x1080 BGRA capture, scaled into 1280x720
//! let pixels = vec![0u8; 1920 * 1080 * 4];
//! let native = PackedFrame {
//!     data: &pixels,
//!     width: 1920,
//!     height: 1080,
//!     stride: 1920 * 4,
//! };
//!
//! let mut session = ScaleSession::new(1280, 720);
//! let frame = session.process(&native, 0).expect("scale");
//! assert_eq!((frame.width(), frame.height()), (1280, 720));
//! ```
//!
//! # Invariants
//!
//! Every frame produced by the scaler has even width and height
//! (alignment = 2); downstream encoders reject odd dimensions. Odd native
//! frames are cropped to the largest even sub-rectangle before processing,
//! and degenerate outputs are substituted with a minimum 2x2 frame.
//!
//! # Performance
//!
//! The conversions are reference implementations prioritizing correctness
//! over speed. For high frame rates consider SIMD or GPU-based conversion.

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod convert;
pub mod error;
pub mod frame;
pub mod scale;

// =============================================================================
// RE-EXPORTS - PRIMARY API
// =============================================================================

// Frame types
pub use frame::{i420_len, FrameBuffer, FrameCallback, PackedFrame, Rotation};

// Scaling
pub use scale::{fit_within, letterbox_rect, scale_packed, Rect, ScaleSession};

// Conversion
pub use convert::{bgra_to_i420, i420_to_rgba};

// Errors
pub use error::{FrameError, Result};

// =============================================================================
// CRATE-LEVEL ITEMS
// =============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
