//! # glimt-capture
//!
//! Screen and camera capture sources for the glimt video pipeline.
//!
//! This crate is part of the [glimt](https://github.com/glimt-media/glimt)
//! workspace. It produces [`glimt_frame::FrameBuffer`]s and delivers them
//! through a [`glimt_frame::FrameCallback`], typically into
//! [`glimt-render`](https://crates.io/crates/glimt-render).
//!
//! # Features
//!
//! - **Screen Capture**: A dedicated, self-paced capture thread that
//!   polls a [`ScreenBackend`], scales frames to configured bounds and
//!   throttles itself to a fixed CPU budget
//! - **Camera Capture**: Threadless lifecycle management over a
//!   [`DeviceBackend`] that pushes frames from its own platform callback
//! - **Pluggable Backends**: Platform capture APIs sit behind traits;
//!   the pacing and scaling logic is shared and platform-independent
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use glimt_capture::{CaptureConfig, ScreenBackend, ScreenCaptureSource};
//!
//! fn run(backend: Box<dyn ScreenBackend>) -> glimt_capture::Result<()> {
//!     let config = CaptureConfig::builder()
//!         .max_width(1280)
//!         .max_height(720)
//!         .target_fps(30)
//!         .build();
//!
//!     let callback = Arc::new(|frame: glimt_frame::FrameBuffer| {
//!         println!("frame {}x{}", frame.width(), frame.height());
//!     });
//!
//!     let mut source = ScreenCaptureSource::create(backend, 0, config, callback)?;
//!     source.start()?;
//!     // ... later
//!     source.stop();
//!     Ok(())
//! }
//! ```
//!
//! # Threading
//!
//! Each running [`ScreenCaptureSource`] owns exactly one capture thread;
//! `stop` joins it before returning, so no capture thread ever outlives
//! its source. [`DeviceCaptureSource`] spawns no thread of its own.

use std::sync::OnceLock;
use std::time::Instant;

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod backend;
pub mod config;
pub mod device;
pub mod error;
pub mod screen;

// =============================================================================
// RE-EXPORTS - PRIMARY API
// =============================================================================

// Backend traits and descriptors
pub use backend::{
    CapturedImage, DeviceBackend, DeviceRegistry, ScreenBackend, SourceDescriptor, SourceId,
    SourceState,
};

// Configuration
pub use config::{CameraConstraints, CaptureConfig, CaptureConfigBuilder};

// Sources
pub use device::DeviceCaptureSource;
pub use screen::{ScreenCaptureSource, MAX_CPU_CONSUMPTION_PERCENT};

// Errors
pub use error::{CaptureError, CaptureFault, Result};

// =============================================================================
// CRATE-LEVEL ITEMS
// =============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Milliseconds on a process-wide monotonic clock
///
/// Frame timestamps must never go backwards, which wall clocks cannot
/// guarantee. All sources in the process share one epoch so timestamps
/// from different sources are comparable.
#[must_use]
pub fn monotonic_ms() -> i64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = EPOCH.get_or_init(Instant::now);
    i64::try_from(epoch.elapsed().as_millis()).unwrap_or(i64::MAX)
}
