//! Native Capture Backends
//!
//! One `CaptureSource` interface with pluggable native backends selected at
//! construction, instead of parallel per-platform implementations of the
//! pacing and scaling logic. The traits here are the only boundary this
//! crate has with platform capture APIs.
//!
//! Screen backends are polled by the dedicated capture thread; device
//! (camera) backends push frames from their own platform callback thread
//! and negotiate near-target capability natively.

use glimt_frame::{FrameCallback, PackedFrame};

use crate::error::CaptureFault;

/// Opaque identifier of an enumerable capture source (screen or window)
pub type SourceId = u64;

/// One enumerated capture source
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    /// Backend-assigned identifier, stable while the source exists
    pub id: SourceId,

    /// Human-readable title (display name or window title)
    pub title: String,
}

/// Streaming state of a capture source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// The source is producing (or ready to produce) frames
    Live,
    /// The source has permanently stopped producing frames
    ///
    /// Local sources never reach this state until disposed; only remote
    /// tracks end permanently.
    Ended,
}

/// One native frame as handed over by a backend
///
/// Packed BGRA bytes; `stride` may exceed `width * 4` when the platform
/// pads rows.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// Packed BGRA pixel bytes
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row stride in bytes
    pub stride: usize,
}

impl CapturedImage {
    /// Borrowed packed view for the scaler
    #[must_use]
    pub fn as_packed(&self) -> PackedFrame<'_> {
        PackedFrame {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }
}

/// Platform screen/desktop capture, driven by the capture thread
///
/// Implementations are moved onto the dedicated capture thread, hence
/// `Send`. `capture_frame` is called outside any pipeline lock.
pub trait ScreenBackend: Send {
    /// Enumerate the capture sources currently available
    fn sources(&mut self) -> Vec<SourceDescriptor>;

    /// Select the source subsequent captures read from
    ///
    /// Returns `false` if the source cannot be selected.
    fn select_source(&mut self, id: SourceId) -> bool;

    /// Capture one native frame
    ///
    /// # Errors
    ///
    /// Returns a [`CaptureFault`] for transient failures; the capture loop
    /// logs the fault and continues.
    fn capture_frame(&mut self) -> std::result::Result<CapturedImage, CaptureFault>;
}

/// Platform camera device streaming frames from its own callback thread
pub trait DeviceBackend: Send {
    /// Begin streaming, delivering each frame through `callback`
    ///
    /// # Errors
    ///
    /// Returns a [`CaptureFault`] when the device cannot start.
    fn start(&mut self, callback: FrameCallback) -> std::result::Result<(), CaptureFault>;

    /// Stop streaming; no further callback invocations after return
    fn stop(&mut self);
}

/// Factory resolving device indices to camera backends
pub trait DeviceRegistry {
    /// Number of capture devices currently present
    fn device_count(&self) -> u32;

    /// Open the device at `index` with the given constraints
    ///
    /// # Errors
    ///
    /// Returns a [`CaptureFault`] when the device exists but cannot be
    /// opened (busy, permissions, capability negotiation failure).
    fn open(
        &self,
        index: u32,
        constraints: &crate::config::CameraConstraints,
    ) -> std::result::Result<Box<dyn DeviceBackend>, CaptureFault>;
}
