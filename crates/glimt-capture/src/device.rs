//! Camera Device Capture Source
//!
//! Unlike screen capture there is no dedicated thread and no scaling
//! stage here: the platform backend negotiates a capability close to the
//! requested constraints and pushes frames from its own callback thread.
//! This type only manages the backend's lifecycle.

use tracing::{debug, info};

use glimt_frame::FrameCallback;

use crate::backend::{DeviceBackend, DeviceRegistry, SourceState};
use crate::config::CameraConstraints;
use crate::error::{CaptureError, Result};

/// Camera capture source backed by a platform device
///
/// State machine: `Created -> Running -> Stopped`. [`start`](Self::start)
/// is idempotent; [`stop`](Self::stop) guarantees no further callback
/// invocations after it returns. Dropping a running source stops it.
pub struct DeviceCaptureSource {
    index: u32,
    constraints: CameraConstraints,
    callback: FrameCallback,
    backend: Box<dyn DeviceBackend>,
    running: bool,
}

impl DeviceCaptureSource {
    /// Open the device at `index` from `registry`
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::DeviceUnavailable`] when the index is out
    /// of range or the device cannot be opened, and
    /// [`CaptureError::InvalidConfig`] for constraints that fail
    /// validation.
    pub fn create(
        registry: &dyn DeviceRegistry,
        index: u32,
        constraints: CameraConstraints,
        callback: FrameCallback,
    ) -> Result<Self> {
        constraints.validate().map_err(CaptureError::InvalidConfig)?;

        let count = registry.device_count();
        if index >= count {
            return Err(CaptureError::DeviceUnavailable {
                index,
                reason: format!("index out of range (have {count} devices)"),
            });
        }

        let backend = registry.open(index, &constraints).map_err(|fault| {
            CaptureError::DeviceUnavailable { index, reason: fault.to_string() }
        })?;

        info!(
            index,
            width = constraints.width,
            height = constraints.height,
            target_fps = constraints.target_fps,
            "camera capture source created"
        );

        Ok(Self { index, constraints, callback, backend, running: false })
    }

    /// Whether the device is currently streaming
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin streaming frames through the callback
    ///
    /// No-op if already running.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::DeviceUnavailable`] when the device refuses
    /// to start.
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            debug!(index = self.index, "device already streaming");
            return Ok(());
        }

        self.backend.start(std::sync::Arc::clone(&self.callback)).map_err(|fault| {
            CaptureError::DeviceUnavailable { index: self.index, reason: fault.to_string() }
        })?;

        self.running = true;
        info!(index = self.index, "camera streaming started");
        Ok(())
    }

    /// Stop streaming
    ///
    /// Blocking until the backend guarantees no further callback
    /// invocations. No-op if not running.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.backend.stop();
        self.running = false;
        info!(index = self.index, "camera streaming stopped");
    }

    /// Streaming state; a local camera source is always live
    #[must_use]
    pub fn state(&self) -> SourceState {
        SourceState::Live
    }

    /// Camera sources are not screencasts
    #[must_use]
    pub fn is_screencast(&self) -> bool {
        false
    }

    /// Camera sources are never remote
    #[must_use]
    pub fn remote(&self) -> bool {
        false
    }

    /// Constraints requested at construction
    #[must_use]
    pub fn constraints(&self) -> &CameraConstraints {
        &self.constraints
    }
}

impl Drop for DeviceCaptureSource {
    fn drop(&mut self) {
        self.stop();
    }
}
