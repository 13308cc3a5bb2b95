//! Capture Configuration
//!
//! Geometry and rate constraints requested at source construction. Both
//! config types are immutable for the source's lifetime - changing them
//! requires creating a new source.
//!
//! # Examples
//!
//! ```rust
//! use glimt_capture::CaptureConfig;
//!
//! // Using builder pattern
//! let config = CaptureConfig::builder()
//!     .max_width(1280)
//!     .max_height(720)
//!     .target_fps(30)
//!     .build();
//!
//! // Using struct literal with defaults
//! let config = CaptureConfig {
//!     target_fps: 15,
//!     ..Default::default()
//! };
//! ```

use std::time::Duration;

/// Geometry and rate constraints for a screen capture source
///
/// Captured frames are scaled (preserving aspect ratio) so that neither
/// axis exceeds its bound, then even-aligned for downstream encoders.
/// The target frame rate is a ceiling: the capture loop throttles below
/// it when native capture cost would exceed the CPU budget.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Maximum output frame width in pixels (default: 1280)
    pub max_width: u32,

    /// Maximum output frame height in pixels (default: 720)
    pub max_height: u32,

    /// Requested frames per second (default: 30)
    ///
    /// The effective rate is self-limiting: under heavy native-capture
    /// cost the loop trades frame rate for CPU fairness.
    pub target_fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_width: 1280,
            max_height: 720,
            target_fps: 30,
        }
    }
}

impl CaptureConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder::default()
    }

    /// Validate configuration and return any issues
    ///
    /// Returns `Ok(())` if configuration is valid, or a list of issues.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();

        if self.max_width < 2 {
            issues.push("max_width must be at least 2".to_string());
        }

        if self.max_height < 2 {
            issues.push("max_height must be at least 2".to_string());
        }

        if self.target_fps == 0 {
            issues.push("target_fps must be at least 1".to_string());
        }

        if self.target_fps > 240 {
            issues.push("target_fps should not exceed 240".to_string());
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    /// Requested interval between frames
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(u64::from(1000 / self.target_fps.max(1)))
    }
}

/// Builder for [`CaptureConfig`]
#[derive(Debug, Clone, Default)]
pub struct CaptureConfigBuilder {
    max_width: Option<u32>,
    max_height: Option<u32>,
    target_fps: Option<u32>,
}

impl CaptureConfigBuilder {
    /// Set maximum output width
    #[must_use]
    pub fn max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Set maximum output height
    #[must_use]
    pub fn max_height(mut self, height: u32) -> Self {
        self.max_height = Some(height);
        self
    }

    /// Set requested frames per second
    #[must_use]
    pub fn target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }

    /// Build the configuration
    ///
    /// Returns a [`CaptureConfig`] with builder values overriding defaults.
    #[must_use]
    pub fn build(self) -> CaptureConfig {
        let defaults = CaptureConfig::default();

        CaptureConfig {
            max_width: self.max_width.unwrap_or(defaults.max_width),
            max_height: self.max_height.unwrap_or(defaults.max_height),
            target_fps: self.target_fps.unwrap_or(defaults.target_fps),
        }
    }
}

/// Constraints requested from a camera device
///
/// Unlike screen capture there is no scaling stage: the device negotiates
/// a native capability close to these values directly.
#[derive(Debug, Clone)]
pub struct CameraConstraints {
    /// Requested frame width in pixels (default: 640)
    pub width: u32,

    /// Requested frame height in pixels (default: 480)
    pub height: u32,

    /// Requested frames per second (default: 30)
    pub target_fps: u32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            target_fps: 30,
        }
    }
}

impl CameraConstraints {
    /// Validate constraints and return any issues
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();

        if self.width == 0 || self.height == 0 {
            issues.push("dimensions must be non-zero".to_string());
        }

        if self.target_fps == 0 {
            issues.push("target_fps must be at least 1".to_string());
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}
