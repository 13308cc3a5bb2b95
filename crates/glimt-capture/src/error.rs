//! Error types for capture source construction and operation
//!
//! Construction-time failures surface synchronously as [`CaptureError`];
//! per-frame failures inside a running capture loop are [`CaptureFault`]s,
//! which are logged and swallowed - a single failed frame must not end a
//! session.

use thiserror::Error;

use crate::backend::SourceId;

/// Errors that can occur when constructing or controlling a capture source
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The requested capture region cannot be selected
    ///
    /// The source id is not among the enumerated capture sources, or the
    /// backend refused to select it.
    #[error("Capture source {0} is unavailable")]
    SourceUnavailable(SourceId),

    /// The requested capture device cannot be opened
    ///
    /// The device index is out of range, the device is busy, or it failed
    /// to start streaming.
    #[error("Capture device {index} is unavailable: {reason}")]
    DeviceUnavailable {
        /// Requested device index
        index: u32,
        /// Backend-provided reason
        reason: String,
    },

    /// The capture configuration failed validation
    #[error("Invalid capture configuration: {}", .0.join(", "))]
    InvalidConfig(Vec<String>),

    /// The dedicated capture thread could not be spawned
    #[error("Failed to spawn capture thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),
}

/// Result type for capture operations
pub type Result<T> = std::result::Result<T, CaptureError>;

/// A transient, per-frame capture failure
///
/// Returned by backends for recoverable faults (e.g. the compositor
/// briefly withheld a frame). The capture loop logs these and continues.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct CaptureFault(String);

impl CaptureFault {
    /// Create a fault with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CaptureError::SourceUnavailable(3);
        assert_eq!(err.to_string(), "Capture source 3 is unavailable");

        let err = CaptureError::DeviceUnavailable {
            index: 2,
            reason: "device busy".to_string(),
        };
        assert!(err.to_string().contains("device busy"));

        let err = CaptureError::InvalidConfig(vec!["a".to_string(), "b".to_string()]);
        assert!(err.to_string().contains("a, b"));
    }

    #[test]
    fn test_fault_message() {
        let fault = CaptureFault::new("frame dropped");
        assert_eq!(fault.to_string(), "frame dropped");
    }
}
