//! Error types for renderer registry operations

use thiserror::Error;

use crate::registry::RendererId;

/// Errors that can occur when operating on registered renderers
#[derive(Error, Debug)]
pub enum RenderError {
    /// No renderer is registered under the given handle
    ///
    /// Also returned for a second `dispose` of the same handle: the first
    /// call removes the entry, so racing callers get an error instead of a
    /// double free.
    #[error("No renderer registered under handle {0}")]
    HandleNotFound(RendererId),

    /// The selected stream resolved but carries no video tracks
    #[error("Stream {0:?} has no video tracks")]
    EmptyStream(String),
}

/// Result type for renderer operations
pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::HandleNotFound(RendererId::from_raw(4));
        assert_eq!(err.to_string(), "No renderer registered under handle 4");

        let err = RenderError::EmptyStream("main".to_string());
        assert!(err.to_string().contains("main"));
    }
}
