//! Video Track Boundary
//!
//! The producer-side interface renderers bind to. A track multiplexes one
//! frame stream to any number of sinks; the renderer registers its frame
//! callback under its own handle and unregisters it on rebind or dispose.

use std::sync::Arc;

use glimt_frame::FrameCallback;

use crate::registry::RendererId;

/// A video track delivering frames to registered sinks
///
/// Implementations call every registered callback for each frame, from
/// whatever thread produces the frame.
pub trait VideoTrack: Send + Sync {
    /// Track identifier, unique within its stream
    fn id(&self) -> String;

    /// Register `callback` under `sink`; replaces a previous registration
    fn add_sink(&self, sink: RendererId, callback: FrameCallback);

    /// Unregister the callback for `sink`; no-op if absent
    fn remove_sink(&self, sink: RendererId);
}

/// Whether a stream originates locally or from a remote peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOrigin {
    /// Captured by this process (screen or camera source)
    Local,
    /// Received from a remote peer
    Remote,
}

/// Selects the stream a renderer should display
#[derive(Debug, Clone)]
pub struct TrackSelector {
    /// Identifier of the media stream
    pub stream_id: String,
    /// Which side of the connection the stream lives on
    pub origin: TrackOrigin,
}

/// Resolves selectors to the video tracks of a stream
///
/// Implemented by the embedding layer that owns the streams.
pub trait TrackResolver {
    /// Look up the video tracks of the selected stream
    ///
    /// `None` means the stream itself is unknown (the renderer detaches);
    /// `Some` with an empty vec means the stream exists but carries no
    /// video, which is an attach error.
    fn resolve(&self, selector: &TrackSelector) -> Option<Vec<Arc<dyn VideoTrack>>>;
}
