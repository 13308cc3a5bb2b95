//! Compositor Boundary
//!
//! The UI-side texture surface renderers draw into. The registry registers
//! one texture per renderer and notifies the compositor whenever a new
//! frame is ready; the compositor answers by calling
//! [`RenderSink::pull`](crate::RenderSink::pull) on its render thread.

use std::sync::Arc;

use crate::sink::RenderSink;

/// Compositor-assigned texture identifier
pub type TextureId = i64;

/// Embedding-layer compositor that owns display textures
///
/// `mark_frame_available` is called from producer threads and must be
/// fire-and-forget; the actual pixel copy happens later on the render
/// thread via the registered sink.
pub trait Compositor: Send + Sync {
    /// Create a texture backed by `sink` and return its identifier
    fn register_texture(&self, sink: Arc<RenderSink>) -> TextureId;

    /// Notify that the sink holds a newer frame than last pulled
    fn mark_frame_available(&self, texture: TextureId);

    /// Release the texture; the compositor must not pull afterwards
    fn unregister_texture(&self, texture: TextureId);
}
