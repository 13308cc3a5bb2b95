//! Renderer Registry
//!
//! Owns every live renderer behind an opaque monotonic handle. Handles are
//! never reused within a registry's lifetime, so a stale handle from a
//! racing caller resolves to [`RenderError::HandleNotFound`] instead of a
//! different renderer.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::compositor::Compositor;
use crate::error::{RenderError, Result};
use crate::events::EventSink;
use crate::renderer::TrackRenderer;
use crate::sink::RenderSink;
use crate::track::{TrackResolver, TrackSelector};

/// Opaque handle to a registered renderer
///
/// Monotonic and unique for the lifetime of the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(u64);

impl RendererId {
    /// Build a handle from its raw value
    #[must_use]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw handle value
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Arena of live renderers, keyed by handle
///
/// The registry is the single owner of renderers; tracks and compositors
/// only ever hold weak references or plain handles, so disposing an entry
/// here is sufficient to tear the renderer down.
pub struct RendererRegistry {
    compositor: Arc<dyn Compositor>,
    entries: Mutex<HashMap<RendererId, Arc<TrackRenderer>>>,
    next_id: AtomicU64,
}

impl RendererRegistry {
    /// Create a registry backed by `compositor`
    #[must_use]
    pub fn new(compositor: Arc<dyn Compositor>) -> Self {
        Self {
            compositor,
            entries: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create an unbound renderer with a fresh compositor texture
    pub fn create(&self) -> RendererId {
        let id = RendererId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let sink = Arc::new(RenderSink::new());
        let texture = self.compositor.register_texture(Arc::clone(&sink));
        let renderer =
            TrackRenderer::new(id, texture, sink, Arc::clone(&self.compositor));

        self.entries.lock().insert(id, renderer);
        info!(renderer = %id, texture, "renderer created");
        id
    }

    /// Number of live renderers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no renderers are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Bind the renderer to the video track of the selected stream
    ///
    /// An unknown stream detaches the renderer (a valid resting state); a
    /// known stream with no video tracks is an error. When a stream
    /// carries several video tracks the first one is bound.
    ///
    /// # Errors
    ///
    /// [`RenderError::HandleNotFound`] for a stale handle,
    /// [`RenderError::EmptyStream`] for a stream without video.
    pub fn attach(
        &self,
        id: RendererId,
        resolver: &dyn TrackResolver,
        selector: &TrackSelector,
    ) -> Result<()> {
        let renderer = self.get(id)?;

        match resolver.resolve(selector) {
            None => {
                renderer.bind(None);
                Ok(())
            }
            Some(tracks) => {
                let Some(track) = tracks.into_iter().next() else {
                    return Err(RenderError::EmptyStream(selector.stream_id.clone()));
                };
                renderer.bind(Some(track));
                Ok(())
            }
        }
    }

    /// Wire an event sink to the renderer, flushing queued events
    ///
    /// # Errors
    ///
    /// [`RenderError::HandleNotFound`] for a stale handle.
    pub fn attach_event_sink(&self, id: RendererId, sink: Arc<dyn EventSink>) -> Result<()> {
        self.get(id)?.events().attach(sink);
        Ok(())
    }

    /// Borrow the render sink the compositor pulls from
    ///
    /// # Errors
    ///
    /// [`RenderError::HandleNotFound`] for a stale handle.
    pub fn sink(&self, id: RendererId) -> Result<Arc<RenderSink>> {
        Ok(Arc::clone(self.get(id)?.sink()))
    }

    /// Tear the renderer down and release its texture
    ///
    /// The entry is removed before teardown, so a second dispose of the
    /// same handle fails with [`RenderError::HandleNotFound`] instead of
    /// double-freeing - safe against racing callers.
    pub fn dispose(&self, id: RendererId) -> Result<()> {
        let renderer = self
            .entries
            .lock()
            .remove(&id)
            .ok_or(RenderError::HandleNotFound(id))?;

        // Teardown happens outside the registry lock
        renderer.dispose();
        self.compositor.unregister_texture(renderer.texture());
        Ok(())
    }

    fn get(&self, id: RendererId) -> Result<Arc<TrackRenderer>> {
        self.entries
            .lock()
            .get(&id)
            .cloned()
            .ok_or(RenderError::HandleNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::TextureId;
    use crate::track::{TrackOrigin, VideoTrack};
    use glimt_frame::FrameCallback;

    #[derive(Default)]
    struct FakeCompositor {
        registered: Mutex<Vec<TextureId>>,
        unregistered: Mutex<Vec<TextureId>>,
        next: AtomicU64,
    }

    impl Compositor for FakeCompositor {
        fn register_texture(&self, _sink: Arc<RenderSink>) -> TextureId {
            let id = i64::try_from(self.next.fetch_add(1, Ordering::Relaxed))
                .unwrap_or_default();
            self.registered.lock().push(id);
            id
        }

        fn mark_frame_available(&self, _texture: TextureId) {}

        fn unregister_texture(&self, texture: TextureId) {
            self.unregistered.lock().push(texture);
        }
    }

    struct SilentTrack;

    impl VideoTrack for SilentTrack {
        fn id(&self) -> String {
            "video-0".to_string()
        }

        fn add_sink(&self, _sink: RendererId, _callback: FrameCallback) {}

        fn remove_sink(&self, _sink: RendererId) {}
    }

    struct FakeResolver {
        known: bool,
        tracks: usize,
    }

    impl TrackResolver for FakeResolver {
        fn resolve(&self, _selector: &TrackSelector) -> Option<Vec<Arc<dyn VideoTrack>>> {
            if !self.known {
                return None;
            }
            Some((0..self.tracks).map(|_| Arc::new(SilentTrack) as Arc<dyn VideoTrack>).collect())
        }
    }

    fn selector() -> TrackSelector {
        TrackSelector { stream_id: "main".to_string(), origin: TrackOrigin::Remote }
    }

    #[test]
    fn test_handles_are_unique() {
        let registry = RendererRegistry::new(Arc::new(FakeCompositor::default()));

        let a = registry.create();
        let b = registry.create();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_attach_paths() {
        let registry = RendererRegistry::new(Arc::new(FakeCompositor::default()));
        let id = registry.create();

        // Known stream with a video track binds
        let resolver = FakeResolver { known: true, tracks: 1 };
        registry.attach(id, &resolver, &selector()).expect("attach");

        // Unknown stream detaches without error
        let resolver = FakeResolver { known: false, tracks: 0 };
        registry.attach(id, &resolver, &selector()).expect("detach");

        // Known but empty stream is an error
        let resolver = FakeResolver { known: true, tracks: 0 };
        let err = registry.attach(id, &resolver, &selector()).expect_err("empty");
        assert!(matches!(err, RenderError::EmptyStream(s) if s == "main"));
    }

    #[test]
    fn test_attach_unknown_handle() {
        let registry = RendererRegistry::new(Arc::new(FakeCompositor::default()));
        let resolver = FakeResolver { known: true, tracks: 1 };

        let err = registry
            .attach(RendererId::from_raw(42), &resolver, &selector())
            .expect_err("unknown handle");
        assert!(matches!(err, RenderError::HandleNotFound(id) if id.raw() == 42));
    }

    #[test]
    fn test_double_dispose() {
        let compositor = Arc::new(FakeCompositor::default());
        let registry = RendererRegistry::new(Arc::clone(&compositor) as Arc<dyn Compositor>);

        let id = registry.create();
        registry.dispose(id).expect("first dispose");
        assert!(registry.is_empty());
        assert_eq!(compositor.unregistered.lock().len(), 1);

        let err = registry.dispose(id).expect_err("second dispose");
        assert!(matches!(err, RenderError::HandleNotFound(_)));
        // Texture released exactly once
        assert_eq!(compositor.unregistered.lock().len(), 1);
    }

    #[test]
    fn test_dispose_does_not_affect_others() {
        let registry = RendererRegistry::new(Arc::new(FakeCompositor::default()));

        let a = registry.create();
        let b = registry.create();
        registry.dispose(a).expect("dispose a");

        assert!(registry.sink(b).is_ok());
        assert!(registry.sink(a).is_err());
    }
}
