//! Track Renderer
//!
//! Connects one video track to one compositor texture. The renderer
//! receives frames on the producer thread, detects changes worth telling
//! the UI about, hands the frame to its [`RenderSink`] and pokes the
//! compositor. Change detection state lives behind its own mutex; events
//! and compositor notifications are always delivered with no lock held.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, info};

use glimt_frame::{FrameBuffer, FrameCallback, Rotation};

use crate::compositor::{Compositor, TextureId};
use crate::events::{EventChannel, RendererEvent};
use crate::registry::RendererId;
use crate::sink::RenderSink;
use crate::track::VideoTrack;

/// One renderer: a bound track feeding a compositor texture
///
/// Created only through the registry. Binding is re-entrant safe: the
/// frame callback holds a weak reference, so a track that keeps calling
/// after dispose hits a dead weak instead of a leaked renderer.
pub struct TrackRenderer {
    id: RendererId,
    texture: TextureId,
    sink: Arc<RenderSink>,
    events: Arc<EventChannel>,
    compositor: Arc<dyn Compositor>,
    weak: Weak<TrackRenderer>,
    state: Mutex<BindState>,
}

struct BindState {
    track: Option<Arc<dyn VideoTrack>>,
    first_frame_seen: bool,
    last_rotation: Rotation,
    last_size: (u32, u32),
}

impl BindState {
    fn reset(&mut self) {
        self.first_frame_seen = false;
        self.last_rotation = Rotation::Deg0;
        self.last_size = (0, 0);
    }
}

impl TrackRenderer {
    /// Create an unbound renderer over an already-registered texture
    pub(crate) fn new(
        id: RendererId,
        texture: TextureId,
        sink: Arc<RenderSink>,
        compositor: Arc<dyn Compositor>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            id,
            texture,
            sink,
            events: Arc::new(EventChannel::new()),
            compositor,
            weak: weak.clone(),
            state: Mutex::new(BindState {
                track: None,
                first_frame_seen: false,
                last_rotation: Rotation::Deg0,
                last_size: (0, 0),
            }),
        })
    }

    /// Registry handle of this renderer
    #[must_use]
    pub fn id(&self) -> RendererId {
        self.id
    }

    /// Compositor texture this renderer feeds
    #[must_use]
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// The sink the compositor pulls display pixels from
    #[must_use]
    pub fn sink(&self) -> &Arc<RenderSink> {
        &self.sink
    }

    /// This renderer's event channel
    #[must_use]
    pub fn events(&self) -> &Arc<EventChannel> {
        &self.events
    }

    /// Bind to `track`, or detach with `None`
    ///
    /// Detaches any previous track and resets change detection, so the
    /// next frame re-emits the first-frame event. Unbound is a valid
    /// resting state.
    pub fn bind(&self, track: Option<Arc<dyn VideoTrack>>) {
        let previous = self.state.lock().track.take();

        // Unregister before resetting: a frame still in flight from the
        // old track must land on the old detection state, not consume the
        // fresh first-frame slot.
        if let Some(previous) = previous {
            previous.remove_sink(self.id);
            debug!(renderer = %self.id, track = %previous.id(), "detached track");
        }

        {
            let mut state = self.state.lock();
            state.reset();
            state.track = track.clone();
        }

        // Track registration happens outside the state lock: a track is
        // free to deliver a frame synchronously from add_sink.
        if let Some(track) = track {
            let weak = self.weak.clone();
            let callback: FrameCallback = Arc::new(move |frame| {
                if let Some(renderer) = weak.upgrade() {
                    renderer.on_frame(frame);
                }
            });
            debug!(renderer = %self.id, track = %track.id(), "attached track");
            track.add_sink(self.id, callback);
        }
    }

    /// Producer-thread frame entry point
    ///
    /// Emits de-duplicated change events, stores the frame, then notifies
    /// the compositor. Per-frame order: first-frame, rotation-changed,
    /// size-changed, frame push, compositor notify.
    pub fn on_frame(&self, frame: FrameBuffer) {
        let display = frame.display_size();
        let mut pending = Vec::new();

        {
            let mut state = self.state.lock();

            if !state.first_frame_seen {
                state.first_frame_seen = true;
                // Stale pixels from a previous binding must not be served
                self.sink.reset_display();
                pending.push(RendererEvent::FirstFrameRendered);
            }

            if frame.rotation() != state.last_rotation {
                state.last_rotation = frame.rotation();
                pending.push(RendererEvent::RotationChanged(frame.rotation()));
            }

            if display != state.last_size {
                state.last_size = display;
                pending.push(RendererEvent::SizeChanged {
                    width: display.0,
                    height: display.1,
                });
            }
        }

        for event in pending {
            self.events.emit(self.id, event);
        }

        self.sink.push_frame(frame);
        self.compositor.mark_frame_available(self.texture);
    }

    /// Detach and release; called by the registry exactly once
    pub(crate) fn dispose(&self) {
        self.bind(None);
        info!(renderer = %self.id, texture = self.texture, "renderer disposed");
    }
}
