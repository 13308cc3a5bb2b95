//! Renderer Event Channel
//!
//! Change notifications (first frame, rotation, size) emitted by renderers
//! toward the embedding UI. Delivery is fire-and-forget and never happens
//! under a pipeline lock; events emitted before a sink attaches are queued
//! and flushed in order when one does.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use glimt_frame::Rotation;

use crate::registry::RendererId;

/// Change notification emitted by a renderer
///
/// Emitted at most once per actual change: N consecutive frames with the
/// same rotation and size produce no events after the first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererEvent {
    /// The first frame since (re)binding reached the renderer
    FirstFrameRendered,

    /// The incoming frame rotation differs from the previous frame's
    RotationChanged(Rotation),

    /// The incoming frame dimensions differ from the previous frame's
    ///
    /// Dimensions are display-oriented: axes are swapped for sideways
    /// rotation.
    SizeChanged {
        /// New display width in pixels
        width: u32,
        /// New display height in pixels
        height: u32,
    },
}

/// Receiver of renderer events, implemented by the embedding layer
///
/// `deliver` is called from producer threads and must not block on
/// pipeline locks.
pub trait EventSink: Send + Sync {
    /// Deliver one event for the given renderer; fire-and-forget
    fn deliver(&self, renderer: RendererId, event: RendererEvent);
}

/// Per-renderer event channel with pre-attach queueing
///
/// At-least-once, in-order delivery: events emitted while no sink is
/// attached are held in a queue and flushed when one attaches.
#[derive(Default)]
pub struct EventChannel {
    inner: Mutex<ChannelState>,
}

#[derive(Default)]
struct ChannelState {
    sink: Option<Arc<dyn EventSink>>,
    pending: VecDeque<(RendererId, RendererEvent)>,
    // Set while attach drains the queue; emits arriving meanwhile must
    // join the queue or they would overtake the events being flushed
    flushing: bool,
}

impl EventChannel {
    /// Create a channel with no sink attached
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a sink, flushing any queued events in emission order
    ///
    /// Emits that race the flush are appended to the queue and drained
    /// before the flush completes, so ordering holds across the attach.
    pub fn attach(&self, sink: Arc<dyn EventSink>) {
        {
            let mut state = self.inner.lock();
            state.sink = Some(Arc::clone(&sink));
            if state.pending.is_empty() {
                return;
            }
            state.flushing = true;
        }

        let mut flushed = 0;
        loop {
            let batch = {
                let mut state = self.inner.lock();
                if state.pending.is_empty() {
                    state.flushing = false;
                    break;
                }
                std::mem::take(&mut state.pending)
            };

            flushed += batch.len();
            // Deliver outside the lock
            for (renderer, event) in batch {
                sink.deliver(renderer, event);
            }
        }

        debug!(count = flushed, "flushed queued renderer events");
    }

    /// Emit one event, delivering immediately or queueing
    pub fn emit(&self, renderer: RendererId, event: RendererEvent) {
        let sink = {
            let mut state = self.inner.lock();
            match &state.sink {
                Some(sink) if !state.flushing => Arc::clone(sink),
                _ => {
                    state.pending.push_back((renderer, event));
                    return;
                }
            }
        };

        // Deliver outside the lock
        sink.deliver(renderer, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSink {
        received: Mutex<Vec<(RendererId, RendererEvent)>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self { received: Mutex::new(Vec::new()) })
        }
    }

    impl EventSink for RecordingSink {
        fn deliver(&self, renderer: RendererId, event: RendererEvent) {
            self.received.lock().push((renderer, event));
        }
    }

    #[test]
    fn test_events_before_attach_flush_in_order() {
        let channel = EventChannel::new();
        let id = RendererId::from_raw(1);

        channel.emit(id, RendererEvent::FirstFrameRendered);
        channel.emit(id, RendererEvent::SizeChanged { width: 640, height: 480 });

        let sink = RecordingSink::new();
        channel.attach(Arc::clone(&sink) as Arc<dyn EventSink>);

        let received = sink.received.lock();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].1, RendererEvent::FirstFrameRendered);
        assert_eq!(received[1].1, RendererEvent::SizeChanged { width: 640, height: 480 });
    }

    #[test]
    fn test_events_after_attach_deliver_immediately() {
        let channel = EventChannel::new();
        let sink = RecordingSink::new();
        channel.attach(Arc::clone(&sink) as Arc<dyn EventSink>);

        channel.emit(RendererId::from_raw(2), RendererEvent::RotationChanged(Rotation::Deg90));

        let received = sink.received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0, RendererId::from_raw(2));
    }

    #[test]
    fn test_emit_during_flush_keeps_order() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Barrier;

        /// Stalls inside the first delivery so the test can emit while
        /// the attach flush is mid-flight.
        struct GatedSink {
            received: Mutex<Vec<RendererEvent>>,
            calls: AtomicUsize,
            hold: Arc<Barrier>,
            release: Arc<Barrier>,
        }

        impl EventSink for GatedSink {
            fn deliver(&self, _renderer: RendererId, event: RendererEvent) {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    self.hold.wait();
                    self.release.wait();
                }
                self.received.lock().push(event);
            }
        }

        let channel = Arc::new(EventChannel::new());
        let id = RendererId::from_raw(1);
        channel.emit(id, RendererEvent::FirstFrameRendered);

        let hold = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        let sink = Arc::new(GatedSink {
            received: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            hold: Arc::clone(&hold),
            release: Arc::clone(&release),
        });

        let attach_channel = Arc::clone(&channel);
        let attach_sink = Arc::clone(&sink) as Arc<dyn EventSink>;
        let flusher = std::thread::spawn(move || attach_channel.attach(attach_sink));

        // The flush is stalled inside its first delivery; this emit must
        // queue behind the event being flushed, not overtake it
        hold.wait();
        channel.emit(id, RendererEvent::RotationChanged(Rotation::Deg90));
        release.wait();
        flusher.join().expect("flush");

        let received = sink.received.lock();
        assert_eq!(
            *received,
            vec![
                RendererEvent::FirstFrameRendered,
                RendererEvent::RotationChanged(Rotation::Deg90),
            ]
        );
    }

    #[test]
    fn test_reattach_replaces_sink() {
        let channel = EventChannel::new();
        let first = RecordingSink::new();
        let second = RecordingSink::new();

        channel.attach(Arc::clone(&first) as Arc<dyn EventSink>);
        channel.attach(Arc::clone(&second) as Arc<dyn EventSink>);
        channel.emit(RendererId::from_raw(3), RendererEvent::FirstFrameRendered);

        assert!(first.received.lock().is_empty());
        assert_eq!(second.received.lock().len(), 1);
    }
}
