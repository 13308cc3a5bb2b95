//! End-to-end pipeline test: a screen capture source feeding a track,
//! a renderer bound to that track, and a compositor pulling display
//! pixels, all across real threads.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use glimt_capture::{
    CaptureConfig, CapturedImage, CaptureFault, ScreenBackend, ScreenCaptureSource,
    SourceDescriptor, SourceId,
};
use glimt_frame::{FrameBuffer, FrameCallback, Rotation};
use glimt_render::{
    Compositor, EventSink, RenderError, RendererEvent, RendererId, RendererRegistry,
    RenderSink, TextureId, TrackOrigin, TrackResolver, TrackSelector, VideoTrack,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Compositor keeping registered sinks so the test can pull like a
/// render thread would.
#[derive(Default)]
struct TestCompositor {
    sinks: Mutex<HashMap<TextureId, Arc<RenderSink>>>,
    marks: AtomicUsize,
    next: AtomicI64,
}

impl Compositor for TestCompositor {
    fn register_texture(&self, sink: Arc<RenderSink>) -> TextureId {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        self.sinks.lock().insert(id, sink);
        id
    }

    fn mark_frame_available(&self, _texture: TextureId) {
        self.marks.fetch_add(1, Ordering::SeqCst);
    }

    fn unregister_texture(&self, texture: TextureId) {
        self.sinks.lock().remove(&texture);
    }
}

impl TestCompositor {
    fn sink(&self, texture: TextureId) -> Arc<RenderSink> {
        Arc::clone(self.sinks.lock().get(&texture).expect("texture registered"))
    }

    fn only_texture(&self) -> TextureId {
        *self.sinks.lock().keys().next().expect("one texture")
    }
}

/// Track fanning frames out to registered renderer callbacks.
#[derive(Default)]
struct FanoutTrack {
    sinks: Mutex<HashMap<RendererId, FrameCallback>>,
}

impl FanoutTrack {
    fn deliver(&self, frame: &FrameBuffer) {
        let callbacks: Vec<FrameCallback> = self.sinks.lock().values().cloned().collect();
        for callback in callbacks {
            callback(frame.clone());
        }
    }
}

impl VideoTrack for FanoutTrack {
    fn id(&self) -> String {
        "video-0".to_string()
    }

    fn add_sink(&self, sink: RendererId, callback: FrameCallback) {
        self.sinks.lock().insert(sink, callback);
    }

    fn remove_sink(&self, sink: RendererId) {
        self.sinks.lock().remove(&sink);
    }
}

struct SingleStreamResolver {
    stream_id: String,
    track: Arc<FanoutTrack>,
}

impl TrackResolver for SingleStreamResolver {
    fn resolve(&self, selector: &TrackSelector) -> Option<Vec<Arc<dyn VideoTrack>>> {
        (selector.stream_id == self.stream_id)
            .then(|| vec![Arc::clone(&self.track) as Arc<dyn VideoTrack>])
    }
}

struct CollectingEvents {
    received: Mutex<Vec<RendererEvent>>,
}

impl EventSink for CollectingEvents {
    fn deliver(&self, _renderer: RendererId, event: RendererEvent) {
        self.received.lock().push(event);
    }
}

/// Backend producing solid gray 64x48 BGRA frames.
struct GrayBackend;

impl ScreenBackend for GrayBackend {
    fn sources(&mut self) -> Vec<SourceDescriptor> {
        vec![SourceDescriptor { id: 1, title: "Screen 1".to_string() }]
    }

    fn select_source(&mut self, id: SourceId) -> bool {
        id == 1
    }

    fn capture_frame(&mut self) -> Result<CapturedImage, CaptureFault> {
        Ok(CapturedImage {
            data: vec![128u8; 64 * 48 * 4],
            width: 64,
            height: 48,
            stride: 64 * 4,
        })
    }
}

#[test]
fn test_capture_to_display_pipeline() {
    init_tracing();

    let compositor = Arc::new(TestCompositor::default());
    let registry = RendererRegistry::new(Arc::clone(&compositor) as Arc<dyn Compositor>);

    let renderer = registry.create();
    let events = Arc::new(CollectingEvents { received: Mutex::new(Vec::new()) });
    registry
        .attach_event_sink(renderer, Arc::clone(&events) as Arc<dyn EventSink>)
        .expect("event sink");

    let track = Arc::new(FanoutTrack::default());
    let resolver =
        SingleStreamResolver { stream_id: "main".to_string(), track: Arc::clone(&track) };
    let selector = TrackSelector { stream_id: "main".to_string(), origin: TrackOrigin::Local };
    registry.attach(renderer, &resolver, &selector).expect("attach");

    // Producer: screen capture source delivering into the track
    let config =
        CaptureConfig::builder().max_width(32).max_height(32).target_fps(100).build();
    let capture_track = Arc::clone(&track);
    let callback: FrameCallback = Arc::new(move |frame| capture_track.deliver(&frame));
    let mut source = ScreenCaptureSource::create(Box::new(GrayBackend), 1, config, callback)
        .expect("capture source");

    source.start().expect("start");
    thread::sleep(Duration::from_millis(80));
    source.stop();

    // The compositor was poked and can pull a converted frame
    assert!(compositor.marks.load(Ordering::SeqCst) > 0);
    let texture = compositor.only_texture();
    let sink = compositor.sink(texture);
    {
        let display = sink.pull().expect("display frame");
        // 64x48 into 32x32 bounds: width binds, 32x24
        assert_eq!((display.width(), display.height()), (32, 24));
        assert_eq!(display.data().len(), 32 * 24 * 4);
    }

    // Exactly one first-frame and one size event despite many frames
    {
        let received = events.received.lock();
        assert_eq!(received[0], RendererEvent::FirstFrameRendered);
        assert_eq!(received[1], RendererEvent::SizeChanged { width: 32, height: 24 });
        assert_eq!(received.len(), 2);
    }

    // Dispose releases the texture; a second dispose is a clean error
    registry.dispose(renderer).expect("dispose");
    assert!(compositor.sinks.lock().is_empty());
    assert!(matches!(
        registry.dispose(renderer),
        Err(RenderError::HandleNotFound(_))
    ));

    // The track no longer has a live callback target
    track.deliver(&FrameBuffer::black(4, 4, 0).expect("frame"));
    assert!(track.sinks.lock().is_empty());
}

#[test]
fn test_concurrent_push_pull_never_tears() {
    init_tracing();

    let sink = Arc::new(RenderSink::new());

    let producer_sink = Arc::clone(&sink);
    let producer = thread::spawn(move || {
        // Alternate between two solid-luma frames; any pulled frame must
        // be uniformly one or the other
        for i in 0..500_i64 {
            let luma = if i % 2 == 0 { 16 } else { 235 };
            let y = vec![luma; 16 * 16];
            let c = vec![128u8; 8 * 8];
            let frame =
                FrameBuffer::from_i420(16, 16, Rotation::Deg0, i, [y, c.clone(), c].concat())
                    .expect("frame");
            producer_sink.push_frame(frame);
        }
    });

    let mut pulls = 0;
    while pulls < 200 {
        if let Some(display) = sink.pull() {
            let first = display.data()[0];
            for pixel in display.data().chunks_exact(4) {
                assert_eq!(pixel[0], first, "torn frame");
                assert_eq!(pixel[3], 255);
            }
            pulls += 1;
        }
    }

    producer.join().expect("producer");
}

#[test]
fn test_rebind_to_second_track_re_emits_first_frame() {
    init_tracing();

    let compositor = Arc::new(TestCompositor::default());
    let registry = RendererRegistry::new(Arc::clone(&compositor) as Arc<dyn Compositor>);

    let renderer = registry.create();
    let events = Arc::new(CollectingEvents { received: Mutex::new(Vec::new()) });
    registry
        .attach_event_sink(renderer, Arc::clone(&events) as Arc<dyn EventSink>)
        .expect("event sink");

    let first_track = Arc::new(FanoutTrack::default());
    let second_track = Arc::new(FanoutTrack::default());

    let resolver = SingleStreamResolver {
        stream_id: "a".to_string(),
        track: Arc::clone(&first_track),
    };
    let selector = TrackSelector { stream_id: "a".to_string(), origin: TrackOrigin::Remote };
    registry.attach(renderer, &resolver, &selector).expect("attach a");
    first_track.deliver(&FrameBuffer::black(4, 4, 0).expect("frame"));

    let resolver = SingleStreamResolver {
        stream_id: "b".to_string(),
        track: Arc::clone(&second_track),
    };
    let selector = TrackSelector { stream_id: "b".to_string(), origin: TrackOrigin::Remote };
    registry.attach(renderer, &resolver, &selector).expect("attach b");

    // The old track was detached by the rebind
    assert!(first_track.sinks.lock().is_empty());
    second_track.deliver(&FrameBuffer::black(4, 4, 1).expect("frame"));

    let received = events.received.lock();
    let first_frames = received
        .iter()
        .filter(|e| matches!(e, RendererEvent::FirstFrameRendered))
        .count();
    assert_eq!(first_frames, 2);
}
