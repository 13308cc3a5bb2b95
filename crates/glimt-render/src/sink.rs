//! Render Sink
//!
//! The single-slot frame exchange between a producer thread (capture or
//! track callback) and the compositor's render thread. Latest-wins: an
//! unconsumed frame is silently replaced, never queued. Both sides share
//! one mutex, so a pulled frame can never be torn.

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, warn};

use glimt_frame::{i420_to_rgba, FrameBuffer};

/// Cross-thread, latest-wins exchange point for one renderer
///
/// `push_frame` is called from the producer thread; `pull` from the
/// render thread whenever the compositor asks for pixels. There is no
/// backpressure: a slow consumer sees only the newest frame.
#[derive(Debug, Default)]
pub struct RenderSink {
    state: Mutex<SinkState>,
}

#[derive(Debug, Default)]
struct SinkState {
    frame: Option<FrameBuffer>,
    display: Vec<u8>,
    display_width: u32,
    display_height: u32,
}

/// Borrowed view of the converted display buffer
///
/// Holds the sink lock until dropped; the producer blocks on `push_frame`
/// for the guard's lifetime, so keep it short.
pub struct DisplayFrame<'a> {
    guard: MutexGuard<'a, SinkState>,
}

impl DisplayFrame<'_> {
    /// Display buffer width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.guard.display_width
    }

    /// Display buffer height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.guard.display_height
    }

    /// Packed RGBA pixel bytes, row-major, no padding
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.guard.display
    }
}

impl RenderSink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a frame, replacing any unconsumed one
    pub fn push_frame(&self, frame: FrameBuffer) {
        self.state.lock().frame = Some(frame);
    }

    /// Convert the stored frame to packed RGBA and borrow the result
    ///
    /// Returns `None` until the first `push_frame`. The display buffer is
    /// reallocated only when the frame dimensions change; repeated pulls at
    /// a stable size reuse it.
    pub fn pull(&self) -> Option<DisplayFrame<'_>> {
        let mut guard = self.state.lock();

        {
            let state = &mut *guard;
            let frame = state.frame.as_ref()?;

            let (width, height) = (frame.width(), frame.height());
            if (width, height) != (state.display_width, state.display_height) {
                debug!(width, height, "reallocating display buffer");
                state.display = vec![0u8; width as usize * height as usize * 4];
                state.display_width = width;
                state.display_height = height;
            }

            if let Err(e) = i420_to_rgba(frame, &mut state.display) {
                warn!(error = %e, "display conversion failed");
                return None;
            }
        }

        Some(DisplayFrame { guard })
    }

    /// Display size of the stored frame, axes swapped for sideways rotation
    #[must_use]
    pub fn frame_size(&self) -> Option<(u32, u32)> {
        self.state.lock().frame.as_ref().map(FrameBuffer::display_size)
    }

    /// Drop the display buffer so the next pull reallocates
    ///
    /// Called when a renderer is rebound: stale pixels from the previous
    /// track must not be served at the new track's size.
    pub fn reset_display(&self) {
        let mut state = self.state.lock();
        state.display = Vec::new();
        state.display_width = 0;
        state.display_height = 0;
    }
}
