//! Screen Capture Source
//!
//! Runs an independent capture loop on a dedicated thread and emits frames
//! through the standard frame callback shared by all sources.
//!
//! # Pacing
//!
//! The loop is self-paced rather than driven by a fixed timer. After each
//! capture it computes
//!
//! ```text
//! capture_period = max(capture_duration * 100 / MAX_CPU_CONSUMPTION_PERCENT,
//!                      requested_frame_interval)
//! ```
//!
//! and sleeps the positive remainder. Under heavy native-capture cost the
//! effective frame rate therefore drops below the requested target instead
//! of starving other threads. The sleep is taken in bounded slices that
//! re-check the stop flag, so shutdown latency is bounded by one slice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use glimt_frame::{FrameCallback, ScaleSession};

use crate::backend::{ScreenBackend, SourceId, SourceState};
use crate::config::CaptureConfig;
use crate::error::{CaptureError, Result};
use crate::monotonic_ms;

/// Maximum allowed CPU consumption for the frame capturing thread
pub const MAX_CPU_CONSUMPTION_PERCENT: u32 = 50;

/// Granularity at which the pacing sleep re-checks the stop flag
const STOP_POLL_SLICE: Duration = Duration::from_millis(10);

/// Screen/desktop capture source with a dedicated, self-paced capture thread
///
/// State machine: `Created -> Running -> Stopped`. [`start`](Self::start)
/// is an idempotent no-op while running; [`stop`](Self::stop) signals the
/// loop and joins the thread before returning, so no thread outlives the
/// source. Dropping a running source stops it first.
pub struct ScreenCaptureSource {
    config: CaptureConfig,
    callback: FrameCallback,
    source: SourceId,
    // Present while idle; handed to the capture thread while running
    backend: Option<Box<dyn ScreenBackend>>,
    thread: Option<thread::JoinHandle<Box<dyn ScreenBackend>>>,
    stop: Arc<AtomicBool>,
}

impl ScreenCaptureSource {
    /// Create a source capturing the given region through `backend`
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::SourceUnavailable`] when `source` is not
    /// among the backend's enumerated sources or cannot be selected, and
    /// [`CaptureError::InvalidConfig`] for a config that fails validation.
    pub fn create(
        mut backend: Box<dyn ScreenBackend>,
        source: SourceId,
        config: CaptureConfig,
        callback: FrameCallback,
    ) -> Result<Self> {
        config.validate().map_err(CaptureError::InvalidConfig)?;

        let known = backend.sources().iter().any(|s| s.id == source);
        if !known || !backend.select_source(source) {
            return Err(CaptureError::SourceUnavailable(source));
        }

        info!(
            source,
            max_width = config.max_width,
            max_height = config.max_height,
            target_fps = config.target_fps,
            "screen capture source created"
        );

        Ok(Self {
            config,
            callback,
            source,
            backend: Some(backend),
            thread: None,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Whether the capture thread is currently running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Spawn the capture thread
    ///
    /// No-op if already running.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::ThreadSpawn`] if the OS refuses the thread.
    pub fn start(&mut self) -> Result<()> {
        if self.thread.is_some() {
            debug!(source = self.source, "capture thread already running");
            return Ok(());
        }

        let Some(backend) = self.backend.take() else {
            // The backend was lost to a capture-thread panic; there is
            // nothing left to restart
            warn!(source = self.source, "capture backend lost; start ignored");
            return Ok(());
        };

        self.stop.store(false, Ordering::Release);
        let stop = Arc::clone(&self.stop);
        let callback = Arc::clone(&self.callback);
        let config = self.config.clone();

        let handle = thread::Builder::new()
            .name("glimt-screen-capture".to_string())
            .spawn(move || capture_loop(backend, &config, &callback, &stop))?;

        self.thread = Some(handle);
        info!(source = self.source, "screen capture thread started");
        Ok(())
    }

    /// Signal the loop to exit and join the thread
    ///
    /// Blocking: returns only once the thread has exited. No-op if not
    /// running.
    pub fn stop(&mut self) {
        let Some(handle) = self.thread.take() else {
            return;
        };

        self.stop.store(true, Ordering::Release);
        match handle.join() {
            Ok(backend) => self.backend = Some(backend),
            Err(_) => warn!(source = self.source, "capture thread panicked"),
        }
        info!(source = self.source, "screen capture thread stopped");
    }

    /// Streaming state; a local screen source is always live
    #[must_use]
    pub fn state(&self) -> SourceState {
        SourceState::Live
    }

    /// Screen sources are screencasts
    #[must_use]
    pub fn is_screencast(&self) -> bool {
        true
    }

    /// Screen sources are never remote
    #[must_use]
    pub fn remote(&self) -> bool {
        false
    }

    /// Configuration requested at construction
    #[must_use]
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }
}

impl Drop for ScreenCaptureSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Body of the dedicated capture thread
///
/// Returns the backend so the source can be restarted.
fn capture_loop(
    mut backend: Box<dyn ScreenBackend>,
    config: &CaptureConfig,
    callback: &FrameCallback,
    stop: &AtomicBool,
) -> Box<dyn ScreenBackend> {
    let mut session = ScaleSession::new(config.max_width, config.max_height);
    let interval = config.frame_interval();

    while !stop.load(Ordering::Acquire) {
        let started = Instant::now();

        match backend.capture_frame() {
            Ok(image) => match session.process(&image.as_packed(), monotonic_ms()) {
                Ok(frame) => callback(frame),
                Err(e) => warn!(error = %e, "dropping frame: scaling failed"),
            },
            // Transient: a failed frame must not end the session
            Err(fault) => warn!(error = %fault, "desktop capture failed"),
        }

        pace(started.elapsed(), interval, stop);
    }

    backend
}

/// Loop period for one iteration given the CPU budget
fn capture_period(capture_duration: Duration, requested_interval: Duration) -> Duration {
    let budgeted = capture_duration * 100 / MAX_CPU_CONSUMPTION_PERCENT;
    budgeted.max(requested_interval)
}

/// Sleep out the remainder of the period in stop-aware slices
fn pace(capture_duration: Duration, requested_interval: Duration, stop: &AtomicBool) {
    let period = capture_period(capture_duration, requested_interval);
    let mut remaining = period.saturating_sub(capture_duration);

    while !remaining.is_zero() && !stop.load(Ordering::Acquire) {
        let slice = remaining.min(STOP_POLL_SLICE);
        thread::sleep(slice);
        remaining -= slice;
    }
}
