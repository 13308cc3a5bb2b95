//! # glimt
//!
//! Adaptive video capture and cross-thread rendering pipeline for Rust.
//!
//! This crate provides a unified interface to the glimt libraries:
//!
//! - **[`frame`]** - I420 frame buffers, scaling, letterboxing, BT.601 conversion
//! - **[`capture`]** - Screen and camera capture sources with CPU-budgeted pacing
//! - **[`render`]** - Render sinks, track renderers, registry, compositor boundary
//!
//! # Features
//!
//! All features are enabled by default. You can selectively enable only what you need:
//!
//! ```toml
//! # Use everything (default)
//! glimt = "0.3"
//!
//! # Frame types only
//! glimt = { version = "0.3", default-features = false, features = ["frame"] }
//!
//! # Frame types + capture
//! glimt = { version = "0.3", default-features = false, features = ["frame", "capture"] }
//! ```
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `frame` | Yes | Frame data types and image processing |
//! | `capture` | Yes | Screen and camera capture sources |
//! | `render` | Yes | Renderer registry and compositor integration |
//! | `full` | No | All features from all sub-crates |
//!
//! # Quick Start
//!
//! ## Screen Capture into a Renderer
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use glimt::capture::{CaptureConfig, ScreenCaptureSource};
//! use glimt::render::{RendererRegistry, TrackOrigin, TrackSelector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Registry over the embedding compositor
//!     let registry = RendererRegistry::new(my_compositor());
//!     let renderer = registry.create();
//!     registry.attach(renderer, &my_resolver(), &TrackSelector {
//!         stream_id: "main".to_string(),
//!         origin: TrackOrigin::Local,
//!     })?;
//!
//!     // 2. Capture source feeding the local stream
//!     let config = CaptureConfig::builder()
//!         .max_width(1280)
//!         .max_height(720)
//!         .target_fps(30)
//!         .build();
//!     let mut source =
//!         ScreenCaptureSource::create(my_backend(), 0, config, my_track_callback())?;
//!     source.start()?;
//!
//!     // ... frames flow capture thread -> sink -> compositor render thread
//!
//!     source.stop();
//!     registry.dispose(renderer)?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            glimt                                │
//! ├─────────────────┬─────────────────────┬─────────────────────────┤
//! │   glimt-frame   │    glimt-capture    │      glimt-render       │
//! │                 │                     │                         │
//! │  FrameBuffer    │  ScreenCaptureSource│  RendererRegistry       │
//! │  ScaleSession   │  DeviceCaptureSource│  TrackRenderer          │
//! │  PackedFrame    │  CaptureConfig      │  RenderSink             │
//! └────────┬────────┴──────────┬──────────┴────────────┬────────────┘
//!          │                   │                       │
//!          ▼                   ▼                       ▼
//!    I420 / BT.601       Native backends          Compositor textures
//! ```
//!
//! # Threading
//!
//! Producers run on capture or platform callback threads; consumers pull
//! on the compositor's render thread. Each renderer exchanges frames
//! through a single mutex-guarded slot, latest-wins, with change events
//! delivered outside every lock.
//!
//! # Related Crates
//!
//! You can also use the individual crates directly:
//!
//! - [`glimt-frame`](https://crates.io/crates/glimt-frame) - Frame types only
//! - [`glimt-capture`](https://crates.io/crates/glimt-capture) - Capture only
//! - [`glimt-render`](https://crates.io/crates/glimt-render) - Rendering only

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// RE-EXPORTS
// =============================================================================

/// Frame data types and pure image processing.
///
/// This module provides the shared pixel-level building blocks:
/// - Planar I420 frame buffers with rotation and timestamps
/// - Aspect-preserving scaling with even alignment
/// - Centered letterboxing
/// - BT.601 BGRA/I420/RGBA conversion
///
/// See [`glimt_frame`] documentation for details.
#[cfg(feature = "frame")]
#[cfg_attr(docsrs, doc(cfg(feature = "frame")))]
pub use glimt_frame as frame;

/// Screen and camera capture sources.
///
/// This module provides frame producers:
/// - Self-paced screen capture thread with a fixed CPU budget
/// - Threadless camera device lifecycle management
/// - Pluggable native backend traits
///
/// See [`glimt_capture`] documentation for details.
#[cfg(feature = "capture")]
#[cfg_attr(docsrs, doc(cfg(feature = "capture")))]
pub use glimt_capture as capture;

/// Renderer registry, render sinks, and compositor integration.
///
/// This module provides the consumer side:
/// - Latest-wins cross-thread frame exchange
/// - De-duplicated renderer change events
/// - Handle-based renderer lifecycle
///
/// See [`glimt_render`] documentation for details.
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use glimt_render as render;

// =============================================================================
// PRELUDE - Common types for convenience
// =============================================================================

/// Prelude module with commonly used types.
///
/// ```rust
/// use glimt::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "frame")]
    pub use glimt_frame::{FrameBuffer, FrameCallback, PackedFrame, Rotation, ScaleSession};

    #[cfg(feature = "capture")]
    pub use glimt_capture::{
        CameraConstraints, CaptureConfig, DeviceCaptureSource, ScreenCaptureSource,
    };

    #[cfg(feature = "render")]
    pub use glimt_render::{
        Compositor, RenderSink, RendererEvent, RendererId, RendererRegistry, TrackRenderer,
    };
}
