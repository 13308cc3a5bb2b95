//! # glimt-render
//!
//! Consumer side of the glimt video pipeline: render sinks, track
//! renderers, the renderer registry and the compositor boundary.
//!
//! This crate is part of the [glimt](https://github.com/glimt-media/glimt)
//! workspace. Frames arrive as [`glimt_frame::FrameBuffer`]s, typically
//! produced by [`glimt-capture`](https://crates.io/crates/glimt-capture)
//! or by a remote track.
//!
//! # Features
//!
//! - **Render Sinks**: Latest-wins, torn-frame-free cross-thread frame
//!   exchange with lazily sized display buffers
//! - **Track Renderers**: De-duplicated first-frame / rotation / size
//!   change events, delivered outside any pipeline lock
//! - **Renderer Registry**: Opaque monotonic handles instead of shared
//!   cyclic ownership; stale handles fail cleanly
//! - **Compositor Boundary**: A small trait the embedding UI implements
//!   to own textures and schedule pulls
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use glimt_render::{Compositor, RendererRegistry, TrackOrigin, TrackSelector};
//!
//! fn run(compositor: Arc<dyn Compositor>) -> glimt_render::Result<()> {
//!     let registry = RendererRegistry::new(compositor);
//!     let renderer = registry.create();
//!
//!     // ... attach a track via a TrackResolver, frames start flowing
//!
//!     registry.dispose(renderer)?;
//!     Ok(())
//! }
//! ```
//!
//! # Threading
//!
//! Producers push frames from capture or network threads; the compositor
//! pulls on its render thread. The only shared lock is per-sink, held for
//! the duration of a push or a pull and never while delivering events or
//! notifying the compositor.

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod compositor;
pub mod error;
pub mod events;
pub mod registry;
pub mod renderer;
pub mod sink;
pub mod track;

// =============================================================================
// RE-EXPORTS - PRIMARY API
// =============================================================================

// Registry and handles
pub use registry::{RendererId, RendererRegistry};

// Renderers and sinks
pub use renderer::TrackRenderer;
pub use sink::{DisplayFrame, RenderSink};

// Compositor boundary
pub use compositor::{Compositor, TextureId};

// Events
pub use events::{EventChannel, EventSink, RendererEvent};

// Track boundary
pub use track::{TrackOrigin, TrackResolver, TrackSelector, VideoTrack};

// Errors
pub use error::{RenderError, Result};

// =============================================================================
// CRATE-LEVEL ITEMS
// =============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
