//! Aspect-Preserving Scaling and Letterboxing
//!
//! Pure geometry and pixel operations used between a native capture and the
//! planar pipeline: fitting a source into requested bounds, cropping odd
//! dimensions, centering a scaled image inside a canvas of a different
//! aspect ratio, and a box-filter resize for packed pixels.
//!
//! [`ScaleSession`] ties these together with the per-source caching a
//! capture loop needs (target dimensions and scratch canvas survive across
//! frames and are recomputed only when the native size changes).

use tracing::debug;

use crate::convert::bgra_to_i420;
use crate::error::Result;
use crate::frame::{FrameBuffer, PackedFrame};

/// A rectangle inside a canvas, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

/// Compute output dimensions that fit `src` into the given bounds
///
/// Preserves aspect ratio: the width bound is applied first, then the
/// height bound (whichever axis is the binding constraint wins). The
/// result is clamped down to even values on both axes; a degenerate
/// result is substituted with a minimum 2x2.
///
/// Sources already inside the bounds are only even-clamped, never scaled
/// up.
#[must_use]
pub fn fit_within(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let mut w = src_w;
    let mut h = src_h;

    if w > max_w {
        w = max_w;
        h = mul_div(src_h, max_w, src_w);
    }
    if h > max_h {
        w = mul_div(src_w, max_h, src_h);
        h = max_h;
    }

    let w = w & !1;
    let h = h & !1;
    if w == 0 || h == 0 {
        (2, 2)
    } else {
        (w, h)
    }
}

/// `a * b / c` without intermediate overflow
#[inline]
fn mul_div(a: u32, b: u32, c: u32) -> u32 {
    (u64::from(a) * u64::from(b) / u64::from(c)) as u32
}

/// Centered rectangle for letterboxing `src` inside an output canvas
///
/// The binding axis is whichever would overflow the canvas at the source
/// aspect ratio; the other axis gets equal margins on both sides. When the
/// aspect ratios match, the rectangle covers the whole canvas.
#[must_use]
pub fn letterbox_rect(src_w: u32, src_h: u32, out_w: u32, out_h: u32) -> Rect {
    let out_aspect = out_w as f32 / out_h as f32;
    let src_aspect = src_w as f32 / src_h as f32;

    if out_aspect < src_aspect {
        // Width-binding: full width, vertical margins
        let mut height = mul_div(src_h, out_w, src_w);
        if height > out_h {
            height = out_h;
        }
        Rect {
            x: 0,
            y: (out_h - height) / 2,
            width: out_w,
            height,
        }
    } else {
        // Height-binding: full height, horizontal margins
        let mut width = mul_div(src_w, out_h, src_h);
        if width > out_w {
            width = out_w;
        }
        Rect {
            x: (out_w - width) / 2,
            y: 0,
            width,
            height: out_h,
        }
    }
}

/// Box-filter resize of packed BGRA pixels into a canvas rectangle
///
/// Each destination pixel averages the source box it covers. Pixels outside
/// `rect` are left untouched.
pub fn scale_packed(src: &PackedFrame<'_>, canvas: &mut [u8], canvas_w: u32, rect: &Rect) {
    let sw = src.width as usize;
    let sh = src.height as usize;
    let dw = rect.width as usize;
    let dh = rect.height as usize;
    if dw == 0 || dh == 0 || sw == 0 || sh == 0 {
        return;
    }

    for dy in 0..dh {
        let sy0 = dy * sh / dh;
        let sy1 = ((dy + 1) * sh / dh).max(sy0 + 1);

        let canvas_row = (rect.y as usize + dy) * (canvas_w as usize) * 4;
        for dx in 0..dw {
            let sx0 = dx * sw / dw;
            let sx1 = ((dx + 1) * sw / dw).max(sx0 + 1);

            let mut acc = [0u32; 4];
            for sy in sy0..sy1 {
                let row = src.row(sy as u32);
                for sx in sx0..sx1 {
                    for c in 0..4 {
                        acc[c] += u32::from(row[sx * 4 + c]);
                    }
                }
            }

            let count = ((sy1 - sy0) * (sx1 - sx0)) as u32;
            let dst = canvas_row + (rect.x as usize + dx) * 4;
            for c in 0..4 {
                canvas[dst + c] = ((acc[c] + count / 2) / count) as u8;
            }
        }
    }
}

/// Stateful scaler for one capture source
///
/// Turns native packed frames into even-dimensioned, aspect-preserving,
/// letterboxed I420 frames bounded by `max_width` x `max_height`.
///
/// The target dimensions and the scratch canvas are cached across frames
/// and recomputed only when the native frame size changes. The canvas is
/// zeroed when (re)allocated and not re-zeroed per frame; margins still
/// stay black because the letterbox rectangle only moves when the native
/// size changes, which forces a fresh canvas.
#[derive(Debug)]
pub struct ScaleSession {
    max_width: u32,
    max_height: u32,
    src_size: Option<(u32, u32)>,
    target: (u32, u32),
    canvas: Vec<u8>,
    canvas_size: (u32, u32),
}

impl ScaleSession {
    /// Create a session producing frames bounded by the given dimensions
    #[must_use]
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            src_size: None,
            target: (0, 0),
            canvas: Vec::new(),
            canvas_size: (0, 0),
        }
    }

    /// Current output dimensions, if a frame has been seen
    #[must_use]
    pub fn target(&self) -> Option<(u32, u32)> {
        self.src_size.map(|_| self.target)
    }

    /// Scale, letterbox, and convert one native frame
    ///
    /// # Errors
    ///
    /// Only fails on internal dimension invariant violations; callers in
    /// the capture loop treat an error as a transient per-frame fault.
    pub fn process(&mut self, src: &PackedFrame<'_>, timestamp_ms: i64) -> Result<FrameBuffer> {
        if self.src_size != Some((src.width, src.height)) {
            self.target = fit_within(src.width, src.height, self.max_width, self.max_height);
            self.canvas = Vec::new();
            self.canvas_size = (0, 0);
            self.src_size = Some((src.width, src.height));
            debug!(
                src_width = src.width,
                src_height = src.height,
                target_width = self.target.0,
                target_height = self.target.1,
                "recomputed scale target"
            );
        }

        let (out_w, out_h) = self.target;

        // Native capturers report 1-2 px frames while a display is off or
        // locked; emit a black frame of the output size instead.
        if src.width <= 2 || src.height <= 1 {
            return FrameBuffer::black(out_w, out_h, timestamp_ms);
        }

        let src = src.cropped_even();

        if (src.width, src.height) == (out_w, out_h) {
            return bgra_to_i420(&src, timestamp_ms);
        }

        if self.canvas_size != (out_w, out_h) {
            self.canvas = vec![0u8; (out_w as usize) * (out_h as usize) * 4];
            self.canvas_size = (out_w, out_h);
        }

        let rect = letterbox_rect(src.width, src.height, out_w, out_h);
        scale_packed(&src, &mut self.canvas, out_w, &rect);

        let canvas_frame = PackedFrame {
            data: &self.canvas,
            width: out_w,
            height: out_h,
            stride: (out_w as usize) * 4,
        };
        bgra_to_i420(&canvas_frame, timestamp_ms)
    }
}
