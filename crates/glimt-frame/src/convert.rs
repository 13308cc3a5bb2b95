//! Color Format Conversion
//!
//! Converts between the packed BGRA frames native captures produce and the
//! I420 planar layout the rest of the pipeline carries, plus the reverse
//! direction (planar to packed RGBA) used when filling a display buffer.
//!
//! Both directions use fixed-point BT.601 (studio swing) coefficients.
//! The capture direction is lossy and one-directional: 4:2:0 chroma
//! subsampling discards information, so there is no round-trip guarantee.

use crate::error::{FrameError, Result};
use crate::frame::{FrameBuffer, PackedFrame};

/// Convert a single RGB pixel to YUV (BT.601 studio swing)
///
/// Y = 0.257R + 0.504G + 0.098B + 16
/// U = -0.148R - 0.291G + 0.439B + 128
/// V = 0.439R - 0.368G - 0.071B + 128
#[inline]
fn rgb_to_yuv(r: i32, g: i32, b: i32) -> (u8, u8, u8) {
    // Scale factors (multiplied by 256 for integer math)
    const R_TO_Y: i32 = 66;
    const G_TO_Y: i32 = 129;
    const B_TO_Y: i32 = 25;
    const R_TO_U: i32 = 38;
    const G_TO_U: i32 = 74;
    const B_TO_U: i32 = 112;
    const R_TO_V: i32 = 112;
    const G_TO_V: i32 = 94;
    const B_TO_V: i32 = 18;

    let y = ((R_TO_Y * r + G_TO_Y * g + B_TO_Y * b + 128) >> 8) + 16;
    let u = ((-R_TO_U * r - G_TO_U * g + B_TO_U * b + 128) >> 8) + 128;
    let v = ((R_TO_V * r - G_TO_V * g - B_TO_V * b + 128) >> 8) + 128;

    (
        y.clamp(0, 255) as u8,
        u.clamp(0, 255) as u8,
        v.clamp(0, 255) as u8,
    )
}

/// Convert a single YUV pixel to RGB (BT.601 studio swing)
///
/// R = 1.164(Y-16) + 1.596(V-128)
/// G = 1.164(Y-16) - 0.813(V-128) - 0.391(U-128)
/// B = 1.164(Y-16) + 2.018(U-128)
#[inline]
fn yuv_to_rgb(y: i32, u: i32, v: i32) -> (u8, u8, u8) {
    // Scale factors (multiplied by 256 for integer math)
    const Y_SCALE: i32 = 298; // 1.164 * 256
    const V_TO_R: i32 = 409; // 1.596 * 256
    const U_TO_G: i32 = 100; // 0.391 * 256
    const V_TO_G: i32 = 208; // 0.813 * 256
    const U_TO_B: i32 = 516; // 2.018 * 256

    let y = y - 16;
    let u = u - 128;
    let v = v - 128;

    let r = (Y_SCALE * y + V_TO_R * v + 128) >> 8;
    let g = (Y_SCALE * y - U_TO_G * u - V_TO_G * v + 128) >> 8;
    let b = (Y_SCALE * y + U_TO_B * u + 128) >> 8;

    (
        r.clamp(0, 255) as u8,
        g.clamp(0, 255) as u8,
        b.clamp(0, 255) as u8,
    )
}

/// Convert packed BGRA to I420 planes
///
/// Chroma is subsampled 2x2 by averaging the four source pixels of each
/// block, so `src` dimensions must be even (crop first via
/// [`PackedFrame::cropped_even`]).
///
/// # Errors
///
/// Returns [`FrameError::InvalidDimensions`] for odd or zero dimensions.
pub fn bgra_to_i420(src: &PackedFrame<'_>, timestamp_ms: i64) -> Result<FrameBuffer> {
    let w = src.width as usize;
    let h = src.height as usize;

    if w == 0 || h == 0 || w % 2 != 0 || h % 2 != 0 {
        return Err(FrameError::InvalidDimensions {
            width: src.width,
            height: src.height,
        });
    }

    let y_len = w * h;
    let c_len = (w / 2) * (h / 2);
    let mut data = vec![0u8; y_len + 2 * c_len];

    // Luma: every pixel
    for row in 0..h {
        let src_row = src.row(row as u32);
        let dst_row = &mut data[row * w..(row + 1) * w];
        for x in 0..w {
            let px = &src_row[x * 4..x * 4 + 4];
            let (y, _, _) = rgb_to_yuv(i32::from(px[2]), i32::from(px[1]), i32::from(px[0]));
            dst_row[x] = y;
        }
    }

    // Chroma: 2x2 block average
    for cy in 0..h / 2 {
        let top = src.row((cy * 2) as u32);
        let bottom = src.row((cy * 2 + 1) as u32);
        for cx in 0..w / 2 {
            let mut b = 0i32;
            let mut g = 0i32;
            let mut r = 0i32;
            for row in [top, bottom] {
                for px in [cx * 2, cx * 2 + 1] {
                    b += i32::from(row[px * 4]);
                    g += i32::from(row[px * 4 + 1]);
                    r += i32::from(row[px * 4 + 2]);
                }
            }
            let (_, u, v) = rgb_to_yuv((r + 2) / 4, (g + 2) / 4, (b + 2) / 4);

            let c_idx = cy * (w / 2) + cx;
            data[y_len + c_idx] = u;
            data[y_len + c_len + c_idx] = v;
        }
    }

    FrameBuffer::from_i420(src.width, src.height, crate::frame::Rotation::Deg0, timestamp_ms, data)
}

/// Convert an I420 frame to packed RGBA for a display surface
///
/// Writes `width * height * 4` bytes into `dst`. This reverses the channel
/// order convention of the capture direction: display surfaces consume
/// R, G, B, A bytes in memory order.
///
/// # Errors
///
/// Returns [`FrameError::BufferTooSmall`] when `dst` cannot hold the output.
pub fn i420_to_rgba(frame: &FrameBuffer, dst: &mut [u8]) -> Result<()> {
    let w = frame.width() as usize;
    let h = frame.height() as usize;

    let needed = w * h * 4;
    if dst.len() < needed {
        return Err(FrameError::BufferTooSmall {
            needed,
            len: dst.len(),
        });
    }

    let y_plane = frame.plane_y();
    let u_plane = frame.plane_u();
    let v_plane = frame.plane_v();
    let c_stride = frame.stride_c();

    for row in 0..h {
        for x in 0..w {
            let y_val = i32::from(y_plane[row * w + x]);
            let c_idx = (row / 2) * c_stride + x / 2;
            let u_val = i32::from(u_plane[c_idx]);
            let v_val = i32::from(v_plane[c_idx]);

            let (r, g, b) = yuv_to_rgb(y_val, u_val, v_val);

            let dst_idx = (row * w + x) * 4;
            dst[dst_idx] = r;
            dst[dst_idx + 1] = g;
            dst[dst_idx + 2] = b;
            dst[dst_idx + 3] = 255; // Alpha
        }
    }

    Ok(())
}
