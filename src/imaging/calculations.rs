//! Pure calculation functions for icon geometry and color math.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Color;

/// Calculate the centered square crop of an image.
///
/// # Returns
/// * `(x, y, side)` - Top-left corner and side length of the crop
///
/// ```text
/// 300x200 → (50, 0, 200)
/// 200x301 → (0, 50, 200)
/// ```
pub fn square_crop_rect(width: u32, height: u32) -> (u32, u32, u32) {
    let side = width.min(height);
    ((width - side) / 2, (height - side) / 2, side)
}

/// Canvas geometry for a drop shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Where the silhouette is painted.
    pub shadow_origin: (u32, u32),
    /// Where the original image is composited.
    pub image_origin: (u32, u32),
}

/// Calculate the drop shadow canvas for an image and offset.
///
/// The canvas grows by three times the absolute offset on each axis. The
/// silhouette sits at `|o| + o`, the image at `|o|`, so a negative offset
/// puts the shadow at the canvas edge and the image inward.
pub fn calculate_shadow_layout(
    width: u32,
    height: u32,
    offset_x: i32,
    offset_y: i32,
) -> ShadowLayout {
    let ax = offset_x.unsigned_abs();
    let ay = offset_y.unsigned_abs();
    ShadowLayout {
        canvas_width: width + ax * 3,
        canvas_height: height + ay * 3,
        shadow_origin: (
            (offset_x + ax as i32) as u32,
            (offset_y + ay as i32) as u32,
        ),
        image_origin: (ax, ay),
    }
}

/// Linear interpolation of one channel, rounded to nearest.
pub fn lerp_channel(from: u8, to: u8, ratio: f32) -> u8 {
    let value = from as f32 + (to as f32 - from as f32) * ratio;
    value.round().clamp(0.0, 255.0) as u8
}

/// Color of scanline `index` out of `len` in a two-color gradient.
///
/// The ratio is `index / len`, so the last scanline stops one step short of
/// `to`. The result is always opaque.
pub fn gradient_color(from: Color, to: Color, index: u32, len: u32) -> [u8; 4] {
    let ratio = if len == 0 {
        0.0
    } else {
        index as f32 / len as f32
    };
    [
        lerp_channel(from.0[0], to.0[0], ratio),
        lerp_channel(from.0[1], to.0[1], ratio),
        lerp_channel(from.0[2], to.0[2], ratio),
        255,
    ]
}

/// Alpha of the glass highlight on a given row, or `None` below the band.
///
/// The band covers the top third of the image. Alpha falls linearly from
/// 80 on the first row towards 0 at the band edge (truncated).
pub fn glass_highlight_alpha(row: u32, height: u32) -> Option<u8> {
    let band = height / 3;
    if row >= band {
        return None;
    }
    Some((80.0 * (1.0 - row as f32 / band as f32)) as u8)
}

/// Clamp a corner radius so opposite corners never overlap.
pub fn clamp_corner_radius(radius: u32, width: u32, height: u32) -> u32 {
    radius.min(width / 2).min(height / 2)
}

/// Bounding box of a `width x height` rectangle rotated by `degrees`.
pub fn rotated_bounds(width: u32, height: u32, degrees: f32) -> (u32, u32) {
    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let w = width as f32 * cos + height as f32 * sin;
    let h = width as f32 * sin + height as f32 * cos;
    // Trim float noise so e.g. 90.0000001 does not grow the canvas by a pixel.
    let fit = |v: f32| ((v - 1e-3).ceil().max(1.0)) as u32;
    (fit(w), fit(h))
}

/// Number of clockwise quarter turns equal to a counter-clockwise angle,
/// or `None` when the angle is not a multiple of 90°.
pub fn quarter_turns(degrees: f32) -> Option<u32> {
    let normalized = degrees.rem_euclid(360.0);
    let turns = normalized / 90.0;
    if (turns - turns.round()).abs() > 1e-4 {
        return None;
    }
    // Counter-clockwise n quarters == clockwise (4 - n) quarters.
    Some((4 - (turns.round() as u32 % 4)) % 4)
}

/// ITU-R 601-2 luma, rounded.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000) as u8
}

/// Blend a channel away from its degenerate value: `d + factor * (src - d)`.
pub fn enhance_channel(degenerate: u8, source: u8, factor: f32) -> u8 {
    let d = degenerate as f32;
    (d + factor * (source as f32 - d)).round().clamp(0.0, 255.0) as u8
}
