//! Image operations.
//!
//! Every function here takes an RGBA image by reference and returns a new
//! one. Nothing is mutated in place, so callers can keep a pristine source
//! next to any number of derived results.
//!
//! | Operation | Implementation |
//! |---|---|
//! | Drop shadow | silhouette + `imageops::blur` + `imageops::overlay` |
//! | Rounded corners / circular mask | `imageproc::drawing` mask replacing alpha |
//! | Gradient / solid background, padding | canvas fill + `imageops::overlay` |
//! | Border | `imageproc::drawing::draw_hollow_rect_mut`, one ring per pixel of width |
//! | Glass | brightness ×1.15, then a fading white band blended over the top third |
//! | Noise | `rand`, one shared offset per touched pixel |
//! | Enhancers | blend against a degenerate image (black, flat gray, luma, smoothed) |
//! | Rotate | lossless quarter turns, otherwise `imageproc` warp into an expanded canvas |
//!
//! Enhancers never touch alpha, and every operation rejects zero-sized input
//! with [`ImagingError::InvalidImage`].

use super::calculations::{
    calculate_shadow_layout, clamp_corner_radius, enhance_channel, glass_highlight_alpha,
    gradient_color, luma, quarter_turns, rotated_bounds, square_crop_rect,
};
use super::error::{ImagingError, ensure_valid};
use super::params::{Color, GradientDirection, Percent, ShadowParams};
use image::imageops;
use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_ellipse_mut, draw_filled_rect_mut, draw_hollow_rect_mut,
};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use imageproc::rect::Rect;
use rand::Rng;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Brightness boost applied by the glass effect.
const GLASS_BRIGHTNESS: i32 = 15;

/// Largest per-channel offset the noise effect adds or removes.
const NOISE_SPREAD: i16 = 30;

// ============================================================================
// Shadow and masks
// ============================================================================

/// Add a drop shadow behind the image's alpha shape.
///
/// The canvas grows to fit the offset (see
/// [`calculate_shadow_layout`](super::calculations::calculate_shadow_layout)).
/// The blur is clipped at the canvas edge.
pub fn drop_shadow(image: &RgbaImage, params: &ShadowParams) -> Result<RgbaImage> {
    ensure_valid(image)?;
    let (width, height) = image.dimensions();
    let layout = calculate_shadow_layout(width, height, params.offset_x, params.offset_y);

    let mut shadow = RgbaImage::new(layout.canvas_width, layout.canvas_height);
    let [r, g, b, a] = params.color.0;
    let (sx, sy) = layout.shadow_origin;
    for (x, y, px) in image.enumerate_pixels() {
        let alpha = (a as u32 * px[3] as u32 + 127) / 255;
        shadow.put_pixel(sx + x, sy + y, Rgba([r, g, b, alpha as u8]));
    }

    let mut canvas = gaussian_blur(&shadow, params.blur_radius)?;
    let (ix, iy) = layout.image_origin;
    imageops::overlay(&mut canvas, image, ix as i64, iy as i64);
    Ok(canvas)
}

/// Clip the image to a rounded rectangle.
///
/// The mask replaces the existing alpha channel rather than multiplying it,
/// so a radius of 0 makes every pixel fully opaque.
pub fn rounded_corners(image: &RgbaImage, radius: u32) -> Result<RgbaImage> {
    ensure_valid(image)?;
    let (width, height) = image.dimensions();
    Ok(replace_alpha(image, &rounded_rect_mask(width, height, radius)))
}

/// Clip the image to its inscribed ellipse. Alpha is replaced, as with
/// [`rounded_corners`].
pub fn circular_mask(image: &RgbaImage) -> Result<RgbaImage> {
    ensure_valid(image)?;
    let (width, height) = image.dimensions();
    let mut mask = GrayImage::new(width, height);
    let (rx, ry) = ((width / 2) as i32, (height / 2) as i32);
    draw_filled_ellipse_mut(&mut mask, (rx, ry), rx, ry, Luma([255]));
    Ok(replace_alpha(image, &mask))
}

fn rounded_rect_mask(width: u32, height: u32, radius: u32) -> GrayImage {
    let fill = Luma([255u8]);
    let r = clamp_corner_radius(radius, width, height);
    if r == 0 {
        return GrayImage::from_pixel(width, height, fill);
    }

    let mut mask = GrayImage::new(width, height);
    if width > 2 * r {
        draw_filled_rect_mut(
            &mut mask,
            Rect::at(r as i32, 0).of_size(width - 2 * r, height),
            fill,
        );
    }
    if height > 2 * r {
        draw_filled_rect_mut(
            &mut mask,
            Rect::at(0, r as i32).of_size(width, height - 2 * r),
            fill,
        );
    }
    let ri = r as i32;
    let right = (width - 1 - r) as i32;
    let bottom = (height - 1 - r) as i32;
    for center in [(ri, ri), (right, ri), (ri, bottom), (right, bottom)] {
        draw_filled_circle_mut(&mut mask, center, ri, fill);
    }
    mask
}

fn replace_alpha(image: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    let mut result = image.clone();
    for (px, m) in result.pixels_mut().zip(mask.pixels()) {
        px[3] = m[0];
    }
    result
}

// ============================================================================
// Backgrounds and framing
// ============================================================================

/// Composite the image over a two-color linear gradient.
///
/// The result is fully opaque: transparent areas of the source show the
/// gradient.
pub fn gradient_background(
    image: &RgbaImage,
    from: Color,
    to: Color,
    direction: GradientDirection,
) -> Result<RgbaImage> {
    ensure_valid(image)?;
    let (width, height) = image.dimensions();
    let mut canvas = RgbaImage::from_fn(width, height, |x, y| match direction {
        GradientDirection::Vertical => Rgba(gradient_color(from, to, y, height)),
        GradientDirection::Horizontal => Rgba(gradient_color(from, to, x, width)),
    });
    imageops::overlay(&mut canvas, image, 0, 0);
    Ok(canvas)
}

/// Composite the image over a solid color of the same size.
pub fn solid_background(image: &RgbaImage, color: Color) -> Result<RgbaImage> {
    ensure_valid(image)?;
    let (width, height) = image.dimensions();
    let mut canvas = RgbaImage::from_pixel(width, height, color.to_pixel());
    imageops::overlay(&mut canvas, image, 0, 0);
    Ok(canvas)
}

/// Grow the canvas by `amount` pixels on every side.
pub fn add_padding(image: &RgbaImage, amount: u32, background: Color) -> Result<RgbaImage> {
    ensure_valid(image)?;
    let (width, height) = image.dimensions();
    let mut canvas = RgbaImage::from_pixel(
        width + amount * 2,
        height + amount * 2,
        background.to_pixel(),
    );
    imageops::overlay(&mut canvas, image, amount as i64, amount as i64);
    Ok(canvas)
}

/// Draw a rectangular outline `stroke` pixels wide just inside the edges.
///
/// Outline pixels are overwritten, not blended.
pub fn add_border(image: &RgbaImage, stroke: u32, color: Color) -> Result<RgbaImage> {
    ensure_valid(image)?;
    let (width, height) = image.dimensions();
    let mut result = image.clone();
    for inset in 0..stroke {
        if inset * 2 >= width || inset * 2 >= height {
            break;
        }
        let ring = Rect::at(inset as i32, inset as i32)
            .of_size(width - inset * 2, height - inset * 2);
        draw_hollow_rect_mut(&mut result, ring, color.to_pixel());
    }
    Ok(result)
}

/// Brighten the image and lay a fading white highlight over its top third.
pub fn glass_effect(image: &RgbaImage) -> Result<RgbaImage> {
    let mut result = brightness(image, Percent::new(GLASS_BRIGHTNESS))?;
    let height = result.height();
    for (_, y, px) in result.enumerate_pixels_mut() {
        if let Some(alpha) = glass_highlight_alpha(y, height) {
            px.blend(&Rgba([255, 255, 255, alpha]));
        }
    }
    Ok(result)
}

// ============================================================================
// Noise
// ============================================================================

/// Add random speckle noise to roughly `amount`% of pixels.
///
/// Output is non-deterministic; see [`add_noise_with_rng`] for a seedable
/// variant.
pub fn add_noise(image: &RgbaImage, amount: u32) -> Result<RgbaImage> {
    add_noise_with_rng(image, amount, &mut rand::rng())
}

/// Add speckle noise using the given random source.
///
/// Each pixel is touched with probability `amount / 100`. A touched pixel
/// gets a single offset in `[-30, 30]` added to red, green and blue alike,
/// so gray pixels stay gray. Alpha is never changed.
pub fn add_noise_with_rng<R: Rng + ?Sized>(
    image: &RgbaImage,
    amount: u32,
    rng: &mut R,
) -> Result<RgbaImage> {
    ensure_valid(image)?;
    let probability = amount.min(100) as f64 / 100.0;
    let mut result = image.clone();
    for px in result.pixels_mut() {
        if rng.random_bool(probability) {
            let offset = rng.random_range(-NOISE_SPREAD..=NOISE_SPREAD);
            for channel in &mut px.0[..3] {
                *channel = (*channel as i16 + offset).clamp(0, 255) as u8;
            }
        }
    }
    Ok(result)
}

// ============================================================================
// Enhancers
// ============================================================================

fn enhance_with<F>(image: &RgbaImage, amount: Percent, degenerate: F) -> RgbaImage
where
    F: Fn(u32, u32, &Rgba<u8>) -> [u8; 3],
{
    let factor = amount.factor();
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let px = image.get_pixel(x, y);
        let d = degenerate(x, y, px);
        Rgba([
            enhance_channel(d[0], px[0], factor),
            enhance_channel(d[1], px[1], factor),
            enhance_channel(d[2], px[2], factor),
            px[3],
        ])
    })
}

/// Scale color towards (negative) or away from (positive) black.
pub fn brightness(image: &RgbaImage, amount: Percent) -> Result<RgbaImage> {
    ensure_valid(image)?;
    Ok(enhance_with(image, amount, |_, _, _| [0, 0, 0]))
}

/// Push color away from (positive) or towards (negative) the mean luma.
///
/// At -100 the image collapses to a single flat gray.
pub fn contrast(image: &RgbaImage, amount: Percent) -> Result<RgbaImage> {
    ensure_valid(image)?;
    let total: u64 = image
        .pixels()
        .map(|px| luma(px[0], px[1], px[2]) as u64)
        .sum();
    let count = image.width() as u64 * image.height() as u64;
    let mean = (total as f64 / count as f64 + 0.5) as u8;
    Ok(enhance_with(image, amount, |_, _, _| [mean, mean, mean]))
}

/// Scale color saturation; -100 yields grayscale.
pub fn saturation(image: &RgbaImage, amount: Percent) -> Result<RgbaImage> {
    ensure_valid(image)?;
    Ok(enhance_with(image, amount, |_, _, px| {
        let l = luma(px[0], px[1], px[2]);
        [l, l, l]
    }))
}

/// Sharpen (positive) or soften (negative) against a 3×3 smoothed copy.
pub fn sharpness(image: &RgbaImage, amount: Percent) -> Result<RgbaImage> {
    ensure_valid(image)?;
    let smoothed = smooth(image);
    Ok(enhance_with(image, amount, |x, y, _| {
        let s = smoothed.get_pixel(x, y);
        [s[0], s[1], s[2]]
    }))
}

/// 3×3 smoothing kernel (center weight 5, neighbours 1, divisor 13).
/// Border pixels are copied unchanged.
fn smooth(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let mut out = image.clone();
    if width < 3 || height < 3 {
        return out;
    }
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = [0u32; 3];
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    let weight = if nx == x && ny == y { 5 } else { 1 };
                    let p = image.get_pixel(nx, ny);
                    for (sum, value) in acc.iter_mut().zip(p.0) {
                        *sum += value as u32 * weight;
                    }
                }
            }
            let px = out.get_pixel_mut(x, y);
            for (channel, sum) in px.0.iter_mut().zip(acc) {
                *channel = ((sum + 6) / 13) as u8;
            }
        }
    }
    out
}

/// Gaussian blur with standard deviation `sigma`. Non-positive sigma copies.
pub fn gaussian_blur(image: &RgbaImage, sigma: f32) -> Result<RgbaImage> {
    ensure_valid(image)?;
    if sigma <= 0.0 {
        return Ok(image.clone());
    }
    Ok(imageops::blur(image, sigma))
}

// ============================================================================
// Geometry
// ============================================================================

/// Rotate counter-clockwise by `degrees` about the center.
///
/// The canvas expands to hold the whole rotated image; uncovered areas are
/// transparent. Multiples of 90° are exact pixel transpositions.
pub fn rotate(image: &RgbaImage, degrees: f32) -> Result<RgbaImage> {
    ensure_valid(image)?;
    match quarter_turns(degrees) {
        Some(0) => Ok(image.clone()),
        Some(1) => Ok(imageops::rotate90(image)),
        Some(2) => Ok(imageops::rotate180(image)),
        Some(_) => Ok(imageops::rotate270(image)),
        None => Ok(rotate_expanded(image, degrees)),
    }
}

fn rotate_expanded(image: &RgbaImage, degrees: f32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let (out_w, out_h) = rotated_bounds(width, height, degrees);
    // imageproc rotates clockwise for positive angles.
    let projection = Projection::translate(out_w as f32 / 2.0, out_h as f32 / 2.0)
        * Projection::rotate(-degrees.to_radians())
        * Projection::translate(-(width as f32) / 2.0, -(height as f32) / 2.0);
    let mut out = RgbaImage::new(out_w, out_h);
    warp_into(
        image,
        &projection,
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
        &mut out,
    );
    out
}

pub fn flip_horizontal(image: &RgbaImage) -> Result<RgbaImage> {
    ensure_valid(image)?;
    Ok(imageops::flip_horizontal(image))
}

pub fn flip_vertical(image: &RgbaImage) -> Result<RgbaImage> {
    ensure_valid(image)?;
    Ok(imageops::flip_vertical(image))
}

/// Centered crop to a `min(w, h)` square.
pub fn crop_to_square(image: &RgbaImage) -> Result<RgbaImage> {
    ensure_valid(image)?;
    let (x, y, side) = square_crop_rect(image.width(), image.height());
    Ok(imageops::crop_imm(image, x, y, side, side).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{pattern, solid};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    #[test]
    fn every_operation_rejects_empty_image() {
        let empty = RgbaImage::new(0, 4);
        let ops: Vec<(&str, Result<RgbaImage>)> = vec![
            ("shadow", drop_shadow(&empty, &ShadowParams::default())),
            ("rounded", rounded_corners(&empty, 4)),
            ("circle", circular_mask(&empty)),
            (
                "gradient",
                gradient_background(
                    &empty,
                    Color::BLACK,
                    Color::WHITE,
                    GradientDirection::Vertical,
                ),
            ),
            ("solid", solid_background(&empty, Color::WHITE)),
            ("padding", add_padding(&empty, 2, Color::TRANSPARENT_WHITE)),
            ("border", add_border(&empty, 2, Color::BLACK)),
            ("glass", glass_effect(&empty)),
            ("noise", add_noise(&empty, 50)),
            ("brightness", brightness(&empty, Percent::new(10))),
            ("contrast", contrast(&empty, Percent::new(10))),
            ("saturation", saturation(&empty, Percent::new(10))),
            ("sharpness", sharpness(&empty, Percent::new(10))),
            ("blur", gaussian_blur(&empty, 2.0)),
            ("rotate", rotate(&empty, 30.0)),
            ("flip_h", flip_horizontal(&empty)),
            ("flip_v", flip_vertical(&empty)),
            ("crop", crop_to_square(&empty)),
        ];
        for (name, result) in ops {
            assert!(
                matches!(result, Err(ImagingError::InvalidImage { width: 0, height: 4 })),
                "{name} accepted an empty image"
            );
        }
    }

    // =========================================================================
    // Shadow and masks
    // =========================================================================

    #[test]
    fn drop_shadow_grows_canvas_and_keeps_image_on_top() {
        let img = solid(20, 10, RED);
        let out = drop_shadow(&img, &ShadowParams::with_blur(0.0)).unwrap();
        assert_eq!(out.dimensions(), (44, 34));
        // Image sits at (8, 8)
        assert_eq!(out.get_pixel(8, 8).0, RED);
        assert_eq!(out.get_pixel(27, 17).0, RED);
        // Top-left corner is untouched canvas
        assert_eq!(out.get_pixel(0, 0).0, CLEAR);
        // Shadow visible below-right of the image, at (16..36, 16..26)
        assert_eq!(out.get_pixel(35, 25).0, [0, 0, 0, 180]);
    }

    #[test]
    fn drop_shadow_follows_alpha_shape() {
        let mut img = solid(10, 10, RED);
        img.put_pixel(9, 9, Rgba(CLEAR));
        let out = drop_shadow(&img, &ShadowParams::with_blur(0.0)).unwrap();
        // Silhouette of the transparent pixel lands at (16 + 9, 16 + 9)
        assert_eq!(out.get_pixel(25, 25)[3], 0);
        assert_eq!(out.get_pixel(24, 24)[3], 180);
    }

    #[test]
    fn drop_shadow_blur_softens_edge() {
        let img = solid(16, 16, RED);
        let hard = drop_shadow(&img, &ShadowParams::with_blur(0.0)).unwrap();
        let soft = drop_shadow(&img, &ShadowParams::with_blur(3.0)).unwrap();
        // Just outside the silhouette's bottom-right corner
        assert_eq!(hard.get_pixel(33, 33)[3], 0);
        assert!(soft.get_pixel(33, 33)[3] > 0);
    }

    #[test]
    fn rounded_corners_radius_zero_is_opaque_rectangle() {
        let img = pattern(16, 12);
        let out = rounded_corners(&img, 0).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn rounded_corners_replaces_alpha() {
        let img = solid(64, 64, [0, 0, 255, 100]);
        let out = rounded_corners(&img, 10).unwrap();
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(63, 63)[3], 0);
        // Replaced, not multiplied: 100 → 255
        assert_eq!(out.get_pixel(32, 32)[3], 255);
        assert_eq!(out.get_pixel(32, 0)[3], 255);
        assert_eq!(out.get_pixel(0, 32)[3], 255);
        // Color untouched
        assert_eq!(&out.get_pixel(32, 32).0[..3], &[0, 0, 255]);
    }

    #[test]
    fn circular_mask_clears_corners() {
        let out = circular_mask(&solid(40, 40, RED)).unwrap();
        for (x, y) in [(0, 0), (39, 0), (0, 39), (39, 39)] {
            assert_eq!(out.get_pixel(x, y)[3], 0, "corner ({x}, {y})");
        }
        assert_eq!(out.get_pixel(20, 20).0, RED);
        assert_eq!(out.get_pixel(20, 1)[3], 255);
    }

    // =========================================================================
    // Backgrounds and framing
    // =========================================================================

    #[test]
    fn vertical_gradient_rises_monotonically() {
        let img = solid(4, 10, CLEAR);
        let out = gradient_background(
            &img,
            Color::rgb(0, 0, 0),
            Color::rgb(255, 255, 255),
            GradientDirection::Vertical,
        )
        .unwrap();

        assert!(out.get_pixel(0, 0)[0] <= 5);
        assert!(out.get_pixel(0, 9)[0] >= 225);
        let column: Vec<u8> = (0..10).map(|y| out.get_pixel(2, y)[0]).collect();
        assert!(column.windows(2).all(|w| w[0] < w[1]), "{column:?}");
        // Rows are uniform and opaque
        assert_eq!(out.get_pixel(0, 5), out.get_pixel(3, 5));
        assert_eq!(out.get_pixel(1, 7)[3], 255);
    }

    #[test]
    fn horizontal_gradient_runs_left_to_right() {
        let img = solid(8, 2, CLEAR);
        let out = gradient_background(
            &img,
            Color::rgb(66, 133, 244),
            Color::rgb(219, 68, 55),
            GradientDirection::Horizontal,
        )
        .unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [66, 133, 244, 255]);
        assert_eq!(out.get_pixel(0, 0), out.get_pixel(0, 1));
        // 66 + 153 * 7/8 ≈ 200
        assert!(out.get_pixel(7, 0)[0] > 190);
    }

    #[test]
    fn gradient_keeps_opaque_foreground() {
        let img = solid(6, 6, RED);
        let out = gradient_background(
            &img,
            Color::BLACK,
            Color::WHITE,
            GradientDirection::Vertical,
        )
        .unwrap();
        assert!(out.pixels().all(|p| p.0 == RED));
    }

    #[test]
    fn solid_background_fills_transparency() {
        let mut img = solid(4, 4, RED);
        img.put_pixel(0, 0, Rgba(CLEAR));
        let out = solid_background(&img, Color::WHITE).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(1, 1).0, RED);
    }

    #[test]
    fn padding_centers_source_on_transparent_canvas() {
        let img = solid(10, 6, RED);
        let out = add_padding(&img, 5, Color::TRANSPARENT_WHITE).unwrap();
        assert_eq!(out.dimensions(), (20, 16));
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 0]);
        assert_eq!(out.get_pixel(5, 5).0, RED);
        assert_eq!(out.get_pixel(14, 10).0, RED);
        assert_eq!(out.get_pixel(15, 11)[3], 0);
    }

    #[test]
    fn border_draws_rings_on_a_copy() {
        let img = solid(20, 20, RED);
        let out = add_border(&img, 3, Color::BLACK).unwrap();
        for inset in 0..3 {
            assert_eq!(out.get_pixel(inset, 10).0, [0, 0, 0, 255]);
            assert_eq!(out.get_pixel(10, 19 - inset).0, [0, 0, 0, 255]);
        }
        assert_eq!(out.get_pixel(3, 10).0, RED);
        assert_eq!(out.get_pixel(10, 10).0, RED);
        assert!(img.pixels().all(|p| p.0 == RED));
    }

    #[test]
    fn border_wider_than_image_fills_it() {
        let out = add_border(&solid(4, 4, RED), 20, Color::BLACK).unwrap();
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn glass_highlights_top_third_only() {
        let img = solid(12, 30, [100, 100, 100, 255]);
        let out = glass_effect(&img).unwrap();
        // 100 * 1.15 = 115 below the band
        assert_eq!(out.get_pixel(0, 29).0, [115, 115, 115, 255]);
        assert_eq!(out.get_pixel(0, 10).0, [115, 115, 115, 255]);
        // Top row gets the strongest highlight
        let top = out.get_pixel(0, 0)[0];
        let mid = out.get_pixel(0, 5)[0];
        assert!(top > mid && mid > 115, "top {top}, mid {mid}");
    }

    // =========================================================================
    // Noise
    // =========================================================================

    #[test]
    fn noise_zero_amount_is_identity() {
        let img = pattern(8, 8);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(add_noise_with_rng(&img, 0, &mut rng).unwrap(), img);
    }

    #[test]
    fn noise_offsets_are_bounded_and_shared() {
        let img = solid(32, 32, [128, 128, 128, 77]);
        let mut rng = StdRng::seed_from_u64(42);
        let out = add_noise_with_rng(&img, 100, &mut rng).unwrap();

        let mut changed = 0;
        for px in out.pixels() {
            assert_eq!(px[3], 77);
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert!((98..=158).contains(&px[0]));
            if px[0] != 128 {
                changed += 1;
            }
        }
        // Offset 0 has 1/61 odds; nearly every pixel should move.
        assert!(changed > 900, "only {changed} pixels changed");
    }

    #[test]
    fn noise_is_reproducible_with_same_seed() {
        let img = pattern(16, 16);
        let a = add_noise_with_rng(&img, 25, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = add_noise_with_rng(&img, 25, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    // =========================================================================
    // Enhancers
    // =========================================================================

    #[test]
    fn brightness_scales_and_preserves_alpha() {
        let img = solid(3, 3, [100, 50, 200, 90]);
        let out = brightness(&img, Percent::new(20)).unwrap();
        assert_eq!(out.get_pixel(1, 1).0, [120, 60, 240, 90]);
        let black = brightness(&img, Percent::new(-100)).unwrap();
        assert_eq!(black.get_pixel(1, 1).0, [0, 0, 0, 90]);
    }

    #[test]
    fn contrast_minus_100_is_flat() {
        let out = contrast(&pattern(10, 10), Percent::new(-100)).unwrap();
        let first = out.get_pixel(0, 0).0;
        assert!(out.pixels().all(|p| p.0 == first));
        assert_eq!(first[0], first[1]);
    }

    #[test]
    fn contrast_plus_spreads_around_mean() {
        let mut img = solid(2, 1, [100, 100, 100, 255]);
        img.put_pixel(1, 0, Rgba([200, 200, 200, 255]));
        // Mean luma 150
        let out = contrast(&img, Percent::new(100)).unwrap();
        assert_eq!(out.get_pixel(0, 0)[0], 50);
        assert_eq!(out.get_pixel(1, 0)[0], 250);
    }

    #[test]
    fn saturation_minus_100_is_grayscale() {
        let out = saturation(&pattern(6, 6), Percent::new(-100)).unwrap();
        for px in out.pixels() {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn sharpness_leaves_flat_image_alone() {
        let img = solid(8, 8, [40, 80, 120, 255]);
        assert_eq!(sharpness(&img, Percent::new(100)).unwrap(), img);
    }

    #[test]
    fn sharpness_boosts_isolated_pixel() {
        let mut img = solid(5, 5, [100, 100, 100, 255]);
        img.put_pixel(2, 2, Rgba([200, 200, 200, 255]));
        let out = sharpness(&img, Percent::new(100)).unwrap();
        assert!(out.get_pixel(2, 2)[0] > 200);
        // Border pixels are not smoothed, so they stay put
        assert_eq!(out.get_pixel(0, 0)[0], 100);
    }

    #[test]
    fn blur_zero_is_copy() {
        let img = pattern(5, 5);
        assert_eq!(gaussian_blur(&img, 0.0).unwrap(), img);
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    #[test]
    fn rotate_zero_after_flip_is_flip() {
        let img = pattern(7, 4);
        let flipped = flip_horizontal(&img).unwrap();
        assert_eq!(rotate(&flipped, 0.0).unwrap(), flipped);
    }

    #[test]
    fn rotate_90_is_counter_clockwise() {
        let img = pattern(6, 3);
        let out = rotate(&img, 90.0).unwrap();
        assert_eq!(out.dimensions(), (3, 6));
        // Top-right corner moves to top-left
        assert_eq!(out.get_pixel(0, 0), img.get_pixel(5, 0));
        assert_eq!(rotate(&img, -270.0).unwrap(), out);
    }

    #[test]
    fn rotate_45_expands_with_transparent_corners() {
        let img = solid(40, 40, RED);
        let out = rotate(&img, 45.0).unwrap();
        assert_eq!(out.dimensions(), (57, 57));
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(28, 28).0, RED);
    }

    #[test]
    fn flips_mirror_pixels() {
        let img = pattern(5, 4);
        let h = flip_horizontal(&img).unwrap();
        let v = flip_vertical(&img).unwrap();
        assert_eq!(h.get_pixel(0, 1), img.get_pixel(4, 1));
        assert_eq!(v.get_pixel(2, 0), img.get_pixel(2, 3));
    }

    #[test]
    fn crop_to_square_is_centered() {
        let img = pattern(10, 4);
        let out = crop_to_square(&img).unwrap();
        assert_eq!(out.dimensions(), (4, 4));
        // offset ((10 - 4) / 2, 0) = (3, 0)
        assert_eq!(out.get_pixel(0, 0), img.get_pixel(3, 0));
        assert_eq!(out.get_pixel(3, 3), img.get_pixel(6, 3));
    }

    #[test]
    fn crop_to_square_portrait() {
        let img = pattern(3, 8);
        let out = crop_to_square(&img).unwrap();
        assert_eq!(out.dimensions(), (3, 3));
        assert_eq!(out.get_pixel(0, 0), img.get_pixel(0, 2));
    }
}
