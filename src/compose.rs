//! Composition engine: turns a source image and an [`EditSettings`] into the
//! edited image.
//!
//! ```text
//! source ─┬─ preset set? ── apply_preset ─────────────────────┐
//!         └─ adjust → apply_effects → apply_background ───────┤
//!                                                             ▼
//!             crop → rotate → flip H → flip V → circular mask (transforms)
//! ```
//!
//! Every function here is pure: same input, same output. The one exception is
//! a preset that adds noise.

use crate::config::{
    AdjustSettings, BackgroundSettings, EditSettings, EffectSettings, TransformSettings,
};
use crate::imaging::{self, Color, ImagingError, Percent, ShadowParams};
use crate::preset;
use image::RgbaImage;

/// Brightness, contrast, saturation and sharpness, in that order.
/// Zero values are skipped.
pub fn adjust(source: &RgbaImage, settings: &AdjustSettings) -> Result<RgbaImage, ImagingError> {
    imaging::ensure_valid(source)?;
    let mut result = source.clone();
    if settings.is_identity() {
        return Ok(result);
    }
    let steps: [(i32, fn(&RgbaImage, Percent) -> Result<RgbaImage, ImagingError>); 4] = [
        (settings.brightness, imaging::brightness),
        (settings.contrast, imaging::contrast),
        (settings.saturation, imaging::saturation),
        (settings.sharpness, imaging::sharpness),
    ];
    for (amount, step) in steps {
        let percent = Percent::new(amount);
        if !percent.is_zero() {
            result = step(&result, percent)?;
        }
    }
    Ok(result)
}

/// Blur, rounded corners, border, glass, then shadow last so it follows the
/// final silhouette.
pub fn apply_effects(
    current: &RgbaImage,
    settings: &EffectSettings,
) -> Result<RgbaImage, ImagingError> {
    imaging::ensure_valid(current)?;
    let mut result = current.clone();
    if settings.blur > 0 {
        result = imaging::gaussian_blur(&result, settings.blur as f32 / 2.0)?;
    }
    if settings.rounded_corners {
        result = imaging::rounded_corners(&result, settings.corner_radius)?;
    }
    if settings.border {
        result = imaging::add_border(&result, settings.border_width, Color::BLACK)?;
    }
    if settings.glass {
        result = imaging::glass_effect(&result)?;
    }
    if settings.shadow {
        let params = ShadowParams::with_blur(settings.shadow_blur as f32);
        result = imaging::drop_shadow(&result, &params)?;
    }
    Ok(result)
}

/// Padding, solid fill, then gradient.
pub fn apply_background(
    current: &RgbaImage,
    settings: &BackgroundSettings,
) -> Result<RgbaImage, ImagingError> {
    imaging::ensure_valid(current)?;
    let mut result = current.clone();
    if settings.padding > 0 {
        result = imaging::add_padding(&result, settings.padding, Color::TRANSPARENT_WHITE)?;
    }
    if settings.fill {
        result = imaging::solid_background(&result, settings.fill_color)?;
    }
    if settings.gradient {
        result = imaging::gradient_background(
            &result,
            settings.gradient_from,
            settings.gradient_to,
            settings.gradient_direction,
        )?;
    }
    Ok(result)
}

/// Geometric transforms in their fixed order.
pub fn apply_transforms(
    current: &RgbaImage,
    settings: &TransformSettings,
) -> Result<RgbaImage, ImagingError> {
    imaging::ensure_valid(current)?;
    let mut result = current.clone();
    if settings.crop_square {
        result = imaging::crop_to_square(&result)?;
    }
    if settings.rotate != 0.0 {
        result = imaging::rotate(&result, settings.rotate)?;
    }
    if settings.flip_horizontal {
        result = imaging::flip_horizontal(&result)?;
    }
    if settings.flip_vertical {
        result = imaging::flip_vertical(&result)?;
    }
    if settings.circular_mask {
        result = imaging::circular_mask(&result)?;
    }
    Ok(result)
}

/// Compose the edited image from scratch.
///
/// A named preset replaces the adjust/effects/background pipeline entirely;
/// the manual settings are ignored in that case. Transforms always apply.
pub fn compose(source: &RgbaImage, settings: &EditSettings) -> Result<RgbaImage, ImagingError> {
    let styled = match settings.preset.as_deref() {
        Some(name) => preset::apply_preset(source, name)?,
        None => {
            let adjusted = adjust(source, &settings.adjust)?;
            let effected = apply_effects(&adjusted, &settings.effects)?;
            apply_background(&effected, &settings.background)?
        }
    };
    apply_transforms(&styled, &settings.transform)
}
