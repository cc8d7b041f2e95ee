//! Interactive editing session.
//!
//! A [`Session`] holds the pristine `source` and the current `edited` image,
//! the way a GUI host would between slider moves. Unlike the pure
//! [`compose`](crate::compose::compose), its operations are incremental:
//!
//! | Operation | Starts from |
//! |---|---|
//! | [`apply_adjustments`](Session::apply_adjustments) | `source` (earlier edits are discarded) |
//! | [`apply_preset`](Session::apply_preset) | `source` |
//! | [`apply_effects`](Session::apply_effects) | `edited` (cumulative) |
//! | [`apply_background`](Session::apply_background) | `edited` (cumulative) |
//! | rotate / flip / crop / circular mask | `edited` |
//!
//! Applying effects twice therefore stacks them (two shadows, two borders).
//! That is the expected behavior of the interactive editor; use
//! [`reset`](Session::reset) to start over.
//!
//! Every operation fails with [`ImagingError::NoSourceImage`] before an
//! image is loaded, and leaves `edited` untouched on error.

use crate::compose;
use crate::config::{AdjustSettings, BackgroundSettings, EffectSettings};
use crate::imaging::{self, ImagingError};
use crate::preset;
use image::RgbaImage;
use std::path::Path;

#[derive(Debug, Default)]
pub struct Session {
    source: Option<RgbaImage>,
    edited: Option<RgbaImage>,
    preset: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a source image from disk. On failure the previous state is kept.
    pub fn load(&mut self, path: &Path) -> Result<(), ImagingError> {
        let image = imaging::load_image(path)?;
        self.set_source(image)
    }

    /// Replace the source with an in-memory image and reset all edits.
    pub fn set_source(&mut self, image: RgbaImage) -> Result<(), ImagingError> {
        imaging::ensure_valid(&image)?;
        self.edited = Some(image.clone());
        self.source = Some(image);
        self.preset = None;
        Ok(())
    }

    pub fn source(&self) -> Option<&RgbaImage> {
        self.source.as_ref()
    }

    pub fn edited(&self) -> Option<&RgbaImage> {
        self.edited.as_ref()
    }

    /// Name of the last preset applied since the last reset.
    pub fn current_preset(&self) -> Option<&str> {
        self.preset.as_deref()
    }

    fn source_or_err(&self) -> Result<&RgbaImage, ImagingError> {
        self.source.as_ref().ok_or(ImagingError::NoSourceImage)
    }

    fn edited_or_err(&self) -> Result<&RgbaImage, ImagingError> {
        self.edited.as_ref().ok_or(ImagingError::NoSourceImage)
    }

    fn update_edited<F>(&mut self, op: F) -> Result<(), ImagingError>
    where
        F: FnOnce(&RgbaImage) -> Result<RgbaImage, ImagingError>,
    {
        let next = op(self.edited_or_err()?)?;
        self.edited = Some(next);
        Ok(())
    }

    /// Re-run the adjustments against the pristine source.
    pub fn apply_adjustments(&mut self, settings: &AdjustSettings) -> Result<(), ImagingError> {
        let next = compose::adjust(self.source_or_err()?, settings)?;
        self.edited = Some(next);
        Ok(())
    }

    /// Apply effects on top of the current edit.
    pub fn apply_effects(&mut self, settings: &EffectSettings) -> Result<(), ImagingError> {
        self.update_edited(|img| compose::apply_effects(img, settings))
    }

    /// Apply padding, fill and gradient on top of the current edit.
    pub fn apply_background(&mut self, settings: &BackgroundSettings) -> Result<(), ImagingError> {
        self.update_edited(|img| compose::apply_background(img, settings))
    }

    /// Restyle the pristine source with a named preset.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), ImagingError> {
        let next = preset::apply_preset(self.source_or_err()?, name)?;
        self.edited = Some(next);
        self.preset = Some(name.to_string());
        Ok(())
    }

    pub fn rotate(&mut self, degrees: f32) -> Result<(), ImagingError> {
        self.update_edited(|img| imaging::rotate(img, degrees))
    }

    pub fn flip_horizontal(&mut self) -> Result<(), ImagingError> {
        self.update_edited(imaging::flip_horizontal)
    }

    pub fn flip_vertical(&mut self) -> Result<(), ImagingError> {
        self.update_edited(imaging::flip_vertical)
    }

    pub fn crop_to_square(&mut self) -> Result<(), ImagingError> {
        self.update_edited(imaging::crop_to_square)
    }

    pub fn circular_mask(&mut self) -> Result<(), ImagingError> {
        self.update_edited(imaging::circular_mask)
    }

    /// Discard every edit: `edited` becomes a copy of `source` again.
    pub fn reset(&mut self) -> Result<(), ImagingError> {
        let source = self.source_or_err()?.clone();
        self.edited = Some(source);
        self.preset = None;
        Ok(())
    }

    /// Owned copy of the edited image, ready to hand to an export worker.
    pub fn snapshot(&self) -> Result<RgbaImage, ImagingError> {
        self.edited_or_err().cloned()
    }
}
