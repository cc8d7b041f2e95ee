//! Named presets: curated bundles of adjustments and effects.
//!
//! A preset always runs against the pristine source. Its steps run in a
//! fixed order, each skipped when its field is zero or off:
//!
//! ```text
//! brightness → contrast → saturation → sharpness
//!   → rounded corners → padding → border → glass → noise → drop shadow
//! ```
//!
//! The shadow runs last so it follows the final silhouette, padding included.

use crate::imaging::{self, Color, ImagingError, Percent, ShadowParams};
use image::RgbaImage;

/// Corner radius used when a preset enables rounding without a radius.
pub const DEFAULT_CORNER_RADIUS: u32 = 20;
/// Border stroke used when a preset enables a border without a width.
pub const DEFAULT_BORDER_WIDTH: u32 = 3;
/// Shadow blur used when a preset enables a shadow without a blur radius.
pub const DEFAULT_SHADOW_BLUR: f32 = 10.0;

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub sharpness: i32,
    pub rounded_corners: bool,
    pub corner_radius: Option<u32>,
    pub padding: u32,
    pub border: bool,
    pub border_width: Option<u32>,
    pub glass: bool,
    pub noise: u32,
    pub shadow: bool,
    pub shadow_blur: Option<f32>,
}

impl Preset {
    const BLANK: Preset = Preset {
        name: "",
        description: "",
        brightness: 0,
        contrast: 0,
        saturation: 0,
        sharpness: 0,
        rounded_corners: false,
        corner_radius: None,
        padding: 0,
        border: false,
        border_width: None,
        glass: false,
        noise: 0,
        shadow: false,
        shadow_blur: None,
    };

    /// Kebab-case form of the name: `"Glossy 3D"` → `"glossy-3d"`.
    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "-")
    }

    fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.name.eq_ignore_ascii_case(query) || self.slug().eq_ignore_ascii_case(query)
    }

    /// Run this preset's steps on a copy of `image`.
    pub fn apply(&self, image: &RgbaImage) -> Result<RgbaImage, ImagingError> {
        imaging::ensure_valid(image)?;
        let mut result = image.clone();

        if self.brightness != 0 {
            result = imaging::brightness(&result, Percent::new(self.brightness))?;
        }
        if self.contrast != 0 {
            result = imaging::contrast(&result, Percent::new(self.contrast))?;
        }
        if self.saturation != 0 {
            result = imaging::saturation(&result, Percent::new(self.saturation))?;
        }
        if self.sharpness != 0 {
            result = imaging::sharpness(&result, Percent::new(self.sharpness))?;
        }
        if self.rounded_corners {
            let radius = self.corner_radius.unwrap_or(DEFAULT_CORNER_RADIUS);
            result = imaging::rounded_corners(&result, radius)?;
        }
        if self.padding > 0 {
            result = imaging::add_padding(&result, self.padding, Color::TRANSPARENT_WHITE)?;
        }
        if self.border {
            let width = self.border_width.unwrap_or(DEFAULT_BORDER_WIDTH);
            result = imaging::add_border(&result, width, Color::BLACK)?;
        }
        if self.glass {
            result = imaging::glass_effect(&result)?;
        }
        if self.noise > 0 {
            result = imaging::add_noise(&result, self.noise)?;
        }
        if self.shadow {
            let blur = self.shadow_blur.unwrap_or(DEFAULT_SHADOW_BLUR);
            result = imaging::drop_shadow(&result, &ShadowParams::with_blur(blur))?;
        }
        Ok(result)
    }
}

/// The fixed preset catalog, in display order.
pub static PRESETS: [Preset; 8] = [
    Preset {
        name: "Modern Flat",
        description: "Punchier color, rounded corners and a soft drop shadow",
        brightness: 10,
        contrast: 15,
        saturation: 20,
        rounded_corners: true,
        corner_radius: Some(25),
        padding: 15,
        shadow: true,
        ..Preset::BLANK
    },
    Preset {
        name: "Glossy 3D",
        description: "Glass highlight over a lifted shadow",
        brightness: 5,
        contrast: 20,
        saturation: 10,
        glass: true,
        shadow: true,
        shadow_blur: Some(15.0),
        ..Preset::BLANK
    },
    Preset {
        name: "Minimal",
        description: "Muted color framed by padding and a thin border",
        saturation: -20,
        padding: 25,
        border: true,
        border_width: Some(2),
        ..Preset::BLANK
    },
    Preset {
        name: "Vivid",
        description: "Strong saturation and contrast, lightly sharpened",
        brightness: 15,
        contrast: 30,
        saturation: 50,
        sharpness: 15,
        ..Preset::BLANK
    },
    Preset {
        name: "Dark",
        description: "Darker, desaturated look with a drop shadow",
        brightness: -20,
        contrast: 25,
        saturation: -10,
        shadow: true,
        ..Preset::BLANK
    },
    Preset {
        name: "Pastel",
        description: "Light, washed-out color with rounded corners",
        brightness: 20,
        contrast: -10,
        saturation: -30,
        rounded_corners: true,
        ..Preset::BLANK
    },
    Preset {
        name: "Neon",
        description: "Very bright, saturated color with a wide glow-like shadow",
        brightness: 25,
        contrast: 40,
        saturation: 60,
        shadow: true,
        shadow_blur: Some(20.0),
        ..Preset::BLANK
    },
    Preset {
        name: "Retro",
        description: "Faded color with a light film grain",
        brightness: -10,
        contrast: 15,
        saturation: -15,
        noise: 10,
        ..Preset::BLANK
    },
];

/// Look up a preset by display name or slug, ignoring case.
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.matches(name))
}

/// Apply the named preset to `image`.
///
/// An unknown name is not an error: it logs a warning and returns an
/// unchanged copy.
pub fn apply_preset(image: &RgbaImage, name: &str) -> Result<RgbaImage, ImagingError> {
    match find_preset(name) {
        Some(preset) => {
            log::debug!("applying preset '{}'", preset.name);
            preset.apply(image)
        }
        None => {
            imaging::ensure_valid(image)?;
            log::warn!("unsupported preset '{name}', image left unchanged");
            Ok(image.clone())
        }
    }
}
