//! Edit settings: the full parameter state behind a composed icon.
//!
//! Settings come from an optional TOML file. Every section and key is
//! optional; anything left out keeps its default from
//! [`DEFAULT_EDIT_SETTINGS`]. Unknown keys are rejected to catch typos early.
//!
//! ## Settings File
//!
//! ```toml
//! # preset = "Modern Flat"   # when set, replaces [adjust], [effects], [background]
//!
//! [adjust]
//! brightness = 0            # -100..=100
//! contrast = 0
//! saturation = 0
//! sharpness = 0
//!
//! [effects]
//! blur = 0                  # 0..=30, Gaussian sigma is blur / 2
//! rounded_corners = false
//! corner_radius = 30        # 0..=100
//! shadow = false
//! shadow_blur = 15          # 0..=30
//! border = false
//! border_width = 5          # 1..=20
//! glass = false
//!
//! [background]
//! padding = 0               # 0..=100
//! fill = false
//! fill_color = "#ffffff"
//! gradient = false
//! gradient_from = "#4285f4"
//! gradient_to = "#db4437"
//! gradient_direction = "vertical"
//!
//! [transform]
//! crop_square = false
//! rotate = 0.0              # degrees, counter-clockwise
//! flip_horizontal = false
//! flip_vertical = false
//! circular_mask = false
//!
//! [export]
//! windows = true
//! macos = true
//! png_set = true
//! favicon = false
//!
//! [processing]
//! max_threads = 4           # omit for auto = CPU cores
//! ```

use crate::imaging::{Color, GradientDirection};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// The one default parameter state, shared by the composition engine, the
/// session and the CLI.
pub const DEFAULT_EDIT_SETTINGS: EditSettings = EditSettings {
    preset: None,
    adjust: AdjustSettings {
        brightness: 0,
        contrast: 0,
        saturation: 0,
        sharpness: 0,
    },
    effects: EffectSettings {
        blur: 0,
        rounded_corners: false,
        corner_radius: 30,
        shadow: false,
        shadow_blur: 15,
        border: false,
        border_width: 5,
        glass: false,
    },
    background: BackgroundSettings {
        padding: 0,
        fill: false,
        fill_color: Color::WHITE,
        gradient: false,
        gradient_from: Color::rgb(66, 133, 244),
        gradient_to: Color::rgb(219, 68, 55),
        gradient_direction: GradientDirection::Vertical,
    },
    transform: TransformSettings {
        crop_square: false,
        rotate: 0.0,
        flip_horizontal: false,
        flip_vertical: false,
        circular_mask: false,
    },
    export: ExportTargets {
        windows: true,
        macos: true,
        png_set: true,
        favicon: false,
    },
    processing: ProcessingConfig { max_threads: None },
};

/// Complete parameter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditSettings {
    /// Named preset. When set it replaces the adjust/effects/background
    /// pipeline; transforms still apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    pub adjust: AdjustSettings,
    pub effects: EffectSettings,
    pub background: BackgroundSettings,
    pub transform: TransformSettings,
    pub export: ExportTargets,
    pub processing: ProcessingConfig,
}

impl Default for EditSettings {
    fn default() -> Self {
        DEFAULT_EDIT_SETTINGS
    }
}

/// Signed percentage adjustments, each in `[-100, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdjustSettings {
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub sharpness: i32,
}

impl Default for AdjustSettings {
    fn default() -> Self {
        DEFAULT_EDIT_SETTINGS.adjust
    }
}

impl AdjustSettings {
    pub fn is_identity(&self) -> bool {
        self.brightness == 0 && self.contrast == 0 && self.saturation == 0 && self.sharpness == 0
    }
}

/// Effect toggles and their sub-parameters.
///
/// Sub-parameters keep their value while the toggle is off, so turning an
/// effect back on restores the last radius or width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectSettings {
    pub blur: u32,
    pub rounded_corners: bool,
    pub corner_radius: u32,
    pub shadow: bool,
    pub shadow_blur: u32,
    pub border: bool,
    pub border_width: u32,
    pub glass: bool,
}

impl Default for EffectSettings {
    fn default() -> Self {
        DEFAULT_EDIT_SETTINGS.effects
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundSettings {
    pub padding: u32,
    pub fill: bool,
    pub fill_color: Color,
    pub gradient: bool,
    pub gradient_from: Color,
    pub gradient_to: Color,
    pub gradient_direction: GradientDirection,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        DEFAULT_EDIT_SETTINGS.background
    }
}

/// Geometric transforms, applied after everything else in a fixed order:
/// crop, rotate, flip horizontal, flip vertical, circular mask.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformSettings {
    pub crop_square: bool,
    /// Degrees, counter-clockwise.
    pub rotate: f32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub circular_mask: bool,
}

impl Default for TransformSettings {
    fn default() -> Self {
        DEFAULT_EDIT_SETTINGS.transform
    }
}

/// Which icon sets an export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportTargets {
    pub windows: bool,
    pub macos: bool,
    pub png_set: bool,
    pub favicon: bool,
}

impl Default for ExportTargets {
    fn default() -> Self {
        DEFAULT_EDIT_SETTINGS.export
    }
}

impl ExportTargets {
    pub const NONE: ExportTargets = ExportTargets {
        windows: false,
        macos: false,
        png_set: false,
        favicon: false,
    };

    pub fn any(&self) -> bool {
        self.windows || self.macos || self.png_set || self.favicon
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of resize worker threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_threads
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

fn check_range<T>(name: &str, value: T, min: T, max: T) -> Result<(), ConfigError>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ConfigError::Validation(format!(
            "{name} must be {min}-{max}, got {value}"
        )));
    }
    Ok(())
}

impl EditSettings {
    /// Validate values are within the ranges the sliders allow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.adjust;
        check_range("adjust.brightness", a.brightness, -100, 100)?;
        check_range("adjust.contrast", a.contrast, -100, 100)?;
        check_range("adjust.saturation", a.saturation, -100, 100)?;
        check_range("adjust.sharpness", a.sharpness, -100, 100)?;

        let e = &self.effects;
        check_range("effects.blur", e.blur, 0, 30)?;
        check_range("effects.corner_radius", e.corner_radius, 0, 100)?;
        check_range("effects.shadow_blur", e.shadow_blur, 0, 30)?;
        check_range("effects.border_width", e.border_width, 1, 20)?;

        check_range("background.padding", self.background.padding, 0, 100)?;

        if !self.transform.rotate.is_finite() {
            return Err(ConfigError::Validation(
                "transform.rotate must be a finite number of degrees".into(),
            ));
        }
        if self.processing.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parse and validate settings from TOML text.
pub fn parse_settings(content: &str) -> Result<EditSettings, ConfigError> {
    let settings: EditSettings = toml::from_str(content)?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from a file, or the defaults when no path is given.
pub fn load_settings(path: Option<&Path>) -> Result<EditSettings, ConfigError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            let settings = parse_settings(&content)?;
            log::debug!("loaded settings from {}", path.display());
            Ok(settings)
        }
        None => Ok(DEFAULT_EDIT_SETTINGS),
    }
}

/// Returns a fully-commented stock settings file with every key.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# iconsmith settings
# ==================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Named preset. When set, it replaces [adjust], [effects] and [background];
# [transform] still applies. Run `iconsmith presets` for the list.
# preset = "Modern Flat"

# ---------------------------------------------------------------------------
# Adjustments (percent, -100 to 100; 0 = unchanged)
# ---------------------------------------------------------------------------
[adjust]
brightness = 0
contrast = 0
saturation = 0
sharpness = 0

# ---------------------------------------------------------------------------
# Effects, applied in order: blur, rounded corners, border, glass, shadow
# ---------------------------------------------------------------------------
[effects]
# Blur strength 0-30. The Gaussian sigma is half this value.
blur = 0

rounded_corners = false
corner_radius = 30        # 0-100 px, clamped to half the short side

shadow = false
shadow_blur = 15          # 0-30

border = false
border_width = 5          # 1-20 px

glass = false

# ---------------------------------------------------------------------------
# Background, applied in order: padding, fill, gradient
# ---------------------------------------------------------------------------
[background]
padding = 0               # 0-100 px of transparent margin
fill = false
fill_color = "#ffffff"
gradient = false
gradient_from = "#4285f4"
gradient_to = "#db4437"
gradient_direction = "vertical"   # or "horizontal"

# ---------------------------------------------------------------------------
# Geometry, applied last: crop, rotate, flip H, flip V, circular mask
# ---------------------------------------------------------------------------
[transform]
crop_square = false
rotate = 0.0              # degrees, counter-clockwise
flip_horizontal = false
flip_vertical = false
circular_mask = false

# ---------------------------------------------------------------------------
# Export targets
# ---------------------------------------------------------------------------
[export]
windows = true            # app_icon.ico
macos = true              # AppIcon.icns, or macos_icons/ without iconutil
png_set = true            # png_icons/
favicon = false           # favicon.ico

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel resize workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}
