//! Multi-resolution icon export.
//!
//! Each target renders the edited image at a fixed list of square sizes with
//! Lanczos3 resampling and writes one container or directory:
//!
//! ```text
//! icons_20260101_120000/
//! ├── app_icon.ico            # Windows: 16 24 32 48 64 128 256
//! ├── AppIcon.icns            # macOS with iconutil: 16 … 1024 (+@2x up to 512)
//! ├── macos_icons/            # macOS fallback, 1x only
//! │   └── icon_16x16.png …
//! ├── png_icons/              # 16 32 48 64 128 256 512 1024
//! │   └── icon_16x16.png …
//! └── favicon.ico             # 16 32 48
//! ```
//!
//! Non-square sources are stretched to N×N. Resampling runs on
//! premultiplied alpha, so fully transparent padding never tints the icon's
//! edges. Sizes within a target are rendered in parallel on the rayon pool.
//!
//! ## macOS strategy
//!
//! `.icns` packing is delegated to an [`IconsetConverter`]. The production
//! [`Iconutil`] converter is only available on macOS with `iconutil` on the
//! `PATH`; otherwise the exporter falls back to a plain PNG directory and
//! reports [`MacosStrategy::PngFallback`].

use crate::imaging::ImagingError;
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageFormat, Rgba, Rgba32FImage, RgbaImage};
use rayon::prelude::*;
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

pub const WINDOWS_SIZES: &[u32] = &[16, 24, 32, 48, 64, 128, 256];
pub const MACOS_SIZES: &[u32] = &[16, 32, 64, 128, 256, 512, 1024];
pub const PNG_SET_SIZES: &[u32] = &[16, 32, 48, 64, 128, 256, 512, 1024];
pub const FAVICON_SIZES: &[u32] = &[16, 32, 48];

/// Largest macOS base size that also gets an `@2x` variant.
const MACOS_RETINA_MAX: u32 = 512;

pub const WINDOWS_ICON: &str = "app_icon.ico";
pub const FAVICON: &str = "favicon.ico";
pub const MACOS_ICNS: &str = "AppIcon.icns";
pub const MACOS_ICONSET: &str = "AppIcon.iconset";
pub const MACOS_FALLBACK_DIR: &str = "macos_icons";
pub const PNG_SET_DIR: &str = "png_icons";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No export targets selected")]
    NoTargets,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Image error: {0}")]
    Imaging(#[from] ImagingError),
    #[error("Icon converter failed: {0}")]
    Converter(String),
    #[error("{stage} export aborted: {message}")]
    Aborted { stage: ExportStage, message: String },
    #[error("Export worker panicked")]
    WorkerPanicked,
}

/// One export target, in the order the orchestrator runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Windows,
    Macos,
    PngSet,
    Favicon,
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportStage::Windows => "Windows",
            ExportStage::Macos => "macOS",
            ExportStage::PngSet => "PNG set",
            ExportStage::Favicon => "favicon",
        })
    }
}

/// How the macOS icons were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacosStrategy {
    /// `AppIcon.icns` packed by the converter.
    NativeIcns,
    /// `macos_icons/icon_NxN.png`, no container.
    PngFallback,
}

impl fmt::Display for MacosStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MacosStrategy::NativeIcns => "icns",
            MacosStrategy::PngFallback => "png fallback",
        })
    }
}

/// Files written by the macOS stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacosOutput {
    pub strategy: MacosStrategy,
    pub files: Vec<PathBuf>,
}

// ============================================================================
// Iconset conversion
// ============================================================================

/// Packs an `.iconset` directory into an `.icns` file.
pub trait IconsetConverter: Send + Sync {
    /// Whether this converter can run on the current machine.
    fn is_available(&self) -> bool;

    /// Convert `iconset` into the `.icns` file at `output`.
    fn convert(&self, iconset: &Path, output: &Path) -> Result<(), ExportError>;
}

/// Apple's `iconutil` command-line tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Iconutil;

impl IconsetConverter for Iconutil {
    fn is_available(&self) -> bool {
        cfg!(target_os = "macos") && which::which("iconutil").is_ok()
    }

    fn convert(&self, iconset: &Path, output: &Path) -> Result<(), ExportError> {
        log::debug!(
            "iconutil -c icns -o {} {}",
            output.display(),
            iconset.display()
        );
        let result = Command::new("iconutil")
            .arg("-c")
            .arg("icns")
            .arg("-o")
            .arg(output)
            .arg(iconset)
            .output()?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ExportError::Converter(format!(
                "iconutil exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Resample to an exact `size × size` square.
///
/// The filter runs on premultiplied `f32` pixels and the result is divided
/// back out, so a transparent pixel contributes no color to its neighbours.
pub fn resample(image: &RgbaImage, size: u32) -> RgbaImage {
    let premultiplied = Rgba32FImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let channel = |c: u8| c as f32 / 255.0 * alpha;
        Rgba([channel(r), channel(g), channel(b), alpha])
    });
    let resized = imageops::resize(&premultiplied, size, size, FilterType::Lanczos3);
    RgbaImage::from_fn(size, size, |x, y| {
        let [r, g, b, a] = resized.get_pixel(x, y).0;
        if a <= 0.0 {
            return Rgba([0, 0, 0, 0]);
        }
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([to_u8(r / a), to_u8(g / a), to_u8(b / a), to_u8(a)])
    })
}

/// `icon_<N>x<N>.png`, or `icon_<N>x<N>@2x.png` for a retina variant.
pub fn icon_file_name(size: u32, retina: bool) -> String {
    if retina {
        format!("icon_{size}x{size}@2x.png")
    } else {
        format!("icon_{size}x{size}.png")
    }
}

/// Render and save a batch of `(file name, pixel size)` PNGs into `dir`.
fn write_pngs(
    image: &RgbaImage,
    dir: &Path,
    entries: &[(String, u32)],
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;
    entries
        .par_iter()
        .map(|(name, px)| {
            let path = dir.join(name);
            resample(image, *px).save_with_format(&path, ImageFormat::Png)?;
            Ok(path)
        })
        .collect()
}

fn one_x_entries(sizes: &[u32]) -> Vec<(String, u32)> {
    sizes.iter().map(|&s| (icon_file_name(s, false), s)).collect()
}

/// Pack every size into a single `.ico` with PNG-compressed frames.
pub fn write_ico(image: &RgbaImage, sizes: &[u32], path: &Path) -> Result<(), ExportError> {
    let rendered: Vec<(u32, RgbaImage)> =
        sizes.par_iter().map(|&s| (s, resample(image, s))).collect();
    let frames = rendered
        .iter()
        .map(|(s, img)| IcoFrame::as_png(img.as_raw(), *s, *s, ExtendedColorType::Rgba8))
        .collect::<Result<Vec<_>, _>>()?;
    let writer = BufWriter::new(File::create(path)?);
    IcoEncoder::new(writer).encode_images(&frames)?;
    Ok(())
}

// ============================================================================
// Targets
// ============================================================================

/// `app_icon.ico` with the Windows size ladder.
pub fn export_windows(image: &RgbaImage, out_dir: &Path) -> Result<PathBuf, ExportError> {
    let path = out_dir.join(WINDOWS_ICON);
    write_ico(image, WINDOWS_SIZES, &path)?;
    Ok(path)
}

/// macOS icons: native `.icns` when the converter is available, a PNG
/// directory otherwise.
pub fn export_macos(
    image: &RgbaImage,
    out_dir: &Path,
    converter: &dyn IconsetConverter,
) -> Result<MacosOutput, ExportError> {
    if converter.is_available() {
        log::info!("packing macOS icons with iconset converter");
        let iconset = out_dir.join(MACOS_ICONSET);
        let mut entries = Vec::new();
        for &size in MACOS_SIZES {
            entries.push((icon_file_name(size, false), size));
            if size <= MACOS_RETINA_MAX {
                entries.push((icon_file_name(size, true), size * 2));
            }
        }
        write_pngs(image, &iconset, &entries)?;

        let icns = out_dir.join(MACOS_ICNS);
        converter.convert(&iconset, &icns)?;
        fs::remove_dir_all(&iconset)?;
        Ok(MacosOutput {
            strategy: MacosStrategy::NativeIcns,
            files: vec![icns],
        })
    } else {
        log::info!("iconset converter unavailable, writing macOS icons as PNG files");
        let dir = out_dir.join(MACOS_FALLBACK_DIR);
        let files = write_pngs(image, &dir, &one_x_entries(MACOS_SIZES))?;
        Ok(MacosOutput {
            strategy: MacosStrategy::PngFallback,
            files,
        })
    }
}

/// `png_icons/icon_<N>x<N>.png` for every size in the PNG set.
pub fn export_png_set(image: &RgbaImage, out_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    write_pngs(image, &out_dir.join(PNG_SET_DIR), &one_x_entries(PNG_SET_SIZES))
}

/// `favicon.ico` with 16, 32 and 48 px frames.
pub fn export_favicon(image: &RgbaImage, out_dir: &Path) -> Result<PathBuf, ExportError> {
    let path = out_dir.join(FAVICON);
    write_ico(image, FAVICON_SIZES, &path)?;
    Ok(path)
}


#[cfg(test)]
mod tests {
    use super::mock::MockConverter;
    use super::*;
    use crate::imaging::{self, Color};
    use crate::test_helpers::{disc, file_names, solid};
    use image::ImageReader;
    use tempfile::TempDir;

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn decode(path: &Path) -> RgbaImage {
        ImageReader::open(path)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap()
            .into_rgba8()
    }

    #[test]
    fn icon_file_names() {
        assert_eq!(icon_file_name(16, false), "icon_16x16.png");
        assert_eq!(icon_file_name(512, true), "icon_512x512@2x.png");
    }

    #[test]
    fn resample_stretches_to_square() {
        let out = resample(&solid(300, 100, RED), 64);
        assert_eq!(out.dimensions(), (64, 64));
        assert_eq!(out.get_pixel(32, 32).0, RED);
    }

    #[test]
    fn resample_keeps_transparency() {
        let out = resample(&disc(128), 32);
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(16, 16)[3], 255);
    }

    #[test]
    fn resample_padded_icon_keeps_edge_color() {
        let padded =
            imaging::add_padding(&solid(100, 100, RED), 15, Color::TRANSPARENT_WHITE).unwrap();
        let out = resample(&padded, 16);

        let edges: Vec<_> = out.pixels().filter(|p| p[3] > 0 && p[3] < 255).collect();
        assert!(!edges.is_empty(), "expected a soft edge at 16px");
        for p in edges {
            assert_eq!(&p.0[..3], &[255, 0, 0], "edge tinted by padding: {p:?}");
        }
    }

    #[test]
    fn resample_keeps_straight_color_under_partial_alpha() {
        let out = resample(&solid(40, 40, [200, 100, 50, 128]), 8);
        assert_eq!(out.get_pixel(4, 4).0, [200, 100, 50, 128]);
    }

    #[test]
    fn png_set_writes_every_size() {
        let tmp = TempDir::new().unwrap();
        let files = export_png_set(&solid(512, 512, RED), tmp.path()).unwrap();
        assert_eq!(files.len(), 8);

        for (&size, path) in PNG_SET_SIZES.iter().zip(&files) {
            assert_eq!(path, &tmp.path().join(PNG_SET_DIR).join(icon_file_name(size, false)));
            let img = decode(path);
            assert_eq!(img.dimensions(), (size, size));
            assert!(img.pixels().all(|p| p.0 == RED), "{size}px not solid red");
        }
    }

    #[test]
    fn windows_ico_decodes_to_largest_frame() {
        let tmp = TempDir::new().unwrap();
        let path = export_windows(&solid(300, 300, RED), tmp.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), WINDOWS_ICON);

        let img = decode(&path);
        assert_eq!(img.dimensions(), (256, 256));
        assert_eq!(img.get_pixel(128, 128).0, RED);
    }

    #[test]
    fn favicon_ico_decodes() {
        let tmp = TempDir::new().unwrap();
        let path = export_favicon(&solid(64, 64, RED), tmp.path()).unwrap();
        assert_eq!(decode(&path).dimensions(), (48, 48));
    }

    #[test]
    fn ico_into_missing_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = export_favicon(&solid(8, 8, RED), &tmp.path().join("gone"));
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn macos_fallback_writes_one_x_pngs() {
        let tmp = TempDir::new().unwrap();
        let converter = MockConverter::unavailable();
        let out = export_macos(&solid(64, 64, RED), tmp.path(), &converter).unwrap();

        assert_eq!(out.strategy, MacosStrategy::PngFallback);
        assert_eq!(out.files.len(), MACOS_SIZES.len());
        let names = file_names(&tmp.path().join(MACOS_FALLBACK_DIR));
        assert!(names.contains(&"icon_1024x1024.png".to_string()));
        assert!(!names.iter().any(|n| n.contains("@2x")));
        assert!(converter.get_calls().is_empty());
        assert!(!tmp.path().join(MACOS_ICONSET).exists());
    }

    #[test]
    fn macos_native_builds_iconset_then_cleans_up() {
        let tmp = TempDir::new().unwrap();
        let converter = MockConverter::available();
        let out = export_macos(&solid(64, 64, RED), tmp.path(), &converter).unwrap();

        assert_eq!(out.strategy, MacosStrategy::NativeIcns);
        assert_eq!(out.files, vec![tmp.path().join(MACOS_ICNS)]);
        assert!(tmp.path().join(MACOS_ICNS).exists());
        assert!(!tmp.path().join(MACOS_ICONSET).exists());
        assert!(!tmp.path().join(MACOS_FALLBACK_DIR).exists());

        let calls = converter.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].iconset, tmp.path().join(MACOS_ICONSET));
        // 7 base sizes + 6 retina variants (1024 has none)
        assert_eq!(calls[0].iconset_files.len(), 13);
        assert!(calls[0].iconset_files.contains(&"icon_512x512@2x.png".to_string()));
        assert!(!calls[0].iconset_files.contains(&"icon_1024x1024@2x.png".to_string()));
    }

    #[test]
    fn macos_converter_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let converter = MockConverter::failing("bad iconset");
        let result = export_macos(&solid(32, 32, RED), tmp.path(), &converter);
        assert!(matches!(result, Err(ExportError::Converter(m)) if m == "bad iconset"));
    }

    #[test]
    fn iconutil_unavailable_off_macos() {
        if !cfg!(target_os = "macos") {
            assert!(!Iconutil.is_available());
        }
    }

    #[test]
    fn stage_names() {
        assert_eq!(ExportStage::Macos.to_string(), "macOS");
        assert_eq!(ExportStage::PngSet.to_string(), "PNG set");
        let err = ExportError::Aborted {
            stage: ExportStage::Windows,
            message: "disk full".into(),
        };
        assert_eq!(err.to_string(), "Windows export aborted: disk full");
    }
}
