//! Shared test utilities: synthetic image builders and fixture writers.
//!
//! ```text
//! let img = solid(64, 64, [255, 0, 0, 255]);
//! let busy = pattern(10, 6);             // every pixel distinct, opaque
//! let path = write_png(tmp.path(), "src.png", &busy);
//! ```

use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

// =========================================================================
// Image builders
// =========================================================================

/// Uniform image filled with one RGBA value.
pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

/// Opaque image whose pixels are all distinct (for images up to 256×256),
/// so geometric tests can tell exactly where a pixel went.
pub fn pattern(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

/// Opaque disc on a transparent square, for alpha-sensitive tests.
pub fn disc(side: u32) -> RgbaImage {
    let r = side as f32 / 2.0;
    RgbaImage::from_fn(side, side, |x, y| {
        let dx = x as f32 + 0.5 - r;
        let dy = y as f32 + 0.5 - r;
        if dx * dx + dy * dy <= r * r {
            Rgba([30, 144, 255, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

// =========================================================================
// Fixture files
// =========================================================================

/// Save an image as PNG under `dir` and return the path.
pub fn write_png(dir: &Path, name: &str, image: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    image
        .save(&path)
        .unwrap_or_else(|e| panic!("failed to write fixture {}: {e}", path.display()));
    path
}

/// Sorted file names directly inside `dir`. Panics if it cannot be read.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("cannot list {}: {e}", dir.display()))
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
