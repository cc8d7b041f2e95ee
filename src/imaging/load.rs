//! Source image loading.
//!
//! Decoding is delegated to the `image` crate. Whatever the file's pixel
//! format, the result is normalized to 8-bit RGBA immediately so every
//! downstream operation sees the same representation.

use super::error::{ImagingError, ensure_valid};
use image::{ImageError, ImageFormat, ImageReader, RgbaImage};
use std::path::Path;
use std::sync::LazyLock;

/// Input formats offered to the user, filtered to decoders compiled in.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("bmp", ImageFormat::Bmp),
    ("gif", ImageFormat::Gif),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Load and decode an image from disk as RGBA.
///
/// The format is sniffed from the file contents, so a mislabeled extension
/// still decodes.
pub fn load_image(path: &Path) -> Result<RgbaImage, ImagingError> {
    let decode_err = |reason: String| ImagingError::Decode {
        path: path.display().to_string(),
        reason,
    };
    let image = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| match e {
            ImageError::Unsupported(_) => decode_err(format!(
                "{e} (supported: {})",
                supported_input_extensions().join(", ")
            )),
            other => decode_err(other.to_string()),
        })?
        .into_rgba8();
    ensure_valid(&image)?;
    log::debug!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::solid;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn supported_extensions_include_common_formats() {
        let exts = supported_input_extensions();
        for ext in ["png", "jpg", "bmp", "gif", "webp"] {
            assert!(exts.contains(&ext), "missing {ext}");
        }
    }

    #[test]
    fn load_png_keeps_alpha() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("half.png");
        solid(4, 3, [10, 20, 30, 128]).save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (4, 3));
        assert_eq!(loaded.get_pixel(1, 1).0, [10, 20, 30, 128]);
    }

    #[test]
    fn load_rgb_normalizes_to_opaque_rgba() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rgb.bmp");
        RgbImage::from_pixel(5, 5, Rgb([200, 0, 0])).save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.get_pixel(0, 0).0, [200, 0, 0, 255]);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = load_image(Path::new("/nonexistent/icon.png"));
        assert!(matches!(result, Err(ImagingError::Io(_))));
    }

    #[test]
    fn load_garbage_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let result = load_image(&path);
        assert!(matches!(result, Err(ImagingError::Decode { .. })));
    }

    #[test]
    fn load_unknown_format_lists_supported_extensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, b"plain text, no image here").unwrap();

        match load_image(&path) {
            Err(ImagingError::Decode { reason, .. }) => {
                assert!(reason.contains("supported: png, jpg"), "{reason}");
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
