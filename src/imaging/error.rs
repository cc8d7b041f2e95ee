use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("Invalid image: {width}x{height} has no pixels")]
    InvalidImage { width: u32, height: u32 },
    #[error("No source image loaded")]
    NoSourceImage,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Reject images that have no pixels.
pub fn ensure_valid(image: &image::RgbaImage) -> Result<(), ImagingError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ImagingError::InvalidImage { width, height });
    }
    Ok(())
}
