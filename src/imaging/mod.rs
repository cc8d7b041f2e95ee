//! Image processing on 8-bit RGBA buffers.
//!
//! | Concern | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` with format sniffing, normalized to RGBA |
//! | **Blur** | `image::imageops::blur` |
//! | **Masks, outlines** | `imageproc::drawing` |
//! | **Free rotation** | `imageproc::geometric_transformations::warp_into` |
//! | **Compositing** | `image::imageops::overlay` (source-over) |
//! | **Noise** | `rand` |
//!
//! The module is split into:
//! - **Calculations**: pure geometry and color math (unit testable)
//! - **Parameters**: value types describing an operation
//! - **Operations**: the image-to-image primitives
//! - **Load**: reading a source file from disk

mod calculations;
mod error;
mod load;
pub mod operations;
mod params;

pub use error::{ImagingError, ensure_valid};
pub use load::{load_image, supported_input_extensions};
pub use operations::{
    add_border, add_noise, add_noise_with_rng, add_padding, brightness, circular_mask, contrast,
    crop_to_square, drop_shadow, flip_horizontal, flip_vertical, gaussian_blur, glass_effect,
    gradient_background, rotate, rounded_corners, saturation, sharpness, solid_background,
};
pub use params::{Color, GradientDirection, Percent, ShadowParams};
