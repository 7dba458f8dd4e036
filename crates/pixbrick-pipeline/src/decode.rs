//! Image decoding and RGBA normalization.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP, GIF) and produces a
//! four-channel RGBA surface regardless of the source color mode.
//!
//! This is the second step of the transform: raw bytes in, `RgbaImage` out.

use image::RgbaImage;

use crate::types::PipelineError;

/// Decode raw image bytes into an RGBA surface.
///
/// Grayscale, palette and RGB sources are expanded to RGBA; sources
/// without an alpha channel come out fully opaque (alpha 255).
///
/// # Errors
///
/// Returns [`PipelineError::UnsupportedOrCorruptImage`] if `bytes` is
/// empty, the format is unrecognized, or the data is corrupt.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::UnsupportedOrCorruptImage(
            "image data is empty".to_string(),
        ));
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}
