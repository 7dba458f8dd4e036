//! pixbrick-pipeline: Pure image-to-grid transform (sans-IO).
//!
//! Converts an uploaded image into an N×N grid of brick cells through:
//! payload decode -> image decode -> nearest-neighbor sampling ->
//! alpha classification.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! strings and byte slices and returns structured data. Request parsing,
//! response serialization and file handling live in `pixbrick-export`
//! and the `pixbrick` binary.

pub mod cell;
pub mod decode;
pub mod payload;
pub mod pipeline;
pub mod sample;
pub mod types;

#[cfg(test)]
mod test_support;

pub use cell::{ALPHA_THRESHOLD, Cell, OpaqueCell};
pub use pipeline::Pipeline;
pub use types::{Dimensions, ErrorKind, Grid, GridSize, PipelineError, RgbaImage};

/// Run the full transform on a data-URI payload.
///
/// Takes `<prefix>,<base64 image>` text and a caller-supplied grid size,
/// then produces a `grid_size × grid_size` [`Grid`].
///
/// # Pipeline steps
///
/// 1. Decode the base64 text after the first `,`
/// 2. Decode the image and normalize it to RGBA
/// 3. Nearest-neighbor resample to `grid_size × grid_size`
/// 4. Classify each pixel as empty (alpha < 128) or opaque
///
/// Steps run in this order, so the error reports the first step that
/// failed. The failing step is logged at `warn` under its stage name.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedPayload`] if the payload has no
/// separator or is not valid base64.
/// Returns [`PipelineError::UnsupportedOrCorruptImage`] if the bytes are
/// not a supported image.
/// Returns [`PipelineError::InvalidGridSize`] if `grid_size` is not
/// positive or its surface could not be allocated.
pub fn pixelize(payload: &str, grid_size: i64) -> Result<Grid, PipelineError> {
    Pipeline::new(payload, grid_size)
        .decode_payload()
        .and_then(pipeline::PayloadDecoded::decode)
        .and_then(pipeline::Decoded::sample)
        .map(|sampled| finish(sampled.classify()))
}

/// Run the transform on raw image bytes, skipping payload decoding.
///
/// # Errors
///
/// Same as [`pixelize`], minus [`PipelineError::MalformedPayload`].
pub fn pixelize_bytes(image_bytes: Vec<u8>, grid_size: i64) -> Result<Grid, PipelineError> {
    Pipeline::from_bytes(image_bytes, grid_size)
        .decode()
        .and_then(pipeline::Decoded::sample)
        .map(|sampled| finish(sampled.classify()))
}

fn finish(classified: pipeline::Classified) -> Grid {
    let grid = classified.grid();
    log::debug!(
        "pixelized {} source into {n}x{n} grid ({} opaque cells)",
        classified.source_dimensions(),
        grid.opaque_count(),
        n = grid.size(),
    );
    classified.into_grid()
}
