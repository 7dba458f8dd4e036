//! Nearest-neighbor resampling to the output grid.
//!
//! Output pixel `(x, y)` of an N×N grid copies source pixel
//! `(floor(x * W / N), floor(y * H / N))`. The same rule applies when
//! shrinking and when enlarging; channels are never blended.
//!
//! This is top-left mapping, not pixel-center mapping
//! (`floor((x + 0.5) * W / N)`), so downscaled grids can differ from
//! resamplers that sample pixel centers. Tests depend on the exact indices.

use image::RgbaImage;

use crate::types::GridSize;

/// Map an output index on one axis to its source index.
///
/// `src_len` and `dst_len` must be non-zero. The result is always
/// `< src_len` for `dst_index < dst_len`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn source_index(dst_index: u32, src_len: u32, dst_len: u32) -> u32 {
    // u64 keeps `dst_index * src_len` from overflowing; the quotient is
    // below `src_len`, so narrowing back to u32 is lossless.
    ((dst_index as u64 * src_len as u64) / dst_len as u64) as u32
}

/// Resample `source` to exactly `size × size` pixels.
///
/// An image already at the target size is returned as an identical copy.
#[must_use]
pub fn sample_nearest(source: &RgbaImage, size: GridSize) -> RgbaImage {
    let n = size.get();
    let (w, h) = source.dimensions();

    if w == n && h == n {
        return source.clone();
    }

    RgbaImage::from_fn(n, n, |x, y| {
        *source.get_pixel(source_index(x, w, n), source_index(y, h, n))
    })
}
