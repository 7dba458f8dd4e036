//! Grid preview rendering.
//!
//! Draws a grid the way the game's preview panel shows it: each cell is a
//! `cell_px`-sized square on a light background, opaque cells filled
//! with their color, every cell outlined in light gray.
//!
//! Pure functions with no I/O -- they return an image or PNG bytes.

use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage, codecs::png::PngEncoder};

use pixbrick_pipeline::{Cell, Grid};

use crate::error::ExportError;

/// Background behind empty cells (`#f8f9fa`).
pub const BACKGROUND: Rgba<u8> = Rgba([0xf8, 0xf9, 0xfa, 0xff]);

/// Cell outline color (`#dddddd`).
pub const OUTLINE: Rgba<u8> = Rgba([0xdd, 0xdd, 0xdd, 0xff]);

/// Cells smaller than this are drawn without an outline, which would
/// otherwise cover the whole cell.
pub const MIN_OUTLINED_CELL_PX: u32 = 3;

/// Largest preview rendered, in pixels (8192 × 8192).
pub const MAX_PREVIEW_PIXELS: u64 = 1 << 26;

/// Render `grid` with `cell_px` pixels per cell side.
///
/// A `cell_px` of zero is treated as one. Opaque cells are drawn fully
/// opaque, as the preview panel ignores alpha.
///
/// # Errors
///
/// Returns [`ExportError::PreviewTooLarge`] if the image would exceed
/// [`MAX_PREVIEW_PIXELS`]. Nothing is allocated in that case.
pub fn render_preview(grid: &Grid, cell_px: u32) -> Result<RgbaImage, ExportError> {
    let cell_px = cell_px.max(1);
    let too_large = || ExportError::PreviewTooLarge {
        grid_size: grid.size(),
        cell_px,
    };
    let side = u32::try_from(grid.size())
        .ok()
        .and_then(|n| n.checked_mul(cell_px))
        .filter(|&side| u64::from(side) * u64::from(side) <= MAX_PREVIEW_PIXELS)
        .ok_or_else(too_large)?;

    let outlined = cell_px >= MIN_OUTLINED_CELL_PX;
    let last = cell_px - 1;

    Ok(RgbaImage::from_fn(side, side, |x, y| {
        let (col, local_x) = (x / cell_px, x % cell_px);
        let (row, local_y) = (y / cell_px, y % cell_px);

        if outlined && (local_x == 0 || local_y == 0 || local_x == last || local_y == last) {
            return OUTLINE;
        }

        match grid.get(row as usize, col as usize) {
            Some(Cell::Opaque(cell)) => Rgba([cell.r, cell.g, cell.b, 0xff]),
            _ => BACKGROUND,
        }
    }))
}

/// Render `grid` and encode it as PNG.
///
/// # Errors
///
/// Returns [`ExportError::PreviewTooLarge`] as [`render_preview`] does,
/// or [`ExportError::Encode`] if PNG encoding fails.
pub fn preview_png(grid: &Grid, cell_px: u32) -> Result<Vec<u8>, ExportError> {
    let image = render_preview(grid, cell_px)?;
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    log::debug!(
        "encoded {}x{} preview ({} bytes)",
        image.width(),
        image.height(),
        buf.len()
    );
    Ok(buf)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pixbrick_pipeline::OpaqueCell;

    use super::*;

    fn two_by_two() -> Grid {
        Grid::try_from(vec![
            vec![Cell::Opaque(OpaqueCell::new(255, 0, 0, 255)), Cell::Empty],
            vec![Cell::Empty, Cell::Opaque(OpaqueCell::new(0, 0, 255, 130))],
        ])
        .unwrap()
    }

    #[test]
    fn preview_dimensions() {
        let img = render_preview(&two_by_two(), 10).unwrap();
        assert_eq!(img.dimensions(), (20, 20));
    }

    #[test]
    fn cell_interiors_use_cell_colors() {
        let img = render_preview(&two_by_two(), 10).unwrap();
        assert_eq!(*img.get_pixel(5, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(15, 5), BACKGROUND);
        assert_eq!(*img.get_pixel(5, 15), BACKGROUND);
        // Alpha is dropped in the preview.
        assert_eq!(*img.get_pixel(15, 15), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn cell_borders_are_outlined() {
        let img = render_preview(&two_by_two(), 10).unwrap();
        assert_eq!(*img.get_pixel(0, 5), OUTLINE);
        assert_eq!(*img.get_pixel(9, 5), OUTLINE);
        assert_eq!(*img.get_pixel(10, 5), OUTLINE);
        assert_eq!(*img.get_pixel(15, 19), OUTLINE);
    }

    #[test]
    fn small_cells_have_no_outline() {
        let img = render_preview(&two_by_two(), 1).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(*img.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(1, 0), BACKGROUND);
    }

    #[test]
    fn zero_cell_px_is_clamped() {
        let img = render_preview(&two_by_two(), 0).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
    }

    #[test]
    fn oversized_preview_is_rejected() {
        let result = render_preview(&two_by_two(), u32::MAX);
        assert!(matches!(
            result,
            Err(ExportError::PreviewTooLarge { grid_size: 2, .. })
        ));
    }

    #[test]
    fn preview_over_pixel_budget_is_rejected() {
        // 20000 px per side passes the u32 check but not the budget.
        let result = render_preview(&two_by_two(), 10_000);
        assert!(matches!(
            result,
            Err(ExportError::PreviewTooLarge {
                grid_size: 2,
                cell_px: 10_000
            })
        ));
        assert!(preview_png(&two_by_two(), 10_000).is_err());
    }

    #[test]
    fn png_decodes_back() {
        let png = preview_png(&two_by_two(), 4).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, render_preview(&two_by_two(), 4).unwrap());
    }
}
