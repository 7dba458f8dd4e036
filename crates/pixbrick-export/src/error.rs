//! Errors raised by the export layer itself.

/// Failures while rendering or encoding a grid preview.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The preview would exceed the preview pixel budget.
    #[error("preview too large: {grid_size} cells of {cell_px}px per side")]
    PreviewTooLarge {
        /// Grid side length.
        grid_size: usize,
        /// Requested pixels per cell.
        cell_px: u32,
    },

    /// PNG encoding failed.
    #[error("failed to encode preview: {0}")]
    Encode(#[from] image::ImageError),
}
