//! Shared types for the pixbrick image-to-grid transform.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// Re-export `RgbaImage` so downstream crates can reference pixel
/// surfaces without depending on `image` directly.
pub use image::RgbaImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an existing surface.
    #[must_use]
    pub fn of(surface: &RgbaImage) -> Self {
        Self {
            width: surface.width(),
            height: surface.height(),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Bytes per pixel of the RGBA surfaces the transform allocates.
const BYTES_PER_PIXEL: u64 = 4;

/// Side length of the square output grid.
///
/// Always at least 1, and small enough that an N×N RGBA surface is
/// addressable. Construct from a caller-supplied integer with
/// [`GridSize::new`]; there is no default in the core. Practical limits
/// on work belong to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct GridSize(u32);

impl GridSize {
    /// Validate a caller-supplied grid size.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidGridSize`] if `n` is zero,
    /// negative, does not fit in a `u32`, or names a surface whose byte
    /// length does not fit in memory.
    pub fn new(n: i64) -> Result<Self, PipelineError> {
        match u32::try_from(n) {
            Ok(value) if value > 0 && surface_fits(value) => Ok(Self(value)),
            _ => Err(PipelineError::InvalidGridSize(n)),
        }
    }

    /// The side length N.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Total number of cells (N²).
    #[must_use]
    pub const fn cell_count(self) -> u64 {
        (self.0 as u64) * (self.0 as u64)
    }
}

/// Whether an `n × n` RGBA buffer has a byte length a `Vec` can hold.
fn surface_fits(n: u32) -> bool {
    u64::from(n)
        .checked_mul(u64::from(n))
        .and_then(|cells| cells.checked_mul(BYTES_PER_PIXEL))
        .and_then(|bytes| usize::try_from(bytes).ok())
        .is_some_and(|bytes| bytes <= isize::MAX.unsigned_abs())
}

impl TryFrom<i64> for GridSize {
    type Error = PipelineError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<GridSize> for u32 {
    fn from(size: GridSize) -> Self {
        size.0
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A square grid of [`Cell`]s.
///
/// Row index increases top-to-bottom, column index left-to-right. Every
/// row has exactly as many cells as there are rows. Serializes as a JSON
/// array of rows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>")]
pub struct Grid {
    size: GridSize,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Wrap rows already known to form a `size × size` square.
    pub(crate) const fn from_square_rows(size: GridSize, rows: Vec<Vec<Cell>>) -> Self {
        Self { size, rows }
    }

    /// Side length of the grid.
    #[must_use]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Side length of the grid as a [`GridSize`].
    #[must_use]
    pub const fn grid_size(&self) -> GridSize {
        self.size
    }

    /// All rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// The cell at `(row, col)`, if in range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Number of cells that will become bricks.
    #[must_use]
    pub fn opaque_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_opaque())
            .count()
    }

    /// Consumes the grid and returns its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Grid {
    type Error = String;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        let n = rows.len();
        let size = i64::try_from(n)
            .ok()
            .and_then(|n| GridSize::new(n).ok())
            .ok_or_else(|| format!("grid cannot have {n} rows"))?;
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(format!(
                "grid row {i} has {} cells, expected {n}",
                row.len()
            ));
        }
        Ok(Self { size, rows })
    }
}

impl Serialize for Grid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

/// Which step of the transform failed, without its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// See [`PipelineError::MalformedPayload`].
    MalformedPayload,
    /// See [`PipelineError::UnsupportedOrCorruptImage`].
    UnsupportedOrCorruptImage,
    /// See [`PipelineError::InvalidGridSize`].
    InvalidGridSize,
}

/// Errors that can occur while turning a payload into a grid.
///
/// Each variant identifies the step that failed. No partial grid is ever
/// produced alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum PipelineError {
    /// The payload had no `,` separator or its suffix was not valid base64.
    #[error("malformed image payload: {0}")]
    MalformedPayload(String),

    /// The decoded bytes are not an image in any supported format.
    #[error("unsupported or corrupt image: {0}")]
    UnsupportedOrCorruptImage(String),

    /// The requested grid size is not positive or is too large to allocate.
    #[error("invalid grid size {0}: must be a positive integer with an allocatable grid")]
    InvalidGridSize(i64),
}

impl PipelineError {
    /// The failure category, for callers that branch on it.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedPayload(_) => ErrorKind::MalformedPayload,
            Self::UnsupportedOrCorruptImage(_) => ErrorKind::UnsupportedOrCorruptImage,
            Self::InvalidGridSize(_) => ErrorKind::InvalidGridSize,
        }
    }
}

impl From<image::ImageError> for PipelineError {
    fn from(e: image::ImageError) -> Self {
        Self::UnsupportedOrCorruptImage(e.to_string())
    }
}
