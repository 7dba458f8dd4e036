//! Settings for the upload boundary.
//!
//! The core transform has no tunables; everything here belongs to the
//! layer that turns request bodies into transform calls.

use serde::{Deserialize, Serialize};

/// Upload handling configuration.
///
/// Missing fields fall back to their defaults when deserialized, so a
/// partial JSON object such as `{"default_grid_size": 32}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Grid size used when a request omits `grid_size`.
    pub default_grid_size: i64,

    /// Largest grid side length a request may ask for. Larger sizes are
    /// rejected with 400 before the image is decoded.
    pub max_grid_size: u32,

    /// Largest accepted request body in bytes. Larger bodies are rejected
    /// with 413 before any parsing.
    pub max_content_length: usize,
}

impl UploadConfig {
    /// Default for [`default_grid_size`](Self::default_grid_size).
    pub const DEFAULT_GRID_SIZE: i64 = 16;

    /// Default for [`max_grid_size`](Self::max_grid_size).
    pub const DEFAULT_MAX_GRID_SIZE: u32 = 256;

    /// Default for [`max_content_length`](Self::max_content_length): 16 MiB.
    pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;
}

impl UploadConfig {
    /// Check a requested grid size against [`max_grid_size`](Self::max_grid_size).
    ///
    /// Only the upper limit is checked here; the transform itself rejects
    /// sizes below 1.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message if `grid_size` exceeds the limit.
    pub fn check_grid_size(&self, grid_size: i64) -> Result<i64, String> {
        if grid_size > i64::from(self.max_grid_size) {
            return Err(format!(
                "grid size {grid_size} exceeds the maximum of {}",
                self.max_grid_size
            ));
        }
        Ok(grid_size)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            default_grid_size: Self::DEFAULT_GRID_SIZE,
            max_grid_size: Self::DEFAULT_MAX_GRID_SIZE,
            max_content_length: Self::DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}
