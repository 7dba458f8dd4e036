//! Incremental transform: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! [`crate::pixelize`] runs every stage in one call. [`Pipeline`] lets
//! the caller drive execution one step at a time:
//!
//! ```rust
//! # use pixbrick_pipeline::{Pipeline, PipelineError};
//! # fn run(payload: &str) -> Result<(), PipelineError> {
//! let grid = Pipeline::new(payload, 16)
//!     .decode_payload()?
//!     .decode()?
//!     .sample()?
//!     .classify()
//!     .into_grid();
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next state (or
//! `Result` for fallible stages), making it a compile-time error to skip
//! stages or run them out of order.
//!
//! # Memory
//!
//! Only the full-resolution decoded surface is large. It lives in
//! [`Decoded`] and is dropped when [`Decoded::sample`] returns, whether
//! sampling succeeds or fails. Later stages hold only the N×N surface
//! and the grid.

use image::RgbaImage;

use crate::cell::classify;
use crate::types::{Dimensions, Grid, GridSize, PipelineError};

/// Common metadata for every pipeline stage.
pub trait PipelineStage {
    /// Name of the step that produces this stage, used in log lines.
    const NAME: &'static str;
    /// Zero-based position in the pipeline.
    const INDEX: usize;
}

/// Log a failed advance into stage `S` and pass the error on.
fn failed<S: PipelineStage>(e: PipelineError) -> PipelineError {
    log::warn!("stage {} ({}) failed: {e}", S::INDEX, S::NAME);
    e
}

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
///
/// Call [`decode_payload`](Self::decode_payload) to advance.
#[must_use = "pipeline stages are consumed by advancing; call .decode_payload() to continue"]
pub struct Pending<'a> {
    payload: &'a str,
    grid_size: i64,
}

impl Pending<'_> {
    /// The raw payload text.
    #[must_use]
    pub const fn payload(&self) -> &str {
        self.payload
    }

    /// Decode the base64 payload and advance to [`PayloadDecoded`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MalformedPayload`] if the payload has no
    /// separator or is not valid base64.
    pub fn decode_payload(self) -> Result<PayloadDecoded, PipelineError> {
        if let Some(mime) = crate::payload::mime_type(self.payload) {
            log::debug!("payload declares {mime}");
        }
        let bytes =
            crate::payload::decode_payload(self.payload).map_err(failed::<PayloadDecoded>)?;
        Ok(PayloadDecoded {
            bytes,
            grid_size: self.grid_size,
        })
    }
}

impl PipelineStage for Pending<'_> {
    const NAME: &'static str = "pending";
    const INDEX: usize = 0;
}

// ───────────────────────── Stage 1: PayloadDecoded ───────────────────

/// Pipeline state holding raw image bytes.
///
/// Call [`decode`](Self::decode) to advance.
#[must_use = "pipeline stages are consumed by advancing; call .decode() to continue"]
pub struct PayloadDecoded {
    bytes: Vec<u8>,
    grid_size: i64,
}

impl PayloadDecoded {
    /// The encoded image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the image and advance to [`Decoded`].
    ///
    /// The encoded bytes are released once decoding finishes.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnsupportedOrCorruptImage`] if the bytes
    /// are not a supported image.
    pub fn decode(self) -> Result<Decoded, PipelineError> {
        let image = crate::decode::decode_rgba(&self.bytes).map_err(failed::<Decoded>)?;
        Ok(Decoded {
            image,
            grid_size: self.grid_size,
        })
    }
}

impl PipelineStage for PayloadDecoded {
    const NAME: &'static str = "payload decode";
    const INDEX: usize = 1;
}

// ───────────────────────── Stage 2: Decoded ──────────────────────────

/// Pipeline state after decoding the source image to RGBA.
///
/// Call [`sample`](Self::sample) to advance.
#[must_use = "pipeline stages are consumed by advancing; call .sample() to continue"]
pub struct Decoded {
    image: RgbaImage,
    grid_size: i64,
}

impl Decoded {
    /// The full-resolution RGBA surface.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Dimensions of the decoded surface.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.image)
    }

    /// Resample to the grid size and advance to [`Sampled`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidGridSize`] if the grid size given
    /// to [`Pipeline::new`] is not positive or too large to allocate.
    pub fn sample(self) -> Result<Sampled, PipelineError> {
        let size = GridSize::new(self.grid_size).map_err(failed::<Sampled>)?;
        let source = self.dimensions();
        let surface = crate::sample::sample_nearest(&self.image, size);
        Ok(Sampled {
            surface,
            size,
            source,
        })
    }
}

impl PipelineStage for Decoded {
    const NAME: &'static str = "image decode";
    const INDEX: usize = 2;
}

// ───────────────────────── Stage 3: Sampled ──────────────────────────

/// Pipeline state holding the N×N sampled surface.
///
/// Call [`classify`](Self::classify) to advance.
#[must_use = "pipeline stages are consumed by advancing; call .classify() to continue"]
pub struct Sampled {
    surface: RgbaImage,
    size: GridSize,
    source: Dimensions,
}

impl Sampled {
    /// The N×N surface.
    #[must_use]
    pub const fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// The validated grid size.
    #[must_use]
    pub const fn grid_size(&self) -> GridSize {
        self.size
    }

    /// Dimensions of the decoded source image.
    #[must_use]
    pub const fn source_dimensions(&self) -> Dimensions {
        self.source
    }

    /// Classify every pixel and advance to [`Classified`].
    pub fn classify(self) -> Classified {
        let rows = self
            .surface
            .rows()
            .map(|row| row.map(|pixel| classify(*pixel)).collect())
            .collect();
        // `sample_nearest` always yields size × size pixels.
        let grid = Grid::from_square_rows(self.size, rows);
        Classified {
            grid,
            source: self.source,
        }
    }
}

impl PipelineStage for Sampled {
    const NAME: &'static str = "sample";
    const INDEX: usize = 3;
}

// ───────────────────────── Stage 4: Classified ───────────────────────

/// Final pipeline state: the finished grid.
#[must_use = "call .into_grid() to take the result"]
pub struct Classified {
    grid: Grid,
    source: Dimensions,
}

impl Classified {
    /// The finished grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Dimensions of the decoded source image.
    #[must_use]
    pub const fn source_dimensions(&self) -> Dimensions {
        self.source
    }

    /// Consume the stage and return the grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

impl PipelineStage for Classified {
    const NAME: &'static str = "classify";
    const INDEX: usize = 4;
}

// ───────────────────── Pipeline entry point ──────────────────────────

/// Incremental image-to-grid pipeline.
///
/// Created via [`Pipeline::new`] (from payload text) or
/// [`Pipeline::from_bytes`] (from raw image bytes). Nothing is processed
/// until the caller advances.
pub struct Pipeline;

impl Pipeline {
    /// Start from a data-URI payload and an unvalidated grid size.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new(payload: &str, grid_size: i64) -> Pending<'_> {
        Pending { payload, grid_size }
    }

    /// Start from raw image bytes, skipping payload decoding.
    pub const fn from_bytes(bytes: Vec<u8>, grid_size: i64) -> PayloadDecoded {
        PayloadDecoded { bytes, grid_size }
    }
}
