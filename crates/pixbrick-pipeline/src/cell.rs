//! Cell classification and color encoding.
//!
//! Each sampled pixel becomes one [`Cell`]: empty when its alpha is below
//! [`ALPHA_THRESHOLD`], otherwise an opaque brick carrying a `#rrggbb`
//! color string and the original channel values.

use image::Rgba;
use serde::{Deserialize, Serialize};

/// Pixels with alpha strictly below this value are empty.
pub const ALPHA_THRESHOLD: u8 = 128;

/// One grid position: nothing, or a solid brick color.
///
/// Serializes as JSON `null` for [`Cell::Empty`] and as
/// `{"color": "#rrggbb", "r", "g", "b", "a"}` for [`Cell::Opaque`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Alpha below the threshold; no brick.
    Empty,
    /// Alpha at or above the threshold.
    Opaque(OpaqueCell),
}

impl Cell {
    /// Returns `true` for [`Cell::Opaque`].
    #[must_use]
    pub const fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque(_))
    }

    /// The opaque record, if any.
    #[must_use]
    pub const fn as_opaque(&self) -> Option<&OpaqueCell> {
        match self {
            Self::Empty => None,
            Self::Opaque(cell) => Some(cell),
        }
    }
}

/// Color record of an opaque cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueCell {
    /// Lowercase `#rrggbb` encoding of `r`, `g`, `b`.
    pub color: String,
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Original alpha of the sampled pixel (always >= [`ALPHA_THRESHOLD`]).
    pub a: u8,
}

impl OpaqueCell {
    /// Build a record, deriving `color` from the channels.
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            color: hex_color(r, g, b),
            r,
            g,
            b,
            a,
        }
    }

    /// The record's channels as an RGBA pixel.
    #[must_use]
    pub const fn to_rgba(&self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Encode a 24-bit color as lowercase `#rrggbb`.
#[must_use]
pub fn hex_color(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Classify one sampled pixel.
#[must_use]
pub fn classify(pixel: Rgba<u8>) -> Cell {
    let [r, g, b, a] = pixel.0;
    if a < ALPHA_THRESHOLD {
        Cell::Empty
    } else {
        Cell::Opaque(OpaqueCell::new(r, g, b, a))
    }
}
