//! Payload decoding: data-URI text to raw image bytes.
//!
//! Uploads arrive as `data:<mime>;base64,<data>`. Everything up to and
//! including the first `,` is metadata and is ignored; the rest must be
//! standard padded base64.

use base64::{Engine as _, engine::general_purpose};

use crate::types::PipelineError;

/// Separator between the metadata prefix and the encoded data.
pub const SEPARATOR: char = ',';

/// Decode the base64 data following the first [`SEPARATOR`].
///
/// # Errors
///
/// Returns [`PipelineError::MalformedPayload`] if there is no separator
/// or the suffix is not valid base64.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, PipelineError> {
    let (_, encoded) = payload.trim().split_once(SEPARATOR).ok_or_else(|| {
        PipelineError::MalformedPayload(format!("missing '{SEPARATOR}' separator"))
    })?;

    general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| PipelineError::MalformedPayload(format!("invalid base64: {e}")))
}

/// The MIME type declared by a `data:<mime>;base64,` prefix, if any.
///
/// Informational only; decoding never depends on it.
#[must_use]
pub fn mime_type(payload: &str) -> Option<&str> {
    let (prefix, _) = payload.trim_start().split_once(SEPARATOR)?;
    let rest = prefix.strip_prefix("data:")?;
    let mime = rest.split(';').next().unwrap_or_default();
    if mime.is_empty() { None } else { Some(mime) }
}
