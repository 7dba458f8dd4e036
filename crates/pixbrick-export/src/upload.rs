//! Upload request handling.
//!
//! [`handle_upload`] is the whole boundary: it takes a raw JSON request
//! body and returns the status and body to send back. Transport (sockets,
//! HTTP framing) is the caller's concern.

use serde::Deserialize;

use crate::config::UploadConfig;
use crate::response::{Reply, Status, UploadResponse};

/// JSON body accepted by the upload endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadRequest {
    /// Data-URI payload, e.g. `data:image/png;base64,...`.
    #[serde(default)]
    pub image: Option<String>,

    /// Requested side length; the configured default applies when absent.
    #[serde(default)]
    pub grid_size: Option<i64>,
}

impl UploadRequest {
    /// Parse a request body.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `body` is not a JSON object
    /// of the expected shape.
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}

/// Run one upload request through the transform.
///
/// Status mapping:
///
/// - body larger than `config.max_content_length`: 413
/// - body not valid JSON, or `image` missing/empty: 400
/// - grid size above `config.max_grid_size`: 400, before decoding
/// - malformed payload or invalid grid size: 400
/// - image that cannot be decoded: 500
#[must_use]
pub fn handle_upload(body: &str, config: &UploadConfig) -> Reply {
    if body.len() > config.max_content_length {
        log::warn!(
            "rejecting {} byte upload (limit {})",
            body.len(),
            config.max_content_length
        );
        return Reply::failure(
            Status::PayloadTooLarge,
            format!(
                "request body exceeds {} bytes",
                config.max_content_length
            ),
        );
    }

    let request = match UploadRequest::from_json(body) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("invalid upload request: {e}");
            return Reply::failure(Status::BadRequest, format!("invalid request body: {e}"));
        }
    };

    process_request(&request, config)
}

/// Run an already-parsed request through the transform.
#[must_use]
pub fn process_request(request: &UploadRequest, config: &UploadConfig) -> Reply {
    let Some(image) = request.image.as_deref().filter(|s| !s.is_empty()) else {
        return Reply::failure(Status::BadRequest, "no image data provided");
    };
    let requested = request.grid_size.unwrap_or(config.default_grid_size);
    let grid_size = match config.check_grid_size(requested) {
        Ok(n) => n,
        Err(msg) => {
            log::warn!("rejecting upload: {msg}");
            return Reply::failure(Status::BadRequest, msg);
        }
    };

    match pixbrick_pipeline::pixelize(image, grid_size) {
        Ok(grid) => Reply {
            status: Status::Ok,
            body: UploadResponse::success(grid),
        },
        Err(e) => Reply::failure(Status::for_error(e.kind()), e.to_string()),
    }
}
