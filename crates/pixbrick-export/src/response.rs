//! Response bodies and status codes for the upload endpoint.

use serde::{Deserialize, Serialize};

use pixbrick_pipeline::{ErrorKind, Grid, GridSize};

/// HTTP-style status of an upload reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// 200: the grid was produced.
    Ok,
    /// 400: missing or malformed client input.
    BadRequest,
    /// 413: request body exceeds the configured limit.
    PayloadTooLarge,
    /// 500: the image could not be processed.
    InternalError,
}

impl Status {
    /// Numeric status code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::PayloadTooLarge => 413,
            Self::InternalError => 500,
        }
    }

    /// Returns `true` for [`Status::Ok`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Status reported for a transform failure.
    ///
    /// Bad payloads and grid sizes are the caller's fault; images that
    /// cannot be decoded are reported as processing failures.
    #[must_use]
    pub const fn for_error(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::MalformedPayload | ErrorKind::InvalidGridSize => Self::BadRequest,
            ErrorKind::UnsupportedOrCorruptImage => Self::InternalError,
        }
    }
}

impl Serialize for Status {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.code())
    }
}

/// JSON body returned by the upload endpoint.
///
/// Serialized untagged, so the wire form is either
/// `{"success": true, "grid_size": N, "pixel_data": [...]}` or
/// `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadResponse {
    /// The grid was produced.
    Success {
        /// Always `true`.
        success: bool,
        /// Side length of `pixel_data`.
        grid_size: GridSize,
        /// The grid, row by row.
        pixel_data: Grid,
    },
    /// Something went wrong; `error` is human-readable.
    Failure {
        /// What went wrong.
        error: String,
    },
}

impl UploadResponse {
    /// A success body for `grid`.
    #[must_use]
    pub const fn success(grid: Grid) -> Self {
        Self::Success {
            success: true,
            grid_size: grid.grid_size(),
            pixel_data: grid,
        }
    }

    /// A failure body carrying `message`.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error: message.into(),
        }
    }

    /// The grid, for success bodies.
    #[must_use]
    pub const fn grid(&self) -> Option<&Grid> {
        match self {
            Self::Success { pixel_data, .. } => Some(pixel_data),
            Self::Failure { .. } => None,
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A status paired with its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    /// HTTP-style status.
    pub status: Status,
    /// JSON body.
    pub body: UploadResponse,
}

impl Reply {
    /// A failure reply with the given status and message.
    #[must_use]
    pub fn failure(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            body: UploadResponse::failure(message),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pixbrick_pipeline::{Cell, OpaqueCell};

    use super::*;

    fn one_cell_grid() -> Grid {
        Grid::try_from(vec![vec![Cell::Opaque(OpaqueCell::new(0, 0, 255, 255))]]).unwrap()
    }

    #[test]
    fn status_codes() {
        assert_eq!(Status::Ok.code(), 200);
        assert_eq!(Status::BadRequest.code(), 400);
        assert_eq!(Status::PayloadTooLarge.code(), 413);
        assert_eq!(Status::InternalError.code(), 500);
        assert!(Status::Ok.is_success());
        assert!(!Status::BadRequest.is_success());
    }

    #[test]
    fn error_kinds_map_to_client_or_server_status() {
        assert_eq!(
            Status::for_error(ErrorKind::MalformedPayload),
            Status::BadRequest
        );
        assert_eq!(
            Status::for_error(ErrorKind::InvalidGridSize),
            Status::BadRequest
        );
        assert_eq!(
            Status::for_error(ErrorKind::UnsupportedOrCorruptImage),
            Status::InternalError
        );
    }

    #[test]
    fn success_wire_format() {
        let response = UploadResponse::success(one_cell_grid());
        assert_eq!(
            response.to_json().unwrap(),
            r##"{"success":true,"grid_size":1,"pixel_data":[[{"color":"#0000ff","r":0,"g":0,"b":255,"a":255}]]}"##
        );
    }

    #[test]
    fn failure_wire_format() {
        let response = UploadResponse::failure("bad");
        assert_eq!(response.to_json().unwrap(), r#"{"error":"bad"}"#);
        assert!(response.grid().is_none());
    }

    #[test]
    fn responses_deserialize() {
        let success = UploadResponse::success(one_cell_grid());
        let back: UploadResponse = serde_json::from_str(&success.to_json().unwrap()).unwrap();
        assert_eq!(back, success);

        let failure: UploadResponse = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert_eq!(failure, UploadResponse::failure("nope"));
    }

    #[test]
    fn reply_serializes_status_as_number() {
        let reply = Reply::failure(Status::BadRequest, "x");
        assert_eq!(
            serde_json::to_string(&reply).unwrap(),
            r#"{"status":400,"body":{"error":"x"}}"#
        );
    }
}
