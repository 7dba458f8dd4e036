//! pixbrick-export: Upload boundary and grid previews (sans-IO)
//!
//! Turns raw upload request bodies into status codes and JSON response
//! bodies, and renders finished grids as PNG previews. Nothing here
//! touches sockets or files.

pub mod config;
pub mod error;
pub mod preview;
pub mod response;
pub mod upload;

pub use config::UploadConfig;
pub use error::ExportError;
pub use preview::{preview_png, render_preview};
pub use response::{Reply, Status, UploadResponse};
pub use upload::{UploadRequest, handle_upload, process_request};
