//! In-memory image fixtures shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Mutex, Once};

use base64::{Engine as _, engine::general_purpose};
use image::ExtendedColorType;

/// Encode raw pixel data as a PNG byte buffer.
pub fn encode_png(data: &[u8], width: u32, height: u32, color: ExtendedColorType) -> Vec<u8> {
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(encoder, data, width, height, color).unwrap();
    buf
}

/// Encode row-major RGBA pixels as a PNG.
pub fn rgba_png(width: u32, height: u32, pixels: &[[u8; 4]]) -> Vec<u8> {
    let raw: Vec<u8> = pixels.iter().flatten().copied().collect();
    encode_png(&raw, width, height, ExtendedColorType::Rgba8)
}

/// Wrap image bytes in a `data:image/png;base64,` URI.
pub fn data_uri(bytes: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());

/// Records every log line as `"<LEVEL> <message>"`.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        CAPTURED
            .lock()
            .unwrap()
            .push(format!("{} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

/// Install the capturing logger for this test binary.
///
/// Tests run in parallel and share the capture, so callers should look
/// for a line only their own input can produce.
pub fn capture_logs() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_logger(&CaptureLogger).unwrap();
        log::set_max_level(log::LevelFilter::Debug);
    });
}

/// Lines captured so far that contain `needle`.
pub fn logged_lines(needle: &str) -> Vec<String> {
    CAPTURED
        .lock()
        .unwrap()
        .iter()
        .filter(|line| line.contains(needle))
        .cloned()
        .collect()
}
