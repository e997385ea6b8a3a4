//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use retro_dither::{Framebuffer, Palette, Rgb};

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a valid PNG image
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );

    let content_type = response
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());
    assert_eq!(
        content_type,
        Some("image/png"),
        "Expected Content-Type: image/png"
    );
}

/// Assert a JSON error body carries the HTTP status
pub fn assert_json_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"].as_u64(), Some(expected.as_u16() as u64));
    assert!(json["error"].is_string(), "Expected error message: {json}");
}

/// Decode a PNG body into an RGBA framebuffer
pub fn decode_png(bytes: &[u8]) -> Framebuffer {
    let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    let mut reader = decoder.read_info().expect("Invalid PNG header");
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).expect("Invalid PNG data");
    assert_eq!(info.color_type, png::ColorType::Rgba, "Expected RGBA PNG");
    buf.truncate(info.buffer_size());
    Framebuffer::from_rgba(buf, info.width as usize, info.height as usize)
        .expect("PNG dimensions")
}

/// Assert every pixel's RGB is a palette member
pub fn assert_palette_only(frame: &Framebuffer, palette: &Palette) {
    for (i, [r, g, b, _]) in frame.pixels().enumerate() {
        let color = Rgb::new(r, g, b);
        assert!(
            palette.contains(color),
            "pixel {} ({}) is not in the palette",
            i,
            color
        );
    }
}
