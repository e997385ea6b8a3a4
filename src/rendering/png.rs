use retro_dither::Framebuffer;
use std::io::Cursor;
use std::path::Path;

use crate::error::EncodeError;

/// Encode a framebuffer as an 8-bit RGBA PNG.
pub fn encode_png(frame: &Framebuffer) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, frame.width() as u32, frame.height() as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| EncodeError::Png(e.to_string()))?;
        writer
            .write_image_data(frame.as_bytes())
            .map_err(|e| EncodeError::Png(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Encode a framebuffer and write it to `path`.
pub fn write_png(path: &Path, frame: &Framebuffer) -> Result<(), EncodeError> {
    let bytes = encode_png(frame)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
