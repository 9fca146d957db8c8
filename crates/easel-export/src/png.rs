//! PNG export.
//!
//! Renders the canvas index layer through its palette (channels × 8,
//! binary alpha) and encodes the result as an 8-bit RGBA PNG.

use easel_pipeline::convert;
use easel_pipeline::{Canvas, Palette};
use image::ImageEncoder;
use image::codecs::png::PngEncoder;

use crate::ExportError;

/// Encode the painting as PNG bytes.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if the PNG encoder fails.
pub fn to_png(canvas: &Canvas, palette: &Palette) -> Result<Vec<u8>, ExportError> {
    let rgba = convert::render(canvas, palette);
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        rgba.as_raw(),
        rgba.width(),
        rgba.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    tracing::debug!(
        width = rgba.width(),
        height = rgba.height(),
        bytes = buf.len(),
        "encoded png"
    );
    Ok(buf)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use easel_pipeline::Pixel;
    use image::Rgba;

    use super::*;

    #[test]
    fn png_signature_and_pixels() {
        let mut canvas = Canvas::new(2, 2);
        canvas.set_index(1, 0, 1);
        canvas.set_index(0, 1, 2);
        let palette = Palette::new(vec![
            Pixel::TRANSPARENT,
            Pixel::opaque(31, 0, 0),
            Pixel::opaque(0, 16, 31),
        ]);

        let bytes = to_png(&canvas, &palette).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(*decoded.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*decoded.get_pixel(1, 0), Rgba([248, 0, 0, 255]));
        assert_eq!(*decoded.get_pixel(0, 1), Rgba([0, 128, 248, 255]));
    }
}
