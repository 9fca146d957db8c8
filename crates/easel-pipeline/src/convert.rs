//! Conversion between 8-bit RGBA images and the 5-bit canvas.
//!
//! Import divides each channel by 8 and keeps only fully opaque pixels
//! opaque. Export multiplies palette colors back up by 8. Channels are
//! handled non-premultiplied throughout.

use image::{Rgba, RgbaImage};

use crate::canvas::Canvas;
use crate::types::{OPAQUE, PaintingError, Palette, Pixel};

/// Bits dropped from each channel when importing 8-bit data.
const CHANNEL_SHIFT: u8 = 3;

/// Decode raw image bytes into a canvas.
///
/// Supports PNG, JPEG, BMP, and WebP formats (whatever the `image` crate
/// was built with).
///
/// # Errors
///
/// Returns [`PaintingError::EmptyInput`] if `bytes` is empty.
/// Returns [`PaintingError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<Canvas, PaintingError> {
    if bytes.is_empty() {
        return Err(PaintingError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(canvas_from_rgba(&img.to_rgba8()))
}

/// Convert one 8-bit pixel to the canvas representation.
#[must_use]
pub const fn pixel_from_rgba(rgba: Rgba<u8>) -> Pixel {
    let [r, g, b, a] = rgba.0;
    Pixel::new(
        r >> CHANNEL_SHIFT,
        g >> CHANNEL_SHIFT,
        b >> CHANNEL_SHIFT,
        if a == OPAQUE { OPAQUE } else { 0 },
    )
}

/// Convert a canvas color back to 8-bit RGBA.
///
/// Alpha is 0 unless the color is fully opaque.
#[must_use]
pub fn rgba_from_pixel(pixel: Pixel) -> Rgba<u8> {
    let p = pixel.clamped();
    Rgba([
        p.r << CHANNEL_SHIFT,
        p.g << CHANNEL_SHIFT,
        p.b << CHANNEL_SHIFT,
        if p.is_opaque() { OPAQUE } else { 0 },
    ])
}

/// Build a canvas from an 8-bit RGBA image.
///
/// Channels are read straight (not premultiplied by alpha), so a partially
/// transparent source pixel keeps its full color data even though it
/// becomes transparent on the canvas. Blur passes that seed their running
/// value from an edge pixel see that color.
#[must_use]
pub fn canvas_from_rgba(image: &RgbaImage) -> Canvas {
    Canvas::from_fn(image.width(), image.height(), |x, y| {
        pixel_from_rgba(*image.get_pixel(x, y))
    })
}

/// Render the canvas index layer through `palette`.
///
/// Indexes outside the palette render fully transparent.
#[must_use]
pub fn render(canvas: &Canvas, palette: &Palette) -> RgbaImage {
    render_with(canvas, |x, y| palette.get(canvas.index(x, y)))
}

/// Render the canvas pixel grid directly, without a palette.
///
/// Useful for previewing effect passes before quantization.
#[must_use]
pub fn render_pixels(canvas: &Canvas) -> RgbaImage {
    render_with(canvas, |x, y| canvas.pixel(x, y))
}

fn render_with(canvas: &Canvas, color_at: impl Fn(i32, i32) -> Pixel) -> RgbaImage {
    RgbaImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let x = i32::try_from(x).unwrap_or(i32::MAX);
        let y = i32::try_from(y).unwrap_or(i32::MAX);
        rgba_from_pixel(color_at(x, y))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Helper: encode an RGBA image as a PNG byte buffer.
    fn encode_png(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .ok();
        buf
    }

    #[test]
    fn empty_input_returns_error() {
        let result = decode(&[]);
        assert!(matches!(result, Err(PaintingError::EmptyInput)));
    }

    #[test]
    fn corrupt_bytes_returns_image_decode_error() {
        let result = decode(&[0xFF, 0xFE, 0x00, 0x01]);
        assert!(matches!(result, Err(PaintingError::ImageDecode(_))));
    }

    #[test]
    fn decode_divides_channels_by_eight() {
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([255, 128, 7, 255])
            } else {
                Rgba([64, 64, 64, 254])
            }
        });
        let canvas = decode(&encode_png(&img)).unwrap();
        assert_eq!(canvas.width(), 2);
        assert_eq!(canvas.height(), 1);
        assert_eq!(canvas.pixel(0, 0), Pixel::opaque(31, 16, 0));
        // Partially transparent pixels become fully transparent.
        assert_eq!(canvas.pixel(1, 0), Pixel::new(8, 8, 8, 0));
    }

    #[test]
    fn partially_transparent_pixels_keep_straight_channels() {
        let img = RgbaImage::from_fn(1, 1, |_, _| Rgba([200, 100, 40, 128]));
        let canvas = canvas_from_rgba(&img);
        // Premultiplied data would give (12, 6, 2).
        assert_eq!(canvas.pixel(0, 0), Pixel::new(25, 12, 5, 0));
    }

    #[test]
    fn output_dimensions_match_input() {
        let img = RgbaImage::from_fn(17, 31, |_, _| Rgba([128, 64, 32, 255]));
        let canvas = decode(&encode_png(&img)).unwrap();
        assert_eq!(canvas.width(), 17);
        assert_eq!(canvas.height(), 31);
    }

    #[test]
    fn render_multiplies_by_eight() {
        let mut canvas = Canvas::new(3, 1);
        canvas.set_index(0, 0, 1);
        canvas.set_index(1, 0, 2);
        canvas.set_index(2, 0, 9);
        let palette = Palette::new(vec![
            Pixel::TRANSPARENT,
            Pixel::opaque(31, 16, 1),
            Pixel::new(10, 10, 10, 128),
        ]);
        let img = render(&canvas, &palette);
        assert_eq!(*img.get_pixel(0, 0), Rgba([248, 128, 8, 255]));
        // Non-opaque palette colors lose their alpha.
        assert_eq!(*img.get_pixel(1, 0), Rgba([80, 80, 80, 0]));
        // Out-of-range indexes are transparent.
        assert_eq!(*img.get_pixel(2, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn render_pixels_shows_working_grid() {
        let canvas = Canvas::from_fn(2, 2, |x, y| Pixel::opaque(u8::try_from(x + y).unwrap_or(0), 0, 31));
        let img = render_pixels(&canvas);
        assert_eq!(*img.get_pixel(1, 1), Rgba([16, 0, 248, 255]));
    }

    #[test]
    fn import_then_render_loses_only_low_bits() {
        let img = RgbaImage::from_fn(4, 4, |x, y| {
            let v = u8::try_from((x * 64 + y * 16) % 256).unwrap_or(0);
            Rgba([v, 255 - v, v / 2, 255])
        });
        let canvas = canvas_from_rgba(&img);
        let back = render_pixels(&canvas);
        for (orig, round) in img.pixels().zip(back.pixels()) {
            for c in 0..3 {
                assert_eq!(round.0[c], orig.0[c] & 0xF8);
            }
            assert_eq!(round.0[3], 255);
        }
    }
}
