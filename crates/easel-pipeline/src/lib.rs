//! easel-pipeline: Pure contest painting pipeline (sans-IO).
//!
//! Turns an image into a stylized, palette-indexed painting through:
//! 5-bit import -> effect passes -> palette quantization.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and canvases and returns structured data. File access and
//! PNG export live in `easel-export` and the `easel` binary.

pub mod canvas;
pub mod convert;
pub mod diagnostics;
pub mod effect;
pub mod pixel_math;
pub mod pointillism;
pub mod quantize;
pub mod recipe;
pub mod types;

pub use canvas::Canvas;
pub use effect::Effect;
pub use quantize::{Quantizer, QuantizerKind};
pub use recipe::{Category, Recipe};
pub use types::{PaintingError, Palette, PaletteIndex, Pixel, RgbaImage};

/// Run a full painting recipe on encoded image bytes.
///
/// Decodes the image (PNG, JPEG, BMP, WebP) into a 5-bit [`Canvas`],
/// applies every effect pass of `recipe` in order and quantizes the
/// result. The returned canvas index layer refers to the returned
/// palette.
///
/// # Errors
///
/// Returns [`PaintingError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PaintingError::ImageDecode`] if the image format is unrecognized.
pub fn paint(image_bytes: &[u8], recipe: &Recipe) -> Result<(Canvas, Palette), PaintingError> {
    let mut canvas = convert::decode(image_bytes)?;
    let palette = recipe.apply(&mut canvas);
    Ok((canvas, palette))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::Rgba;

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

    /// A white disk on a transparent background.
    fn disk_png() -> Vec<u8> {
        let img = RgbaImage::from_fn(40, 40, |x, y| {
            let dx = f64::from(x) - 20.0;
            let dy = f64::from(y) - 20.0;
            if dx.hypot(dy) < 12.0 {
                Rgba([250, 240, 230, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        encode_png(&img)
    }

    #[test]
    fn paint_empty_input_returns_error() {
        let result = paint(&[], &Category::Cool.recipe(0));
        assert!(matches!(result, Err(PaintingError::EmptyInput)));
    }

    #[test]
    fn paint_keeps_dimensions_and_background() {
        let (canvas, palette) = paint(&disk_png(), &Category::Beauty.recipe(0)).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (40, 40));
        assert_eq!(palette.len(), 224);
        assert_eq!(canvas.index(0, 0), 0);
        assert_ne!(canvas.index(20, 20), 0);
    }

    #[test]
    fn cool_disk_gets_black_outline() {
        let (canvas, palette) = paint(&disk_png(), &Category::Cool.recipe(0)).unwrap();
        // The disk edge touches transparency, so it is outlined in black
        // which is dark and therefore takes the personality hue.
        let edge = palette.get(canvas.index(9, 20));
        let center = palette.get(canvas.index(20, 20));
        assert_eq!(center, quantize::quantize_pixel_standard(Pixel::WHITE));
        assert_ne!(edge, center);
        assert!(edge.is_opaque());
    }
}
