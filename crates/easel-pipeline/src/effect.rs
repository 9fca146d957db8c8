//! Canvas-wide effect passes.
//!
//! Each pass scans the canvas in a fixed order, applies
//! [`pixel_math`](crate::pixel_math) to every coordinate and writes the
//! result back in place. The blur family threads a running previous
//! pixel through each scan line, so later pixels see earlier *outputs*;
//! those passes must run sequentially in the documented order.
//!
//! [`Effect`] names every pass with its parameters so recipes can be
//! described as data.

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::pixel_math::{self, BlurStrength};
use crate::pointillism::{self, POINT_COUNT};
use crate::types::{MAX_CHANNEL, Pixel};

/// Luminance weights of [`grayscale`]. They intentionally sum to more
/// than 1.0.
const LUMA_WEIGHTS: [f32; 3] = [0.3, 0.59, 0.1133];

/// One canvas-wide effect pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Weighted luminance grayscale.
    Grayscale,
    /// Grayscale from the red channel, shifted by `delta`.
    RedChannelGrayscale {
        /// Added to the red channel before clamping.
        delta: i8,
    },
    /// Grayscale from the red channel with highlights pulled down.
    RedChannelGrayscaleHighlight {
        /// Red values above `31 - highlight` become `31 - highlight / 2`.
        highlight: i8,
    },
    /// Vertical smudge.
    Blur,
    /// Vertical smudge with full darkening.
    BlurHard,
    /// Invert, hard-blur twice, invert back: light outlines.
    Shimmer,
    /// Horizontal running smudge.
    MotionBlurRight,
    /// Vertical running smudge.
    MotionBlurDown,
    /// Black outline where opaque pixels meet empty space.
    BlackOutline,
    /// Negative.
    Invert,
    /// Dark areas take a personality hue, the rest turns white.
    PersonalityColor {
        /// Low byte of the personality value.
        personality: u8,
    },
    /// Threshold to black and white.
    BlackAndWhite,
    /// Speckle the canvas with the pointillism table.
    Pointillism,
}

impl Effect {
    /// Apply this pass to the canvas in place.
    pub fn apply(self, canvas: &mut Canvas) {
        tracing::debug!(
            effect = self.name(),
            width = canvas.width(),
            height = canvas.height(),
            "applying effect"
        );
        match self {
            Self::Grayscale => grayscale(canvas),
            Self::RedChannelGrayscale { delta } => red_channel_grayscale(canvas, delta),
            Self::RedChannelGrayscaleHighlight { highlight } => {
                red_channel_grayscale_highlight(canvas, highlight);
            }
            Self::Blur => blur(canvas),
            Self::BlurHard => blur_hard(canvas),
            Self::Shimmer => shimmer(canvas),
            Self::MotionBlurRight => motion_blur_right(canvas),
            Self::MotionBlurDown => motion_blur_down(canvas),
            Self::BlackOutline => black_outline(canvas),
            Self::Invert => invert(canvas),
            Self::PersonalityColor { personality } => personality_color(canvas, personality),
            Self::BlackAndWhite => black_and_white(canvas),
            Self::Pointillism => pointillism(canvas),
        }
    }

    /// Short snake-case name, used in logs and diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::RedChannelGrayscale { .. } => "red_channel_grayscale",
            Self::RedChannelGrayscaleHighlight { .. } => "red_channel_grayscale_highlight",
            Self::Blur => "blur",
            Self::BlurHard => "blur_hard",
            Self::Shimmer => "shimmer",
            Self::MotionBlurRight => "motion_blur_right",
            Self::MotionBlurDown => "motion_blur_down",
            Self::BlackOutline => "black_outline",
            Self::Invert => "invert",
            Self::PersonalityColor { .. } => "personality_color",
            Self::BlackAndWhite => "black_and_white",
            Self::Pointillism => "pointillism",
        }
    }
}

/// Replace every opaque pixel with `f(pixel)`, column by column.
fn map_opaque(canvas: &mut Canvas, mut f: impl FnMut(Pixel) -> Pixel) {
    let (width, height) = canvas.signed_dimensions();
    for x in 0..width {
        for y in 0..height {
            let pixel = canvas.pixel(x, y);
            if pixel.is_opaque() {
                canvas.set_pixel(x, y, f(pixel));
            }
        }
    }
}

/// Weighted luminance grayscale: `0.3 R + 0.59 G + 0.1133 B`, truncated.
pub fn grayscale(canvas: &mut Canvas) {
    map_opaque(canvas, |p| {
        let [wr, wg, wb] = LUMA_WEIGHTS;
        // Products are rounded separately; `mul_add` drops a level on
        // some exact integer sums.
        #[allow(clippy::suboptimal_flops)]
        let luma = f32::from(p.r) * wr + f32::from(p.g) * wg + f32::from(p.b) * wb;
        // Truncation toward zero; luma is never negative.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let level = luma as u32;
        p.with_channels(level, level, level)
    });
}

/// Grayscale from the red channel plus `delta`, clamped to 0..=31.
pub fn red_channel_grayscale(canvas: &mut Canvas, delta: i8) {
    map_opaque(canvas, |p| {
        let level = (i32::from(p.r) + i32::from(delta)).clamp(0, i32::from(MAX_CHANNEL));
        let level = u32::try_from(level).unwrap_or(0);
        p.with_channels(level, level, level)
    });
}

/// Grayscale from the red channel; red above `31 - highlight` is pulled
/// down to `31 - highlight / 2`.
pub fn red_channel_grayscale_highlight(canvas: &mut Canvas, highlight: i8) {
    let max = i32::from(MAX_CHANNEL);
    let highlight = i32::from(highlight);
    map_opaque(canvas, |p| {
        let mut level = i32::from(p.r);
        if level > max - highlight {
            level = max - highlight / 2;
        }
        let level = u32::try_from(level.clamp(0, max)).unwrap_or(0);
        p.with_channels(level, level, level)
    });
}

/// Vertical smudge with [`pixel_math::blur`].
///
/// Row 0 seeds the running previous pixel and the last row only serves as
/// the final `next` neighbor; neither is written. Transparent interior
/// pixels are cleared to fully transparent.
pub fn blur(canvas: &mut Canvas) {
    vertical_smudge(canvas, BlurStrength::Normal);
}

/// Vertical smudge with [`pixel_math::blur_hard`].
pub fn blur_hard(canvas: &mut Canvas) {
    vertical_smudge(canvas, BlurStrength::Hard);
}

fn vertical_smudge(canvas: &mut Canvas, strength: BlurStrength) {
    let (width, height) = canvas.signed_dimensions();
    for x in 0..width {
        let mut prev = canvas.pixel(x, 0);
        for y in 1..height - 1 {
            let pixel = canvas.pixel(x, y);
            if pixel.is_opaque() {
                let next = canvas.pixel(x, y + 1);
                let smudged = pixel_math::smudge(prev, pixel, next, strength);
                canvas.set_pixel(x, y, smudged);
                prev = smudged;
            } else {
                canvas.set_pixel(x, y, Pixel::TRANSPARENT);
            }
        }
    }
}

/// Invert, hard-blur twice, invert back.
///
/// The blur darkens edges in the inverted image, so after the second
/// inversion the edges shine.
pub fn shimmer(canvas: &mut Canvas) {
    invert(canvas);
    blur_hard(canvas);
    blur_hard(canvas);
    invert(canvas);
}

/// Running smudge along each row, left to right.
///
/// The first column seeds the running previous pixel; the last column is
/// never written. Transparent pixels are left as they are.
pub fn motion_blur_right(canvas: &mut Canvas) {
    let (width, height) = canvas.signed_dimensions();
    for y in 0..height {
        let mut prev = canvas.pixel(0, y);
        for x in 1..width - 1 {
            let pixel = canvas.pixel(x, y);
            if pixel.is_opaque() {
                let smudged = pixel_math::motion_blur(prev, pixel);
                canvas.set_pixel(x, y, smudged);
                prev = smudged;
            }
        }
    }
}

/// Running smudge along each column, top to bottom. See
/// [`motion_blur_right`].
pub fn motion_blur_down(canvas: &mut Canvas) {
    let (width, height) = canvas.signed_dimensions();
    for x in 0..width {
        let mut prev = canvas.pixel(x, 0);
        for y in 1..height - 1 {
            let pixel = canvas.pixel(x, y);
            if pixel.is_opaque() {
                let smudged = pixel_math::motion_blur(prev, pixel);
                canvas.set_pixel(x, y, smudged);
                prev = smudged;
            }
        }
    }
}

/// Outline opaque regions in black where they touch transparency.
///
/// A horizontal sweep runs first, then a vertical sweep which sees (and
/// may overwrite) the horizontal results. Interior pixels are tested
/// against the following neighbor and then, with that result, against
/// the preceding one.
pub fn black_outline(canvas: &mut Canvas) {
    let (width, height) = canvas.signed_dimensions();
    let outline = |canvas: &mut Canvas, (x, y): (i32, i32), (nx, ny): (i32, i32)| {
        let pixel = pixel_math::black_outline(canvas.pixel(x, y), canvas.pixel(nx, ny));
        canvas.set_pixel(x, y, pixel);
    };

    for y in 0..height {
        outline(canvas, (0, y), (1, y));
        for x in 1..width - 1 {
            outline(canvas, (x, y), (x + 1, y));
            outline(canvas, (x, y), (x - 1, y));
        }
        let right = width - 1;
        outline(canvas, (right, y), (right - 1, y));
    }

    for x in 0..width {
        outline(canvas, (x, 0), (x, 1));
        for y in 1..height - 1 {
            outline(canvas, (x, y), (x, y + 1));
            outline(canvas, (x, y), (x, y - 1));
        }
        let bottom = height - 1;
        outline(canvas, (x, bottom), (x, bottom - 1));
    }
}

/// Negative of every opaque pixel; transparent pixels are cleared to
/// fully transparent.
pub fn invert(canvas: &mut Canvas) {
    let (width, height) = canvas.signed_dimensions();
    for y in 0..height {
        for x in 0..width {
            let pixel = canvas.pixel(x, y);
            let out = if pixel.is_opaque() {
                pixel_math::invert(pixel).clamped()
            } else {
                Pixel::TRANSPARENT
            };
            canvas.set_pixel(x, y, out);
        }
    }
}

/// Paint dark areas in the personality hue and everything else white.
pub fn personality_color(canvas: &mut Canvas, personality: u8) {
    map_opaque(canvas, |p| pixel_math::personality_color(p, personality));
}

/// Threshold every opaque pixel to black or white.
pub fn black_and_white(canvas: &mut Canvas) {
    map_opaque(canvas, pixel_math::black_and_white);
}

/// Stamp every table point, in order, into every whole tile.
pub fn pointillism(canvas: &mut Canvas) {
    for point in 0..POINT_COUNT {
        pointillism::apply_point(canvas, point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_five_bit(canvas: &Canvas) {
        for p in canvas.pixels() {
            assert!(p.r <= 31 && p.g <= 31 && p.b <= 31, "channel out of range: {p:?}");
            assert!(p.a == 0 || p.a == 255, "non-binary alpha: {p:?}");
        }
    }

    /// A colorful opaque canvas with a transparent border.
    fn framed(width: u32, height: u32) -> Canvas {
        Canvas::from_fn(width, height, |x, y| {
            if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                Pixel::TRANSPARENT
            } else {
                let v = |n: u32| u8::try_from(n % 32).unwrap_or(0);
                Pixel::opaque(v(x * 7 + 3), v(y * 5 + 20), v(x + y + 9))
            }
        })
    }

    #[test]
    fn grayscale_uses_uneven_weights() {
        let mut canvas = Canvas::from_fn(1, 1, |_, _| Pixel::opaque(31, 31, 31));
        grayscale(&mut canvas);
        // 31 * 1.0033 = 31.1 -> 31 after truncation and clamping.
        assert_eq!(canvas.pixel(0, 0), Pixel::gray(31));

        let mut canvas = Canvas::from_fn(1, 1, |_, _| Pixel::opaque(10, 20, 30));
        grayscale(&mut canvas);
        // 3.0 + 11.8 + 3.399 = 18.199 -> 18.
        assert_eq!(canvas.pixel(0, 0), Pixel::gray(18));
    }

    #[test]
    fn grayscale_rounds_each_product_separately() {
        // Exact sums of 8, 21 and 16: truncation must not drop a level.
        let cases = [((7, 10, 0), 8), ((11, 30, 0), 21), ((14, 20, 0), 16)];
        for ((r, g, b), level) in cases {
            let mut canvas = Canvas::from_fn(1, 1, |_, _| Pixel::opaque(r, g, b));
            grayscale(&mut canvas);
            assert_eq!(canvas.pixel(0, 0), Pixel::gray(level), "({r},{g},{b})");
        }
    }

    #[test]
    fn grayscale_skips_transparent() {
        let mut canvas = Canvas::from_fn(1, 1, |_, _| Pixel::new(10, 20, 30, 0));
        grayscale(&mut canvas);
        assert_eq!(canvas.pixel(0, 0), Pixel::new(10, 20, 30, 0));
    }

    #[test]
    fn red_channel_grayscale_clamps() {
        let mut canvas = Canvas::from_fn(3, 1, |x, _| match x {
            0 => Pixel::opaque(30, 0, 0),
            1 => Pixel::opaque(1, 31, 31),
            _ => Pixel::opaque(12, 0, 0),
        });
        red_channel_grayscale(&mut canvas, 3);
        assert_eq!(canvas.pixel(0, 0), Pixel::gray(31));
        assert_eq!(canvas.pixel(1, 0), Pixel::gray(4));
        assert_eq!(canvas.pixel(2, 0), Pixel::gray(15));

        red_channel_grayscale(&mut canvas, -10);
        assert_eq!(canvas.pixel(1, 0), Pixel::gray(0));
    }

    #[test]
    fn red_channel_highlight_pulls_down_bright_values() {
        let mut canvas = Canvas::from_fn(3, 1, |x, _| match x {
            0 => Pixel::opaque(31, 0, 0),
            1 => Pixel::opaque(27, 0, 0),
            _ => Pixel::opaque(28, 0, 0),
        });
        red_channel_grayscale_highlight(&mut canvas, 4);
        assert_eq!(canvas.pixel(0, 0), Pixel::gray(29));
        assert_eq!(canvas.pixel(1, 0), Pixel::gray(27));
        assert_eq!(canvas.pixel(2, 0), Pixel::gray(29));
    }

    #[test]
    fn blur_threads_running_previous_output() {
        // Column: 0, 10, 20, 20 (gray levels).
        let levels = [0, 10, 20, 20];
        let mut canvas = Canvas::from_fn(1, 4, |_, y| Pixel::gray(levels[y as usize]));
        blur_hard(&mut canvas);
        // Row 1: prev 0, cur 10, next 20 -> 6.
        assert_eq!(canvas.pixel(0, 1), Pixel::gray(6));
        // Row 2: prev is the written 6, cur 20, next 20 -> diff 14,
        // factor 17, 20 * 17 / 31 = 10.
        assert_eq!(canvas.pixel(0, 2), Pixel::gray(10));
        // Seed and last rows are untouched.
        assert_eq!(canvas.pixel(0, 0), Pixel::gray(0));
        assert_eq!(canvas.pixel(0, 3), Pixel::gray(20));
    }

    #[test]
    fn blur_clears_transparent_interior() {
        let mut canvas = Canvas::from_fn(1, 3, |_, y| {
            if y == 1 { Pixel::new(4, 4, 4, 0) } else { Pixel::gray(9) }
        });
        blur(&mut canvas);
        assert_eq!(canvas.pixel(0, 1), Pixel::TRANSPARENT);
    }

    #[test]
    fn blur_on_short_canvas_is_noop() {
        let mut canvas = Canvas::from_fn(3, 2, |x, _| Pixel::gray(u8::try_from(x * 9).unwrap_or(0)));
        let before = canvas.clone();
        blur(&mut canvas);
        motion_blur_down(&mut canvas);
        assert_eq!(canvas, before);
    }

    #[test]
    fn uniform_canvas_survives_blurs() {
        let mut canvas = Canvas::from_fn(8, 8, |_, _| Pixel::opaque(12, 3, 27));
        let before = canvas.clone();
        blur(&mut canvas);
        blur_hard(&mut canvas);
        motion_blur_right(&mut canvas);
        motion_blur_down(&mut canvas);
        assert_eq!(canvas, before);
    }

    #[test]
    fn motion_blur_right_keeps_transparent_and_last_column() {
        let mut canvas = Canvas::from_fn(4, 1, |x, _| match x {
            0 => Pixel::gray(0),
            1 => Pixel::gray(10),
            2 => Pixel::new(3, 3, 3, 0),
            _ => Pixel::gray(20),
        });
        motion_blur_right(&mut canvas);
        // diff 10 -> factor 26 -> 8.
        assert_eq!(canvas.pixel(1, 0), Pixel::gray(8));
        assert_eq!(canvas.pixel(2, 0), Pixel::new(3, 3, 3, 0));
        assert_eq!(canvas.pixel(3, 0), Pixel::gray(20));
    }

    /// Gray levels 0, 10, 10, 10, 20 along one scan line.
    fn motion_levels(i: u32) -> Pixel {
        Pixel::gray([0, 10, 10, 10, 20][i as usize])
    }

    /// Expected result of running a motion blur over [`motion_levels`].
    /// The second smudged pixel compares against the written 8, not the
    /// original 10: diff 2, factor 30, 10 * 30 / 31 = 9.
    const MOTION_EXPECTED: [u8; 5] = [0, 8, 9, 10, 20];

    #[test]
    fn motion_blur_right_threads_running_output() {
        let mut canvas = Canvas::from_fn(5, 1, |x, _| motion_levels(x));
        motion_blur_right(&mut canvas);
        for (x, &level) in (0..).zip(&MOTION_EXPECTED) {
            assert_eq!(canvas.pixel(x, 0), Pixel::gray(level), "column {x}");
        }
    }

    #[test]
    fn motion_blur_down_threads_running_output() {
        let mut canvas = Canvas::from_fn(1, 5, |_, y| motion_levels(y));
        motion_blur_down(&mut canvas);
        for (y, &level) in (0..).zip(&MOTION_EXPECTED) {
            assert_eq!(canvas.pixel(0, y), Pixel::gray(level), "row {y}");
        }
    }

    #[test]
    fn black_outline_is_identity_without_transparency() {
        let mut canvas = Canvas::from_fn(6, 5, |x, y| {
            let v = |n: u32| u8::try_from(n % 31 + 1).unwrap_or(1);
            Pixel::opaque(v(x * 3), v(y * 11), v(x + y))
        });
        let before = canvas.clone();
        black_outline(&mut canvas);
        assert_eq!(canvas, before);
    }

    #[test]
    fn black_outline_traces_region_border() {
        let mut canvas = framed(6, 6);
        black_outline(&mut canvas);
        for y in 0..6 {
            for x in 0..6 {
                let p = canvas.pixel(x, y);
                let on_frame = x == 0 || y == 0 || x == 5 || y == 5;
                let on_ring = !on_frame && (x == 1 || y == 1 || x == 4 || y == 4);
                if on_frame {
                    assert_eq!(p, Pixel::TRANSPARENT, "frame at ({x},{y})");
                } else if on_ring {
                    assert_eq!(p, Pixel::BLACK, "ring at ({x},{y})");
                } else {
                    assert_ne!(p, Pixel::BLACK, "interior at ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn black_outline_single_column_turns_black() {
        let mut canvas = Canvas::from_fn(1, 3, |_, _| Pixel::gray(20));
        black_outline(&mut canvas);
        assert!(canvas.pixels().iter().all(|&p| p == Pixel::BLACK));
    }

    #[test]
    fn invert_clears_transparent_pixels() {
        let mut canvas = Canvas::from_fn(2, 1, |x, _| {
            if x == 0 { Pixel::opaque(1, 2, 3) } else { Pixel::new(9, 9, 9, 0) }
        });
        invert(&mut canvas);
        assert_eq!(canvas.pixel(0, 0), Pixel::opaque(30, 29, 28));
        assert_eq!(canvas.pixel(1, 0), Pixel::TRANSPARENT);
    }

    #[test]
    fn shimmer_keeps_uniform_canvas() {
        let mut canvas = Canvas::from_fn(5, 5, |_, _| Pixel::opaque(4, 8, 16));
        let before = canvas.clone();
        shimmer(&mut canvas);
        assert_eq!(canvas, before);
    }

    #[test]
    fn every_pass_keeps_channels_in_range() {
        let effects = [
            Effect::Grayscale,
            Effect::RedChannelGrayscale { delta: 7 },
            Effect::RedChannelGrayscaleHighlight { highlight: 4 },
            Effect::Blur,
            Effect::BlurHard,
            Effect::Shimmer,
            Effect::MotionBlurRight,
            Effect::MotionBlurDown,
            Effect::BlackOutline,
            Effect::Invert,
            Effect::PersonalityColor { personality: 200 },
            Effect::BlackAndWhite,
            Effect::Pointillism,
        ];
        for effect in effects {
            let mut canvas = framed(70, 66);
            effect.apply(&mut canvas);
            assert_five_bit(&canvas);
        }
    }

    #[test]
    fn pointillism_changes_a_full_tile() {
        let mut canvas = Canvas::from_fn(64, 64, |_, _| Pixel::gray(15));
        pointillism(&mut canvas);
        assert_five_bit(&canvas);
        let changed = canvas.pixels().iter().filter(|&&p| p != Pixel::gray(15)).count();
        assert!(changed > 64 * 64 / 4, "expected heavy speckling, {changed} pixels changed");
    }

    #[test]
    fn effect_serde_uses_tagged_snake_case() {
        let json = r#"{"kind":"red_channel_grayscale","delta":2}"#;
        let effect: Effect = serde_json::from_str(json).unwrap_or(Effect::Invert);
        assert_eq!(effect, Effect::RedChannelGrayscale { delta: 2 });
        assert_eq!(effect.name(), "red_channel_grayscale");
    }
}
