//! Palette quantization: reduce a filtered canvas to a small indexed
//! palette.
//!
//! This module defines the [`Quantizer`] trait and the
//! [`QuantizerKind`] enum selecting one of the five fixed strategies.
//! Every strategy fills the canvas index layer and returns the palette
//! the indexes refer to. Transparent pixels always get index 0, and
//! palette entry 0 is always [`Pixel::TRANSPARENT`].
//!
//! Only [`QuantizerKind::Standard`] builds its palette dynamically. It
//! assigns slots first-fit in row-major scan order, so the scan order is
//! part of its output contract.

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::pixel_math;
use crate::types::{MAX_CHANNEL, Palette, PaletteIndex, Pixel};

/// Capacity of the standard palette.
pub const STANDARD_CAPACITY: usize = 224;

/// Slot marking pixels that did not fit in the standard palette.
pub const OVERFLOW_INDEX: PaletteIndex = 223;

/// Color shown for [`OVERFLOW_INDEX`].
pub const OVERFLOW_COLOR: Pixel = Pixel::opaque(15, 15, 15);

/// The fixed 16-entry primary-colors palette.
pub const PRIMARY_COLORS: [Pixel; 16] = [
    Pixel::TRANSPARENT,
    Pixel::opaque(6, 6, 6),
    Pixel::opaque(29, 29, 29),
    Pixel::opaque(11, 11, 11),
    Pixel::opaque(29, 6, 6),
    Pixel::opaque(6, 29, 6),
    Pixel::opaque(6, 6, 29),
    Pixel::opaque(29, 29, 6),
    Pixel::opaque(29, 6, 29),
    Pixel::opaque(6, 29, 29),
    Pixel::opaque(29, 11, 6),
    Pixel::opaque(11, 29, 6),
    Pixel::opaque(6, 11, 29),
    Pixel::opaque(29, 6, 11),
    Pixel::opaque(6, 29, 11),
    Pixel::opaque(11, 6, 29),
];

/// Selects which quantization strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantizerKind {
    /// First-fit dynamic palette of up to 222 colors plus an overflow
    /// slot (224 entries).
    #[default]
    Standard,
    /// Fixed palette of bright primary colors (16 entries).
    PrimaryColors,
    /// 32 gray levels (33 entries).
    Grayscale,
    /// 15 even gray levels (16 entries).
    GrayscaleSmall,
    /// Black and white (3 entries).
    BlackAndWhite,
}

impl QuantizerKind {
    /// Number of entries in the palette this strategy returns.
    #[must_use]
    pub const fn capacity(self) -> usize {
        match self {
            Self::Standard => STANDARD_CAPACITY,
            Self::PrimaryColors | Self::GrayscaleSmall => 16,
            Self::Grayscale => 33,
            Self::BlackAndWhite => 3,
        }
    }

    /// Short snake-case name, used in logs and diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::PrimaryColors => "primary_colors",
            Self::Grayscale => "grayscale",
            Self::GrayscaleSmall => "grayscale_small",
            Self::BlackAndWhite => "black_and_white",
        }
    }
}

/// Trait for quantization strategies.
///
/// Input: a fully filtered canvas. Output: the palette, with the canvas
/// index layer rewritten to refer to it.
pub trait Quantizer {
    /// Quantize the canvas in place and return its palette.
    fn quantize(&self, canvas: &mut Canvas) -> Palette;
}

impl Quantizer for QuantizerKind {
    fn quantize(&self, canvas: &mut Canvas) -> Palette {
        tracing::debug!(
            quantizer = self.name(),
            width = canvas.width(),
            height = canvas.height(),
            "quantizing canvas"
        );
        match *self {
            Self::Standard => quantize_standard(canvas),
            Self::PrimaryColors => {
                assign_column_major(canvas, primary_color_index);
                Palette::new(PRIMARY_COLORS.to_vec())
            }
            Self::Grayscale => {
                assign_column_major(canvas, grayscale_index);
                grayscale_palette()
            }
            Self::GrayscaleSmall => {
                assign_column_major(canvas, grayscale_small_index);
                grayscale_small_palette()
            }
            Self::BlackAndWhite => {
                assign_column_major(canvas, black_and_white_index);
                Palette::new(vec![Pixel::TRANSPARENT, Pixel::BLACK, Pixel::WHITE])
            }
        }
    }
}

/// Set every index from a pure per-pixel classifier, column by column.
///
/// Transparent pixels get index 0 without consulting `classify`.
fn assign_column_major(canvas: &mut Canvas, classify: impl Fn(Pixel) -> PaletteIndex) {
    let (width, height) = canvas.signed_dimensions();
    for x in 0..width {
        for y in 0..height {
            let pixel = canvas.pixel(x, y);
            let index = if pixel.is_opaque() { classify(pixel) } else { 0 };
            canvas.set_index(x, y, index);
        }
    }
}

// ---------------------------------------------------------------------------
// Standard (first-fit)
// ---------------------------------------------------------------------------

/// A palette under first-fit construction.
///
/// Slots `1..OVERFLOW_INDEX` fill in order of first appearance. A color
/// already present reuses its slot; once every slot is taken, new colors
/// map to [`OVERFLOW_INDEX`].
#[derive(Debug, Clone)]
pub struct FirstFitPalette {
    colors: Vec<Pixel>,
    /// Next empty slot. Slots below it are all occupied.
    next_free: usize,
    overflowed: usize,
}

impl Default for FirstFitPalette {
    fn default() -> Self {
        Self::new()
    }
}

impl FirstFitPalette {
    /// An empty standard palette: transparent slot 0, empty slots, and
    /// the overflow color in the last slot.
    #[must_use]
    pub fn new() -> Self {
        let mut colors = vec![Pixel::TRANSPARENT; STANDARD_CAPACITY];
        colors[usize::from(OVERFLOW_INDEX)] = OVERFLOW_COLOR;
        Self {
            colors,
            next_free: 1,
            overflowed: 0,
        }
    }

    /// The slot for `color`, inserting it into the first empty slot if it
    /// is new.
    pub fn assign(&mut self, color: Pixel) -> PaletteIndex {
        let occupied = &self.colors[1..self.next_free];
        if let Some(position) = occupied.iter().position(|&c| c == color) {
            return slot_index(position + 1);
        }
        if self.next_free < usize::from(OVERFLOW_INDEX) {
            let slot = self.next_free;
            self.colors[slot] = color;
            self.next_free += 1;
            return slot_index(slot);
        }
        self.overflowed += 1;
        OVERFLOW_INDEX
    }

    /// Number of distinct colors assigned so far.
    #[must_use]
    pub const fn used(&self) -> usize {
        self.next_free - 1
    }

    /// Number of assignments that fell through to [`OVERFLOW_INDEX`].
    #[must_use]
    pub const fn overflowed(&self) -> usize {
        self.overflowed
    }

    /// Finish construction.
    #[must_use]
    pub fn into_palette(self) -> Palette {
        Palette::new(self.colors)
    }
}

/// Palette slots are bounded by [`STANDARD_CAPACITY`], which fits a
/// [`PaletteIndex`].
fn slot_index(slot: usize) -> PaletteIndex {
    PaletteIndex::try_from(slot).unwrap_or(OVERFLOW_INDEX)
}

/// Round a channel up to a multiple of 4, then clamp it to 6..=30.
#[must_use]
pub fn quantize_channel_standard(channel: u8) -> u8 {
    let mut c = channel.min(MAX_CHANNEL);
    if c & 3 != 0 {
        c = (c & 0x1C) + 4;
    }
    c.clamp(6, 30)
}

/// The standard-palette color an opaque pixel is reduced to.
#[must_use]
pub fn quantize_pixel_standard(pixel: Pixel) -> Pixel {
    Pixel::new(
        quantize_channel_standard(pixel.r),
        quantize_channel_standard(pixel.g),
        quantize_channel_standard(pixel.b),
        pixel.a,
    )
}

/// First-fit quantization in row-major order.
///
/// Earlier distinct colors always occupy lower slots.
#[must_use = "returns the palette the canvas indexes refer to"]
pub fn quantize_standard(canvas: &mut Canvas) -> Palette {
    let mut palette = FirstFitPalette::new();
    let (width, height) = canvas.signed_dimensions();
    for y in 0..height {
        for x in 0..width {
            let pixel = canvas.pixel(x, y);
            let index = if pixel.is_opaque() {
                palette.assign(quantize_pixel_standard(pixel))
            } else {
                0
            };
            canvas.set_index(x, y, index);
        }
    }

    if palette.overflowed() > 0 {
        tracing::warn!(
            colors = palette.used(),
            overflow_pixels = palette.overflowed(),
            "standard palette overflowed, marking excess pixels gray"
        );
    }
    palette.into_palette()
}

// ---------------------------------------------------------------------------
// Fixed palettes
// ---------------------------------------------------------------------------

/// Classify an opaque pixel into [`PRIMARY_COLORS`] (indexes 1..=15).
///
/// A channel counts as strong above 19 and as present above 11; near-ties
/// between two present channels are settled by comparing them.
#[must_use]
pub const fn primary_color_index(pixel: Pixel) -> PaletteIndex {
    let Pixel { r, g, b, .. } = pixel;

    if r < 12 && g < 11 && b < 11 {
        return 1;
    }
    if r > 19 && g > 19 && b > 19 {
        return 2;
    }

    // Two strong channels: the third decides between white and a
    // secondary color.
    if r > 19 {
        if g > 19 {
            return if b > 14 { 2 } else { 7 };
        } else if b > 19 {
            return if g > 14 { 2 } else { 8 };
        }
    }
    if g > 19 && b > 19 {
        return if r > 14 { 2 } else { 9 };
    }

    // One strong channel.
    if r > 19 {
        if g > 11 {
            if b > 11 {
                return if g < b { 8 } else { 7 };
            }
            return 10;
        }
        return if b > 11 { 13 } else { 4 };
    }
    if g > 19 {
        if r > 11 {
            if b > 11 {
                return if r < b { 9 } else { 7 };
            }
            return 11;
        }
        return if b > 11 { 14 } else { 5 };
    }
    if b > 19 {
        if r > 11 {
            if g > 11 {
                return if r < g { 9 } else { 8 };
            }
        } else if g > 11 {
            return 12;
        }
        // Blue is always strong here, so this is the tinted blue slot.
        return 15;
    }

    3
}

/// Grayscale index: mean channel level plus one.
#[must_use]
pub fn grayscale_index(pixel: Pixel) -> PaletteIndex {
    pixel.clamped().channel_average() + 1
}

/// The 33-entry grayscale palette: transparent, then levels 0..=31.
#[must_use]
pub fn grayscale_palette() -> Palette {
    let mut colors = Vec::with_capacity(33);
    colors.push(Pixel::TRANSPARENT);
    colors.extend((0..=MAX_CHANNEL).map(Pixel::gray));
    Palette::new(colors)
}

/// Small grayscale index: the mean level rounded down to even, halved;
/// black (mean 0 or 1) maps to index 1.
#[must_use]
pub fn grayscale_small_index(pixel: Pixel) -> PaletteIndex {
    let even = pixel.clamped().channel_average() & 0x1E;
    if even == 0 { 1 } else { even / 2 }
}

/// The 16-entry small grayscale palette: transparent, black, then even
/// levels 4..=30.
#[must_use]
pub fn grayscale_small_palette() -> Palette {
    let mut colors = Vec::with_capacity(16);
    colors.push(Pixel::TRANSPARENT);
    colors.push(Pixel::BLACK);
    colors.extend((0..14).map(|i| Pixel::gray(2 * (i + 2))));
    Palette::new(colors)
}

/// Black-and-white index: 1 for black, 2 for white.
#[must_use]
pub fn black_and_white_index(pixel: Pixel) -> PaletteIndex {
    if pixel_math::black_and_white(pixel) == Pixel::BLACK {
        1
    } else {
        2
    }
}
