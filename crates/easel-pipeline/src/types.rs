//! Shared types for the easel painting pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference decoded
/// and rendered images without depending on `image` directly.
pub use image::RgbaImage;

/// Largest value a color channel can hold (5-bit channel depth).
pub const MAX_CHANNEL: u8 = 31;

/// Alpha value of a fully opaque pixel. Every other alpha is transparent.
pub const OPAQUE: u8 = 255;

/// Index into a [`Palette`]. Index 0 always means "transparent".
pub type PaletteIndex = u8;

/// A single canvas pixel: three 5-bit color channels and a binary alpha.
///
/// Only alpha values 0 and 255 are meaningful; the pipeline treats any
/// alpha other than [`OPAQUE`] as transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pixel {
    /// Red channel, 0..=31.
    pub r: u8,
    /// Green channel, 0..=31.
    pub g: u8,
    /// Blue channel, 0..=31.
    pub b: u8,
    /// Alpha: 0 (transparent) or 255 (opaque).
    pub a: u8,
}

impl Pixel {
    /// Fully transparent black, the value of every unset or
    /// out-of-bounds pixel.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// Opaque white at full 5-bit intensity.
    pub const WHITE: Self = Self::opaque(MAX_CHANNEL, MAX_CHANNEL, MAX_CHANNEL);

    /// Create a pixel from raw channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque pixel.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, OPAQUE)
    }

    /// Create an opaque solid gray.
    #[must_use]
    pub const fn gray(level: u8) -> Self {
        Self::opaque(level, level, level)
    }

    /// Returns `true` if the pixel is fully opaque.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == OPAQUE
    }

    /// Integer mean of the three color channels.
    #[must_use]
    pub fn channel_average(self) -> u8 {
        let sum = u16::from(self.r) + u16::from(self.g) + u16::from(self.b);
        // The mean of three u8 values always fits in a u8.
        u8::try_from(sum / 3).unwrap_or(u8::MAX)
    }

    /// Returns `true` if every color channel is below 17.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        self.r < 17 && self.g < 17 && self.b < 17
    }

    /// Returns `true` if every color channel is above 25.
    #[must_use]
    pub const fn is_light(self) -> bool {
        self.r > 25 && self.g > 25 && self.b > 25
    }

    /// Returns `true` for pure opaque black.
    #[must_use]
    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0 && self.a == OPAQUE
    }

    /// Replace the color channels, clamping each to [`MAX_CHANNEL`].
    ///
    /// Alpha is kept unchanged.
    #[must_use]
    pub fn with_channels(self, r: u32, g: u32, b: u32) -> Self {
        Self::new(clamp_channel(r), clamp_channel(g), clamp_channel(b), self.a)
    }

    /// Scale every color channel by `factor / 31` using integer
    /// division, keeping alpha.
    #[must_use]
    pub fn scaled(self, factor: u32) -> Self {
        let scale = |c: u8| u32::from(c) * factor / u32::from(MAX_CHANNEL);
        self.with_channels(scale(self.r), scale(self.g), scale(self.b))
    }

    /// The same pixel with every color channel clamped to [`MAX_CHANNEL`].
    #[must_use]
    pub fn clamped(self) -> Self {
        self.with_channels(u32::from(self.r), u32::from(self.g), u32::from(self.b))
    }
}

/// Clamp a wide intermediate value into a 5-bit channel.
#[must_use]
pub fn clamp_channel(value: u32) -> u8 {
    u8::try_from(value.min(u32::from(MAX_CHANNEL))).unwrap_or(MAX_CHANNEL)
}

/// An ordered palette produced by one quantization run.
///
/// Entry 0 is always [`Pixel::TRANSPARENT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette(Vec<Pixel>);

impl Palette {
    /// Create a palette from a vector of colors.
    #[must_use]
    pub const fn new(colors: Vec<Pixel>) -> Self {
        Self(colors)
    }

    /// Number of entries in the palette (its capacity, including unused
    /// slots).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the palette has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The color at `index`, or [`Pixel::TRANSPARENT`] when the index is
    /// outside the palette.
    #[must_use]
    pub fn get(&self, index: PaletteIndex) -> Pixel {
        self.0
            .get(usize::from(index))
            .copied()
            .unwrap_or(Pixel::TRANSPARENT)
    }

    /// Returns a slice of all colors.
    #[must_use]
    pub fn colors(&self) -> &[Pixel] {
        &self.0
    }

    /// Consumes the palette and returns the underlying colors.
    #[must_use]
    pub fn into_colors(self) -> Vec<Pixel> {
        self.0
    }
}

/// Errors that can occur around the painting pipeline.
///
/// The canvas, filters and quantizers never fail; only decoding input
/// images and parsing recipes can.
#[derive(Debug, thiserror::Error)]
pub enum PaintingError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// A recipe description could not be understood.
    #[error("invalid recipe: {0}")]
    InvalidRecipe(String),
}
