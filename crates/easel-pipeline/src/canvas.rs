//! The working canvas: a pixel grid and a parallel palette-index grid.
//!
//! Every other stage operates exclusively through [`Canvas`]. Both grids
//! are allocated once at construction and share the same dimensions.
//!
//! Coordinates are signed so that neighborhood filters can probe one
//! step past an edge without special casing. Out-of-bounds reads return
//! [`Pixel::TRANSPARENT`] (or index 0) and out-of-bounds writes are
//! silently discarded; no canvas operation can fail.

use crate::types::{PaletteIndex, Pixel};

/// A fixed-size pixel canvas with a parallel color-index layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    indexes: Vec<PaletteIndex>,
}

impl Canvas {
    /// Create a canvas with every pixel transparent and every index 0.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = grid_len(width, height);
        Self {
            width,
            height,
            pixels: vec![Pixel::TRANSPARENT; len],
            indexes: vec![0; len],
        }
    }

    /// Create a canvas whose pixel at `(x, y)` is `f(x, y)`.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Pixel) -> Self {
        let mut canvas = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if let Some(offset) = canvas.offset_unsigned(x, y) {
                    canvas.pixels[offset] = f(x, y);
                }
            }
        }
        canvas
    }

    /// Canvas width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Width and height as signed coordinates, for filter loops that step
    /// one pixel past the edges.
    #[must_use]
    pub fn signed_dimensions(&self) -> (i32, i32) {
        (
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }

    /// Returns `true` if `(x, y)` lies on the canvas.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.offset(x, y).is_some()
    }

    /// The pixel at `(x, y)`, or transparent black when out of bounds.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Pixel {
        self.offset(x, y)
            .map_or(Pixel::TRANSPARENT, |offset| self.pixels[offset])
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, pixel: Pixel) {
        if let Some(offset) = self.offset(x, y) {
            self.pixels[offset] = pixel;
        }
    }

    /// The palette index at `(x, y)`, or 0 when out of bounds.
    #[must_use]
    pub fn index(&self, x: i32, y: i32) -> PaletteIndex {
        self.offset(x, y).map_or(0, |offset| self.indexes[offset])
    }

    /// Overwrite the palette index at `(x, y)`. Out-of-bounds writes are
    /// ignored.
    pub fn set_index(&mut self, x: i32, y: i32, index: PaletteIndex) {
        if let Some(offset) = self.offset(x, y) {
            self.indexes[offset] = index;
        }
    }

    /// All pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// All palette indexes in row-major order.
    #[must_use]
    pub fn indexes(&self) -> &[PaletteIndex] {
        &self.indexes
    }

    /// Number of opaque pixels on the canvas.
    #[must_use]
    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_opaque()).count()
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        self.offset_unsigned(x, y)
    }

    fn offset_unsigned(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = usize::try_from(y).ok()?;
        let column = usize::try_from(x).ok()?;
        let stride = usize::try_from(self.width).ok()?;
        Some(row * stride + column)
    }
}

/// Number of cells in a `width` x `height` grid.
fn grid_len(width: u32, height: u32) -> usize {
    let w = usize::try_from(width).unwrap_or(0);
    let h = usize::try_from(height).unwrap_or(0);
    w.saturating_mul(h)
}
