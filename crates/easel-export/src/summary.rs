//! Palette summary: one record per palette slot with its usage count.

use easel_pipeline::{Canvas, Palette, PaletteIndex, Pixel};
use serde::{Deserialize, Serialize};

/// One palette slot as seen by a painting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Slot index.
    pub index: PaletteIndex,
    /// The 5-bit color stored in the slot.
    pub color: Pixel,
    /// The color as 8-bit `#rrggbb`.
    pub hex: String,
    /// Whether the slot is fully opaque.
    pub opaque: bool,
    /// Number of canvas pixels whose index is this slot.
    pub pixel_count: usize,
}

/// Summarize every palette slot, in index order.
///
/// Slots nobody references are included with a count of 0. Canvas
/// indexes outside the palette are not counted.
#[must_use]
pub fn palette_summary(canvas: &Canvas, palette: &Palette) -> Vec<PaletteEntry> {
    let mut counts = vec![0usize; palette.len()];
    for &index in canvas.indexes() {
        if let Some(count) = counts.get_mut(usize::from(index)) {
            *count += 1;
        }
    }

    palette
        .colors()
        .iter()
        .zip(counts)
        .zip(0..=PaletteIndex::MAX)
        .map(|((&color, pixel_count), index)| PaletteEntry {
            index,
            color,
            hex: hex(color),
            opaque: color.is_opaque(),
            pixel_count,
        })
        .collect()
}

fn hex(color: Pixel) -> String {
    let c = color.clamped();
    format!("#{:02x}{:02x}{:02x}", c.r << 3, c.g << 3, c.b << 3)
}
