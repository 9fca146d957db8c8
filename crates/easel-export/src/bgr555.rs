//! Packed 15-bit palette export.
//!
//! Each palette entry becomes one little-endian `u16` holding
//! `r | g << 5 | b << 10`, the layout handheld hardware reads palettes
//! in. Alpha is not stored.

use easel_pipeline::{Palette, Pixel};

/// Pack one color as `r | g << 5 | b << 10`.
///
/// Channels are clamped to 5 bits first.
///
/// # Examples
///
/// ```
/// use easel_export::pack_bgr555;
/// use easel_pipeline::Pixel;
///
/// assert_eq!(pack_bgr555(Pixel::opaque(31, 0, 0)), 0x001F);
/// assert_eq!(pack_bgr555(Pixel::opaque(0, 0, 31)), 0x7C00);
/// ```
#[must_use]
pub fn pack_bgr555(color: Pixel) -> u16 {
    let c = color.clamped();
    u16::from(c.r) | (u16::from(c.g) << 5) | (u16::from(c.b) << 10)
}

/// Serialize the whole palette, two bytes per entry.
#[must_use]
pub fn to_bgr555(palette: &Palette) -> Vec<u8> {
    palette
        .colors()
        .iter()
        .flat_map(|&c| pack_bgr555(c).to_le_bytes())
        .collect()
}
