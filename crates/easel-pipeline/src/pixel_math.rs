//! Per-pixel color math shared by the effect passes and quantizers.
//!
//! Every function here is pure: it computes one output pixel from one,
//! two or three input pixels. Outputs always have channels in 0..=31 and
//! keep the alpha of the pixel being transformed.

use serde::{Deserialize, Serialize};

use crate::types::{MAX_CHANNEL, Pixel};

/// How strongly [`blur`]-style smudging darkens a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurStrength {
    /// Darken by half the brightness difference.
    #[default]
    Normal,
    /// Darken by the full brightness difference.
    Hard,
}

impl BlurStrength {
    /// Darkening factor (out of 31) for a brightness difference.
    #[must_use]
    pub fn factor(self, diff: u32) -> u32 {
        let max = u32::from(MAX_CHANNEL);
        match self {
            Self::Normal => max.saturating_sub(diff / 2),
            Self::Hard => max.saturating_sub(diff),
        }
    }
}

/// Negative of a pixel: every color channel becomes `31 - channel`.
#[must_use]
pub const fn invert(pixel: Pixel) -> Pixel {
    Pixel::new(
        MAX_CHANNEL.saturating_sub(pixel.r),
        MAX_CHANNEL.saturating_sub(pixel.g),
        MAX_CHANNEL.saturating_sub(pixel.b),
        pixel.a,
    )
}

/// Smudge `cur` against its vertical neighbors.
///
/// This is not a Gaussian blur. It compares the channel averages of the
/// three pixels and darkens `cur` in proportion to the larger of the two
/// brightness steps, so edges between light and dark areas turn into
/// dark seams.
#[must_use]
pub fn blur(prev: Pixel, cur: Pixel, next: Pixel) -> Pixel {
    smudge(prev, cur, next, BlurStrength::Normal)
}

/// [`blur`] with the full brightness difference applied.
#[must_use]
pub fn blur_hard(prev: Pixel, cur: Pixel, next: Pixel) -> Pixel {
    smudge(prev, cur, next, BlurStrength::Hard)
}

/// Shared body of [`blur`] and [`blur_hard`].
#[must_use]
pub fn smudge(prev: Pixel, cur: Pixel, next: Pixel, strength: BlurStrength) -> Pixel {
    if prev == cur && next == cur {
        return cur;
    }

    let prev_avg = u32::from(prev.channel_average());
    let cur_avg = u32::from(cur.channel_average());
    let next_avg = u32::from(next.channel_average());
    if prev_avg == cur_avg && next_avg == cur_avg {
        return cur;
    }

    let diff = cur_avg.abs_diff(prev_avg).max(cur_avg.abs_diff(next_avg));
    cur.scaled(strength.factor(diff))
}

/// Smudge `cur` against the previous pixel along a scan line.
///
/// Light pixels (all channels above 25) on either side are left alone.
#[must_use]
pub fn motion_blur(prev: Pixel, cur: Pixel) -> Pixel {
    if prev == cur || prev.is_light() || cur.is_light() {
        return cur;
    }

    let diff = u32::from(prev.r.abs_diff(cur.r))
        .max(u32::from(prev.g.abs_diff(cur.g)))
        .max(u32::from(prev.b.abs_diff(cur.b)));
    cur.scaled(BlurStrength::Normal.factor(diff))
}

/// Outline `pixel` in black if its `neighbor` is empty space.
///
/// Black stays black, transparent stays (fully) transparent, and an
/// opaque pixel next to a transparent one becomes opaque black.
#[must_use]
pub const fn black_outline(pixel: Pixel, neighbor: Pixel) -> Pixel {
    if pixel.is_black() {
        return pixel;
    }
    if !pixel.is_opaque() {
        return Pixel::TRANSPARENT;
    }
    if !neighbor.is_opaque() {
        return Pixel::BLACK;
    }
    pixel
}

/// One of the six hue families a personality value selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hue {
    /// Green + blue.
    Teal,
    /// Red + green.
    Yellow,
    /// Red + blue.
    Purple,
    /// Red only.
    Red,
    /// Blue only.
    Blue,
    /// Green only.
    Green,
}

impl Hue {
    /// The hue selected by `personality % 6`.
    #[must_use]
    pub const fn from_personality(personality: u8) -> Self {
        match personality % 6 {
            0 => Self::Teal,
            1 => Self::Yellow,
            2 => Self::Purple,
            3 => Self::Red,
            4 => Self::Blue,
            _ => Self::Green,
        }
    }

    /// Channel magnitude before the personality strength is subtracted.
    ///
    /// Single-channel hues are brighter to compensate for lighting one
    /// channel instead of two.
    #[must_use]
    pub const fn base_magnitude(self) -> u8 {
        match self {
            Self::Teal | Self::Yellow | Self::Purple => 21,
            Self::Red | Self::Blue | Self::Green => 23,
        }
    }

    /// The opaque color of this hue at the given magnitude.
    #[must_use]
    pub const fn color(self, magnitude: u8) -> Pixel {
        let m = magnitude;
        match self {
            Self::Teal => Pixel::opaque(0, m, m),
            Self::Yellow => Pixel::opaque(m, m, 0),
            Self::Purple => Pixel::opaque(m, 0, m),
            Self::Red => Pixel::opaque(m, 0, 0),
            Self::Blue => Pixel::opaque(0, 0, m),
            Self::Green => Pixel::opaque(0, m, 0),
        }
    }
}

/// The solid color a personality value paints dark areas with.
#[must_use]
pub const fn personality_hue(personality: u8) -> Pixel {
    let hue = Hue::from_personality(personality);
    let strength = (personality / 6) % 3;
    hue.color(hue.base_magnitude() - strength)
}

/// Dark pixels take the personality hue, everything else turns white.
#[must_use]
pub const fn personality_color(pixel: Pixel, personality: u8) -> Pixel {
    if pixel.is_dark() {
        personality_hue(personality)
    } else {
        Pixel::WHITE
    }
}

/// Threshold a pixel to opaque black or opaque white.
#[must_use]
pub const fn black_and_white(pixel: Pixel) -> Pixel {
    if pixel.is_dark() {
        Pixel::BLACK
    } else {
        Pixel::WHITE
    }
}
