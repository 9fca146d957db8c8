//! The pointillism point table and streak decoding.
//!
//! The table holds [`POINT_COUNT`] entries of three bytes each:
//!
//! ```text
//! [column, row, control]
//! control = 0b00LL_LCCD
//!             LLL  streak length (0..=7)
//!             CC   color type: 0/1 darken one channel, 2/3 lighten all
//!             D    direction: 0 down-left, 1 up-right
//! ```
//!
//! Column and row are local to a 64x64 tile. The effect pass stamps every
//! point into every whole tile of the canvas (see
//! [`effect::pointillism`](crate::effect::pointillism)).
//!
//! The table is built at compile time by [`build_table`] and is
//! immutable for the life of the process.

use crate::canvas::Canvas;
use crate::types::Pixel;

/// Number of entries in [`POINTILLISM_POINTS`].
pub const POINT_COUNT: usize = 3200;

/// Edge length of the square tile the table's coordinates live in.
pub const TILE_SIZE: u32 = 64;

/// Seed of the xorshift sequence the table is generated from.
const TABLE_SEED: u32 = 0x2E5F_0A1D;

/// The process-wide pointillism point table.
pub static POINTILLISM_POINTS: [[u8; 3]; POINT_COUNT] = build_table();

/// Generate the point table.
///
/// Each entry takes 18 bits from one xorshift32 step: 6 for the column,
/// 6 for the row and 6 for the control byte, so every field of the
/// encoding is reachable.
#[allow(clippy::cast_possible_truncation)]
const fn build_table() -> [[u8; 3]; POINT_COUNT] {
    let mut table = [[0; 3]; POINT_COUNT];
    let mut state = TABLE_SEED;
    let mut i = 0;
    while i < POINT_COUNT {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        table[i] = [
            (state & 0x3F) as u8,
            ((state >> 6) & 0x3F) as u8,
            ((state >> 12) & 0x3F) as u8,
        ];
        i += 1;
    }
    table
}

/// Whether a streak darkens or lightens the pixels it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakTone {
    /// Subtract the magnitude from one channel, flooring at 0.
    Darken,
    /// Add the magnitude to every channel, capping at 31.
    Lighten,
}

/// Which way a streak extends from its base point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakDirection {
    /// Step `k` sits at `(column - k, row + k)`.
    DownLeft,
    /// Every step after the first sits at `(column + 1, row - 1)`.
    UpRight,
}

/// A color channel selected for darkening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Red.
    Red,
    /// Green.
    Green,
    /// Blue.
    Blue,
}

/// One pixel touched by a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakStep {
    /// Canvas column.
    pub x: i32,
    /// Canvas row.
    pub y: i32,
    /// How far the pixel's channels move.
    pub magnitude: u8,
}

/// A decoded table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointillismPoint {
    /// Base column within the tile.
    pub column: u8,
    /// Base row within the tile.
    pub row: u8,
    /// Streak length in pixels (0..=7).
    pub length: u8,
    /// Darken or lighten.
    pub tone: StreakTone,
    /// Streak direction.
    pub direction: StreakDirection,
}

impl PointillismPoint {
    /// Decode a raw `[column, row, control]` triple.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        let [column, row, control] = bytes;
        let tone = match (control >> 1) & 3 {
            0 | 1 => StreakTone::Darken,
            _ => StreakTone::Lighten,
        };
        let direction = if control & 1 == 0 {
            StreakDirection::DownLeft
        } else {
            StreakDirection::UpRight
        };
        Self {
            column,
            row,
            length: (control >> 3) & 7,
            tone,
            direction,
        }
    }

    /// Decode table entry `point`, or `None` past the end of the table.
    #[must_use]
    pub fn get(point: usize) -> Option<Self> {
        POINTILLISM_POINTS.get(point).copied().map(Self::from_bytes)
    }

    /// The channel a [`StreakTone::Darken`] streak acts on, cycling
    /// red, green, blue with the streak length.
    #[must_use]
    pub const fn darkened_channel(self) -> Channel {
        match self.length % 3 {
            0 => Channel::Red,
            1 => Channel::Green,
            _ => Channel::Blue,
        }
    }

    /// The pixels this point touches when stamped into the tile whose
    /// top-left corner is `(origin_x, origin_y)`.
    ///
    /// Step 0 is the base point. A step past the right or bottom edge
    /// ends the streak and also drops the step before it; the base
    /// point's magnitude then shrinks to the number of steps kept. Steps
    /// past the left or top edge stay in the streak and paint nothing.
    #[must_use]
    pub fn streak(self, canvas: &Canvas, origin_x: i32, origin_y: i32) -> Vec<StreakStep> {
        let base_x = origin_x + i32::from(self.column);
        let base_y = origin_y + i32::from(self.row);
        let (width, height) = canvas.signed_dimensions();

        let mut steps = Vec::with_capacity(usize::from(self.length));
        steps.push(StreakStep {
            x: base_x,
            y: base_y,
            magnitude: self.length,
        });

        for k in 1..self.length {
            let (x, y) = match self.direction {
                StreakDirection::DownLeft => (base_x - i32::from(k), base_y + i32::from(k)),
                // Up-right streaks pile every step onto one pixel.
                StreakDirection::UpRight => (base_x + 1, base_y - 1),
            };
            if x >= width || y >= height {
                let kept = k - 1;
                steps.truncate(usize::from(kept));
                if let Some(base) = steps.first_mut() {
                    base.magnitude = kept;
                }
                return steps;
            }
            steps.push(StreakStep {
                x,
                y,
                magnitude: self.length - k,
            });
        }

        // A zero-length entry touches nothing.
        steps.truncate(usize::from(self.length));
        steps
    }

    /// Stamp this point into the tile at `(origin_x, origin_y)`.
    ///
    /// Only opaque pixels are modified.
    pub fn apply(self, canvas: &mut Canvas, origin_x: i32, origin_y: i32) {
        for step in self.streak(canvas, origin_x, origin_y) {
            let pixel = canvas.pixel(step.x, step.y);
            if pixel.is_opaque() {
                canvas.set_pixel(step.x, step.y, self.shade(pixel, step.magnitude));
            }
        }
    }

    fn shade(self, pixel: Pixel, magnitude: u8) -> Pixel {
        match self.tone {
            StreakTone::Darken => {
                let mut out = pixel;
                match self.darkened_channel() {
                    Channel::Red => out.r = out.r.saturating_sub(magnitude),
                    Channel::Green => out.g = out.g.saturating_sub(magnitude),
                    Channel::Blue => out.b = out.b.saturating_sub(magnitude),
                }
                out.clamped()
            }
            StreakTone::Lighten => {
                let m = u32::from(magnitude);
                pixel.with_channels(
                    u32::from(pixel.r) + m,
                    u32::from(pixel.g) + m,
                    u32::from(pixel.b) + m,
                )
            }
        }
    }
}

/// Stamp table entry `point` into every whole 64x64 tile of the canvas.
///
/// Tiles are visited column by column. Partial tiles at the right and
/// bottom edges are skipped. Out-of-range points are ignored.
pub fn apply_point(canvas: &mut Canvas, point: usize) {
    let Some(decoded) = PointillismPoint::get(point) else {
        return;
    };
    let tile = i32::try_from(TILE_SIZE).unwrap_or(i32::MAX);
    let (width, height) = canvas.signed_dimensions();
    for tile_x in 0..width / tile {
        for tile_y in 0..height / tile {
            decoded.apply(canvas, tile_x * tile, tile_y * tile);
        }
    }
}
