//! Recipe diagnostics: timing and palette usage for each pass.
//!
//! [`apply_with_diagnostics`] runs a recipe exactly like
//! [`Recipe::apply`] while recording how long each effect pass and the
//! quantizer took, plus how full the resulting palette is.
//!
//! Timestamps come from an injected [`Clock`] so this crate stays free
//! of platform time sources. Durations are serialized as fractional
//! seconds (`f64`) for JSON compatibility, since `std::time::Duration`
//! does not implement serde traits.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::quantize::{OVERFLOW_INDEX, Quantizer, QuantizerKind};
use crate::recipe::Recipe;
use crate::types::Palette;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of timestamps for diagnostics.
///
/// Callers supply the platform clock, e.g. one backed by
/// `std::time::Instant` on native targets.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics collected from a single recipe run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDiagnostics {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// One entry per effect pass, in execution order.
    pub passes: Vec<PassDiagnostics>,
    /// The final quantization step.
    pub quantize: QuantizeDiagnostics,
    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
}

/// Diagnostics for a single effect pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassDiagnostics {
    /// Effect name, as returned by [`Effect::name`](crate::effect::Effect::name).
    pub name: String,
    /// Wall-clock duration of this pass (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

/// Diagnostics for the quantization step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantizeDiagnostics {
    /// Quantizer name.
    pub quantizer: String,
    /// Wall-clock duration of quantization (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Number of entries in the returned palette.
    pub capacity: usize,
    /// Distinct non-transparent palette slots referenced by the canvas.
    pub slots_used: usize,
    /// Number of opaque pixels quantized.
    pub opaque_pixels: usize,
    /// Opaque pixels that did not fit the standard palette.
    pub overflow_pixels: usize,
}

/// Run `recipe` on `canvas`, collecting per-pass diagnostics.
///
/// Produces exactly the same canvas and palette as [`Recipe::apply`].
pub fn apply_with_diagnostics<C: Clock>(
    recipe: &Recipe,
    canvas: &mut Canvas,
    clock: &C,
) -> (Palette, RecipeDiagnostics) {
    let start = clock.now();

    let mut passes = Vec::with_capacity(recipe.effects.len());
    for effect in &recipe.effects {
        let t = clock.now();
        effect.apply(canvas);
        passes.push(PassDiagnostics {
            name: effect.name().to_owned(),
            duration: clock.elapsed(&t),
        });
    }

    let t = clock.now();
    let palette = recipe.quantizer.quantize(canvas);
    let duration = clock.elapsed(&t);
    let quantize = quantize_metrics(recipe.quantizer, canvas, &palette, duration);

    let diagnostics = RecipeDiagnostics {
        width: canvas.width(),
        height: canvas.height(),
        passes,
        quantize,
        total_duration: clock.elapsed(&start),
    };
    (palette, diagnostics)
}

fn quantize_metrics(
    kind: QuantizerKind,
    canvas: &Canvas,
    palette: &Palette,
    duration: Duration,
) -> QuantizeDiagnostics {
    let slots: BTreeSet<_> = canvas.indexes().iter().copied().filter(|&i| i != 0).collect();
    let overflow_pixels = if kind == QuantizerKind::Standard {
        canvas
            .indexes()
            .iter()
            .filter(|&&i| i == OVERFLOW_INDEX)
            .count()
    } else {
        0
    };
    QuantizeDiagnostics {
        quantizer: kind.name().to_owned(),
        duration,
        capacity: palette.len(),
        slots_used: slots.len(),
        opaque_pixels: canvas.opaque_count(),
        overflow_pixels,
    }
}

impl RecipeDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Painting Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Canvas: {}x{} ({} opaque pixels)",
            self.width, self.height, self.quantize.opaque_pixels,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<32} {:>10} {:>10}",
            "Pass", "Duration", "% Total"
        ));
        lines.push("-".repeat(60));

        let total_ms = duration_ms(self.total_duration);
        let quantize_label = format!("quantize ({})", self.quantize.quantizer);
        let rows = self
            .passes
            .iter()
            .map(|p| (p.name.as_str(), p.duration))
            .chain(std::iter::once((
                quantize_label.as_str(),
                self.quantize.duration,
            )));

        for (name, duration) in rows {
            let ms = duration_ms(duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!("{name:<32} {ms:>8.3}ms {pct:>9.1}%"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Palette: {} of {} slots used  |  Overflow pixels: {}",
            self.quantize.slots_used, self.quantize.capacity, self.quantize.overflow_pixels,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
