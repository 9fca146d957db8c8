//! easel-export: Pure format serializers for paintings (sans-IO).
//!
//! Converts a quantized [`Canvas`](easel_pipeline::Canvas) and its
//! [`Palette`](easel_pipeline::Palette) into output formats: an RGBA PNG
//! image, a packed 15-bit BGR palette dump, and a JSON-friendly palette
//! summary. Every function returns in-memory data; writing files is the
//! caller's job.

pub mod bgr555;
pub mod png;
pub mod summary;

pub use bgr555::{pack_bgr555, to_bgr555};
pub use png::to_png;
pub use summary::{PaletteEntry, palette_summary};

/// Errors that can occur while exporting a painting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The image encoder rejected the rendered painting.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}
