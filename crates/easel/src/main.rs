//! easel: turn an image into a handheld-console contest painting.
//!
//! Decodes an image, reduces it to 5-bit color, runs one of the contest
//! category recipes (or a custom JSON recipe) and writes the quantized
//! painting as PNG. Optionally also writes the hardware BGR555 palette
//! and a JSON palette summary, and prints per-pass diagnostics.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin easel -- <INPUT> --output <PNG> [OPTIONS]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use easel_pipeline::diagnostics::Clock;
use easel_pipeline::{Recipe, convert};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Contest painting renderer.
///
/// Runs a painting recipe on an image and writes the palette-indexed
/// result, printing per-pass timing and palette usage diagnostics.
#[derive(Parser)]
#[command(name = "easel", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// Where to write the painted PNG.
    #[arg(long, short)]
    output: PathBuf,

    /// Contest category whose recipe to run.
    #[arg(long, value_enum, default_value_t = Category::Cool)]
    category: Category,

    /// Personality value (low byte) choosing the Cool category hue.
    #[arg(long, default_value_t = 0)]
    personality: u8,

    /// Full recipe as a JSON string.
    ///
    /// When provided, `--category` and `--personality` are ignored. The
    /// JSON must be a valid `Recipe` serialization.
    #[arg(long)]
    recipe_json: Option<String>,

    /// Write the palette as packed little-endian BGR555 to this file.
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Write a JSON palette summary to this file.
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,
}

/// Contest category selection.
#[derive(Clone, Copy, ValueEnum)]
enum Category {
    /// Black outline and a personality hue.
    Cool,
    /// Shimmering light outlines.
    Beauty,
    /// Pointillism speckles.
    Cute,
    /// Pencil sketch in grayscale.
    Smart,
    /// Brightened grayscale.
    Tough,
}

impl From<Category> for easel_pipeline::Category {
    fn from(category: Category) -> Self {
        match category {
            Category::Cool => Self::Cool,
            Category::Beauty => Self::Beauty,
            Category::Cute => Self::Cute,
            Category::Smart => Self::Smart,
            Category::Tough => Self::Tough,
        }
    }
}

/// Build the [`Recipe`] to run from CLI arguments.
///
/// If `--recipe-json` is provided, the JSON is parsed directly and the
/// category flags are ignored.
fn recipe_from_cli(cli: &Cli) -> Result<Recipe, String> {
    if let Some(ref json) = cli.recipe_json {
        return Recipe::from_json(json).map_err(|e| format!("Error parsing --recipe-json: {e}"));
    }
    Ok(easel_pipeline::Category::from(cli.category).recipe(cli.personality))
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let recipe = recipe_from_cli(cli)?;

    let image_bytes = std::fs::read(&cli.input)
        .map_err(|e| format!("Error reading {}: {e}", cli.input.display()))?;
    tracing::info!(
        input = %cli.input.display(),
        bytes = image_bytes.len(),
        "read image"
    );

    let mut canvas = convert::decode(&image_bytes).map_err(|e| format!("Painting error: {e}"))?;
    tracing::info!(
        width = canvas.width(),
        height = canvas.height(),
        passes = recipe.effects.len(),
        quantizer = recipe.quantizer.name(),
        "painting"
    );

    let (palette, diagnostics) =
        easel_pipeline::diagnostics::apply_with_diagnostics(&recipe, &mut canvas, &StdClock);

    if cli.json {
        let json = serde_json::to_string_pretty(&diagnostics)
            .map_err(|e| format!("Error serializing diagnostics: {e}"))?;
        println!("{json}");
    } else {
        println!("{}", diagnostics.report());
    }

    let png = easel_export::to_png(&canvas, &palette).map_err(|e| format!("Export error: {e}"))?;
    write_output(&cli.output, &png)?;

    if let Some(ref path) = cli.palette {
        write_output(path, &easel_export::to_bgr555(&palette))?;
    }

    if let Some(ref path) = cli.summary_json {
        let summary = easel_export::palette_summary(&canvas, &palette);
        let json = serde_json::to_vec_pretty(&summary)
            .map_err(|e| format!("Error serializing palette summary: {e}"))?;
        write_output(path, &json)?;
    }

    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), String> {
    std::fs::write(path, bytes).map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn category_flag_selects_recipe() {
        let cli = Cli::parse_from(["easel", "in.png", "-o", "out.png", "--category", "tough"]);
        let recipe = recipe_from_cli(&cli).unwrap();
        assert_eq!(recipe, easel_pipeline::Category::Tough.recipe(0));
    }

    #[test]
    fn recipe_json_overrides_category() {
        let cli = Cli::parse_from([
            "easel",
            "in.png",
            "--output",
            "out.png",
            "--category",
            "cute",
            "--recipe-json",
            r#"{"effects":[{"kind":"invert"}],"quantizer":"black_and_white"}"#,
        ]);
        let recipe = recipe_from_cli(&cli).unwrap();
        assert_eq!(recipe.effects, vec![easel_pipeline::Effect::Invert]);
        assert_eq!(
            recipe.quantizer,
            easel_pipeline::QuantizerKind::BlackAndWhite
        );
    }

    #[test]
    fn bad_recipe_json_is_an_error() {
        let cli = Cli::parse_from(["easel", "in.png", "-o", "out.png", "--recipe-json", "{"]);
        let err = recipe_from_cli(&cli).unwrap_err();
        assert!(err.starts_with("Error parsing --recipe-json"));
    }
}
