//! Recipes: an ordered list of effect passes followed by exactly one
//! quantizer.
//!
//! The five contest categories each have a fixed recipe, see
//! [`Category::recipe`]. Custom recipes can be described as JSON:
//!
//! ```text
//! {"effects":[{"kind":"black_outline"},{"kind":"invert"}],"quantizer":"black_and_white"}
//! ```

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::effect::Effect;
use crate::quantize::{Quantizer, QuantizerKind};
use crate::types::{PaintingError, Palette};

/// A complete painting recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Effect passes, applied in order.
    #[serde(default)]
    pub effects: Vec<Effect>,
    /// The quantizer run once after every effect.
    #[serde(default)]
    pub quantizer: QuantizerKind,
}

impl Recipe {
    /// Parse a recipe from its JSON description.
    ///
    /// # Errors
    ///
    /// Returns [`PaintingError::InvalidRecipe`] if the JSON does not
    /// describe a recipe.
    pub fn from_json(json: &str) -> Result<Self, PaintingError> {
        serde_json::from_str(json).map_err(|e| PaintingError::InvalidRecipe(e.to_string()))
    }

    /// Run every effect on the canvas, then quantize it.
    ///
    /// The canvas pixel grid holds the filtered image afterwards and its
    /// index layer refers to the returned palette.
    #[must_use = "returns the palette the canvas indexes refer to"]
    pub fn apply(&self, canvas: &mut Canvas) -> Palette {
        for effect in &self.effects {
            effect.apply(canvas);
        }
        self.quantizer.quantize(canvas)
    }
}

/// The five contest categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Black outline and a personality hue.
    Cool,
    /// Shimmering light outlines.
    Beauty,
    /// Pointillism speckles.
    Cute,
    /// Smudged black-and-white pencil sketch in grayscale.
    Smart,
    /// Brightened grayscale.
    Tough,
}

impl Category {
    /// Every category, in contest order.
    pub const ALL: [Self; 5] = [Self::Cool, Self::Beauty, Self::Cute, Self::Smart, Self::Tough];

    /// The recipe painting this category.
    ///
    /// `personality` only affects [`Category::Cool`].
    #[must_use]
    pub fn recipe(self, personality: u8) -> Recipe {
        let (effects, quantizer) = match self {
            Self::Cool => (
                vec![Effect::BlackOutline, Effect::PersonalityColor { personality }],
                QuantizerKind::Standard,
            ),
            Self::Beauty => (vec![Effect::Shimmer], QuantizerKind::Standard),
            Self::Cute => (vec![Effect::Pointillism], QuantizerKind::Standard),
            Self::Smart => (
                vec![
                    Effect::BlackOutline,
                    Effect::MotionBlurRight,
                    Effect::MotionBlurDown,
                    Effect::BlackAndWhite,
                    Effect::Blur,
                    Effect::Blur,
                    Effect::RedChannelGrayscale { delta: 2 },
                    Effect::RedChannelGrayscaleHighlight { highlight: 4 },
                ],
                QuantizerKind::Grayscale,
            ),
            Self::Tough => (
                vec![Effect::Grayscale, Effect::RedChannelGrayscale { delta: 3 }],
                QuantizerKind::Grayscale,
            ),
        };
        Recipe { effects, quantizer }
    }

    /// Short snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cool => "cool",
            Self::Beauty => "beauty",
            Self::Cute => "cute",
            Self::Smart => "smart",
            Self::Tough => "tough",
        }
    }
}
