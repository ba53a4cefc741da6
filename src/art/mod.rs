//! Item art
//!
//! The generator hands each item's visual family, material palette and
//! complexity to an [`ArtGenerator`] and stores whatever comes back.
//! The built-in [`PixelArtGenerator`] draws small palette-tinted sprites.

pub mod pixel;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use pixel::PixelArtGenerator;

/// A 1×1 transparent PNG
pub const PLACEHOLDER_DATA_URL: &str =
    "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Which sprite family draws a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualFamily {
    Sword,
    Axe,
    Blunt,
    Bow,
    Staff,
    Armor,
    Robe,
    Shield,
    Headwear,
    Gloves,
    Footwear,
    Jewelry,
    Book,
    Potion,
}

impl VisualFamily {
    pub fn name(&self) -> &'static str {
        match self {
            VisualFamily::Sword => "sword",
            VisualFamily::Axe => "axe",
            VisualFamily::Blunt => "blunt",
            VisualFamily::Bow => "bow",
            VisualFamily::Staff => "staff",
            VisualFamily::Armor => "armor",
            VisualFamily::Robe => "robe",
            VisualFamily::Shield => "shield",
            VisualFamily::Headwear => "headwear",
            VisualFamily::Gloves => "gloves",
            VisualFamily::Footwear => "footwear",
            VisualFamily::Jewelry => "jewelry",
            VisualFamily::Book => "book",
            VisualFamily::Potion => "potion",
        }
    }
}

/// Everything the art generator gets to see
#[derive(Debug, Clone)]
pub struct ArtRequest<'a> {
    pub family: VisualFamily,
    /// Art sub-type key (`longsword`, `round_flask`, ...)
    pub sub_type: &'a str,
    pub material: &'a str,
    pub palette: &'a str,
    /// 1 (common) to 5 (legendary)
    pub complexity: u8,
    /// Extra category-specific hints
    pub hints: Map<String, Value>,
}

/// Image plus loosely typed visual metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtOutput {
    pub image_data_url: String,
    #[serde(default)]
    pub item_data: Map<String, Value>,
}

impl ArtOutput {
    pub fn placeholder() -> Self {
        Self {
            image_data_url: PLACEHOLDER_DATA_URL.to_string(),
            item_data: Map::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.image_data_url == PLACEHOLDER_DATA_URL
    }
}

#[derive(Debug, Error)]
pub enum ArtError {
    #[error("failed to encode sprite: {0}")]
    Encode(#[from] image::ImageError),

    #[error("unsupported sprite size {0}")]
    InvalidSize(u32),
}

/// Produces an image for an item
pub trait ArtGenerator: Send + Sync {
    fn generate(&self, request: &ArtRequest<'_>, rng: &mut dyn RngCore) -> Result<ArtOutput, ArtError>;
}

/// Always returns the placeholder image
#[derive(Debug, Clone, Copy, Default)]
pub struct NullArtGenerator;

impl ArtGenerator for NullArtGenerator {
    fn generate(&self, _request: &ArtRequest<'_>, _rng: &mut dyn RngCore) -> Result<ArtOutput, ArtError> {
        Ok(ArtOutput::placeholder())
    }
}
