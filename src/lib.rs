//! Relicforge - procedural RPG item generator
//!
//! Rolls rarity, material and magical affixes for an item category, then
//! names, prices, draws and describes the result. Categories are plain
//! JSON data; the same pipeline serves swords, robes and potions alike.

pub mod art;
pub mod config;
pub mod data;
pub mod error;
pub mod generation;
pub mod items;

// Re-export commonly used types
pub use art::{ArtGenerator, ArtOutput, ArtRequest, NullArtGenerator, PixelArtGenerator, VisualFamily};
pub use config::ForgeConfig;
pub use data::{export_default_data, ForgeData};
pub use error::{ForgeError, ForgeResult};
pub use generation::{GenerationRequest, ItemForge, SelectionMode};
pub use items::{Attribute, BaseStats, GeneratedItem, MagicalProperty, Rarity};
