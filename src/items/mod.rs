//! Item model
//!
//! Rarities, stats, affixes and the generated item record.

pub mod affix;
pub mod item;

pub use affix::{Affix, AffixEffect, AffixPools, AffixTier, EffectError, EffectKind, StatEffect, DEFAULT_VALUE_MOD};
pub use item::{Attribute, BaseStats, Dice, EquipSlot, GeneratedItem, MagicalProperty, Rarity, REQUIREMENT_FLOOR};
