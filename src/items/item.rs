//! Item definitions
//!
//! Rarities, attributes, stat blocks and the generated item record.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::affix::{AffixEffect, AffixTier};
use crate::art::ArtOutput;
use crate::error::ForgeError;

/// Lowest value an attribute requirement can reach ("-3 modifier needed")
pub const REQUIREMENT_FLOOR: i32 = -3;

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    Common,     // base stats only
    Uncommon,   // one minor affix
    Rare,       // one major or two minor affixes
    Epic,       // one major + one minor
    Legendary,  // two major affixes
}

impl Rarity {
    /// All rarities, lowest first
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Data id as it appears in the tables
    pub fn id(&self) -> &'static str {
        match self {
            Rarity::Common => "COMMON",
            Rarity::Uncommon => "UNCOMMON",
            Rarity::Rare => "RARE",
            Rarity::Epic => "EPIC",
            Rarity::Legendary => "LEGENDARY",
        }
    }

    /// Get rarity name
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    /// Ordinal rank used for eligibility checks (higher = rarer)
    pub fn rank(&self) -> u8 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
        }
    }

    /// Nominal (min, max) number of affixes
    pub fn affix_slot_range(&self) -> (u8, u8) {
        match self {
            Rarity::Common => (0, 0),
            Rarity::Uncommon => (1, 1),
            Rarity::Rare => (1, 2),
            Rarity::Epic => (2, 2),
            Rarity::Legendary => (2, 2),
        }
    }

    /// Gold value multiplier
    pub fn value_multiplier(&self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.5,
            Rarity::Rare => 2.5,
            Rarity::Epic => 5.0,
            Rarity::Legendary => 10.0,
        }
    }

    /// Relative weight when a request does not name a rarity
    pub fn selection_weight(&self) -> u32 {
        match self {
            Rarity::Common => 60,
            Rarity::Uncommon => 25,
            Rarity::Rare => 10,
            Rarity::Epic => 4,
            Rarity::Legendary => 1,
        }
    }

    /// Detail level hint passed to the art generator (1-5)
    pub fn art_complexity(&self) -> u8 {
        self.rank() + 1
    }

    /// Roll a rarity using the selection weights
    pub fn roll(rng: &mut impl Rng) -> Rarity {
        let total: u32 = Rarity::ALL.iter().map(|r| r.selection_weight()).sum();
        let mut roll = rng.gen_range(0..total);

        for rarity in Rarity::ALL {
            let weight = rarity.selection_weight();
            if roll < weight {
                return rarity;
            }
            roll -= weight;
        }

        Rarity::Common
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rarity {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rarity::ALL
            .into_iter()
            .find(|r| r.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ForgeError::UnknownRarity(s.to_string()))
    }
}

/// Character attributes that items can boost or require
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Strength,
        Attribute::Dexterity,
        Attribute::Constitution,
        Attribute::Intelligence,
        Attribute::Wisdom,
        Attribute::Charisma,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Strength => "Strength",
            Attribute::Dexterity => "Dexterity",
            Attribute::Constitution => "Constitution",
            Attribute::Intelligence => "Intelligence",
            Attribute::Wisdom => "Wisdom",
            Attribute::Charisma => "Charisma",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Attribute::Strength => "STR",
            Attribute::Dexterity => "DEX",
            Attribute::Constitution => "CON",
            Attribute::Intelligence => "INT",
            Attribute::Wisdom => "WIS",
            Attribute::Charisma => "CHA",
        }
    }
}

/// Equipment slot for wearable items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    MainHand,
    OffHand,
    TwoHand,
    Head,
    Body,
    Hands,
    Feet,
    Finger,
    Neck,
}

impl EquipSlot {
    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::MainHand => "Main Hand",
            EquipSlot::OffHand => "Off Hand",
            EquipSlot::TwoHand => "Two Hands",
            EquipSlot::Head => "Head",
            EquipSlot::Body => "Body",
            EquipSlot::Hands => "Hands",
            EquipSlot::Feet => "Feet",
            EquipSlot::Finger => "Finger",
            EquipSlot::Neck => "Neck",
        }
    }
}

/// A damage die such as 1d8+1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    pub count: u8,
    pub sides: u8,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub bonus: i32,
}

impl Dice {
    pub fn new(count: u8, sides: u8) -> Self {
        Self { count, sides, bonus: 0 }
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bonus {
            0 => write!(f, "{}d{}", self.count, self.sides),
            b if b > 0 => write!(f, "{}d{}+{}", self.count, self.sides, b),
            b => write!(f, "{}d{}{}", self.count, self.sides, b),
        }
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// Flat stat record: sub-type base stats, and the folded result on an item
///
/// Boost entries are optional/sparse so that pruning can drop them entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<Dice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac_bonus: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_bonus: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mp_bonus: Option<i32>,
    /// Flat attribute bonuses
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<Attribute, i32>,
    /// Minimum attribute modifier needed to use the item
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requirements: BTreeMap<Attribute, i32>,
}

impl BaseStats {
    pub fn attribute(&self, attribute: Attribute) -> i32 {
        self.attributes.get(&attribute).copied().unwrap_or(0)
    }

    pub fn requirement(&self, attribute: Attribute) -> i32 {
        self.requirements.get(&attribute).copied().unwrap_or(0)
    }

    pub fn add_attribute(&mut self, attribute: Attribute, value: i32) {
        *self.attributes.entry(attribute).or_insert(0) += value;
    }

    /// Add to a requirement, never letting it drop below the floor
    pub fn add_requirement(&mut self, attribute: Attribute, delta: i32) {
        let entry = self.requirements.entry(attribute).or_insert(0);
        *entry = (*entry + delta).max(REQUIREMENT_FLOOR);
    }

    pub fn add_ac(&mut self, value: i32) {
        *self.ac_bonus.get_or_insert(0) += value;
    }

    pub fn add_hp(&mut self, value: i32) {
        *self.hp_bonus.get_or_insert(0) += value;
    }

    pub fn add_mp(&mut self, value: i32) {
        *self.mp_bonus.get_or_insert(0) += value;
    }

    /// Drop zero-valued boosts and clamp requirements
    pub fn prune(&mut self) {
        for field in [&mut self.ac_bonus, &mut self.hp_bonus, &mut self.mp_bonus] {
            if *field == Some(0) {
                *field = None;
            }
        }
        self.attributes.retain(|_, v| *v != 0);
        for value in self.requirements.values_mut() {
            *value = (*value).max(REQUIREMENT_FLOOR);
        }
    }
}

/// An affix as applied to a generated item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicalProperty {
    pub name: String,
    pub description: String,
    pub effect: AffixEffect,
    pub tier: AffixTier,
    pub is_prefix: bool,
    pub rarity_max: Rarity,
}

/// A fully generated item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItem {
    /// Category prefix + random UUID
    pub id: String,
    pub name: String,
    pub category: String,
    pub sub_type: String,
    pub sub_type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equip_slot: Option<EquipSlot>,
    pub rarity: Rarity,
    /// Primary material id
    pub material: String,
    /// Material per component ("primary", "hilt", "grip", ...)
    pub materials: BTreeMap<String, String>,
    pub base_stats: BaseStats,
    pub magical_properties: Vec<MagicalProperty>,
    /// Gold value, always at least 1
    pub value: u32,
    pub description: String,
    pub art: ArtOutput,
}

impl GeneratedItem {
    /// Names of all applied affixes, in application order
    pub fn affix_names(&self) -> Vec<&str> {
        self.magical_properties.iter().map(|p| p.name.as_str()).collect()
    }

    /// Whether the item rolled no magical properties at all
    pub fn is_mundane(&self) -> bool {
        self.magical_properties.is_empty()
    }
}
