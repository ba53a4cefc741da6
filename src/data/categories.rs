//! Category definitions
//!
//! Each item category (swords, robes, potions, ...) is one JSON record:
//! sub-types, affix pools, name templates and word lists.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::materials::Material;
use crate::art::VisualFamily;
use crate::error::{ForgeError, ForgeResult};
use crate::generation::naming::NameTemplate;
use crate::items::{AffixPools, Attribute, BaseStats, EquipSlot};

/// A concrete kind of item within a category (longsword, ring, healing potion)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTypeDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equip_slot: Option<EquipSlot>,
    pub base_value: u32,
    #[serde(default)]
    pub base_stats: BaseStats,
    #[serde(default)]
    pub allowed_materials: Vec<String>,
    /// Art sub-type key; defaults to the sub-type id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
}

impl SubTypeDef {
    pub fn visual_key(&self) -> &str {
        self.visual.as_deref().unwrap_or(&self.id)
    }

    pub fn allows_material(&self, id: &str) -> bool {
        self.allowed_materials.iter().any(|m| m.eq_ignore_ascii_case(id))
    }
}

/// An extra material-bearing part of an item (hilt, grip, haft)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDef {
    pub id: String,
    pub materials: Vec<String>,
}

/// Chance of a flat bonus to one random attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusAttributeRule {
    pub chance: f64,
    #[serde(default = "default_amount")]
    pub amount: i32,
    #[serde(default = "all_attributes")]
    pub attributes: Vec<Attribute>,
}

fn default_amount() -> i32 {
    1
}

fn all_attributes() -> Vec<Attribute> {
    Attribute::ALL.to_vec()
}

/// Value bump per positive point of an attribute requirement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementAdjustment {
    pub attribute: Attribute,
    pub percent_per_point: f64,
}

/// Named word lists used by name templates (`adjective`, `noun_abstract`, `epithet`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordLists(BTreeMap<String, Vec<String>>);

impl WordLists {
    pub fn get(&self, list: &str) -> &[String] {
        self.0.get(list).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, list: &str) -> bool {
        self.0.contains_key(list)
    }

    /// Pick a random word from a list
    pub fn pick(&self, list: &str, rng: &mut impl Rng) -> Option<&str> {
        self.get(list).choose(rng).map(String::as_str)
    }

    pub fn insert(&mut self, list: impl Into<String>, words: Vec<String>) {
        self.0.insert(list.into(), words);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDef {
    pub id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub name: String,
    /// Prefix of generated item ids
    pub id_prefix: String,
    pub visual_family: VisualFamily,
    /// Fallback when a drawn material is missing from the table
    pub default_material: String,
    /// Category-local material entries, shadowing the global table
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,
    pub sub_types: Vec<SubTypeDef>,
    pub affixes: AffixPools,
    pub name_templates: Vec<NameTemplate>,
    #[serde(default)]
    pub word_lists: WordLists,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_attribute: Option<BonusAttributeRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirement_value_adjustments: Vec<RequirementAdjustment>,
}

impl CategoryDef {
    /// Whether a requested category name refers to this category
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.id.eq_ignore_ascii_case(query)
            || self.name.eq_ignore_ascii_case(query)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(query))
    }

    pub fn sub_type(&self, id: &str) -> Option<&SubTypeDef> {
        let id = id.trim();
        self.sub_types
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(id) || s.name.eq_ignore_ascii_case(id))
    }

    /// Structural checks that generation relies on
    pub fn validate(&self) -> ForgeResult<()> {
        if self.sub_types.is_empty() {
            return Err(ForgeError::EmptyCategory(self.id.clone()));
        }
        if self.name_templates.is_empty() {
            return Err(ForgeError::NoNameTemplates(self.id.clone()));
        }

        for template in &self.name_templates {
            for list in template.word_lists() {
                if !self.word_lists.contains(list) {
                    log::warn!(
                        "Category '{}' template \"{}\" uses missing word list '{}'",
                        self.id,
                        template,
                        list
                    );
                }
            }
        }

        Ok(())
    }
}
