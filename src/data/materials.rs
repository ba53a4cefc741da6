//! Material table
//!
//! Materials tint the sprite, scale the value and nudge a few stats.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::items::Attribute;

/// Stat adjustments a material applies on top of the sub-type base stats
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialModifiers {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ac_bonus: i32,
    /// Added to the damage die bonus
    #[serde(default, skip_serializing_if = "is_zero")]
    pub damage_bonus: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub hp_bonus: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub mp_bonus: i32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requirements: BTreeMap<Attribute, i32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<Attribute, i32>,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

fn default_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    /// Palette key for the art generator
    pub palette: String,
    #[serde(default = "default_multiplier")]
    pub value_multiplier: f64,
    #[serde(default)]
    pub stat_modifiers: MaterialModifiers,
    /// Categories this material is used by
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Material {
    pub fn applies_to(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c.eq_ignore_ascii_case(category))
    }

    pub fn is(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }
}

/// The global material table (`materials.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialTable {
    pub materials: Vec<Material>,
}

impl MaterialTable {
    /// Find a material by id (case-insensitive)
    pub fn get(&self, id: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.is(id))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Material lookup for one category: its own overrides first, then the global table
#[derive(Debug, Clone, Copy)]
pub struct MaterialCatalog<'a> {
    category: &'a str,
    overrides: &'a [Material],
    global: &'a MaterialTable,
}

impl<'a> MaterialCatalog<'a> {
    pub fn new(category: &'a str, overrides: &'a [Material], global: &'a MaterialTable) -> Self {
        Self { category, overrides, global }
    }

    pub fn get(&self, id: &str) -> Option<&'a Material> {
        self.overrides
            .iter()
            .find(|m| m.is(id))
            .or_else(|| self.global.get(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Materials usable by this category, overrides included
    pub fn applicable(&self) -> Vec<&'a Material> {
        let mut result: Vec<&'a Material> = self
            .global
            .materials
            .iter()
            .filter(|m| m.applies_to(self.category))
            .map(|m| self.overrides.iter().find(|o| o.is(&m.id)).unwrap_or(m))
            .collect();

        for material in self.overrides {
            if !result.iter().any(|m| m.is(&material.id)) {
                result.push(material);
            }
        }

        result
    }

    /// Every material visible to this category
    pub fn all(&self) -> Vec<&'a Material> {
        let mut result: Vec<&'a Material> = self.overrides.iter().collect();
        result.extend(
            self.global
                .materials
                .iter()
                .filter(|m| !self.overrides.iter().any(|o| o.is(&m.id))),
        );
        result
    }
}
