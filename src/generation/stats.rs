//! Stat accumulation
//!
//! Folds sub-type base stats, material modifiers and affix effects into the
//! single stat record stored on an item.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::{BonusAttributeRule, Material, MaterialModifiers, SubTypeDef};
use crate::items::{AffixEffect, Attribute, BaseStats, EffectKind, MagicalProperty, StatEffect};

/// Builds up a `BaseStats` record step by step
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    stats: BaseStats,
}

impl StatAccumulator {
    pub fn new(base: &BaseStats) -> Self {
        Self { stats: base.clone() }
    }

    /// Add a material's flat modifiers
    pub fn apply_material(&mut self, modifiers: &MaterialModifiers) {
        if modifiers.ac_bonus != 0 {
            self.stats.add_ac(modifiers.ac_bonus);
        }
        if modifiers.hp_bonus != 0 {
            self.stats.add_hp(modifiers.hp_bonus);
        }
        if modifiers.mp_bonus != 0 {
            self.stats.add_mp(modifiers.mp_bonus);
        }
        if modifiers.damage_bonus != 0 {
            match self.stats.damage.as_mut() {
                Some(dice) => dice.bonus += modifiers.damage_bonus,
                None => log::debug!("Ignoring damage bonus on an item without a damage die"),
            }
        }
        for (&attribute, &delta) in &modifiers.requirements {
            self.stats.add_requirement(attribute, delta);
        }
        for (&attribute, &value) in &modifiers.attributes {
            self.stats.add_attribute(attribute, value);
        }
    }

    /// Fold one affix effect; effects without stat meaning are left alone
    pub fn apply_effect(&mut self, effect: &AffixEffect) {
        let EffectKind::Stat(stat) = &effect.kind else {
            return;
        };

        match stat {
            StatEffect::AttributeBoost { attribute, value } => self.stats.add_attribute(*attribute, *value),
            StatEffect::HpBoost { value } => self.stats.add_hp(*value),
            StatEffect::MpBoost { value } => self.stats.add_mp(*value),
            StatEffect::AcBoost { value } => self.stats.add_ac(*value),
            StatEffect::AttributeRequirementMod { attribute, value } => {
                self.stats.add_requirement(*attribute, *value)
            }
            StatEffect::MultiBoost { effects } | StatEffect::MultiEffect { effects } => {
                for nested in effects {
                    self.apply_effect(nested);
                }
            }
        }
    }

    pub fn apply_properties(&mut self, properties: &[MagicalProperty]) {
        for property in properties {
            self.apply_effect(&property.effect);
        }
    }

    /// Roll a category's random attribute bonus; returns the attribute if it hit
    pub fn apply_bonus_attribute(&mut self, rule: &BonusAttributeRule, rng: &mut impl Rng) -> Option<Attribute> {
        if !rng.gen_bool(rule.chance.clamp(0.0, 1.0)) {
            return None;
        }
        let attribute = *rule.attributes.choose(rng)?;
        self.stats.add_attribute(attribute, rule.amount);
        Some(attribute)
    }

    pub fn stats(&self) -> &BaseStats {
        &self.stats
    }

    /// Prune zero entries and clamp requirements
    pub fn finish(mut self) -> BaseStats {
        self.stats.prune();
        self.stats
    }
}

/// Base stats + material + affixes, pruned
pub fn accumulate(sub_type: &SubTypeDef, material: &Material, properties: &[MagicalProperty]) -> BaseStats {
    let mut acc = StatAccumulator::new(&sub_type.base_stats);
    acc.apply_material(&material.stat_modifiers);
    acc.apply_properties(properties);
    acc.finish()
}
