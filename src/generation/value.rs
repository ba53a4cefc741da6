//! Gold value

use crate::data::RequirementAdjustment;
use crate::items::{BaseStats, MagicalProperty, Rarity, DEFAULT_VALUE_MOD};

/// Inputs to the value formula
#[derive(Debug, Clone, Copy)]
pub struct ValueInputs<'a> {
    pub base_value: u32,
    pub material_multiplier: f64,
    pub rarity: Rarity,
    pub properties: &'a [MagicalProperty],
    pub stats: &'a BaseStats,
    pub adjustments: &'a [RequirementAdjustment],
}

/// base × material × rarity, plus base × valueMod per affix, then requirement
/// adjustments; rounded and never below 1
pub fn compute_value(inputs: &ValueInputs<'_>) -> u32 {
    let base = f64::from(inputs.base_value);
    let mut value = base * inputs.material_multiplier * inputs.rarity.value_multiplier();

    for property in inputs.properties {
        value += base * property.effect.value_mod.unwrap_or(DEFAULT_VALUE_MOD);
    }

    for adjustment in inputs.adjustments {
        let requirement = inputs.stats.requirement(adjustment.attribute);
        if requirement > 0 {
            value *= 1.0 + adjustment.percent_per_point * f64::from(requirement);
        }
    }

    if !value.is_finite() {
        return 1;
    }
    value.round().clamp(1.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{AffixEffect, AffixTier, Attribute, StatEffect};

    fn property(value_mod: Option<f64>) -> MagicalProperty {
        let mut effect = AffixEffect::stat(StatEffect::HpBoost { value: 1 });
        effect.value_mod = value_mod;
        MagicalProperty {
            name: "Test".to_string(),
            description: String::new(),
            effect,
            tier: AffixTier::Major,
            is_prefix: false,
            rarity_max: Rarity::Legendary,
        }
    }

    fn inputs<'a>(
        base_value: u32,
        rarity: Rarity,
        properties: &'a [MagicalProperty],
        stats: &'a BaseStats,
        adjustments: &'a [RequirementAdjustment],
    ) -> ValueInputs<'a> {
        ValueInputs { base_value, material_multiplier: 1.0, rarity, properties, stats, adjustments }
    }

    #[test]
    fn test_base_times_multipliers() {
        let stats = BaseStats::default();
        let mut value_inputs = inputs(10, Rarity::Epic, &[], &stats, &[]);
        value_inputs.material_multiplier = 2.0;
        assert_eq!(compute_value(&value_inputs), 100);
    }

    #[test]
    fn test_affix_contributions() {
        let stats = BaseStats::default();
        let properties = vec![property(Some(0.6)), property(None)];
        // 10 × 2.5 + 10 × 0.6 + 10 × 0.1
        assert_eq!(compute_value(&inputs(10, Rarity::Rare, &properties, &stats, &[])), 32);
    }

    #[test]
    fn test_requirement_adjustment() {
        let mut stats = BaseStats::default();
        stats.add_requirement(Attribute::Strength, 3);
        let adjustments = [RequirementAdjustment { attribute: Attribute::Strength, percent_per_point: 0.1 }];
        // 50 × 1.3
        assert_eq!(compute_value(&inputs(50, Rarity::Common, &[], &stats, &adjustments)), 65);

        // Negative requirements never lower the value
        let mut light = BaseStats::default();
        light.add_requirement(Attribute::Strength, -2);
        assert_eq!(compute_value(&inputs(50, Rarity::Common, &[], &light, &adjustments)), 50);
    }

    #[test]
    fn test_value_floor() {
        let stats = BaseStats::default();
        let mut value_inputs = inputs(1, Rarity::Common, &[], &stats, &[]);
        value_inputs.material_multiplier = 0.1;
        assert_eq!(compute_value(&value_inputs), 1);
        assert_eq!(compute_value(&inputs(0, Rarity::Common, &[], &stats, &[])), 1);
    }
}
