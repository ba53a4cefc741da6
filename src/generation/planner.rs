//! Affix slot planning
//!
//! Decides how many major and minor affixes an item gets and on which side
//! (prefix or suffix) each one goes, then fills the slots from the pools.

use std::collections::HashSet;

use rand::Rng;

use super::selector::{select_affix, SelectionContext};
use crate::items::{AffixPools, AffixTier, MagicalProperty, Rarity};

/// Number of major and minor affix slots for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPlan {
    pub major: u8,
    pub minor: u8,
}

impl SlotPlan {
    pub fn total(&self) -> u8 {
        self.major + self.minor
    }
}

/// Slot counts for a rarity; RARE flips between one major and two minors
pub fn plan_slots(rarity: Rarity, rng: &mut impl Rng) -> SlotPlan {
    let (major, minor) = match rarity {
        Rarity::Common => (0, 0),
        Rarity::Uncommon => (0, 1),
        Rarity::Rare => {
            if rng.gen_bool(0.5) {
                (1, 0)
            } else {
                (0, 2)
            }
        }
        Rarity::Epic => (1, 1),
        Rarity::Legendary => (2, 0),
    };
    SlotPlan { major, minor }
}

/// Fills affix slots for one item, tracking used names
pub struct AffixRoller<'a> {
    pools: &'a AffixPools,
    ctx: SelectionContext<'a>,
    used_names: HashSet<String>,
    applied: Vec<MagicalProperty>,
}

impl<'a> AffixRoller<'a> {
    pub fn new(pools: &'a AffixPools, ctx: SelectionContext<'a>) -> Self {
        Self {
            pools,
            ctx,
            used_names: HashSet::new(),
            applied: Vec::new(),
        }
    }

    /// Draw from one pool; false when the pool has nothing eligible left
    pub fn draw(&mut self, tier: AffixTier, is_prefix: bool, rng: &mut impl Rng) -> bool {
        let pools = self.pools;
        let pool = pools.pool(tier, is_prefix);
        match select_affix(pool, &self.ctx, &mut self.used_names, rng) {
            Some(affix) => {
                log::debug!(
                    "Rolled {:?} {} '{}' for {}/{}",
                    tier,
                    if is_prefix { "prefix" } else { "suffix" },
                    affix.name,
                    self.ctx.category,
                    self.ctx.sub_type
                );
                self.applied.push(MagicalProperty {
                    name: affix.name,
                    description: affix.description,
                    effect: affix.effect,
                    tier,
                    is_prefix,
                    rarity_max: affix.rarity_max,
                });
                true
            }
            None => {
                log::debug!(
                    "No eligible {:?} {} for {}/{} at {}",
                    tier,
                    if is_prefix { "prefix" } else { "suffix" },
                    self.ctx.category,
                    self.ctx.sub_type,
                    self.ctx.rarity
                );
                false
            }
        }
    }

    /// Draw on a random side, then the other side if that pool is exhausted
    pub fn draw_either_side(&mut self, tier: AffixTier, rng: &mut impl Rng) -> bool {
        let first = rng.gen_bool(0.5);
        self.draw(tier, first, rng) || self.draw(tier, !first, rng)
    }

    fn count(&self, tier: AffixTier, is_prefix: bool) -> usize {
        self.applied
            .iter()
            .filter(|p| p.tier == tier && p.is_prefix == is_prefix)
            .count()
    }

    /// Side for the next minor slot, evening out prefixes and suffixes
    fn next_minor_side(&self, rng: &mut impl Rng) -> bool {
        let prefixes = self.count(AffixTier::Minor, true);
        let suffixes = self.count(AffixTier::Minor, false);
        match (prefixes, suffixes) {
            (0, s) if s > 0 => true,
            (p, 0) if p > 0 => false,
            _ => rng.gen_bool(0.5),
        }
    }

    /// Roll every slot in the plan; failed draws leave the slot empty
    pub fn fill(&mut self, plan: SlotPlan, rng: &mut impl Rng) {
        for _ in 0..plan.major {
            let is_prefix = rng.gen_bool(0.5);
            self.draw(AffixTier::Major, is_prefix, rng);
        }

        for slot in 0..plan.minor {
            let is_prefix = if slot == 0 {
                rng.gen_bool(0.5)
            } else {
                self.next_minor_side(rng)
            };
            self.draw(AffixTier::Minor, is_prefix, rng);
        }
    }

    /// Keep RARE items from ending up with no affixes at all
    pub fn ensure_not_mundane(&mut self, rng: &mut impl Rng) {
        if self.ctx.rarity != Rarity::Rare || !self.applied.is_empty() {
            return;
        }

        log::warn!(
            "RARE {}/{} rolled no affixes, forcing a minor affix",
            self.ctx.category,
            self.ctx.sub_type
        );
        if self.draw_either_side(AffixTier::Minor, rng) {
            return;
        }

        log::warn!(
            "No minor affix available for RARE {}/{}, forcing a major affix",
            self.ctx.category,
            self.ctx.sub_type
        );
        if !self.draw_either_side(AffixTier::Major, rng) {
            log::warn!(
                "RARE {}/{} has no eligible affixes at all",
                self.ctx.category,
                self.ctx.sub_type
            );
        }
    }

    pub fn applied(&self) -> &[MagicalProperty] {
        &self.applied
    }

    pub fn into_applied(self) -> Vec<MagicalProperty> {
        self.applied
    }
}

/// Plan and fill all affix slots for an item
pub fn roll_affixes<'a>(
    pools: &'a AffixPools,
    ctx: SelectionContext<'a>,
    rng: &mut impl Rng,
) -> Vec<MagicalProperty> {
    let plan = plan_slots(ctx.rarity, rng);
    let mut roller = AffixRoller::new(pools, ctx);
    roller.fill(plan, rng);
    roller.ensure_not_mundane(rng);
    roller.into_applied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::selector::SelectionMode;
    use crate::items::{Affix, AffixEffect, StatEffect};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn affix(name: &str) -> Affix {
        Affix {
            name: name.to_string(),
            description: String::new(),
            rarity_max: Rarity::Legendary,
            weight: 1.0,
            effect: AffixEffect::stat(StatEffect::HpBoost { value: 1 }),
            allowed_item_types: None,
            sub_types: None,
        }
    }

    fn full_pools() -> AffixPools {
        AffixPools {
            major_prefixes: vec![affix("Flaming"), affix("Frozen")],
            major_suffixes: vec![affix("of Ruin"), affix("of Dawn")],
            minor_prefixes: vec![affix("Sturdy"), affix("Fine")],
            minor_suffixes: vec![affix("of Comfort"), affix("of Ease")],
        }
    }

    fn ctx(rarity: Rarity) -> SelectionContext<'static> {
        SelectionContext { category: "swords", sub_type: "longsword", rarity, mode: SelectionMode::Uniform }
    }

    #[test]
    fn test_plan_slots_per_rarity() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(plan_slots(Rarity::Common, &mut rng), SlotPlan { major: 0, minor: 0 });
        assert_eq!(plan_slots(Rarity::Uncommon, &mut rng), SlotPlan { major: 0, minor: 1 });
        assert_eq!(plan_slots(Rarity::Epic, &mut rng), SlotPlan { major: 1, minor: 1 });
        assert_eq!(plan_slots(Rarity::Legendary, &mut rng), SlotPlan { major: 2, minor: 0 });
    }

    #[test]
    fn test_rare_plan_is_either_shape() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut seen_major = false;
        let mut seen_minor = false;
        for _ in 0..100 {
            match plan_slots(Rarity::Rare, &mut rng) {
                SlotPlan { major: 1, minor: 0 } => seen_major = true,
                SlotPlan { major: 0, minor: 2 } => seen_minor = true,
                other => panic!("unexpected plan {:?}", other),
            }
        }
        assert!(seen_major && seen_minor);
    }

    #[test]
    fn test_two_minors_are_balanced() {
        let pools = full_pools();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut roller = AffixRoller::new(&pools, ctx(Rarity::Rare));
            roller.fill(SlotPlan { major: 0, minor: 2 }, &mut rng);

            let prefixes = roller.applied().iter().filter(|p| p.is_prefix).count();
            assert_eq!(roller.applied().len(), 2);
            assert_eq!(prefixes, 1, "seed {} gave {} minor prefixes", seed, prefixes);
        }
    }

    #[test]
    fn test_legendary_gets_two_distinct_majors() {
        let pools = full_pools();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let applied = roll_affixes(&pools, ctx(Rarity::Legendary), &mut rng);
            assert_eq!(applied.len(), 2);
            assert!(applied.iter().all(|p| p.tier == AffixTier::Major));
            assert_ne!(applied[0].name, applied[1].name);
        }
    }

    #[test]
    fn test_exhausted_pool_leaves_slot_empty() {
        let pools = AffixPools {
            major_prefixes: vec![affix("Flaming")],
            ..AffixPools::default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let mut roller = AffixRoller::new(&pools, ctx(Rarity::Legendary));
        roller.fill(SlotPlan { major: 2, minor: 0 }, &mut rng);
        assert!(roller.applied().len() <= 1);
    }

    #[test]
    fn test_rare_fallback_forces_minor_then_major() {
        // Only a major suffix exists, so the planned slots may all miss
        let pools = AffixPools {
            major_suffixes: vec![affix("of Ruin")],
            ..AffixPools::default()
        };
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let applied = roll_affixes(&pools, ctx(Rarity::Rare), &mut rng);
            assert_eq!(applied.len(), 1);
            assert_eq!(applied[0].name, "of Ruin");
        }

        let pools = AffixPools {
            minor_prefixes: vec![affix("Fine")],
            ..AffixPools::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let mut roller = AffixRoller::new(&pools, ctx(Rarity::Rare));
        roller.ensure_not_mundane(&mut rng);
        assert_eq!(roller.applied()[0].tier, AffixTier::Minor);
    }

    #[test]
    fn test_common_items_stay_mundane() {
        let pools = full_pools();
        let mut rng = StdRng::seed_from_u64(8);
        assert!(roll_affixes(&pools, ctx(Rarity::Common), &mut rng).is_empty());
    }
}
