//! Affix pool selection
//!
//! Filters one affix pool down to the entries eligible for the item being
//! built, then draws one of them.

use std::collections::HashSet;

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::items::{Affix, Rarity};

/// How an affix is drawn from the eligible candidates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// Every eligible affix is equally likely; `weight` is ignored
    #[default]
    Uniform,
    /// Draw proportionally to each affix's `weight`
    Weighted,
}

/// What the item being built looks like, for eligibility checks
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    pub category: &'a str,
    pub sub_type: &'a str,
    pub rarity: Rarity,
    pub mode: SelectionMode,
}

/// Affixes from `pool` that may be applied, in pool order
pub fn eligible_affixes<'a>(
    pool: &'a [Affix],
    ctx: &SelectionContext<'_>,
    used_names: &HashSet<String>,
) -> Vec<&'a Affix> {
    pool.iter()
        .filter(|a| a.is_eligible(ctx.category, ctx.sub_type, ctx.rarity))
        .filter(|a| !used_names.contains(&a.name))
        .collect()
}

/// Draw one eligible affix and mark its name as used
pub fn select_affix(
    pool: &[Affix],
    ctx: &SelectionContext<'_>,
    used_names: &mut HashSet<String>,
    rng: &mut impl Rng,
) -> Option<Affix> {
    let candidates = eligible_affixes(pool, ctx, used_names);
    let chosen = match ctx.mode {
        SelectionMode::Uniform => candidates.choose(rng).copied(),
        SelectionMode::Weighted => draw_weighted(&candidates, rng),
    }?;

    used_names.insert(chosen.name.clone());
    Some(chosen.clone())
}

fn draw_weighted<'a>(candidates: &[&'a Affix], rng: &mut impl Rng) -> Option<&'a Affix> {
    match WeightedIndex::new(candidates.iter().map(|a| a.weight.max(0.0))) {
        Ok(dist) => candidates.get(dist.sample(rng)).copied(),
        Err(e) => {
            // All-zero or invalid weights
            log::debug!("Weighted draw unavailable ({}), drawing uniformly", e);
            candidates.choose(rng).copied()
        }
    }
}
