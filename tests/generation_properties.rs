//! Property-based tests using proptest
//!
//! Invariants that must hold for every generated item:
//! - affixes respect their rarity ceiling and eligibility filters
//! - no affix name appears twice on one item
//! - stats never carry zero entries, requirements never drop below -3
//! - value is at least 1 and names are never degenerate
//! - the same seed always yields the same item

use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use relicforge::generation::{eligible_affixes, SelectionContext};
use relicforge::items::{AffixTier, REQUIREMENT_FLOOR};
use relicforge::{ForgeData, GeneratedItem, GenerationRequest, ItemForge, NullArtGenerator, Rarity, SelectionMode};

fn forge() -> &'static ItemForge {
    static FORGE: OnceLock<ItemForge> = OnceLock::new();
    FORGE.get_or_init(|| {
        ItemForge::new(ForgeData::embedded().expect("embedded data loads")).with_art_generator(NullArtGenerator)
    })
}

fn category_ids() -> Vec<String> {
    forge().data().category_ids().map(str::to_string).collect()
}

fn check_item(item: &GeneratedItem) -> Result<(), TestCaseError> {
    let category = forge().data().category(&item.category).expect("item category exists");

    // Rarity gating and eligibility
    for property in &item.magical_properties {
        prop_assert!(
            item.rarity <= property.rarity_max,
            "{} on a {} item exceeds its ceiling {}",
            property.name,
            item.rarity,
            property.rarity_max
        );
        let affix = category
            .affixes
            .iter()
            .find(|a| a.name == property.name)
            .expect("applied affix comes from the category pools");
        prop_assert!(affix.is_eligible(&item.category, &item.sub_type, item.rarity));
    }

    // No duplicate names
    let names: HashSet<&str> = item.magical_properties.iter().map(|p| p.name.as_str()).collect();
    prop_assert_eq!(names.len(), item.magical_properties.len());

    // Stat pruning
    let stats = &item.base_stats;
    prop_assert!(stats.attributes.values().all(|v| *v != 0));
    prop_assert!(stats.ac_bonus != Some(0));
    prop_assert!(stats.hp_bonus != Some(0));
    prop_assert!(stats.mp_bonus != Some(0));

    // Requirement floor
    prop_assert!(stats.requirements.values().all(|v| *v >= REQUIREMENT_FLOOR));

    // Value floor
    prop_assert!(item.value >= 1);

    // Name quality
    prop_assert!(item.name.chars().count() >= 3, "short name {:?}", item.name);
    prop_assert!(!item.name.contains("undefined") && !item.name.contains("null"), "bad name {:?}", item.name);

    Ok(())
}

fn rarity_strategy() -> impl Strategy<Value = Rarity> {
    prop::sample::select(Rarity::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_every_item_satisfies_invariants(
        seed in any::<u64>(),
        category in 0usize..14,
        rarity in rarity_strategy(),
    ) {
        let ids = category_ids();
        let request = GenerationRequest::new().category(ids[category % ids.len()].clone()).rarity(rarity);
        let item = forge().generate_with_rng(&request, &mut StdRng::seed_from_u64(seed));

        prop_assert!(item.is_some());
        check_item(&item.unwrap())?;
    }

    #[test]
    fn prop_unconstrained_requests_succeed(seed in any::<u64>()) {
        let item = forge().generate_with_rng(&GenerationRequest::new(), &mut StdRng::seed_from_u64(seed));
        prop_assert!(item.is_some());
        check_item(&item.unwrap())?;
    }

    #[test]
    fn prop_same_seed_same_item(seed in any::<u64>(), rarity in rarity_strategy()) {
        let request = GenerationRequest::new().rarity(rarity);
        let first = forge().generate_with_rng(&request, &mut StdRng::seed_from_u64(seed));
        let second = forge().generate_with_rng(&request, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_eligible_set_ignores_pool_order(
        seed in any::<u64>(),
        category in 0usize..14,
        rarity in rarity_strategy(),
    ) {
        let data = forge().data();
        let category = &data.categories[category % data.categories.len()];
        let sub_type = &category.sub_types[(seed as usize) % category.sub_types.len()];
        let ctx = SelectionContext {
            category: &category.id,
            sub_type: &sub_type.id,
            rarity,
            mode: SelectionMode::Uniform,
        };
        let used: HashSet<String> = category.affixes.major_prefixes.first().map(|a| a.name.clone()).into_iter().collect();

        let mut shuffled = category.affixes.major_prefixes.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        let original: BTreeSet<&str> = eligible_affixes(&category.affixes.major_prefixes, &ctx, &used)
            .into_iter()
            .map(|a| a.name.as_str())
            .collect();
        let reordered: BTreeSet<&str> = eligible_affixes(&shuffled, &ctx, &used)
            .into_iter()
            .map(|a| a.name.as_str())
            .collect();
        prop_assert_eq!(original, reordered);
    }
}

#[test]
fn test_rare_items_are_never_mundane() {
    let mut rng = StdRng::seed_from_u64(2024);
    let request = GenerationRequest::new().rarity(Rarity::Rare);

    let mundane = (0..1000)
        .filter_map(|_| forge().generate_with_rng(&request, &mut rng))
        .filter(GeneratedItem::is_mundane)
        .count();
    assert_eq!(mundane, 0);
}

#[test]
fn test_common_ring_scenario() {
    let mut rng = StdRng::seed_from_u64(7);
    let request = GenerationRequest::new().category("ring").rarity(Rarity::Common);

    let mut bonus_seen = false;
    for _ in 0..200 {
        let item = forge().generate_with_rng(&request, &mut rng).unwrap();
        assert!(item.magical_properties.is_empty());
        assert!(item.base_stats.attributes.len() <= 1);
        assert!(item.base_stats.attributes.values().all(|v| *v == 1));
        assert!(item.value >= 1);
        bonus_seen |= !item.base_stats.attributes.is_empty();
    }
    assert!(bonus_seen, "the jewelry attribute bonus never fired");
}

#[test]
fn test_legendary_sword_scenario() {
    let mut rng = StdRng::seed_from_u64(8);
    let request = GenerationRequest::new().category("swords").rarity(Rarity::Legendary);

    for _ in 0..200 {
        let item = forge().generate_with_rng(&request, &mut rng).unwrap();
        assert_eq!(item.magical_properties.len(), 2, "{:?}", item.affix_names());
        assert!(item.magical_properties.iter().all(|p| p.tier == AffixTier::Major));
        assert_ne!(item.magical_properties[0].name, item.magical_properties[1].name);
    }
}

#[test]
fn test_steel_request_for_wooden_sub_type() {
    let mut rng = StdRng::seed_from_u64(9);
    let request = GenerationRequest::new().category("bows").sub_type("longbow").material("STEEL");
    let allowed = forge().data().category("bows").unwrap().sub_type("longbow").unwrap().allowed_materials.clone();

    let mut drawn = HashSet::new();
    for _ in 0..200 {
        let item = forge().generate_with_rng(&request, &mut rng).unwrap();
        assert!(allowed.contains(&item.material), "{} not allowed", item.material);
        drawn.insert(item.material);
    }
    assert!(drawn.len() > 1, "material draw is not random: {:?}", drawn);
}

#[test]
fn test_rolled_rarities_follow_weights() {
    let mut rng = StdRng::seed_from_u64(10);
    let items: Vec<_> = (0..2000)
        .filter_map(|_| forge().generate_with_rng(&GenerationRequest::new(), &mut rng))
        .collect();

    let commons = items.iter().filter(|i| i.rarity == Rarity::Common).count();
    let legendaries = items.iter().filter(|i| i.rarity == Rarity::Legendary).count();
    assert!(commons > legendaries * 10);
}

#[test]
fn test_ids_are_unique() {
    let mut rng = StdRng::seed_from_u64(11);
    let ids: HashSet<String> = (0..500)
        .filter_map(|_| forge().generate_with_rng(&GenerationRequest::new(), &mut rng))
        .map(|item| item.id)
        .collect();
    assert_eq!(ids.len(), 500);
}
