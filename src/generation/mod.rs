//! Item generation
//!
//! One pipeline drives every category: pick a sub-type, rarity and
//! material, roll affixes, fold stats, then name, price, draw and describe
//! the item. Categories differ only in the data they feed in.

pub mod description;
pub mod material;
pub mod naming;
pub mod planner;
pub mod selector;
pub mod stats;
pub mod value;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde_json::{Map, Value};

use crate::art::{ArtGenerator, ArtOutput, ArtRequest, NullArtGenerator, PixelArtGenerator};
use crate::config::ForgeConfig;
use crate::data::{CategoryDef, ForgeData, SubTypeDef};
use crate::error::{ForgeError, ForgeResult};
use crate::items::{GeneratedItem, Rarity};

pub use description::build_description;
pub use material::{resolve_components, resolve_material, PRIMARY_COMPONENT};
pub use naming::{compose_name, NameParts, NameTemplate};
pub use planner::{plan_slots, roll_affixes, AffixRoller, SlotPlan};
pub use selector::{eligible_affixes, select_affix, SelectionContext, SelectionMode};
pub use stats::{accumulate, StatAccumulator};
pub use value::{compute_value, ValueInputs};

/// What to generate; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Category id, name or alias ("swords", "sword", "ring")
    pub category: Option<String>,
    pub sub_type: Option<String>,
    /// Rolled with the rarity weights when absent
    pub rarity: Option<Rarity>,
    pub material: Option<String>,
}

impl GenerationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = Some(sub_type.into());
        self
    }

    pub fn rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    pub fn material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }
}

/// The item generator
///
/// Holds only immutable data, so one forge can serve many threads.
pub struct ItemForge {
    data: ForgeData,
    mode: SelectionMode,
    art: Box<dyn ArtGenerator>,
}

impl ItemForge {
    /// Forge with uniform affix draws and the built-in pixel art
    pub fn new(data: ForgeData) -> Self {
        Self {
            data,
            mode: SelectionMode::default(),
            art: Box::new(PixelArtGenerator::default()),
        }
    }

    /// Load data and settings as the config describes
    pub fn from_config(config: &ForgeConfig) -> ForgeResult<Self> {
        let data = ForgeData::from_config(config)?;
        let forge = Self::new(data).with_selection_mode(config.selection_mode());

        Ok(if config.art.enabled {
            forge.with_art_generator(PixelArtGenerator::new(config.art.sprite_size))
        } else {
            forge.with_art_generator(NullArtGenerator)
        })
    }

    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_art_generator(mut self, art: impl ArtGenerator + 'static) -> Self {
        self.art = Box::new(art);
        self
    }

    pub fn data(&self) -> &ForgeData {
        &self.data
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    /// Generate an item with the thread RNG; `None` on failure (logged)
    pub fn generate(&self, request: &GenerationRequest) -> Option<GeneratedItem> {
        self.generate_with_rng(request, &mut rand::thread_rng())
    }

    /// Generate an item with the given RNG; `None` on failure (logged)
    pub fn generate_with_rng<R: Rng>(&self, request: &GenerationRequest, rng: &mut R) -> Option<GeneratedItem> {
        match self.try_generate_with_rng(request, rng) {
            Ok(item) => Some(item),
            Err(e) => {
                log::error!("Item generation failed: {}", e);
                None
            }
        }
    }

    /// Generate an item, reporting why it failed
    pub fn try_generate_with_rng<R: Rng>(&self, request: &GenerationRequest, rng: &mut R) -> ForgeResult<GeneratedItem> {
        let category = self.pick_category(request.category.as_deref(), rng)?;
        let sub_type = pick_sub_type(category, request.sub_type.as_deref(), rng)?;
        let rarity = request.rarity.unwrap_or_else(|| Rarity::roll(rng));

        let catalog = self.data.material_catalog(category);
        let material = resolve_material(&catalog, category, sub_type, request.material.as_deref(), rng)?;
        let materials = resolve_components(&catalog, category, material, rng);

        let ctx = SelectionContext {
            category: &category.id,
            sub_type: &sub_type.id,
            rarity,
            mode: self.mode,
        };
        let magical_properties = roll_affixes(&category.affixes, ctx, rng);

        let mut acc = StatAccumulator::new(&sub_type.base_stats);
        acc.apply_material(&material.stat_modifiers);
        acc.apply_properties(&magical_properties);
        if let Some(rule) = &category.bonus_attribute {
            if let Some(attribute) = acc.apply_bonus_attribute(rule, rng) {
                log::debug!("Bonus {} on {}/{}", attribute.short_name(), category.id, sub_type.id);
            }
        }
        let base_stats = acc.finish();

        let parts = NameParts {
            prefix: magical_properties.iter().find(|p| p.is_prefix).map(|p| p.name.as_str()),
            suffix: magical_properties.iter().find(|p| !p.is_prefix).map(|p| p.name.as_str()),
            material: &material.name,
            sub_type_name: &sub_type.name,
        };
        let name = compose_name(&category.name_templates, &category.word_lists, &parts, rng);

        let value = compute_value(&ValueInputs {
            base_value: sub_type.base_value,
            material_multiplier: material.value_multiplier,
            rarity,
            properties: &magical_properties,
            stats: &base_stats,
            adjustments: &category.requirement_value_adjustments,
        });

        let art = self.draw(category, sub_type, rarity, &material.id, &material.palette, rng);
        let description = build_description(rarity, material, sub_type, &magical_properties, &art.item_data);

        let id = format!(
            "{}-{}",
            category.id_prefix,
            uuid::Builder::from_random_bytes(rng.gen()).into_uuid().simple()
        );

        log::debug!("Generated {} '{}' ({}, {} gold)", rarity, name, id, value);

        Ok(GeneratedItem {
            id,
            name,
            category: category.id.clone(),
            sub_type: sub_type.id.clone(),
            sub_type_name: sub_type.name.clone(),
            equip_slot: sub_type.equip_slot,
            rarity,
            material: material.id.clone(),
            materials,
            base_stats,
            magical_properties,
            value,
            description,
            art,
        })
    }

    fn pick_category<R: Rng>(&self, query: Option<&str>, rng: &mut R) -> ForgeResult<&CategoryDef> {
        match query {
            Some(query) => self
                .data
                .category(query)
                .ok_or_else(|| ForgeError::UnknownCategory(query.to_string())),
            None => self.data.categories.choose(rng).ok_or(ForgeError::NoCategories),
        }
    }

    /// Ask the art generator for a sprite, substituting the placeholder on failure
    fn draw<R: Rng>(
        &self,
        category: &CategoryDef,
        sub_type: &SubTypeDef,
        rarity: Rarity,
        material: &str,
        palette: &str,
        rng: &mut R,
    ) -> ArtOutput {
        let mut hints = Map::new();
        hints.insert("category".to_string(), Value::from(category.id.as_str()));
        hints.insert("subTypeId".to_string(), Value::from(sub_type.id.as_str()));
        hints.insert("rarity".to_string(), Value::from(rarity.id()));

        let request = ArtRequest {
            family: category.visual_family,
            sub_type: sub_type.visual_key(),
            material,
            palette,
            complexity: rarity.art_complexity(),
            hints,
        };

        let rng: &mut dyn RngCore = rng;
        match self.art.generate(&request, rng) {
            Ok(output) => output,
            Err(e) => {
                log::warn!("Art generation failed for {}/{}: {}", category.id, sub_type.id, e);
                ArtOutput::placeholder()
            }
        }
    }
}

fn pick_sub_type<'a, R: Rng>(category: &'a CategoryDef, query: Option<&str>, rng: &mut R) -> ForgeResult<&'a SubTypeDef> {
    match query {
        Some(query) => category.sub_type(query).ok_or_else(|| ForgeError::UnknownSubType {
            category: category.id.clone(),
            sub_type: query.to_string(),
        }),
        None => category
            .sub_types
            .choose(rng)
            .ok_or_else(|| ForgeError::EmptyCategory(category.id.clone())),
    }
}
