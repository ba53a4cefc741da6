//! Affix definitions
//!
//! Affixes are the magical modifiers rolled onto items. The handful of
//! effect types that change stats are a closed enum; every other effect
//! type is carried through untouched as JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::item::{Attribute, Rarity};

/// Value contribution per affix when the effect carries no `valueMod`
pub const DEFAULT_VALUE_MOD: f64 = 0.1;

/// Major affixes are the strong ones, minor affixes the small bonuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffixTier {
    Major,
    Minor,
}

/// One entry of an affix pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affix {
    /// Unique within a category; also used in names
    pub name: String,
    pub description: String,
    /// Highest rarity this affix may appear on
    pub rarity_max: Rarity,
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub effect: AffixEffect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_item_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_types: Option<Vec<String>>,
}

fn default_weight() -> f64 {
    1.0
}

impl Affix {
    /// Whether this affix may be rolled for the given category, sub-type and rarity
    pub fn is_eligible(&self, category: &str, sub_type: &str, rarity: Rarity) -> bool {
        let type_ok = self
            .allowed_item_types
            .as_ref()
            .map_or(true, |types| types.iter().any(|t| t.eq_ignore_ascii_case(category)));
        let sub_type_ok = self
            .sub_types
            .as_ref()
            .map_or(true, |subs| subs.iter().any(|s| s.eq_ignore_ascii_case(sub_type)));

        type_ok && sub_type_ok && rarity <= self.rarity_max
    }

    pub fn value_mod(&self) -> f64 {
        self.effect.value_mod.unwrap_or(DEFAULT_VALUE_MOD)
    }
}

/// The four affix pools of a category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffixPools {
    #[serde(default)]
    pub major_prefixes: Vec<Affix>,
    #[serde(default)]
    pub major_suffixes: Vec<Affix>,
    #[serde(default)]
    pub minor_prefixes: Vec<Affix>,
    #[serde(default)]
    pub minor_suffixes: Vec<Affix>,
}

impl AffixPools {
    pub fn pool(&self, tier: AffixTier, is_prefix: bool) -> &[Affix] {
        match (tier, is_prefix) {
            (AffixTier::Major, true) => &self.major_prefixes,
            (AffixTier::Major, false) => &self.major_suffixes,
            (AffixTier::Minor, true) => &self.minor_prefixes,
            (AffixTier::Minor, false) => &self.minor_suffixes,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Affix> {
        self.major_prefixes
            .iter()
            .chain(&self.major_suffixes)
            .chain(&self.minor_prefixes)
            .chain(&self.minor_suffixes)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Effects that fold into an item's stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatEffect {
    AttributeBoost { attribute: Attribute, value: i32 },
    HpBoost { value: i32 },
    MpBoost { value: i32 },
    AcBoost { value: i32 },
    AttributeRequirementMod { attribute: Attribute, value: i32 },
    MultiBoost { effects: Vec<AffixEffect> },
    MultiEffect { effects: Vec<AffixEffect> },
}

impl StatEffect {
    const TYPES: [&'static str; 7] = [
        "attribute_boost",
        "hp_boost",
        "mp_boost",
        "ac_boost",
        "attribute_requirement_mod",
        "multi_boost",
        "multi_effect",
    ];

    fn handles(effect_type: &str) -> bool {
        Self::TYPES.contains(&effect_type)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    Stat(StatEffect),
    /// Any other effect type, kept as-is for the consumer
    Passthrough {
        effect_type: String,
        params: Map<String, Value>,
    },
}

/// An affix effect plus its value contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct AffixEffect {
    pub kind: EffectKind,
    pub value_mod: Option<f64>,
}

#[derive(Debug, Error)]
pub enum EffectError {
    #[error("effect must be a JSON object")]
    NotAnObject,
    #[error("effect is missing its \"type\" field")]
    MissingType,
    #[error("malformed {effect_type} effect: {source}")]
    Malformed {
        effect_type: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AffixEffect {
    pub fn stat(effect: StatEffect) -> Self {
        Self { kind: EffectKind::Stat(effect), value_mod: None }
    }

    pub fn with_value_mod(mut self, value_mod: f64) -> Self {
        self.value_mod = Some(value_mod);
        self
    }

    /// The `type` tag as written in the data
    pub fn effect_type(&self) -> String {
        match &self.kind {
            EffectKind::Stat(stat) => match serde_json::to_value(stat) {
                Ok(Value::Object(map)) => map
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                _ => String::new(),
            },
            EffectKind::Passthrough { effect_type, .. } => effect_type.clone(),
        }
    }
}

impl TryFrom<Value> for AffixEffect {
    type Error = EffectError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut map) = value else {
            return Err(EffectError::NotAnObject);
        };

        let value_mod = map.remove("valueMod").and_then(|v| v.as_f64());
        let effect_type = map
            .get("type")
            .and_then(Value::as_str)
            .ok_or(EffectError::MissingType)?
            .to_string();

        let kind = if StatEffect::handles(&effect_type) {
            let stat = serde_json::from_value(Value::Object(map))
                .map_err(|source| EffectError::Malformed { effect_type, source })?;
            EffectKind::Stat(stat)
        } else {
            map.remove("type");
            EffectKind::Passthrough { effect_type, params: map }
        };

        Ok(Self { kind, value_mod })
    }
}

impl From<AffixEffect> for Value {
    fn from(effect: AffixEffect) -> Self {
        let mut map = match effect.kind {
            EffectKind::Stat(stat) => match serde_json::to_value(stat) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            EffectKind::Passthrough { effect_type, params } => {
                let mut map = Map::new();
                map.insert("type".to_string(), Value::String(effect_type));
                map.extend(params);
                map
            }
        };

        if let Some(value_mod) = effect.value_mod {
            map.insert("valueMod".to_string(), Value::from(value_mod));
        }

        Value::Object(map)
    }
}
