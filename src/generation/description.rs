//! Item description text
//!
//! Mechanical assembly of sentences; no attempt at prose quality.

use serde_json::{Map, Value};

use crate::data::{Material, SubTypeDef};
use crate::items::{MagicalProperty, Rarity};

pub fn build_description(
    rarity: Rarity,
    material: &Material,
    sub_type: &SubTypeDef,
    properties: &[MagicalProperty],
    item_data: &Map<String, Value>,
) -> String {
    let mut sentences = Vec::new();

    let rarity_word = rarity.name().to_lowercase();
    sentences.push(format!(
        "{} {} {} {}.",
        article(&rarity_word),
        rarity_word,
        material.name.to_lowercase(),
        sub_type.name.to_lowercase()
    ));

    if let Some(flavor) = sub_type.flavor.as_deref().filter(|f| !f.trim().is_empty()) {
        sentences.push(flavor.trim().to_string());
    }

    sentences.extend(art_hints(item_data));

    for property in properties {
        let text = property.description.trim();
        if !text.is_empty() {
            sentences.push(text.to_string());
        }
    }

    sentences.join(" ")
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "An",
        _ => "A",
    }
}

/// Sentences derived from the art generator's metadata
fn art_hints(item_data: &Map<String, Value>) -> Vec<String> {
    let mut hints = Vec::new();

    if item_data.get("hasGem").and_then(Value::as_bool).unwrap_or(false) {
        match item_data.get("gemMaterial").and_then(Value::as_str) {
            Some(gem) => hints.push(format!("It is set with {} {}.", indefinite(gem), gem)),
            None => hints.push("It is set with a gem.".to_string()),
        }
    }

    if let Some(style) = item_data.get("robeBodyStyle").and_then(Value::as_str) {
        hints.push(format!("The cloth is cut in {} {} style.", indefinite(style), style.replace('_', " ")));
    }

    if let Some(color) = item_data.get("liquidColor").and_then(Value::as_str) {
        hints.push(format!("The liquid inside is {}.", color));
    }

    hints
}

fn indefinite(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}
