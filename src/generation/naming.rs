//! Name composition
//!
//! Name templates such as `"{prefix} {material} {subTypeName} {suffix}"` are
//! parsed once into literal and placeholder segments. Substitution walks the
//! segments a single time, so substituted text is never re-scanned.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::WordLists;

/// Names shorter than this are rebuilt
const MIN_NAME_LEN: usize = 3;

const ADJECTIVE_LIST: &str = "adjective";
const NOUN_ABSTRACT_LIST: &str = "noun_abstract";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    Prefix,
    Suffix,
    Material,
    SubTypeName,
    Adjective,
    NounAbstract,
    /// A category word list (`{epithet}`, `{place}`, ...)
    WordList(String),
}

impl Placeholder {
    fn parse(key: &str) -> Self {
        match key {
            "prefix" => Placeholder::Prefix,
            "suffix" => Placeholder::Suffix,
            "material" => Placeholder::Material,
            "subTypeName" => Placeholder::SubTypeName,
            ADJECTIVE_LIST => Placeholder::Adjective,
            NOUN_ABSTRACT_LIST => Placeholder::NounAbstract,
            other => Placeholder::WordList(other.to_string()),
        }
    }

    /// Word list this placeholder draws from, if any
    pub fn word_list(&self) -> Option<&str> {
        match self {
            Placeholder::Adjective => Some(ADJECTIVE_LIST),
            Placeholder::NounAbstract => Some(NOUN_ABSTRACT_LIST),
            Placeholder::WordList(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Slot(Placeholder),
}

/// A parsed name template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NameTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl NameTemplate {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                break;
            };

            let key = &after[..close];
            if key.is_empty() || key.contains('{') {
                // Not a placeholder; keep the brace as text
                literal.push_str(&rest[..=open]);
                rest = after;
                continue;
            }

            literal.push_str(&rest[..open]);
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Slot(Placeholder::parse(key.trim())));
            rest = &after[close + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { source: source.to_string(), segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Word lists referenced by this template
    pub fn word_lists(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(p) => p.word_list(),
            Segment::Literal(_) => None,
        })
    }

    /// Fill in the template
    pub fn render(&self, parts: &NameParts<'_>, words: &WordLists, rng: &mut impl Rng) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Placeholder::Prefix) => {
                    out.push_str(affix_or_adjective(parts.prefix, words, rng))
                }
                Segment::Slot(Placeholder::Suffix) => {
                    out.push_str(affix_or_adjective(parts.suffix, words, rng))
                }
                Segment::Slot(Placeholder::Material) => out.push_str(parts.material),
                Segment::Slot(Placeholder::SubTypeName) => out.push_str(parts.sub_type_name),
                Segment::Slot(other) => {
                    if let Some(word) = other.word_list().and_then(|list| words.pick(list, rng)) {
                        out.push_str(word);
                    }
                }
            }
        }
        out
    }
}

fn affix_or_adjective<'a>(
    affix: Option<&'a str>,
    words: &'a WordLists,
    rng: &mut impl Rng,
) -> &'a str {
    affix
        .filter(|name| !name.trim().is_empty())
        .or_else(|| words.pick(ADJECTIVE_LIST, rng))
        .unwrap_or_default()
}

impl From<String> for NameTemplate {
    fn from(source: String) -> Self {
        Self::parse(&source)
    }
}

impl From<NameTemplate> for String {
    fn from(template: NameTemplate) -> Self {
        template.source
    }
}

impl fmt::Display for NameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// The resolved pieces a name is built from
#[derive(Debug, Clone, Copy)]
pub struct NameParts<'a> {
    /// Name of the first applied prefix affix
    pub prefix: Option<&'a str>,
    /// Name of the first applied suffix affix
    pub suffix: Option<&'a str>,
    /// Material display name
    pub material: &'a str,
    pub sub_type_name: &'a str,
}

/// Pick a template, fill it, and fall back to plain names when the result is unusable
pub fn compose_name(
    templates: &[NameTemplate],
    words: &WordLists,
    parts: &NameParts<'_>,
    rng: &mut impl Rng,
) -> String {
    let composed = templates
        .choose(rng)
        .map(|template| collapse_whitespace(&template.render(parts, words, rng)))
        .unwrap_or_default();

    if !is_degenerate(&composed) {
        return capitalize(&composed);
    }
    log::debug!("Degenerate name {:?}, rebuilding", composed);

    let rebuilt = join_parts(&[
        parts.prefix.unwrap_or_default(),
        parts.material,
        parts.sub_type_name,
        parts.suffix.unwrap_or_default(),
    ]);
    if !is_degenerate(&rebuilt) {
        return capitalize(&rebuilt);
    }

    log::warn!("Could not build a usable name for {:?}", parts.sub_type_name);
    capitalize(&join_parts(&[parts.material, parts.sub_type_name]))
}

fn join_parts(parts: &[&str]) -> String {
    collapse_whitespace(&parts.join(" "))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Empty, too short, or leaking a missing value
pub fn is_degenerate(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.chars().count() < MIN_NAME_LEN || trimmed.contains("undefined") || trimmed.contains("null")
}

/// Uppercase the first character
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn words() -> WordLists {
        let mut words = WordLists::default();
        words.insert("adjective", vec!["gleaming".to_string()]);
        words.insert("noun_abstract", vec!["Dawn".to_string()]);
        words.insert("epithet", vec!["the Bold".to_string()]);
        words
    }

    fn parts<'a>(prefix: Option<&'a str>, suffix: Option<&'a str>) -> NameParts<'a> {
        NameParts { prefix, suffix, material: "Steel", sub_type_name: "Longsword" }
    }

    #[test]
    fn test_parse_segments() {
        let template = NameTemplate::parse("{adjective} {subTypeName} of {epithet}");
        assert_eq!(
            template.segments(),
            &[
                Segment::Slot(Placeholder::Adjective),
                Segment::Literal(" ".to_string()),
                Segment::Slot(Placeholder::SubTypeName),
                Segment::Literal(" of ".to_string()),
                Segment::Slot(Placeholder::WordList("epithet".to_string())),
            ]
        );
        assert_eq!(template.word_lists().collect::<Vec<_>>(), vec!["adjective", "epithet"]);
    }

    #[test]
    fn test_unclosed_brace_is_literal() {
        let template = NameTemplate::parse("{material} of {doom");
        assert_eq!(template.segments().len(), 2);
        assert_eq!(template.segments()[1], Segment::Literal(" of {doom".to_string()));
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let mut rng = StdRng::seed_from_u64(1);
        let template = NameTemplate::parse("{material} {subTypeName}");
        let tricky = NameParts { prefix: None, suffix: None, material: "{prefix}", sub_type_name: "Blade" };
        assert_eq!(template.render(&tricky, &words(), &mut rng), "{prefix} Blade");
    }

    #[test]
    fn test_missing_affix_falls_back_to_adjective() {
        let mut rng = StdRng::seed_from_u64(1);
        let template = NameTemplate::parse("{prefix} {subTypeName}");
        let name = template.render(&parts(None, None), &words(), &mut rng);
        assert_eq!(name, "gleaming Longsword");
    }

    #[test]
    fn test_compose_uses_affix_names() {
        let mut rng = StdRng::seed_from_u64(3);
        let templates = vec![NameTemplate::parse("{prefix}  {material} {subTypeName} {suffix} ")];
        let name = compose_name(&templates, &words(), &parts(Some("Flaming"), Some("of Doom")), &mut rng);
        assert_eq!(name, "Flaming Steel Longsword of Doom");
    }

    #[test]
    fn test_degenerate_template_is_rebuilt() {
        let mut rng = StdRng::seed_from_u64(3);
        let templates = vec![NameTemplate::parse("{missing_list}")];
        let name = compose_name(&templates, &words(), &parts(Some("Keen"), None), &mut rng);
        assert_eq!(name, "Keen Steel Longsword");

        let templates = vec![NameTemplate::parse("null {subTypeName}")];
        let name = compose_name(&templates, &words(), &parts(None, None), &mut rng);
        assert_eq!(name, "Steel Longsword");
    }

    #[test]
    fn test_no_templates_still_names_item() {
        let mut rng = StdRng::seed_from_u64(3);
        let name = compose_name(&[], &words(), &parts(None, Some("of Ash")), &mut rng);
        assert_eq!(name, "Steel Longsword of Ash");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("gleaming blade"), "Gleaming blade");
        assert_eq!(capitalize("éclat"), "Éclat");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_is_degenerate() {
        assert!(is_degenerate(""));
        assert!(is_degenerate("ab"));
        assert!(is_degenerate("undefined Sword"));
        assert!(!is_degenerate("Axe"));
    }
}
