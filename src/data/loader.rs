//! JSON data loader
//!
//! Loads the material table and category definitions from a data directory,
//! falling back per file to the copies embedded in the binary.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::categories::CategoryDef;
use super::materials::{MaterialCatalog, MaterialTable};
use crate::config::ForgeConfig;
use crate::error::{ForgeError, ForgeResult};

const MATERIALS_FILE: &str = "materials.json";
const CATEGORIES_DIR: &str = "categories";

const EMBEDDED_MATERIALS: &str = include_str!("../../assets/data/materials.json");

const EMBEDDED_CATEGORIES: [(&str, &str); 14] = [
    ("swords.json", include_str!("../../assets/data/categories/swords.json")),
    ("axes.json", include_str!("../../assets/data/categories/axes.json")),
    ("blunt.json", include_str!("../../assets/data/categories/blunt.json")),
    ("bows.json", include_str!("../../assets/data/categories/bows.json")),
    ("staves.json", include_str!("../../assets/data/categories/staves.json")),
    ("armor.json", include_str!("../../assets/data/categories/armor.json")),
    ("robes.json", include_str!("../../assets/data/categories/robes.json")),
    ("shields.json", include_str!("../../assets/data/categories/shields.json")),
    ("headwear.json", include_str!("../../assets/data/categories/headwear.json")),
    ("gloves.json", include_str!("../../assets/data/categories/gloves.json")),
    ("footwear.json", include_str!("../../assets/data/categories/footwear.json")),
    ("jewelry.json", include_str!("../../assets/data/categories/jewelry.json")),
    ("books.json", include_str!("../../assets/data/categories/books.json")),
    ("potions.json", include_str!("../../assets/data/categories/potions.json")),
];

/// All static generation data
#[derive(Debug, Clone)]
pub struct ForgeData {
    /// Global material table
    pub materials: MaterialTable,
    /// Category definitions, in load order
    pub categories: Vec<CategoryDef>,
}

impl ForgeData {
    /// Data compiled into the binary
    pub fn embedded() -> ForgeResult<Self> {
        let materials = parse(MATERIALS_FILE, EMBEDDED_MATERIALS)?;
        let categories = EMBEDDED_CATEGORIES
            .iter()
            .map(|(file, content)| parse(file, content))
            .collect::<ForgeResult<Vec<CategoryDef>>>()?;

        let data = Self { materials, categories };
        data.validate()?;
        Ok(data)
    }

    /// Load data from a directory; any missing or broken file falls back to its embedded copy
    pub fn load(dir: &Path) -> ForgeResult<Self> {
        let materials = Self::load_file(dir, MATERIALS_FILE, EMBEDDED_MATERIALS)?;

        let categories_dir = dir.join(CATEGORIES_DIR);
        let mut categories = Vec::with_capacity(EMBEDDED_CATEGORIES.len());
        for (file, content) in EMBEDDED_CATEGORIES {
            categories.push(Self::load_file::<CategoryDef>(&categories_dir, file, content)?);
        }

        // Extra categories that have no embedded counterpart
        if categories_dir.is_dir() {
            let entries = fs::read_dir(&categories_dir)
                .map_err(|e| ForgeError::io(&categories_dir, e))?;
            let mut extra_files: Vec<_> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter(|path| {
                    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
                    !EMBEDDED_CATEGORIES.iter().any(|(file, _)| *file == name)
                })
                .collect();
            extra_files.sort();

            for path in extra_files {
                match read_json::<CategoryDef>(&path) {
                    Ok(category) => {
                        log::info!("Loaded extra category '{}' from {:?}", category.id, path);
                        categories.retain(|c| c.id != category.id);
                        categories.push(category);
                    }
                    Err(e) => log::warn!("Skipping {:?}: {}", path, e),
                }
            }
        }

        let data = Self { materials, categories };
        data.validate()?;
        log::info!(
            "Loaded {} materials and {} categories from {:?}",
            data.materials.len(),
            data.categories.len(),
            dir
        );
        Ok(data)
    }

    /// Load from the configured data directory, or the embedded data
    pub fn from_config(config: &ForgeConfig) -> ForgeResult<Self> {
        match &config.data_dir {
            Some(dir) => Self::load(dir),
            None => Self::embedded(),
        }
    }

    fn load_file<T: DeserializeOwned>(dir: &Path, file: &str, embedded: &str) -> ForgeResult<T> {
        let path = dir.join(file);
        if path.exists() {
            match read_json(&path) {
                Ok(value) => return Ok(value),
                Err(e) => log::warn!("Failed to load {:?}: {}. Using built-in {}", path, e, file),
            }
        } else {
            log::debug!("{:?} not found, using built-in {}", path, file);
        }
        parse(file, embedded)
    }

    /// Check that the data can drive generation
    pub fn validate(&self) -> ForgeResult<()> {
        if self.categories.is_empty() {
            return Err(ForgeError::NoCategories);
        }

        for category in &self.categories {
            category.validate()?;

            let catalog = self.material_catalog(category);
            if !catalog.contains(&category.default_material) {
                log::warn!(
                    "Category '{}' default material '{}' is not in the material table",
                    category.id,
                    category.default_material
                );
            }
            for sub_type in &category.sub_types {
                for material in &sub_type.allowed_materials {
                    if !catalog.contains(material) {
                        log::warn!(
                            "Sub-type '{}/{}' allows unknown material '{}'",
                            category.id,
                            sub_type.id,
                            material
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Find a category by id, name or alias
    pub fn category(&self, query: &str) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.matches(query))
    }

    /// Material lookup scoped to a category
    pub fn material_catalog<'a>(&'a self, category: &'a CategoryDef) -> MaterialCatalog<'a> {
        MaterialCatalog::new(&category.id, &category.materials, &self.materials)
    }

    pub fn category_ids(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.id.as_str())
    }
}

fn parse<T: DeserializeOwned>(file: &str, content: &str) -> ForgeResult<T> {
    serde_json::from_str(content).map_err(|source| ForgeError::DataParse {
        file: file.to_string(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ForgeResult<T> {
    let content = fs::read_to_string(path).map_err(|e| ForgeError::io(path, e))?;
    parse(&path.display().to_string(), &content)
}

/// Export the built-in data files for editing
pub fn export_default_data(dir: &Path) -> ForgeResult<()> {
    let categories_dir = dir.join(CATEGORIES_DIR);
    fs::create_dir_all(&categories_dir).map_err(|e| ForgeError::io(&categories_dir, e))?;

    let materials_path = dir.join(MATERIALS_FILE);
    fs::write(&materials_path, EMBEDDED_MATERIALS).map_err(|e| ForgeError::io(&materials_path, e))?;

    for (file, content) in EMBEDDED_CATEGORIES {
        let path = categories_dir.join(file);
        fs::write(&path, content).map_err(|e| ForgeError::io(&path, e))?;
    }

    log::info!("Exported default data to {:?}", dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::Rarity;

    #[test]
    fn test_embedded_data_loads() {
        let data = ForgeData::embedded().unwrap();
        assert_eq!(data.categories.len(), 14);
        assert!(data.materials.get("steel").is_some());
        assert!(data.category("ring").is_some());
        assert!(data.category("sword").is_some());
    }

    #[test]
    fn test_every_sub_type_can_roll_legendary() {
        // Two distinct major affixes must be reachable for every sub-type
        let data = ForgeData::embedded().unwrap();
        for category in &data.categories {
            for sub_type in &category.sub_types {
                let majors = category
                    .affixes
                    .major_prefixes
                    .iter()
                    .chain(&category.affixes.major_suffixes)
                    .filter(|a| a.is_eligible(&category.id, &sub_type.id, Rarity::Legendary))
                    .count();
                assert!(majors >= 2, "{}/{} has {} legendary majors", category.id, sub_type.id, majors);
            }
        }
    }

    #[test]
    fn test_export_then_load() {
        let dir = tempfile::tempdir().unwrap();
        export_default_data(dir.path()).unwrap();

        assert!(dir.path().join("materials.json").exists());
        assert!(dir.path().join("categories/swords.json").exists());

        let loaded = ForgeData::load(dir.path()).unwrap();
        let embedded = ForgeData::embedded().unwrap();
        assert_eq!(loaded.materials, embedded.materials);
        assert_eq!(loaded.categories, embedded.categories);
    }

    #[test]
    fn test_broken_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        export_default_data(dir.path()).unwrap();
        fs::write(dir.path().join("categories/potions.json"), "{ not json").unwrap();

        let loaded = ForgeData::load(dir.path()).unwrap();
        assert!(loaded.category("potions").is_some());
    }

    #[test]
    fn test_missing_dir_uses_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ForgeData::load(&dir.path().join("nowhere")).unwrap();
        assert_eq!(loaded.categories.len(), 14);
    }

    #[test]
    fn test_extra_category_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        export_default_data(dir.path()).unwrap();

        let mut wands = ForgeData::embedded().unwrap().category("staves").unwrap().clone();
        wands.id = "wands".to_string();
        wands.aliases = vec!["wand".to_string()];
        wands.name = "Wand".to_string();
        fs::write(
            dir.path().join("categories/wands.json"),
            serde_json::to_string(&wands).unwrap(),
        )
        .unwrap();

        let loaded = ForgeData::load(dir.path()).unwrap();
        assert_eq!(loaded.categories.len(), 15);
        assert!(loaded.category("wand").is_some());
    }
}
