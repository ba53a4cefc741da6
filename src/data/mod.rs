//! Generation data
//!
//! Materials and per-category configuration, loaded from JSON files
//! so new categories and affixes need no code changes.

pub mod categories;
pub mod loader;
pub mod materials;

pub use categories::{BonusAttributeRule, CategoryDef, ComponentDef, RequirementAdjustment, SubTypeDef, WordLists};
pub use loader::{export_default_data, ForgeData};
pub use materials::{Material, MaterialCatalog, MaterialModifiers, MaterialTable};
