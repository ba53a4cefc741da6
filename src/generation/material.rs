//! Material resolution

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::{CategoryDef, Material, MaterialCatalog, SubTypeDef};
use crate::error::{ForgeError, ForgeResult};

/// Key of the main material in an item's component map
pub const PRIMARY_COMPONENT: &str = "primary";

/// Pick the item's primary material
///
/// A requested id is honoured only when it exists and the sub-type allows it.
/// Otherwise one of the sub-type's allowed materials is drawn (or any material
/// used by the category when the sub-type lists none). An unknown draw falls
/// back to the category default.
pub fn resolve_material<'a>(
    catalog: &MaterialCatalog<'a>,
    category: &CategoryDef,
    sub_type: &SubTypeDef,
    requested: Option<&str>,
    rng: &mut impl Rng,
) -> ForgeResult<&'a Material> {
    if let Some(requested) = requested {
        match catalog.get(requested) {
            Some(material) if sub_type.allows_material(requested) => return Ok(material),
            Some(_) => log::debug!(
                "Material '{}' not allowed for {}/{}, drawing another",
                requested,
                category.id,
                sub_type.id
            ),
            None => log::warn!("Unknown material '{}' requested, drawing another", requested),
        }
    }

    let drawn = if sub_type.allowed_materials.is_empty() {
        let mut candidates = catalog.applicable();
        if candidates.is_empty() {
            candidates = catalog.all();
        }
        candidates.choose(rng).map(|m| m.id.clone())
    } else {
        sub_type.allowed_materials.choose(rng).cloned()
    };

    if let Some(material) = drawn.as_deref().and_then(|id| catalog.get(id)) {
        return Ok(material);
    }

    log::warn!(
        "Material {:?} for {}/{} is not in the table, using default '{}'",
        drawn,
        category.id,
        sub_type.id,
        category.default_material
    );
    catalog
        .get(&category.default_material)
        .ok_or_else(|| ForgeError::MaterialUnavailable {
            category: category.id.clone(),
            sub_type: sub_type.id.clone(),
            default: category.default_material.clone(),
        })
}

/// Material per component, always including the primary one
pub fn resolve_components(
    catalog: &MaterialCatalog<'_>,
    category: &CategoryDef,
    primary: &Material,
    rng: &mut impl Rng,
) -> BTreeMap<String, String> {
    let mut materials = BTreeMap::new();
    materials.insert(PRIMARY_COMPONENT.to_string(), primary.id.clone());

    for component in &category.components {
        let known: Vec<&Material> = component
            .materials
            .iter()
            .filter_map(|id| catalog.get(id))
            .collect();
        let id = known
            .choose(rng)
            .map(|m| m.id.clone())
            .unwrap_or_else(|| primary.id.clone());
        materials.insert(component.id.clone(), id);
    }

    materials
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MaterialTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn table() -> MaterialTable {
        serde_json::from_value(json!({ "materials": [
            { "id": "steel", "name": "Steel", "palette": "steel", "categories": ["swords"] },
            { "id": "silver", "name": "Silver", "palette": "silver", "categories": ["jewelry", "swords"] },
            { "id": "gold", "name": "Gold", "palette": "gold", "categories": ["jewelry"] },
            { "id": "leather", "name": "Leather", "palette": "leather", "categories": [] }
        ] }))
        .unwrap()
    }

    fn category(default_material: &str) -> CategoryDef {
        serde_json::from_value(json!({
            "id": "jewelry", "name": "Jewelry", "idPrefix": "JWL", "visualFamily": "jewelry",
            "defaultMaterial": default_material,
            "components": [ { "id": "setting", "materials": ["gold", "platinum"] } ],
            "subTypes": [
                { "id": "ring", "name": "Ring", "baseValue": 20, "allowedMaterials": ["silver", "gold"] },
                { "id": "charm", "name": "Charm", "baseValue": 5 },
                { "id": "idol", "name": "Idol", "baseValue": 5, "allowedMaterials": ["moonstone"] }
            ],
            "affixes": {},
            "nameTemplates": ["{material} {subTypeName}"]
        }))
        .unwrap()
    }

    #[test]
    fn test_requested_material_is_used_when_allowed() {
        let table = table();
        let category = category("silver");
        let catalog = MaterialCatalog::new("jewelry", &[], &table);
        let mut rng = StdRng::seed_from_u64(1);

        let material = resolve_material(&catalog, &category, &category.sub_types[0], Some("GOLD"), &mut rng).unwrap();
        assert_eq!(material.id, "gold");
    }

    #[test]
    fn test_disallowed_request_draws_from_allowed() {
        let table = table();
        let category = category("silver");
        let catalog = MaterialCatalog::new("jewelry", &[], &table);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let material =
                resolve_material(&catalog, &category, &category.sub_types[0], Some("STEEL"), &mut rng).unwrap();
            assert!(material.id == "silver" || material.id == "gold");
        }
    }

    #[test]
    fn test_no_allowed_list_uses_category_materials() {
        let table = table();
        let category = category("silver");
        let catalog = MaterialCatalog::new("jewelry", &[], &table);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let material = resolve_material(&catalog, &category, &category.sub_types[1], None, &mut rng).unwrap();
            assert!(material.applies_to("jewelry"));
        }
    }

    #[test]
    fn test_unknown_draw_falls_back_to_default() {
        let table = table();
        let mut rng = StdRng::seed_from_u64(1);

        let category = category("silver");
        let catalog = MaterialCatalog::new("jewelry", &[], &table);
        let material = resolve_material(&catalog, &category, &category.sub_types[2], None, &mut rng).unwrap();
        assert_eq!(material.id, "silver");

        let broken = self::category("platinum");
        let result = resolve_material(&catalog, &broken, &broken.sub_types[2], None, &mut rng);
        assert!(matches!(result, Err(ForgeError::MaterialUnavailable { .. })));
    }

    #[test]
    fn test_components_skip_unknown_materials() {
        let table = table();
        let category = category("silver");
        let catalog = MaterialCatalog::new("jewelry", &[], &table);
        let mut rng = StdRng::seed_from_u64(1);

        let primary = table.get("silver").unwrap();
        let materials = resolve_components(&catalog, &category, primary, &mut rng);
        assert_eq!(materials.get(PRIMARY_COMPONENT).map(String::as_str), Some("silver"));
        assert_eq!(materials.get("setting").map(String::as_str), Some("gold"));
    }
}
