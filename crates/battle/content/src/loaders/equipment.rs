//! Equipment catalog loader.

use std::path::Path;

use battle_core::Equipment;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique_ids, read_file};

/// Equipment catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentCatalog {
    pub equipment: Vec<Equipment>,
}

/// Loader for equipment from RON files.
pub struct EquipmentLoader;

impl EquipmentLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Equipment>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<Equipment>> {
        let catalog: EquipmentCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse equipment catalog RON: {}", e))?;

        ensure_unique_ids("equipment", catalog.equipment.iter().map(|e| e.id.as_str()))?;
        if let Some(item) = catalog.equipment.iter().find(|e| e.id.is_empty()) {
            anyhow::bail!("Equipment '{}' has an empty id", item.name);
        }

        Ok(catalog.equipment)
    }
}

#[cfg(test)]
mod tests {
    use battle_core::EquipmentSlot;

    use super::*;

    #[test]
    fn parses_slots_and_bonuses() {
        let content = r#"(equipment: [
            (id: "long-sword", name: "Long Sword", slot: weapon, statBonus: (atk: 8)),
            (id: "lucky-cap", name: "Lucky Cap", slot: helm),
        ])"#;

        let items = EquipmentLoader::parse(content).unwrap();

        assert_eq!(items[0].slot, EquipmentSlot::Weapon);
        assert_eq!(items[0].stat_bonus.atk, 8);
        assert_eq!(items[1].slot, EquipmentSlot::Helm);
        assert_eq!(items[1].stat_bonus.def, 0);
    }
}
