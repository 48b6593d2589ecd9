//! Unit template loader.
//!
//! Loads recruitable heroes and enemies alike; both are plain
//! [`UnitTemplate`]s distinguished only by how they are used.

use std::path::Path;

use battle_core::{BattleConfig, UnitTemplate};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique_ids, read_file};

/// Unit template catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCatalog {
    pub templates: Vec<UnitTemplate>,
}

/// Loader for unit templates from RON files.
pub struct UnitLoader;

impl UnitLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<UnitTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<UnitTemplate>> {
        let catalog: UnitCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalog RON: {}", e))?;

        ensure_unique_ids("unit template", catalog.templates.iter().map(|t| t.id.as_str()))?;
        for template in &catalog.templates {
            if template.id.is_empty() {
                anyhow::bail!("Unit template '{}' has an empty id", template.name);
            }
            if !(BattleConfig::MIN_LEVEL..=BattleConfig::MAX_LEVEL).contains(&template.level) {
                anyhow::bail!(
                    "Unit template '{}' has level {} outside {}..={}",
                    template.id,
                    template.level,
                    BattleConfig::MIN_LEVEL,
                    BattleConfig::MAX_LEVEL
                );
            }
            if template.base_stats.hp <= 0 {
                anyhow::bail!("Unit template '{}' needs positive base HP", template.id);
            }
        }

        Ok(catalog.templates)
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{Element, Stats};

    use super::*;

    #[test]
    fn parses_templates_with_defaults() {
        let content = r#"(templates: [
            (
                id: "slime",
                name: "Slime",
                element: Mercury,
                baseStats: (hp: 40, atk: 6, def: 4, spd: 3),
                abilities: ["ooze"],
            ),
        ])"#;

        let templates = UnitLoader::parse(content).unwrap();

        let slime = &templates[0];
        assert_eq!(slime.element, Element::Mercury);
        assert_eq!(slime.base_stats, Stats::new(40, 0, 6, 4, 0, 3));
        assert_eq!(slime.growth_rates, Stats::ZERO);
        assert_eq!(slime.level, 1);
        assert_eq!(slime.abilities, vec!["ooze".to_string()]);
    }

    #[test]
    fn level_above_cap_is_rejected() {
        let content = r#"(templates: [
            (id: "dragon", name: "Dragon", baseStats: (hp: 900), level: 30),
        ])"#;
        let err = UnitLoader::parse(content).unwrap_err();
        assert!(err.to_string().contains("level 30"));
    }
}
