//! Ability catalog loader.

use std::path::Path;

use battle_core::Ability;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique_ids, read_file};

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<Ability>,
}

/// Loader for ability definitions from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load ability catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing AbilityCatalog
    ///
    /// # Returns
    ///
    /// Returns the abilities in file order. Every ability is validated and
    /// ids must be unique within the file.
    pub fn load(path: &Path) -> LoadResult<Vec<Ability>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<Ability>> {
        let catalog: AbilityCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        ensure_unique_ids("ability", catalog.abilities.iter().map(|a| a.id.as_str()))?;
        for ability in &catalog.abilities {
            ability
                .validate()
                .into_result()
                .map_err(|e| anyhow::anyhow!("Invalid ability '{}': {}", ability.id, e))?;
        }

        Ok(catalog.abilities)
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{AbilityKind, Element, Percent, StatKind, StatusEffect, TargetScope};
    use tempfile::TempDir;

    use super::*;

    const ABILITIES: &str = r#"(
        abilities: [
            (
                id: "flare",
                name: "Flare",
                kind: psynergy,
                element: Mars,
                manaCost: 2,
                basePower: 28,
                targets: singleEnemy,
                splashDamagePercent: 30,
                applies: [(type: "burn", damagePerTurn: 6, duration: 2)],
                applyChance: Some(40),
            ),
            (
                id: "guard",
                name: "Guard",
                kind: buff,
                targets: self,
                applies: [(type: "buff", stat: "def", modifier: 25, duration: 3)],
            ),
        ],
    )"#;

    #[test]
    fn loads_abilities_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("abilities.ron");
        std::fs::write(&path, ABILITIES).unwrap();

        let abilities = AbilityLoader::load(&path).unwrap();

        assert_eq!(abilities.len(), 2);
        let flare = &abilities[0];
        assert_eq!(flare.kind, AbilityKind::Psynergy);
        assert_eq!(flare.element, Element::Mars);
        assert_eq!(flare.splash_damage_percent, Percent::saturating(30));
        assert_eq!(flare.apply_chance, Some(Percent::saturating(40)));
        assert_eq!(
            flare.applies,
            vec![StatusEffect::Burn {
                damage_per_turn: 6,
                duration: 2
            }]
        );

        let guard = &abilities[1];
        assert_eq!(guard.targets, TargetScope::User);
        assert_eq!(guard.unlock_level, 1);
        assert_eq!(
            guard.applies,
            vec![StatusEffect::Buff {
                stat: StatKind::Def,
                modifier: 25,
                duration: 3
            }]
        );
    }

    #[test]
    fn missing_file_names_the_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.ron");
        let err = AbilityLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("nope.ron"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let content = r#"(abilities: [
            (id: "jab", name: "Jab", kind: physical, targets: singleEnemy),
            (id: "jab", name: "Jab", kind: physical, targets: singleEnemy),
        ])"#;
        let err = AbilityLoader::parse(content).unwrap_err();
        assert!(err.to_string().contains("Duplicate ability id 'jab'"));
    }

    #[test]
    fn out_of_range_mana_cost_is_rejected() {
        let content = r#"(abilities: [
            (id: "meteor", name: "Meteor", kind: psynergy, manaCost: 11, targets: allEnemies),
        ])"#;
        let err = AbilityLoader::parse(content).unwrap_err();
        assert!(err.to_string().contains("manaCost"));
    }
}
