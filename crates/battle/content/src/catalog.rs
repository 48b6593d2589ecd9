//! In-memory content catalog backing the engine oracles.

use std::collections::BTreeMap;

use battle_core::{
    Ability, AbilityOracle, EncounterDefinition, EncounterOracle, Equipment, EquipmentOracle,
    EquipmentReward, UnitOracle, UnitTemplate, ValidationErrors,
};

/// Every piece of static content a battle can reference, keyed by id.
///
/// A single catalog implements all four read-only oracles, so it plugs
/// straight into [`battle_core::BattleEnv::with_all`].
#[derive(Clone, Debug, Default)]
pub struct ContentCatalog {
    abilities: BTreeMap<String, Ability>,
    templates: BTreeMap<String, UnitTemplate>,
    encounters: BTreeMap<String, EncounterDefinition>,
    equipment: BTreeMap<String, Equipment>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an ability, returning the entry it replaced.
    pub fn insert_ability(&mut self, ability: Ability) -> Option<Ability> {
        self.abilities.insert(ability.id.clone(), ability)
    }

    pub fn insert_template(&mut self, template: UnitTemplate) -> Option<UnitTemplate> {
        self.templates.insert(template.id.clone(), template)
    }

    pub fn insert_encounter(
        &mut self,
        encounter: EncounterDefinition,
    ) -> Option<EncounterDefinition> {
        self.encounters.insert(encounter.id.clone(), encounter)
    }

    pub fn insert_equipment(&mut self, item: Equipment) -> Option<Equipment> {
        self.equipment.insert(item.id.clone(), item)
    }

    pub fn ability_count(&self) -> usize {
        self.abilities.len()
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn encounter_count(&self) -> usize {
        self.encounters.len()
    }

    pub fn equipment_count(&self) -> usize {
        self.equipment.len()
    }

    /// Checks every entry on its own and every id one entry uses to point
    /// at another.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for (id, ability) in &self.abilities {
            errors.extend_prefixed(&format!("abilities[{id}]"), ability.validate());
        }

        for (id, template) in &self.templates {
            for (i, ability) in template.abilities.iter().enumerate() {
                if !self.abilities.contains_key(ability) {
                    errors.push(
                        format!("templates[{id}].abilities[{i}]"),
                        format!("unknown ability '{ability}'"),
                    );
                }
            }
        }

        for (id, encounter) in &self.encounters {
            let prefix = format!("encounters[{id}]");
            errors.extend_prefixed(&prefix, encounter.validate());

            for (i, enemy) in encounter.enemies.iter().enumerate() {
                if !enemy.is_empty() && !self.templates.contains_key(enemy) {
                    errors.push(
                        format!("{prefix}.enemies[{i}]"),
                        format!("unknown unit template '{enemy}'"),
                    );
                }
            }

            if let Some(rule) = encounter.phase_change() {
                if !rule.add_ability.is_empty() && !self.abilities.contains_key(&rule.add_ability)
                {
                    errors.push(
                        format!("{prefix}.rules.phaseChange.addAbility"),
                        format!("unknown ability '{}'", rule.add_ability),
                    );
                }
            }

            let rewarded: Vec<&String> = match &encounter.reward.equipment {
                EquipmentReward::None => Vec::new(),
                EquipmentReward::Fixed { item_id } => vec![item_id],
                EquipmentReward::Choice { options } => options.iter().collect(),
            };
            for item in rewarded {
                if !item.is_empty() && !self.equipment.contains_key(item) {
                    errors.push(
                        format!("{prefix}.reward.equipment"),
                        format!("unknown equipment '{item}'"),
                    );
                }
            }
        }

        errors
    }
}

impl AbilityOracle for ContentCatalog {
    fn ability(&self, id: &str) -> Option<Ability> {
        self.abilities.get(id).cloned()
    }

    fn ability_ids(&self) -> Vec<String> {
        self.abilities.keys().cloned().collect()
    }
}

impl UnitOracle for ContentCatalog {
    fn template(&self, id: &str) -> Option<UnitTemplate> {
        self.templates.get(id).cloned()
    }

    fn template_ids(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }
}

impl EncounterOracle for ContentCatalog {
    fn encounter(&self, id: &str) -> Option<EncounterDefinition> {
        self.encounters.get(id).cloned()
    }

    fn encounter_ids(&self) -> Vec<String> {
        self.encounters.keys().cloned().collect()
    }
}

impl EquipmentOracle for ContentCatalog {
    fn equipment(&self, id: &str) -> Option<Equipment> {
        self.equipment.get(id).cloned()
    }

    fn equipment_ids(&self) -> Vec<String> {
        self.equipment.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{
        AbilityKind, Element, EncounterReward, EncounterRules, EquipmentSlot, PhaseChangeRule,
        Percent, Stats, TargetScope,
    };

    use super::*;

    fn encounter(enemies: &[&str], equipment: EquipmentReward) -> EncounterDefinition {
        EncounterDefinition {
            id: "cave".into(),
            name: "Cave".into(),
            enemies: enemies.iter().map(|e| e.to_string()).collect(),
            difficulty: None,
            rules: Some(EncounterRules {
                phase_change: Some(PhaseChangeRule {
                    hp_pct: Percent::HALF,
                    add_ability: "howl".into(),
                }),
            }),
            reward: EncounterReward {
                xp: 10,
                gold: 5,
                equipment,
            },
        }
    }

    fn catalog() -> ContentCatalog {
        let mut catalog = ContentCatalog::new();
        catalog.insert_ability(
            Ability::new("howl", "Howl", AbilityKind::Buff, TargetScope::User),
        );
        let mut wolf = UnitTemplate::new("wolf", "Wolf", Element::Neutral, Stats::ZERO);
        wolf.abilities = vec!["howl".into()];
        catalog.insert_template(wolf);
        catalog.insert_equipment(Equipment::new(
            "fang",
            "Fang",
            EquipmentSlot::Accessory,
            Stats::ZERO,
        ));
        catalog
    }

    #[test]
    fn consistent_catalog_has_no_errors() {
        let mut catalog = catalog();
        catalog.insert_encounter(encounter(
            &["wolf", "wolf"],
            EquipmentReward::Fixed {
                item_id: "fang".into(),
            },
        ));

        assert!(catalog.validate().is_empty());
        assert_eq!(catalog.ability_ids(), vec!["howl".to_string()]);
        assert!(catalog.template("wolf").is_some());
    }

    #[test]
    fn dangling_references_are_reported_by_path() {
        let mut catalog = catalog();
        catalog.insert_encounter(encounter(
            &["wolf", "bear"],
            EquipmentReward::Fixed {
                item_id: "pelt".into(),
            },
        ));
        let mut hermit = UnitTemplate::new("hermit", "Hermit", Element::Venus, Stats::ZERO);
        hermit.abilities = vec!["quake".into()];
        catalog.insert_template(hermit);

        let errors = catalog.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains_path("encounters[cave].enemies[1]"));
        assert!(errors.contains_path("encounters[cave].reward.equipment"));
        assert!(errors.contains_path("templates[hermit].abilities[0]"));
    }

    #[test]
    fn insert_replaces_by_id() {
        let mut catalog = catalog();
        let replaced = catalog.insert_ability(
            Ability::new("howl", "Loud Howl", AbilityKind::Buff, TargetScope::User),
        );
        assert_eq!(replaced.map(|a| a.name), Some("Howl".to_string()));
        assert_eq!(catalog.ability_count(), 1);
    }
}
