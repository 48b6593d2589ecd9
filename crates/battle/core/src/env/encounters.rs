//! Encounter definitions: who you fight and what you win.

use std::collections::BTreeSet;

use crate::config::BattleConfig;
use crate::error::ValidationErrors;
use crate::state::Percent;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Boss,
}

/// Enemy gains `add_ability` once its HP falls to `hp_pct` of max or lower.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PhaseChangeRule {
    pub hp_pct: Percent,
    pub add_ability: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct EncounterRules {
    pub phase_change: Option<PhaseChangeRule>,
}

/// Equipment granted on victory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum EquipmentReward {
    #[default]
    None,
    Fixed {
        item_id: String,
    },
    /// The player picks exactly one of three distinct items.
    Choice {
        options: Vec<String>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct EncounterReward {
    pub xp: u32,
    pub gold: u32,
    pub equipment: EquipmentReward,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EncounterDefinition {
    pub id: String,
    pub name: String,
    /// Enemy template ids. Repeats spawn several copies.
    pub enemies: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub difficulty: Option<Difficulty>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rules: Option<EncounterRules>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reward: EncounterReward,
}

impl EncounterDefinition {
    pub fn phase_change(&self) -> Option<&PhaseChangeRule> {
        self.rules.as_ref().and_then(|r| r.phase_change.as_ref())
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.id.is_empty() {
            errors.push("id", "must not be empty");
        }
        if self.enemies.is_empty() {
            errors.push("enemies", "at least one enemy is required");
        }
        for (i, enemy) in self.enemies.iter().enumerate() {
            if enemy.is_empty() {
                errors.push(format!("enemies[{i}]"), "must not be empty");
            }
        }
        if self.phase_change().is_some_and(|rule| rule.add_ability.is_empty()) {
            errors.push("rules.phaseChange.addAbility", "must not be empty");
        }
        match &self.reward.equipment {
            EquipmentReward::None => {}
            EquipmentReward::Fixed { item_id } => {
                if item_id.is_empty() {
                    errors.push("reward.equipment.itemId", "must not be empty");
                }
            }
            EquipmentReward::Choice { options } => {
                if options.len() != BattleConfig::CHOICE_OPTIONS {
                    errors.push(
                        "reward.equipment.options",
                        format!(
                            "expected exactly {} options, found {}",
                            BattleConfig::CHOICE_OPTIONS,
                            options.len()
                        ),
                    );
                }
                let unique: BTreeSet<&str> = options.iter().map(String::as_str).collect();
                if unique.len() != options.len() {
                    errors.push("reward.equipment.options", "options must be unique");
                }
            }
        }
        errors
    }
}

/// Read-only encounter catalog.
pub trait EncounterOracle: Send + Sync {
    fn encounter(&self, id: &str) -> Option<EncounterDefinition>;

    fn encounter_ids(&self) -> Vec<String>;
}
