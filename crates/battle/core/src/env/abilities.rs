//! Ability definitions.

use crate::config::BattleConfig;
use crate::error::ValidationErrors;
use crate::state::{Element, Percent, StatusEffect};

/// Broad category deciding which formula an ability uses.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum AbilityKind {
    Physical,
    Psynergy,
    Healing,
    Buff,
    Debuff,
}

impl AbilityKind {
    /// Kinds that deal damage.
    pub const fn is_damaging(self) -> bool {
        matches!(self, Self::Physical | Self::Psynergy)
    }

    /// Kinds an enemy would aim at the player team.
    pub const fn is_offensive(self) -> bool {
        matches!(self, Self::Physical | Self::Psynergy | Self::Debuff)
    }
}

/// Who an ability may be aimed at.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum TargetScope {
    SingleEnemy,
    AllEnemies,
    SingleAlly,
    AllAllies,
    #[strum(serialize = "self")]
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    User,
}

impl TargetScope {
    /// True if targets come from the caster's own side.
    pub const fn targets_allies(self) -> bool {
        matches!(self, Self::SingleAlly | Self::AllAllies | Self::User)
    }

    pub const fn is_area(self) -> bool {
        matches!(self, Self::AllEnemies | Self::AllAllies)
    }
}

/// Static definition of an ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Ability {
    pub id: String,
    pub name: String,
    pub kind: AbilityKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_cost: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_power: u32,
    pub targets: TargetScope,
    #[cfg_attr(feature = "serde", serde(default = "default_unlock_level"))]
    pub unlock_level: u8,
    /// Share of the primary hit dealt to every other target.
    #[cfg_attr(feature = "serde", serde(default))]
    pub splash_damage_percent: Percent,
    /// Healing on a knocked-out ally revives it instead of doing nothing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub revives_fallen: bool,
    /// Statuses applied to every target hit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub applies: Vec<StatusEffect>,
    /// Chance to apply `applies`; `None` means always.
    #[cfg_attr(feature = "serde", serde(default))]
    pub apply_chance: Option<Percent>,
    /// Removes negative statuses from targets.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cleanses: bool,
}

#[cfg(feature = "serde")]
fn default_unlock_level() -> u8 {
    BattleConfig::MIN_LEVEL
}

impl Ability {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: AbilityKind,
        targets: TargetScope,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            element: Element::Neutral,
            mana_cost: 0,
            base_power: 0,
            targets,
            unlock_level: BattleConfig::MIN_LEVEL,
            splash_damage_percent: Percent::ZERO,
            revives_fallen: false,
            applies: Vec::new(),
            apply_chance: None,
            cleanses: false,
        }
    }

    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    #[must_use]
    pub fn with_mana_cost(mut self, mana_cost: u8) -> Self {
        self.mana_cost = mana_cost;
        self
    }

    #[must_use]
    pub fn with_base_power(mut self, base_power: u32) -> Self {
        self.base_power = base_power;
        self
    }

    #[must_use]
    pub fn with_unlock_level(mut self, level: u8) -> Self {
        self.unlock_level = level;
        self
    }

    #[must_use]
    pub fn with_splash(mut self, percent: Percent) -> Self {
        self.splash_damage_percent = percent;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusEffect) -> Self {
        self.applies.push(status);
        self
    }

    #[must_use]
    pub fn with_apply_chance(mut self, chance: Percent) -> Self {
        self.apply_chance = Some(chance);
        self
    }

    #[must_use]
    pub fn reviving(mut self) -> Self {
        self.revives_fallen = true;
        self
    }

    #[must_use]
    pub fn cleansing(mut self) -> Self {
        self.cleanses = true;
        self
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.id.is_empty() {
            errors.push("id", "must not be empty");
        }
        if self.mana_cost > BattleConfig::MAX_MANA_COST {
            errors.push(
                "manaCost",
                format!("{} exceeds {}", self.mana_cost, BattleConfig::MAX_MANA_COST),
            );
        }
        if !(BattleConfig::MIN_LEVEL..=BattleConfig::MAX_LEVEL).contains(&self.unlock_level) {
            errors.push("unlockLevel", format!("{} is out of range", self.unlock_level));
        }
        for (i, status) in self.applies.iter().enumerate() {
            errors.extend_prefixed(&format!("applies[{i}]"), status.validate());
        }
        errors
    }
}

/// Read-only ability catalog.
pub trait AbilityOracle: Send + Sync {
    fn ability(&self, id: &str) -> Option<Ability>;

    /// Every ability id the oracle knows, in a stable order.
    fn ability_ids(&self) -> Vec<String>;
}
