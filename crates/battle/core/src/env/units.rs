//! Unit templates for recruits and enemies.

use super::{Ability, AbilityOracle, OracleError};
use crate::config::BattleConfig;
use crate::state::{Element, Unit};
use crate::stats::Stats;

/// Static description a [`Unit`] is spawned from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UnitTemplate {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    pub base_stats: Stats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub growth_rates: Stats,
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u8,
    /// Ability ids, resolved through an [`AbilityOracle`] on spawn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_contribution: u32,
}

#[cfg(feature = "serde")]
fn default_level() -> u8 {
    BattleConfig::MIN_LEVEL
}

impl UnitTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        element: Element,
        base_stats: Stats,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            element,
            base_stats,
            growth_rates: Stats::ZERO,
            level: BattleConfig::MIN_LEVEL,
            abilities: Vec::new(),
            mana_contribution: 0,
        }
    }

    /// Spawns a unit with the given instance id at full HP.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::AbilityNotFound` if an ability id is unknown.
    pub fn instantiate(
        &self,
        instance_id: impl Into<String>,
        abilities: &dyn AbilityOracle,
    ) -> Result<Unit, OracleError> {
        let resolved = self
            .abilities
            .iter()
            .map(|id| {
                abilities
                    .ability(id)
                    .ok_or_else(|| OracleError::AbilityNotFound(id.clone()))
            })
            .collect::<Result<Vec<Ability>, _>>()?;

        Ok(Unit::new(
            instance_id,
            self.name.clone(),
            self.element,
            self.base_stats,
            self.growth_rates,
            self.level,
        )
        .with_abilities(resolved)
        .with_mana_contribution(self.mana_contribution))
    }
}

/// Read-only unit template catalog.
pub trait UnitOracle: Send + Sync {
    fn template(&self, id: &str) -> Option<UnitTemplate>;

    fn template_ids(&self) -> Vec<String>;
}
