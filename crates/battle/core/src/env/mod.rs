//! Read-only content and randomness consumed by the engine.
//!
//! Oracles expose ability definitions, unit templates, encounter tables and
//! equipment. The [`BattleEnv`] aggregate bundles them so setup and rewards
//! can read content without coupling to a concrete loader.
mod abilities;
mod encounters;
mod error;
mod items;
mod rng;
mod units;

pub use abilities::{Ability, AbilityKind, AbilityOracle, TargetScope};
pub use encounters::{
    Difficulty, EncounterDefinition, EncounterOracle, EncounterReward, EncounterRules,
    EquipmentReward, PhaseChangeRule,
};
pub use error::OracleError;
pub use items::EquipmentOracle;
pub use rng::{RandomSource, RngError, SeededRng, choose, choose_weighted, shuffle_in_place};
pub use units::{UnitOracle, UnitTemplate};

/// Aggregates read-only oracles. Any of them may be absent; accessors report
/// which one was missing.
#[derive(Clone, Copy, Default)]
pub struct BattleEnv<'a> {
    abilities: Option<&'a dyn AbilityOracle>,
    units: Option<&'a dyn UnitOracle>,
    encounters: Option<&'a dyn EncounterOracle>,
    equipment: Option<&'a dyn EquipmentOracle>,
}

impl<'a> BattleEnv<'a> {
    pub fn new(
        abilities: Option<&'a dyn AbilityOracle>,
        units: Option<&'a dyn UnitOracle>,
        encounters: Option<&'a dyn EncounterOracle>,
        equipment: Option<&'a dyn EquipmentOracle>,
    ) -> Self {
        Self {
            abilities,
            units,
            encounters,
            equipment,
        }
    }

    /// Uses one object for every oracle, which is how content catalogs are wired.
    pub fn with_all<C>(catalog: &'a C) -> Self
    where
        C: AbilityOracle + UnitOracle + EncounterOracle + EquipmentOracle + 'a,
    {
        Self::new(Some(catalog), Some(catalog), Some(catalog), Some(catalog))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `OracleError::AbilitiesNotAvailable` if no ability oracle was provided.
    pub fn abilities(&self) -> Result<&'a dyn AbilityOracle, OracleError> {
        self.abilities.ok_or(OracleError::AbilitiesNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::UnitsNotAvailable` if no unit oracle was provided.
    pub fn units(&self) -> Result<&'a dyn UnitOracle, OracleError> {
        self.units.ok_or(OracleError::UnitsNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::EncountersNotAvailable` if no encounter oracle was provided.
    pub fn encounters(&self) -> Result<&'a dyn EncounterOracle, OracleError> {
        self.encounters.ok_or(OracleError::EncountersNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::EquipmentNotAvailable` if no equipment oracle was provided.
    pub fn equipment(&self) -> Result<&'a dyn EquipmentOracle, OracleError> {
        self.equipment.ok_or(OracleError::EquipmentNotAvailable)
    }

    /// Resolves an encounter by id.
    ///
    /// # Errors
    ///
    /// Fails if the oracle is missing or the id is unknown.
    pub fn encounter(&self, id: &str) -> Result<EncounterDefinition, OracleError> {
        self.encounters()?
            .encounter(id)
            .ok_or_else(|| OracleError::EncounterNotFound(id.to_string()))
    }

    /// Resolves an ability by id.
    ///
    /// # Errors
    ///
    /// Fails if the oracle is missing or the id is unknown.
    pub fn ability(&self, id: &str) -> Result<Ability, OracleError> {
        self.abilities()?
            .ability(id)
            .ok_or_else(|| OracleError::AbilityNotFound(id.to_string()))
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("abilities", &self.abilities.is_some())
            .field("units", &self.units.is_some())
            .field("encounters", &self.encounters.is_some())
            .field("equipment", &self.equipment.is_some())
            .finish()
    }
}
