//! Oracle access errors.

use crate::error::{BattleError, ErrorSeverity};

/// Errors that occur when reading content through the oracles.
///
/// A missing oracle means the caller wired the environment incorrectly; a
/// missing record means the content data and the request disagree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("AbilityOracle not available")]
    AbilitiesNotAvailable,

    #[error("UnitOracle not available")]
    UnitsNotAvailable,

    #[error("EncounterOracle not available")]
    EncountersNotAvailable,

    #[error("EquipmentOracle not available")]
    EquipmentNotAvailable,

    #[error("ability '{0}' not found")]
    AbilityNotFound(String),

    #[error("unit template '{0}' not found")]
    UnitTemplateNotFound(String),

    #[error("encounter '{0}' not found")]
    EncounterNotFound(String),

    #[error("equipment '{0}' not found")]
    EquipmentNotFound(String),
}

impl BattleError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            AbilitiesNotAvailable
            | UnitsNotAvailable
            | EncountersNotAvailable
            | EquipmentNotAvailable => ErrorSeverity::Fatal,

            AbilityNotFound(_)
            | UnitTemplateNotFound(_)
            | EncounterNotFound(_)
            | EquipmentNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            AbilitiesNotAvailable => "ORACLE_ABILITIES_NOT_AVAILABLE",
            UnitsNotAvailable => "ORACLE_UNITS_NOT_AVAILABLE",
            EncountersNotAvailable => "ORACLE_ENCOUNTERS_NOT_AVAILABLE",
            EquipmentNotAvailable => "ORACLE_EQUIPMENT_NOT_AVAILABLE",
            AbilityNotFound(_) => "ORACLE_ABILITY_NOT_FOUND",
            UnitTemplateNotFound(_) => "ORACLE_UNIT_TEMPLATE_NOT_FOUND",
            EncounterNotFound(_) => "ORACLE_ENCOUNTER_NOT_FOUND",
            EquipmentNotFound(_) => "ORACLE_EQUIPMENT_NOT_FOUND",
        }
    }
}
