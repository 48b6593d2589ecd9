//! Versioned save envelope.
//!
//! ```text
//! { "version": { "major": 1, "minor": 2 },
//!   "state":   { "team": {..}, "battle": {..} | null, "gold": 0 } }
//! ```
//!
//! Loading goes `JSON → migrate → deserialize → validate`. Only a save that
//! passes every step reaches the engine.
mod migration;

use std::fmt;

use tracing::debug;

pub use migration::{MigrationError, migrate, read_version};

use crate::error::{BattleError, ErrorSeverity, ValidationErrors};
use crate::state::{BattleState, Team, Unit};

/// `major.minor` schema version of a save.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SchemaVersion {
    pub major: u16,
    pub minor: u16,
}

impl SchemaVersion {
    pub const CURRENT: Self = Self::new(1, 2);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Persisted game progress.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub team: Team,
    /// Battle in progress, if the game was saved mid-fight.
    #[serde(default)]
    pub battle: Option<BattleState>,
    #[serde(default)]
    pub gold: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SaveEnvelope {
    pub version: SchemaVersion,
    pub state: SaveState,
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("save is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error("save version {0} is newer than supported version {current}", current = SchemaVersion::CURRENT)]
    UnsupportedVersion(SchemaVersion),

    #[error("save failed validation: {0}")]
    Invalid(ValidationErrors),
}

impl BattleError for SaveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Json(_) | Self::Invalid(_) => ErrorSeverity::Validation,
            Self::Migration(e) => e.severity(),
            Self::UnsupportedVersion(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "SAVE_JSON",
            Self::Migration(e) => e.error_code(),
            Self::UnsupportedVersion(_) => "SAVE_UNSUPPORTED_VERSION",
            Self::Invalid(_) => "SAVE_INVALID",
        }
    }
}

impl SaveEnvelope {
    /// Wraps `state` at the current schema version.
    pub fn new(state: SaveState) -> Self {
        Self {
            version: SchemaVersion::CURRENT,
            state,
        }
    }

    /// Structural checks over the team and any battle in progress.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.version != SchemaVersion::CURRENT {
            errors.push(
                "version",
                format!("expected {}, found {}", SchemaVersion::CURRENT, self.version),
            );
        }
        errors.extend_prefixed("state.team", self.state.team.validate());
        if let Some(battle) = &self.state.battle {
            errors.extend_prefixed("state.battle", battle.validate());
        }
        errors
    }

    /// Serializes to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parses, migrates, deserializes and validates a save.
///
/// Units whose level was clamped by migration also get their current HP
/// clamped to the new maximum.
///
/// # Errors
///
/// Fails on malformed JSON, a version with no migration path, a version newer
/// than this build, or any validation error.
pub fn load_save(json: &str) -> Result<SaveEnvelope, SaveError> {
    let raw: serde_json::Value = serde_json::from_str(json)?;
    let original = read_version(&raw)?;
    let migrated = migrate(raw)?;
    let version = read_version(&migrated)?;
    if version > SchemaVersion::CURRENT {
        return Err(SaveError::UnsupportedVersion(version));
    }

    let mut envelope: SaveEnvelope = serde_json::from_value(migrated)?;
    if original < SchemaVersion::CURRENT {
        clamp_hp(&mut envelope.state);
    }
    envelope.validate().into_result().map_err(SaveError::Invalid)?;
    debug!(from = %original, units = envelope.state.team.units.len(), "save loaded");
    Ok(envelope)
}

fn clamp_hp(state: &mut SaveState) {
    let battle_units = state
        .battle
        .iter_mut()
        .flat_map(|b| b.player_team.units.iter_mut().chain(b.enemies.iter_mut()));
    for unit in state.team.units.iter_mut().chain(battle_units) {
        clamp_unit_hp(unit);
    }
}

fn clamp_unit_hp(unit: &mut Unit) {
    unit.current_hp = unit.current_hp.min(unit.max_hp());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Element;
    use crate::stats::Stats;

    fn team() -> Team {
        Team::new(vec![Unit::new(
            "isaac",
            "Isaac",
            Element::Venus,
            Stats::new(100, 20, 15, 10, 12, 9),
            Stats::new(10, 2, 2, 1, 1, 1),
            5,
        )])
    }

    #[test]
    fn current_saves_load_back_unchanged() {
        let envelope = SaveEnvelope::new(SaveState {
            team: team(),
            battle: None,
            gold: 320,
        });
        let json = envelope.to_json().unwrap();
        assert_eq!(load_save(&json).unwrap(), envelope);
    }

    #[test]
    fn newer_saves_are_refused() {
        let mut envelope = SaveEnvelope::new(SaveState {
            team: team(),
            battle: None,
            gold: 0,
        });
        envelope.version = SchemaVersion::new(1, 9);
        let json = envelope.to_json().unwrap();
        assert!(matches!(
            load_save(&json),
            Err(SaveError::UnsupportedVersion(v)) if v == SchemaVersion::new(1, 9)
        ));
    }

    #[test]
    fn invalid_team_is_reported_by_path() {
        let mut team = team();
        team.units[0].current_hp = 10_000;
        let envelope = SaveEnvelope::new(SaveState {
            team,
            battle: None,
            gold: 0,
        });
        let json = envelope.to_json().unwrap();
        match load_save(&json) {
            Err(SaveError::Invalid(errors)) => {
                assert!(errors.contains_path("state.team.units[0].currentHp"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }
}
