//! Save schema migration.
//!
//! Migrations operate on raw JSON so that old saves never have to deserialize
//! into current types. Each step is keyed by the exact version it upgrades
//! from and moves the save forward by one minor version:
//!
//! | from | to  | changes                                                          |
//! |------|-----|------------------------------------------------------------------|
//! | 1.0  | 1.1 | backfill `team.djinnTrackers = {}` and `battle.djinnRecoveryTimers = {}` |
//! | 1.1  | 1.2 | clamp unit levels above 20, backfill `equipment.accessory = null` |
//!
//! Every step only adds missing fields or clamps out-of-range values, so
//! running it on data that already satisfies the target version is a no-op.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::SchemaVersion;
use crate::config::BattleConfig;
use crate::error::{BattleError, ErrorSeverity};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("save has no readable version")]
    MissingVersion,

    #[error("no migration path from save version {0}")]
    NoPath(SchemaVersion),
}

impl BattleError for MigrationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingVersion => "MIGRATION_MISSING_VERSION",
            Self::NoPath(_) => "MIGRATION_NO_PATH",
        }
    }
}

type Step = fn(&mut Value);

const STEPS: &[(SchemaVersion, SchemaVersion, Step)] = &[
    (
        SchemaVersion::new(1, 0),
        SchemaVersion::new(1, 1),
        backfill_djinn_state,
    ),
    (
        SchemaVersion::new(1, 1),
        SchemaVersion::new(1, 2),
        clamp_levels_and_backfill_accessory,
    ),
];

/// Reads the `version` field of a save.
///
/// # Errors
///
/// Returns [`MigrationError::MissingVersion`] if `version.major` or
/// `version.minor` is missing or not a small unsigned integer.
pub fn read_version(save: &Value) -> Result<SchemaVersion, MigrationError> {
    let version = save.get("version").ok_or(MigrationError::MissingVersion)?;
    let part = |key: &str| {
        version
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u16::try_from(n).ok())
            .ok_or(MigrationError::MissingVersion)
    };
    Ok(SchemaVersion::new(part("major")?, part("minor")?))
}

/// Upgrades `save` step by step to [`SchemaVersion::CURRENT`].
///
/// Saves from a newer schema are returned unchanged.
///
/// # Errors
///
/// Fails if the version cannot be read or no step starts at the save's
/// version.
pub fn migrate(mut save: Value) -> Result<Value, MigrationError> {
    loop {
        let version = read_version(&save)?;
        if version == SchemaVersion::CURRENT {
            return Ok(save);
        }
        if version > SchemaVersion::CURRENT {
            warn!(%version, current = %SchemaVersion::CURRENT, "save is newer than this build");
            return Ok(save);
        }

        let Some((_, to, step)) = STEPS.iter().find(|(from, _, _)| *from == version) else {
            warn!(%version, "no migration path");
            return Err(MigrationError::NoPath(version));
        };
        debug!(from = %version, to = %to, "migrating save");
        step(&mut save);
        set_version(&mut save, *to);
    }
}

fn set_version(save: &mut Value, version: SchemaVersion) {
    if let Some(root) = save.as_object_mut() {
        let mut object = Map::new();
        object.insert("major".into(), Value::from(version.major));
        object.insert("minor".into(), Value::from(version.minor));
        root.insert("version".into(), Value::Object(object));
    }
}

fn object_at<'a>(value: &'a mut Value, path: &[&str]) -> Option<&'a mut Map<String, Value>> {
    path.iter()
        .try_fold(value, |current, key| current.get_mut(*key))?
        .as_object_mut()
}

fn backfill(object: &mut Map<String, Value>, key: &str, default: Value) {
    object.entry(key).or_insert(default);
}

// ============================================================================
// 1.0 → 1.1
// ============================================================================

fn backfill_djinn_state(save: &mut Value) {
    let empty = || Value::Object(Map::new());
    if let Some(team) = object_at(save, &["state", "team"]) {
        backfill(team, "djinnTrackers", empty());
    }
    if let Some(battle) = object_at(save, &["state", "battle"]) {
        backfill(battle, "djinnRecoveryTimers", empty());
    }
    if let Some(team) = object_at(save, &["state", "battle", "playerTeam"]) {
        backfill(team, "djinnTrackers", empty());
    }
}

// ============================================================================
// 1.1 → 1.2
// ============================================================================

const UNIT_LISTS: [&[&str]; 3] = [
    &["state", "team", "units"],
    &["state", "battle", "enemies"],
    &["state", "battle", "playerTeam", "units"],
];

fn clamp_levels_and_backfill_accessory(save: &mut Value) {
    for path in UNIT_LISTS {
        let units = path
            .iter()
            .try_fold(&mut *save, |current, key| current.get_mut(*key))
            .and_then(Value::as_array_mut);
        let Some(units) = units else {
            continue;
        };
        for unit in units.iter_mut().filter_map(Value::as_object_mut) {
            clamp_level(unit);
            if let Some(equipment) = unit.get_mut("equipment").and_then(Value::as_object_mut) {
                backfill(equipment, "accessory", Value::Null);
            }
        }
    }
}

fn clamp_level(unit: &mut Map<String, Value>) {
    let max = u64::from(BattleConfig::MAX_LEVEL);
    let too_high = unit
        .get("level")
        .and_then(Value::as_u64)
        .is_some_and(|level| level > max);
    if too_high {
        unit.insert("level".into(), Value::from(max));
    }
}
