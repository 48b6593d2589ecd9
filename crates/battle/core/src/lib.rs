//! Deterministic turn-based battle rules.
//!
//! `battle-core` defines the canonical battle model (units, statuses, djinn,
//! the round state machine) and exposes pure APIs: every transition takes a
//! state by reference and returns a new one. All randomness flows through a
//! [`SeededRng`] handed in by the caller, so identical seeds and inputs
//! replay to byte-identical states and logs.
//!
//! Content (abilities, enemy templates, encounters, equipment) is read through
//! the oracle traits in [`env`]; `battle-content` provides file-backed
//! implementations.
pub mod combat;
pub mod config;
pub mod djinn;
pub mod engine;
pub mod env;
pub mod error;
pub mod rewards;
#[cfg(feature = "serde")]
pub mod save;
pub mod state;
pub mod stats;
pub mod status;

pub use combat::{DamageOutcome, HealOutcome};
pub use config::BattleConfig;
pub use djinn::DjinnError;
pub use engine::{
    BasicEnemyPlanner, BattleEngine, EnemyPlanner, ExecuteRoundError, PlanningError,
    QueueOutcome, RoundOutcome, SetupError, start_battle, start_encounter,
};
pub use env::{
    Ability, AbilityKind, AbilityOracle, BattleEnv, Difficulty, EncounterDefinition,
    EncounterOracle, EncounterReward, EncounterRules, EquipmentOracle, EquipmentReward,
    OracleError, PhaseChangeRule, RandomSource, RngError, SeededRng, TargetScope, UnitOracle,
    UnitTemplate,
};
pub use error::{BattleError, ErrorSeverity, ValidationError, ValidationErrors};
pub use rewards::{
    BattleRewards, LevelUp, RewardDistribution, RewardsError, calculate_battle_rewards,
    claim_equipment_reward, distribute_rewards,
};
#[cfg(feature = "serde")]
pub use save::{
    MigrationError, SaveEnvelope, SaveError, SaveState, SchemaVersion, load_save, migrate,
};
pub use state::{
    ActionQueue, BattleEvent, BattlePhase, BattleState, BattleStatistics, BattleStatus,
    BlockedBy, DjinnState, DjinnTracker, Element, EncounterMeta, Equipment, EquipmentLoadout,
    EquipmentSlot, Percent, QueuedAction, SkipReason, StatusEffect, StatusKind, StatusKinds, Team,
    Unit,
};
pub use stats::{StatKind, Stats};
