//! Authoritative battle state representation.
//!
//! [`BattleState`] is the aggregate root of a fight. The engine never mutates
//! a state it was handed: every transition clones, edits the clone, and
//! returns it, so earlier snapshots stay valid for replay and undo.
mod event;
pub mod types;
mod validation;

use std::collections::BTreeMap;

pub use event::{BattleEvent, BlockedBy, SkipReason};
pub use types::{
    ActionQueue, BattleStatistics, DjinnState, DjinnTracker, Element, Equipment, EquipmentLoadout,
    EquipmentSlot, Percent, PercentOutOfRange, QueueError, QueuedAction, StatusEffect, StatusKind,
    StatusKinds, Team, Unit,
};

use crate::env::{Ability, Difficulty, PhaseChangeRule};

/// Battle phase state machine: `Planning → Executing → {Victory | Defeat}`.
///
/// `Executing` is only observable from inside a round; transitions return to
/// `Planning` or a terminal phase before handing the state back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum BattlePhase {
    #[default]
    Planning,
    Executing,
    Victory,
    Defeat,
}

impl BattlePhase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

/// Outcome flag persisted next to the phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleStatus {
    #[default]
    #[strum(serialize = "ongoing")]
    #[cfg_attr(feature = "serde", serde(rename = "ongoing"))]
    Ongoing,
    #[strum(serialize = "PLAYER_VICTORY")]
    #[cfg_attr(feature = "serde", serde(rename = "PLAYER_VICTORY"))]
    PlayerVictory,
    #[strum(serialize = "PLAYER_DEFEAT")]
    #[cfg_attr(feature = "serde", serde(rename = "PLAYER_DEFEAT"))]
    PlayerDefeat,
}

/// Encounter data copied into the battle at setup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct EncounterMeta {
    pub difficulty: Option<Difficulty>,
    pub phase_change: Option<PhaseChangeRule>,
    /// Resolved definition of `phase_change.add_ability`.
    pub phase_ability: Option<Ability>,
    /// Enemy ids whose phase change already fired.
    pub phase_changed: Vec<String>,
}

/// Canonical snapshot of one battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BattleState {
    pub player_team: Team,
    pub enemies: Vec<Unit>,
    pub phase: BattlePhase,
    pub status: BattleStatus,
    /// Starts at 1 and increments after every resolved round.
    pub round_number: u32,
    /// Unit ids in resolution order for the last executed round.
    pub turn_order: Vec<String>,
    pub current_actor_index: usize,
    /// Planning cursor: first empty slot of `queued_actions`.
    pub current_queue_index: usize,
    pub queued_actions: ActionQueue,
    /// Djinn ids queued for this round, in queue order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub queued_djinn: Vec<String>,
    pub remaining_mana: u32,
    pub max_mana: u32,
    /// Rounds left before a recovering djinn returns to `Set`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub djinn_recovery_timers: BTreeMap<String, u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub log: Vec<BattleEvent>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub encounter_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub meta: Option<EncounterMeta>,
}

impl BattleState {
    /// Looks a unit up in both rosters.
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.player_team
            .unit(id)
            .or_else(|| self.enemies.iter().find(|u| u.id == id))
    }

    pub fn unit_mut(&mut self, id: &str) -> Option<&mut Unit> {
        if self.player_team.unit(id).is_some() {
            return self.player_team.unit_mut(id);
        }
        self.enemies.iter_mut().find(|u| u.id == id)
    }

    pub fn is_player(&self, id: &str) -> bool {
        self.player_team.unit(id).is_some()
    }

    pub fn enemy(&self, id: &str) -> Option<&Unit> {
        self.enemies.iter().find(|u| u.id == id)
    }

    pub fn living_enemy_ids(&self) -> Vec<String> {
        self.enemies
            .iter()
            .filter(|u| u.is_alive())
            .map(|u| u.id.clone())
            .collect()
    }

    pub fn living_player_ids(&self) -> Vec<String> {
        self.player_team.survivors().map(|u| u.id.clone()).collect()
    }

    pub fn all_enemies_ko(&self) -> bool {
        self.enemies.iter().all(Unit::is_ko)
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Number of player units still standing.
    pub fn survivor_count(&self) -> usize {
        self.player_team.survivors().count()
    }

    /// Player units that were standing when the battle ended, before the
    /// post-battle heal. `None` while the battle is still running.
    pub fn final_survivors(&self) -> Option<&[String]> {
        self.log.iter().rev().find_map(|event| match event {
            BattleEvent::BattleEnded { survivors, .. } => Some(survivors.as_slice()),
            _ => None,
        })
    }

    pub fn push_event(&mut self, event: BattleEvent) {
        self.log.push(event);
    }
}

#[cfg(feature = "serde")]
impl BattleState {
    /// SHA-256 over the bincode encoding of the whole state.
    ///
    /// Two runs with the same seed and inputs produce equal digests.
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self)?;
        Ok(Sha256::digest(&bytes).into())
    }
}
