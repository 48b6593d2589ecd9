//! Structural checks for externally built or persisted battle data.
//!
//! The engine assumes validated input. These checks run at trust boundaries
//! (save loading, hand-built fixtures) and report every problem found.

use std::collections::BTreeSet;

use super::{BattlePhase, BattleState, BattleStatus, StatusEffect, Team, Unit};
use crate::config::BattleConfig;
use crate::error::ValidationErrors;

impl Unit {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.id.is_empty() {
            errors.push("id", "must not be empty");
        }
        if !(BattleConfig::MIN_LEVEL..=BattleConfig::MAX_LEVEL).contains(&self.level) {
            errors.push(
                "level",
                format!(
                    "{} is outside {}..={}",
                    self.level,
                    BattleConfig::MIN_LEVEL,
                    BattleConfig::MAX_LEVEL
                ),
            );
        }
        let max_hp = self.max_hp();
        if self.current_hp > max_hp {
            errors.push(
                "currentHp",
                format!("{} exceeds max HP {max_hp}", self.current_hp),
            );
        }
        let immunities = self
            .status_effects
            .iter()
            .filter(|s| matches!(s, StatusEffect::Immunity { .. }))
            .count();
        if immunities > 1 {
            errors.push(
                "statusEffects",
                format!("{immunities} immunity statuses, at most one allowed"),
            );
        }
        for (i, status) in self.status_effects.iter().enumerate() {
            errors.extend_prefixed(&format!("statusEffects[{i}]"), status.validate());
        }
        for (i, ability) in self.abilities.iter().enumerate() {
            errors.extend_prefixed(&format!("abilities[{i}]"), ability.validate());
        }
        errors
    }
}

impl Team {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.units.is_empty() || self.units.len() > BattleConfig::MAX_PARTY_SIZE {
            errors.push(
                "units",
                format!(
                    "team size {} is outside 1..={}",
                    self.units.len(),
                    BattleConfig::MAX_PARTY_SIZE
                ),
            );
        }
        for (i, unit) in self.units.iter().enumerate() {
            errors.extend_prefixed(&format!("units[{i}]"), unit.validate());
        }
        for (key, tracker) in &self.djinn_trackers {
            if *key != tracker.id {
                errors.push(
                    format!("djinnTrackers.{key}.id"),
                    format!("tracker id '{}' does not match its key", tracker.id),
                );
            }
        }
        errors
    }
}

impl BattleState {
    /// Checks every structural invariant of a battle snapshot.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        errors.extend_prefixed("playerTeam", self.player_team.validate());
        if self.enemies.is_empty() {
            errors.push("enemies", "at least one enemy is required");
        }
        for (i, enemy) in self.enemies.iter().enumerate() {
            errors.extend_prefixed(&format!("enemies[{i}]"), enemy.validate());
        }

        let mut seen = BTreeSet::new();
        for unit in self.player_team.units.iter().chain(&self.enemies) {
            if !seen.insert(unit.id.as_str()) {
                errors.push("units", format!("duplicate unit id '{}'", unit.id));
            }
        }

        if self.round_number < 1 {
            errors.push("roundNumber", "must be at least 1");
        }

        for (i, id) in self.turn_order.iter().enumerate() {
            if self.unit(id).is_none() {
                errors.push(format!("turnOrder[{i}]"), format!("unknown unit id '{id}'"));
            }
        }
        if self.current_actor_index > self.turn_order.len() {
            errors.push(
                "currentActorIndex",
                format!(
                    "{} exceeds turn order length {}",
                    self.current_actor_index,
                    self.turn_order.len()
                ),
            );
        }

        let team_size = self.player_team.units.len();
        if self.queued_actions.len() != team_size {
            errors.push(
                "queuedActions",
                format!(
                    "length {} does not match team size {team_size}",
                    self.queued_actions.len()
                ),
            );
        }
        for (i, slot) in self.queued_actions.slots().enumerate() {
            let Some(action) = slot else { continue };
            if !self.is_player(&action.unit_id) {
                errors.push(
                    format!("queuedActions[{i}].unitId"),
                    format!("'{}' is not in the player team", action.unit_id),
                );
            }
            if action.mana_cost > BattleConfig::MAX_MANA_COST {
                errors.push(
                    format!("queuedActions[{i}].manaCost"),
                    format!(
                        "{} exceeds {}",
                        action.mana_cost,
                        BattleConfig::MAX_MANA_COST
                    ),
                );
            }
        }
        if self.current_queue_index > team_size {
            errors.push(
                "currentQueueIndex",
                format!("{} exceeds team size {team_size}", self.current_queue_index),
            );
        }

        if self.remaining_mana > self.max_mana {
            errors.push(
                "remainingMana",
                format!(
                    "{} exceeds max mana {}",
                    self.remaining_mana, self.max_mana
                ),
            );
        }
        let committed = self.queued_actions.total_mana_cost();
        if self.remaining_mana.saturating_add(committed) > self.max_mana {
            errors.push(
                "remainingMana",
                format!(
                    "{} plus {committed} queued exceeds max mana {}",
                    self.remaining_mana, self.max_mana
                ),
            );
        }

        for id in self.djinn_recovery_timers.keys() {
            if !self.player_team.djinn_trackers.contains_key(id) {
                errors.push(
                    format!("djinnRecoveryTimers.{id}"),
                    "timer for a djinn the team does not own",
                );
            }
        }
        for (i, id) in self.queued_djinn.iter().enumerate() {
            if !self.player_team.djinn_trackers.contains_key(id) {
                errors.push(format!("queuedDjinn[{i}]"), format!("unknown djinn '{id}'"));
            }
        }

        let consistent = matches!(
            (self.phase, self.status),
            (BattlePhase::Planning | BattlePhase::Executing, BattleStatus::Ongoing)
                | (BattlePhase::Victory, BattleStatus::PlayerVictory)
                | (BattlePhase::Defeat, BattleStatus::PlayerDefeat)
        );
        if !consistent {
            errors.push(
                "status",
                format!("{} does not match phase {}", self.status, self.phase),
            );
        }

        errors
    }
}
