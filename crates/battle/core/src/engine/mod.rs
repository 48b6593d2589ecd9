//! Battle state machine.
//!
//! The [`BattleEngine`] is the only way to advance a [`BattleState`]. Every
//! operation takes the current state by reference and returns a new one:
//!
//! ```text
//! planning ──queue_* / clear_*──▶ planning
//! planning ──execute_round──▶ planning (round + 1) | victory | defeat
//! ```
//!
//! Failed operations return an error and leave no trace; the caller keeps
//! using the state it already holds.

mod enemy;
mod errors;
mod round;
mod setup;
mod targeting;
mod turns;

pub use enemy::{BasicEnemyPlanner, EnemyPlanner};
pub use errors::{ExecuteRoundError, PlanningError, SetupError};
pub use round::RoundOutcome;
pub use setup::{start_battle, start_encounter};
pub use targeting::resolve_targets;
pub use turns::{TurnSlot, speed_order};

use crate::config::BattleConfig;
use crate::env::TargetScope;
use crate::state::{BattlePhase, BattleState, DjinnState, QueuedAction};

/// Result of a queue or clear operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueOutcome {
    pub state: BattleState,
    /// Living units with no queued action. They basic-attack when the round
    /// executes.
    pub pending_auto_attacks: usize,
}

/// Battle engine bound to a rules configuration and an enemy planner.
#[derive(Clone, Debug, Default)]
pub struct BattleEngine<P = BasicEnemyPlanner> {
    config: BattleConfig,
    planner: P,
}

impl BattleEngine<BasicEnemyPlanner> {
    pub fn new(config: BattleConfig) -> Self {
        Self {
            config,
            planner: BasicEnemyPlanner,
        }
    }
}

impl<P: EnemyPlanner> BattleEngine<P> {
    pub fn with_planner(config: BattleConfig, planner: P) -> Self {
        Self { config, planner }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Queues an action for the unit at `unit_index` of the player roster.
    ///
    /// `ability_id = None` queues a basic attack. The ability must be one the
    /// unit can use right now. Re-queueing a filled slot refunds its previous
    /// cost before charging the new one.
    ///
    /// # Errors
    ///
    /// Fails outside the planning phase, for an unknown or knocked-out unit,
    /// an unusable ability, targets that do not fit the ability, or when the
    /// remaining mana cannot cover the cost.
    pub fn queue_unit_action(
        &self,
        state: &BattleState,
        unit_index: usize,
        ability_id: Option<&str>,
        target_ids: Vec<String>,
    ) -> Result<QueueOutcome, PlanningError> {
        require_planning(state)?;
        let unit = player_at(state, unit_index)?;
        if unit.is_ko() {
            return Err(PlanningError::UnitKnockedOut(unit.id.clone()));
        }

        let ability = match ability_id {
            Some(id) => Some(unit.usable_ability(id).ok_or_else(|| {
                PlanningError::UnknownAbility {
                    unit_id: unit.id.clone(),
                    ability_id: id.to_string(),
                }
            })?),
            None => None,
        };
        let scope = ability.map_or(TargetScope::SingleEnemy, |a| a.targets);
        let target_ids = check_targets(state, &unit.id, scope, target_ids)?;

        let cost = ability.map_or(0, |a| a.mana_cost.min(BattleConfig::MAX_MANA_COST));
        let refund = state
            .queued_actions
            .get(unit_index)
            .map_or(0, |a| u32::from(a.mana_cost));
        let available = state.remaining_mana + refund;
        if u32::from(cost) > available {
            return Err(PlanningError::InsufficientMana {
                required: u32::from(cost),
                available,
            });
        }

        let action = QueuedAction {
            unit_id: unit.id.clone(),
            ability_id: ability.map(|a| a.id.clone()),
            target_ids,
            mana_cost: cost,
        };
        tracing::trace!(
            unit = %action.unit_id,
            ability = ?action.ability_id,
            cost,
            "queued action"
        );

        let mut next = state.clone();
        next.queued_actions.set(unit_index, action)?;
        next.remaining_mana = (available - u32::from(cost)).min(next.max_mana);
        next.current_queue_index = next.queued_actions.first_empty();
        let pending_auto_attacks = pending_auto_attacks(&next);
        Ok(QueueOutcome {
            state: next,
            pending_auto_attacks,
        })
    }

    /// Empties the slot at `unit_index` and refunds its mana.
    ///
    /// Clearing an empty slot is allowed and changes nothing.
    ///
    /// # Errors
    ///
    /// Fails outside the planning phase or for an out-of-range index.
    pub fn clear_queued_action(
        &self,
        state: &BattleState,
        unit_index: usize,
    ) -> Result<QueueOutcome, PlanningError> {
        require_planning(state)?;
        player_at(state, unit_index)?;

        let mut next = state.clone();
        if let Some(previous) = next.queued_actions.clear(unit_index)? {
            next.remaining_mana =
                (next.remaining_mana + u32::from(previous.mana_cost)).min(next.max_mana);
        }
        next.current_queue_index = next.queued_actions.first_empty();
        let pending_auto_attacks = pending_auto_attacks(&next);
        Ok(QueueOutcome {
            state: next,
            pending_auto_attacks,
        })
    }

    /// Queues a djinn for this round.
    ///
    /// A `Set` djinn will be activated into `Standby`; a `Standby` djinn will
    /// join this round's summon.
    ///
    /// # Errors
    ///
    /// Fails outside the planning phase, for an unknown or recovering djinn,
    /// a djinn already queued, or when the per-round limit is reached.
    pub fn queue_djinn_activation(
        &self,
        state: &BattleState,
        djinn_id: &str,
    ) -> Result<BattleState, PlanningError> {
        require_planning(state)?;
        let tracker = state
            .player_team
            .djinn_trackers
            .get(djinn_id)
            .ok_or_else(|| PlanningError::UnknownDjinn(djinn_id.to_string()))?;
        if tracker.state == DjinnState::Recovery {
            return Err(PlanningError::DjinnUnavailable {
                id: djinn_id.to_string(),
                state: tracker.state,
            });
        }
        if state.queued_djinn.iter().any(|id| id == djinn_id) {
            return Err(PlanningError::DjinnAlreadyQueued(djinn_id.to_string()));
        }
        if state.queued_djinn.len() >= BattleConfig::MAX_EQUIPPED_DJINN {
            return Err(PlanningError::TooManyDjinn {
                max: BattleConfig::MAX_EQUIPPED_DJINN,
            });
        }

        let mut next = state.clone();
        next.queued_djinn.push(djinn_id.to_string());
        Ok(next)
    }

    /// Removes a djinn from this round's queue.
    ///
    /// # Errors
    ///
    /// Fails outside the planning phase or if the djinn is not queued.
    pub fn unqueue_djinn_activation(
        &self,
        state: &BattleState,
        djinn_id: &str,
    ) -> Result<BattleState, PlanningError> {
        require_planning(state)?;
        let index = state
            .queued_djinn
            .iter()
            .position(|id| id == djinn_id)
            .ok_or_else(|| PlanningError::DjinnNotQueued(djinn_id.to_string()))?;

        let mut next = state.clone();
        next.queued_djinn.remove(index);
        Ok(next)
    }
}

fn require_planning(state: &BattleState) -> Result<(), PlanningError> {
    if state.phase == BattlePhase::Planning {
        Ok(())
    } else {
        Err(PlanningError::WrongPhase(state.phase))
    }
}

fn player_at(state: &BattleState, index: usize) -> Result<&crate::state::Unit, PlanningError> {
    state
        .player_team
        .units
        .get(index)
        .ok_or(PlanningError::UnitIndexOutOfRange {
            index,
            len: state.player_team.units.len(),
        })
}

/// Checks queued targets against the ability's scope. Area and self scopes
/// fill their own targets and ignore the input.
fn check_targets(
    state: &BattleState,
    actor_id: &str,
    scope: TargetScope,
    target_ids: Vec<String>,
) -> Result<Vec<String>, PlanningError> {
    match scope {
        TargetScope::AllEnemies => Ok(state.living_enemy_ids()),
        TargetScope::AllAllies => Ok(state
            .player_team
            .units
            .iter()
            .map(|u| u.id.clone())
            .collect()),
        TargetScope::User => Ok(vec![actor_id.to_string()]),
        TargetScope::SingleEnemy => {
            let target = single_target(target_ids)?;
            match state.enemy(&target) {
                Some(enemy) if enemy.is_alive() => Ok(vec![target]),
                Some(_) => Err(PlanningError::InvalidTarget {
                    target_id: target,
                    reason: "enemy is knocked out",
                }),
                None => Err(PlanningError::InvalidTarget {
                    target_id: target,
                    reason: "not an enemy",
                }),
            }
        }
        TargetScope::SingleAlly => {
            let target = single_target(target_ids)?;
            if state.is_player(&target) {
                Ok(vec![target])
            } else {
                Err(PlanningError::InvalidTarget {
                    target_id: target,
                    reason: "not an ally",
                })
            }
        }
    }
}

fn single_target(target_ids: Vec<String>) -> Result<String, PlanningError> {
    target_ids
        .into_iter()
        .next()
        .ok_or(PlanningError::MissingTarget)
}

fn pending_auto_attacks(state: &BattleState) -> usize {
    state
        .queued_actions
        .slots()
        .zip(&state.player_team.units)
        .filter(|(slot, unit)| slot.is_none() && unit.is_alive())
        .count()
}
