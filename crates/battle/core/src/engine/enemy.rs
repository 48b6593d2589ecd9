//! Enemy intent selection.

use crate::env::{RandomSource, TargetScope, choose};
use crate::state::{BattleState, QueuedAction, Unit};

/// Chooses what an enemy does this round.
///
/// Planners draw only from the stream they are handed, so swapping planners
/// never shifts damage or turn-order draws.
pub trait EnemyPlanner {
    /// Returns `None` when the enemy has nothing to do (e.g. no living targets).
    fn plan(
        &self,
        state: &BattleState,
        enemy: &Unit,
        rng: &mut dyn RandomSource,
    ) -> Option<QueuedAction>;
}

/// Picks a random living player and a random usable offensive ability, with
/// the basic attack as one of the options.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicEnemyPlanner;

impl EnemyPlanner for BasicEnemyPlanner {
    fn plan(
        &self,
        state: &BattleState,
        enemy: &Unit,
        rng: &mut dyn RandomSource,
    ) -> Option<QueuedAction> {
        let players = state.living_player_ids();
        let target = choose(&mut *rng, &players).ok()?.clone();

        let mut options: Vec<Option<&str>> = vec![None];
        options.extend(
            enemy
                .usable_abilities()
                .filter(|a| a.kind.is_offensive() && !a.targets.targets_allies())
                .map(|a| Some(a.id.as_str())),
        );
        let picked = *choose(&mut *rng, &options).ok()?;

        let Some(ability_id) = picked else {
            return Some(QueuedAction::basic_attack(enemy.id.clone(), vec![target]));
        };
        let target_ids = match enemy.usable_ability(ability_id).map(|a| a.targets) {
            Some(TargetScope::AllEnemies) => players,
            _ => vec![target],
        };
        Some(QueuedAction {
            unit_id: enemy.id.clone(),
            ability_id: Some(ability_id.to_string()),
            target_ids,
            mana_cost: 0,
        })
    }
}
