//! Target resolution at the moment an action executes.
//!
//! Targets were chosen during planning and may have been knocked out since.

use crate::env::{Ability, TargetScope};
use crate::state::BattleState;

/// Final target list for `actor_id`, primary target first.
///
/// - single-enemy actions keep a living queued target, otherwise fall back to
///   the first living opponent
/// - all-enemy actions hit every living opponent
/// - single-ally actions keep their queued ally, even if knocked out
/// - all-ally actions hit the whole allied roster
/// - self actions hit the actor
///
/// A single-enemy ability with splash hits every other living opponent as a
/// secondary target.
pub fn resolve_targets(
    state: &BattleState,
    actor_id: &str,
    ability: Option<&Ability>,
    queued: &[String],
) -> Vec<String> {
    let actor_is_player = state.is_player(actor_id);
    let opponents = if actor_is_player {
        state.living_enemy_ids()
    } else {
        state.living_player_ids()
    };
    let allies: Vec<String> = if actor_is_player {
        state.player_team.units.iter().map(|u| u.id.clone()).collect()
    } else {
        state.enemies.iter().map(|u| u.id.clone()).collect()
    };

    let scope = ability.map_or(TargetScope::SingleEnemy, |a| a.targets);
    match scope {
        TargetScope::SingleEnemy => {
            let primary = queued
                .iter()
                .find(|id| opponents.contains(id))
                .or_else(|| opponents.first())
                .cloned();
            let Some(primary) = primary else {
                return Vec::new();
            };
            let splashes = ability.is_some_and(|a| !a.splash_damage_percent.is_zero());
            let mut targets = vec![primary.clone()];
            if splashes {
                targets.extend(opponents.into_iter().filter(|id| *id != primary));
            }
            targets
        }
        TargetScope::AllEnemies => opponents,
        TargetScope::SingleAlly => queued
            .iter()
            .find(|id| allies.contains(id))
            .cloned()
            .into_iter()
            .collect(),
        TargetScope::AllAllies => allies,
        TargetScope::User => vec![actor_id.to_string()],
    }
}
