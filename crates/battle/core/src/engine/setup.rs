//! Battle construction.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::SetupError;
use crate::config::BattleConfig;
use crate::djinn;
use crate::env::{BattleEnv, OracleError};
use crate::state::{
    ActionQueue, BattlePhase, BattleState, BattleStatus, EncounterMeta, Team, Unit,
};

/// Starts a battle between `team` and `enemies`.
///
/// Djinn begin `Set`, mana is filled from the roster's contributions and the
/// battle opens in round 1, planning phase.
///
/// # Errors
///
/// Fails if the team has 0 or more than 4 units, there are no enemies, or a
/// unit id appears twice across both rosters.
pub fn start_battle(team: Team, enemies: Vec<Unit>) -> Result<BattleState, SetupError> {
    let size = team.units.len();
    if size == 0 || size > BattleConfig::MAX_PARTY_SIZE {
        return Err(SetupError::InvalidTeamSize(size));
    }
    if enemies.is_empty() {
        return Err(SetupError::NoEnemies);
    }
    let mut seen = BTreeSet::new();
    for unit in team.units.iter().chain(&enemies) {
        if !seen.insert(unit.id.as_str()) {
            return Err(SetupError::DuplicateUnitId(unit.id.clone()));
        }
    }

    let mut team = team;
    let mut djinn_recovery_timers = BTreeMap::new();
    djinn::reset_all(&mut team, &mut djinn_recovery_timers);

    let max_mana = team.mana_pool();
    let queued_actions = ActionQueue::new(size)?;
    debug!(
        players = size,
        enemies = enemies.len(),
        max_mana,
        "battle started"
    );

    Ok(BattleState {
        player_team: team,
        enemies,
        phase: BattlePhase::Planning,
        status: BattleStatus::Ongoing,
        round_number: 1,
        turn_order: Vec::new(),
        current_actor_index: 0,
        current_queue_index: 0,
        queued_actions,
        queued_djinn: Vec::new(),
        remaining_mana: max_mana,
        max_mana,
        djinn_recovery_timers,
        log: Vec::new(),
        encounter_id: None,
        meta: None,
    })
}

/// Starts a battle against the enemies of encounter `encounter_id`.
///
/// Enemy templates are instantiated through the unit and ability oracles.
/// A template listed more than once gets numbered instance ids
/// (`slime`, `slime-2`, `slime-3`).
///
/// # Errors
///
/// Fails if an oracle is missing, the encounter or one of its templates or
/// abilities is unknown, the encounter does not validate, or the resulting
/// rosters are rejected by [`start_battle`].
pub fn start_encounter(
    env: &BattleEnv<'_>,
    team: Team,
    encounter_id: &str,
) -> Result<BattleState, SetupError> {
    let encounter = env.encounter(encounter_id)?;
    let errors = encounter.validate();
    if !errors.is_empty() {
        return Err(SetupError::InvalidEncounter(errors));
    }

    let units = env.units()?;
    let abilities = env.abilities()?;
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut enemies = Vec::with_capacity(encounter.enemies.len());
    for template_id in &encounter.enemies {
        let template = units
            .template(template_id)
            .ok_or_else(|| OracleError::UnitTemplateNotFound(template_id.clone()))?;
        let count = counts.entry(template_id.as_str()).or_insert(0);
        *count += 1;
        let instance_id = if *count == 1 {
            template_id.clone()
        } else {
            format!("{template_id}-{count}")
        };
        enemies.push(template.instantiate(instance_id, abilities)?);
    }

    let phase_change = encounter.phase_change().cloned();
    let phase_ability = match &phase_change {
        Some(rule) => Some(env.ability(&rule.add_ability)?),
        None => None,
    };

    let mut state = start_battle(team, enemies)?;
    state.encounter_id = Some(encounter.id.clone());
    state.meta = Some(EncounterMeta {
        difficulty: encounter.difficulty,
        phase_change,
        phase_ability,
        phase_changed: Vec::new(),
    });
    debug!(encounter = %encounter.id, "encounter loaded");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DjinnState, DjinnTracker, Element};
    use crate::stats::Stats;

    fn unit(id: &str) -> Unit {
        Unit::new(id, id, Element::Venus, Stats::new(50, 10, 10, 10, 10, 10), Stats::ZERO, 1)
            .with_mana_contribution(2)
    }

    #[test]
    fn rejects_bad_rosters() {
        assert_eq!(
            start_battle(Team::new(vec![]), vec![unit("e")]),
            Err(SetupError::InvalidTeamSize(0))
        );
        let five = (0..5).map(|i| unit(&format!("p{i}"))).collect();
        assert_eq!(
            start_battle(Team::new(five), vec![unit("e")]),
            Err(SetupError::InvalidTeamSize(5))
        );
        assert_eq!(
            start_battle(Team::new(vec![unit("a")]), vec![]),
            Err(SetupError::NoEnemies)
        );
        assert_eq!(
            start_battle(Team::new(vec![unit("a")]), vec![unit("a")]),
            Err(SetupError::DuplicateUnitId("a".into()))
        );
    }

    #[test]
    fn opens_in_planning_with_full_mana_and_set_djinn() {
        let mut flint = DjinnTracker::new("flint", Element::Venus);
        flint.state = DjinnState::Recovery;
        let team = Team::new(vec![unit("isaac"), unit("garet")]).with_djinn(flint);

        let state = start_battle(team, vec![unit("slime")]).unwrap();
        assert_eq!(state.phase, BattlePhase::Planning);
        assert_eq!(state.round_number, 1);
        assert_eq!(state.max_mana, 4);
        assert_eq!(state.remaining_mana, 4);
        assert_eq!(state.queued_actions.len(), 2);
        assert_eq!(
            state.player_team.djinn_trackers["flint"].state,
            DjinnState::Set
        );
        assert!(state.validate().is_empty());
    }
}
