//! Round execution.
//!
//! A round runs on its own RNG stream derived from the root seed and the round
//! number, split further per concern:
//!
//! ```text
//! root ─ derive_indexed("queue-round", round)
//!          ├─ "summon"        summon target picks
//!          ├─ "turn-order"    speed tie-breaks
//!          ├─ "enemy-intent"  enemy planner
//!          ├─ "action"        damage variance, critical rolls, healing variance
//!          └─ "status"        paralysis and status application chances
//! ```

use std::collections::BTreeMap;

use tracing::{debug, info, trace};

use super::targeting::resolve_targets;
use super::turns::{TurnSlot, speed_order};
use super::{BattleEngine, EnemyPlanner, ExecuteRoundError};
use crate::combat::{
    DamageOutcome, apply_critical, apply_healing, apply_incoming_damage, heal_amount,
    physical_damage, psynergy_damage, revive_hp, roll_critical, roll_variance, splash_damage,
};
use crate::config::BattleConfig;
use crate::djinn::{self, synergy_bonus, tracker_mut};
use crate::env::{Ability, AbilityKind, RandomSource, SeededRng, choose};
use crate::state::{
    ActionQueue, BattleEvent, BattlePhase, BattleState, BattleStatus, DjinnState, Element,
    QueuedAction, SkipReason,
};
use crate::stats::{Stats, effective_stats};
use crate::status::{self, ApplyOutcome};

/// Result of [`BattleEngine::execute_round`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundOutcome {
    pub state: BattleState,
    /// Events appended during this round, in order.
    pub events: Vec<BattleEvent>,
}

impl<P: EnemyPlanner> BattleEngine<P> {
    /// Resolves one full round and returns the next state.
    ///
    /// Djinn are resolved first, then every actor in speed order, then status
    /// ticks and djinn recovery. Victory and defeat are checked after each
    /// step; a finished battle gets a full-HP pass over the player roster and
    /// all djinn return to `Set`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteRoundError::WrongPhase`] unless the battle is in the
    /// planning phase.
    pub fn execute_round(
        &self,
        state: &BattleState,
        rng: &SeededRng,
    ) -> Result<RoundOutcome, ExecuteRoundError> {
        if state.phase != BattlePhase::Planning {
            return Err(ExecuteRoundError::WrongPhase(state.phase));
        }

        let round_rng = rng.derive_indexed("queue-round", u64::from(state.round_number));
        let mut streams = Streams {
            summon: round_rng.derive("summon"),
            turn_order: round_rng.derive("turn-order"),
            intent: round_rng.derive("enemy-intent"),
            action: round_rng.derive("action"),
            status: round_rng.derive("status"),
        };

        let log_start = state.log.len();
        let mut round = Resolver {
            config: &self.config,
            state: state.clone(),
        };
        round.state.phase = BattlePhase::Executing;
        let number = round.state.round_number;
        debug!(round = number, "round started");
        round.emit(BattleEvent::RoundStarted { round: number });

        round.resolve_djinn(&mut streams.summon)?;
        if !round.check_end() {
            let actions = round.collect_actions(&self.planner, &mut streams.intent);
            let order = round.turn_order(&actions, &mut streams.turn_order);
            for (index, actor_id) in order.iter().enumerate() {
                round.state.current_actor_index = index;
                if let Some(action) = actions.get(actor_id) {
                    round.resolve_action(action, &mut streams);
                }
                if round.check_end() {
                    break;
                }
            }
            if !round.state.phase.is_terminal() {
                round.state.current_actor_index = order.len();
                round.tick_statuses();
                round.check_end();
            }
        }

        if round.state.phase.is_terminal() {
            round.finish_battle()?;
        } else {
            round.prepare_next_round()?;
        }

        let next = round.state;
        let events = next.log[log_start..].to_vec();
        Ok(RoundOutcome {
            state: next,
            events,
        })
    }
}

struct Streams {
    summon: SeededRng,
    turn_order: SeededRng,
    intent: SeededRng,
    action: SeededRng,
    status: SeededRng,
}

/// Working copy of the state for one round.
struct Resolver<'c> {
    config: &'c BattleConfig,
    state: BattleState,
}

impl Resolver<'_> {
    fn emit(&mut self, event: BattleEvent) {
        self.state.push_event(event);
    }

    fn skip(&mut self, actor_id: &str, reason: SkipReason) {
        trace!(actor = actor_id, %reason, "action skipped");
        self.emit(BattleEvent::ActionSkipped {
            actor_id: actor_id.to_string(),
            reason,
        });
    }

    /// Effective stats, including djinn synergy for player units.
    fn stats_of(&self, id: &str) -> Stats {
        let Some(unit) = self.state.unit(id) else {
            return Stats::ZERO;
        };
        let bonus = if self.state.is_player(id) {
            synergy_bonus(self.state.player_team.djinn_trackers.values())
        } else {
            Stats::ZERO
        };
        effective_stats(unit, &bonus)
    }

    /// Sets a terminal phase if either side is wiped out. Enemies are checked
    /// first, so a simultaneous wipe counts as a victory.
    fn check_end(&mut self) -> bool {
        if self.state.phase.is_terminal() {
            return true;
        }
        if self.state.all_enemies_ko() {
            self.state.phase = BattlePhase::Victory;
            self.state.status = BattleStatus::PlayerVictory;
        } else if self.state.player_team.all_knocked_out() {
            self.state.phase = BattlePhase::Defeat;
            self.state.status = BattleStatus::PlayerDefeat;
        }
        self.state.phase.is_terminal()
    }

    // ===== djinn =====

    fn resolve_djinn(&mut self, rng: &mut SeededRng) -> Result<(), ExecuteRoundError> {
        let queued = std::mem::take(&mut self.state.queued_djinn);
        let round = self.state.round_number;

        let state_of = |id: &String| {
            self.state
                .player_team
                .djinn_trackers
                .get(id)
                .map(|t| (t.state, t.element))
        };
        let mut summoners = Vec::new();
        let mut activations = Vec::new();
        let mut elements = Vec::new();
        for id in &queued {
            match state_of(id) {
                Some((DjinnState::Standby, element)) => {
                    summoners.push(id.clone());
                    elements.push(element);
                }
                Some((DjinnState::Set, _)) => activations.push(id.clone()),
                _ => {}
            }
        }

        if !summoners.is_empty() {
            let damage = self.config.summon_damage_for(summoners.len());
            let enemies = self.state.living_enemy_ids();
            let targets: Vec<String> = if summoners.len() >= BattleConfig::MAX_EQUIPPED_DJINN {
                enemies
            } else {
                choose(rng, &enemies).ok().cloned().into_iter().collect()
            };
            let element = match elements.split_first() {
                Some((first, rest)) if rest.iter().all(|e| e == first) => Some(*first),
                _ => None,
            };

            for id in &summoners {
                tracker_mut(&mut self.state.player_team, id)?.begin_recovery(round)?;
                self.state
                    .djinn_recovery_timers
                    .insert(id.clone(), self.config.djinn_recovery_rounds.max(1));
            }
            debug!(djinn = ?summoners, damage, "summon");
            self.emit(BattleEvent::Summon {
                djinn_ids: summoners,
                damage,
                target_ids: targets.clone(),
            });
            for target in &targets {
                self.deal_damage(None, target, damage, element, false, false);
            }
        }

        for id in activations {
            tracker_mut(&mut self.state.player_team, &id)?.activate(round)?;
            self.emit(BattleEvent::DjinnActivated { djinn_id: id });
        }
        Ok(())
    }

    // ===== planning → actions =====

    /// Player actions come from the queue; empty slots of living units become
    /// basic attacks on the first living enemy. Enemies ask the planner.
    fn collect_actions<P: EnemyPlanner>(
        &self,
        planner: &P,
        rng: &mut SeededRng,
    ) -> BTreeMap<String, QueuedAction> {
        let mut actions = BTreeMap::new();
        let first_enemy = self.state.living_enemy_ids().into_iter().next();

        for (slot, unit) in self
            .state
            .queued_actions
            .slots()
            .zip(&self.state.player_team.units)
        {
            if unit.is_ko() {
                continue;
            }
            let action = match (slot, &first_enemy) {
                (Some(action), _) => action.clone(),
                (None, Some(enemy)) => {
                    QueuedAction::basic_attack(unit.id.clone(), vec![enemy.clone()])
                }
                (None, None) => continue,
            };
            actions.insert(unit.id.clone(), action);
        }

        for enemy in self.state.enemies.iter().filter(|e| e.is_alive()) {
            if let Some(action) = planner.plan(&self.state, enemy, rng) {
                actions.insert(enemy.id.clone(), action);
            }
        }
        actions
    }

    /// Players then enemies, in roster order, sorted by effective speed.
    fn turn_order(
        &mut self,
        actions: &BTreeMap<String, QueuedAction>,
        rng: &mut SeededRng,
    ) -> Vec<String> {
        let slots = self
            .state
            .player_team
            .units
            .iter()
            .chain(&self.state.enemies)
            .filter(|u| actions.contains_key(&u.id))
            .map(|u| TurnSlot {
                unit_id: u.id.clone(),
                speed: self.stats_of(&u.id).spd,
            })
            .collect();
        let order = speed_order(slots, rng);
        self.state.turn_order = order.clone();
        order
    }

    fn resolve_action(&mut self, action: &QueuedAction, streams: &mut Streams) {
        let actor_id = action.unit_id.as_str();
        let Some(actor) = self.state.unit(actor_id) else {
            return;
        };
        if let Some(reason) = status::action_block(actor) {
            self.skip(actor_id, reason);
            return;
        }
        if status::is_paralyzed(actor)
            && streams.status.roll_percent(self.config.paralyze_fail_percent)
        {
            self.skip(actor_id, SkipReason::Paralyzed);
            return;
        }

        let ability = match &action.ability_id {
            Some(id) => match actor.usable_ability(id) {
                Some(ability) => Some(ability.clone()),
                None => {
                    self.skip(actor_id, SkipReason::UnknownAbility);
                    return;
                }
            },
            None => None,
        };
        let targets = resolve_targets(&self.state, actor_id, ability.as_ref(), &action.target_ids);
        if targets.is_empty() {
            self.skip(actor_id, SkipReason::NoTargets);
            return;
        }

        trace!(
            actor = actor_id,
            ability = ?action.ability_id,
            targets = ?targets,
            "action started"
        );
        self.emit(BattleEvent::ActionStarted {
            actor_id: actor_id.to_string(),
            ability_id: action.ability_id.clone(),
            target_ids: targets.clone(),
        });

        match ability {
            None => self.attack(actor_id, None, &targets, streams),
            Some(ability) => match ability.kind {
                AbilityKind::Physical | AbilityKind::Psynergy => {
                    self.attack(actor_id, Some(&ability), &targets, streams)
                }
                AbilityKind::Healing => self.heal(actor_id, &ability, &targets, streams),
                AbilityKind::Buff | AbilityKind::Debuff => {
                    self.support(&ability, &targets, streams)
                }
            },
        }
    }

    // ===== damage =====

    /// Rolls pre-mitigation damage from `attacker_id` against `defender_id`.
    fn roll_damage(
        &self,
        attacker_id: &str,
        defender_id: &str,
        ability: Option<&Ability>,
        rng: &mut SeededRng,
    ) -> (u32, bool) {
        let attacker = self.stats_of(attacker_id);
        let defender = self.stats_of(defender_id);
        let defender_element = self
            .state
            .unit(defender_id)
            .map_or(Element::Neutral, |u| u.element);

        let variance = roll_variance(rng);
        let base = match ability {
            None => {
                let power = u32::try_from(attacker.atk).unwrap_or(0);
                physical_damage(power, attacker.atk, defender.def, variance)
            }
            Some(a) if a.kind == AbilityKind::Psynergy => psynergy_damage(
                a.base_power,
                attacker.mag,
                defender.def,
                a.element,
                defender_element,
                variance,
            ),
            Some(a) => physical_damage(a.base_power, attacker.atk, defender.def, variance),
        };
        let critical = roll_critical(rng, attacker.spd, self.config);
        (apply_critical(base, critical, self.config), critical)
    }

    /// Primary target takes a full hit. Other targets take splash when the
    /// ability has it, otherwise their own full hit.
    fn attack(
        &mut self,
        actor_id: &str,
        ability: Option<&Ability>,
        targets: &[String],
        streams: &mut Streams,
    ) {
        let Some((primary, rest)) = targets.split_first() else {
            return;
        };
        let element = ability.map(|a| a.element);
        let splash = ability.map(|a| a.splash_damage_percent).unwrap_or_default();

        let (primary_raw, critical) =
            self.roll_damage(actor_id, primary, ability, &mut streams.action);
        let outcome =
            self.deal_damage(Some(actor_id), primary, primary_raw, element, critical, false);
        if outcome.blocked_by.is_none() {
            self.apply_statuses(ability, primary, &mut streams.status);
        }

        for target in rest {
            let outcome = if splash.is_zero() {
                let (raw, critical) =
                    self.roll_damage(actor_id, target, ability, &mut streams.action);
                self.deal_damage(Some(actor_id), target, raw, element, critical, false)
            } else {
                let raw = splash_damage(primary_raw, splash);
                self.deal_damage(Some(actor_id), target, raw, element, false, true)
            };
            if outcome.blocked_by.is_none() {
                self.apply_statuses(ability, target, &mut streams.status);
            }
        }
    }

    /// Runs `raw` through the target's defenses and records the result.
    fn deal_damage(
        &mut self,
        source: Option<&str>,
        target_id: &str,
        raw: u32,
        element: Option<Element>,
        critical: bool,
        splash: bool,
    ) -> DamageOutcome {
        let Some(target) = self.state.unit_mut(target_id) else {
            return DamageOutcome::default();
        };
        let outcome = apply_incoming_damage(target, raw, element);

        if let Some(attacker) = source.and_then(|id| self.state.unit_mut(id)) {
            attacker.battle_stats.damage_dealt += u64::from(outcome.hp_lost);
            if outcome.knocked_out {
                attacker.battle_stats.knockouts += 1;
            }
        }
        self.emit(BattleEvent::Hit {
            source_id: source.map(str::to_string),
            target_id: target_id.to_string(),
            element: element.unwrap_or_default(),
            raw,
            amount: outcome.hp_lost,
            critical,
            splash,
            blocked_by: outcome.blocked_by,
        });
        self.record_aftermath(target_id, &outcome);
        outcome
    }

    fn record_aftermath(&mut self, target_id: &str, outcome: &DamageOutcome) {
        if let Some(hp) = outcome.auto_revived {
            self.emit(BattleEvent::AutoRevived {
                unit_id: target_id.to_string(),
                hp,
            });
        }
        if outcome.knocked_out {
            trace!(unit = target_id, "knocked out");
            self.emit(BattleEvent::KnockedOut {
                unit_id: target_id.to_string(),
            });
        }
        if outcome.hp_lost > 0 {
            self.check_phase_change(target_id);
        }
    }

    /// Grants the encounter's phase ability once an enemy drops to the
    /// threshold. Fires at most once per enemy.
    fn check_phase_change(&mut self, enemy_id: &str) {
        let Some(meta) = &self.state.meta else {
            return;
        };
        let Some(rule) = &meta.phase_change else {
            return;
        };
        if meta.phase_changed.iter().any(|id| id == enemy_id) {
            return;
        }
        let Some(enemy) = self.state.enemy(enemy_id) else {
            return;
        };
        if enemy.is_ko() || enemy.current_hp > rule.hp_pct.of(enemy.max_hp()) {
            return;
        }

        let ability_id = rule.add_ability.clone();
        let ability = meta.phase_ability.clone();
        if let Some(meta) = self.state.meta.as_mut() {
            meta.phase_changed.push(enemy_id.to_string());
        }
        if let Some(enemy) = self.state.enemies.iter_mut().find(|e| e.id == enemy_id) {
            match ability {
                Some(ability) if !enemy.abilities.iter().any(|a| a.id == ability.id) => {
                    enemy.abilities.push(ability);
                }
                _ => {}
            }
            if !enemy.unlocked_ability_ids.contains(&ability_id) {
                enemy.unlocked_ability_ids.push(ability_id.clone());
            }
        }
        debug!(enemy = enemy_id, ability = %ability_id, "phase change");
        self.emit(BattleEvent::PhaseChanged {
            enemy_id: enemy_id.to_string(),
            ability_id,
        });
    }

    // ===== healing and support =====

    fn heal(
        &mut self,
        actor_id: &str,
        ability: &Ability,
        targets: &[String],
        streams: &mut Streams,
    ) {
        let healer = self.stats_of(actor_id);
        for target_id in targets {
            let variance = roll_variance(&mut streams.action);
            let amount = heal_amount(ability.base_power, healer.mag, variance);
            let Some(target) = self.state.unit_mut(target_id) else {
                continue;
            };
            let revive_to = ability
                .revives_fallen
                .then(|| revive_hp(target.max_hp(), self.config));
            let outcome = apply_healing(target, amount, revive_to);

            if let Some(healer) = self.state.unit_mut(actor_id) {
                healer.battle_stats.healing_done += u64::from(outcome.amount);
            }
            self.emit(BattleEvent::Healed {
                source_id: Some(actor_id.to_string()),
                target_id: target_id.clone(),
                amount: outcome.amount,
                revived: outcome.revived,
            });
            if ability.cleanses {
                self.cleanse(target_id);
            }
            self.apply_statuses(Some(ability), target_id, &mut streams.status);
        }
    }

    fn support(&mut self, ability: &Ability, targets: &[String], streams: &mut Streams) {
        for target_id in targets {
            if ability.cleanses {
                self.cleanse(target_id);
            }
            self.apply_statuses(Some(ability), target_id, &mut streams.status);
        }
    }

    fn cleanse(&mut self, target_id: &str) {
        let Some(target) = self.state.unit_mut(target_id) else {
            return;
        };
        let removed = status::cleanse_negative(target);
        if removed > 0 {
            self.emit(BattleEvent::StatusCleansed {
                target_id: target_id.to_string(),
                removed,
            });
        }
    }

    /// Applies the ability's statuses to a living target, after the
    /// ability's apply-chance roll.
    fn apply_statuses(
        &mut self,
        ability: Option<&Ability>,
        target_id: &str,
        rng: &mut SeededRng,
    ) {
        let Some(ability) = ability else {
            return;
        };
        if ability.applies.is_empty() {
            return;
        }
        if !self.state.unit(target_id).is_some_and(|u| u.is_alive()) {
            return;
        }
        if ability
            .apply_chance
            .is_some_and(|chance| !rng.roll_percent(chance.get()))
        {
            return;
        }

        for effect in &ability.applies {
            let Some(target) = self.state.unit_mut(target_id) else {
                return;
            };
            let kind = effect.kind();
            let event = match status::apply_status(target, effect.clone()) {
                ApplyOutcome::Blocked => BattleEvent::StatusBlocked {
                    target_id: target_id.to_string(),
                    status: kind,
                },
                ApplyOutcome::Applied | ApplyOutcome::Replaced => BattleEvent::StatusApplied {
                    target_id: target_id.to_string(),
                    status: kind,
                },
            };
            self.emit(event);
        }
    }

    // ===== end of round =====

    /// Ticks statuses on every unit, players first, in roster order.
    fn tick_statuses(&mut self) {
        let ids: Vec<String> = self
            .state
            .player_team
            .units
            .iter()
            .chain(&self.state.enemies)
            .map(|u| u.id.clone())
            .collect();

        for id in ids {
            let Some(unit) = self.state.unit_mut(&id) else {
                continue;
            };
            let report = status::tick(unit);

            if let Some(outcome) = report.damage {
                self.emit(BattleEvent::Hit {
                    source_id: None,
                    target_id: id.clone(),
                    element: Element::Neutral,
                    raw: outcome.incoming,
                    amount: outcome.hp_lost,
                    critical: false,
                    splash: false,
                    blocked_by: outcome.blocked_by,
                });
                self.record_aftermath(&id, &outcome);
            }
            if report.healed > 0 {
                self.emit(BattleEvent::Healed {
                    source_id: None,
                    target_id: id.clone(),
                    amount: report.healed,
                    revived: false,
                });
            }
            for kind in report.expired {
                self.emit(BattleEvent::StatusExpired {
                    target_id: id.clone(),
                    status: kind,
                });
            }
        }
    }

    fn prepare_next_round(&mut self) -> Result<(), ExecuteRoundError> {
        let recovered = djinn::tick_recovery(
            &mut self.state.player_team,
            &mut self.state.djinn_recovery_timers,
        );
        for djinn_id in recovered {
            self.emit(BattleEvent::DjinnRecovered { djinn_id });
        }

        let state = &mut self.state;
        debug!(round = state.round_number, "round resolved");
        state.round_number += 1;
        state.phase = BattlePhase::Planning;
        state.queued_actions = ActionQueue::new(state.player_team.units.len())?;
        state.current_queue_index = 0;
        state.current_actor_index = 0;
        state.max_mana = state.player_team.mana_pool();
        state.remaining_mana = state.max_mana;
        Ok(())
    }

    /// Terminal bookkeeping: full heal on the player roster, djinn reset.
    fn finish_battle(&mut self) -> Result<(), ExecuteRoundError> {
        let survivors = self.state.living_player_ids();
        let state = &mut self.state;

        for unit in &mut state.player_team.units {
            unit.restore_full_hp();
        }
        djinn::reset_all(&mut state.player_team, &mut state.djinn_recovery_timers);
        state.queued_djinn.clear();
        state.queued_actions = ActionQueue::new(state.player_team.units.len())?;
        state.current_queue_index = 0;
        state.remaining_mana = state.max_mana;

        let status = state.status;
        info!(
            %status,
            round = state.round_number,
            survivors = survivors.len(),
            "battle ended"
        );
        self.emit(BattleEvent::BattleEnded { status, survivors });
        Ok(())
    }
}
