#![cfg(feature = "serde")]

use battle_core::{
    Ability, AbilityKind, BattleConfig, BattleEngine, BattleEvent, BattlePhase, BattleState,
    BattleStatus, BlockedBy, DjinnState, DjinnTracker, Element, ExecuteRoundError, Percent,
    PlanningError, SeededRng, StatusEffect, Stats, TargetScope, Team, Unit, start_battle,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn plasma() -> Ability {
    Ability::new("plasma", "Plasma", AbilityKind::Psynergy, TargetScope::SingleEnemy)
        .with_element(Element::Jupiter)
        .with_base_power(55)
        .with_mana_cost(2)
        .with_splash(Percent::saturating(30))
}

fn ivan() -> Unit {
    Unit::new(
        "ivan",
        "Ivan",
        Element::Jupiter,
        Stats::new(500, 40, 20, 20, 30, 50),
        Stats::ZERO,
        1,
    )
    .with_abilities(vec![plasma()])
    .with_mana_contribution(3)
}

fn golem(id: &str, hp: i32) -> Unit {
    Unit::new(
        id,
        "Golem",
        Element::Neutral,
        Stats::new(hp, 0, 1, 10, 0, 1),
        Stats::ZERO,
        1,
    )
}

fn hits_on<'a>(events: &'a [BattleEvent], target: &str) -> Vec<&'a BattleEvent> {
    events
        .iter()
        .filter(|e| matches!(e, BattleEvent::Hit { target_id, .. } if target_id == target))
        .collect()
}

fn raw_of(event: &BattleEvent) -> u32 {
    match event {
        BattleEvent::Hit { raw, .. } => *raw,
        other => panic!("not a hit: {other:?}"),
    }
}

#[test]
fn splash_against_a_shielded_secondary_is_absorbed() {
    let mut shielded = golem("golem-b", 500);
    shielded.status_effects.push(StatusEffect::Shield {
        remaining_charges: 1,
        duration: 3,
    });
    let state = start_battle(Team::new(vec![ivan()]), vec![golem("golem-a", 500), shielded])
        .unwrap();

    let engine = BattleEngine::new(BattleConfig::default());
    let queued = engine
        .queue_unit_action(&state, 0, Some("plasma"), vec!["golem-a".into()])
        .unwrap();
    assert_eq!(queued.state.remaining_mana, 1);
    assert_eq!(queued.pending_auto_attacks, 0);

    let outcome = engine
        .execute_round(&queued.state, &SeededRng::new(7))
        .unwrap();

    let primary = hits_on(&outcome.events, "golem-a");
    let primary = primary.first().copied().unwrap();
    let BattleEvent::Hit { amount, splash, .. } = primary else {
        unreachable!()
    };
    assert!(*amount > 0);
    assert!(!splash);

    let secondary = hits_on(&outcome.events, "golem-b");
    let secondary = secondary.first().copied().unwrap();
    let BattleEvent::Hit {
        raw,
        amount,
        splash,
        blocked_by,
        ..
    } = secondary
    else {
        unreachable!()
    };
    assert_eq!(*raw, raw_of(primary) * 30 / 100);
    assert_eq!(*amount, 0);
    assert!(*splash);
    assert_eq!(*blocked_by, Some(BlockedBy::Shield));

    let golem_b = outcome.state.enemy("golem-b").unwrap();
    assert_eq!(golem_b.current_hp, 500);
    assert!(golem_b.status_effects.is_empty());
}

#[test]
fn splash_still_lands_when_the_primary_is_knocked_out() {
    let mut fragile = golem("golem-a", 500);
    fragile.current_hp = 1;
    let state =
        start_battle(Team::new(vec![ivan()]), vec![fragile, golem("golem-b", 500)]).unwrap();

    let engine = BattleEngine::new(BattleConfig::default());
    let queued = engine
        .queue_unit_action(&state, 0, Some("plasma"), vec!["golem-a".into()])
        .unwrap();
    let outcome = engine
        .execute_round(&queued.state, &SeededRng::new(11))
        .unwrap();

    assert!(outcome.state.enemy("golem-a").unwrap().is_ko());
    assert!(outcome.events.contains(&BattleEvent::KnockedOut {
        unit_id: "golem-a".into()
    }));
    let golem_b = outcome.state.enemy("golem-b").unwrap();
    assert!(golem_b.current_hp < 500);
    assert_eq!(outcome.state.phase, BattlePhase::Planning);
    assert_eq!(outcome.state.round_number, 2);
}

#[test]
fn victory_heals_the_roster_and_resets_djinn() {
    let mut team = Team::new(vec![ivan()]).with_djinn(DjinnTracker::new("gust", Element::Jupiter));
    team.units[0].current_hp = 12;
    let state = start_battle(team, vec![golem("golem-a", 5)]).unwrap();

    let engine = BattleEngine::new(BattleConfig::default());
    let state = engine.queue_djinn_activation(&state, "gust").unwrap();
    let outcome = engine.execute_round(&state, &SeededRng::new(3)).unwrap();
    let state = outcome.state;

    assert_eq!(state.phase, BattlePhase::Victory);
    assert_eq!(state.status, BattleStatus::PlayerVictory);
    let ivan = &state.player_team.units[0];
    assert_eq!(ivan.current_hp, ivan.max_hp());
    assert_eq!(state.player_team.djinn_trackers["gust"].state, DjinnState::Set);
    assert!(state.djinn_recovery_timers.is_empty());
    assert_eq!(state.final_survivors(), Some(&["ivan".to_string()][..]));
    assert!(matches!(
        outcome.events.last(),
        Some(BattleEvent::BattleEnded {
            status: BattleStatus::PlayerVictory,
            ..
        })
    ));

    assert_eq!(
        engine.execute_round(&state, &SeededRng::new(3)),
        Err(ExecuteRoundError::WrongPhase(BattlePhase::Victory))
    );
    assert_eq!(
        engine
            .queue_unit_action(&state, 0, None, vec!["golem-a".into()])
            .unwrap_err(),
        PlanningError::WrongPhase(BattlePhase::Victory)
    );
}

#[test]
fn defeat_when_the_whole_party_falls() {
    let mut weak = ivan();
    weak.current_hp = 1;
    weak.base_stats.spd = 0;
    let mut brute = golem("brute", 5000);
    brute.base_stats.atk = 200;
    brute.base_stats.spd = 99;
    let state = start_battle(Team::new(vec![weak]), vec![brute]).unwrap();

    let engine = BattleEngine::new(BattleConfig::default());
    let outcome = engine.execute_round(&state, &SeededRng::new(1)).unwrap();

    assert_eq!(outcome.state.phase, BattlePhase::Defeat);
    assert_eq!(outcome.state.status, BattleStatus::PlayerDefeat);
    assert_eq!(outcome.state.final_survivors(), Some(&[][..]));
    let ivan = &outcome.state.player_team.units[0];
    assert_eq!(ivan.current_hp, ivan.max_hp());
}

#[test]
fn djinn_activate_summon_and_recover() {
    let team = Team::new(vec![ivan()]).with_djinn(DjinnTracker::new("gust", Element::Jupiter));
    let state = start_battle(team, vec![golem("golem-a", 9999)]).unwrap();
    let engine = BattleEngine::new(BattleConfig::default());
    let rng = SeededRng::new(42);

    // Round 1: Set → Standby.
    let state = engine.queue_djinn_activation(&state, "gust").unwrap();
    let round = engine.execute_round(&state, &rng).unwrap();
    assert!(round.events.contains(&BattleEvent::DjinnActivated {
        djinn_id: "gust".into()
    }));
    let state = round.state;
    assert_eq!(state.player_team.djinn_trackers["gust"].state, DjinnState::Standby);

    // Round 2: Standby djinn summon and start recovering.
    let state = engine.queue_djinn_activation(&state, "gust").unwrap();
    let round = engine.execute_round(&state, &rng).unwrap();
    assert!(round.events.contains(&BattleEvent::Summon {
        djinn_ids: vec!["gust".into()],
        damage: 80,
        target_ids: vec!["golem-a".into()],
    }));
    let state = round.state;
    assert_eq!(state.player_team.djinn_trackers["gust"].state, DjinnState::Recovery);
    assert_eq!(state.djinn_recovery_timers.get("gust"), Some(&1));
    assert!(matches!(
        engine.queue_djinn_activation(&state, "gust"),
        Err(PlanningError::DjinnUnavailable { .. })
    ));

    // Round 3: the timer runs out.
    let round = engine.execute_round(&state, &rng).unwrap();
    assert!(round.events.contains(&BattleEvent::DjinnRecovered {
        djinn_id: "gust".into()
    }));
    assert_eq!(round.state.player_team.djinn_trackers["gust"].state, DjinnState::Set);
    assert!(round.state.djinn_recovery_timers.is_empty());
}

#[test]
fn mana_is_checked_and_refunded_on_requeue() {
    let second = Unit::new(
        "sheba",
        "Sheba",
        Element::Jupiter,
        Stats::new(300, 10, 10, 10, 10, 10),
        Stats::ZERO,
        1,
    );
    let state =
        start_battle(Team::new(vec![ivan(), second]), vec![golem("golem-a", 100)]).unwrap();
    assert_eq!(state.max_mana, 3);
    let engine = BattleEngine::new(BattleConfig::default());

    let queued = engine
        .queue_unit_action(&state, 0, Some("plasma"), vec!["golem-a".into()])
        .unwrap();
    assert_eq!(queued.state.remaining_mana, 1);
    assert_eq!(queued.pending_auto_attacks, 1);
    assert_eq!(queued.state.queued_actions.total_mana_cost(), 2);
    assert!(queued.state.validate().is_empty());

    let mut overdrawn = queued.state.clone();
    overdrawn.remaining_mana = 3;
    assert!(overdrawn.validate().contains_path("remainingMana"));

    let requeued = engine
        .queue_unit_action(&queued.state, 0, None, vec!["golem-a".into()])
        .unwrap();
    assert_eq!(requeued.state.remaining_mana, 3);

    let cleared = engine.clear_queued_action(&requeued.state, 0).unwrap();
    assert_eq!(cleared.state.remaining_mana, 3);
    assert_eq!(cleared.pending_auto_attacks, 2);

    let mut poor = state.clone();
    poor.remaining_mana = 1;
    assert_eq!(
        engine
            .queue_unit_action(&poor, 0, Some("plasma"), vec!["golem-a".into()])
            .unwrap_err(),
        PlanningError::InsufficientMana {
            required: 2,
            available: 1
        }
    );
    assert!(matches!(
        engine.queue_unit_action(&state, 7, None, vec![]),
        Err(PlanningError::UnitIndexOutOfRange { index: 7, len: 2 })
    ));
}

fn play_out(seed: u64) -> BattleState {
    let team = Team::new(vec![ivan()]).with_djinn(DjinnTracker::new("gust", Element::Jupiter));
    let mut state =
        start_battle(team, vec![golem("golem-a", 300), golem("golem-b", 300)]).unwrap();
    let engine = BattleEngine::new(BattleConfig::default());
    let rng = SeededRng::new(seed);

    for _ in 0..50 {
        if state.is_over() {
            break;
        }
        let target = state.living_enemy_ids()[0].clone();
        let queued = engine
            .queue_unit_action(&state, 0, Some("plasma"), vec![target])
            .unwrap();
        state = engine.execute_round(&queued.state, &rng).unwrap().state;
    }
    state
}

#[test]
fn same_seed_replays_to_identical_state() {
    init_tracing();
    let first = play_out(2024);
    let second = play_out(2024);

    assert!(first.is_over());
    assert_eq!(first, second);
    let digest = hex::encode(first.digest().unwrap());
    assert_eq!(digest, hex::encode(second.digest().unwrap()));
    assert_eq!(digest.len(), 64);
}
