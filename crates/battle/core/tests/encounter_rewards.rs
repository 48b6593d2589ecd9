use std::collections::BTreeMap;

use battle_core::{
    Ability, AbilityKind, AbilityOracle, BattleConfig, BattleEngine, BattleEnv, BattleEvent,
    BattlePhase, BattleState, Element, EncounterDefinition, EncounterOracle, EncounterReward, EncounterRules,
    Equipment, EquipmentOracle, EquipmentReward, EquipmentSlot, OracleError, Percent,
    PhaseChangeRule, SeededRng, SetupError, Stats, TargetScope, Team, Unit, UnitOracle,
    UnitTemplate, calculate_battle_rewards, claim_equipment_reward, distribute_rewards,
    start_encounter,
};

#[derive(Default)]
struct Catalog {
    abilities: BTreeMap<String, Ability>,
    templates: BTreeMap<String, UnitTemplate>,
    encounters: BTreeMap<String, EncounterDefinition>,
    equipment: BTreeMap<String, Equipment>,
}

impl AbilityOracle for Catalog {
    fn ability(&self, id: &str) -> Option<Ability> {
        self.abilities.get(id).cloned()
    }

    fn ability_ids(&self) -> Vec<String> {
        self.abilities.keys().cloned().collect()
    }
}

impl UnitOracle for Catalog {
    fn template(&self, id: &str) -> Option<UnitTemplate> {
        self.templates.get(id).cloned()
    }

    fn template_ids(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }
}

impl EncounterOracle for Catalog {
    fn encounter(&self, id: &str) -> Option<EncounterDefinition> {
        self.encounters.get(id).cloned()
    }

    fn encounter_ids(&self) -> Vec<String> {
        self.encounters.keys().cloned().collect()
    }
}

impl EquipmentOracle for Catalog {
    fn equipment(&self, id: &str) -> Option<Equipment> {
        self.equipment.get(id).cloned()
    }

    fn equipment_ids(&self) -> Vec<String> {
        self.equipment.keys().cloned().collect()
    }
}

fn catalog() -> Catalog {
    let mut catalog = Catalog::default();

    let rage = Ability::new("rage", "Rage", AbilityKind::Physical, TargetScope::SingleEnemy)
        .with_base_power(30);
    catalog.abilities.insert(rage.id.clone(), rage);

    let mut ooze = UnitTemplate::new(
        "ooze",
        "Ooze",
        Element::Mercury,
        Stats::new(1000, 0, 1, 0, 0, 1),
    );
    ooze.level = 3;
    catalog.templates.insert(ooze.id.clone(), ooze);

    let encounter = EncounterDefinition {
        id: "ooze-pit".into(),
        name: "Ooze Pit".into(),
        enemies: vec!["ooze".into(), "ooze".into()],
        difficulty: None,
        rules: Some(EncounterRules {
            phase_change: Some(PhaseChangeRule {
                hp_pct: Percent::HALF,
                add_ability: "rage".into(),
            }),
        }),
        reward: EncounterReward {
            xp: 400,
            gold: 60,
            equipment: EquipmentReward::Fixed {
                item_id: "ooze-ring".into(),
            },
        },
    };
    catalog.encounters.insert(encounter.id.clone(), encounter);

    let ring = Equipment::new(
        "ooze-ring",
        "Ooze Ring",
        EquipmentSlot::Accessory,
        Stats::new(0, 5, 0, 2, 0, 0),
    );
    catalog.equipment.insert(ring.id.clone(), ring);
    catalog
}

fn hero(id: &str) -> Unit {
    Unit::new(
        id,
        id,
        Element::Venus,
        Stats::new(200, 20, 30, 20, 10, 40),
        Stats::new(10, 2, 2, 2, 1, 1),
        1,
    )
    .with_mana_contribution(2)
}

fn party() -> Team {
    Team::new(vec![hero("isaac"), hero("garet")])
}

#[test]
fn encounter_spawns_numbered_enemies_with_meta() {
    let catalog = catalog();
    let env = BattleEnv::with_all(&catalog);

    let state = start_encounter(&env, party(), "ooze-pit").unwrap();

    let ids: Vec<_> = state.enemies.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["ooze", "ooze-2"]);
    assert!(state.enemies.iter().all(|e| e.level == 3));
    assert_eq!(state.encounter_id.as_deref(), Some("ooze-pit"));
    let meta = state.meta.as_ref().unwrap();
    assert_eq!(meta.phase_ability.as_ref().map(|a| a.id.as_str()), Some("rage"));
    assert!(state.validate().is_empty());
}

#[test]
fn missing_content_is_reported() {
    let catalog = catalog();
    let env = BattleEnv::with_all(&catalog);
    assert_eq!(
        start_encounter(&env, party(), "nowhere"),
        Err(SetupError::Oracle(OracleError::EncounterNotFound(
            "nowhere".into()
        )))
    );
    assert_eq!(
        start_encounter(&BattleEnv::empty(), party(), "ooze-pit"),
        Err(SetupError::Oracle(OracleError::EncountersNotAvailable))
    );
}

#[test]
fn phase_change_fires_once_below_threshold() {
    let catalog = catalog();
    let env = BattleEnv::with_all(&catalog);
    let mut state = start_encounter(&env, party(), "ooze-pit").unwrap();
    state.enemies[0].current_hp = 501;

    let engine = BattleEngine::new(BattleConfig::default());
    let outcome = engine.execute_round(&state, &SeededRng::new(5)).unwrap();

    let changes: Vec<_> = outcome
        .events
        .iter()
        .filter(|e| matches!(e, BattleEvent::PhaseChanged { .. }))
        .collect();
    assert_eq!(
        changes,
        vec![&BattleEvent::PhaseChanged {
            enemy_id: "ooze".into(),
            ability_id: "rage".into(),
        }]
    );
    let ooze = outcome.state.enemy("ooze").unwrap();
    assert!(ooze.usable_ability("rage").is_some());
    assert_eq!(
        outcome.state.meta.as_ref().unwrap().phase_changed,
        vec!["ooze".to_string()]
    );
}

#[test]
fn victory_rewards_flow_into_the_team() {
    let catalog = catalog();
    let env = BattleEnv::with_all(&catalog);
    let mut state = start_encounter(&env, party(), "ooze-pit").unwrap();
    state.enemies[0].current_hp = 1;
    state.enemies[1].current_hp = 0;
    state.player_team.units[1].current_hp = 0;

    let engine = BattleEngine::new(BattleConfig::default());
    let outcome = engine.execute_round(&state, &SeededRng::new(9)).unwrap();
    let state = outcome.state;
    assert_eq!(state.phase, BattlePhase::Victory);

    let survivors = state.final_survivors().unwrap();
    assert_eq!(survivors, ["isaac".to_string()]);

    let rewards =
        calculate_battle_rewards(env.encounters().unwrap(), "ooze-pit", survivors.len())
            .unwrap()
            .with_survivors(survivors);
    assert_eq!(rewards.xp_per_unit, 400);
    assert_eq!(rewards.gold, 60);

    // The post-battle heal revived garet, but only isaac survived.
    let distribution = distribute_rewards(&state.player_team, &rewards);
    assert_eq!(distribution.xp_recipients, vec!["isaac".to_string()]);
    assert_eq!(distribution.xp_distributed, rewards.xp_per_unit);
    assert!(distribution.xp_distributed <= rewards.total_xp);
    assert_eq!(distribution.team.units[1].xp, 0);
    assert_eq!(distribution.level_ups.len(), 1);
    assert_eq!(distribution.level_ups[0].new_level, 3);

    let team = claim_equipment_reward(
        &distribution.team,
        &rewards,
        None,
        env.equipment().unwrap(),
    )
    .unwrap();
    assert_eq!(team.inventory[0].id, "ooze-ring");
}

fn full_party() -> Team {
    Team::new(["isaac", "garet", "ivan", "mia"].map(hero).to_vec())
}

fn win_with_one_survivor(catalog: &Catalog) -> BattleState {
    let env = BattleEnv::with_all(catalog);
    let mut state = start_encounter(&env, full_party(), "ooze-pit").unwrap();
    state.enemies[0].current_hp = 1;
    state.enemies[1].current_hp = 0;
    for unit in &mut state.player_team.units[1..] {
        unit.current_hp = 0;
    }

    let engine = BattleEngine::new(BattleConfig::default());
    let state = engine.execute_round(&state, &SeededRng::new(9)).unwrap().state;
    assert_eq!(state.phase, BattlePhase::Victory);
    state
}

#[test]
fn xp_paid_matches_survivors_after_the_victory_heal() {
    let catalog = catalog();
    let state = win_with_one_survivor(&catalog);
    assert!(state.player_team.units.iter().all(|u| u.is_alive()));

    let survivors = state.final_survivors().unwrap();
    let rewards = calculate_battle_rewards(&catalog, "ooze-pit", survivors.len())
        .unwrap()
        .with_survivors(survivors);
    let distribution = distribute_rewards(&state.player_team, &rewards);

    assert_eq!(distribution.xp_recipients, survivors);
    assert_eq!(
        distribution.xp_distributed,
        rewards.xp_per_unit * survivors.len() as u32
    );
    assert!(distribution.xp_distributed <= rewards.total_xp);
    assert!(distribution.team.units[1..].iter().all(|u| u.xp == 0));
}

#[test]
fn large_encounter_xp_does_not_overflow() {
    let mut catalog = catalog();
    if let Some(encounter) = catalog.encounters.get_mut("ooze-pit") {
        encounter.reward.xp = 2_000_000_000;
    }
    let state = win_with_one_survivor(&catalog);

    // Without the survivor list the healed roster is still capped at one payee.
    let survivors = state.final_survivors().unwrap();
    let rewards = calculate_battle_rewards(&catalog, "ooze-pit", survivors.len()).unwrap();
    let distribution = distribute_rewards(&state.player_team, &rewards);

    assert_eq!(distribution.xp_recipients.len(), 1);
    assert_eq!(distribution.xp_distributed, 2_000_000_000);
    assert_eq!(distribution.team.units[0].level, 20);
}
