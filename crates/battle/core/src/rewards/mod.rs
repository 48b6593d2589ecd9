//! Post-battle rewards: XP split, level-ups, gold and equipment.
//!
//! Rewards are computed from the encounter table and the number of player
//! units that were still standing when the battle ended, then applied to the
//! team in a separate pure step.
mod progression;

pub use progression::{level_for_xp, xp_for_level};

use tracing::info;

use crate::config::BattleConfig;
use crate::env::{EncounterOracle, EquipmentOracle, EquipmentReward};
use crate::error::{BattleError, ErrorSeverity};
use crate::state::Team;
use crate::stats::Stats;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RewardsError {
    /// The encounter table has no entry for a battle that was fought.
    #[error("encounter '{0}' not found")]
    EncounterNotFound(String),

    #[error("equipment '{0}' not found")]
    EquipmentNotFound(String),

    #[error("this encounter has no equipment reward")]
    NoEquipmentReward,

    #[error("a choice reward requires picking one of the offered items")]
    ChoiceRequired,

    #[error("'{0}' is not one of the offered items")]
    InvalidChoice(String),
}

impl BattleError for RewardsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EncounterNotFound(_) | Self::EquipmentNotFound(_) => ErrorSeverity::Fatal,
            Self::NoEquipmentReward => ErrorSeverity::Validation,
            Self::ChoiceRequired | Self::InvalidChoice(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EncounterNotFound(_) => "REWARDS_ENCOUNTER_NOT_FOUND",
            Self::EquipmentNotFound(_) => "REWARDS_EQUIPMENT_NOT_FOUND",
            Self::NoEquipmentReward => "REWARDS_NO_EQUIPMENT",
            Self::ChoiceRequired => "REWARDS_CHOICE_REQUIRED",
            Self::InvalidChoice(_) => "REWARDS_INVALID_CHOICE",
        }
    }
}

/// Rewards earned by winning an encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BattleRewards {
    pub encounter_id: String,
    pub total_xp: u32,
    pub xp_per_unit: u32,
    pub survivor_count: usize,
    /// True only when a full party of four survived.
    pub all_survived: bool,
    pub gold: u32,
    pub equipment: EquipmentReward,
    /// Units standing when the battle ended. When set, only these units can
    /// receive XP, even if the post-battle heal revived the others.
    #[cfg_attr(feature = "serde", serde(default))]
    pub survivor_ids: Option<Vec<String>>,
}

impl BattleRewards {
    /// Restricts XP to the given survivors, usually
    /// [`BattleState::final_survivors`](crate::state::BattleState::final_survivors).
    #[must_use]
    pub fn with_survivors(mut self, survivor_ids: &[String]) -> Self {
        self.survivor_ids = Some(survivor_ids.to_vec());
        self
    }

    fn is_survivor(&self, unit_id: &str) -> bool {
        self.survivor_ids
            .as_ref()
            .is_none_or(|ids| ids.iter().any(|id| id == unit_id))
    }
}

/// One unit's level change from a single distribution, however many levels
/// were crossed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LevelUp {
    pub unit_id: String,
    pub old_level: u8,
    pub new_level: u8,
    /// Cumulative growth across every level crossed.
    pub stat_gains: Stats,
    pub unlocked_abilities: Vec<String>,
}

/// Team after XP was applied, plus what changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardDistribution {
    pub team: Team,
    /// Units that received XP, in roster order.
    pub xp_recipients: Vec<String>,
    /// Sum of XP actually granted.
    pub xp_distributed: u32,
    pub level_ups: Vec<LevelUp>,
    pub gold: u32,
}

/// Looks up the encounter reward and splits XP between survivors.
///
/// # Formula
///
/// ```text
/// xp_per_unit = floor(total_xp / survivors)     (0 when survivors == 0)
/// all_survived = survivors == 4
/// ```
///
/// Gold and equipment pass through unchanged.
///
/// # Errors
///
/// Returns [`RewardsError::EncounterNotFound`] for an unknown encounter id.
pub fn calculate_battle_rewards(
    encounters: &dyn EncounterOracle,
    encounter_id: &str,
    survivor_count: usize,
) -> Result<BattleRewards, RewardsError> {
    let encounter = encounters
        .encounter(encounter_id)
        .ok_or_else(|| RewardsError::EncounterNotFound(encounter_id.to_string()))?;
    let reward = encounter.reward;

    let xp_per_unit = match u32::try_from(survivor_count) {
        Ok(0) | Err(_) => 0,
        Ok(count) => reward.xp / count,
    };

    Ok(BattleRewards {
        encounter_id: encounter.id,
        total_xp: reward.xp,
        xp_per_unit,
        survivor_count,
        all_survived: survivor_count == BattleConfig::MAX_PARTY_SIZE,
        gold: reward.gold,
        equipment: reward.equipment,
        survivor_ids: None,
    })
}

/// Grants `xp_per_unit` to every living survivor below the level cap.
///
/// Survivors are the units listed in `survivor_ids` when set. At most
/// `survivor_count` units are paid, so the XP granted never exceeds the
/// encounter total.
///
/// A grant may cross several level thresholds; each unit then gets a single
/// [`LevelUp`] covering the whole jump. Abilities whose unlock level falls in
/// the crossed range are unlocked and current HP rises by the HP gained.
pub fn distribute_rewards(team: &Team, rewards: &BattleRewards) -> RewardDistribution {
    let mut team = team.clone();
    let mut xp_recipients = Vec::new();
    let mut level_ups = Vec::new();

    for unit in team.units.iter_mut() {
        if xp_recipients.len() >= rewards.survivor_count {
            break;
        }
        if unit.is_ko() || !rewards.is_survivor(&unit.id) || unit.level >= BattleConfig::MAX_LEVEL
        {
            continue;
        }
        unit.xp = unit.xp.saturating_add(rewards.xp_per_unit);
        xp_recipients.push(unit.id.clone());

        let old_level = unit.level;
        let new_level = level_for_xp(unit.xp).max(old_level);
        if new_level == old_level {
            continue;
        }

        let stat_gains = unit.growth_rates.times(i32::from(new_level - old_level));
        unit.level = new_level;
        let hp = unit.current_hp.saturating_add(stat_gains.hp.max(0) as u32);
        unit.current_hp = hp.min(unit.max_hp());

        let unlocked_abilities: Vec<String> = unit
            .abilities
            .iter()
            .filter(|a| a.unlock_level > old_level && a.unlock_level <= new_level)
            .map(|a| a.id.clone())
            .filter(|id| !unit.unlocked_ability_ids.contains(id))
            .collect();
        unit.unlocked_ability_ids.extend(unlocked_abilities.iter().cloned());

        info!(
            unit = %unit.id,
            old_level,
            new_level,
            unlocked = unlocked_abilities.len(),
            "level up"
        );
        level_ups.push(LevelUp {
            unit_id: unit.id.clone(),
            old_level,
            new_level,
            stat_gains,
            unlocked_abilities,
        });
    }

    let xp_distributed = u32::try_from(xp_recipients.len())
        .map_or(u32::MAX, |count| rewards.xp_per_unit.saturating_mul(count));
    RewardDistribution {
        team,
        xp_recipients,
        xp_distributed,
        level_ups,
        gold: rewards.gold,
    }
}

/// Adds the equipment reward to the team inventory.
///
/// Fixed rewards ignore `choice`; choice rewards require one of the offered
/// ids.
///
/// # Errors
///
/// Fails when the encounter has no equipment reward, a choice is missing or
/// not on offer, or the item id is unknown to the oracle.
pub fn claim_equipment_reward(
    team: &Team,
    rewards: &BattleRewards,
    choice: Option<&str>,
    equipment: &dyn EquipmentOracle,
) -> Result<Team, RewardsError> {
    let item_id = match &rewards.equipment {
        EquipmentReward::None => return Err(RewardsError::NoEquipmentReward),
        EquipmentReward::Fixed { item_id } => item_id.as_str(),
        EquipmentReward::Choice { options } => {
            let picked = choice.ok_or(RewardsError::ChoiceRequired)?;
            options
                .iter()
                .find(|option| option.as_str() == picked)
                .ok_or_else(|| RewardsError::InvalidChoice(picked.to_string()))?
                .as_str()
        }
    };
    let item = equipment
        .equipment(item_id)
        .ok_or_else(|| RewardsError::EquipmentNotFound(item_id.to_string()))?;

    info!(item = %item.id, "equipment claimed");
    let mut team = team.clone();
    team.inventory.push(item);
    Ok(team)
}
