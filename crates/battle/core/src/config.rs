/// Battle rules constants and tunable parameters.
///
/// Limits that shape data structures are associated consts. Balance values
/// that designers tune live in fields so they can be loaded from
/// `config.toml` without recompiling.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct BattleConfig {
    /// Base critical-hit chance in percent.
    pub crit_base_percent: u8,
    /// Hard cap on critical-hit chance in percent.
    pub crit_cap_percent: u8,
    /// Multiplier applied to pre-mitigation damage on a critical hit.
    pub crit_multiplier: u32,
    /// Chance in percent that a paralyzed unit fails to act.
    pub paralyze_fail_percent: u8,
    /// HP restored by revive abilities, in percent of max HP.
    pub revive_hp_percent: u8,
    /// Rounds a summoned djinn spends in Recovery before returning to Set.
    pub djinn_recovery_rounds: u32,
    /// Summon damage indexed by participant count minus one.
    pub summon_damage: [u32; 3],
}

impl BattleConfig {
    // ===== compile-time limits =====
    pub const MAX_PARTY_SIZE: usize = 4;
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 20;
    pub const MAX_MANA_COST: u8 = 10;
    pub const MAX_EQUIPPED_DJINN: usize = 3;
    pub const CHOICE_OPTIONS: usize = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CRIT_BASE_PERCENT: u8 = 5;
    pub const DEFAULT_CRIT_CAP_PERCENT: u8 = 35;
    pub const DEFAULT_CRIT_MULTIPLIER: u32 = 2;
    pub const DEFAULT_PARALYZE_FAIL_PERCENT: u8 = 25;
    pub const DEFAULT_REVIVE_HP_PERCENT: u8 = 50;
    pub const DEFAULT_DJINN_RECOVERY_ROUNDS: u32 = 2;
    pub const DEFAULT_SUMMON_DAMAGE: [u32; 3] = [80, 150, 300];

    pub fn new() -> Self {
        Self {
            crit_base_percent: Self::DEFAULT_CRIT_BASE_PERCENT,
            crit_cap_percent: Self::DEFAULT_CRIT_CAP_PERCENT,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            paralyze_fail_percent: Self::DEFAULT_PARALYZE_FAIL_PERCENT,
            revive_hp_percent: Self::DEFAULT_REVIVE_HP_PERCENT,
            djinn_recovery_rounds: Self::DEFAULT_DJINN_RECOVERY_ROUNDS,
            summon_damage: Self::DEFAULT_SUMMON_DAMAGE,
        }
    }

    /// Summon damage for `participants` djinn, or 0 outside 1..=3.
    pub fn summon_damage_for(&self, participants: usize) -> u32 {
        match participants {
            1..=3 => self.summon_damage[participants - 1],
            _ => 0,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summon_tiers_cover_one_to_three_participants() {
        let config = BattleConfig::default();
        assert_eq!(config.summon_damage_for(0), 0);
        assert_eq!(config.summon_damage_for(1), 80);
        assert_eq!(config.summon_damage_for(2), 150);
        assert_eq!(config.summon_damage_for(3), 300);
        assert_eq!(config.summon_damage_for(4), 0);
    }
}
