//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys are camelCase; any key left out keeps its [`BattleConfig::default`] value.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.crit_base_percent > config.crit_cap_percent {
            anyhow::bail!(
                "critBasePercent ({}) exceeds critCapPercent ({})",
                config.crit_base_percent,
                config.crit_cap_percent
            );
        }
        if config.crit_cap_percent > 100 || config.paralyze_fail_percent > 100 {
            anyhow::bail!("percent values must be within 0..=100");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = ConfigLoader::parse("djinnRecoveryRounds = 3\n").unwrap();
        assert_eq!(config.djinn_recovery_rounds, 3);
        assert_eq!(config.summon_damage, BattleConfig::DEFAULT_SUMMON_DAMAGE);
        assert_eq!(config.crit_cap_percent, BattleConfig::DEFAULT_CRIT_CAP_PERCENT);
    }

    #[test]
    fn summon_tiers_are_read_as_an_array() {
        let config = ConfigLoader::parse("summonDamage = [90, 160, 320]\n").unwrap();
        assert_eq!(config.summon_damage_for(3), 320);
    }

    #[test]
    fn inconsistent_crit_settings_are_rejected() {
        let err = ConfigLoader::parse("critBasePercent = 50\ncritCapPercent = 10\n").unwrap_err();
        assert!(err.to_string().contains("critBasePercent"));
    }
}
