//! Healing and revival.

use crate::config::BattleConfig;
use crate::state::{Percent, Unit};

/// Base healing of an ability.
///
/// # Formula
///
/// ```text
/// basePower > 0:  max(1, floor((basePower + MAG) × variance))
/// basePower = 0:  0
/// ```
pub fn heal_amount(base_power: u32, mag: i32, variance: f64) -> u32 {
    if base_power == 0 {
        return 0;
    }
    let raw = (f64::from(base_power) + f64::from(mag)) * variance;
    if raw < 1.0 { 1 } else { raw.floor() as u32 }
}

/// HP a revived unit comes back with.
pub fn revive_hp(max_hp: u32, config: &BattleConfig) -> u32 {
    Percent::saturating(config.revive_hp_percent).of(max_hp).max(1)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HealOutcome {
    /// HP actually restored.
    pub amount: u32,
    pub revived: bool,
}

/// Restores HP, clamped to max.
///
/// A knocked-out unit is only affected when `revive_to` is set; it then comes
/// back at exactly that HP. Otherwise healing a KO'd unit does nothing.
pub fn apply_healing(unit: &mut Unit, amount: u32, revive_to: Option<u32>) -> HealOutcome {
    let max_hp = unit.max_hp();
    if unit.is_ko() {
        return match revive_to {
            Some(hp) => {
                unit.current_hp = hp.clamp(1, max_hp);
                HealOutcome {
                    amount: unit.current_hp,
                    revived: true,
                }
            }
            None => HealOutcome::default(),
        };
    }
    let before = unit.current_hp.min(max_hp);
    unit.current_hp = before.saturating_add(amount).min(max_hp);
    HealOutcome {
        amount: unit.current_hp - before,
        revived: false,
    }
}
