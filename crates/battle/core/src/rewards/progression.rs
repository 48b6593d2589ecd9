//! Experience curve.
//!
//! Cumulative XP required to *reach* each level:
//!
//! | level | xp     | level | xp     |
//! |-------|--------|-------|--------|
//! | 1     | 0      | 11    | 13 100 |
//! | 2     | 100    | 12    | 15 850 |
//! | 3     | 350    | 13    | 18 850 |
//! | 4     | 850    | 14    | 22 100 |
//! | 5     | 1 850  | 15    | 25 600 |
//! | 6     | 3 100  | 16    | 29 350 |
//! | 7     | 4 600  | 17    | 33 350 |
//! | 8     | 6 350  | 18    | 37 600 |
//! | 9     | 8 350  | 19    | 42 100 |
//! | 10    | 10 600 | 20    | 46 850 |

use crate::config::BattleConfig;

const XP_CURVE: [u32; BattleConfig::MAX_LEVEL as usize] = [
    0, 100, 350, 850, 1_850, 3_100, 4_600, 6_350, 8_350, 10_600, 13_100, 15_850, 18_850, 22_100,
    25_600, 29_350, 33_350, 37_600, 42_100, 46_850,
];

/// Cumulative XP needed to reach `level`, or `None` outside 1..=20.
pub fn xp_for_level(level: u8) -> Option<u32> {
    let index = usize::from(level).checked_sub(1)?;
    XP_CURVE.get(index).copied()
}

/// Highest level whose threshold `xp` meets, capped at 20.
pub fn level_for_xp(xp: u32) -> u8 {
    let reached = XP_CURVE.iter().take_while(|&&threshold| threshold <= xp).count();
    // `reached` is at least 1 because the first threshold is 0.
    reached.min(usize::from(BattleConfig::MAX_LEVEL)) as u8
}
