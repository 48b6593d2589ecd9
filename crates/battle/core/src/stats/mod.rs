//! Stat composition for units.
//!
//! Effective stats are built in two layers:
//!
//! ```text
//! additive:        base + growth × (level − 1) + Σ equipment + djinn synergy
//! multiplicative:  × Π (1 + modifier/100) over matching buffs/debuffs
//! ```
//!
//! The multiplicative layer floors once, after every modifier is applied,
//! and never drops below zero. See [`ModifierStack`].

mod modifiers;

pub use modifiers::ModifierStack;

use strum::IntoEnumIterator;

use crate::state::{StatusEffect, Unit};

/// One of the six unit stats.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StatKind {
    Hp,
    Pp,
    Atk,
    Def,
    Mag,
    Spd,
}

/// A full stat block. Used for base stats, growth rates, equipment bonuses
/// and computed effective stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Stats {
    pub hp: i32,
    pub pp: i32,
    pub atk: i32,
    pub def: i32,
    pub mag: i32,
    pub spd: i32,
}

impl Stats {
    pub const ZERO: Stats = Stats::new(0, 0, 0, 0, 0, 0);

    pub const fn new(hp: i32, pp: i32, atk: i32, def: i32, mag: i32, spd: i32) -> Self {
        Self {
            hp,
            pp,
            atk,
            def,
            mag,
            spd,
        }
    }

    pub const fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Pp => self.pp,
            StatKind::Atk => self.atk,
            StatKind::Def => self.def,
            StatKind::Mag => self.mag,
            StatKind::Spd => self.spd,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut i32 {
        match kind {
            StatKind::Hp => &mut self.hp,
            StatKind::Pp => &mut self.pp,
            StatKind::Atk => &mut self.atk,
            StatKind::Def => &mut self.def,
            StatKind::Mag => &mut self.mag,
            StatKind::Spd => &mut self.spd,
        }
    }

    /// Component-wise sum. Integer stats add exactly, so no rounding happens here.
    #[must_use]
    pub fn add(&self, other: &Stats) -> Stats {
        self.map_with(other, i32::saturating_add)
    }

    /// Component-wise `self × factor`.
    #[must_use]
    pub fn times(&self, factor: i32) -> Stats {
        self.map(|v| v.saturating_mul(factor))
    }

    fn map(&self, f: impl Fn(i32) -> i32) -> Stats {
        let mut out = Stats::ZERO;
        for kind in StatKind::iter() {
            *out.get_mut(kind) = f(self.get(kind));
        }
        out
    }

    fn map_with(&self, other: &Stats, f: impl Fn(i32, i32) -> i32) -> Stats {
        let mut out = Stats::ZERO;
        for kind in StatKind::iter() {
            *out.get_mut(kind) = f(self.get(kind), other.get(kind));
        }
        out
    }
}

/// Stats gained purely from level: `base + growth × (level − 1)`.
pub fn level_stats(base: &Stats, growth: &Stats, level: u8) -> Stats {
    let levels_gained = i32::from(level.max(1)) - 1;
    base.add(&growth.times(levels_gained))
}

/// Additive layer for a unit: level stats plus equipment plus `team_bonus`
/// (djinn synergy for player units, [`Stats::ZERO`] for enemies).
pub fn additive_stats(unit: &Unit, team_bonus: &Stats) -> Stats {
    level_stats(&unit.base_stats, &unit.growth_rates, unit.level)
        .add(&unit.equipment.total_bonus())
        .add(team_bonus)
}

/// Fully resolved stats for combat.
pub fn effective_stats(unit: &Unit, team_bonus: &Stats) -> Stats {
    let additive = additive_stats(unit, team_bonus);
    let mut out = Stats::ZERO;
    for kind in StatKind::iter() {
        let stack = modifier_stack(&unit.status_effects, kind);
        *out.get_mut(kind) = stack.apply(additive.get(kind)).max(0);
    }
    out
}

/// Collects buff and debuff modifiers targeting `kind`, in list order.
pub fn modifier_stack(statuses: &[StatusEffect], kind: StatKind) -> ModifierStack {
    let mut stack = ModifierStack::new();
    for status in statuses {
        match status {
            StatusEffect::Buff { stat, modifier, .. } | StatusEffect::Debuff { stat, modifier, .. }
                if *stat == kind =>
            {
                stack.push(i32::from(*modifier));
            }
            _ => {}
        }
    }
    stack
}
