//! Status effect engine: application, immunity, ticking and cleansing.
//!
//! # Application policy
//!
//! - An incoming `Immunity` always lands. If the unit already holds one, the
//!   new entry overwrites it in the same list slot, so a unit never carries
//!   more than one immunity.
//! - Any other status is appended, unless the unit is immune to its kind, in
//!   which case nothing happens.
//!
//! # Tick order
//!
//! 1. decrement every duration (auto-revive has none and is skipped)
//! 2. poison and burn deal their combined damage as one hit through the
//!    defensive pipeline
//! 3. heal-over-time restores HP
//! 4. entries at duration 0 are removed; survivors keep their relative order

use crate::combat::{DamageOutcome, apply_healing, apply_incoming_damage};
use crate::state::{SkipReason, StatusEffect, StatusKind, Unit};

/// Result of [`apply_status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// An existing immunity was overwritten in place.
    Replaced,
    /// The unit is immune to this kind; nothing changed.
    Blocked,
}

/// True if `unit` holds an immunity covering `kind`.
pub fn is_immune(unit: &Unit, kind: StatusKind) -> bool {
    unit.status_effects.iter().any(|status| match status {
        StatusEffect::Immunity { all, types, .. } => *all || types.contains_kind(kind),
        _ => false,
    })
}

pub fn apply_status(unit: &mut Unit, status: StatusEffect) -> ApplyOutcome {
    if let StatusEffect::Immunity { .. } = status {
        let existing = unit
            .status_effects
            .iter()
            .position(|s| matches!(s, StatusEffect::Immunity { .. }));
        return match existing {
            Some(index) => {
                unit.status_effects[index] = status;
                ApplyOutcome::Replaced
            }
            None => {
                unit.status_effects.push(status);
                ApplyOutcome::Applied
            }
        };
    }

    if is_immune(unit, status.kind()) {
        return ApplyOutcome::Blocked;
    }
    unit.status_effects.push(status);
    ApplyOutcome::Applied
}

/// What one tick did to a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Combined poison and burn hit, if any periodic damage was due.
    pub damage: Option<DamageOutcome>,
    pub healed: u32,
    /// Kinds removed because their duration ran out, in list order.
    pub expired: Vec<StatusKind>,
}

/// Advances every status on `unit` by one round.
///
/// Knocked-out units still count down durations but take no periodic damage
/// and receive no periodic healing.
pub fn tick(unit: &mut Unit) -> TickReport {
    let mut report = TickReport::default();

    for status in &mut unit.status_effects {
        if let Some(duration) = status.duration_mut() {
            *duration = duration.saturating_sub(1);
        }
    }

    let periodic_damage: u32 = unit
        .status_effects
        .iter()
        .map(|s| match s {
            StatusEffect::Poison {
                damage_per_turn, ..
            }
            | StatusEffect::Burn {
                damage_per_turn, ..
            } => *damage_per_turn,
            _ => 0,
        })
        .fold(0u32, u32::saturating_add);
    let periodic_healing: u32 = unit
        .status_effects
        .iter()
        .map(|s| match s {
            StatusEffect::HealOverTime { heal_per_turn, .. } => *heal_per_turn,
            _ => 0,
        })
        .fold(0u32, u32::saturating_add);

    if periodic_damage > 0 && unit.is_alive() {
        report.damage = Some(apply_incoming_damage(unit, periodic_damage, None));
    }
    if periodic_healing > 0 && unit.is_alive() {
        report.healed = apply_healing(unit, periodic_healing, None).amount;
    }

    unit.status_effects.retain(|status| {
        if status.duration() == Some(0) {
            report.expired.push(status.kind());
            false
        } else {
            true
        }
    });
    report
}

/// Removes every negative status and returns how many were removed.
pub fn cleanse_negative(unit: &mut Unit) -> u32 {
    let before = unit.status_effects.len();
    unit.status_effects.retain(|s| !s.is_negative());
    (before - unit.status_effects.len()) as u32
}

/// Reason the unit cannot act at all this turn, if any.
pub fn action_block(unit: &Unit) -> Option<SkipReason> {
    if unit.is_ko() {
        return Some(SkipReason::KnockedOut);
    }
    unit.status_effects.iter().find_map(|s| match s {
        StatusEffect::Freeze { .. } => Some(SkipReason::Frozen),
        StatusEffect::Stun { .. } => Some(SkipReason::Stunned),
        _ => None,
    })
}

pub fn is_paralyzed(unit: &Unit) -> bool {
    unit.has_status(|s| matches!(s, StatusEffect::Paralyze { .. }))
}
