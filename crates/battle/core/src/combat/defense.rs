//! Defensive-layer pipeline for incoming damage.
//!
//! Every source of HP damage (attacks, splash, summons, poison and burn ticks)
//! goes through [`apply_incoming_damage`]. The layer order is fixed:
//!
//! ```text
//! 1. invulnerable          blocks, consumes nothing
//! 2. shield (charges ≥ 1)  blocks, consumes one charge, removed at 0
//! 3. elemental resistance  × (1 − r) for each matching resistance, floored
//! 4. damage reduction      × (1 − d) for each reduction, floored
//! 5. subtract from HP      clamped to [0, max HP]
//! 6. auto-revive           first entry with uses left, if HP reached 0
//! ```

use crate::state::{BlockedBy, Element, StatusEffect, Unit};

/// What happened to one target for one damage instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageOutcome {
    /// Damage before any defensive layer.
    pub incoming: u32,
    /// Damage after resistance and reduction, before the HP clamp.
    pub mitigated: u32,
    /// HP actually removed.
    pub hp_lost: u32,
    pub blocked_by: Option<BlockedBy>,
    /// HP reached 0 and no auto-revive caught it.
    pub knocked_out: bool,
    /// HP restored by an auto-revive, if one fired.
    pub auto_revived: Option<u32>,
}

/// Runs `damage` through the defensive layers of `unit` and mutates it.
///
/// `element` selects matching elemental resistances; status ticks pass
/// `None` and ignore resistances. Zero damage is a no-op and never consumes
/// a shield charge.
pub fn apply_incoming_damage(
    unit: &mut Unit,
    damage: u32,
    element: Option<Element>,
) -> DamageOutcome {
    let mut outcome = DamageOutcome {
        incoming: damage,
        ..DamageOutcome::default()
    };
    if damage == 0 || unit.is_ko() {
        return outcome;
    }

    if unit.has_status(|s| matches!(s, StatusEffect::Invulnerable { .. })) {
        outcome.blocked_by = Some(BlockedBy::Invulnerable);
        return outcome;
    }

    if consume_shield_charge(&mut unit.status_effects) {
        outcome.blocked_by = Some(BlockedBy::Shield);
        return outcome;
    }

    let mut remaining = damage;
    if let Some(element) = element {
        for status in &unit.status_effects {
            match status {
                StatusEffect::ElementalResistance {
                    element: resisted,
                    modifier,
                    ..
                } if *resisted == element => remaining = modifier.reduce(remaining),
                _ => {}
            }
        }
    }
    for status in &unit.status_effects {
        if let StatusEffect::DamageReduction { percent, .. } = status {
            remaining = percent.reduce(remaining);
        }
    }
    outcome.mitigated = remaining;

    let max_hp = unit.max_hp();
    let before = unit.current_hp.min(max_hp);
    unit.current_hp = before.saturating_sub(remaining);
    outcome.hp_lost = before - unit.current_hp;
    unit.battle_stats.damage_taken += u64::from(outcome.hp_lost);

    if unit.current_hp == 0 {
        match trigger_auto_revive(unit) {
            Some(hp) => outcome.auto_revived = Some(hp),
            None => outcome.knocked_out = true,
        }
    }
    outcome
}

/// Consumes one charge of the first shield with charges left.
fn consume_shield_charge(statuses: &mut Vec<StatusEffect>) -> bool {
    let Some(index) = statuses.iter().position(|s| {
        matches!(s, StatusEffect::Shield { remaining_charges, .. } if *remaining_charges >= 1)
    }) else {
        return false;
    };
    if let StatusEffect::Shield {
        remaining_charges, ..
    } = &mut statuses[index]
    {
        *remaining_charges -= 1;
        if *remaining_charges == 0 {
            statuses.remove(index);
        }
    }
    true
}

/// Fires the first auto-revive with uses left and returns the restored HP.
///
/// The unit comes back with `floor(max_hp × hp_percent)`, raised to 1 so a
/// revive always leaves it standing.
fn trigger_auto_revive(unit: &mut Unit) -> Option<u32> {
    let index = unit.status_effects.iter().position(|s| {
        matches!(s, StatusEffect::AutoRevive { uses_remaining, .. } if *uses_remaining >= 1)
    })?;
    let max_hp = unit.max_hp();
    let StatusEffect::AutoRevive {
        hp_percent,
        uses_remaining,
    } = &mut unit.status_effects[index]
    else {
        return None;
    };
    let hp = hp_percent.of(max_hp).max(1);
    *uses_remaining -= 1;
    if *uses_remaining == 0 {
        unit.status_effects.remove(index);
    }
    unit.current_hp = hp;
    Some(hp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Percent, StatusKinds};
    use crate::stats::{StatKind, Stats};

    fn target() -> Unit {
        Unit::new(
            "mia",
            "Mia",
            Element::Mercury,
            Stats::new(100, 20, 10, 10, 15, 10),
            Stats::ZERO,
            1,
        )
    }

    fn shield(charges: u32) -> StatusEffect {
        StatusEffect::Shield {
            remaining_charges: charges,
            duration: 3,
        }
    }

    #[test]
    fn last_shield_charge_removes_the_status() {
        let mut unit = target();
        unit.status_effects.push(shield(1));

        let outcome = apply_incoming_damage(&mut unit, 40, Some(Element::Mars));

        assert_eq!(outcome.hp_lost, 0);
        assert_eq!(outcome.blocked_by, Some(BlockedBy::Shield));
        assert_eq!(unit.current_hp, 100);
        assert!(unit.status_effects.is_empty());
    }

    #[test]
    fn shield_with_charges_left_stays() {
        let mut unit = target();
        unit.status_effects.push(shield(2));
        apply_incoming_damage(&mut unit, 40, None);
        assert_eq!(unit.status_effects, vec![shield(1)]);
    }

    #[test]
    fn invulnerability_blocks_before_shield() {
        let mut unit = target();
        unit.status_effects.push(StatusEffect::Invulnerable { duration: 1 });
        unit.status_effects.push(shield(1));

        let outcome = apply_incoming_damage(&mut unit, 40, None);

        assert_eq!(outcome.blocked_by, Some(BlockedBy::Invulnerable));
        assert_eq!(unit.current_hp, 100);
        assert_eq!(unit.status_effects[1], shield(1));
    }

    #[test]
    fn resistance_then_reduction_floor_separately() {
        let mut unit = target();
        unit.status_effects.push(StatusEffect::DamageReduction {
            percent: Percent::new(30).unwrap(),
            duration: 2,
        });
        unit.status_effects.push(StatusEffect::ElementalResistance {
            element: Element::Mars,
            modifier: Percent::new(25).unwrap(),
            duration: 2,
        });

        // floor(floor(37 × 0.75) × 0.7) = floor(27 × 0.7) = 18
        let outcome = apply_incoming_damage(&mut unit, 37, Some(Element::Mars));
        assert_eq!(outcome.mitigated, 18);
        assert_eq!(unit.current_hp, 82);

        // Resistance to another element does not apply.
        let outcome = apply_incoming_damage(&mut unit, 37, Some(Element::Venus));
        assert_eq!(outcome.mitigated, 25);
    }

    #[test]
    fn lethal_hit_fires_first_auto_revive_only() {
        let mut unit = target();
        let second = StatusEffect::AutoRevive {
            hp_percent: Percent::new(25).unwrap(),
            uses_remaining: 1,
        };
        let others = vec![
            StatusEffect::Buff {
                stat: StatKind::Atk,
                modifier: 10,
                duration: 2,
            },
            StatusEffect::Immunity {
                all: false,
                types: StatusKinds::POISON,
                duration: 2,
            },
        ];
        unit.status_effects.push(StatusEffect::AutoRevive {
            hp_percent: Percent::HALF,
            uses_remaining: 1,
        });
        unit.status_effects.extend(others.clone());
        unit.status_effects.push(second.clone());

        let outcome = apply_incoming_damage(&mut unit, 500, None);

        assert_eq!(outcome.auto_revived, Some(50));
        assert!(!outcome.knocked_out);
        assert_eq!(unit.current_hp, 50);
        let mut expected = others;
        expected.push(second);
        assert_eq!(unit.status_effects, expected);
    }

    #[test]
    fn auto_revive_never_leaves_the_unit_at_zero() {
        let mut unit = target();
        unit.status_effects.push(StatusEffect::AutoRevive {
            hp_percent: Percent::new(0).unwrap(),
            uses_remaining: 2,
        });

        let outcome = apply_incoming_damage(&mut unit, 500, None);

        assert_eq!(outcome.auto_revived, Some(1));
        assert!(!outcome.knocked_out);
        assert_eq!(unit.current_hp, 1);
        assert!(matches!(
            unit.status_effects[..],
            [StatusEffect::AutoRevive {
                uses_remaining: 1,
                ..
            }]
        ));
    }

    #[test]
    fn lethal_hit_without_revive_knocks_out() {
        let mut unit = target();

        let outcome = apply_incoming_damage(&mut unit, 150, None);
        assert!(outcome.knocked_out);
        assert_eq!(outcome.hp_lost, 100);
        assert!(unit.is_ko());
        assert_eq!(unit.battle_stats.damage_taken, 100);
    }

    #[test]
    fn zero_damage_keeps_shield() {
        let mut unit = target();
        unit.status_effects.push(shield(1));
        let outcome = apply_incoming_damage(&mut unit, 0, None);
        assert_eq!(outcome, DamageOutcome::default());
        assert_eq!(unit.status_effects, vec![shield(1)]);
    }
}
