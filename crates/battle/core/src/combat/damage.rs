//! Damage formulas.

use crate::config::BattleConfig;
use crate::env::RandomSource;
use crate::state::{Element, Percent};

// ============================================================================
// Random factors
// ============================================================================

/// Uniform variance multiplier in `[0.9, 1.1)`.
pub fn roll_variance<R: RandomSource + ?Sized>(rng: &mut R) -> f64 {
    0.9 + rng.float() * 0.2
}

/// Critical-hit probability for a given speed.
///
/// # Formula
///
/// ```text
/// chance = min(base + sqrt(max(spd, 0)) / 200, cap)
/// ```
pub fn crit_chance(spd: i32, config: &BattleConfig) -> f64 {
    let base = f64::from(config.crit_base_percent) / 100.0;
    let cap = f64::from(config.crit_cap_percent) / 100.0;
    (base + f64::from(spd.max(0)).sqrt() / 200.0).min(cap)
}

pub fn roll_critical<R: RandomSource + ?Sized>(
    rng: &mut R,
    spd: i32,
    config: &BattleConfig,
) -> bool {
    rng.float() < crit_chance(spd, config)
}

// ============================================================================
// Base damage
// ============================================================================

/// Physical damage before defensive layers.
///
/// # Formula
///
/// ```text
/// max(1, floor((power + ATK − DEF × 0.5) × variance))
/// ```
///
/// `power` is the ability's base power, or the attacker's ATK for a basic
/// attack (so a basic attack effectively counts ATK twice).
pub fn physical_damage(power: u32, atk: i32, def: i32, variance: f64) -> u32 {
    let raw = (f64::from(power) + f64::from(atk) - f64::from(def) * 0.5) * variance;
    floor_at_least_one(raw)
}

/// Psynergy damage before defensive layers.
///
/// # Formula
///
/// ```text
/// max(1, floor((basePower + MAG − DEF × 0.3) × elementModifier × variance))
/// ```
pub fn psynergy_damage(
    base_power: u32,
    mag: i32,
    def: i32,
    attack_element: Element,
    defender_element: Element,
    variance: f64,
) -> u32 {
    let modifier = attack_element.damage_modifier(defender_element);
    let raw =
        (f64::from(base_power) + f64::from(mag) - f64::from(def) * 0.3) * modifier * variance;
    floor_at_least_one(raw)
}

/// Multiplies pre-mitigation damage on a critical hit.
pub fn apply_critical(damage: u32, critical: bool, config: &BattleConfig) -> u32 {
    if critical {
        damage.saturating_mul(config.crit_multiplier)
    } else {
        damage
    }
}

/// Raw damage dealt to each secondary target: `floor(primary × percent)`.
///
/// A zero percent always yields exactly zero.
pub fn splash_damage(primary: u32, percent: Percent) -> u32 {
    if percent.is_zero() {
        return 0;
    }
    percent.of(primary)
}

fn floor_at_least_one(raw: f64) -> u32 {
    if raw.is_nan() || raw < 1.0 {
        1
    } else {
        raw.floor().min(f64::from(u32::MAX)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SeededRng;

    #[test]
    fn physical_damage_uses_half_defense() {
        // (10 + 30 − 20 × 0.5) × 1.0 = 30
        assert_eq!(physical_damage(10, 30, 20, 1.0), 30);
        // (0 + 20 − 15 × 0.5) × 0.9 = 11.25 → 11
        assert_eq!(physical_damage(0, 20, 15, 0.9), 11);
    }

    #[test]
    fn damage_never_drops_below_one() {
        assert_eq!(physical_damage(0, 1, 500, 1.1), 1);
        assert_eq!(
            psynergy_damage(0, 0, 400, Element::Mars, Element::Venus, 0.9),
            1
        );
    }

    #[test]
    fn psynergy_applies_element_advantage() {
        // (55 + 20 − 10 × 0.3) = 72; Jupiter beats Mercury ×1.5 → 108
        assert_eq!(
            psynergy_damage(55, 20, 10, Element::Jupiter, Element::Mercury, 1.0),
            108
        );
        assert_eq!(
            psynergy_damage(55, 20, 10, Element::Jupiter, Element::Neutral, 1.0),
            72
        );
    }

    #[test]
    fn crit_chance_is_capped() {
        let config = BattleConfig::default();
        assert!((crit_chance(0, &config) - 0.05).abs() < 1e-12);
        assert!((crit_chance(100, &config) - 0.10).abs() < 1e-12);
        assert!((crit_chance(1_000_000, &config) - 0.35).abs() < 1e-12);
        assert!((crit_chance(-9, &config) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn splash_floors_and_zero_short_circuits() {
        assert_eq!(splash_damage(37, Percent::new(30).unwrap()), 11);
        assert_eq!(splash_damage(1_000, Percent::ZERO), 0);
    }

    #[test]
    fn variance_stays_in_band() {
        let mut rng = SeededRng::new(99);
        for _ in 0..1_000 {
            let v = roll_variance(&mut rng);
            assert!((0.9..1.1).contains(&v));
        }
    }
}
