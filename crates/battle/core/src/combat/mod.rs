//! Combat resolution system.
//!
//! Pure functions for damage, healing and the defensive-layer pipeline. The
//! round engine decides *who* is hit; this module decides *how much*.
//!
//! # Core Functions
//!
//! - `physical_damage` / `psynergy_damage`: base damage formulas
//! - `roll_critical`: speed-based critical roll
//! - `splash_damage`: secondary-target share of a primary hit
//! - `apply_incoming_damage`: invulnerable → shield → resistance → reduction → HP → auto-revive
//! - `apply_healing`: clamped healing and revival

pub mod damage;
pub mod defense;
pub mod heal;

pub use damage::{
    apply_critical, crit_chance, physical_damage, psynergy_damage, roll_critical, roll_variance,
    splash_damage,
};
pub use defense::{DamageOutcome, apply_incoming_damage};
pub use heal::{HealOutcome, apply_healing, heal_amount, revive_hp};
