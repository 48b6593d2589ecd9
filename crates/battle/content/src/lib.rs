//! Data-driven battle content and its loaders.
//!
//! This crate turns RON/TOML data files into a [`ContentCatalog`]:
//! - Ability definitions (RON)
//! - Unit and enemy templates (RON)
//! - Equipment (RON)
//! - Encounter tables (RON)
//! - Battle configuration (TOML)
//!
//! The catalog implements every read-only oracle of `battle-core`, so content
//! is consumed through `BattleEnv` and never leaks into battle state.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::ContentCatalog;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ConfigLoader, ContentFactory, EncounterLoader, EquipmentLoader, LoadResult,
    UnitLoader,
};
