//! Content loaders for reading battle data from files.
//!
//! Catalog files are RON documents wrapping a single list
//! (`(abilities: [...])`); the battle configuration is TOML.

pub mod abilities;
pub mod config;
pub mod encounters;
pub mod equipment;
pub mod factory;
pub mod units;

pub use abilities::AbilityLoader;
pub use config::ConfigLoader;
pub use encounters::EncounterLoader;
pub use equipment::EquipmentLoader;
pub use factory::ContentFactory;
pub use units::UnitLoader;

use std::collections::BTreeSet;
use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Fails on the first id that appears twice in one file.
pub(crate) fn ensure_unique_ids<'a>(
    kind: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> LoadResult<()> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("Duplicate {} id '{}'", kind, id);
        }
    }
    Ok(())
}
