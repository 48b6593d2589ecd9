//! Content factory for building the catalog from data files.

use std::path::{Path, PathBuf};

use battle_core::{Ability, BattleConfig, EncounterDefinition, Equipment, UnitTemplate};
use tracing::debug;

use crate::catalog::ContentCatalog;
use crate::loaders::{
    AbilityLoader, ConfigLoader, EncounterLoader, EquipmentLoader, LoadResult, UnitLoader,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── abilities.ron
/// ├── units.ron
/// ├── equipment.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    ///
    /// A missing file is not an error: the defaults apply.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            debug!(path = %path.display(), "no config.toml, using defaults");
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load ability definitions from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<Vec<Ability>> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load unit and enemy templates from `units.ron`.
    pub fn load_units(&self) -> LoadResult<Vec<UnitTemplate>> {
        UnitLoader::load(&self.data_dir.join("units.ron"))
    }

    /// Load equipment from `equipment.ron`.
    pub fn load_equipment(&self) -> LoadResult<Vec<Equipment>> {
        EquipmentLoader::load(&self.data_dir.join("equipment.ron"))
    }

    /// Load encounter tables from `encounters.ron`.
    pub fn load_encounters(&self) -> LoadResult<Vec<EncounterDefinition>> {
        EncounterLoader::load(&self.data_dir.join("encounters.ron"))
    }

    /// Loads every catalog file and checks cross references.
    ///
    /// Fails if any file is missing or malformed, or if an entry names an
    /// ability, template or item the other files do not define.
    pub fn load_catalog(&self) -> LoadResult<ContentCatalog> {
        let mut catalog = ContentCatalog::new();
        for ability in self.load_abilities()? {
            catalog.insert_ability(ability);
        }
        for template in self.load_units()? {
            catalog.insert_template(template);
        }
        for item in self.load_equipment()? {
            catalog.insert_equipment(item);
        }
        for encounter in self.load_encounters()? {
            catalog.insert_encounter(encounter);
        }

        catalog.validate().into_result().map_err(|e| {
            anyhow::anyhow!(
                "Inconsistent content in {}: {}",
                self.data_dir.display(),
                e
            )
        })?;

        debug!(
            abilities = catalog.ability_count(),
            templates = catalog.template_count(),
            equipment = catalog.equipment_count(),
            encounters = catalog.encounter_count(),
            "content catalog loaded"
        );
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
