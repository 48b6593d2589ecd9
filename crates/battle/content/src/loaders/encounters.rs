//! Encounter table loader.

use std::path::Path;

use battle_core::EncounterDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique_ids, read_file};

/// Encounter catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterCatalog {
    pub encounters: Vec<EncounterDefinition>,
}

/// Loader for encounter definitions from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load encounter catalog from a RON file.
    ///
    /// Rewards use a `type` tag: `(type: "fixed", itemId: "...")`,
    /// `(type: "choice", options: [...])` or `(type: "none")`.
    pub fn load(path: &Path) -> LoadResult<Vec<EncounterDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EncounterDefinition>> {
        let catalog: EncounterCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter catalog RON: {}", e))?;

        ensure_unique_ids("encounter", catalog.encounters.iter().map(|e| e.id.as_str()))?;
        for encounter in &catalog.encounters {
            encounter
                .validate()
                .into_result()
                .map_err(|e| anyhow::anyhow!("Invalid encounter '{}': {}", encounter.id, e))?;
        }

        Ok(catalog.encounters)
    }
}
