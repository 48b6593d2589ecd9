//! Player team: roster, djinn and inventory.

use std::collections::BTreeMap;

use super::{Element, Equipment, Unit};

/// Lifecycle state of a djinn inside a battle.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DjinnState {
    /// Available: grants synergy and can be activated.
    #[default]
    Set,
    /// Activated this battle and ready to join a summon. Still grants synergy.
    Standby,
    /// Cooling down after a summon. Grants nothing.
    Recovery,
}

impl DjinnState {
    /// True if a djinn in this state counts toward team synergy.
    pub const fn contributes_synergy(self) -> bool {
        matches!(self, Self::Set | Self::Standby)
    }
}

/// Per-djinn tracker, keyed by djinn id inside [`Team`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DjinnTracker {
    pub id: String,
    pub element: Element,
    pub state: DjinnState,
    /// Round number of the most recent activation or summon.
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_activated_turn: Option<u32>,
}

impl DjinnTracker {
    pub fn new(id: impl Into<String>, element: Element) -> Self {
        Self {
            id: id.into(),
            element,
            state: DjinnState::Set,
            last_activated_turn: None,
        }
    }
}

/// The player's party.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Team {
    pub units: Vec<Unit>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub djinn_trackers: BTreeMap<String, DjinnTracker>,
    /// Unequipped items won from battles.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Vec<Equipment>,
}

impl Team {
    pub fn new(units: Vec<Unit>) -> Self {
        Self {
            units,
            djinn_trackers: BTreeMap::new(),
            inventory: Vec::new(),
        }
    }

    /// Adds a djinn in the `Set` state (builder pattern).
    #[must_use]
    pub fn with_djinn(mut self, tracker: DjinnTracker) -> Self {
        self.djinn_trackers.insert(tracker.id.clone(), tracker);
        self
    }

    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: &str) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Units with HP above zero.
    pub fn survivors(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_alive())
    }

    pub fn all_knocked_out(&self) -> bool {
        self.units.iter().all(Unit::is_ko)
    }

    /// Sum of every unit's mana contribution.
    pub fn mana_pool(&self) -> u32 {
        self.units
            .iter()
            .fold(0u32, |pool, u| pool.saturating_add(u.mana_contribution))
    }
}
