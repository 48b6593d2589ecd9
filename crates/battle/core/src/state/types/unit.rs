//! Combatants and their equipment.

use super::{Element, StatusEffect};
use crate::config::BattleConfig;
use crate::env::Ability;
use crate::stats::{Stats, level_stats};

/// Equipment slot an item occupies.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Helm,
    Boots,
    Accessory,
}

/// A piece of equipment granting flat stat bonuses.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub slot: EquipmentSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stat_bonus: Stats,
}

impl Equipment {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        slot: EquipmentSlot,
        stat_bonus: Stats,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slot,
            stat_bonus,
        }
    }
}

/// The five equipment slots of a unit. Every slot may be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentLoadout {
    pub weapon: Option<Equipment>,
    pub armor: Option<Equipment>,
    pub helm: Option<Equipment>,
    pub boots: Option<Equipment>,
    pub accessory: Option<Equipment>,
}

impl EquipmentLoadout {
    pub fn slot(&self, slot: EquipmentSlot) -> Option<&Equipment> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
            EquipmentSlot::Helm => self.helm.as_ref(),
            EquipmentSlot::Boots => self.boots.as_ref(),
            EquipmentSlot::Accessory => self.accessory.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<Equipment> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Helm => &mut self.helm,
            EquipmentSlot::Boots => &mut self.boots,
            EquipmentSlot::Accessory => &mut self.accessory,
        }
    }

    /// Puts `item` into its slot and returns whatever was there.
    pub fn equip(&mut self, item: Equipment) -> Option<Equipment> {
        self.slot_mut(item.slot).replace(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Equipment> {
        [
            &self.weapon,
            &self.armor,
            &self.helm,
            &self.boots,
            &self.accessory,
        ]
        .into_iter()
        .flatten()
    }

    /// Sum of stat bonuses across all equipped items.
    pub fn total_bonus(&self) -> Stats {
        self.iter()
            .fold(Stats::ZERO, |acc, item| acc.add(&item.stat_bonus))
    }
}

/// Cumulative per-battle counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct BattleStatistics {
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub healing_done: u64,
    pub knockouts: u32,
}

/// A combatant, player or enemy.
///
/// Knock-out is a state (`current_hp == 0`), never a removal: units stay in
/// their roster for the whole battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub element: Element,
    pub base_stats: Stats,
    pub growth_rates: Stats,
    pub level: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub xp: u32,
    pub current_hp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: EquipmentLoadout,
    /// Every ability the unit can learn, including ones still locked.
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<Ability>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unlocked_ability_ids: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status_effects: Vec<StatusEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub battle_stats: BattleStatistics,
    /// Contribution to the team's per-round mana pool.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_contribution: u32,
}

impl Unit {
    /// Creates a unit at full HP with no equipment, abilities or statuses.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        element: Element,
        base_stats: Stats,
        growth_rates: Stats,
        level: u8,
    ) -> Self {
        let mut unit = Self {
            id: id.into(),
            name: name.into(),
            element,
            base_stats,
            growth_rates,
            level: level.clamp(BattleConfig::MIN_LEVEL, BattleConfig::MAX_LEVEL),
            xp: 0,
            current_hp: 0,
            equipment: EquipmentLoadout::default(),
            abilities: Vec::new(),
            unlocked_ability_ids: Vec::new(),
            status_effects: Vec::new(),
            battle_stats: BattleStatistics::default(),
            mana_contribution: 0,
        };
        unit.current_hp = unit.max_hp();
        unit
    }

    /// Attaches the learnable ability list and unlocks everything at or
    /// below the current level (builder pattern).
    #[must_use]
    pub fn with_abilities(mut self, abilities: Vec<Ability>) -> Self {
        self.unlocked_ability_ids = abilities
            .iter()
            .filter(|a| a.unlock_level <= self.level)
            .map(|a| a.id.clone())
            .collect();
        self.abilities = abilities;
        self
    }

    /// Sets the mana contribution (builder pattern).
    #[must_use]
    pub fn with_mana_contribution(mut self, mana: u32) -> Self {
        self.mana_contribution = mana;
        self
    }

    /// Equips `item` and refills HP to the new maximum (builder pattern).
    #[must_use]
    pub fn with_equipment(mut self, item: Equipment) -> Self {
        self.equipment.equip(item);
        self.current_hp = self.max_hp();
        self
    }

    /// Maximum HP from level and equipment: `base.hp + growth.hp × (level − 1) + equipment.hp`.
    ///
    /// Statuses and djinn never change max HP. Always at least 1.
    pub fn max_hp(&self) -> u32 {
        let hp = level_stats(&self.base_stats, &self.growth_rates, self.level).hp
            + self.equipment.total_bonus().hp;
        hp.max(1) as u32
    }

    pub fn is_ko(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_ko()
    }

    /// Sets HP to max.
    pub fn restore_full_hp(&mut self) {
        self.current_hp = self.max_hp();
    }

    /// Looks up an ability the unit is currently allowed to use.
    pub fn usable_ability(&self, ability_id: &str) -> Option<&Ability> {
        self.abilities.iter().find(|a| {
            a.id == ability_id
                && (a.unlock_level <= self.level
                    || self.unlocked_ability_ids.iter().any(|id| id == ability_id))
        })
    }

    /// Abilities the unit can use right now, in definition order.
    pub fn usable_abilities(&self) -> impl Iterator<Item = &Ability> {
        self.abilities
            .iter()
            .filter(|a| self.usable_ability(&a.id).is_some())
    }

    pub fn has_status(&self, predicate: impl Fn(&StatusEffect) -> bool) -> bool {
        self.status_effects.iter().any(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{AbilityKind, TargetScope};

    fn garet(level: u8) -> Unit {
        Unit::new(
            "garet",
            "Garet",
            Element::Mars,
            Stats::new(120, 15, 18, 12, 8, 9),
            Stats::new(12, 2, 3, 2, 1, 1),
            level,
        )
    }

    #[test]
    fn max_hp_includes_growth_and_equipment() {
        let unit = garet(3).with_equipment(Equipment::new(
            "iron-helm",
            "Iron Helm",
            EquipmentSlot::Helm,
            Stats::new(10, 0, 0, 3, 0, 0),
        ));
        assert_eq!(unit.max_hp(), 120 + 24 + 10);
        assert_eq!(unit.current_hp, unit.max_hp());
    }

    #[test]
    fn level_is_clamped_on_creation() {
        assert_eq!(garet(0).level, 1);
        assert_eq!(garet(40).level, 20);
    }

    #[test]
    fn equip_returns_previous_item() {
        let mut loadout = EquipmentLoadout::default();
        let first = Equipment::new("a", "A", EquipmentSlot::Boots, Stats::ZERO);
        let second = Equipment::new("b", "B", EquipmentSlot::Boots, Stats::ZERO);
        assert!(loadout.equip(first.clone()).is_none());
        assert_eq!(loadout.equip(second), Some(first));
        assert_eq!(loadout.iter().count(), 1);
    }

    #[test]
    fn locked_abilities_are_not_usable() {
        let fireball = Ability::new("fireball", "Fireball", AbilityKind::Psynergy, TargetScope::SingleEnemy)
            .with_unlock_level(5);
        let unit = garet(3).with_abilities(vec![fireball]);
        assert!(unit.usable_ability("fireball").is_none());
        assert!(unit.unlocked_ability_ids.is_empty());

        let unit = garet(5).with_abilities(unit.abilities.clone());
        assert!(unit.usable_ability("fireball").is_some());
        assert_eq!(unit.unlocked_ability_ids, vec!["fireball".to_string()]);
    }
}
